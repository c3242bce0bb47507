use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// Quote summary modules accepted by the `quoteSummary` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum QuoteParam {
    AssetProfile,
    BalanceSheetHistory,
    BalanceSheetHistoryQuarterly,
    CalendarEvents,
    CashflowStatementHistory,
    CashflowStatementHistoryQuarterly,
    DefaultKeyStatistics,
    Earnings,
    EarningsHistory,
    EarningsTrend,
    EsgScores,
    FinancialData,
    FundOwnership,
    FundPerformance,
    FundProfile,
    IndexTrend,
    IncomeStatementHistory,
    IncomeStatementHistoryQuarterly,
    IndustryTrend,
    InsiderHolders,
    InstitutionOwnership,
    MajorHoldersBreakdown,
    PageViews,
    Price,
    QuoteType,
    RecommendationTrend,
    SecFilings,
    NetSharePurchaseActivity,
    SectorTrend,
    SummaryDetail,
    SummaryProfile,
    TopHoldings,
    UpgradeDowngradeHistory,
}

impl QuoteParam {
    pub const ALL: [Self; 33] = [
        Self::AssetProfile,
        Self::BalanceSheetHistory,
        Self::BalanceSheetHistoryQuarterly,
        Self::CalendarEvents,
        Self::CashflowStatementHistory,
        Self::CashflowStatementHistoryQuarterly,
        Self::DefaultKeyStatistics,
        Self::Earnings,
        Self::EarningsHistory,
        Self::EarningsTrend,
        Self::EsgScores,
        Self::FinancialData,
        Self::FundOwnership,
        Self::FundPerformance,
        Self::FundProfile,
        Self::IndexTrend,
        Self::IncomeStatementHistory,
        Self::IncomeStatementHistoryQuarterly,
        Self::IndustryTrend,
        Self::InsiderHolders,
        Self::InstitutionOwnership,
        Self::MajorHoldersBreakdown,
        Self::PageViews,
        Self::Price,
        Self::QuoteType,
        Self::RecommendationTrend,
        Self::SecFilings,
        Self::NetSharePurchaseActivity,
        Self::SectorTrend,
        Self::SummaryDetail,
        Self::SummaryProfile,
        Self::TopHoldings,
        Self::UpgradeDowngradeHistory,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AssetProfile => "assetProfile",
            Self::BalanceSheetHistory => "balanceSheetHistory",
            Self::BalanceSheetHistoryQuarterly => "balanceSheetHistoryQuarterly",
            Self::CalendarEvents => "calendarEvents",
            Self::CashflowStatementHistory => "cashflowStatementHistory",
            Self::CashflowStatementHistoryQuarterly => "cashflowStatementHistoryQuarterly",
            Self::DefaultKeyStatistics => "defaultKeyStatistics",
            Self::Earnings => "earnings",
            Self::EarningsHistory => "earningsHistory",
            Self::EarningsTrend => "earningsTrend",
            Self::EsgScores => "esgScores",
            Self::FinancialData => "financialData",
            Self::FundOwnership => "fundOwnership",
            Self::FundPerformance => "fundPerformance",
            Self::FundProfile => "fundProfile",
            Self::IndexTrend => "indexTrend",
            Self::IncomeStatementHistory => "incomeStatementHistory",
            Self::IncomeStatementHistoryQuarterly => "incomeStatementHistoryQuarterly",
            Self::IndustryTrend => "industryTrend",
            Self::InsiderHolders => "insiderHolders",
            Self::InstitutionOwnership => "institutionOwnership",
            Self::MajorHoldersBreakdown => "majorHoldersBreakdown",
            Self::PageViews => "pageViews",
            Self::Price => "price",
            Self::QuoteType => "quoteType",
            Self::RecommendationTrend => "recommendationTrend",
            Self::SecFilings => "secFilings",
            Self::NetSharePurchaseActivity => "netSharePurchaseActivity",
            Self::SectorTrend => "sectorTrend",
            Self::SummaryDetail => "summaryDetail",
            Self::SummaryProfile => "summaryProfile",
            Self::TopHoldings => "topHoldings",
            Self::UpgradeDowngradeHistory => "upgradeDowngradeHistory",
        }
    }
}

impl Display for QuoteParam {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteParam {
    type Err = FetchError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let needle = value.trim();
        Self::ALL
            .into_iter()
            .find(|param| param.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| FetchError::InvalidQuoteParam(needle.to_owned()))
    }
}
