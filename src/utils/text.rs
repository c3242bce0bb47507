/// Convert a provider symbol (`^GSPC`, `BRK-B`, `EURUSD=X`) into a safe filesystem stem.
pub fn symbol_file_stem(symbol: &str) -> Option<String> {
    let mut stem = String::new();

    for ch in symbol.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            stem.push(ch.to_ascii_lowercase());
        } else if matches!(ch, '-' | '_' | '.' | '=' | '/') && !stem.is_empty() {
            stem.push('_');
        }
    }

    let stem = stem.trim_end_matches('_');
    if stem.is_empty() {
        None
    } else {
        Some(stem.to_string())
    }
}
