//! Cell cleaning.

use codex_model::CodeSystemConfig;

/// Trim a code and optionally case-fold it to upper case.
pub fn clean_code(raw: &str, uppercase: bool) -> String {
    let trimmed = raw.trim();
    if uppercase {
        trimmed.to_uppercase()
    } else {
        trimmed.to_string()
    }
}

/// Insert a `.` after `position` characters.
///
/// Codes that already carry a dot, or are no longer than `position`, are
/// returned unchanged.
pub fn insert_decimal(code: String, position: usize) -> String {
    if code.contains('.') {
        return code;
    }
    match code.char_indices().nth(position) {
        Some((offset, _)) => format!("{}.{}", &code[..offset], &code[offset..]),
        None => code,
    }
}

/// Clean a raw code the way `config` prescribes.
pub fn normalize_code(raw: &str, config: &CodeSystemConfig) -> String {
    let code = clean_code(raw, config.uppercase_codes);
    match config.decimal_after {
        Some(position) => insert_decimal(code, position),
        None => code,
    }
}

/// Trim a description, substituting `fallback` when it is missing or blank.
pub fn clean_description(raw: Option<&str>, fallback: &str) -> String {
    match raw.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_trimmed_and_folded() {
        assert_eq!(clean_code(" a0021 ", true), "A0021");
        assert_eq!(clean_code("\tz99.8\n", true), "Z99.8");
        assert_eq!(clean_code(" 1234-5 ", false), "1234-5");
        assert_eq!(clean_code("abc", false), "abc");
    }

    #[test]
    fn decimal_goes_after_category() {
        assert_eq!(insert_decimal("A000".to_string(), 3), "A00.0");
        assert_eq!(insert_decimal("S72001A".to_string(), 3), "S72.001A");
        assert_eq!(insert_decimal("A00".to_string(), 3), "A00");
        assert_eq!(insert_decimal("A00.0".to_string(), 3), "A00.0");
        assert_eq!(insert_decimal(String::new(), 3), "");
    }

    #[test]
    fn descriptions_fall_back() {
        assert_eq!(clean_description(Some(" Foo "), "No description"), "Foo");
        assert_eq!(clean_description(Some("   "), "No description"), "No description");
        assert_eq!(clean_description(None, "n/a"), "n/a");
    }
}
