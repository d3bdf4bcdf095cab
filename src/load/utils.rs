/// Trim whitespace, a leading BOM, and outer quotes if present.
pub fn clean_str(raw: &str) -> &str {
    let trimmed = raw.trim_start_matches('\u{feff}').trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].trim()
    } else {
        trimmed
    }
}

/// Split a winning-numbers field into integers, in field order.
/// On failure returns the offending token and the parse error text.
pub fn parse_numbers(field: &str) -> Result<Vec<u32>, (String, String)> {
    clean_str(field)
        .split_whitespace()
        .map(|tok| {
            tok.parse::<u32>()
                .map_err(|e| (tok.to_string(), e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_str_strips_noise() {
        assert_eq!(clean_str("  \"Winning Numbers\" "), "Winning Numbers");
        assert_eq!(clean_str("\u{feff}Draw Date"), "Draw Date");
        assert_eq!(clean_str("\""), "\"");
    }

    #[test]
    fn parse_numbers_keeps_field_order() {
        assert_eq!(
            parse_numbers("11 21 27 36 62 24"),
            Ok(vec![11, 21, 27, 36, 62, 24])
        );
        assert_eq!(parse_numbers("  04   09 "), Ok(vec![4, 9]));
        assert_eq!(parse_numbers(""), Ok(vec![]));
    }

    #[test]
    fn parse_numbers_reports_bad_token() {
        let (tok, _) = parse_numbers("1 2 x3").unwrap_err();
        assert_eq!(tok, "x3");
        assert!(parse_numbers("1 -2").is_err());
    }
}
