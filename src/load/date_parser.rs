use chrono::NaiveDate;

const ISO_DATE: &str = "%Y-%m-%d";

/// Parse a draw date using `format`, falling back to ISO `YYYY-MM-DD`.
/// A trailing time component (`"09/26/2020 12:00:00 AM"`) is ignored.
pub fn parse_draw_date(raw: &str, format: &str) -> Option<NaiveDate> {
    let s = raw.trim().trim_matches('"');
    if s.is_empty() {
        return None;
    }
    let date_part = s.split_whitespace().next()?;
    NaiveDate::parse_from_str(date_part, format)
        .or_else(|_| NaiveDate::parse_from_str(date_part, ISO_DATE))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_us_and_iso_dates() {
        let want = NaiveDate::from_ymd_opt(2020, 9, 26);
        assert_eq!(parse_draw_date("09/26/2020", "%m/%d/%Y"), want);
        assert_eq!(parse_draw_date("\"09/26/2020\"", "%m/%d/%Y"), want);
        assert_eq!(parse_draw_date("2020-09-26", "%m/%d/%Y"), want);
        assert_eq!(parse_draw_date("09/26/2020 12:00:00 AM", "%m/%d/%Y"), want);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_draw_date("", "%m/%d/%Y"), None);
        assert_eq!(parse_draw_date("d1", "%m/%d/%Y"), None);
        assert_eq!(parse_draw_date("13/45/2020", "%m/%d/%Y"), None);
    }
}
