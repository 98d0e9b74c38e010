//! Shared utility functions for BWCA crates.

/// Date utility functions
pub mod dates {
    use chrono::NaiveDate;

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a survey date string.
    ///
    /// Survey dates arrive as "YYYY-MM-DD", sometimes with a time suffix
    /// ("2019-07-10T00:00:00"); only the leading ten characters are read.
    pub fn parse_survey_date(s: &str) -> anyhow::Result<NaiveDate> {
        let head = s.trim().get(..10).unwrap_or(s.trim());
        Ok(NaiveDate::parse_from_str(head, "%Y-%m-%d")?)
    }

    /// Calendar year of a survey date, read from its first four characters.
    ///
    /// Returns `None` when the string is shorter than four characters or the
    /// prefix is not an integer.
    pub fn survey_year(s: &str) -> Option<i32> {
        s.trim().get(..4)?.parse::<i32>().ok()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_survey_year() {
            assert_eq!(survey_year("2019-07-10"), Some(2019));
            assert_eq!(survey_year(" 2015-06-01"), Some(2015));
            assert_eq!(survey_year("2015"), Some(2015));
            assert_eq!(survey_year("201"), None);
            assert_eq!(survey_year("None"), None);
            assert_eq!(survey_year(""), None);
        }

        #[test]
        fn test_parse_survey_date() {
            let date = parse_survey_date("2019-07-10").unwrap();
            assert_eq!(date, NaiveDate::from_ymd_opt(2019, 7, 10).unwrap());

            let with_time = parse_survey_date("2019-07-10T00:00:00").unwrap();
            assert_eq!(with_time, date);

            assert!(parse_survey_date("July 2019").is_err());
        }

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_survey_date(&formatted).unwrap();
            assert_eq!(parsed, date);
        }
    }
}

/// Number formatting for display columns.
pub mod format {
    /// Format a number with thousands separators and a fixed number of
    /// decimals, e.g. `1234.5` with 2 decimals becomes `"1,234.50"`.
    pub fn format_grouped(value: f64, decimals: usize) -> String {
        if !value.is_finite() {
            return value.to_string();
        }
        let formatted = format!("{:.*}", decimals, value.abs());
        let (int_part, frac_part) = match formatted.split_once('.') {
            Some((int_part, frac_part)) => (int_part, Some(frac_part)),
            None => (formatted.as_str(), None),
        };

        let mut grouped = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
        if value.is_sign_negative() && value != 0.0 {
            grouped.push('-');
        }
        let len = int_part.len();
        for (i, ch) in int_part.chars().enumerate() {
            if i > 0 && (len - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        if let Some(frac_part) = frac_part {
            grouped.push('.');
            grouped.push_str(frac_part);
        }
        grouped
    }

    /// Format a fraction in [0, 1] as a percentage string with two decimals,
    /// e.g. `0.8734` becomes `"87.34%"`.
    pub fn format_percent(fraction: f64) -> String {
        format!("{}%", format_grouped(fraction * 100.0, 2))
    }

}
