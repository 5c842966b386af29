use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Patterns appended after any caller-supplied ones.
pub const DEFAULT_DATETIME_FORMATS: &[&str] =
    &["%Y-%m-%d", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M:%S %z"];

/// chrono `strftime` patterns tried in order; the first that parses wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatetimeFormats {
    patterns: Vec<String>,
}

impl DatetimeFormats {
    /// Caller patterns first, in order, followed by [`DEFAULT_DATETIME_FORMATS`].
    pub fn new<I, S>(custom: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns = custom
            .into_iter()
            .map(Into::into)
            .chain(DEFAULT_DATETIME_FORMATS.iter().map(|f| f.to_string()))
            .collect();
        Self { patterns }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Tries each pattern in order and returns the first successful parse.
    pub fn parse(&self, value: &str) -> Option<DateTime<FixedOffset>> {
        self.patterns
            .iter()
            .find_map(|pattern| parse_with_pattern(value, pattern))
    }
}

impl Default for DatetimeFormats {
    fn default() -> Self {
        Self::new(std::iter::empty::<String>())
    }
}

pub fn parse_with_pattern(value: &str, pattern: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(parsed) = DateTime::parse_from_str(value, pattern) {
        return Some(parsed);
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, pattern) {
        return Some(parsed.and_utc().fixed_offset());
    }
    NaiveDate::parse_from_str(value, pattern)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    #[test]
    fn defaults_cover_date_datetime_and_zoned_forms() {
        let formats = DatetimeFormats::default();
        assert_eq!(formats.patterns().len(), DEFAULT_DATETIME_FORMATS.len());

        let date = formats.parse("2024-05-06").unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2024, 5, 6));
        assert_eq!(date.hour(), 0);
        assert_eq!(date.offset().local_minus_utc(), 0);

        let naive = formats.parse("2024-05-06 14:30:05").unwrap();
        assert_eq!((naive.hour(), naive.minute(), naive.second()), (14, 30, 5));

        let zoned = formats.parse("2024-05-06 14:30:05 +0200").unwrap();
        assert_eq!(zoned.offset().local_minus_utc(), 2 * 3600);
        assert_eq!(
            zoned,
            FixedOffset::east_opt(2 * 3600)
                .unwrap()
                .with_ymd_and_hms(2024, 5, 6, 14, 30, 5)
                .unwrap()
        );
    }

    #[test]
    fn custom_patterns_take_precedence_over_defaults() {
        let formats = DatetimeFormats::new(["%d.%m.%Y", "%d.%m.%Y %H:%M:%S"]);
        assert_eq!(formats.patterns()[0], "%d.%m.%Y");
        assert_eq!(formats.patterns().len(), 2 + DEFAULT_DATETIME_FORMATS.len());

        let parsed = formats.parse("06.05.2024 08:15:00").unwrap();
        assert_eq!((parsed.day(), parsed.month(), parsed.hour()), (6, 5, 8));
        // Defaults still apply after the custom patterns.
        assert!(formats.parse("2024-05-06").is_some());
    }

    #[test]
    fn unparseable_values_yield_none() {
        let formats = DatetimeFormats::default();
        assert!(formats.parse("yesterday").is_none());
        assert!(formats.parse("2024-13-40").is_none());
        assert!(formats.parse("").is_none());
    }
}
