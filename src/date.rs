//! The date-formatting collaborator interface and a `chrono`-backed default.

use std::borrow::Cow;
use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::{Error, Result};

/// How a date value is formatted: a named style pair or an explicit
/// strftime pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateStyle {
    /// A named (date, time) style pair.
    Styled { date: Style, time: Style },
    /// An explicit strftime pattern.
    Pattern(String),
}

/// A named formatting style for the date or time half of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    None,
    Short,
    Medium,
    Long,
    Full,
}

impl DateStyle {
    /// A named style pair.
    pub fn styled(date: Style, time: Style) -> Self {
        Self::Styled { date, time }
    }

    /// An explicit strftime pattern.
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Self::Pattern(pattern.into())
    }
}

/// Maps `(date, style, locale)` to a formatted string.
pub trait DateFormatter: Send + Sync {
    fn format(&self, date: &DateTime<Utc>, style: &DateStyle, locale: &str) -> Result<String>;
}

/// The default formatter, backed by `chrono` strftime.
///
/// Named styles map onto fixed strftime patterns; the locale is ignored.
/// Install a custom [`DateFormatter`] for locale-aware output.
pub struct ChronoDates;

impl DateFormatter for ChronoDates {
    fn format(&self, date: &DateTime<Utc>, style: &DateStyle, _locale: &str) -> Result<String> {
        let pattern: Cow<'_, str> = match style {
            DateStyle::Pattern(p) => Cow::Borrowed(p),
            DateStyle::Styled { date, time } => {
                let d = match date {
                    Style::None => "",
                    Style::Short => "%-m/%-d/%y",
                    Style::Medium => "%b %-d, %Y",
                    Style::Long => "%B %-d, %Y",
                    Style::Full => "%A, %B %-d, %Y",
                };
                let t = match time {
                    Style::None => "",
                    Style::Short => "%-I:%M %p",
                    Style::Medium => "%-I:%M:%S %p",
                    Style::Long | Style::Full => "%-I:%M:%S %p %Z",
                };
                match (d.is_empty(), t.is_empty()) {
                    (false, false) => Cow::Owned(format!("{d}, {t}")),
                    (false, true) => Cow::Borrowed(d),
                    (true, false) => Cow::Borrowed(t),
                    (true, true) => Cow::Borrowed(""),
                }
            }
        };

        // chrono reports bad format specifiers through fmt::Error when the
        // delayed format is written out, so write into a buffer here rather
        // than calling `.to_string()`, which would panic.
        let mut out = String::new();
        write!(out, "{}", date.format(&pattern))
            .map_err(|_| Error::render(format!("invalid date pattern `{pattern}`")))?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 1, 2, 15, 4, 5).unwrap()
    }

    #[test]
    fn pattern() {
        let s = ChronoDates
            .format(&instant(), &DateStyle::pattern("%Y-%m-%d"), "en")
            .unwrap();
        assert_eq!(s, "2020-01-02");
    }

    #[test]
    fn styled_pair() {
        let s = ChronoDates
            .format(
                &instant(),
                &DateStyle::styled(Style::Medium, Style::Short),
                "en",
            )
            .unwrap();
        assert_eq!(s, "Jan 2, 2020, 3:04 PM");
    }

    #[test]
    fn date_only() {
        let s = ChronoDates
            .format(&instant(), &DateStyle::styled(Style::Long, Style::None), "en")
            .unwrap();
        assert_eq!(s, "January 2, 2020");
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let err = ChronoDates
            .format(&instant(), &DateStyle::pattern("%Q"), "en")
            .unwrap_err();
        assert!(err.to_string().contains("invalid date pattern"));
    }
}
