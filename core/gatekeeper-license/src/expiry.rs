//! Expiry field handling: the `UNLIMITED` sentinel or a `YYYYMMDD` date.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use std::fmt;

/// Expiry text meaning "never expires".
pub const UNLIMITED: &str = "UNLIMITED";

/// Length of a dated expiry field.
const DATE_LEN: usize = 8;

/// A license expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expiry {
    /// Never expires.
    Unlimited,
    /// Expires at the start (00:00 UTC) of the given day.
    On(NaiveDate),
}

impl Expiry {
    /// Parses an expiry field. Returns `None` unless the text is exactly the
    /// sentinel or eight ASCII digits naming a real calendar date.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        if text == UNLIMITED {
            return Some(Self::Unlimited);
        }
        parse_date(text).map(Self::On)
    }

    /// An expiry `days` days after `today`, capped at [`Expiry::LAST_DATE`].
    #[must_use]
    pub fn after_days(today: NaiveDate, days: u64) -> Self {
        let date = today
            .checked_add_days(Days::new(days))
            .map_or(Self::LAST_DATE, |date| date.min(Self::LAST_DATE));
        Self::On(date)
    }

    /// Latest date the eight-digit field can carry.
    pub const LAST_DATE: NaiveDate = match NaiveDate::from_ymd_opt(9999, 12, 31) {
        Some(date) => date,
        None => panic!("9999-12-31 is a calendar date"),
    };

    /// Earliest date the eight-digit field can carry.
    pub const FIRST_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1, 1, 1) {
        Some(date) => date,
        None => panic!("0001-01-01 is a calendar date"),
    };

    /// Returns true if this expiry renders to text that parses back to itself.
    #[must_use]
    pub fn is_representable(&self) -> bool {
        match self {
            Self::Unlimited => true,
            Self::On(date) => (Self::FIRST_DATE..=Self::LAST_DATE).contains(date),
        }
    }

    /// Returns the expiry date, or `None` for unlimited licenses.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Unlimited => None,
            Self::On(date) => Some(*date),
        }
    }

    /// Returns true if the expiry moment is at or before `now`.
    ///
    /// A dated license expires at the very start of its expiry day, so a
    /// token dated today is already expired.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self {
            Self::Unlimited => false,
            Self::On(date) => date.and_time(NaiveTime::MIN).and_utc() <= now,
        }
    }
}

impl fmt::Display for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unlimited => f.write_str(UNLIMITED),
            Self::On(date) => write!(f, "{}", date.format("%Y%m%d")),
        }
    }
}

/// Returns true if `text` has the shape of an expiry field.
#[must_use]
pub fn is_expiry_text(text: &str) -> bool {
    text == UNLIMITED || (text.len() == DATE_LEN && text.bytes().all(|b| b.is_ascii_digit()))
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    if text.len() != DATE_LEN || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = text[0..4].parse().ok()?;
    let month: u32 = text[4..6].parse().ok()?;
    let day: u32 = text[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_sentinel_and_dates() {
        assert_eq!(Expiry::parse("UNLIMITED"), Some(Expiry::Unlimited));
        assert_eq!(Expiry::parse("20301231"), Some(Expiry::On(date(2030, 12, 31))));
    }

    #[test]
    fn rejects_malformed_text() {
        for text in ["", "unlimited", "2030123", "203012311", "2030-12-31", "20301332", "20300230", "+0301231"] {
            assert_eq!(Expiry::parse(text), None, "{text:?}");
        }
    }

    #[test]
    fn display_matches_wire_form() {
        assert_eq!(Expiry::Unlimited.to_string(), "UNLIMITED");
        assert_eq!(Expiry::On(date(2026, 1, 5)).to_string(), "20260105");
    }

    #[test]
    fn expires_at_start_of_day() {
        let expiry = Expiry::On(date(2026, 3, 10));
        let before = Utc.with_ymd_and_hms(2026, 3, 9, 23, 59, 59).unwrap();
        let midnight = Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap();
        assert!(!expiry.is_expired_at(before));
        assert!(expiry.is_expired_at(midnight));
    }

    #[test]
    fn unlimited_never_expires() {
        let far = Utc.with_ymd_and_hms(9999, 12, 31, 23, 59, 59).unwrap();
        assert!(!Expiry::Unlimited.is_expired_at(far));
    }

    #[test]
    fn after_days_adds_calendar_days() {
        assert_eq!(Expiry::after_days(date(2026, 12, 30), 3), Expiry::On(date(2027, 1, 2)));
    }

    #[test]
    fn after_days_caps_at_last_date() {
        let far = Expiry::after_days(date(2026, 10, 16), 3_000_000);
        assert_eq!(far, Expiry::On(Expiry::LAST_DATE));
        assert_eq!(far.to_string(), "99991231");
        assert_eq!(Expiry::parse(&far.to_string()), Some(far));
        assert_eq!(Expiry::after_days(date(2026, 10, 16), u64::MAX), far);
    }

    #[test]
    fn representable_range() {
        assert!(Expiry::Unlimited.is_representable());
        assert!(Expiry::On(Expiry::LAST_DATE).is_representable());
        assert!(Expiry::On(Expiry::FIRST_DATE).is_representable());
        assert!(!Expiry::On(NaiveDate::MAX).is_representable());
        assert!(!Expiry::On(date(-1, 1, 1)).is_representable());
    }

    #[test]
    fn expiry_text_shape() {
        assert!(is_expiry_text("UNLIMITED"));
        assert!(is_expiry_text("99999999"));
        assert!(!is_expiry_text("2026010"));
        assert!(!is_expiry_text("2026O101"));
    }
}
