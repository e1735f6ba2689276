//! Booking-time label parser.
//!
//! The booking-site crawler reports show times as Korean 12-hour labels
//! ("오후 3:15", "오전 10:45"). Performance slots store 24-hour "HH:MM"
//! strings, so ingestion has to convert before it can match a booking to a
//! slot. Malformed labels yield `None`; a single bad booking must never
//! abort a batch.

const AM: &str = "오전";
const PM: &str = "오후";

/// Convert a Korean 12-hour time label to 24-hour "HH:MM".
///
/// Accepted shape: `오전|오후`, optional spaces, one or two hour digits, a
/// colon, exactly two minute digits. Noon and midnight follow the usual
/// 12-hour convention: "오전 12:00" is "00:00", "오후 12:00" is "12:00".
pub fn parse_korean_time(label: &str) -> Option<String> {
    let trimmed = label.trim();

    let (is_pm, rest) = if let Some(rest) = trimmed.strip_prefix(AM) {
        (false, rest)
    } else if let Some(rest) = trimmed.strip_prefix(PM) {
        (true, rest)
    } else {
        return None;
    };

    let (hour_str, minute_str) = rest.trim_start().split_once(':')?;

    if hour_str.is_empty()
        || hour_str.len() > 2
        || !hour_str.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }
    if minute_str.len() != 2 || !minute_str.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let mut hour: u32 = hour_str.parse().ok()?;
    if is_pm && hour < 12 {
        hour += 12;
    }
    if !is_pm && hour == 12 {
        hour = 0;
    }

    Some(format!("{:02}:{}", hour, minute_str))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn afternoon_times_shift_by_twelve() {
        assert_eq!(parse_korean_time("오후 3:15").as_deref(), Some("15:15"));
        assert_eq!(parse_korean_time("오후 7:45").as_deref(), Some("19:45"));
    }

    #[test]
    fn morning_times_pass_through() {
        assert_eq!(parse_korean_time("오전 10:45").as_deref(), Some("10:45"));
        assert_eq!(parse_korean_time("오전 1:00").as_deref(), Some("01:00"));
    }

    #[test]
    fn midnight_and_noon() {
        assert_eq!(parse_korean_time("오전 12:00").as_deref(), Some("00:00"));
        assert_eq!(parse_korean_time("오후 12:00").as_deref(), Some("12:00"));
    }

    #[test]
    fn spacing_is_flexible() {
        assert_eq!(parse_korean_time("오후3:15").as_deref(), Some("15:15"));
        assert_eq!(parse_korean_time("  오후  3:15  ").as_deref(), Some("15:15"));
    }

    #[test]
    fn malformed_labels_yield_none() {
        assert_eq!(parse_korean_time(""), None);
        assert_eq!(parse_korean_time("3:15"), None);
        assert_eq!(parse_korean_time("PM 3:15"), None);
        assert_eq!(parse_korean_time("오후 3:5"), None);
        assert_eq!(parse_korean_time("오후 3:155"), None);
        assert_eq!(parse_korean_time("오후 :15"), None);
        assert_eq!(parse_korean_time("오후 315"), None);
        assert_eq!(parse_korean_time("오후 +3:15"), None);
    }
}
