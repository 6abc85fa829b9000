use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use log::debug;

/// Today's date in the shopkeeper's local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// UTC instants bounding the local calendar day: `[00:00, next day 00:00)`.
pub fn local_day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    (local_midnight(day), local_midnight(day + Duration::days(1)))
}

fn local_midnight(day: NaiveDate) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight).earliest() {
        Some(instant) => instant.with_timezone(&Utc),
        // Midnight skipped by a DST transition; fall back to the UTC reading.
        None => Utc.from_utc_datetime(&midnight),
    }
}

/// Resolves a business date from extraction output. The sentinel `"today"`,
/// an absent value, and anything unparseable all collapse to the current day.
pub fn parse_business_date(raw: Option<&str>) -> NaiveDate {
    match raw {
        None => today(),
        Some(s) if s.trim().eq_ignore_ascii_case("today") => today(),
        Some(s) => match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
            Ok(date) => date,
            Err(_) => {
                debug!("unparseable date {:?}, defaulting to today", s);
                today()
            }
        },
    }
}

/// Rupee amounts print as integers when whole, two decimals otherwise.
pub fn format_inr(amount: f64) -> String {
    if amount.fract() == 0.0 && amount.abs() < 9.0e15 {
        format!("{}", amount as i64)
    } else {
        format!("{:.2}", amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_business_date_sentinels_resolve_to_today() {
        assert_eq!(parse_business_date(None), today());
        assert_eq!(parse_business_date(Some("today")), today());
        assert_eq!(parse_business_date(Some("Today")), today());
        assert_eq!(parse_business_date(Some("kal pata nahi")), today());
    }

    #[test]
    fn test_parse_business_date_iso() {
        assert_eq!(
            parse_business_date(Some("2024-03-15")),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
        assert_eq!(
            parse_business_date(Some(" 2024-03-15 ")),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
    }

    #[test]
    fn test_local_day_bounds_are_ordered_and_24h_apart() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let (start, end) = local_day_bounds(day);
        assert!(start < end);
        assert_eq!(end - start, Duration::days(1));
    }

    #[test]
    fn test_today_falls_inside_todays_bounds() {
        let (start, end) = local_day_bounds(today());
        let now = Utc::now();
        assert!(start <= now && now < end);
    }

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(240.0), "240");
        assert_eq!(format_inr(0.0), "0");
        assert_eq!(format_inr(99.5), "99.50");
        assert_eq!(format_inr(1234.567), "1234.57");
    }
}
