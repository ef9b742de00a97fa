use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use crate::error::AppError;

pub const CHECK_IN_HOUR: u32 = 14;
pub const CHECK_OUT_HOUR: u32 = 11;

/// A validated stay: calendar dates, night count and the normalised arrival and
/// departure instants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stay {
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub nights: i32,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 instant, which is reduced to its calendar
/// date in the hotel timezone.
pub fn parse_stay_date(raw: &str, tz: Tz) -> Result<NaiveDate, AppError> {
    if raw.contains('T') {
        let dt = DateTime::parse_from_rfc3339(raw)
            .map_err(|_| AppError::Validation(format!("Invalid ISO date '{}'", raw)))?;
        Ok(dt.with_timezone(&tz).date_naive())
    } else {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| AppError::Validation(format!("Invalid date '{}' (YYYY-MM-DD)", raw)))
    }
}

pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Whole nights between two calendar dates. Both sides sit at midnight, so the
/// ceiling of the day difference is the plain day count.
pub fn nights_between(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days()
}

pub fn validate_dates(check_in: NaiveDate, check_out: NaiveDate, today: NaiveDate) -> Result<i32, AppError> {
    if check_in < today {
        return Err(AppError::Validation("Check-in date cannot be in the past".into()));
    }
    if check_out <= check_in {
        return Err(AppError::Validation("Check-out date must be after check-in date".into()));
    }

    let nights = nights_between(check_in, check_out);
    if nights < 1 {
        return Err(AppError::Validation("Minimum stay is 1 night".into()));
    }

    i32::try_from(nights).map_err(|_| AppError::Validation("Stay is too long".into()))
}

fn local_instant(date: NaiveDate, hour: u32, tz: Tz) -> Result<DateTime<Utc>, AppError> {
    let naive = date.and_hms_opt(hour, 0, 0).ok_or(AppError::Internal)?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or(AppError::Validation(format!("{} {}:00 does not exist in {}", date, hour, tz)))
}

/// Price of a stay. Shared by quotes and bookings; an overflowing total is a
/// client error rather than a wrapped number.
pub fn total_cost(nightly_price: i64, nights: i32) -> Result<i64, AppError> {
    nightly_price
        .checked_mul(i64::from(nights))
        .ok_or(AppError::Validation("Stay total is too large".into()))
}

/// Single source of truth for quotes and bookings, so both always agree.
pub fn plan_stay(check_in_raw: &str, check_out_raw: &str, tz: Tz, today: NaiveDate) -> Result<Stay, AppError> {
    let check_in_date = parse_stay_date(check_in_raw, tz)?;
    let check_out_date = parse_stay_date(check_out_raw, tz)?;
    let nights = validate_dates(check_in_date, check_out_date, today)?;

    Ok(Stay {
        check_in_date,
        check_out_date,
        nights,
        check_in: local_instant(check_in_date, CHECK_IN_HOUR, tz)?,
        check_out: local_instant(check_out_date, CHECK_OUT_HOUR, tz)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_nights_for_valid_ranges() {
        let today = date("2030-03-01");
        assert_eq!(validate_dates(date("2030-03-01"), date("2030-03-02"), today).unwrap(), 1);
        assert_eq!(validate_dates(date("2030-03-10"), date("2030-03-17"), today).unwrap(), 7);
        // across a month and a DST change in most zones
        assert_eq!(validate_dates(date("2030-03-28"), date("2030-04-02"), today).unwrap(), 5);
    }

    #[test]
    fn test_checkout_not_after_checkin_is_rejected() {
        let today = date("2030-03-01");
        assert!(matches!(validate_dates(date("2030-03-05"), date("2030-03-05"), today), Err(AppError::Validation(_))));
        assert!(matches!(validate_dates(date("2030-03-05"), date("2030-03-04"), today), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_checkin_in_the_past_is_rejected() {
        let today = date("2030-03-01");
        let err = validate_dates(date("2030-02-28"), date("2030-03-02"), today).unwrap_err();
        assert!(err.to_string().contains("past"));
    }

    #[test]
    fn test_plan_stay_normalises_times_in_hotel_zone() {
        let tz: Tz = "Africa/Nairobi".parse().unwrap();
        let stay = plan_stay("2030-06-10", "2030-06-12", tz, date("2030-06-01")).unwrap();

        assert_eq!(stay.nights, 2);
        let local_in = stay.check_in.with_timezone(&tz);
        let local_out = stay.check_out.with_timezone(&tz);
        assert_eq!((local_in.date_naive(), local_in.hour()), (date("2030-06-10"), 14));
        assert_eq!((local_out.date_naive(), local_out.hour()), (date("2030-06-12"), 11));
        // Nairobi is UTC+3
        assert_eq!(stay.check_in.hour(), 11);
    }

    #[test]
    fn test_rfc3339_input_uses_local_calendar_date() {
        let tz: Tz = "Africa/Nairobi".parse().unwrap();
        // 22:30 UTC is already the next day in Nairobi
        let d = parse_stay_date("2030-06-09T22:30:00Z", tz).unwrap();
        assert_eq!(d, date("2030-06-10"));
    }

    #[test]
    fn test_total_cost_rejects_overflow() {
        assert_eq!(total_cost(4500, 3).unwrap(), 13500);
        assert_eq!(total_cost(0, 30).unwrap(), 0);
        assert!(matches!(total_cost(10_000_000_000_000, 2_900_000), Err(AppError::Validation(_))));
        assert!(matches!(total_cost(i64::MAX, 2), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_longest_representable_stay_fits() {
        let nights = validate_dates(date("2030-01-01"), NaiveDate::MAX, date("2030-01-01")).unwrap();
        assert_eq!(i64::from(nights), nights_between(date("2030-01-01"), NaiveDate::MAX));
    }

    #[test]
    fn test_malformed_dates_are_validation_errors() {
        assert!(matches!(parse_stay_date("10/06/2030", chrono_tz::UTC), Err(AppError::Validation(_))));
        assert!(matches!(parse_stay_date("2030-13-01", chrono_tz::UTC), Err(AppError::Validation(_))));
    }
}
