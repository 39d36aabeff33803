use crate::model::{DaySchedule, Weekday, WeekSchedule};

/// Validation failures for shelter input, raised before any storage mutation.
///
/// The messages are part of the API contract: the HTTP layer forwards them
/// verbatim so clients can show an actionable message.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A time string is not exactly `HH:MM`.
    #[error("Hours must follow HH:MM format on {0}")]
    HoursFormat(Weekday),

    /// A time string parses but its hour or minute is out of range.
    #[error("Hours must be between 00:00 and 24:00 on {0}")]
    HoursRange(Weekday),

    /// A day's opening time does not strictly precede its closing time.
    #[error("Opening time must be before closing time on {0}")]
    HoursOrder(Weekday),

    /// The rating is outside `(0, 5]`.
    #[error("Rating must be a number in the range (0, 5]")]
    RatingRange,
}

/// Checks that `rating` lies in `(0, 5]`.
pub fn validate_rating(rating: f64) -> Result<(), ValidationError> {
    if rating <= 0.0 || rating > 5.0 {
        return Err(ValidationError::RatingRange);
    }
    Ok(())
}

/// Checks every open day of `hours`, Monday-first, failing fast on the first
/// violation.  Per day the checks run in order: format, range, ordering.
pub fn validate_hours(hours: &WeekSchedule) -> Result<(), ValidationError> {
    for (day, schedule) in hours.days() {
        if let Some(schedule) = schedule {
            validate_day(day, schedule)?;
        }
    }
    Ok(())
}

fn validate_day(day: Weekday, schedule: &DaySchedule) -> Result<(), ValidationError> {
    let opening = split_hhmm(&schedule.opening_time).ok_or(ValidationError::HoursFormat(day))?;
    let closing = split_hhmm(&schedule.closing_time).ok_or(ValidationError::HoursFormat(day))?;
    let opening = minutes_since_midnight(opening).ok_or(ValidationError::HoursRange(day))?;
    let closing = minutes_since_midnight(closing).ok_or(ValidationError::HoursRange(day))?;
    if opening >= closing {
        return Err(ValidationError::HoursOrder(day));
    }
    Ok(())
}

/// Splits a `HH:MM` string into its numeric components.  Returns `None` unless
/// the string is exactly five characters matching `\d\d:\d\d`, so anything
/// with a sign, a misplaced colon, or the wrong length never reaches the
/// range check.
fn split_hhmm(time: &str) -> Option<(u32, u32)> {
    let bytes = time.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return None;
    }
    let digit = |byte: u8| (byte as char).to_digit(10);
    let hour = digit(bytes[0])? * 10 + digit(bytes[1])?;
    let minute = digit(bytes[3])? * 10 + digit(bytes[4])?;
    Some((hour, minute))
}

fn minutes_since_midnight((hour, minute): (u32, u32)) -> Option<u32> {
    if hour > 23 || minute > 59 {
        return None;
    }
    Some(hour * 60 + minute)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn week_with(day: Weekday, opening: &str, closing: &str) -> WeekSchedule {
        let mut week = WeekSchedule::default();
        let schedule = Some(DaySchedule::new(opening, closing));
        match day {
            Weekday::Monday => week.monday = schedule,
            Weekday::Tuesday => week.tuesday = schedule,
            Weekday::Wednesday => week.wednesday = schedule,
            Weekday::Thursday => week.thursday = schedule,
            Weekday::Friday => week.friday = schedule,
            Weekday::Saturday => week.saturday = schedule,
            Weekday::Sunday => week.sunday = schedule,
        }
        week
    }

    #[rstest]
    #[case::ordinary("09:00", "17:00")]
    #[case::hour_boundary("23:00", "23:59")]
    #[case::minute_boundary("00:00", "00:59")]
    #[case::all_day("00:00", "23:59")]
    fn test_validate_hours_ok(#[case] opening: &str, #[case] closing: &str) {
        validate_hours(&week_with(Weekday::Wednesday, opening, closing)).unwrap();
    }

    #[rstest]
    #[case::too_short("9:00", "17:00")]
    #[case::too_long("09:000", "17:00")]
    #[case::no_colon("09-00", "17:00")]
    #[case::misplaced_colon("090:0", "17:00")]
    #[case::leading_sign("-9:00", "17:00")]
    #[case::closing_side("09:00", "5pm")]
    #[case::empty("", "17:00")]
    fn test_validate_hours_format(#[case] opening: &str, #[case] closing: &str) {
        assert_eq!(
            Err(ValidationError::HoursFormat(Weekday::Friday)),
            validate_hours(&week_with(Weekday::Friday, opening, closing))
        );
    }

    #[rstest]
    #[case::hour_24("24:00", "24:30")]
    #[case::hour_99("99:00", "99:30")]
    #[case::minute_60("09:60", "17:00")]
    #[case::closing_hour("09:00", "25:00")]
    #[case::closing_minute("09:00", "17:61")]
    fn test_validate_hours_range(#[case] opening: &str, #[case] closing: &str) {
        assert_eq!(
            Err(ValidationError::HoursRange(Weekday::Saturday)),
            validate_hours(&week_with(Weekday::Saturday, opening, closing))
        );
    }

    #[rstest]
    #[case::equal("09:00", "09:00")]
    #[case::reversed("17:00", "09:00")]
    #[case::one_minute("12:01", "12:00")]
    fn test_validate_hours_order(#[case] opening: &str, #[case] closing: &str) {
        assert_eq!(
            Err(ValidationError::HoursOrder(Weekday::Sunday)),
            validate_hours(&week_with(Weekday::Sunday, opening, closing))
        );
    }

    #[test]
    fn test_validate_hours_reports_first_offending_day() {
        let mut week = week_with(Weekday::Thursday, "24:00", "25:00");
        week.monday = Some(DaySchedule::new("bad", "09:00"));
        // Monday is checked before Thursday, so the format error wins.
        assert_eq!(Err(ValidationError::HoursFormat(Weekday::Monday)), validate_hours(&week));
    }

    #[test]
    fn test_validate_hours_skips_closed_days() {
        validate_hours(&WeekSchedule::default()).unwrap();
    }

    #[rstest]
    #[case::low_boundary(0.0)]
    #[case::negative(-1.0)]
    #[case::above_five(5.0001)]
    #[case::six(6.0)]
    fn test_validate_rating_out_of_range(#[case] rating: f64) {
        assert_eq!(Err(ValidationError::RatingRange), validate_rating(rating));
    }

    #[rstest]
    #[case::just_above_zero(0.0001)]
    #[case::middle(4.6)]
    #[case::high_boundary(5.0)]
    fn test_validate_rating_ok(#[case] rating: f64) {
        validate_rating(rating).unwrap();
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            "Hours must follow HH:MM format on Tuesday",
            ValidationError::HoursFormat(Weekday::Tuesday).to_string()
        );
        assert_eq!(
            "Hours must be between 00:00 and 24:00 on Wednesday",
            ValidationError::HoursRange(Weekday::Wednesday).to_string()
        );
        assert_eq!(
            "Opening time must be before closing time on Thursday",
            ValidationError::HoursOrder(Weekday::Thursday).to_string()
        );
        assert_eq!(
            "Rating must be a number in the range (0, 5]",
            ValidationError::RatingRange.to_string()
        );
    }
}
