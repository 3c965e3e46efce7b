//! Daily sequential loan reference numbers: `R` + Buddhist-era `YY` + `MM` + `DD` + 4-digit sequence.
//!
//! Generation runs inside the caller's transaction behind an advisory lock on the day
//! prefix, so concurrent submissions on the same day are serialized.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use sqlx::PgConnection;

use crate::core::error::{AppError, Result};

/// Offset between the Gregorian and Thai Buddhist calendars
const BUDDHIST_ERA_OFFSET: i32 = 543;
const SEQUENCE_WIDTH: usize = 4;
/// Highest sequence a day can issue; the fixed width caps it at 9999
const MAX_SEQUENCE: u32 = 9999;

/// `R{yy}{MM}{DD}` for a local calendar date
pub fn day_prefix(date: NaiveDate) -> String {
    let yy = (date.year() + BUDDHIST_ERA_OFFSET).rem_euclid(100);
    format!("R{:02}{:02}{:02}", yy, date.month(), date.day())
}

/// Sequence following the highest reference issued today; 1 when there is none or it is unparsable
pub fn next_sequence(last_reference: Option<&str>) -> u32 {
    last_reference
        .and_then(|r| r.len().checked_sub(SEQUENCE_WIDTH).and_then(|i| r.get(i..)))
        .and_then(|suffix| suffix.parse::<u32>().ok())
        .map_or(1, |n| n + 1)
}

/// Reject sequences that no longer fit the 4-digit suffix
pub fn ensure_sequence_available(prefix: &str, sequence: u32) -> Result<u32> {
    if sequence > MAX_SEQUENCE {
        return Err(AppError::Conflict(format!(
            "Daily reference numbers for {} are exhausted ({} per day)",
            prefix, MAX_SEQUENCE
        )));
    }
    Ok(sequence)
}

pub fn format_reference(prefix: &str, sequence: u32) -> String {
    format!("{}{:0width$}", prefix, sequence, width = SEQUENCE_WIDTH)
}

/// Local date of `now` in `tz` plus the UTC instants bounding that day `[start, end)`
pub fn local_day(now: DateTime<Utc>, tz: Tz) -> Result<(NaiveDate, DateTime<Utc>, DateTime<Utc>)> {
    let date = now.with_timezone(&tz).date_naive();
    let start = start_of_day(date, tz)?;
    let next = date
        .checked_add_days(Days::new(1))
        .ok_or_else(|| AppError::Internal("Date out of range".to_string()))?;
    let end = start_of_day(next, tz)?;
    Ok((date, start, end))
}

fn start_of_day(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| AppError::Internal("Invalid midnight".to_string()))?;
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| AppError::Internal(format!("No local midnight for {} in {}", date, tz)))
}

/// Mint the next reference for the local day of `now`.
///
/// Must run on a connection inside an open transaction; the advisory lock is
/// released when that transaction ends.
pub async fn next_reference(conn: &mut PgConnection, tz: Tz, now: DateTime<Utc>) -> Result<String> {
    let (date, day_start, day_end) = local_day(now, tz)?;
    let prefix = day_prefix(date);

    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(&prefix)
        .execute(&mut *conn)
        .await?;

    let last: Option<String> = sqlx::query_scalar(
        r#"
        SELECT loan_reference_number FROM loans
        WHERE loan_reference_number LIKE $1 || '%'
          AND created_at >= $2 AND created_at < $3
        ORDER BY loan_reference_number DESC
        LIMIT 1
        "#,
    )
    .bind(&prefix)
    .bind(day_start)
    .bind(day_end)
    .fetch_optional(&mut *conn)
    .await?;

    let sequence = ensure_sequence_available(&prefix, next_sequence(last.as_deref()))?;
    let reference = format_reference(&prefix, sequence);
    tracing::debug!(reference = %reference, "Allocated loan reference");
    Ok(reference)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_prefix_uses_buddhist_year() {
        // 2024 CE = 2567 BE
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(day_prefix(date), "R670115");

        // 2057 CE = 2600 BE wraps to 00
        let date = NaiveDate::from_ymd_opt(2057, 12, 3).unwrap();
        assert_eq!(day_prefix(date), "R001203");
    }

    #[test]
    fn test_next_sequence() {
        assert_eq!(next_sequence(None), 1);
        assert_eq!(next_sequence(Some("R6701150006")), 7);
        assert_eq!(next_sequence(Some("R6701159999")), 10000);
        assert_eq!(next_sequence(Some("R670115abcd")), 1);
        assert_eq!(next_sequence(Some("R67")), 1);
    }

    #[test]
    fn test_sequence_stops_at_four_digits() {
        let last = next_sequence(Some("R6701159998"));
        assert_eq!(ensure_sequence_available("R670115", last).unwrap(), 9999);

        let overflow = next_sequence(Some("R6701159999"));
        assert!(matches!(
            ensure_sequence_available("R670115", overflow),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_format_reference() {
        assert_eq!(format_reference("R670115", 7), "R6701150007");
        assert_eq!(format_reference("R670115", 1), "R6701150001");
    }

    #[test]
    fn test_same_day_references_increase() {
        let prefix = "R670115";
        let mut last: Option<String> = None;
        let mut previous = 0;
        for _ in 0..25 {
            let reference = format_reference(prefix, next_sequence(last.as_deref()));
            let sequence: u32 = reference[prefix.len()..].parse().unwrap();
            assert!(sequence > previous);
            previous = sequence;
            last = Some(reference);
        }
        assert_eq!(last.as_deref(), Some("R6701150025"));
    }

    #[test]
    fn test_local_day_in_bangkok() {
        // 2024-01-14 20:30 UTC is already 2024-01-15 03:30 in Bangkok (UTC+7)
        let now = Utc.with_ymd_and_hms(2024, 1, 14, 20, 30, 0).unwrap();
        let (date, start, end) = local_day(now, chrono_tz::Asia::Bangkok).unwrap();

        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 14, 17, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 1, 15, 17, 0, 0).unwrap());
        assert_eq!(day_prefix(date), "R670115");
    }
}
