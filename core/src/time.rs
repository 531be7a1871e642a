use chrono::NaiveDate;

/// Number of calendar days in `month` of `year`, leap years included.
///
/// Returns `None` when the month/year pair is not a valid calendar month.
pub fn days_in_month(month: u32, year: i32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next_first.signed_duration_since(first).num_days()).ok()
}
