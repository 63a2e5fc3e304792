//! Calendar arithmetic for period ends.

use chrono::{Datelike, Duration, NaiveDate};

/// Last day of `month` in `year`.
pub fn month_end(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    if !(1..=12).contains(&month) {
        return None;
    }
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()
}

/// First day of `year`.
pub fn year_start(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}

/// Last day of `year`.
pub fn year_end(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 12, 31)
}

/// The Sunday on or after `date`.
pub fn week_end(date: NaiveDate) -> NaiveDate {
    let days_to_sunday = 6 - date.weekday().num_days_from_monday() as i64;
    date + Duration::days(days_to_sunday)
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn should_find_month_end() {
        assert_eq!(month_end(2010, 2), Some(date(2010, 2, 28)));
        assert_eq!(month_end(2012, 2), Some(date(2012, 2, 29)));
        assert_eq!(month_end(1999, 12), Some(date(1999, 12, 31)));
        assert_eq!(month_end(1999, 0), None);
        assert_eq!(month_end(1999, 13), None);
    }

    #[test]
    fn should_find_week_end() {
        // 2022-02-11 was a Friday
        assert_eq!(week_end(date(2022, 2, 11)), date(2022, 2, 13));
        assert_eq!(week_end(date(2022, 2, 13)), date(2022, 2, 13));
        assert_eq!(week_end(date(2022, 2, 14)), date(2022, 2, 20));
    }
}
