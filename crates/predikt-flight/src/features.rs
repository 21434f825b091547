use chrono::{Datelike, NaiveDate, NaiveDateTime};
use predikt_core::{Column, Frame, PrediktError, PrediktResult};

const DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DOTTED_FORMAT: &str = "%d.%m.%Y";

/// Parse a calendar date in any of the formats the flight datasets use.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| NaiveDate::parse_from_str(raw, DOTTED_FORMAT).ok())
}

/// Day of week with Monday = 0 through Sunday = 6.
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

/// Replace the `date` column with `day`, `month` and `weekday` columns
/// appended after the existing ones.
pub fn add_date_features(frame: &mut Frame) -> PrediktResult<()> {
    let raw = match frame.remove_column("date")? {
        Column::Categorical(values) => values,
        Column::Numeric(_) => {
            return Err(PrediktError::ColumnType {
                column: "date".to_string(),
                expected: "a date string",
            })
        }
    };

    let n = raw.len();
    let mut day = Vec::with_capacity(n);
    let mut month = Vec::with_capacity(n);
    let mut weekday = Vec::with_capacity(n);
    for (i, value) in raw.iter().enumerate() {
        let date = parse_date(value)
            .ok_or_else(|| PrediktError::Parse(format!("row {}: unparseable date '{}'", i + 1, value)))?;
        day.push(date.day() as f64);
        month.push(date.month() as f64);
        weekday.push(weekday_index(date) as f64);
    }

    frame.push_column("day", Column::Numeric(day))?;
    frame.push_column("month", Column::Numeric(month))?;
    frame.push_column("weekday", Column::Numeric(weekday))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats() {
        let expected = NaiveDate::from_ymd_opt(2019, 9, 26).unwrap();
        for raw in ["09/26/2019", "2019-09-26", "2019-09-26 00:00:00", "2019-09-26T13:45:00", "26.09.2019"] {
            assert_eq!(parse_date(raw), Some(expected), "{}", raw);
        }
        assert_eq!(parse_date("26/09/2019"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_weekday_is_monday_based() {
        // 2026-07-15 is a Wednesday.
        assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2026, 7, 15).unwrap()), 2);
        assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2026, 7, 13).unwrap()), 0);
        assert_eq!(weekday_index(NaiveDate::from_ymd_opt(2026, 7, 19).unwrap()), 6);
    }

    #[test]
    fn test_add_date_features() {
        let mut frame = Frame::new()
            .with_column("date", Column::Categorical(vec!["09/26/2019".into(), "2019-12-01".into()]))
            .unwrap()
            .with_column("price", Column::Numeric(vec![1.0, 2.0]))
            .unwrap();
        add_date_features(&mut frame).unwrap();

        assert_eq!(frame.names(), &["price", "day", "month", "weekday"]);
        assert_eq!(frame.numeric("day").unwrap(), &[26.0, 1.0]);
        assert_eq!(frame.numeric("month").unwrap(), &[9.0, 12.0]);
        // Thursday, Sunday
        assert_eq!(frame.numeric("weekday").unwrap(), &[3.0, 6.0]);
    }

    #[test]
    fn test_bad_date_names_row() {
        let mut frame = Frame::new()
            .with_column("date", Column::Categorical(vec!["2019-01-01".into(), "soon".into()]))
            .unwrap();
        let err = add_date_features(&mut frame).unwrap_err();
        assert_eq!(err, PrediktError::Parse("row 2: unparseable date 'soon'".into()));
    }
}
