use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use smallvec::SmallVec;

use super::types::CellValue;

const CPNW_PREFIX: &str = "CPNW: ";
const SEGMENT_DELIMITER: &str = " - ";
const REGIONAL_PREFIXES: [&str; 2] = ["ND", "WA"];

/// Serials at or below this value are never read as dates.
const SERIAL_DATE_FLOOR: f64 = 59.0;

/// `%Y` happily reads `11` as year 0011. Such matches are skipped so the
/// two-digit `%y` formats get their turn.
const MIN_TEXT_DATE_YEAR: i32 = 1000;

/// Outside this magnitude range numbers render in exponent form.
const EXPONENT_ABOVE: f64 = 1e21;
const EXPONENT_BELOW: f64 = 1e-6;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

const DATE_FORMATS: [&str; 11] = [
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%m/%d/%y",
    "%m-%d-%y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%A, %B %d, %Y",
    "%a %b %d %Y",
];

const DATETIME_FORMATS: [&str; 12] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%y %H:%M",
    "%m/%d/%y %I:%M %p",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Splits a header into its group base and detail label.
pub fn split_column_name(column_name: &str) -> (String, String) {
    let parts: SmallVec<[&str; 4]> = column_name.split(SEGMENT_DELIMITER).collect();

    if column_name.starts_with(CPNW_PREFIX) {
        let detail = parts[1..].join(SEGMENT_DELIMITER);
        return (parts[0].trim().to_string(), detail.trim().to_string());
    }

    if parts.len() >= 3 && REGIONAL_PREFIXES.contains(&parts[0]) {
        let base = parts[..2].join(SEGMENT_DELIMITER);
        let detail = parts[2..].join(SEGMENT_DELIMITER);
        return (base.trim().to_string(), detail.trim().to_string());
    }

    if parts.len() >= 2 {
        let detail = parts[1..].join(SEGMENT_DELIMITER);
        return (parts[0].trim().to_string(), detail.trim().to_string());
    }

    (column_name.trim().to_string(), String::new())
}

/// Output header for a group base.
pub fn clean_base_name(base_name: &str) -> String {
    if base_name.starts_with(CPNW_PREFIX) {
        return base_name.replacen(CPNW_PREFIX, "", 1).trim().to_string();
    }
    WHITESPACE_RUN.replace_all(base_name, " ").trim().to_string()
}

/// Renders a cell for a summary line. Dates come out as `MM/DD/YYYY`.
pub fn format_value(value: &CellValue) -> String {
    match value {
        CellValue::Empty => String::new(),
        CellValue::Int(i) => match parse_excel_serial_date(*i as f64) {
            Some(date) => format_date(date),
            None => i.to_string(),
        },
        CellValue::Float(f) => match parse_excel_serial_date(*f) {
            Some(date) => format_date(date),
            None => format_number(*f),
        },
        CellValue::DateTime(dt) => format_date(dt.date()),
        CellValue::Text(s) => {
            let text = s.trim();
            match parse_date(text) {
                Some(date) => format_date(date),
                None => text.to_string(),
            }
        }
        CellValue::Bool(b) => b.to_string(),
        CellValue::Error(e) => e.trim().to_string(),
    }
}

/// Interprets a number as an Excel serial day count (1900 date system).
pub fn parse_excel_serial_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial <= SERIAL_DATE_FLOOR {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let days = serial.floor();
    if days > i32::MAX as f64 {
        return None;
    }
    let date = epoch.checked_add_signed(Duration::try_days(days as i64)?)?;
    (date.year() > 1900).then_some(date)
}

/// Recognizes the date spellings that show up in training exports.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_local().date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.naive_local().date());
    }

    let plausible = |date: &NaiveDate| date.year() >= MIN_TEXT_DATE_YEAR;

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok().filter(plausible))
        .or_else(|| {
            DATETIME_FORMATS.iter().find_map(|fmt| {
                NaiveDateTime::parse_from_str(text, fmt)
                    .ok()
                    .map(|dt| dt.date())
                    .filter(plausible)
            })
        })
}

/// Shortest round-trip decimal, switching to `1e+21` / `1e-7` style at the
/// same thresholds spreadsheet exports use for their text.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude >= EXPONENT_ABOVE || magnitude < EXPONENT_BELOW {
        let text = format!("{:e}", value);
        return match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
            _ => text,
        };
    }
    value.to_string()
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(name: &str) -> (String, String) {
        split_column_name(name)
    }

    #[test]
    fn cpnw_prefixed_columns_split_on_first_delimiter() {
        assert_eq!(
            split("CPNW: Tuberculosis - Expiration - Date"),
            ("CPNW: Tuberculosis".to_string(), "Expiration - Date".to_string())
        );
        assert_eq!(
            split("CPNW: Varicella"),
            ("CPNW: Varicella".to_string(), String::new())
        );
    }

    #[test]
    fn regional_columns_keep_two_segments_in_base() {
        assert_eq!(
            split("WA - Background Check - Status"),
            ("WA - Background Check".to_string(), "Status".to_string())
        );
        assert_eq!(
            split("ND - Fingerprints - Date - Submitted"),
            ("ND - Fingerprints".to_string(), "Date - Submitted".to_string())
        );
        // Two segments only: falls through to the generic split.
        assert_eq!(
            split("WA - Background Check"),
            ("WA".to_string(), "Background Check".to_string())
        );
    }

    #[test]
    fn generic_columns_split_once() {
        assert_eq!(
            split("Patient Safety - Completed On"),
            ("Patient Safety".to_string(), "Completed On".to_string())
        );
        assert_eq!(split("  Cohort  "), ("Cohort".to_string(), String::new()));
        assert_eq!(split("Flu-Shot"), ("Flu-Shot".to_string(), String::new()));
    }

    #[test]
    fn base_names_drop_prefix_or_collapse_whitespace() {
        assert_eq!(clean_base_name("CPNW: Tuberculosis"), "Tuberculosis");
        assert_eq!(clean_base_name("  Patient   Rights\t"), "Patient Rights");
        assert_eq!(clean_base_name("WA - Background Check"), "WA - Background Check");
    }

    #[test]
    fn serials_above_floor_become_dates() {
        assert_eq!(
            parse_excel_serial_date(45047.0),
            NaiveDate::from_ymd_opt(2023, 5, 1)
        );
        assert_eq!(
            parse_excel_serial_date(45047.75),
            NaiveDate::from_ymd_opt(2023, 5, 1)
        );
        assert_eq!(parse_excel_serial_date(59.0), None);
        assert_eq!(parse_excel_serial_date(12.0), None);
        // Lands in 1900, which is not after 1900.
        assert_eq!(parse_excel_serial_date(200.0), None);
        assert_eq!(parse_excel_serial_date(f64::MAX), None);
    }

    #[test]
    fn text_dates_in_common_spellings() {
        let may_first = NaiveDate::from_ymd_opt(2023, 5, 1);
        for text in [
            "2023-05-01",
            "2023/05/01",
            "05/01/2023",
            "5/1/2023",
            "05-01-2023",
            "May 1, 2023",
            "1 May 2023",
            "2023-05-01T08:30:00Z",
            "2023-05-01T08:30:00",
            "5/1/2023 3:45 PM",
            "05/01/2023 14:00",
        ] {
            assert_eq!(parse_date(text), may_first, "failed on {text}");
        }
    }

    #[test]
    fn non_dates_stay_text() {
        assert_eq!(parse_date("Completed"), None);
        assert_eq!(parse_date("Pending Review"), None);
        assert_eq!(parse_date("13/45/2023"), None);
        assert_eq!(parse_date("5/1"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn two_digit_years_land_in_this_century() {
        assert_eq!(parse_date("12/10/11"), NaiveDate::from_ymd_opt(2011, 12, 10));
        assert_eq!(parse_date("5/1/23"), NaiveDate::from_ymd_opt(2023, 5, 1));
        assert_eq!(parse_date("05-01-23"), NaiveDate::from_ymd_opt(2023, 5, 1));
        assert_eq!(parse_date("5/1/23 3:45 PM"), NaiveDate::from_ymd_opt(2023, 5, 1));
        assert_eq!(format_value(&CellValue::from("12/10/11")), "12/10/2011");
        assert_eq!(format_value(&CellValue::from("5/1/23")), "05/01/2023");
    }

    #[test]
    fn numbers_switch_to_exponent_form_at_the_extremes() {
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(12.0), "12");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(-2.5e22), "-2.5e+22");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(0.000001), "0.000001");
        assert_eq!(format_number(123456789012345680000.0), "123456789012345680000");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_value(&CellValue::Float(1e21)), "1e+21");
    }

    #[test]
    fn format_value_covers_each_cell_kind() {
        assert_eq!(format_value(&CellValue::Empty), "");
        assert_eq!(format_value(&CellValue::from("  Complete ")), "Complete");
        assert_eq!(format_value(&CellValue::from(" 2023-05-01 ")), "05/01/2023");
        assert_eq!(format_value(&CellValue::Float(45047.0)), "05/01/2023");
        assert_eq!(format_value(&CellValue::Int(45047)), "05/01/2023");
        assert_eq!(format_value(&CellValue::Float(42.5)), "42.5");
        assert_eq!(format_value(&CellValue::Int(3)), "3");
        assert_eq!(format_value(&CellValue::Bool(false)), "false");
        assert_eq!(format_value(&CellValue::Error("#N/A".into())), "#N/A");

        let dt = NaiveDate::from_ymd_opt(2024, 12, 9)
            .and_then(|d| d.and_hms_opt(10, 0, 0))
            .unwrap();
        assert_eq!(format_value(&CellValue::DateTime(dt)), "12/09/2024");
    }
}
