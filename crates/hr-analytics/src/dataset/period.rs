use super::normalizer::fold_accents;
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};
use std::fmt;

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2100;

/// Calendar reporting bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        let valid = (MIN_YEAR..=MAX_YEAR).contains(&year) && (1..=12).contains(&month);
        valid.then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn last_day(self) -> NaiveDate {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|next| next.checked_sub_signed(Duration::days(1)))
            .unwrap_or(NaiveDate::MAX)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Normalized period. Parsed months sort before every unparsed value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodKey {
    Month(YearMonth),
    Unparsed(String),
}

impl PeriodKey {
    pub fn month(&self) -> Option<YearMonth> {
        match self {
            Self::Month(month) => Some(*month),
            Self::Unparsed(_) => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Self::Month(_))
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month(month) => month.fmt(f),
            Self::Unparsed(raw) => f.write_str(raw),
        }
    }
}

/// Maps a free-form period cell to a [`PeriodKey`]. Never fails: anything
/// that does not look like a month keeps its trimmed text.
pub fn normalize_period(raw: &str) -> PeriodKey {
    let trimmed = raw.trim();
    match parse_year_month(trimmed) {
        Some(month) => PeriodKey::Month(month),
        None => PeriodKey::Unparsed(trimmed.to_string()),
    }
}

fn parse_year_month(value: &str) -> Option<YearMonth> {
    if value.is_empty() {
        return None;
    }

    if let Some(month) = parse_compact(value) {
        return Some(month);
    }

    if let Some(date) = parse_date(value) {
        return YearMonth::new(date.year(), date.month());
    }

    parse_numeric_pair(value).or_else(|| parse_month_name(value))
}

/// `202401`
fn parse_compact(value: &str) -> Option<YearMonth> {
    if value.len() != 6 || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let year = value[..4].parse().ok()?;
    let month = value[4..].parse().ok()?;
    YearMonth::new(year, month)
}

/// `2024-01`, `2024/1`, `01/2024`, `1.2024`
fn parse_numeric_pair(value: &str) -> Option<YearMonth> {
    let parts: Vec<&str> = value
        .split(['-', '/', '.', ' '])
        .filter(|part| !part.is_empty())
        .collect();
    let [first, second] = parts.as_slice() else {
        return None;
    };
    if !first.bytes().all(|b| b.is_ascii_digit()) || !second.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    match (first.len(), second.len()) {
        (4, 1..=2) => YearMonth::new(first.parse().ok()?, second.parse().ok()?),
        (1..=2, 4) => YearMonth::new(second.parse().ok()?, first.parse().ok()?),
        _ => None,
    }
}

/// `Enero 2024`, `ene-24`, `2024 Diciembre`, `January 2024`
fn parse_month_name(value: &str) -> Option<YearMonth> {
    let folded = fold_accents(value);
    let tokens: Vec<&str> = folded
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .collect();
    if tokens.len() != 2 {
        return None;
    }

    let (name, year) = if tokens[0].chars().all(char::is_alphabetic) {
        (tokens[0], tokens[1])
    } else {
        (tokens[1], tokens[0])
    };

    let month = month_from_name(name)?;
    let year: i32 = match year.len() {
        4 => year.parse().ok()?,
        2 => 2000 + year.parse::<i32>().ok()?,
        _ => return None,
    };
    YearMonth::new(year, month)
}

fn month_from_name(name: &str) -> Option<u32> {
    if name.len() < 3 {
        return None;
    }
    let month = match name.get(..3)? {
        "ene" | "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "abr" | "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "ago" | "aug" => 8,
        "sep" | "set" => 9,
        "oct" => 10,
        "nov" => 11,
        "dic" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Parses the date shapes seen in payroll exports. Returns `None` rather than
/// guessing when the text is ambiguous or empty.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc().date());
    }

    const DATETIME_FORMATS: &[&str] = &[
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%d-%m-%Y %H:%M:%S",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ];
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.date());
        }
    }

    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%d/%m/%Y", "%d.%m.%Y"];
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date).filter(|date| (MIN_YEAR..=MAX_YEAR).contains(&date.year()));
        }
    }

    parse_excel_serial(trimmed)
}

/// Day numbers as written by spreadsheets, counted from 1899-12-30.
fn parse_excel_serial(value: &str) -> Option<NaiveDate> {
    if value.len() != 5 || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let days: i64 = value.parse().ok()?;
    excel_serial_to_date(days as f64)
}

/// Serial of 9999-12-31, the last day a spreadsheet can hold.
const MAX_EXCEL_SERIAL: f64 = 2_958_465.0;

pub(crate) fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}
