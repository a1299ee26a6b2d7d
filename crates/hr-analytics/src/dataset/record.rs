use super::columns::{Column, ColumnMap};
use super::parser::{parse_number, RawTable};
use super::period::{normalize_period, parse_date, PeriodKey, YearMonth};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

pub const PREVIEW_ROWS: usize = 10;

/// One employee-period observation. Every field is optional because exports
/// rarely carry the full column set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeRecord {
    pub period: Option<PeriodKey>,
    pub absence_days: Option<f64>,
    pub contractual_salary: Option<f64>,
    pub worked_days_salary: Option<f64>,
    pub overtime_normal: Option<f64>,
    pub overtime_double: Option<f64>,
    pub overtime_215: Option<f64>,
    pub tenure_months: Option<f64>,
    pub termination_date: Option<NaiveDate>,
    pub worked_days: Option<f64>,
    pub sick_leave_days: Option<f64>,
    pub maternity_leave_days: Option<f64>,
    pub vacation_days: Option<f64>,
    pub role: Option<String>,
    pub department: Option<String>,
    pub termination_cause: Option<String>,
}

impl EmployeeRecord {
    /// Active when no termination date is recorded or it falls after `cutoff`.
    pub fn is_active_at(&self, cutoff: NaiveDate) -> bool {
        self.termination_date.map_or(true, |date| date > cutoff)
    }

    /// Sum of the overtime columns present on this row, `None` when none is.
    pub fn overtime_hours(&self) -> Option<f64> {
        [self.overtime_normal, self.overtime_double, self.overtime_215]
            .into_iter()
            .flatten()
            .fold(None, |total, hours| Some(total.unwrap_or(0.0) + hours))
    }

    pub fn amount(&self, column: Column) -> Option<f64> {
        match column {
            Column::AbsenceDays => self.absence_days,
            Column::ContractualSalary => self.contractual_salary,
            Column::WorkedDaysSalary => self.worked_days_salary,
            Column::OvertimeNormal => self.overtime_normal,
            Column::OvertimeDouble => self.overtime_double,
            Column::Overtime215 => self.overtime_215,
            Column::TenureMonths => self.tenure_months,
            Column::WorkedDays => self.worked_days,
            Column::SickLeaveDays => self.sick_leave_days,
            Column::MaternityLeaveDays => self.maternity_leave_days,
            Column::VacationDays => self.vacation_days,
            Column::Period
            | Column::TerminationDate
            | Column::Role
            | Column::Department
            | Column::TerminationCause => None,
        }
    }

    pub fn category(&self, column: Column) -> Option<&str> {
        match column {
            Column::Role => self.role.as_deref(),
            Column::Department => self.department.as_deref(),
            Column::TerminationCause => self.termination_cause.as_deref(),
            _ => None,
        }
    }

    fn assign(&mut self, column: Column, raw: &str) {
        match column {
            Column::Period => self.period = Some(normalize_period(raw)),
            Column::TerminationDate => self.termination_date = parse_date(raw),
            Column::Role => self.role = non_empty(raw),
            Column::Department => self.department = non_empty(raw),
            Column::TerminationCause => self.termination_cause = non_empty(raw),
            Column::AbsenceDays => self.absence_days = non_negative(raw),
            Column::ContractualSalary => self.contractual_salary = non_negative(raw),
            Column::WorkedDaysSalary => self.worked_days_salary = non_negative(raw),
            Column::OvertimeNormal => self.overtime_normal = non_negative(raw),
            Column::OvertimeDouble => self.overtime_double = non_negative(raw),
            Column::Overtime215 => self.overtime_215 = non_negative(raw),
            Column::TenureMonths => self.tenure_months = non_negative(raw),
            Column::WorkedDays => self.worked_days = non_negative(raw),
            Column::SickLeaveDays => self.sick_leave_days = non_negative(raw),
            Column::MaternityLeaveDays => self.maternity_leave_days = non_negative(raw),
            Column::VacationDays => self.vacation_days = non_negative(raw),
        }
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn non_negative(raw: &str) -> Option<f64> {
    parse_number(raw).filter(|value| *value >= 0.0)
}

/// Loaded dataset. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: Vec<String>,
    present: BTreeSet<Column>,
    records: Vec<EmployeeRecord>,
    preview: Vec<Vec<String>>,
}

impl Dataset {
    /// Renames the headers with `map` and parses every row. Cells that fail
    /// to parse become `None` on their record; no row is dropped.
    pub(crate) fn from_table(table: RawTable, map: &ColumnMap) -> Self {
        let columns = map.rename(&table.headers);

        // First occurrence wins when two headers rename to the same column.
        let mut positions: HashMap<Column, usize> = HashMap::new();
        for (index, name) in columns.iter().enumerate() {
            if let Some(column) = Column::from_canonical(name) {
                positions.entry(column).or_insert(index);
            }
        }
        let present = positions.keys().copied().collect();

        let records = table
            .rows
            .iter()
            .map(|row| {
                let mut record = EmployeeRecord::default();
                for (column, index) in &positions {
                    let raw = row.get(*index).map(String::as_str).unwrap_or("");
                    record.assign(*column, raw);
                }
                record
            })
            .collect();

        let preview = table.rows.into_iter().take(PREVIEW_ROWS).collect();

        Self {
            columns,
            present,
            records,
            preview,
        }
    }

    /// Builds a dataset straight from records, declaring which columns exist.
    pub fn from_records<I>(present: I, records: Vec<EmployeeRecord>) -> Self
    where
        I: IntoIterator<Item = Column>,
    {
        let present: BTreeSet<Column> = present.into_iter().collect();
        let columns = present
            .iter()
            .map(|column| column.canonical_name().to_string())
            .collect();
        Self {
            columns,
            present,
            records,
            preview: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[EmployeeRecord] {
        &self.records
    }

    /// Header names after renaming, in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has(&self, column: Column) -> bool {
        self.present.contains(&column)
    }

    pub fn recognized(&self) -> Vec<Column> {
        self.present.iter().copied().collect()
    }

    pub fn missing(&self) -> Vec<Column> {
        Column::ordered()
            .into_iter()
            .filter(|column| !self.has(*column))
            .collect()
    }

    pub fn preview(&self) -> &[Vec<String>] {
        &self.preview
    }

    pub fn latest_period(&self) -> Option<YearMonth> {
        self.records
            .iter()
            .filter_map(|record| record.period.as_ref().and_then(PeriodKey::month))
            .max()
    }

    pub fn unparsed_periods(&self) -> usize {
        self.records
            .iter()
            .filter(|record| matches!(record.period, Some(PeriodKey::Unparsed(_))))
            .count()
    }
}
