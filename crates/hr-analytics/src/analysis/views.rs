use crate::dataset::{Column, DataSource, YearMonth};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub label: String,
    pub count: usize,
    pub share: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedDataView {
    pub source: DataSource,
    pub rows: usize,
    pub column_count: usize,
    pub columns: Vec<String>,
    pub recognized: Vec<Column>,
    pub missing: Vec<Column>,
    pub preview: Vec<Vec<String>>,
}

/// Dataset-wide figures. A metric is `None` when its column is absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyMetricsView {
    pub rows: usize,
    pub periods: usize,
    pub unparsed_periods: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_period: Option<YearMonth>,
    pub departments: Option<usize>,
    pub roles: Option<usize>,
    pub active_employees: Option<usize>,
    pub average_contractual_salary: Option<f64>,
    pub average_worked_days_salary: Option<f64>,
    pub total_overtime_hours: Option<f64>,
    pub total_absence_days: Option<f64>,
    pub average_tenure_months: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricTotal {
    pub column: Column,
    pub label: &'static str,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OvertimeSalaryView {
    /// `x` = overtime hours on the row, `y` = contractual salary.
    pub points: Vec<ScatterPoint>,
    pub correlation: Option<f64>,
    pub overtime_totals: Vec<MetricTotal>,
    pub skipped_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbsenceSalaryBucket {
    pub absence_days: i64,
    pub records: usize,
    pub average_salary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbsenceSalaryView {
    /// `x` = absence days, `y` = salary for days worked.
    pub points: Vec<ScatterPoint>,
    pub correlation: Option<f64>,
    pub by_absence_days: Vec<AbsenceSalaryBucket>,
    pub skipped_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenureBucket {
    pub label: &'static str,
    pub min_months: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_months: Option<u32>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TenureView {
    pub buckets: Vec<TenureBucket>,
    pub records: usize,
    pub average_months: Option<f64>,
    pub median_months: Option<f64>,
    pub skipped_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodCount {
    pub period: String,
    pub parsed: bool,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadcountView {
    pub total: usize,
    pub by_period: Vec<PeriodCount>,
    pub by_department: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbsenceComponent {
    pub column: Column,
    pub label: &'static str,
    pub days: f64,
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbsenceCompositionView {
    pub total_days: f64,
    pub components: Vec<AbsenceComponent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveAtCutoffView {
    pub cutoff: NaiveDate,
    /// Month the snapshot was restricted to, when the dataset covers it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_period: Option<YearMonth>,
    pub records_considered: usize,
    pub active: usize,
    pub by_department: Vec<CategoryCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySplit {
    pub label: String,
    pub active: usize,
    pub inactive: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveInactiveView {
    pub cutoff: NaiveDate,
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub active_share: f64,
    pub inactive_share: f64,
    pub by_department: Vec<ActivitySplit>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbsenceCell {
    pub role: String,
    pub department: String,
    pub absence_days: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AbsenceMatrixView {
    pub cells: Vec<AbsenceCell>,
    pub roles: Vec<String>,
    pub departments: Vec<String>,
    pub total_days: f64,
}

impl AbsenceMatrixView {
    pub fn days_for(&self, role: &str, department: &str) -> Option<f64> {
        self.cells
            .iter()
            .find(|cell| cell.role == role && cell.department == department)
            .map(|cell| cell.absence_days)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerminationCausesView {
    pub total_terminations: usize,
    pub causes: Vec<CategoryShare>,
}

impl TerminationCausesView {
    pub fn count_for(&self, cause: &str) -> Option<usize> {
        self.causes
            .iter()
            .find(|entry| entry.label == cause)
            .map(|entry| entry.count)
    }
}

/// Chart-ready payload of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum AnalysisView {
    ProcessedData(ProcessedDataView),
    KeyMetrics(KeyMetricsView),
    OvertimeVsSalary(OvertimeSalaryView),
    AbsencesVsSalary(AbsenceSalaryView),
    Tenure(TenureView),
    Headcount(HeadcountView),
    AbsenceComposition(AbsenceCompositionView),
    ActiveAtCutoff(ActiveAtCutoffView),
    ActiveVsInactive(ActiveInactiveView),
    AbsencesByRoleAndDepartment(AbsenceMatrixView),
    TerminationCauses(TerminationCausesView),
}
