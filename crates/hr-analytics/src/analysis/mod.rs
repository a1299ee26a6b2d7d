mod absences;
mod compensation;
mod headcount;
mod session;
mod stats;
mod summary;
mod tenure;
mod terminations;
pub mod views;
mod workforce;

pub use session::SessionContext;
pub use stats::UNSPECIFIED;
pub use views::AnalysisView;

use crate::dataset::{Column, Dataset};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// The fixed menu of canned analyses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisKind {
    ProcessedData,
    KeyMetrics,
    OvertimeVsSalary,
    AbsencesVsSalary,
    Tenure,
    Headcount,
    AbsenceComposition,
    ActiveAtCutoff,
    ActiveVsInactive,
    AbsencesByRoleAndDepartment,
    TerminationCauses,
}

/// Columns an analysis needs before it can produce anything useful.
#[derive(Debug, Clone, Copy)]
pub enum Requirement {
    All(&'static [Column]),
    AnyOf(&'static [Column]),
}

impl Requirement {
    fn missing(self, dataset: &Dataset) -> Vec<Column> {
        match self {
            Self::All(columns) => columns
                .iter()
                .copied()
                .filter(|column| !dataset.has(*column))
                .collect(),
            Self::AnyOf(columns) if columns.iter().any(|column| dataset.has(*column)) => Vec::new(),
            Self::AnyOf(columns) => columns.to_vec(),
        }
    }
}

const OVERTIME_COLUMNS: &[Column] = &[
    Column::OvertimeNormal,
    Column::OvertimeDouble,
    Column::Overtime215,
];

const ABSENCE_COLUMNS: &[Column] = &[
    Column::SickLeaveDays,
    Column::MaternityLeaveDays,
    Column::VacationDays,
    Column::AbsenceDays,
];

const OVERTIME_VS_SALARY: &[Requirement] = &[
    Requirement::All(&[Column::ContractualSalary]),
    Requirement::AnyOf(OVERTIME_COLUMNS),
];
const ABSENCES_VS_SALARY: &[Requirement] =
    &[Requirement::All(&[Column::AbsenceDays, Column::WorkedDaysSalary])];
const TENURE: &[Requirement] = &[Requirement::All(&[Column::TenureMonths])];
const ABSENCE_COMPOSITION: &[Requirement] = &[Requirement::AnyOf(ABSENCE_COLUMNS)];
const ACTIVITY: &[Requirement] = &[Requirement::All(&[Column::TerminationDate])];
const ROLE_DEPARTMENT_ABSENCES: &[Requirement] = &[Requirement::All(&[
    Column::Role,
    Column::Department,
    Column::AbsenceDays,
])];
const TERMINATION_CAUSES: &[Requirement] = &[Requirement::All(&[Column::TerminationCause])];

type Analyzer = fn(&SessionContext) -> AnalysisView;

impl AnalysisKind {
    pub const fn ordered() -> [Self; 11] {
        [
            Self::ProcessedData,
            Self::KeyMetrics,
            Self::OvertimeVsSalary,
            Self::AbsencesVsSalary,
            Self::Tenure,
            Self::Headcount,
            Self::AbsenceComposition,
            Self::ActiveAtCutoff,
            Self::ActiveVsInactive,
            Self::AbsencesByRoleAndDepartment,
            Self::TerminationCauses,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::ProcessedData => "Datos Procesados",
            Self::KeyMetrics => "Métricas Clave",
            Self::OvertimeVsSalary => "Horas Extras vs. Sueldos",
            Self::AbsencesVsSalary => "Faltas vs. Sueldo",
            Self::Tenure => "Antigüedad",
            Self::Headcount => "Dotación",
            Self::AbsenceComposition => "Composición de Ausencias",
            Self::ActiveAtCutoff => "Empleados Activos (Corte)",
            Self::ActiveVsInactive => "Empleados Activos vs Inactivos",
            Self::AbsencesByRoleAndDepartment => "Faltas por Cargo y Departamento",
            Self::TerminationCauses => "Causales de Término",
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::ProcessedData => "processed-data",
            Self::KeyMetrics => "key-metrics",
            Self::OvertimeVsSalary => "overtime-vs-salary",
            Self::AbsencesVsSalary => "absences-vs-salary",
            Self::Tenure => "tenure",
            Self::Headcount => "headcount",
            Self::AbsenceComposition => "absence-composition",
            Self::ActiveAtCutoff => "active-at-cutoff",
            Self::ActiveVsInactive => "active-vs-inactive",
            Self::AbsencesByRoleAndDepartment => "absences-by-role-and-department",
            Self::TerminationCauses => "termination-causes",
        }
    }

    pub fn requirements(self) -> &'static [Requirement] {
        match self {
            Self::ProcessedData | Self::KeyMetrics | Self::Headcount => &[],
            Self::OvertimeVsSalary => OVERTIME_VS_SALARY,
            Self::AbsencesVsSalary => ABSENCES_VS_SALARY,
            Self::Tenure => TENURE,
            Self::AbsenceComposition => ABSENCE_COMPOSITION,
            Self::ActiveAtCutoff | Self::ActiveVsInactive => ACTIVITY,
            Self::AbsencesByRoleAndDepartment => ROLE_DEPARTMENT_ABSENCES,
            Self::TerminationCauses => TERMINATION_CAUSES,
        }
    }

    fn analyzer(self) -> Analyzer {
        match self {
            Self::ProcessedData => summary::processed_data,
            Self::KeyMetrics => summary::key_metrics,
            Self::OvertimeVsSalary => compensation::overtime_vs_salary,
            Self::AbsencesVsSalary => compensation::absences_vs_salary,
            Self::Tenure => tenure::tenure_distribution,
            Self::Headcount => headcount::headcount,
            Self::AbsenceComposition => absences::absence_composition,
            Self::ActiveAtCutoff => workforce::active_at_cutoff,
            Self::ActiveVsInactive => workforce::active_vs_inactive,
            Self::AbsencesByRoleAndDepartment => absences::absences_by_role_and_department,
            Self::TerminationCauses => terminations::termination_causes,
        }
    }

    /// Columns this analysis needs that `dataset` lacks.
    pub fn missing_columns(self, dataset: &Dataset) -> Vec<Column> {
        let mut missing: Vec<Column> = self
            .requirements()
            .iter()
            .flat_map(|requirement| requirement.missing(dataset))
            .collect();
        missing.sort();
        missing.dedup();
        missing
    }

    pub fn run(self, session: &SessionContext) -> AnalysisReport {
        let missing = self.missing_columns(session.dataset());
        let outcome = if missing.is_empty() {
            debug!(analysis = self.slug(), rows = session.dataset().len(), "running analysis");
            AnalysisOutcome::Ready {
                result: (self.analyzer())(session),
            }
        } else {
            warn!(analysis = self.slug(), ?missing, "analysis unavailable");
            AnalysisOutcome::Unavailable { missing }
        };

        AnalysisReport {
            kind: self,
            label: self.label(),
            outcome,
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAnalysis(pub String);

impl fmt::Display for UnknownAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown analysis '{}'", self.0)
    }
}

impl std::error::Error for UnknownAnalysis {}

impl FromStr for AnalysisKind {
    type Err = UnknownAnalysis;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase().replace('_', "-");
        Self::ordered()
            .into_iter()
            .find(|kind| kind.slug() == wanted)
            .ok_or_else(|| UnknownAnalysis(value.to_string()))
    }
}

/// Result of one analysis: a view, or the columns that kept it from running.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Ready { result: AnalysisView },
    Unavailable { missing: Vec<Column> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub kind: AnalysisKind,
    pub label: &'static str,
    pub outcome: AnalysisOutcome,
}

impl AnalysisReport {
    pub fn view(&self) -> Option<&AnalysisView> {
        match &self.outcome {
            AnalysisOutcome::Ready { result } => Some(result),
            AnalysisOutcome::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.view().is_some()
    }
}
