use super::normalizer::normalize_header;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Canonical columns understood by the analyses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Column {
    #[serde(rename = "Periodo")]
    Period,
    #[serde(rename = "DiasFalta")]
    AbsenceDays,
    #[serde(rename = "SueldoBrutoContractual")]
    ContractualSalary,
    #[serde(rename = "SueldoBrutoDiasTrab")]
    WorkedDaysSalary,
    #[serde(rename = "HrsExt_Normales")]
    OvertimeNormal,
    #[serde(rename = "HrsExt_Dobles")]
    OvertimeDouble,
    #[serde(rename = "HrsExt_215")]
    Overtime215,
    #[serde(rename = "AntiguedadMes")]
    TenureMonths,
    #[serde(rename = "FechaTerminoContrato")]
    TerminationDate,
    #[serde(rename = "DiasTrabajados")]
    WorkedDays,
    #[serde(rename = "DiasLicenciaNormales")]
    SickLeaveDays,
    #[serde(rename = "DiasLicenciaMaternales")]
    MaternityLeaveDays,
    #[serde(rename = "DiasVacaciones")]
    VacationDays,
    #[serde(rename = "Cargo")]
    Role,
    #[serde(rename = "Gerencia")]
    Department,
    #[serde(rename = "Causal de Término")]
    TerminationCause,
}

impl Column {
    pub const fn ordered() -> [Self; 16] {
        [
            Self::Period,
            Self::AbsenceDays,
            Self::ContractualSalary,
            Self::WorkedDaysSalary,
            Self::OvertimeNormal,
            Self::OvertimeDouble,
            Self::Overtime215,
            Self::TenureMonths,
            Self::TerminationDate,
            Self::WorkedDays,
            Self::SickLeaveDays,
            Self::MaternityLeaveDays,
            Self::VacationDays,
            Self::Role,
            Self::Department,
            Self::TerminationCause,
        ]
    }

    /// Name the column carries after renaming.
    pub const fn canonical_name(self) -> &'static str {
        match self {
            Self::Period => "Periodo",
            Self::AbsenceDays => "DiasFalta",
            Self::ContractualSalary => "SueldoBrutoContractual",
            Self::WorkedDaysSalary => "SueldoBrutoDiasTrab",
            Self::OvertimeNormal => "HrsExt_Normales",
            Self::OvertimeDouble => "HrsExt_Dobles",
            Self::Overtime215 => "HrsExt_215",
            Self::TenureMonths => "AntiguedadMes",
            Self::TerminationDate => "FechaTerminoContrato",
            Self::WorkedDays => "DiasTrabajados",
            Self::SickLeaveDays => "DiasLicenciaNormales",
            Self::MaternityLeaveDays => "DiasLicenciaMaternales",
            Self::VacationDays => "DiasVacaciones",
            Self::Role => "Cargo",
            Self::Department => "Gerencia",
            Self::TerminationCause => "Causal de Término",
        }
    }

    /// Human-readable header found in payroll exports.
    pub const fn source_name(self) -> &'static str {
        match self {
            Self::Period => "Período",
            Self::AbsenceDays => "Días de Falta",
            Self::ContractualSalary => "Sueldo Bruto Contractual",
            Self::WorkedDaysSalary => "Sueldo Bruto (días trabajados)",
            Self::OvertimeNormal => "Cantidad de Horas Extras Normales",
            Self::OvertimeDouble => "Cantidad de Horas Extras al Doble",
            Self::Overtime215 => "Cantidad de Horas Extras al 215%",
            Self::TenureMonths => "Antigüedad al corte de mes",
            Self::TerminationDate => "Fecha de Término Contrato",
            Self::WorkedDays => "Días Trabajados",
            Self::SickLeaveDays => "Días de Licencia Normales",
            Self::MaternityLeaveDays => "Días de Licencia Maternales",
            Self::VacationDays => "Días de Vacaciones",
            Self::Role => "Cargo",
            Self::Department => "Gerencia",
            Self::TerminationCause => "Causal de Término",
        }
    }

    pub fn from_canonical(name: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|column| column.canonical_name() == name)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Rename table from arbitrary source headers to canonical names.
///
/// Lookups go through [`normalize_header`], so spacing and case differences
/// in exported files still match. Headers with no entry pass through as-is.
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    entries: HashMap<String, String>,
}

impl ColumnMap {
    pub fn new<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(source, target)| (normalize_header(source.as_ref()), target.into()))
            .collect();
        Self { entries }
    }

    /// The payroll export table, also accepting headers that are already
    /// canonical.
    pub fn standard() -> &'static ColumnMap {
        static STANDARD: OnceLock<ColumnMap> = OnceLock::new();
        STANDARD.get_or_init(|| {
            let pairs = Column::ordered().into_iter().flat_map(|column| {
                [
                    (column.source_name(), column.canonical_name()),
                    (column.canonical_name(), column.canonical_name()),
                ]
            });
            ColumnMap::new(pairs)
        })
    }

    pub fn lookup(&self, header: &str) -> Option<&str> {
        self.entries
            .get(&normalize_header(header))
            .map(String::as_str)
    }

    pub fn rename(&self, headers: &[String]) -> Vec<String> {
        headers
            .iter()
            .map(|header| match self.lookup(header) {
                Some(target) => target.to_string(),
                None => header.clone(),
            })
            .collect()
    }
}
