use super::{AnalysisKind, AnalysisReport};
use crate::dataset::{DataSource, Dataset};
use chrono::{Local, NaiveDate};
use std::sync::Arc;

/// Everything an analysis may read: the loaded dataset and the reporting
/// cutoff. Built once per load, never mutated.
#[derive(Debug, Clone)]
pub struct SessionContext {
    dataset: Arc<Dataset>,
    source: DataSource,
    cutoff: NaiveDate,
}

impl SessionContext {
    /// Resolves the cutoff: the explicit date, else the last day of the
    /// latest parsed period, else today.
    pub fn new(dataset: Arc<Dataset>, source: DataSource, cutoff: Option<NaiveDate>) -> Self {
        let cutoff = cutoff
            .or_else(|| dataset.latest_period().map(|period| period.last_day()))
            .unwrap_or_else(|| Local::now().date_naive());
        Self {
            dataset,
            source,
            cutoff,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn source(&self) -> DataSource {
        self.source
    }

    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    pub fn run(&self, kind: AnalysisKind) -> AnalysisReport {
        kind.run(self)
    }

    pub fn run_all(&self) -> Vec<AnalysisReport> {
        AnalysisKind::ordered()
            .into_iter()
            .map(|kind| kind.run(self))
            .collect()
    }
}
