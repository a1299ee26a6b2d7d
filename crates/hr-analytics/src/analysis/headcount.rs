use super::session::SessionContext;
use super::stats::count_by;
use super::views::{AnalysisView, HeadcountView, PeriodCount};
use crate::dataset::{Column, PeriodKey};
use std::collections::BTreeMap;

/// Records per period and per department. Rows with a blank or unreadable
/// period still count, under their raw text.
pub(crate) fn headcount(session: &SessionContext) -> AnalysisView {
    let dataset = session.dataset();
    let records = dataset.records();

    let by_period = if dataset.has(Column::Period) {
        let mut counts: BTreeMap<&PeriodKey, usize> = BTreeMap::new();
        for period in records.iter().filter_map(|record| record.period.as_ref()) {
            *counts.entry(period).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(period, count)| PeriodCount {
                period: period.to_string(),
                parsed: period.is_parsed(),
                count,
            })
            .collect()
    } else {
        Vec::new()
    };

    let by_department = if dataset.has(Column::Department) {
        count_by(records.iter().map(|record| record.department.as_deref()))
    } else {
        Vec::new()
    };

    AnalysisView::Headcount(HeadcountView {
        total: records.len(),
        by_period,
        by_department,
    })
}
