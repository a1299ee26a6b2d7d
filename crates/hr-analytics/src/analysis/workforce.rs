use super::session::SessionContext;
use super::stats::{count_by, label_or_unspecified, share};
use super::views::{ActiveAtCutoffView, ActiveInactiveView, ActivitySplit, AnalysisView};
use crate::dataset::{EmployeeRecord, PeriodKey, YearMonth};
use std::collections::BTreeMap;

/// Employees still active on the cutoff date. When the dataset has rows for
/// the cutoff's month only those rows are counted, so monthly exports do not
/// count the same person once per period.
pub(crate) fn active_at_cutoff(session: &SessionContext) -> AnalysisView {
    let cutoff = session.cutoff();
    let records = session.dataset().records();
    let month = YearMonth::of(cutoff);

    let in_month: Vec<&EmployeeRecord> = records
        .iter()
        .filter(|record| record.period.as_ref().and_then(PeriodKey::month) == Some(month))
        .collect();
    let (snapshot_period, considered) = if in_month.is_empty() {
        (None, records.iter().collect())
    } else {
        (Some(month), in_month)
    };

    let active: Vec<&EmployeeRecord> = considered
        .iter()
        .copied()
        .filter(|record| record.is_active_at(cutoff))
        .collect();

    AnalysisView::ActiveAtCutoff(ActiveAtCutoffView {
        cutoff,
        snapshot_period,
        records_considered: considered.len(),
        active: active.len(),
        by_department: count_by(active.iter().map(|record| record.department.as_deref())),
    })
}

pub(crate) fn active_vs_inactive(session: &SessionContext) -> AnalysisView {
    let cutoff = session.cutoff();
    let records = session.dataset().records();

    let mut departments: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    let mut active = 0;
    for record in records {
        let split = departments
            .entry(label_or_unspecified(record.department.as_deref()))
            .or_default();
        if record.is_active_at(cutoff) {
            active += 1;
            split.0 += 1;
        } else {
            split.1 += 1;
        }
    }

    let total = records.len();
    let inactive = total - active;
    AnalysisView::ActiveVsInactive(ActiveInactiveView {
        cutoff,
        total,
        active,
        inactive,
        active_share: share(active as f64, total as f64),
        inactive_share: share(inactive as f64, total as f64),
        by_department: departments
            .into_iter()
            .map(|(label, (active, inactive))| ActivitySplit {
                label,
                active,
                inactive,
            })
            .collect(),
    })
}
