use super::session::SessionContext;
use super::stats::{count_by, share};
use super::views::{AnalysisView, CategoryShare, TerminationCausesView};

/// Distribution of recorded termination causes. Rows with a blank cause are
/// not terminations and are left out.
pub(crate) fn termination_causes(session: &SessionContext) -> AnalysisView {
    let causes: Vec<&str> = session
        .dataset()
        .records()
        .iter()
        .filter_map(|record| record.termination_cause.as_deref())
        .collect();
    let total_terminations = causes.len();

    let causes = count_by(causes.into_iter().map(Some))
        .into_iter()
        .map(|entry| CategoryShare {
            share: share(entry.count as f64, total_terminations as f64),
            label: entry.label,
            count: entry.count,
        })
        .collect();

    AnalysisView::TerminationCauses(TerminationCausesView {
        total_terminations,
        causes,
    })
}
