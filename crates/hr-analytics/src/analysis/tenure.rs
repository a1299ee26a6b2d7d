use super::session::SessionContext;
use super::stats::{mean, median};
use super::views::{AnalysisView, TenureBucket, TenureView};

/// `(label, min_months, max_months)`; the upper bound is exclusive.
const TENURE_BANDS: [(&str, u32, Option<u32>); 5] = [
    ("< 1 year", 0, Some(12)),
    ("1-2 years", 12, Some(24)),
    ("2-5 years", 24, Some(60)),
    ("5-10 years", 60, Some(120)),
    ("10+ years", 120, None),
];

pub(crate) fn tenure_distribution(session: &SessionContext) -> AnalysisView {
    let records = session.dataset().records();
    let months: Vec<f64> = records
        .iter()
        .filter_map(|record| record.tenure_months)
        .collect();

    let buckets = TENURE_BANDS
        .into_iter()
        .map(|(label, min_months, max_months)| TenureBucket {
            label,
            min_months,
            max_months,
            count: months
                .iter()
                .filter(|value| {
                    **value >= f64::from(min_months)
                        && max_months.map_or(true, |max| **value < f64::from(max))
                })
                .count(),
        })
        .collect();

    AnalysisView::Tenure(TenureView {
        buckets,
        records: months.len(),
        average_months: mean(&months),
        median_months: median(&months),
        skipped_rows: records.len() - months.len(),
    })
}
