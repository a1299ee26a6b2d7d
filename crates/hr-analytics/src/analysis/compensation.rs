use super::session::SessionContext;
use super::stats::pearson;
use super::views::{
    AbsenceSalaryBucket, AbsenceSalaryView, AnalysisView, MetricTotal, OvertimeSalaryView,
    ScatterPoint,
};
use crate::dataset::Column;
use std::collections::BTreeMap;

const OVERTIME_TYPES: [(Column, &str); 3] = [
    (Column::OvertimeNormal, "Normales"),
    (Column::OvertimeDouble, "Al doble"),
    (Column::Overtime215, "Al 215%"),
];

pub(crate) fn overtime_vs_salary(session: &SessionContext) -> AnalysisView {
    let dataset = session.dataset();
    let mut points = Vec::new();
    let mut skipped_rows = 0;

    for record in dataset.records() {
        match (record.overtime_hours(), record.contractual_salary) {
            (Some(hours), Some(salary)) => points.push(ScatterPoint { x: hours, y: salary }),
            _ => skipped_rows += 1,
        }
    }

    let overtime_totals = OVERTIME_TYPES
        .into_iter()
        .filter(|(column, _)| dataset.has(*column))
        .map(|(column, label)| MetricTotal {
            column,
            label,
            total: dataset
                .records()
                .iter()
                .filter_map(|record| record.amount(column))
                .sum(),
        })
        .collect();

    AnalysisView::OvertimeVsSalary(OvertimeSalaryView {
        correlation: pearson(&points),
        points,
        overtime_totals,
        skipped_rows,
    })
}

pub(crate) fn absences_vs_salary(session: &SessionContext) -> AnalysisView {
    let mut points = Vec::new();
    let mut skipped_rows = 0;
    let mut buckets: BTreeMap<i64, (usize, f64)> = BTreeMap::new();

    for record in session.dataset().records() {
        let (Some(days), Some(salary)) = (record.absence_days, record.worked_days_salary) else {
            skipped_rows += 1;
            continue;
        };
        points.push(ScatterPoint { x: days, y: salary });
        let bucket = buckets.entry(days.round() as i64).or_default();
        bucket.0 += 1;
        bucket.1 += salary;
    }

    let by_absence_days = buckets
        .into_iter()
        .map(|(absence_days, (records, salary_sum))| AbsenceSalaryBucket {
            absence_days,
            records,
            average_salary: salary_sum / records as f64,
        })
        .collect();

    AnalysisView::AbsencesVsSalary(AbsenceSalaryView {
        correlation: pearson(&points),
        points,
        by_absence_days,
        skipped_rows,
    })
}
