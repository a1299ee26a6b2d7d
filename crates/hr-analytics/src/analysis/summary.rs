use super::session::SessionContext;
use super::stats::mean;
use super::views::{AnalysisView, KeyMetricsView, ProcessedDataView};
use crate::dataset::{Column, Dataset, EmployeeRecord, PeriodKey};
use std::collections::HashSet;

pub(crate) fn processed_data(session: &SessionContext) -> AnalysisView {
    let dataset = session.dataset();
    AnalysisView::ProcessedData(ProcessedDataView {
        source: session.source(),
        rows: dataset.len(),
        column_count: dataset.columns().len(),
        columns: dataset.columns().to_vec(),
        recognized: dataset.recognized(),
        missing: dataset.missing(),
        preview: dataset.preview().to_vec(),
    })
}

pub(crate) fn key_metrics(session: &SessionContext) -> AnalysisView {
    let dataset = session.dataset();
    let records = dataset.records();
    let cutoff = session.cutoff();

    let periods: HashSet<&PeriodKey> = records
        .iter()
        .filter_map(|record| record.period.as_ref())
        .filter(|period| period.is_parsed())
        .collect();

    let overtime_present = [
        Column::OvertimeNormal,
        Column::OvertimeDouble,
        Column::Overtime215,
    ]
    .into_iter()
    .any(|column| dataset.has(column));
    let total_overtime_hours = overtime_present.then(|| {
        records
            .iter()
            .filter_map(EmployeeRecord::overtime_hours)
            .sum()
    });

    AnalysisView::KeyMetrics(KeyMetricsView {
        rows: dataset.len(),
        periods: periods.len(),
        unparsed_periods: dataset.unparsed_periods(),
        latest_period: dataset.latest_period(),
        departments: distinct(dataset, Column::Department),
        roles: distinct(dataset, Column::Role),
        active_employees: dataset.has(Column::TerminationDate).then(|| {
            records
                .iter()
                .filter(|record| record.is_active_at(cutoff))
                .count()
        }),
        average_contractual_salary: average(dataset, Column::ContractualSalary),
        average_worked_days_salary: average(dataset, Column::WorkedDaysSalary),
        total_overtime_hours,
        total_absence_days: total(dataset, Column::AbsenceDays),
        average_tenure_months: average(dataset, Column::TenureMonths),
    })
}

fn values(dataset: &Dataset, column: Column) -> Vec<f64> {
    dataset
        .records()
        .iter()
        .filter_map(|record| record.amount(column))
        .collect()
}

fn average(dataset: &Dataset, column: Column) -> Option<f64> {
    if !dataset.has(column) {
        return None;
    }
    mean(&values(dataset, column))
}

fn total(dataset: &Dataset, column: Column) -> Option<f64> {
    dataset
        .has(column)
        .then(|| values(dataset, column).into_iter().sum())
}

fn distinct(dataset: &Dataset, column: Column) -> Option<usize> {
    dataset.has(column).then(|| {
        dataset
            .records()
            .iter()
            .filter_map(|record| record.category(column))
            .collect::<HashSet<_>>()
            .len()
    })
}
