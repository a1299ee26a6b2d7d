use hr_analytics::analysis::views::{AnalysisView, CategoryCount};
use hr_analytics::analysis::{AnalysisOutcome, AnalysisReport, SessionContext};

/// Plain-text rendering of one session's reports, one section per analysis.
pub(crate) fn render_session(session: &SessionContext, reports: &[AnalysisReport]) -> String {
    let dataset = session.dataset();
    let mut lines = vec![
        "HR analytics dashboard".to_string(),
        format!(
            "Rows: {} | Recognized columns: {}/{} | Cutoff: {}",
            dataset.len(),
            dataset.recognized().len(),
            dataset.recognized().len() + dataset.missing().len(),
            session.cutoff()
        ),
    ];

    for report in reports {
        lines.push(String::new());
        lines.extend(render_report(report));
    }

    lines.join("\n")
}

pub(crate) fn render_report(report: &AnalysisReport) -> Vec<String> {
    let mut lines = vec![format!("== {} ({}) ==", report.label, report.kind)];
    match &report.outcome {
        AnalysisOutcome::Unavailable { missing } => {
            let names: Vec<&str> = missing.iter().map(|column| column.canonical_name()).collect();
            lines.push(format!("Unavailable: missing columns {}", names.join(", ")));
        }
        AnalysisOutcome::Ready { result } => render_view(result, &mut lines),
    }
    lines
}

fn render_view(view: &AnalysisView, lines: &mut Vec<String>) {
    match view {
        AnalysisView::ProcessedData(data) => {
            lines.push(format!(
                "Source: {:?} | {} rows x {} columns",
                data.source, data.rows, data.column_count
            ));
            lines.push(format!("Columns: {}", data.columns.join(", ")));
            for row in &data.preview {
                lines.push(format!("  {}", row.join(" | ")));
            }
        }
        AnalysisView::KeyMetrics(metrics) => {
            lines.push(format!(
                "Rows {} | Periods {} ({} unparsed) | Latest {}",
                metrics.rows,
                metrics.periods,
                metrics.unparsed_periods,
                optional(metrics.latest_period)
            ));
            lines.push(format!(
                "Departments {} | Roles {} | Active employees {}",
                optional(metrics.departments),
                optional(metrics.roles),
                optional(metrics.active_employees)
            ));
            lines.push(format!(
                "Avg contractual salary {} | Avg worked-days salary {}",
                amount(metrics.average_contractual_salary),
                amount(metrics.average_worked_days_salary)
            ));
            lines.push(format!(
                "Overtime hours {} | Absence days {} | Avg tenure {} months",
                amount(metrics.total_overtime_hours),
                amount(metrics.total_absence_days),
                amount(metrics.average_tenure_months)
            ));
        }
        AnalysisView::OvertimeVsSalary(overtime) => {
            lines.push(format!(
                "{} points ({} skipped) | correlation {}",
                overtime.points.len(),
                overtime.skipped_rows,
                correlation(overtime.correlation)
            ));
            for total in &overtime.overtime_totals {
                lines.push(format!("- {}: {:.1} hours", total.label, total.total));
            }
        }
        AnalysisView::AbsencesVsSalary(absences) => {
            lines.push(format!(
                "{} points ({} skipped) | correlation {}",
                absences.points.len(),
                absences.skipped_rows,
                correlation(absences.correlation)
            ));
            for bucket in &absences.by_absence_days {
                lines.push(format!(
                    "- {} days: {} records, avg salary {:.0}",
                    bucket.absence_days, bucket.records, bucket.average_salary
                ));
            }
        }
        AnalysisView::Tenure(tenure) => {
            lines.push(format!(
                "{} records ({} skipped) | avg {} | median {} months",
                tenure.records,
                tenure.skipped_rows,
                amount(tenure.average_months),
                amount(tenure.median_months)
            ));
            for bucket in &tenure.buckets {
                lines.push(format!("- {}: {}", bucket.label, bucket.count));
            }
        }
        AnalysisView::Headcount(headcount) => {
            lines.push(format!("Total records: {}", headcount.total));
            for period in &headcount.by_period {
                let marker = if period.parsed { "" } else { " (unparsed)" };
                lines.push(format!("- {}{}: {}", period.period, marker, period.count));
            }
            push_counts(lines, "By department", &headcount.by_department);
        }
        AnalysisView::AbsenceComposition(composition) => {
            lines.push(format!("Total days: {:.1}", composition.total_days));
            for component in &composition.components {
                lines.push(format!(
                    "- {}: {:.1} days ({:.0}%)",
                    component.label,
                    component.days,
                    component.share * 100.0
                ));
            }
        }
        AnalysisView::ActiveAtCutoff(snapshot) => {
            let scope = match snapshot.snapshot_period {
                Some(period) => format!("rows of {period}"),
                None => "all rows".to_string(),
            };
            lines.push(format!(
                "Active at {}: {} of {} ({})",
                snapshot.cutoff, snapshot.active, snapshot.records_considered, scope
            ));
            push_counts(lines, "By department", &snapshot.by_department);
        }
        AnalysisView::ActiveVsInactive(split) => {
            lines.push(format!(
                "Active {} ({:.0}%) | Inactive {} ({:.0}%) at {}",
                split.active,
                split.active_share * 100.0,
                split.inactive,
                split.inactive_share * 100.0,
                split.cutoff
            ));
            for department in &split.by_department {
                lines.push(format!(
                    "- {}: {} active, {} inactive",
                    department.label, department.active, department.inactive
                ));
            }
        }
        AnalysisView::AbsencesByRoleAndDepartment(matrix) => {
            lines.push(format!("Total absence days: {:.1}", matrix.total_days));
            for cell in &matrix.cells {
                lines.push(format!(
                    "- {} / {}: {:.1}",
                    cell.role, cell.department, cell.absence_days
                ));
            }
        }
        AnalysisView::TerminationCauses(causes) => {
            lines.push(format!("Terminations: {}", causes.total_terminations));
            for cause in &causes.causes {
                lines.push(format!(
                    "- {}: {} ({:.0}%)",
                    cause.label,
                    cause.count,
                    cause.share * 100.0
                ));
            }
        }
    }
}

fn push_counts(lines: &mut Vec<String>, title: &str, counts: &[CategoryCount]) {
    if counts.is_empty() {
        return;
    }
    lines.push(format!("{title}:"));
    for entry in counts {
        lines.push(format!("  - {}: {}", entry.label, entry.count));
    }
}

fn optional<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "n/a".to_string(), |value| value.to_string())
}

fn amount(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |value| format!("{value:.1}"))
}

fn correlation(value: Option<f64>) -> String {
    value.map_or_else(|| "undefined".to_string(), |value| format!("{value:.2}"))
}
