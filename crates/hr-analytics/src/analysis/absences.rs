use super::session::SessionContext;
use super::stats::{label_or_unspecified, share};
use super::views::{
    AbsenceCell, AbsenceComponent, AbsenceCompositionView, AbsenceMatrixView, AnalysisView,
};
use crate::dataset::Column;
use std::collections::{BTreeMap, BTreeSet};

const ABSENCE_TYPES: [(Column, &str); 4] = [
    (Column::SickLeaveDays, "Licencia médica"),
    (Column::MaternityLeaveDays, "Licencia maternal"),
    (Column::VacationDays, "Vacaciones"),
    (Column::AbsenceDays, "Faltas"),
];

/// Total days per absence type, for the types the dataset carries.
pub(crate) fn absence_composition(session: &SessionContext) -> AnalysisView {
    let dataset = session.dataset();
    let totals: Vec<(Column, &'static str, f64)> = ABSENCE_TYPES
        .into_iter()
        .filter(|(column, _)| dataset.has(*column))
        .map(|(column, label)| {
            let days = dataset
                .records()
                .iter()
                .filter_map(|record| record.amount(column))
                .sum();
            (column, label, days)
        })
        .collect();

    let total_days: f64 = totals.iter().map(|(_, _, days)| days).sum();
    let components = totals
        .into_iter()
        .map(|(column, label, days)| AbsenceComponent {
            column,
            label,
            days,
            share: share(days, total_days),
        })
        .collect();

    AnalysisView::AbsenceComposition(AbsenceCompositionView {
        total_days,
        components,
    })
}

/// Absence days summed over each role and department pair. Rows without a
/// day count add nothing; blank role or department cells group as
/// unspecified.
pub(crate) fn absences_by_role_and_department(session: &SessionContext) -> AnalysisView {
    let mut sums: BTreeMap<(String, String), f64> = BTreeMap::new();
    for record in session.dataset().records() {
        let Some(days) = record.absence_days else {
            continue;
        };
        let key = (
            label_or_unspecified(record.role.as_deref()),
            label_or_unspecified(record.department.as_deref()),
        );
        *sums.entry(key).or_default() += days;
    }

    let roles: BTreeSet<&String> = sums.keys().map(|(role, _)| role).collect();
    let departments: BTreeSet<&String> = sums.keys().map(|(_, department)| department).collect();
    let roles = roles.into_iter().cloned().collect();
    let departments = departments.into_iter().cloned().collect();

    let total_days = sums.values().sum();
    let cells = sums
        .into_iter()
        .map(|((role, department), absence_days)| AbsenceCell {
            role,
            department,
            absence_days,
        })
        .collect();

    AnalysisView::AbsencesByRoleAndDepartment(AbsenceMatrixView {
        cells,
        roles,
        departments,
        total_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::UNSPECIFIED;
    use crate::dataset::{DataSource, Dataset, EmployeeRecord};
    use std::sync::Arc;

    fn session(present: &[Column], records: Vec<EmployeeRecord>) -> SessionContext {
        let dataset = Dataset::from_records(present.iter().copied(), records);
        SessionContext::new(Arc::new(dataset), DataSource::Upload, None)
    }

    fn absent(role: Option<&str>, department: Option<&str>, days: Option<f64>) -> EmployeeRecord {
        EmployeeRecord {
            role: role.map(str::to_string),
            department: department.map(str::to_string),
            absence_days: days,
            ..EmployeeRecord::default()
        }
    }

    #[test]
    fn matrix_sums_days_per_role_and_department() {
        let session = session(
            &[Column::Role, Column::Department, Column::AbsenceDays],
            vec![
                absent(Some("A"), Some("X"), Some(2.0)),
                absent(Some("A"), Some("X"), Some(3.0)),
                absent(Some("B"), Some("X"), Some(3.0)),
                absent(Some("B"), Some("Y"), None),
                absent(None, Some("Y"), Some(1.0)),
            ],
        );

        let AnalysisView::AbsencesByRoleAndDepartment(view) =
            absences_by_role_and_department(&session)
        else {
            panic!("unexpected view");
        };
        assert_eq!(view.days_for("A", "X"), Some(5.0));
        assert_eq!(view.days_for("B", "X"), Some(3.0));
        assert_eq!(view.days_for("B", "Y"), None);
        assert_eq!(view.days_for(UNSPECIFIED, "Y"), Some(1.0));
        assert_eq!(view.total_days, 9.0);
        assert_eq!(view.departments, ["X", "Y"]);
    }

    #[test]
    fn composition_only_lists_present_types() {
        let session = session(
            &[Column::SickLeaveDays, Column::VacationDays],
            vec![
                EmployeeRecord {
                    sick_leave_days: Some(3.0),
                    vacation_days: Some(5.0),
                    ..EmployeeRecord::default()
                },
                EmployeeRecord {
                    vacation_days: Some(2.0),
                    ..EmployeeRecord::default()
                },
            ],
        );

        let AnalysisView::AbsenceComposition(view) = absence_composition(&session) else {
            panic!("unexpected view");
        };
        assert_eq!(view.total_days, 10.0);
        let components: Vec<(Column, f64, f64)> = view
            .components
            .iter()
            .map(|component| (component.column, component.days, component.share))
            .collect();
        assert_eq!(
            components,
            [
                (Column::SickLeaveDays, 3.0, 0.3),
                (Column::VacationDays, 7.0, 0.7)
            ]
        );
    }

    #[test]
    fn composition_of_zero_days_has_zero_shares() {
        let session = session(&[Column::AbsenceDays], vec![EmployeeRecord::default()]);
        let AnalysisView::AbsenceComposition(view) = absence_composition(&session) else {
            panic!("unexpected view");
        };
        assert_eq!(view.total_days, 0.0);
        assert_eq!(view.components[0].share, 0.0);
    }
}
