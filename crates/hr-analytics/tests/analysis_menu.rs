use chrono::NaiveDate;
use hr_analytics::analysis::{AnalysisKind, AnalysisOutcome, AnalysisView, SessionContext};
use hr_analytics::dataset::{Column, DataFormat, DataSource, DatasetLoader, YearMonth};
use std::sync::Arc;

fn usuarios_session(cutoff: Option<NaiveDate>) -> SessionContext {
    let data = include_bytes!("fixtures/usuarios.csv");
    let dataset = DatasetLoader::from_reader(&data[..], DataFormat::Csv).expect("fixture loads");
    SessionContext::new(Arc::new(dataset), DataSource::Upload, cutoff)
}

fn view(session: &SessionContext, kind: AnalysisKind) -> AnalysisView {
    session
        .run(kind)
        .view()
        .cloned()
        .unwrap_or_else(|| panic!("{kind} should be available"))
}

#[test]
fn full_export_runs_every_analysis() {
    let session = usuarios_session(None);
    let reports = session.run_all();

    assert_eq!(reports.len(), AnalysisKind::ordered().len());
    assert!(reports.iter().all(|report| report.is_available()));
    assert_eq!(
        session.cutoff(),
        NaiveDate::from_ymd_opt(2024, 2, 29).expect("valid cutoff")
    );
}

#[test]
fn key_metrics_summarize_the_export() {
    let session = usuarios_session(None);
    let AnalysisView::KeyMetrics(metrics) = view(&session, AnalysisKind::KeyMetrics) else {
        panic!("key metrics view expected");
    };

    assert_eq!(metrics.rows, 8);
    assert_eq!(metrics.periods, 2);
    assert_eq!(metrics.unparsed_periods, 1);
    assert_eq!(metrics.latest_period, YearMonth::new(2024, 2));
    assert_eq!(metrics.departments, Some(3));
    assert_eq!(metrics.roles, Some(3));
    assert_eq!(metrics.active_employees, Some(6));
    assert_eq!(metrics.total_absence_days, Some(11.0));
}

#[test]
fn headcount_and_workforce_views_agree_with_rows() {
    let session = usuarios_session(None);

    let AnalysisView::Headcount(headcount) = view(&session, AnalysisKind::Headcount) else {
        panic!("headcount view expected");
    };
    let periods: Vec<(&str, usize)> = headcount
        .by_period
        .iter()
        .map(|entry| (entry.period.as_str(), entry.count))
        .collect();
    assert_eq!(
        periods,
        [("2024-01", 3), ("2024-02", 4), ("sin periodo", 1)]
    );

    let AnalysisView::ActiveAtCutoff(snapshot) = view(&session, AnalysisKind::ActiveAtCutoff)
    else {
        panic!("active snapshot expected");
    };
    assert_eq!(snapshot.snapshot_period, YearMonth::new(2024, 2));
    assert_eq!(snapshot.records_considered, 4);
    assert_eq!(snapshot.active, 3);

    let AnalysisView::ActiveVsInactive(split) = view(&session, AnalysisKind::ActiveVsInactive)
    else {
        panic!("active split expected");
    };
    assert_eq!(split.active, 6);
    assert_eq!(split.inactive, 2);
    assert_eq!(split.active + split.inactive, headcount.total);
}

#[test]
fn absence_and_tenure_views_match_fixture_totals() {
    let session = usuarios_session(None);

    let AnalysisView::AbsencesByRoleAndDepartment(matrix) =
        view(&session, AnalysisKind::AbsencesByRoleAndDepartment)
    else {
        panic!("absence matrix expected");
    };
    assert_eq!(matrix.days_for("Operario", "Operaciones"), Some(4.0));
    assert_eq!(matrix.days_for("Supervisor", "Operaciones"), Some(5.0));
    assert_eq!(matrix.days_for("Analista", "Finanzas"), Some(2.0));
    assert_eq!(matrix.total_days, 11.0);

    let AnalysisView::AbsenceComposition(composition) =
        view(&session, AnalysisKind::AbsenceComposition)
    else {
        panic!("absence composition expected");
    };
    assert_eq!(composition.total_days, 36.0);
    assert_eq!(composition.components.len(), 4);

    let AnalysisView::Tenure(tenure) = view(&session, AnalysisKind::Tenure) else {
        panic!("tenure view expected");
    };
    let counts: Vec<usize> = tenure.buckets.iter().map(|bucket| bucket.count).collect();
    assert_eq!(counts, [2, 1, 2, 1, 1]);
    assert_eq!(tenure.skipped_rows, 1);

    let AnalysisView::TerminationCauses(causes) = view(&session, AnalysisKind::TerminationCauses)
    else {
        panic!("termination causes expected");
    };
    assert_eq!(causes.total_terminations, 2);
    assert_eq!(causes.count_for("Renuncia"), Some(1));
    assert_eq!(causes.count_for("Despido"), Some(1));
}

#[test]
fn explicit_cutoff_changes_activity() {
    let cutoff = NaiveDate::from_ymd_opt(2024, 1, 10).expect("valid cutoff");
    let session = usuarios_session(Some(cutoff));

    let AnalysisView::ActiveVsInactive(split) = view(&session, AnalysisKind::ActiveVsInactive)
    else {
        panic!("active split expected");
    };
    assert_eq!(split.cutoff, cutoff);
    assert_eq!(split.inactive, 0);
}

#[test]
fn partial_export_reports_missing_columns() {
    let csv = "Periodo,Cargo,Gerencia\n2024-01,Analista,Finanzas\n";
    let dataset =
        DatasetLoader::from_reader(csv.as_bytes(), DataFormat::Csv).expect("partial loads");
    let session = SessionContext::new(Arc::new(dataset), DataSource::Remote, None);

    let tenure = session.run(AnalysisKind::Tenure);
    assert_eq!(
        tenure.outcome,
        AnalysisOutcome::Unavailable {
            missing: vec![Column::TenureMonths]
        }
    );
    assert!(session.run(AnalysisKind::Headcount).is_available());

    let json = serde_json::to_value(session.run(AnalysisKind::ProcessedData)).expect("json");
    assert_eq!(json["outcome"]["status"], "ready");
    assert_eq!(json["outcome"]["result"]["view"], "processed_data");
    assert_eq!(json["outcome"]["result"]["source"], "remote");
}
