use chrono::NaiveDate;
use hr_analytics::dataset::{
    Column, DataFormat, DatasetError, DatasetLoader, PeriodKey, YearMonth, PREVIEW_ROWS,
};

const USUARIOS: &[u8] = include_bytes!("fixtures/usuarios.csv");

#[test]
fn export_headers_are_renamed_to_canonical_columns() {
    let dataset = DatasetLoader::from_reader(USUARIOS, DataFormat::Csv).expect("fixture loads");

    assert_eq!(dataset.len(), 8);
    assert!(dataset.missing().is_empty(), "every known column is present");
    assert_eq!(dataset.recognized().len(), Column::ordered().len());
    assert_eq!(&dataset.columns()[..4], ["Periodo", "RUT", "Cargo", "Gerencia"]);
    assert!(dataset.preview().len() <= PREVIEW_ROWS);
}

#[test]
fn cells_are_typed_without_dropping_rows() {
    let dataset = DatasetLoader::from_reader(USUARIOS, DataFormat::Csv).expect("fixture loads");
    let records = dataset.records();

    let january = YearMonth::new(2024, 1).expect("valid month");
    assert_eq!(records[0].period, Some(PeriodKey::Month(january)));
    assert_eq!(records[0].contractual_salary, Some(1_200_000.0));
    assert_eq!(records[1].overtime_215, Some(1.0));
    assert_eq!(
        records[2].termination_date,
        NaiveDate::from_ymd_opt(2024, 1, 20)
    );
    assert_eq!(
        records[5].termination_date,
        NaiveDate::from_ymd_opt(2024, 2, 15)
    );
    assert_eq!(records[6].maternity_leave_days, Some(20.0));

    let unlabeled = &records[7];
    assert_eq!(
        unlabeled.period,
        Some(PeriodKey::Unparsed("sin periodo".to_string()))
    );
    assert_eq!(unlabeled.role, None);
    assert_eq!(unlabeled.absence_days, None);
    assert_eq!(unlabeled.contractual_salary, Some(800_000.0));

    assert_eq!(dataset.latest_period(), YearMonth::new(2024, 2));
    assert_eq!(dataset.unparsed_periods(), 1);
}

#[test]
fn latin1_semicolon_exports_are_decoded() {
    let bytes = b"Per\xedodo;Cargo;D\xedas de Falta\n2024-03;T\xe9cnico;1,5\n".to_vec();
    let dataset = DatasetLoader::from_bytes(bytes, DataFormat::Csv).expect("latin-1 loads");

    assert!(dataset.has(Column::Period));
    assert!(dataset.has(Column::AbsenceDays));
    let record = &dataset.records()[0];
    assert_eq!(record.role.as_deref(), Some("Técnico"));
    assert_eq!(record.absence_days, Some(1.5));
}

#[test]
fn unknown_layouts_still_load() {
    let csv = "Nombre,Edad\nAna,31\n";
    let dataset = DatasetLoader::from_reader(csv.as_bytes(), DataFormat::Csv).expect("loads");

    assert_eq!(dataset.len(), 1);
    assert!(dataset.recognized().is_empty());
    assert_eq!(dataset.columns().to_vec(), ["Nombre", "Edad"]);
}

#[test]
fn corrupt_workbook_is_reported() {
    let err = DatasetLoader::from_bytes(b"not a zip archive".to_vec(), DataFormat::Xlsx)
        .expect_err("garbage workbook rejected");
    assert!(matches!(err, DatasetError::Spreadsheet(_)));
}

#[test]
fn delimiter_only_rows_count_as_records() {
    let bytes = b"Periodo,Cargo\n2024-01,Analista\n,\n\n".to_vec();
    let dataset = DatasetLoader::from_bytes(bytes, DataFormat::Csv).expect("loads");

    assert_eq!(dataset.len(), 2);
    let blank = &dataset.records()[1];
    assert_eq!(blank.period, Some(PeriodKey::Unparsed(String::new())));
    assert_eq!(blank.role, None);
}
