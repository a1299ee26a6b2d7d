mod columns;
mod normalizer;
mod parser;
mod period;
mod record;
mod spreadsheet;

pub use columns::{Column, ColumnMap};
pub use period::{normalize_period, parse_date, PeriodKey, YearMonth};
pub use record::{Dataset, EmployeeRecord, PREVIEW_ROWS};

use serde::Serialize;
use spreadsheet::SheetError;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Failures that stop a dataset from loading at all.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),
    #[error("spreadsheet has no worksheet")]
    EmptyWorkbook,
    #[error("unsupported file type '{0}', expected .csv or .xlsx")]
    UnsupportedFormat(String),
    #[error("dataset has no header row")]
    MissingHeader,
    #[error("failed to fetch remote dataset: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("remote dataset answered HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },
}

impl From<SheetError> for DatasetError {
    fn from(err: SheetError) -> Self {
        match err {
            SheetError::Workbook(source) => Self::Spreadsheet(source),
            SheetError::NoWorksheet => Self::EmptyWorkbook,
        }
    }
}

/// Physical layout of an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataFormat {
    Csv,
    Xlsx,
}

impl DataFormat {
    /// Guesses the format from the file extension.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let mime = mime_guess::from_path(path).first_raw().unwrap_or_default();
        match mime {
            "text/csv" | "text/plain" | "text/tab-separated-values" => Ok(Self::Csv),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet" => Ok(Self::Xlsx),
            _ => Err(DatasetError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Where a session's dataset came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    Upload,
    Remote,
}

pub struct DatasetLoader;

impl DatasetLoader {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Dataset, DatasetError> {
        let path = path.as_ref();
        let format = DataFormat::from_path(path)?;
        let bytes = std::fs::read(path)?;
        debug!(path = %path.display(), ?format, bytes = bytes.len(), "read dataset file");
        Self::from_bytes(bytes, format)
    }

    pub fn from_reader<R: Read>(
        mut reader: R,
        format: DataFormat,
    ) -> Result<Dataset, DatasetError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(bytes, format)
    }

    pub fn from_bytes(bytes: Vec<u8>, format: DataFormat) -> Result<Dataset, DatasetError> {
        let table = match format {
            DataFormat::Csv => parser::parse_csv(&bytes)?,
            DataFormat::Xlsx => spreadsheet::parse_xlsx(bytes)?,
        };

        if table.headers.iter().all(|header| header.trim().is_empty()) {
            return Err(DatasetError::MissingHeader);
        }

        let dataset = Dataset::from_table(table, ColumnMap::standard());
        info!(
            rows = dataset.len(),
            recognized = dataset.recognized().len(),
            unparsed_periods = dataset.unparsed_periods(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Downloads a CSV export over HTTP(S).
    pub async fn fetch(url: &str, timeout: Duration) -> Result<Dataset, DatasetError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        let response = client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DatasetError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let bytes = response.bytes().await?;
        info!(%url, bytes = bytes.len(), "fetched remote dataset");
        Self::from_bytes(bytes.to_vec(), DataFormat::Csv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn format_follows_file_extension() {
        assert_eq!(DataFormat::from_path("usuarios.csv").expect("csv"), DataFormat::Csv);
        assert_eq!(
            DataFormat::from_path("Dotacion_2024.XLSX").expect("xlsx"),
            DataFormat::Xlsx
        );
        let err = DataFormat::from_path("informe.pdf").expect_err("pdf rejected");
        assert!(matches!(err, DatasetError::UnsupportedFormat(_)));
    }

    #[test]
    fn loader_renames_and_parses_csv() {
        let csv = "Período,Días de Falta,Cargo,Gerencia\n2024-01,2,Analista,Finanzas\n";
        let dataset =
            DatasetLoader::from_reader(Cursor::new(csv), DataFormat::Csv).expect("loads");
        assert_eq!(dataset.len(), 1);
        assert!(dataset.has(Column::Period));
        assert!(dataset.has(Column::AbsenceDays));
        assert_eq!(dataset.records()[0].department.as_deref(), Some("Finanzas"));
    }

    #[test]
    fn empty_input_has_no_header() {
        let err = DatasetLoader::from_bytes(Vec::new(), DataFormat::Csv).expect_err("no header");
        assert!(matches!(err, DatasetError::MissingHeader));
    }

    #[test]
    fn from_path_propagates_io_errors() {
        let err = DatasetLoader::from_path("./does-not-exist.csv").expect_err("missing file");
        assert!(matches!(err, DatasetError::Io(_)));
    }

    #[tokio::test]
    async fn fetch_rejects_invalid_url() {
        let err = DatasetLoader::fetch("not a url", Duration::from_secs(1))
            .await
            .expect_err("invalid url");
        assert!(matches!(err, DatasetError::Fetch(_)));
    }
}
