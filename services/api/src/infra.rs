use chrono::NaiveDate;
use hr_analytics::analysis::SessionContext;
use hr_analytics::config::DataConfig;
use hr_analytics::dataset::{DataSource, Dataset, DatasetLoader};
use hr_analytics::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) data: Arc<DataConfig>,
}

/// Downloads the configured remote export.
pub(crate) async fn fetch_remote(data: &DataConfig) -> Result<Dataset, AppError> {
    info!(url = %data.remote_csv_url, "loading remote dataset");
    let dataset = DatasetLoader::fetch(&data.remote_csv_url, data.fetch_timeout).await?;
    Ok(dataset)
}

/// Builds the session, preferring the caller's cutoff over the configured one.
pub(crate) fn open_session(
    dataset: Dataset,
    source: DataSource,
    cutoff: Option<NaiveDate>,
    data: &DataConfig,
) -> SessionContext {
    SessionContext::new(Arc::new(dataset), source, cutoff.or(data.report_cutoff))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn deserialize_optional_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|value| parse_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}
