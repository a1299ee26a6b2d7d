use crate::infra::{deserialize_optional_date, fetch_remote, open_session, AppState};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::NaiveDate;
use hr_analytics::analysis::{AnalysisKind, AnalysisReport};
use hr_analytics::dataset::{Column, DataFormat, DataSource, Dataset, DatasetLoader};
use hr_analytics::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct AnalysisRequest {
    /// Inline CSV export. Without it the configured remote URL is fetched.
    #[serde(default)]
    pub(crate) csv: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub(crate) cutoff: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalysisResponse {
    pub(crate) source: DataSource,
    pub(crate) cutoff: NaiveDate,
    pub(crate) rows: usize,
    pub(crate) report: AnalysisReport,
}

#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct MenuEntry {
    pub(crate) slug: &'static str,
    pub(crate) label: &'static str,
    pub(crate) requires: Vec<Column>,
}

pub(crate) fn menu() -> Vec<MenuEntry> {
    let empty = Dataset::default();
    AnalysisKind::ordered()
        .into_iter()
        .map(|kind| MenuEntry {
            slug: kind.slug(),
            label: kind.label(),
            requires: kind.missing_columns(&empty),
        })
        .collect()
}

pub(crate) fn analysis_routes() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/analyses", get(menu_endpoint))
        .route("/api/v1/analyses/:slug", post(analysis_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn menu_endpoint() -> Json<Vec<MenuEntry>> {
    Json(menu())
}

pub(crate) async fn analysis_endpoint(
    Extension(state): Extension<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, AppError> {
    let kind: AnalysisKind = slug.parse()?;
    let AnalysisRequest { csv, cutoff } = payload;

    let (dataset, source) = match csv {
        Some(csv) => (
            DatasetLoader::from_bytes(csv.into_bytes(), DataFormat::Csv)?,
            DataSource::Upload,
        ),
        None => (fetch_remote(&state.data).await?, DataSource::Remote),
    };

    let session = open_session(dataset, source, cutoff, &state.data);
    let report = session.run(kind);

    Ok(Json(AnalysisResponse {
        source,
        cutoff: session.cutoff(),
        rows: session.dataset().len(),
        report,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use hr_analytics::config::DataConfig;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use tower::ServiceExt;

    const CSV: &str = "Periodo,Cargo,Gerencia,DiasFalta\n\
2024-01,A,X,5\n\
2024-01,B,X,3\n";

    fn state(remote_csv_url: &str, ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
            data: Arc::new(DataConfig {
                remote_csv_url: remote_csv_url.to_string(),
                ..DataConfig::default()
            }),
        }
    }

    fn app(state: AppState) -> Router {
        analysis_routes().layer(Extension(state))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request builds")
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn health_and_readiness_respond() {
        let response = app(state("not a url", false))
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("health responds");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app(state("not a url", false))
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("ready responds");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn menu_lists_every_analysis() {
        let response = app(state("not a url", true))
            .oneshot(
                Request::get("/api/v1/analyses")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("menu responds");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let entries = body.as_array().expect("array body");
        assert_eq!(entries.len(), AnalysisKind::ordered().len());
        assert_eq!(entries[0]["slug"], "processed-data");
        assert_eq!(entries[4]["requires"][0], "AntiguedadMes");
    }

    #[tokio::test]
    async fn inline_csv_runs_requested_analysis() {
        let response = app(state("not a url", true))
            .oneshot(post_json(
                "/api/v1/analyses/absences-by-role-and-department",
                json!({ "csv": CSV, "cutoff": "2024-01-31" }),
            ))
            .await
            .expect("analysis responds");
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["source"], "upload");
        assert_eq!(body["cutoff"], "2024-01-31");
        assert_eq!(body["rows"], 2);
        let result = &body["report"]["outcome"]["result"];
        assert_eq!(result["view"], "absences_by_role_and_department");
        assert_eq!(result["total_days"], 8.0);
        let cells = &result["cells"];
        assert_eq!(cells[0]["role"], "A");
        assert_eq!(cells[0]["department"], "X");
        assert_eq!(cells[0]["absence_days"], 5.0);
        assert_eq!(cells[1]["role"], "B");
        assert_eq!(cells[1]["department"], "X");
        assert_eq!(cells[1]["absence_days"], 3.0);
    }

    #[tokio::test]
    async fn unknown_slug_is_not_found() {
        let response = app(state("not a url", true))
            .oneshot(post_json("/api/v1/analyses/payroll", json!({ "csv": CSV })))
            .await
            .expect("analysis responds");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .contains("payroll"));
    }

    #[tokio::test]
    async fn unreachable_remote_is_bad_gateway() {
        let response = app(state("not a url", true))
            .oneshot(post_json("/api/v1/analyses/headcount", json!({})))
            .await
            .expect("analysis responds");
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn missing_columns_are_reported_not_failed() {
        let request = AnalysisRequest {
            csv: Some(CSV.to_string()),
            cutoff: None,
        };
        let Json(body) = analysis_endpoint(
            Extension(state("not a url", true)),
            Path("termination-causes".to_string()),
            Json(request),
        )
        .await
        .expect("analysis runs");

        assert!(!body.report.is_available());
        assert_eq!(body.cutoff, NaiveDate::from_ymd_opt(2024, 1, 31).expect("valid"));
    }
}
