use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Liveness of the service as a whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    /// The process is up but Postgres did not answer.
    Degraded,
}

/// Body of `GET /health`. Served with 200 in both states.
#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: &'static str,
    pub db_healthy: bool,
}

impl HealthReport {
    fn new(db_healthy: bool) -> Self {
        Self {
            status: if db_healthy {
                HealthStatus::Ok
            } else {
                HealthStatus::Degraded
            },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        }
    }
}

async fn report(State(state): State<AppState>) -> Json<HealthReport> {
    let report = match stockroom_db::health_check(&state.pool).await {
        Ok(()) => HealthReport::new(true),
        Err(err) => {
            tracing::warn!(error = %err, "Database unreachable during health check");
            HealthReport::new(false)
        }
    };
    Json(report)
}

/// `/health`, mounted at the root next to `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(report))
}
