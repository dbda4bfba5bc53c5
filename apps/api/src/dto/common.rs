use serde::Serialize;
use ts_rs::TS;

/// Liveness payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    /// Fixed "ok" while the process serves requests.
    pub status: &'static str,
}
