use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::audit::AuditRequest;
use crate::error::AuditError;
use crate::model::AuditReport;
use crate::state::SharedState;

/// POST /audit: `{ "url": string }` in, the five-bucket report out.
pub async fn audit(
    State(state): State<SharedState>,
    body: Result<Json<AuditRequest>, JsonRejection>,
) -> Result<Json<AuditReport>, AuditError> {
    let Json(request) = body.map_err(|e| {
        AuditError::InvalidUrl(format!(
            "Request body must be {{\"url\": string}}: {}",
            e.body_text()
        ))
    })?;

    let report = state.pipeline.run(request).await?;
    Ok(Json(report))
}
