//! HTTP endpoint handlers. These are thin wrappers that forward to the
//! composition engine; each handler is instrumented and maps engine errors
//! to HTTP statuses.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tracing::{info, instrument};

use crate::bank::QuestionBank;
use crate::compose::compose;
use crate::error::ComposeError;
use crate::layout::LayoutProfile;
use crate::protocol::*;
use crate::state::AppState;

type ApiError = (StatusCode, Json<ErrorOut>);

fn bad_request(message: impl Into<String>) -> ApiError {
  (StatusCode::BAD_REQUEST, Json(ErrorOut { message: message.into() }))
}

#[instrument(level = "info")]
pub async fn http_health() -> Json<HealthOut> {
  Json(HealthOut { ok: true })
}

#[instrument(level = "info")]
pub async fn http_layouts() -> Json<Vec<LayoutProfile>> {
  Json(LayoutProfile::all().to_vec())
}

/// Resolve a coverage policy to a concrete chapter id list for a subject.
#[instrument(level = "info", skip(state, body), fields(subject = body.subject_id, policy = ?body.policy))]
pub async fn http_resolve_scope(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ScopeIn>,
) -> Result<Json<ScopeOut>, ApiError> {
  let known = state.bank.chapters_for_subject(body.subject_id);
  if known.is_empty() {
    return Err(bad_request(format!("unknown subject: {}", body.subject_id)));
  }

  let chapters = match body.policy {
    CoveragePolicy::Full => known,
    CoveragePolicy::FirstHalf => {
      let half = (known.len() + 1) / 2;
      known[..half].to_vec()
    }
    CoveragePolicy::SecondHalf => {
      let half = (known.len() + 1) / 2;
      known[half..].to_vec()
    }
    CoveragePolicy::Single => {
      let chapter = body.chapter.ok_or_else(|| bad_request("policy 'single' needs a chapter"))?;
      if !known.contains(&chapter) {
        return Err(bad_request(format!("chapter {} not in subject {}", chapter, body.subject_id)));
      }
      vec![chapter]
    }
    CoveragePolicy::Custom => {
      let chapters = body.chapters.unwrap_or_default();
      if chapters.is_empty() {
        return Err(bad_request("policy 'custom' needs a non-empty chapter list"));
      }
      chapters
    }
  };

  if chapters.is_empty() {
    return Err(bad_request("resolved chapter scope is empty"));
  }
  Ok(Json(ScopeOut { chapters }))
}

/// Compose one paper. Partial success (types that fell back or came up
/// empty, layout truncations) is reported inside the 200 response.
#[instrument(level = "info", skip(state, body), fields(subject = body.subject_id, layout = %body.layout, types = body.types.len()))]
pub async fn http_compose(
  State(state): State<Arc<AppState>>,
  Json(body): Json<ComposeIn>,
) -> Result<Json<ComposeOut>, ApiError> {
  let profile = LayoutProfile::by_name(&body.layout)
    .ok_or_else(|| bad_request(format!("unknown layout profile: {}", body.layout)))?;

  let request = body.into_request(profile);
  match compose(&state.bank, &request) {
    Ok(output) => {
      info!(
        target: "composer",
        paper = %output.paper.id,
        total_marks = output.paper.total_marks,
        warnings = output.warnings.len(),
        "HTTP paper composed"
      );
      Ok(Json(to_out(&output, &state.bank)))
    }
    Err(e @ ComposeError::Validation(_)) => Err(bad_request(e.to_string())),
    Err(e @ ComposeError::EmptyPaper) => Err((
      StatusCode::UNPROCESSABLE_ENTITY,
      Json(ErrorOut { message: e.to_string() }),
    )),
    Err(e @ ComposeError::Bank(_)) => Err((
      StatusCode::BAD_GATEWAY,
      Json(ErrorOut { message: e.to_string() }),
    )),
  }
}
