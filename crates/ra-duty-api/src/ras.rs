//! Handlers for `/ras` endpoints.
//!
//! | Method   | Path       | Notes |
//! |----------|------------|-------|
//! | `GET`    | `/ras`     | Optional `?include_inactive=true` (accepted, no effect) |
//! | `GET`    | `/ras/:id` | 404 if not found |
//! | `POST`   | `/ras`     | Body: [`RaBody`]; 201 + RA, 409 on duplicate name |
//! | `PUT`    | `/ras/:id` | Body: [`RaBody`]; renames propagate to duties |
//! | `DELETE` | `/ras/:id` | 400 while duties reference the RA |

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use ra_duty_core::{
  Error as CoreError,
  ra::{NewRa, Ra},
  store::DutyStore,
};
use serde::Deserialize;

use crate::{
  error::ApiError,
  extract::{ApiJson, ApiPath, ApiQuery},
  response::Message,
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Only a case-insensitive `true` counts; anything else, blank included,
  /// means `false`.
  pub include_inactive: Option<String>,
}

impl ListParams {
  pub fn include_inactive(&self) -> bool {
    self
      .include_inactive
      .as_deref()
      .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
  }
}

/// `GET /ras[?include_inactive=true]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<Ra>>, ApiError>
where
  S: DutyStore,
{
  let ras = store
    .list_ras(params.include_inactive())
    .await
    .map_err(ApiError::store)?;
  Ok(Json(ras))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /ras/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<Ra>, ApiError>
where
  S: DutyStore,
{
  let ra = store
    .get_ra(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("RA not found".to_owned()))?;
  Ok(Json(ra))
}

// ─── Create / update ──────────────────────────────────────────────────────────

/// JSON body accepted by `POST /ras` and `PUT /ras/:id`.
#[derive(Debug, Deserialize)]
pub struct RaBody {
  pub name:  Option<String>,
  pub email: Option<String>,
  pub phone: Option<String>,
  pub hall:  Option<String>,
}

impl TryFrom<RaBody> for NewRa {
  type Error = CoreError;

  fn try_from(b: RaBody) -> Result<Self, Self::Error> {
    Ok(
      NewRa::new(b.name.as_deref().unwrap_or_default())?
        .with_email(b.email)
        .with_phone(b.phone)
        .with_hall(b.hall),
    )
  }
}

/// `POST /ras`: returns 201 + the stored [`Ra`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<RaBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DutyStore,
{
  let input = NewRa::try_from(body).map_err(ApiError::store)?;
  let ra = store.create_ra(input).await.map_err(ApiError::store)?;
  tracing::info!(ra_id = ra.id, name = %ra.name, "RA added");
  Ok((StatusCode::CREATED, Json(ra)))
}

/// `PUT /ras/:id`: full replacement; returns the updated [`Ra`].
pub async fn update<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<i64>,
  ApiJson(body): ApiJson<RaBody>,
) -> Result<Json<Ra>, ApiError>
where
  S: DutyStore,
{
  let input = NewRa::try_from(body).map_err(ApiError::store)?;
  let ra = store.update_ra(id, input).await.map_err(ApiError::store)?;
  Ok(Json(ra))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /ras/:id`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<Message>, ApiError>
where
  S: DutyStore,
{
  store.delete_ra(id).await.map_err(ApiError::store)?;
  tracing::info!(ra_id = id, "RA deleted");
  Ok(Json(Message::new("RA deleted successfully")))
}
