//! Handlers for `/duties` endpoints.
//!
//! | Method   | Path          | Notes |
//! |----------|---------------|-------|
//! | `GET`    | `/duties`     | Optional `ra`, `start_date`, `end_date` |
//! | `GET`    | `/duties/:id` | 404 if not found |
//! | `POST`   | `/duties`     | Body: [`DutyBody`]; returns 201 + `{id, message}` |
//! | `PUT`    | `/duties/:id` | Body: [`DutyBody`]; returns `{message}` |
//! | `DELETE` | `/duties/:id` | Returns `{message}` |

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use ra_duty_core::{
  duty::{Duty, NewDuty},
  store::{DateRange, DutyFilter, DutyStore},
};
use serde::Deserialize;

use crate::{
  error::ApiError,
  extract::{ApiJson, ApiPath, ApiQuery},
  response::{Created, Message},
};

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct ListParams {
  /// Case-insensitive substring of the RA name.
  pub ra:         Option<String>,
  /// Inclusive lower bound, compared as text against `YYYY-MM-DD`.
  pub start_date: Option<String>,
  /// Inclusive upper bound, compared as text against `YYYY-MM-DD`.
  pub end_date:   Option<String>,
}

/// `GET /duties[?ra=...][&start_date=...][&end_date=...]`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<Duty>>, ApiError>
where
  S: DutyStore,
{
  let filter = DutyFilter {
    ra_name_contains: params.ra.filter(|r| !r.trim().is_empty()),
    dates:            DateRange::new(
      params.start_date.as_deref(),
      params.end_date.as_deref(),
    ),
  };

  let duties = store.list_duties(&filter).await.map_err(ApiError::store)?;
  Ok(Json(duties))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /duties/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<Duty>, ApiError>
where
  S: DutyStore,
{
  let duty = store
    .get_duty(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Duty not found".to_owned()))?;
  Ok(Json(duty))
}

// ─── Create / update ──────────────────────────────────────────────────────────

/// JSON body accepted by `POST /duties` and `PUT /duties/:id`.
///
/// Fields are optional at the serde level so that a missing field yields the
/// same 400 message as a blank one.
#[derive(Debug, Deserialize)]
pub struct DutyBody {
  pub ra_name: Option<String>,
  /// `YYYY-MM-DD`.
  pub date:    Option<String>,
  /// `Primary`, `Secondary` or `Tertiary` (any case).
  pub shift:   Option<String>,
  pub notes:   Option<String>,
}

impl TryFrom<DutyBody> for NewDuty {
  type Error = ra_duty_core::Error;

  fn try_from(b: DutyBody) -> Result<Self, Self::Error> {
    NewDuty::parse(
      b.ra_name.as_deref(),
      b.date.as_deref(),
      b.shift.as_deref(),
      b.notes,
    )
  }
}

/// `POST /duties`: returns 201 + `{id, message}`.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  ApiJson(body): ApiJson<DutyBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: DutyStore,
{
  let input = NewDuty::try_from(body).map_err(ApiError::store)?;
  let duty = store.create_duty(input).await.map_err(ApiError::store)?;
  Ok((
    StatusCode::CREATED,
    Json(Created {
      id:      duty.id,
      message: "Duty added successfully".to_owned(),
    }),
  ))
}

/// `PUT /duties/:id`: body is a full replacement [`DutyBody`].
pub async fn update<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<i64>,
  ApiJson(body): ApiJson<DutyBody>,
) -> Result<Json<Message>, ApiError>
where
  S: DutyStore,
{
  let input = NewDuty::try_from(body).map_err(ApiError::store)?;
  store.update_duty(id, input).await.map_err(ApiError::store)?;
  Ok(Json(Message::new("Duty updated successfully")))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /duties/:id`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  ApiPath(id): ApiPath<i64>,
) -> Result<Json<Message>, ApiError>
where
  S: DutyStore,
{
  store.delete_duty(id).await.map_err(ApiError::store)?;
  Ok(Json(Message::new("Duty deleted successfully")))
}
