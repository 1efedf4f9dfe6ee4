//! Handlers for `/reports` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/reports/ra-duties` | Optional `start_date`, `end_date` |
//! | `GET`  | `/reports/monthly-summary` | Optional `year`; defaults to the current year |

use std::sync::Arc;

use axum::{Json, extract::State};
use chrono::{Datelike as _, Local};
use ra_duty_core::{
  report::{MonthlySummary, RaDutyCount},
  store::{DateRange, DutyStore},
};
use serde::Deserialize;

use crate::{error::ApiError, extract::ApiQuery};

#[derive(Debug, Deserialize, Default)]
pub struct RangeParams {
  pub start_date: Option<String>,
  pub end_date:   Option<String>,
}

/// `GET /reports/ra-duties[?start_date=...][&end_date=...]`
pub async fn ra_duties<S>(
  State(store): State<Arc<S>>,
  ApiQuery(params): ApiQuery<RangeParams>,
) -> Result<Json<Vec<RaDutyCount>>, ApiError>
where
  S: DutyStore,
{
  let dates =
    DateRange::new(params.start_date.as_deref(), params.end_date.as_deref());
  let rows = store.ra_duty_report(dates).await.map_err(ApiError::store)?;
  Ok(Json(rows))
}

#[derive(Debug, Deserialize, Default)]
pub struct YearParams {
  /// Blank counts as absent. A value that is not a year matches no duties.
  pub year: Option<String>,
}

/// `GET /reports/monthly-summary[?year=YYYY]`
pub async fn monthly_summary<S>(
  State(store): State<Arc<S>>,
  ApiQuery(params): ApiQuery<YearParams>,
) -> Result<Json<Vec<MonthlySummary>>, ApiError>
where
  S: DutyStore,
{
  let year = match params.year.as_deref().map(str::trim) {
    None | Some("") => Local::now().year(),
    Some(text) => match text.parse::<i32>() {
      Ok(year) => year,
      Err(_) => return Ok(Json(Vec::new())),
    },
  };
  let rows = store.monthly_summary(year).await.map_err(ApiError::store)?;
  Ok(Json(rows))
}
