//! JSON REST API for the RA duty tracker.
//!
//! Exposes an axum [`Router`] backed by any [`ra_duty_core::store::DutyStore`].
//! CORS, tracing and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", ra_duty_api::api_router(store.clone()))
//! ```

pub mod duties;
pub mod error;
pub mod extract;
pub mod ras;
pub mod reports;
pub mod response;

use std::sync::Arc;

use axum::{Router, routing::get};
use ra_duty_core::store::DutyStore;

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: DutyStore + 'static,
{
  Router::new()
    // Duties
    .route("/duties", get(duties::list::<S>).post(duties::create::<S>))
    .route(
      "/duties/{id}",
      get(duties::get_one::<S>)
        .put(duties::update::<S>)
        .delete(duties::delete::<S>),
    )
    // Roster
    .route("/ras", get(ras::list::<S>).post(ras::create::<S>))
    .route(
      "/ras/{id}",
      get(ras::get_one::<S>)
        .put(ras::update::<S>)
        .delete(ras::delete::<S>),
    )
    // Reports
    .route("/reports/ra-duties", get(reports::ra_duties::<S>))
    .route("/reports/monthly-summary", get(reports::monthly_summary::<S>))
    .with_state(store)
}

// ─── Integration tests ────────────────────────────────────────────────────────
