//! Web layer for the prayer schedule server.
//!
//! JSON endpoints for daily timings, the Ramadan calendar and a nearby
//! mosques link.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
