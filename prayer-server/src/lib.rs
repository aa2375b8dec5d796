//! Prayer schedule server.
//!
//! Fetches daily prayer times from the Aladhan API, applies local minute
//! adjustments, and works out which prayer is current, which is next and
//! how long remains. Also derives the Ramadan calendar with sehri and
//! iftar times for every day of the month.

pub mod aladhan;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod monitor;
pub mod ramadan;
pub mod schedule;
pub mod session;
pub mod web;
