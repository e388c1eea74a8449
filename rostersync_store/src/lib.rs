#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Database-backed settings and roster storage.
//!
//! One connection serves both stores. Roster replacement runs inside a
//! single transaction so a failed insert never leaves the roster empty.

mod convert;
mod database;

pub use database::RosterDatabase;
