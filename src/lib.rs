//! Recommendation and matching engine for a dating backend.
//!
//! Users answer a compatibility questionnaire, browse candidates filtered by
//! age, gender and distance, and express interest with smash/pass. This crate
//! filters eligible candidates, scores pairwise compatibility, ranks the
//! batch, deduplicates previously shown profiles, and drives the mutual-match
//! protocol. HTTP, auth and process bootstrap live in the embedding service.

pub mod error;
pub mod geo;
pub mod models;
pub mod scoring;
pub mod services;
pub mod store;

pub use error::{Error, ErrorKind, Result};
