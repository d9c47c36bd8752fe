//! Season, head-to-head and stadium statistics for one club's match history.
//!
//! Season files and lookup tables are loaded once into an [`models::Archive`]; everything after
//! that is pure filtering ([`services::filter_matches`]) and reduction
//! ([`services::aggregate`]).

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing;
