//! Pokédex: resilient PokeAPI fetching, stat comparison and search history.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod api;
pub mod compare;
pub mod config;
pub mod fetch;
pub mod groups;
pub mod history;
pub mod provider;
pub mod storage;
pub mod types;
