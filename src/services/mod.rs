//! Data sources for the search pipeline.

pub mod api;
pub mod catalog;
#[cfg(feature = "remote")]
pub mod remote;
