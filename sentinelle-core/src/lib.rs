// src/lib.rs

pub mod app;
pub mod cache;
pub mod eventbus;
pub mod services;
pub mod store;
pub mod sync;
pub mod test_utils;

pub use sentinelle_common::error::Error;
pub use store::{compute_stats, merge_reports, ReportStore, StoreConfig};
