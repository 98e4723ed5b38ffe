pub mod report_store;

pub use report_store::{compute_stats, merge_reports, ReportStore, StoreConfig};
