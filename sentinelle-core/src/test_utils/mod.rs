pub mod helpers;

pub use helpers::{evolution_entry, sample_report, MemoryBlobCache};
