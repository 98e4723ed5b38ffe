// File: sentinelle-common/src/models/mod.rs
pub mod ai;
pub mod badge;
pub mod report;
pub mod user;

pub use ai::{AnalysisResult, EvolutionAssessment};
pub use badge::{Badge, BadgeCategory, ImpactStats, OFFICIAL_BADGES};
pub use report::{
    Classification, ClassificationItem, DisposalCenter, EvolutionEntry, ReportLocation,
    ResolutionPhase, Severity, WasteNature, WasteReport, WasteStatus,
};
pub use user::{SessionUser, UserProfile};
