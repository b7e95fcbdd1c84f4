//! Analyzer module - AI-detection scoring engine

pub mod engine;
pub mod rules;
pub mod scoring;
pub mod text;

pub use engine::{AggregateStats, DetectionEngine};
pub use scoring::{ScoreCalculator, ScoringConfig, ScoringProfile};
pub use text::TextProfile;
