//! Core domain logic for TripCheck.
//! This crate is the single source of truth for checklist composition,
//! keyword annotation and category completion.

pub mod annotate;
pub mod category;
pub mod compose;
pub mod config;
pub mod lexicon;
pub mod logging;
pub mod model;
pub mod schema;
pub mod state;

pub use annotate::{annotate, annotate_item, find_matches, AnnotatedItem, LinkTag, Segment};
pub use category::{
    category_report, category_status, is_category_complete, match_category, section_progress,
    CategoryReport, CategoryStatus,
};
pub use compose::duration::{
    apply_duration_plan, duration_items, DurationError, DurationSelection, DurationSlot,
};
pub use compose::merge::merge;
pub use compose::{compose_checklist, compose_sections};
pub use config::{ConfigError, ConfigResult, CoreConfig};
pub use lexicon::policy::LinkPolicy;
pub use lexicon::{CountryLexicon, FieldKind, KeywordTable, Lexicon, LexiconError};
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::category::Category;
pub use model::item::{ChecklistItem, CountryOverrideSet, InteractionKind, Section};
pub use schema::{builtin_dataset, builtin_lexicon, Dataset, SchemaError, SchemaResult};
pub use state::{is_custom_item_id, ChecklistState};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
