//! Checklist domain model shared by composition, annotation and matching.
//!
//! # Responsibility
//! - Define the typed records consumed by every engine in core.
//! - Keep one item/section shape for base schema, overrides and custom items.
//!
//! # Invariants
//! - Item identity is `id`; cross-dataset matching uses `title` only.
//! - Section item order is meaningful and preserved by every transformation.

pub mod category;
pub mod item;
