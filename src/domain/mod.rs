//! Domain modules organized as vertical slices.
//!
//! Each sub-module contains:
//! - `mod.rs` — Rich domain types (validated, business-logic-ready)
//! - `wire.rs` — Raw serde structs matching provider responses
//! - `convert.rs` — Conversions with validation and unit normalization
//! - `state.rs` — State containers with update methods

pub mod change;
pub mod history;
pub mod rates;
