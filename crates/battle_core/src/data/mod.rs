//! Data structures for fish type definitions.
//!
//! This module contains pure data structures describing the fish a side can
//! deploy. All structs are designed to be deserialized from RON; the only
//! file the crate reads is its own built-in catalog, embedded at compile time.

mod catalog;
mod fish_data;

pub use catalog::{FishCatalog, ProfileSource};
pub use fish_data::{BattleStats, FishProfile};
