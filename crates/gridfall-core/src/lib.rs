#![forbid(unsafe_code)]

//! Core: cell-grid geometry and the grid item data model.
//!
//! # Role in gridfall
//! `gridfall-core` is the data layer. It owns the integer cell-grid
//! rectangle type, the item record that the layout engine arranges, and the
//! grid context every algorithm receives.
//!
//! # Primary responsibilities
//! - **GridRect**: u16 cell rectangles with strict positive-area overlap.
//! - **LayoutItem**: one managed rectangle with identity, size limits, and
//!   behavior flags.
//! - **GridContext**: column count and compaction policy, passed by value
//!   into every solver call.
//!
//! # How it fits in the system
//! The engine (`gridfall-layout`) consumes these types and produces new
//! layout values; nothing in this crate performs layout itself, so the data
//! model stays free of solver state.

pub mod geometry;
pub mod item;

pub use geometry::GridRect;
pub use item::{GridContext, ItemError, ItemId, LayoutItem, SizeLimits};
