#![forbid(unsafe_code)]

//! Grid layout and collision-resolution engine.
//!
//! # Role in gridfall
//! `gridfall-layout` arranges rectangular items on a fixed-width integer
//! grid, resolving overlaps and closing vertical gaps as items are added,
//! moved, resized, or removed. It is the algorithmic core behind a
//! draggable/resizable grid UI, and it is pure: every operation maps an
//! input [`Layout`] plus a few scalars to a new `Layout`, with no I/O and
//! no shared mutable state between calls.
//!
//! # Primary responsibilities
//! - **Store**: ordered item collection with identity lookup and the
//!   persisted snapshot schema.
//! - **Cascade**: recursive downward displacement of items a move or
//!   resize newly overlaps.
//! - **Compaction**: settling every non-static item at the smallest legal
//!   row.
//! - **Reconciliation**: merging a previous layout with the authoritative
//!   child set, first-fit placing newcomers and dropping stale entries.
//! - **Requests**: the boundary types a gesture layer drives, including
//!   the transient drag placeholder.
//!
//! # How it fits in the system
//! A container component measures width, chooses a column count, and owns
//! callbacks; a gesture layer turns pointer activity into requests. Both
//! stay outside: this crate consumes item records and requests, and emits
//! item records. Ordering is part of the contract: layout order breaks
//! collision ties, and compaction preserves it.
//!
//! The surrounding system must serialize operations against one layout
//! value; the engine assumes at most one logical operation in flight.

pub mod cascade;
pub mod compact;
pub mod reconcile;
pub mod requests;
pub mod store;

pub use cascade::{MoveTarget, collides, first_collision, move_element, resize_element};
pub use compact::{compact, correct_bounds};
pub use gridfall_core::{GridContext, GridRect, ItemError, ItemId, LayoutItem, SizeLimits};
pub use reconcile::{ChildEntry, DeclaredGeometry, synchronize_layout};
pub use requests::{
    InteractionOutcome, InteractionPolicy, MoveRequest, Placeholder, ResizeRequest, SyncRequest,
    apply_move, apply_resize, apply_sync,
};
pub use store::{LAYOUT_SCHEMA_VERSION, Layout, LayoutError, LayoutSnapshot};
