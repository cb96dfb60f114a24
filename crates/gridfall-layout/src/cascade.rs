//! Collision cascade resolver.
//!
//! Moving or resizing an item may make it overlap others. The cascade
//! pushes every newly overlapped non-static item straight down to the
//! bottom edge of the item that displaced it, recursively, visiting
//! candidates in layout order. Each item is displaced at most once per
//! cascade: an explicit visited set (not a flag on shared records) breaks
//! displacement cycles and bounds recursion depth by the item count.
//!
//! The cascade leaves gaps behind; callers run [`crate::compact::compact`]
//! afterwards to settle the result.

use gridfall_core::{GridContext, ItemId, LayoutItem};
use rustc_hash::FxHashSet;

use crate::store::Layout;

/// Whether two distinct items occupy overlapping cells.
///
/// Zero-height items are degenerate rectangles and never collide.
#[inline]
#[must_use]
pub fn collides(a: &LayoutItem, b: &LayoutItem) -> bool {
    a.id != b.id && a.rect().overlaps(&b.rect())
}

/// The first item in layout order that collides with `item`, if any.
#[must_use]
pub fn first_collision<'a>(layout: &'a Layout, item: &LayoutItem) -> Option<&'a LayoutItem> {
    layout.iter().find(|other| collides(other, item))
}

/// Requested destination for a move; `None` leaves that axis unchanged.
///
/// Targets are pointer-space `i32` so gesture layers can report positions
/// left of or above the grid without pre-clamping; the engine clamps at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveTarget {
    pub x: Option<i32>,
    pub y: Option<i32>,
}

impl MoveTarget {
    /// Target both axes.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }
}

/// Move an item and cascade every displaced collider downward.
///
/// No-ops (returning a clone of the input) when the identity is absent or
/// the item is static. With `user_action`, the horizontal position is
/// clamped into `[0, cols - w]`: the engine never places a user-dragged
/// item at a negative or overflowing column. The result is
/// collision-resolved but not compacted: gaps above displaced items remain
/// until the caller compacts.
#[must_use]
pub fn move_element(
    layout: &Layout,
    ctx: GridContext,
    id: &ItemId,
    target: MoveTarget,
    user_action: bool,
) -> Layout {
    let Some(item) = layout.get(id) else {
        return layout.clone();
    };
    if item.is_static {
        return layout.clone();
    }

    let mut x = match target.x {
        Some(raw) => clamp_cell(raw),
        None => item.x,
    };
    let y = match target.y {
        Some(raw) => clamp_cell(raw),
        None => item.y,
    };
    if user_action {
        x = x.min(ctx.cols.saturating_sub(item.w));
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(item = %id, x, y, user_action, "move requested");

    let mut next = layout.clone();
    let mut visited = FxHashSet::default();
    let moved = item.at(x, y);
    settle(&mut next, moved, &mut visited);
    next
}

/// Resize an item and cascade every displaced collider downward.
///
/// No-ops when the identity is absent or the item is static. The width is
/// clamped by the item's limits, floored at 1, and capped at the columns
/// remaining right of the item; the height is clamped by the limits only.
#[must_use]
pub fn resize_element(
    layout: &Layout,
    ctx: GridContext,
    id: &ItemId,
    target_w: u16,
    target_h: u16,
) -> Layout {
    let Some(item) = layout.get(id) else {
        return layout.clone();
    };
    if item.is_static {
        return layout.clone();
    }

    let w = item
        .limits
        .clamp_w(target_w)
        .min(ctx.cols.saturating_sub(item.x))
        .max(1);
    let h = item.limits.clamp_h(target_h);

    #[cfg(feature = "tracing")]
    tracing::debug!(item = %id, w, h, "resize requested");

    let mut next = layout.clone();
    let mut visited = FxHashSet::default();
    let mut resized = item.clone();
    resized.w = w;
    resized.h = h;
    settle(&mut next, resized, &mut visited);
    next
}

/// Place `moved` and recursively displace its colliders.
///
/// `moved` is marked visited before its colliders are examined, so a
/// displacement cycle can never re-enter it.
fn settle(layout: &mut Layout, moved: LayoutItem, visited: &mut FxHashSet<ItemId>) {
    visited.insert(moved.id.clone());
    let destination = moved.rect().bottom();
    layout.replace(moved.clone());

    #[cfg(feature = "tracing")]
    tracing::trace!(item = %moved.id, x = moved.x, y = moved.y, "item placed");

    // Layout order is the tie-break: when several items could be displaced,
    // the one appearing earlier in the sequence is processed first.
    let colliders: Vec<ItemId> = layout
        .iter()
        .filter(|other| {
            !other.is_static && !visited.contains(&other.id) && collides(other, &moved)
        })
        .map(|other| other.id.clone())
        .collect();

    for other_id in colliders {
        // An earlier displacement in this loop may already have consumed it.
        if visited.contains(&other_id) {
            continue;
        }
        let Some(other) = layout.get(&other_id) else {
            continue;
        };
        let displaced = other.at(other.x, destination);
        settle(layout, displaced, visited);
    }
}

fn clamp_cell(raw: i32) -> u16 {
    raw.clamp(0, i32::from(u16::MAX)) as u16
}
