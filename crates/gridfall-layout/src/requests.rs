//! Request boundary consumed by the rendering/gesture layer.
//!
//! The gesture layer translates pointer activity into move and resize
//! requests; the engine answers with a settled layout plus a transient
//! placeholder rectangle (the item's position before compaction settles
//! it) that the caller may render during a drag. Requests referencing
//! absent identities are no-ops, because gesture races can reference a
//! just-removed item.

use gridfall_core::{GridContext, GridRect, ItemId};
use serde::{Deserialize, Serialize};

use crate::cascade::{MoveTarget, move_element, resize_element};
use crate::compact::compact;
use crate::reconcile::{ChildEntry, synchronize_layout};
use crate::store::{Layout, LayoutError};

/// Container-level interaction defaults, resolved against per-item
/// overrides (an item-level `Some` always wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionPolicy {
    pub draggable: bool,
    pub resizable: bool,
}

impl Default for InteractionPolicy {
    fn default() -> Self {
        Self {
            draggable: true,
            resizable: true,
        }
    }
}

/// Move an item to a target position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub id: ItemId,
    /// Target column; `None` leaves the column unchanged.
    #[serde(default)]
    pub target_x: Option<i32>,
    /// Target row; `None` leaves the row unchanged.
    #[serde(default)]
    pub target_y: Option<i32>,
    /// User gestures are clamped into the grid; programmatic moves may
    /// overflow horizontally and rely on bounds correction.
    #[serde(default)]
    pub user_action: bool,
}

/// Resize an item to a target size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeRequest {
    pub id: ItemId,
    pub target_w: u16,
    pub target_h: u16,
}

/// Replace the managed child set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRequest {
    pub children: Vec<ChildEntry>,
}

/// Transient drag feedback rectangle: where the manipulated item sits
/// after the cascade, before compaction settles it. Non-interactive; never
/// part of the layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    pub id: ItemId,
    pub rect: GridRect,
}

/// Result of a move or resize request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionOutcome {
    /// Cascaded and compacted layout.
    pub layout: Layout,
    /// Drag feedback; `None` when the request was a no-op.
    pub placeholder: Option<Placeholder>,
}

impl InteractionOutcome {
    fn unchanged(layout: &Layout) -> Self {
        Self {
            layout: layout.clone(),
            placeholder: None,
        }
    }
}

/// Apply a move request: cascade, then compact.
///
/// No-ops when the identity is absent, the item is static, or the item is
/// not draggable under `policy`.
#[must_use]
pub fn apply_move(
    layout: &Layout,
    ctx: GridContext,
    policy: InteractionPolicy,
    request: &MoveRequest,
) -> InteractionOutcome {
    let Some(item) = layout.get(&request.id) else {
        return InteractionOutcome::unchanged(layout);
    };
    if item.is_static || !item.draggable.unwrap_or(policy.draggable) {
        return InteractionOutcome::unchanged(layout);
    }

    let target = MoveTarget {
        x: request.target_x,
        y: request.target_y,
    };
    let cascaded = move_element(layout, ctx, &request.id, target, request.user_action);
    let placeholder = cascaded.get(&request.id).map(|moved| Placeholder {
        id: moved.id.clone(),
        rect: moved.rect(),
    });

    InteractionOutcome {
        layout: compact(&cascaded, ctx),
        placeholder,
    }
}

/// Apply a resize request: cascade, then compact.
///
/// No-ops when the identity is absent, the item is static, or the item is
/// not resizable under `policy`.
#[must_use]
pub fn apply_resize(
    layout: &Layout,
    ctx: GridContext,
    policy: InteractionPolicy,
    request: &ResizeRequest,
) -> InteractionOutcome {
    let Some(item) = layout.get(&request.id) else {
        return InteractionOutcome::unchanged(layout);
    };
    if item.is_static || !item.resizable.unwrap_or(policy.resizable) {
        return InteractionOutcome::unchanged(layout);
    }

    let cascaded = resize_element(layout, ctx, &request.id, request.target_w, request.target_h);
    let placeholder = cascaded.get(&request.id).map(|resized| Placeholder {
        id: resized.id.clone(),
        rect: resized.rect(),
    });

    InteractionOutcome {
        layout: compact(&cascaded, ctx),
        placeholder,
    }
}

/// Apply a sync request: reconcile against the new child set.
pub fn apply_sync(
    layout: &Layout,
    ctx: GridContext,
    request: &SyncRequest,
) -> Result<Layout, LayoutError> {
    synchronize_layout(layout, &request.children, ctx)
}
