//! Reconciliation of a layout against the authoritative child set.
//!
//! The surrounding system owns which items exist (its child components);
//! the previous layout only supplies geometry hints. Reconciliation keeps
//! matches, assigns first-fit positions to newcomers, drops stale entries,
//! and reapplies bounds correction, compaction, and validation before the
//! result is trusted.

use gridfall_core::{GridContext, GridRect, ItemId, LayoutItem, SizeLimits};
use serde::{Deserialize, Serialize};

use crate::compact::{compact, correct_bounds};
use crate::store::{Layout, LayoutError};

/// Explicit geometry a caller declares for one child, overriding whatever
/// the previous layout stored for that identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredGeometry {
    pub x: u16,
    pub y: u16,
    pub w: u16,
    pub h: u16,
    #[serde(default)]
    pub limits: SizeLimits,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub draggable: Option<bool>,
    #[serde(default)]
    pub resizable: Option<bool>,
}

impl DeclaredGeometry {
    /// Declare bare geometry with default limits and flags.
    #[must_use]
    pub const fn new(x: u16, y: u16, w: u16, h: u16) -> Self {
        Self {
            x,
            y,
            w,
            h,
            limits: SizeLimits {
                min_w: None,
                max_w: None,
                min_h: None,
                max_h: None,
            },
            is_static: false,
            draggable: None,
            resizable: None,
        }
    }

    fn into_item(self, id: ItemId) -> LayoutItem {
        LayoutItem {
            id,
            x: self.x,
            y: self.y,
            w: self.w,
            h: self.h,
            limits: self.limits,
            is_static: self.is_static,
            draggable: self.draggable,
            resizable: self.resizable,
        }
    }
}

/// One entry of the authoritative, ordered child set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildEntry {
    /// Identity that must exist in the reconciled layout.
    pub id: ItemId,
    /// Caller-declared geometry; wins over stored geometry when present.
    #[serde(default)]
    pub declared: Option<DeclaredGeometry>,
    /// Width given to a newly synthesized item.
    #[serde(default = "default_cell")]
    pub default_w: u16,
    /// Height given to a newly synthesized item.
    #[serde(default = "default_cell")]
    pub default_h: u16,
}

fn default_cell() -> u16 {
    1
}

impl ChildEntry {
    /// A child with no declared geometry and 1x1 defaults.
    #[must_use]
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            declared: None,
            default_w: 1,
            default_h: 1,
        }
    }

    /// Attach declared geometry.
    #[must_use]
    pub fn with_declared(mut self, declared: DeclaredGeometry) -> Self {
        self.declared = Some(declared);
        self
    }

    /// Set the size used when the item has to be synthesized.
    #[must_use]
    pub fn with_default_size(mut self, w: u16, h: u16) -> Self {
        self.default_w = w;
        self.default_h = h;
        self
    }
}

/// Merge `previous` with the authoritative child set.
///
/// For each child in order: declared geometry wins; otherwise the previous
/// layout's entry is reused; otherwise a default-sized item is synthesized
/// at the first free position, scanning rows top to bottom and columns
/// left to right (greedy first-fit, no lookahead). Previous entries absent
/// from the child set are dropped. The merged layout is bounds-corrected,
/// compacted, and validated before it is returned.
///
/// The output contains exactly one entry per child, in child order; known
/// items with legal geometry and no declared override keep their geometry.
pub fn synchronize_layout(
    previous: &Layout,
    children: &[ChildEntry],
    ctx: GridContext,
) -> Result<Layout, LayoutError> {
    let mut merged = Layout::new();

    for entry in children {
        let item = if let Some(declared) = entry.declared {
            declared.into_item(entry.id.clone())
        } else if let Some(existing) = previous.get(&entry.id) {
            existing.clone()
        } else {
            let w = entry.default_w.clamp(1, ctx.cols);
            let h = entry.default_h;
            let (x, y) = first_free_position(&merged, ctx, w, h);

            #[cfg(feature = "tracing")]
            tracing::trace!(item = %entry.id, x, y, w, h, "newcomer placed");

            LayoutItem::new(entry.id.clone(), x, y, w, h)
        };
        merged.push(item)?;
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        children = children.len(),
        dropped = previous.len().saturating_sub(merged.len()),
        "layout reconciled"
    );

    let corrected = correct_bounds(&merged, ctx);
    let settled = compact(&corrected, ctx);
    settled.validate()?;
    Ok(settled)
}

/// First position where a `w x h` rectangle overlaps nothing placed so far,
/// scanning rows top to bottom and columns left to right.
///
/// The scan is bounded: past the lowest occupied row the grid is empty, so
/// the fallback places the item at the first column of the row immediately
/// below the maximum occupied row. The grid being full never loops forever.
fn first_free_position(placed: &Layout, ctx: GridContext, w: u16, h: u16) -> (u16, u16) {
    let bottom = placed.bottom();
    for y in 0..=bottom {
        for x in 0..=ctx.cols.saturating_sub(w) {
            let candidate = GridRect::new(x, y, w, h);
            if !placed.iter().any(|item| item.rect().overlaps(&candidate)) {
                return (x, y);
            }
        }
    }
    (0, bottom)
}
