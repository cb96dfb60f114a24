//! Vertical compaction and bounds correction.
//!
//! Compaction settles every non-static item at the smallest legal row,
//! removing the vertical gaps a cascade leaves behind. Bounds correction
//! clamps out-of-grid geometry and bumps items out from under static
//! obstacles; it is the tolerant front door for externally supplied
//! layouts, which are corrected rather than rejected.

use gridfall_core::{GridContext, GridRect};

use crate::store::Layout;

/// Settle every non-static item at the smallest legal `y`.
///
/// Items are processed in ascending `y`, ties broken by ascending `x`, then
/// by original layout order (stable sort), so compaction is deterministic
/// regardless of input order. Each item settles at the smallest `y' >= 0`
/// where it overlaps no previously settled item and no static item; static
/// items keep their exact geometry and participate only as obstacles. The
/// returned layout preserves the input order.
///
/// With `vertical_compact` disabled the input is returned unchanged (free
/// placement mode). Compaction is idempotent.
#[must_use]
pub fn compact(layout: &Layout, ctx: GridContext) -> Layout {
    if !ctx.vertical_compact {
        return layout.clone();
    }

    let mut order: Vec<usize> = (0..layout.len()).collect();
    order.sort_by_key(|&i| {
        let item = &layout.items()[i];
        (item.y, item.x)
    });

    let mut next = layout.clone();
    let mut obstacles: Vec<GridRect> = layout
        .iter()
        .filter(|item| item.is_static)
        .map(|item| item.rect())
        .collect();

    for i in order {
        let item = &next.items()[i];
        if item.is_static {
            continue;
        }

        let mut y = 0u16;
        while y < u16::MAX {
            let candidate = GridRect::new(item.x, y, item.w, item.h);
            if !obstacles.iter().any(|rect| rect.overlaps(&candidate)) {
                break;
            }
            y += 1;
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(item = %item.id, from = item.y, to = y, "item settled");

        let settled = item.at(item.x, y);
        obstacles.push(settled.rect());
        next.replace(settled);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(items = next.len(), bottom = next.bottom(), "layout compacted");

    next
}

/// Clamp every item into the grid and bump non-static items below any
/// static item they still overlap.
///
/// Width clamps into `[1, cols]`, then `x` into `[0, cols - w]`. Static
/// items are clamped horizontally but never relocated vertically. A single
/// deterministic pass in input order.
#[must_use]
pub fn correct_bounds(layout: &Layout, ctx: GridContext) -> Layout {
    let mut next = layout.clone();

    let clamped: Vec<_> = next
        .iter()
        .map(|item| {
            let mut item = item.clone();
            item.w = item.w.clamp(1, ctx.cols);
            item.x = item.x.min(ctx.cols - item.w);
            item
        })
        .collect();
    for item in clamped {
        next.replace(item);
    }

    let statics: Vec<GridRect> = next
        .iter()
        .filter(|item| item.is_static)
        .map(|item| item.rect())
        .collect();

    let bumped: Vec<_> = next
        .iter()
        .filter(|item| !item.is_static)
        .map(|item| {
            let mut item = item.clone();
            // First colliding static in layout order wins; y strictly
            // increases, so the loop is bounded by the lowest static.
            while let Some(blocker) = statics
                .iter()
                .find(|rect| rect.overlaps(&item.rect()))
            {
                item.y = blocker.bottom();
            }
            item
        })
        .collect();
    for item in bumped {
        next.replace(item);
    }

    next
}
