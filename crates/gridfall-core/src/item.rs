//! Grid item data model.
//!
//! A [`LayoutItem`] is one managed rectangle on the grid: identity, integer
//! cell position and size, optional resize limits, and behavior flags. The
//! engine treats item values as immutable snapshots and rebuilds layouts by
//! substitution, so every type here is cheap to clone.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::GridRect;

/// Stable identity for grid items.
///
/// An opaque non-empty string key, unique within a layout. The engine never
/// interprets the key; the surrounding system typically uses child keys
/// from its own component model.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Create a new item id, rejecting the empty key.
    pub fn new(key: impl Into<String>) -> Result<Self, ItemError> {
        let key = key.into();
        if key.is_empty() {
            return Err(ItemError::EmptyItemId);
        }
        Ok(Self(key))
    }

    /// The raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Optional clamp bounds applied when an item is resized.
///
/// `None` on an axis bound means unconstrained on that side. Width is
/// additionally floored at 1 cell everywhere in the engine, so `min_w: None`
/// still never yields a zero-width item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SizeLimits {
    /// Minimum width in cells.
    #[serde(default)]
    pub min_w: Option<u16>,
    /// Maximum width in cells.
    #[serde(default)]
    pub max_w: Option<u16>,
    /// Minimum height in cells.
    #[serde(default)]
    pub min_h: Option<u16>,
    /// Maximum height in cells.
    #[serde(default)]
    pub max_h: Option<u16>,
}

impl SizeLimits {
    /// Reject inverted ranges on either axis.
    pub fn validate(&self, id: &ItemId) -> Result<(), ItemError> {
        if let (Some(min), Some(max)) = (self.min_w, self.max_w)
            && min > max
        {
            return Err(ItemError::InvalidSizeLimits {
                id: id.clone(),
                axis: "width",
                min,
                max,
            });
        }
        if let (Some(min), Some(max)) = (self.min_h, self.max_h)
            && min > max
        {
            return Err(ItemError::InvalidSizeLimits {
                id: id.clone(),
                axis: "height",
                min,
                max,
            });
        }
        Ok(())
    }

    /// Clamp a width into the configured range, floored at 1 cell.
    #[must_use]
    pub fn clamp_w(&self, w: u16) -> u16 {
        let mut w = w.max(self.min_w.unwrap_or(0));
        if let Some(max) = self.max_w {
            w = w.min(max);
        }
        w.max(1)
    }

    /// Clamp a height into the configured range.
    #[must_use]
    pub fn clamp_h(&self, h: u16) -> u16 {
        let mut h = h.max(self.min_h.unwrap_or(0));
        if let Some(max) = self.max_h {
            h = h.min(max);
        }
        h
    }
}

/// One managed rectangle on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutItem {
    /// Stable identity, unique within a layout.
    pub id: ItemId,
    /// Grid-column origin.
    pub x: u16,
    /// Grid-row origin.
    pub y: u16,
    /// Width in cells; at least 1 after validation.
    pub w: u16,
    /// Height in cells; 0 is legal and means a zero-area placeholder that
    /// never collides.
    pub h: u16,
    /// Resize clamp bounds.
    #[serde(default)]
    pub limits: SizeLimits,
    /// Immovable: never displaced by collision or compaction, and excluded
    /// from drag/resize.
    #[serde(default)]
    pub is_static: bool,
    /// Per-item drag override; `None` defers to the container default.
    #[serde(default)]
    pub draggable: Option<bool>,
    /// Per-item resize override; `None` defers to the container default.
    #[serde(default)]
    pub resizable: Option<bool>,
}

impl LayoutItem {
    /// Create an item with default limits and behavior flags.
    #[must_use]
    pub fn new(id: ItemId, x: u16, y: u16, w: u16, h: u16) -> Self {
        Self {
            id,
            x,
            y,
            w,
            h,
            limits: SizeLimits::default(),
            is_static: false,
            draggable: None,
            resizable: None,
        }
    }

    /// Mark the item immovable.
    #[must_use]
    pub fn pinned(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Attach resize limits.
    #[must_use]
    pub fn with_limits(mut self, limits: SizeLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The item's occupied rectangle.
    #[inline]
    #[must_use]
    pub const fn rect(&self) -> GridRect {
        GridRect::new(self.x, self.y, self.w, self.h)
    }

    /// A copy of this item at a new origin.
    #[must_use]
    pub fn at(&self, x: u16, y: u16) -> Self {
        let mut item = self.clone();
        item.x = x;
        item.y = y;
        item
    }
}

/// Grid-wide context passed into every engine operation.
///
/// Never stored in a layout: callers own the column count (it changes with
/// breakpoints in the surrounding system) and the compaction policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridContext {
    /// Total column count, at least 1.
    pub cols: u16,
    /// When false, the compactor leaves layouts untouched (free placement).
    pub vertical_compact: bool,
}

impl GridContext {
    /// Create a context, rejecting a zero column count.
    pub fn new(cols: u16, vertical_compact: bool) -> Result<Self, ItemError> {
        if cols == 0 {
            return Err(ItemError::ZeroColumns);
        }
        Ok(Self {
            cols,
            vertical_compact,
        })
    }
}

/// Validation errors for item model construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemError {
    EmptyItemId,
    ZeroColumns,
    InvalidSizeLimits {
        id: ItemId,
        axis: &'static str,
        min: u16,
        max: u16,
    },
}

impl fmt::Display for ItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyItemId => write!(f, "item id must not be empty"),
            Self::ZeroColumns => write!(f, "grid must have at least one column"),
            Self::InvalidSizeLimits { id, axis, min, max } => write!(
                f,
                "item {id} has inverted {axis} limits: min {min} > max {max}"
            ),
        }
    }
}

impl std::error::Error for ItemError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(key: &str) -> ItemId {
        ItemId::new(key).expect("test id must be non-empty")
    }

    #[test]
    fn empty_item_id_is_rejected() {
        assert_eq!(ItemId::new(""), Err(ItemError::EmptyItemId));
        assert_eq!(id("a").as_str(), "a");
    }

    #[test]
    fn zero_columns_are_rejected() {
        assert_eq!(GridContext::new(0, true), Err(ItemError::ZeroColumns));
        let ctx = GridContext::new(12, true).expect("valid context");
        assert_eq!(ctx.cols, 12);
    }

    #[test]
    fn inverted_limits_are_rejected() {
        let limits = SizeLimits {
            min_w: Some(4),
            max_w: Some(2),
            ..SizeLimits::default()
        };
        assert_eq!(
            limits.validate(&id("a")),
            Err(ItemError::InvalidSizeLimits {
                id: id("a"),
                axis: "width",
                min: 4,
                max: 2,
            })
        );

        let limits = SizeLimits {
            min_h: Some(9),
            max_h: Some(3),
            ..SizeLimits::default()
        };
        assert!(matches!(
            limits.validate(&id("a")),
            Err(ItemError::InvalidSizeLimits { axis: "height", .. })
        ));
    }

    #[test]
    fn clamping_applies_bounds_and_width_floor() {
        let limits = SizeLimits {
            min_w: Some(2),
            max_w: Some(6),
            min_h: Some(1),
            max_h: Some(4),
        };
        assert_eq!(limits.clamp_w(0), 2);
        assert_eq!(limits.clamp_w(9), 6);
        assert_eq!(limits.clamp_h(0), 1);
        assert_eq!(limits.clamp_h(9), 4);

        // Unconstrained width still never collapses to zero.
        assert_eq!(SizeLimits::default().clamp_w(0), 1);
        assert_eq!(SizeLimits::default().clamp_h(0), 0);
    }

    #[test]
    fn item_rect_and_relocation() {
        let item = LayoutItem::new(id("a"), 1, 2, 3, 4);
        assert_eq!(item.rect(), GridRect::new(1, 2, 3, 4));

        let moved = item.at(5, 6);
        assert_eq!(moved.rect(), GridRect::new(5, 6, 3, 4));
        assert_eq!(moved.id, item.id);
        assert_eq!(item.x, 1, "relocation must not mutate the source");
    }

    #[test]
    fn item_serde_defaults_tolerate_sparse_records() {
        let json = r#"{"id":"a","x":0,"y":0,"w":2,"h":2}"#;
        let item: LayoutItem = serde_json::from_str(json).expect("sparse record parses");
        assert!(!item.is_static);
        assert_eq!(item.draggable, None);
        assert_eq!(item.limits, SizeLimits::default());
    }
}
