//! Ordered item store, structural validation, and the persisted snapshot
//! schema.
//!
//! A [`Layout`] is an ordered sequence of items plus an identity index.
//! Order is semantically meaningful only as the default priority order used
//! by compaction tie-breaks and reconciler placement; identity, not order,
//! is the unique key. Engine operations never mutate stored items through
//! shared references: they produce new item values and substitute them with
//! [`Layout::replace`].
//!
//! # Schema Versioning Policy
//!
//! - **Additive fields** may be carried in `extensions` maps without a
//!   version bump.
//! - **Breaking changes** (field removal, semantic changes) require
//!   incrementing [`LAYOUT_SCHEMA_VERSION`] and a migration path.
//! - Snapshots carry their schema version; loaders reject unknown versions.

use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use gridfall_core::{GridContext, ItemError, ItemId, LayoutItem};
use rustc_hash::{FxHashMap, FxHashSet, FxHasher};
use serde::{Deserialize, Serialize};

/// Current layout snapshot schema version.
pub const LAYOUT_SCHEMA_VERSION: u16 = 1;

/// Ordered collection of grid items with O(1) identity lookup.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    items: Vec<LayoutItem>,
    index: FxHashMap<ItemId, usize>,
}

impl PartialEq for Layout {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for Layout {}

impl Layout {
    /// Create an empty layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a layout from items, rejecting duplicate identities.
    pub fn from_items(items: Vec<LayoutItem>) -> Result<Self, LayoutError> {
        let mut layout = Self {
            items: Vec::with_capacity(items.len()),
            index: FxHashMap::with_capacity_and_hasher(items.len(), Default::default()),
        };
        for item in items {
            layout.push(item)?;
        }
        Ok(layout)
    }

    /// Append an item, rejecting a duplicate identity.
    pub fn push(&mut self, item: LayoutItem) -> Result<(), LayoutError> {
        if self.index.contains_key(&item.id) {
            return Err(LayoutError::DuplicateItemId { id: item.id });
        }
        self.index.insert(item.id.clone(), self.items.len());
        self.items.push(item);
        Ok(())
    }

    /// Substitute the stored item with the same identity.
    ///
    /// Returns `false` (and stores nothing) when the identity is absent.
    pub fn replace(&mut self, item: LayoutItem) -> bool {
        match self.index.get(&item.id) {
            Some(&pos) => {
                self.items[pos] = item;
                true
            }
            None => false,
        }
    }

    /// Remove an item by identity, preserving the order of the rest.
    pub fn remove(&mut self, id: &ItemId) -> Option<LayoutItem> {
        let pos = self.index.remove(id)?;
        let item = self.items.remove(pos);
        for (i, entry) in self.items.iter().enumerate().skip(pos) {
            self.index.insert(entry.id.clone(), i);
        }
        Some(item)
    }

    /// Look up an item by identity.
    #[must_use]
    pub fn get(&self, id: &ItemId) -> Option<&LayoutItem> {
        self.index.get(id).map(|&pos| &self.items[pos])
    }

    /// Whether an identity is present.
    #[must_use]
    pub fn contains(&self, id: &ItemId) -> bool {
        self.index.contains_key(id)
    }

    /// Items in layout order.
    pub fn iter(&self) -> impl Iterator<Item = &LayoutItem> {
        self.items.iter()
    }

    /// Items in layout order, as a slice.
    #[must_use]
    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The first row below every item (max of `y + h`), 0 when empty.
    #[must_use]
    pub fn bottom(&self) -> u16 {
        self.items
            .iter()
            .map(|item| item.rect().bottom())
            .max()
            .unwrap_or(0)
    }

    /// Assert the structural invariants the engine relies on.
    ///
    /// Duplicate identities are unrepresentable once a `Layout` exists, but
    /// this re-checks them anyway so snapshot ingestion has a single
    /// authority. Bounds violations are not errors: `correct_bounds` fixes
    /// them. Never called mid-algorithm on partially settled state.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut seen: FxHashSet<&ItemId> =
            FxHashSet::with_capacity_and_hasher(self.items.len(), Default::default());
        for item in &self.items {
            if !seen.insert(&item.id) {
                return Err(LayoutError::DuplicateItemId {
                    id: item.id.clone(),
                });
            }
            if item.w == 0 {
                return Err(LayoutError::ZeroWidthItem {
                    id: item.id.clone(),
                });
            }
            item.limits.validate(&item.id)?;
        }
        Ok(())
    }
}

/// Persisted layout state, wrapping the item list with grid parameters.
///
/// Forward-compatible: unknown fields land in `extensions` for
/// round-tripping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    /// Schema version for migration detection.
    #[serde(default = "default_layout_version")]
    pub schema_version: u16,
    /// Column count the layout was produced against.
    pub cols: u16,
    /// Compaction policy the layout was produced under.
    pub vertical_compact: bool,
    /// Items in layout order.
    pub items: Vec<LayoutItem>,
    /// Forward-compatible extension bag.
    #[serde(default)]
    pub extensions: BTreeMap<String, String>,
}

fn default_layout_version() -> u16 {
    LAYOUT_SCHEMA_VERSION
}

impl LayoutSnapshot {
    /// Capture the current layout and grid parameters as a v1 snapshot.
    #[must_use]
    pub fn capture(layout: &Layout, ctx: GridContext) -> Self {
        Self {
            schema_version: LAYOUT_SCHEMA_VERSION,
            cols: ctx.cols,
            vertical_compact: ctx.vertical_compact,
            items: layout.items().to_vec(),
            extensions: BTreeMap::new(),
        }
    }

    /// Rebuild the layout and grid context, validating schema and structure.
    pub fn restore(self) -> Result<(Layout, GridContext), LayoutError> {
        if self.schema_version != LAYOUT_SCHEMA_VERSION {
            return Err(LayoutError::UnsupportedSchemaVersion {
                version: self.schema_version,
            });
        }
        let ctx = GridContext::new(self.cols, self.vertical_compact)?;
        let layout = Layout::from_items(self.items)?;
        layout.validate()?;
        Ok((layout, ctx))
    }

    /// Deterministic hash over the canonical field order, for replay and
    /// diff assertions in tests and persistence layers.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

/// Structural validation errors for layouts and snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    DuplicateItemId { id: ItemId },
    ZeroWidthItem { id: ItemId },
    Item(ItemError),
    UnsupportedSchemaVersion { version: u16 },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateItemId { id } => write!(f, "duplicate item id {id}"),
            Self::ZeroWidthItem { id } => write!(f, "item {id} has zero width"),
            Self::Item(err) => write!(f, "invalid item: {err}"),
            Self::UnsupportedSchemaVersion { version } => write!(
                f,
                "unsupported layout schema version {version} (expected {LAYOUT_SCHEMA_VERSION})"
            ),
        }
    }
}

impl std::error::Error for LayoutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Item(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ItemError> for LayoutError {
    fn from(err: ItemError) -> Self {
        Self::Item(err)
    }
}
