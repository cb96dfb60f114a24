//! End-to-end engine scenarios: request-driven drags, reconciliation of a
//! changing child set, and snapshot persistence round-trips.

use gridfall_layout::{
    ChildEntry, DeclaredGeometry, GridContext, GridRect, InteractionPolicy, ItemId, Layout,
    LayoutItem, LayoutSnapshot, MoveRequest, ResizeRequest, SyncRequest, apply_move, apply_resize,
    apply_sync, correct_bounds,
};

fn id(key: &str) -> ItemId {
    ItemId::new(key).expect("test id must be non-empty")
}

fn item(key: &str, x: u16, y: u16, w: u16, h: u16) -> LayoutItem {
    LayoutItem::new(id(key), x, y, w, h)
}

fn layout(items: Vec<LayoutItem>) -> Layout {
    Layout::from_items(items).expect("unique test ids")
}

fn ctx(cols: u16) -> GridContext {
    GridContext::new(cols, true).expect("valid context")
}

fn user_move(key: &str, x: i32, y: i32) -> MoveRequest {
    MoveRequest {
        id: id(key),
        target_x: Some(x),
        target_y: Some(y),
        user_action: true,
    }
}

#[test]
fn dragging_onto_a_neighbor_swaps_it_below() {
    let board = layout(vec![item("a", 0, 0, 2, 2), item("b", 2, 0, 2, 2)]);
    let outcome = apply_move(&board, ctx(12), InteractionPolicy::default(), &user_move("a", 2, 0));

    let a = outcome.layout.get(&id("a")).expect("a kept");
    let b = outcome.layout.get(&id("b")).expect("b kept");
    assert_eq!((a.x, a.y), (2, 0));
    assert_eq!((b.x, b.y), (2, 2), "displaced directly beneath the dragged item");
}

#[test]
fn out_of_grid_geometry_is_clamped_not_rejected() {
    let board = layout(vec![item("a", 3, 0, 2, 1)]);
    let corrected = correct_bounds(&board, ctx(4));
    assert_eq!(corrected.get(&id("a")).map(|i| i.x), Some(2));
}

#[test]
fn reconciliation_first_fits_newcomers_row_by_row() {
    let previous = layout(vec![item("a", 0, 0, 1, 1)]);
    let request = SyncRequest {
        children: vec![
            ChildEntry::new(id("a")),
            ChildEntry::new(id("b")),
            ChildEntry::new(id("c")),
        ],
    };
    let synced = apply_sync(&previous, ctx(2), &request).expect("syncs");

    let b = synced.get(&id("b")).expect("b placed");
    let c = synced.get(&id("c")).expect("c placed");
    assert_eq!((b.x, b.y), (1, 0), "first free cell in row 0");
    assert_eq!((c.x, c.y), (0, 1), "row 0 full, row 1 starts at the left edge");
}

#[test]
fn compaction_closes_gaps_regardless_of_input_order() {
    let request = SyncRequest {
        children: vec![
            ChildEntry::new(id("c")).with_declared(DeclaredGeometry::new(1, 5, 1, 1)),
            ChildEntry::new(id("a")).with_declared(DeclaredGeometry::new(0, 0, 1, 1)),
        ],
    };
    let synced = apply_sync(&Layout::new(), ctx(2), &request).expect("syncs");

    assert_eq!(synced.get(&id("c")).map(|i| i.y), Some(0));
    assert_eq!(synced.get(&id("a")).map(|i| i.y), Some(0));
}

#[test]
fn static_items_ride_out_every_operation() {
    let board = layout(vec![
        item("s", 0, 2, 2, 2).pinned(),
        item("a", 2, 0, 2, 2),
    ]);
    let policy = InteractionPolicy::default();

    let after_move = apply_move(&board, ctx(4), policy, &user_move("a", 0, 0)).layout;
    let after_resize = apply_resize(
        &after_move,
        ctx(4),
        policy,
        &ResizeRequest {
            id: id("a"),
            target_w: 4,
            target_h: 3,
        },
    )
    .layout;

    let s = after_resize.get(&id("s")).expect("s kept");
    assert_eq!((s.x, s.y, s.w, s.h), (0, 2, 2, 2));

    // Direct requests against the static itself are no-ops.
    let nudged = apply_move(&after_resize, ctx(4), policy, &user_move("s", 2, 5));
    assert_eq!(nudged.layout, after_resize);
    assert!(nudged.placeholder.is_none());
}

#[test]
fn a_drag_sequence_keeps_the_board_settled() {
    // Simulate a pointer sweep: the dragged item crosses two neighbors.
    let mut board = layout(vec![
        item("a", 0, 0, 2, 2),
        item("b", 2, 0, 2, 2),
        item("c", 4, 0, 2, 2),
    ]);
    let policy = InteractionPolicy::default();

    for step_x in [1, 2, 3, 4] {
        let outcome = apply_move(&board, ctx(6), policy, &user_move("a", step_x, 0));
        let placeholder = outcome.placeholder.expect("drag in progress");
        assert_eq!(placeholder.id, id("a"));
        board = outcome.layout;
    }

    let a = board.get(&id("a")).expect("a kept");
    assert_eq!((a.x, a.y), (4, 0));
    // Every cell pair is overlap-free after the sweep.
    for first in board.iter() {
        for second in board.iter() {
            if first.id != second.id {
                assert!(!first.rect().overlaps(&second.rect()));
            }
        }
    }
}

#[test]
fn snapshot_round_trip_preserves_the_board() {
    let board = layout(vec![
        item("a", 0, 0, 2, 2),
        item("s", 2, 0, 2, 4).pinned(),
        item("b", 0, 2, 2, 1),
    ]);
    let snapshot = LayoutSnapshot::capture(&board, ctx(4));
    let hash = snapshot.state_hash();

    let json = serde_json::to_string_pretty(&snapshot).expect("snapshot serializes");
    let parsed: LayoutSnapshot = serde_json::from_str(&json).expect("snapshot parses");
    assert_eq!(parsed.state_hash(), hash);

    let (restored, restored_ctx) = parsed.restore().expect("snapshot restores");
    assert_eq!(restored, board);

    // A restored board accepts requests like a live one: a drops at y=5 and
    // settles just below b.
    let outcome = apply_move(
        &restored,
        restored_ctx,
        InteractionPolicy::default(),
        &user_move("a", 0, 5),
    );
    assert_eq!(outcome.layout.get(&id("a")).map(|i| i.y), Some(2));
}

#[test]
fn placeholder_tracks_the_pre_settlement_rect() {
    let board = layout(vec![item("a", 0, 0, 1, 1)]);
    let outcome = apply_move(&board, ctx(4), InteractionPolicy::default(), &user_move("a", 3, 7));

    assert_eq!(
        outcome.placeholder.expect("placeholder").rect,
        GridRect::new(3, 7, 1, 1),
        "placeholder shows the drop position before compaction"
    );
    assert_eq!(outcome.layout.get(&id("a")).map(|i| i.y), Some(0));
}
