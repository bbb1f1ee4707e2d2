//! Property tests for rotation, bounds and undo.

use proptest::prelude::*;

use gridforged::editor::MapElem;
use gridforged::editor::history::{
    Action, AddLayerAction, DeleteLayerAction, MoveLayerAction, RotateAction, SelectAction,
    SelectElement, SetFloorAction, SetLayerVisibleAction, SetNoteIdAction, SetWallAction,
    UnselectAllAction,
};
use gridforged::map::{GridModel, LayerKind, Position, Rect};
use gridforged::rotation::Angle;

fn angle() -> impl Strategy<Value = Angle> {
    prop::sample::select(Angle::ALL.to_vec())
}

fn position() -> impl Strategy<Value = Position> {
    (-50i32..50, -50i32..50).prop_map(|(x, y)| Position::new(x, y))
}

fn near() -> impl Strategy<Value = Position> {
    (-4i32..4, -4i32..4).prop_map(|(x, y)| Position::new(x, y))
}

fn element() -> impl Strategy<Value = SelectElement> {
    prop::sample::select(vec![
        SelectElement::Floor,
        SelectElement::RightWall,
        SelectElement::BottomWall,
    ])
}

/// One user edit. `usize` fields pick a layer modulo the current layer count.
#[derive(Debug, Clone)]
enum Edit {
    Floor(Position, u32, usize),
    Wall(Position, bool, u32, usize),
    Note(Position, Option<String>, usize),
    Select(Position, SelectElement),
    UnselectAll,
    Rotate(bool),
    Visible(usize, bool),
    AddLayer,
    DeleteLayer(usize),
    MoveLayer(i32, usize),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (near(), 0u32..5, any::<usize>()).prop_map(|(p, v, l)| Edit::Floor(p, v, l)),
        (near(), any::<bool>(), 0u32..5, any::<usize>())
            .prop_map(|(p, r, v, l)| Edit::Wall(p, r, v, l)),
        (near(), prop::option::of("[A-C][0-9]"), any::<usize>())
            .prop_map(|(p, id, l)| Edit::Note(p, id, l)),
        (near(), element()).prop_map(|(p, e)| Edit::Select(p, e)),
        Just(Edit::UnselectAll),
        any::<bool>().prop_map(Edit::Rotate),
        (any::<usize>(), any::<bool>()).prop_map(|(l, v)| Edit::Visible(l, v)),
        Just(Edit::AddLayer),
        any::<usize>().prop_map(Edit::DeleteLayer),
        (-2i32..=2, any::<usize>()).prop_map(|(o, l)| Edit::MoveLayer(o, l)),
    ]
}

/// The action for `edit` against the map as it is now, if it applies.
fn to_action(edit: Edit, map: &MapElem) -> Option<Action> {
    let grid = map.grid();
    // The last layer is never deleted, so there is always one to pick.
    let layer = |pick: usize| grid.layer_id(pick % grid.len());

    let action = match edit {
        Edit::Floor(p, v, l) => SetFloorAction::new(p, layer(l), v).into(),
        Edit::Wall(p, r, v, l) => SetWallAction::new(p, layer(l), r, v).into(),
        Edit::Note(p, id, l) => SetNoteIdAction::new(p, layer(l), id).into(),
        Edit::Select(p, e) => SelectAction::new(p, e).into(),
        Edit::UnselectAll => UnselectAllAction::new().into(),
        Edit::Rotate(true) => RotateAction::Clockwise.into(),
        Edit::Rotate(false) => RotateAction::Counterclockwise.into(),
        Edit::Visible(l, v) => SetLayerVisibleAction::new(layer(l), v).into(),
        Edit::AddLayer => AddLayerAction::new("Extra", true, LayerKind::Regular).into(),
        Edit::DeleteLayer(_) if grid.len() < 2 => return None,
        Edit::DeleteLayer(l) => DeleteLayerAction::new(layer(l)).into(),
        Edit::MoveLayer(o, l) => MoveLayerAction::new(o, layer(l)).into(),
    };
    Some(action)
}

proptest! {
    #[test]
    fn test_rotation_is_a_bijection(a in angle(), p in position()) {
        prop_assert_eq!(a.from_canonical(a.to_canonical(p)), p);
        prop_assert_eq!(a.to_canonical(a.from_canonical(p)), p);
    }

    #[test]
    fn test_wall_sides_round_trip(a in angle(), p in position(), is_right in any::<bool>()) {
        let (c, side) = a.wall_side_to_canonical(p, is_right);
        prop_assert_eq!(a.wall_side_from_canonical(c, side), (p, is_right));
    }

    #[test]
    fn test_full_turn_is_identity(p in position()) {
        let turned = Angle::ALL
            .iter()
            .fold(p, |q, _| Angle::Deg90.to_canonical(q));
        prop_assert_eq!(turned, p);
    }

    #[test]
    fn test_rotated_rect_covers_rotated_cells(
        a in angle(),
        min in position(),
        (w, h) in (1i32..8, 1i32..8),
    ) {
        let rect = Rect::new(min, Position::new(min.x + w, min.y + h));
        let expected = Rect::enclosing(rect.cells().map(|c| a.from_canonical(c)));
        prop_assert_eq!(a.rect_from_canonical(rect), expected);
    }

    #[test]
    fn test_bounds_are_minimal(cells in prop::collection::vec((position(), 1u32..9), 0..24)) {
        let grid = GridModel::new();
        let index = grid.add_layer(uuid::Uuid::new_v4());
        for &(p, v) in &cells {
            grid.set_floor(p, index, v);
        }

        let bounds = grid.bounds(index);
        prop_assert_eq!(bounds, Rect::enclosing(cells.iter().map(|(p, _)| *p)));
        for (p, _) in &cells {
            prop_assert!(bounds.contains(*p));
        }
    }

    #[test]
    fn test_undoing_every_edit_restores_the_models(edits in prop::collection::vec(edit(), 1..32)) {
        let mut map = MapElem::blank(64);
        let before = (
            map.grid().snapshot(),
            map.selection().selected(),
            map.rotation().angle(),
            map.center(),
        );

        let mut applied = 0;
        for edit in edits {
            if let Some(action) = to_action(edit, &map) {
                map.apply(action).unwrap();
                applied += 1;
            }
        }
        let after = (
            map.grid().snapshot(),
            map.selection().selected(),
            map.rotation().angle(),
            map.center(),
        );

        for _ in 0..applied {
            prop_assert!(map.undo().unwrap());
        }
        prop_assert!(!map.can_undo());
        prop_assert_eq!(
            (
                map.grid().snapshot(),
                map.selection().selected(),
                map.rotation().angle(),
                map.center(),
            ),
            before
        );

        for _ in 0..applied {
            prop_assert!(map.redo().unwrap());
        }
        prop_assert_eq!(
            (
                map.grid().snapshot(),
                map.selection().selected(),
                map.rotation().angle(),
                map.center(),
            ),
            after
        );
    }
}
