use uuid::Uuid;

use super::*;
use crate::editor::{MapElem, MapsModel, Mode};
use crate::editor::history::SelectElement;
use crate::map::{LayerKind, Position};

fn pos(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

fn map_with_floors(cells: &[(i32, i32, u32)]) -> MapElem {
    let map = MapElem::blank(100);
    for &(x, y, value) in cells {
        map.grid().set_floor(pos(x, y), 0, value);
    }
    map
}

#[test]
fn test_copy_only_takes_the_selected_layer() {
    let mut map = map_with_floors(&[(0, 0, 1), (1, 0, 2)]);
    let other = Uuid::new_v4();
    let index = map.grid().add_layer(other);
    map.grid().set_floor(pos(5, 5), index, 9);
    map.grid().move_up(index, index);

    map.begin_selection().unwrap();
    map.select(pos(0, 0), SelectElement::Floor).unwrap();
    map.select(pos(5, 5), SelectElement::Floor).unwrap();

    // The original layer now sits behind `other`.
    map.models().selected_layer.set(1);
    let copy = map.copy().unwrap();
    assert_eq!(copy.layer_id, map.grid().layer_id(1));
    assert_eq!(copy.locations.len(), 1);
    assert_eq!(copy.locations[&pos(0, 0)].floor, 1);
}

#[test]
fn test_copy_is_in_screen_frame() {
    let mut map = map_with_floors(&[(2, 0, 4)]);
    map.grid().set_wall(pos(2, 0), 0, true, 6);
    map.rotate_clockwise().unwrap();

    let floor_screen = map.rotation().from_canonical(pos(2, 0));
    let (wall_screen, wall_right) = map.rotation().wall_side_from_canonical(pos(2, 0), true);
    map.begin_selection().unwrap();
    map.select(floor_screen, SelectElement::Floor).unwrap();
    let wall_element = if wall_right {
        SelectElement::RightWall
    } else {
        SelectElement::BottomWall
    };
    map.select(wall_screen, wall_element).unwrap();

    let copy = map.copy().unwrap();
    assert_eq!(copy.locations[&floor_screen].floor, 4);
    assert_eq!(copy.locations[&wall_screen].wall(wall_right), 6);
}

#[test]
fn test_cut_clears_cells_and_selection() {
    let mut map = map_with_floors(&[(0, 0, 1), (1, 1, 2)]);
    map.begin_selection().unwrap();
    map.select(pos(0, 0), SelectElement::Floor).unwrap();

    let copy = map.cut().unwrap().unwrap();
    assert_eq!(copy.locations.len(), 1);
    assert_eq!(map.grid().floor(pos(0, 0), 0), 0);
    assert_eq!(map.grid().floor(pos(1, 1), 0), 2);
    assert!(map.selection().is_empty());

    map.undo().unwrap();
    assert_eq!(map.grid().floor(pos(0, 0), 0), 1);
    assert!(map.selection().is_floor_selected(pos(0, 0)));
}

#[test]
fn test_cut_without_selection_does_nothing() {
    let mut map = map_with_floors(&[(0, 0, 1)]);
    assert!(map.cut().unwrap().is_none());
    assert!(map.history().is_empty());
}

#[test]
fn test_paste_creates_selected_move_layer_in_front_of_selection() {
    let mut map = map_with_floors(&[(0, 0, 1), (1, 0, 2)]);
    let original = map.grid().layer_id(0);
    map.begin_selection().unwrap();
    map.select(pos(0, 0), SelectElement::Floor).unwrap();
    map.select(pos(1, 0), SelectElement::Floor).unwrap();
    let copy = map.copy().unwrap();

    map.paste(copy, pos(10, 10)).unwrap();
    assert_eq!(map.mode(), Mode::Move);
    assert_eq!(map.grid().len(), 2);
    assert_eq!(map.grid().layer_info(0).kind, LayerKind::Move);
    assert_eq!(map.grid().layer_id(1), original);
    assert_eq!(map.selected_layer(), Some(0));

    // Width 2, height 1 centered on (10,10) puts the top-left at (9,10).
    assert_eq!(map.grid().floor(pos(9, 10), 0), 1);
    assert_eq!(map.grid().floor(pos(10, 10), 0), 2);
    assert!(map.selection().is_floor_selected(pos(9, 10)));
    assert_eq!(map.selection().len(), 2);

    map.undo().unwrap();
    assert_eq!(map.grid().len(), 1);
    assert_eq!(map.mode(), Mode::Set);
}

#[test]
fn test_paste_commits_previous_move_layer() {
    let mut map = map_with_floors(&[(0, 0, 1)]);
    map.begin_selection().unwrap();
    map.select(pos(0, 0), SelectElement::Floor).unwrap();
    let copy = map.copy().unwrap();

    map.paste(copy.clone(), pos(5, 5)).unwrap();
    map.paste(copy, pos(8, 8)).unwrap();

    let move_layers = map.grid().layer_indices_by_kind(LayerKind::Move);
    assert_eq!(move_layers.len(), 1);
    assert_eq!(map.grid().visible_floor(pos(5, 5)).1, 1);
    assert_eq!(map.grid().visible_floor(pos(8, 8)).1, 1);
}

#[test]
fn test_entering_move_mode_lifts_selection() {
    let mut map = map_with_floors(&[(3, 3, 7)]);
    map.set_mode(Mode::Select).unwrap();
    map.begin_selection().unwrap();
    map.select(pos(3, 3), SelectElement::Floor).unwrap();

    map.set_mode(Mode::Move).unwrap();
    let move_index = map.grid().layer_indices_by_kind(LayerKind::Move)[0];
    assert_eq!(map.grid().floor(pos(3, 3), move_index), 7);
    assert_eq!(map.grid().bounds(1 - move_index), crate::map::Rect::EMPTY);

    map.set_mode(Mode::Set).unwrap();
    assert!(map.grid().layer_indices_by_kind(LayerKind::Move).is_empty());
    assert_eq!(map.grid().len(), 1);
    assert_eq!(map.grid().floor(pos(3, 3), 0), 7);
    assert!(map.selection().is_empty());
}

#[test]
fn test_maps_model_clipboard_round() {
    let mut maps = MapsModel::new(50);
    let id = maps.new_map();
    let other = maps.new_map();
    {
        let map = maps.get_mut(id).unwrap();
        map.grid().set_floor(pos(0, 0), 0, 3);
        map.begin_selection().unwrap();
        map.select(pos(0, 0), SelectElement::Floor).unwrap();
    }

    assert!(maps.copy(id).unwrap());
    assert!(maps.clipboard().has_content());
    assert!(maps.paste(other).unwrap());

    let target = maps.get(other).unwrap();
    assert_eq!(target.grid().visible_floor(pos(0, 0)).1, 3);
}

#[test]
fn test_clipboard_clear_notifies_once() {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    let clipboard = ClipboardModel::default();
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    clipboard
        .changed()
        .connect(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

    clipboard.set(CopyResult::default());
    clipboard.clear();
    clipboard.clear();
    assert_eq!(count.load(Ordering::SeqCst), 2);
    assert!(clipboard.get().is_none());
}
