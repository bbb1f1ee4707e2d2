//! End-to-end editing through the public API: history, rotation, layers and files.

use gridforged::editor::history::{
    AddLayerAction, DeleteLayerAction, MergeLayerDownAction, SetFloorAction,
};
use gridforged::editor::{MapElem, MapsModel};
use gridforged::map::{LayerKind, Position};
use gridforged::rotation::Angle;
use gridforged::{EditorError, MapFileError};

fn add_layer(map: &mut MapElem, name: &str) -> uuid::Uuid {
    map.apply(AddLayerAction::new(name, true, LayerKind::Regular))
        .unwrap();
    map.grid().layer_id(map.grid().len() - 1)
}

#[test]
fn test_floor_survives_rotation_and_unwinds() {
    let mut map = MapElem::blank(100);
    let before = map.grid().snapshot();

    let l1 = add_layer(&mut map, "L1");
    map.apply(SetFloorAction::new(Position::ORIGIN, l1, 5))
        .unwrap();
    map.rotate_clockwise().unwrap();

    assert_eq!(map.rotation().angle(), Angle::Deg90);
    let (owner, value) = map.models().grid_view().visible_floor(Position::ORIGIN);
    assert_eq!(owner, l1);
    assert_eq!(value, 5);

    assert!(map.undo().unwrap());
    assert_eq!(map.rotation().angle(), Angle::Deg0);
    assert!(map.undo().unwrap());
    assert_eq!(map.grid().visible_floor(Position::ORIGIN).1, 0);
    assert!(map.undo().unwrap());
    assert_eq!(map.grid().snapshot(), before);
    assert!(!map.undo().unwrap());
}

#[test]
fn test_delete_then_undo_keeps_order_and_ids() {
    let mut map = MapElem::blank(100);
    let a = map.grid().layer_id(0);
    let b = add_layer(&mut map, "B");
    let c = add_layer(&mut map, "C");

    map.apply(DeleteLayerAction::new(b)).unwrap();
    assert_eq!(map.grid().len(), 2);
    assert_eq!(map.grid().layer_index_by_id(b), None);

    map.undo().unwrap();
    let ids: Vec<_> = (0..map.grid().len()).map(|i| map.grid().layer_id(i)).collect();
    assert_eq!(ids, vec![a, b, c]);
}

#[test]
fn test_merge_down_undoes_in_one_call() {
    let mut map = MapElem::blank(100);
    let x = map.grid().layer_id(0);
    let y = add_layer(&mut map, "Y");
    map.apply(SetFloorAction::new(Position::new(2, 3), x, 8))
        .unwrap();

    map.apply(MergeLayerDownAction::new(x)).unwrap();
    assert_eq!(map.grid().len(), 1);
    assert_eq!(map.grid().layer_id(0), y);
    assert_eq!(map.grid().floor(Position::new(2, 3), 0), 8);

    map.undo().unwrap();
    assert_eq!(map.grid().len(), 2);
    assert_eq!(map.grid().layer_id(0), x);
    assert_eq!(map.grid().floor(Position::new(2, 3), 0), 8);
    assert!(map.grid().locations(1).is_empty());
}

#[test]
fn test_redo_after_undo_replays_same_layer() {
    let mut map = MapElem::blank(100);
    let l1 = add_layer(&mut map, "L1");

    map.undo().unwrap();
    assert_eq!(map.grid().layer_index_by_id(l1), None);
    assert!(map.redo().unwrap());
    assert_eq!(map.grid().layer_index_by_id(l1), Some(1));
    assert!(!map.redo().unwrap());
}

#[test]
fn test_save_open_and_dirty_tracking() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keep.map");

    let mut maps = MapsModel::new(20);
    let id = maps.new_map();
    let layer = maps.get(id).unwrap().grid().layer_id(0);
    assert!(maps.get(id).unwrap().is_dirty());

    {
        let map = maps.get_mut(id).unwrap();
        map.apply(SetFloorAction::new(Position::new(1, 1), layer, 3))
            .unwrap();
        map.notes().update("- A1 entrance");
    }
    assert_eq!(maps.save(id, Some(&path)).unwrap(), path);
    assert!(!maps.get(id).unwrap().is_dirty());

    {
        let map = maps.get_mut(id).unwrap();
        map.apply(SetFloorAction::new(Position::new(2, 2), layer, 4))
            .unwrap();
        assert!(map.is_dirty());
        map.undo().unwrap();
        assert!(!map.is_dirty());
        map.notes().update("- A1 entrance\n- A2 cellar");
        assert!(map.is_dirty());
    }

    let mut other = MapsModel::new(20);
    let opened = other.open(&path).unwrap();
    assert_eq!(other.open(&path).unwrap(), opened);
    assert_eq!(other.len(), 1);

    let map = other.get(opened).unwrap();
    assert!(!map.is_dirty());
    assert_eq!(map.grid().floor(Position::new(1, 1), 0), 3);
    assert_eq!(map.notes().text(), "- A1 entrance");
    assert_eq!(other.open_files(), vec![path]);
}

#[test]
fn test_save_without_path_is_an_error() {
    let mut maps = MapsModel::new(20);
    let id = maps.new_map();
    assert!(matches!(maps.save(id, None), Err(EditorError::NoFilePath(_))));
}

#[test]
fn test_open_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.map");

    let mut maps = MapsModel::new(20);
    match maps.open(&path) {
        Err(EditorError::File {
            path: failed,
            source: MapFileError::Io(_),
        }) => assert_eq!(failed, path),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(maps.is_empty());
}

#[test]
fn test_closed_map_is_unknown() {
    let mut maps = MapsModel::new(20);
    let id = maps.new_map();
    maps.close(id).unwrap();
    assert!(matches!(maps.get(id), Err(EditorError::UnknownMap(_))));
}
