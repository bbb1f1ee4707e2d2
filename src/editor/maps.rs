//! Open maps and the routines that turn user gestures into history entries.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bevy::prelude::Resource;
use parking_lot::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use super::clipboard::{ClipboardModel, CopyResult, copy_selection};
use super::history::{
    Action, ActionContainer, ActionModels, CutAction, Grouped, HistoryQueue, HistoryLookup,
    MoveToSelectedAction, PasteToMoveLayerAction, Reversible, RotateAction, SelectAction,
    SelectElement, SetCenterAction, SetModeAction, SetModeAndMergeDownMoveLayerAction,
    UnselectAllAction,
};
use super::{CenterModel, Mode, ModeModel, SelectedLayerModel, SelectionModel};
use crate::constants::{DEFAULT_HISTORY_SIZE, DEFAULT_LAYER_NAME};
use crate::error::{EditorError, HistoryError, Result};
use crate::map::persistence::{load_map_file, save_map_file};
use crate::map::{GridModel, LayerKind, NotesModel, Position};
use crate::rotation::{RotatedGrid, RotatedSelection, RotationModel};
use crate::signal::Signal;

/// Identity of an open map for the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MapId(Uuid);

impl MapId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for MapId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The live models of one map. Shared so listeners can hold on to them.
#[derive(Debug, Clone)]
pub struct MapModels {
    pub grid: Arc<GridModel>,
    pub rotation: Arc<RotationModel>,
    pub selection: Arc<SelectionModel>,
    pub mode: Arc<ModeModel>,
    pub selected_layer: Arc<SelectedLayerModel>,
    pub center: Arc<CenterModel>,
    pub notes: Arc<NotesModel>,
}

impl MapModels {
    fn new(grid: GridModel, notes: NotesModel) -> Self {
        let selected = if grid.is_empty() { -1 } else { 0 };
        Self {
            grid: Arc::new(grid),
            rotation: Arc::default(),
            selection: Arc::default(),
            mode: Arc::default(),
            selected_layer: Arc::new(SelectedLayerModel::new(selected)),
            center: Arc::default(),
            notes: Arc::new(notes),
        }
    }

    pub fn bundle(&self) -> ActionModels<'_> {
        ActionModels {
            grid: &self.grid,
            rotation: &self.rotation,
            selection: &self.selection,
            mode: &self.mode,
            selected_layer: &self.selected_layer,
            center: &self.center,
        }
    }

    pub fn grid_view(&self) -> RotatedGrid<'_> {
        RotatedGrid::new(&self.grid, &self.rotation)
    }

    pub fn selection_view(&self) -> RotatedSelection<'_> {
        RotatedSelection::new(&self.selection, &self.grid, &self.rotation)
    }
}

/// Keeps the viewport center on the same map cell across rotations.
fn follow_rotation(rotation: &RotationModel, center: &Arc<CenterModel>) {
    let pending = Arc::new(Mutex::new(Position::ORIGIN));

    let (before_center, before_pending) = (Arc::clone(center), Arc::clone(&pending));
    rotation.before_rotate().connect(move |old| {
        *before_pending.lock() = old.to_canonical(before_center.get());
    });

    let after_center = Arc::clone(center);
    rotation.after_rotate().connect(move |new| {
        let canonical = *pending.lock();
        after_center.set(new.from_canonical(canonical));
    });
}

/// One open map: its models, its history and where it lives on disk.
#[derive(Debug)]
pub struct MapElem {
    id: MapId,
    models: MapModels,
    history: HistoryQueue,
    generation: u64,
    /// `None` once a gesture grew the saved generation after the save.
    saved_generation: Option<u64>,
    notes_edited: Arc<AtomicBool>,
    file_path: Option<PathBuf>,
}

impl MapElem {
    pub fn new(grid: GridModel, notes: NotesModel, history_size: usize) -> Self {
        let models = MapModels::new(grid, notes);
        follow_rotation(&models.rotation, &models.center);

        let notes_edited = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&notes_edited);
        models
            .notes
            .changed()
            .connect(move |_| flag.store(true, Ordering::Relaxed));

        Self {
            id: MapId::new(),
            models,
            history: HistoryQueue::new(history_size),
            generation: 0,
            saved_generation: Some(0),
            notes_edited,
            file_path: None,
        }
    }

    /// A map with a single empty regular layer, selected.
    pub fn blank(history_size: usize) -> Self {
        let grid = GridModel::new();
        let index = grid.add_layer(Uuid::new_v4());
        grid.set_layer_name(index, DEFAULT_LAYER_NAME);
        Self::new(grid, NotesModel::default(), history_size)
    }

    pub fn id(&self) -> MapId {
        self.id
    }

    pub fn models(&self) -> &MapModels {
        &self.models
    }

    pub fn grid(&self) -> &GridModel {
        &self.models.grid
    }

    pub fn rotation(&self) -> &RotationModel {
        &self.models.rotation
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.models.selection
    }

    pub fn mode(&self) -> Mode {
        self.models.mode.get()
    }

    pub fn notes(&self) -> &NotesModel {
        &self.models.notes
    }

    pub fn center(&self) -> Position {
        self.models.center.get()
    }

    pub fn history(&self) -> &HistoryQueue {
        &self.history
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn set_file_path(&mut self, path: impl Into<PathBuf>) {
        self.file_path = Some(path.into());
    }

    /// Unsaved edits, or never saved at all.
    pub fn is_dirty(&self) -> bool {
        self.file_path.is_none()
            || self.saved_generation != Some(self.generation)
            || self.notes_edited.load(Ordering::Relaxed)
    }

    pub fn mark_saved(&mut self) {
        self.saved_generation = Some(self.generation);
        self.notes_edited.store(false, Ordering::Relaxed);
    }

    /// The selected layer's index, if it names an existing layer.
    pub fn selected_layer(&self) -> Option<usize> {
        self.models
            .selected_layer
            .index()
            .filter(|index| *index < self.models.grid.len())
    }

    pub fn selected_layer_id(&self) -> Option<Uuid> {
        self.selected_layer()
            .map(|index| self.models.grid.layer_id(index))
    }

    /// Applies `action` and records it as the new current generation.
    ///
    /// A stale generation is rejected before anything is touched.
    pub fn apply(&mut self, action: impl Into<Action>) -> std::result::Result<u64, HistoryError> {
        self.history.check_generation(self.generation)?;

        let mut action = action.into();
        let kind = action.kind_name();
        action.redo(&self.models.bundle());
        self.generation = self.history.add_action(self.generation, action)?;

        debug!("Map {} applied {} as generation {}", self.id, kind, self.generation);
        Ok(self.generation)
    }

    /// Starts a gesture: an empty container that the following
    /// [`apply_grouped`](Self::apply_grouped) calls of the same kind fill.
    pub fn begin_group<A: Grouped>(&mut self) -> std::result::Result<u64, HistoryError> {
        self.apply(A::into_action(ActionContainer::new()))
    }

    /// Applies `action` into the container at the current generation when that
    /// container is the newest entry and holds `A`, else into a new one.
    pub fn apply_grouped<A: Grouped>(&mut self, action: A) -> std::result::Result<u64, HistoryError> {
        let models = self.models.bundle();
        if let Some(tail) = self.history.tail_action_mut(self.generation)
            && let Some(group) = A::group_mut(tail)
        {
            group.apply(action, &models);
            // The saved generation no longer describes what is on screen.
            if self.saved_generation == Some(self.generation) {
                self.saved_generation = None;
            }
            return Ok(self.generation);
        }
        self.apply(A::into_action(ActionContainer::from(action)))
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo(self.generation)
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo(self.generation)
    }

    /// Reverses the current generation. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> std::result::Result<bool, HistoryError> {
        self.history.check_generation(self.generation)?;
        let Some(previous) = self.history.action_before(self.generation).generation() else {
            return Ok(false);
        };
        let Some(action) = self.history.action_mut(self.generation) else {
            return Ok(false);
        };

        action.undo(&self.models.bundle());
        debug!("Map {} undid generation {}", self.id, self.generation);
        self.generation = previous;
        Ok(true)
    }

    /// Replays the generation after the current one. Returns false at the end.
    pub fn redo(&mut self) -> std::result::Result<bool, HistoryError> {
        self.history.check_generation(self.generation)?;
        let next = match self.history.action_after(self.generation) {
            HistoryLookup::Found(element) => element.generation,
            _ => return Ok(false),
        };
        let Some(action) = self.history.action_mut(next) else {
            return Ok(false);
        };

        action.redo(&self.models.bundle());
        debug!("Map {} redid generation {}", self.id, next);
        self.generation = next;
        Ok(true)
    }

    /// Switches the editing mode.
    ///
    /// Leaving for Set or Select commits the Move layer. Entering Move lifts
    /// the selection of the selected layer onto a fresh Move layer.
    pub fn set_mode(&mut self, mode: Mode) -> std::result::Result<(), HistoryError> {
        if self.mode() == mode {
            return Ok(());
        }

        match mode {
            Mode::Set | Mode::Select => {
                let group: ActionContainer<Action> = [
                    Action::from(UnselectAllAction::new()),
                    Action::from(SetModeAndMergeDownMoveLayerAction::new(mode)),
                ]
                .into_iter()
                .collect();
                self.apply(group)?;
            }
            Mode::Move => match self.copy().filter(|copy| !copy.is_empty()) {
                Some(copy) => {
                    let pos = copy.bounds().min;
                    let group: ActionContainer<Action> = [
                        Action::from(CutAction::new(copy.clone())),
                        Action::from(PasteToMoveLayerAction::new(pos, copy)),
                    ]
                    .into_iter()
                    .collect();
                    self.apply(group)?;
                }
                None => {
                    self.apply(SetModeAction::new(Mode::Move))?;
                }
            },
        }
        Ok(())
    }

    /// Copies the selected elements of the selected layer.
    pub fn copy(&self) -> Option<CopyResult> {
        let index = self.selected_layer()?;
        Some(copy_selection(
            &self.models.grid,
            &self.models.selection,
            &self.models.rotation,
            index,
        ))
    }

    /// Copies, then clears what was copied. Returns `None` when nothing was cut.
    pub fn cut(&mut self) -> std::result::Result<Option<CopyResult>, HistoryError> {
        let Some(copy) = self.copy().filter(|copy| !copy.is_empty()) else {
            return Ok(None);
        };
        self.apply(CutAction::new(copy.clone()))?;
        Ok(Some(copy))
    }

    /// Pastes `copy` onto a new Move layer centered on `center` (screen frame).
    pub fn paste(&mut self, copy: CopyResult, center: Position) -> std::result::Result<(), HistoryError> {
        if copy.is_empty() {
            return Ok(());
        }

        let bounds = copy.bounds();
        let pos = center - Position::new(bounds.width() / 2, bounds.height() / 2);
        let group: ActionContainer<Action> = [
            Action::from(SetModeAndMergeDownMoveLayerAction::new(Mode::Move)),
            Action::from(PasteToMoveLayerAction::new(pos, copy)),
        ]
        .into_iter()
        .collect();
        self.apply(group)?;
        Ok(())
    }

    /// Starts a selection gesture.
    pub fn begin_selection(&mut self) -> std::result::Result<u64, HistoryError> {
        self.begin_group::<SelectAction>()
    }

    pub fn select(&mut self, pos: Position, element: SelectElement) -> std::result::Result<(), HistoryError> {
        self.apply_grouped(SelectAction::new(pos, element))?;
        Ok(())
    }

    pub fn unselect_all(&mut self) -> std::result::Result<(), HistoryError> {
        if self.models.selection.is_empty() {
            return Ok(());
        }
        self.apply(UnselectAllAction::new())?;
        Ok(())
    }

    /// Starts a drag of the Move layer.
    pub fn begin_drag(&mut self) -> std::result::Result<u64, HistoryError> {
        self.begin_group::<MoveToSelectedAction>()
    }

    /// Drags the Move layer and the selection by a screen-frame offset.
    /// Returns false when there is no Move layer.
    pub fn drag_move(&mut self, offset: Position) -> std::result::Result<bool, HistoryError> {
        let grid = &self.models.grid;
        let Some(&index) = grid.layer_indices_by_kind(LayerKind::Move).first() else {
            return Ok(false);
        };
        let move_layer = grid.layer_id(index);
        self.apply_grouped(MoveToSelectedAction::new(move_layer, offset))?;
        Ok(true)
    }

    pub fn rotate_clockwise(&mut self) -> std::result::Result<(), HistoryError> {
        self.apply_grouped(RotateAction::Clockwise)?;
        Ok(())
    }

    pub fn rotate_counterclockwise(&mut self) -> std::result::Result<(), HistoryError> {
        self.apply_grouped(RotateAction::Counterclockwise)?;
        Ok(())
    }

    /// Moves the viewport. Consecutive scrolls undo as one step.
    pub fn scroll_to(&mut self, center: Position) -> std::result::Result<(), HistoryError> {
        self.apply_grouped(SetCenterAction::new(center))?;
        Ok(())
    }
}

/// Every open map, plus the clipboard they share.
#[derive(Resource, Debug)]
pub struct MapsModel {
    maps: HashMap<MapId, MapElem>,
    clipboard: ClipboardModel,
    history_size: usize,
    changed: Signal<MapId>,
}

impl Default for MapsModel {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}

impl MapsModel {
    pub fn new(history_size: usize) -> Self {
        Self {
            maps: HashMap::new(),
            clipboard: ClipboardModel::default(),
            history_size,
            changed: Signal::default(),
        }
    }

    /// Undo depth for maps created or opened from now on.
    pub fn set_history_size(&mut self, history_size: usize) {
        self.history_size = history_size;
    }

    pub fn history_size(&self) -> usize {
        self.history_size
    }

    /// Fires with the id of a map that was created, opened, saved or closed.
    pub fn changed(&self) -> &Signal<MapId> {
        &self.changed
    }

    pub fn clipboard(&self) -> &ClipboardModel {
        &self.clipboard
    }

    pub fn new_map(&mut self) -> MapId {
        let map = MapElem::blank(self.history_size);
        let id = map.id();
        self.maps.insert(id, map);
        info!("Created map {}", id);
        self.changed.emit(&id);
        id
    }

    /// Opens `path`, or returns the map already showing it.
    pub fn open(&mut self, path: &Path) -> Result<MapId> {
        if let Some(map) = self
            .maps
            .values()
            .find(|map| map.file_path() == Some(path))
        {
            debug!("Map {:?} is already open as {}", path, map.id());
            return Ok(map.id());
        }

        let (grid, notes) = load_map_file(path).map_err(|source| EditorError::File {
            path: path.to_path_buf(),
            source,
        })?;

        let mut map = MapElem::new(grid, notes, self.history_size);
        map.set_file_path(path);
        map.mark_saved();

        let id = map.id();
        info!("Opened {:?} as map {}", path, id);
        self.maps.insert(id, map);
        self.changed.emit(&id);
        Ok(id)
    }

    /// Writes the map to `path`, or to where it was last loaded or saved.
    pub fn save(&mut self, id: MapId, path: Option<&Path>) -> Result<PathBuf> {
        let map = self.maps.get_mut(&id).ok_or(EditorError::UnknownMap(id))?;
        let path = match path.or(map.file_path()) {
            Some(path) => path.to_path_buf(),
            None => return Err(EditorError::NoFilePath(id)),
        };

        save_map_file(&path, map.grid(), map.notes()).map_err(|source| EditorError::File {
            path: path.clone(),
            source,
        })?;

        map.set_file_path(&path);
        map.mark_saved();
        info!("Saved map {} to {:?}", id, path);
        self.changed.emit(&id);
        Ok(path)
    }

    pub fn close(&mut self, id: MapId) -> Result<MapElem> {
        let map = self.maps.remove(&id).ok_or(EditorError::UnknownMap(id))?;
        info!("Closed map {}", id);
        self.changed.emit(&id);
        Ok(map)
    }

    pub fn get(&self, id: MapId) -> Result<&MapElem> {
        self.maps.get(&id).ok_or(EditorError::UnknownMap(id))
    }

    pub fn get_mut(&mut self, id: MapId) -> Result<&mut MapElem> {
        self.maps.get_mut(&id).ok_or(EditorError::UnknownMap(id))
    }

    pub fn ids(&self) -> Vec<MapId> {
        let mut ids: Vec<_> = self.maps.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Paths of every open map that has one, sorted.
    pub fn open_files(&self) -> Vec<PathBuf> {
        let mut paths: Vec<_> = self
            .maps
            .values()
            .filter_map(|map| map.file_path().map(Path::to_path_buf))
            .collect();
        paths.sort();
        paths
    }

    /// Copies the selection of map `id` into the clipboard.
    pub fn copy(&self, id: MapId) -> Result<bool> {
        let copy = self.get(id)?.copy().filter(|copy| !copy.is_empty());
        match copy {
            Some(copy) => {
                self.clipboard.set(copy);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Cuts the selection of map `id` into the clipboard.
    pub fn cut(&mut self, id: MapId) -> Result<bool> {
        match self.get_mut(id)?.cut()? {
            Some(copy) => {
                self.clipboard.set(copy);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Pastes the clipboard into map `id` around its viewport center.
    pub fn paste(&mut self, id: MapId) -> Result<bool> {
        let Some(copy) = self.clipboard.get().filter(|copy| !copy.is_empty()) else {
            return Ok(false);
        };
        let map = self.get_mut(id)?;
        let center = map.center();
        map.paste(copy, center)?;
        Ok(true)
    }
}
