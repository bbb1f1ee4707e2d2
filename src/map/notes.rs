//! Free-text notes attached to a map.
//!
//! Lines of the form `- A1 ...` declare a note id (up to five non-space
//! characters) that cells can reference through `Location::note_id`.

use std::sync::LazyLock;

use parking_lot::Mutex;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::signal::Signal;

static NOTE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-\s*(\S{1,5})\b").unwrap_or_else(|e| panic!("note id pattern: {e}"))
});

/// A note id and the line of the text declaring it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: String,
    pub line: usize,
}

#[derive(Debug, Default)]
struct NotesState {
    text: String,
    notes: Vec<Note>,
}

#[derive(Debug, Default)]
pub struct NotesModel {
    state: Mutex<NotesState>,
    changed: Signal,
}

/// Note ids declared in `text`, in line order. A repeated id keeps its last line.
pub fn parse_note_ids(text: &str) -> Vec<Note> {
    let mut notes: Vec<Note> = Vec::new();
    for (line, s) in text.split('\n').enumerate() {
        let Some(caps) = NOTE_ID.captures(s) else {
            continue;
        };
        let id = caps[1].to_string();
        match notes.iter_mut().find(|n| n.id == id) {
            Some(existing) => existing.line = line,
            None => notes.push(Note { id, line }),
        }
    }
    notes
}

impl NotesModel {
    pub fn new(text: impl Into<String>) -> Self {
        let model = Self::default();
        model.update(text);
        model
    }

    pub fn changed(&self) -> &Signal {
        &self.changed
    }

    /// Replaces the text. Listeners fire only when the set of notes changes.
    pub fn update(&self, text: impl Into<String>) {
        let text = text.into();
        let notes = parse_note_ids(&text);
        let changed = {
            let mut state = self.state.lock();
            let changed = state.notes != notes;
            state.notes = notes;
            state.text = text;
            changed
        };
        if changed {
            self.changed.notify();
        }
    }

    pub fn text(&self) -> String {
        self.state.lock().text.clone()
    }

    pub fn notes(&self) -> Vec<Note> {
        self.state.lock().notes.clone()
    }

    pub fn note_ids(&self) -> Vec<String> {
        self.state.lock().notes.iter().map(|n| n.id.clone()).collect()
    }

    pub fn note_position(&self, id: &str) -> Option<usize> {
        self.state
            .lock()
            .notes
            .iter()
            .find(|n| n.id == id)
            .map(|n| n.line)
    }

    pub fn len(&self) -> usize {
        self.state.lock().notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().notes.is_empty()
    }
}

#[derive(Serialize, Deserialize)]
struct NotesRecord {
    #[serde(default)]
    text: String,
}

impl Serialize for NotesModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NotesRecord { text: self.text() }.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for NotesModel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = NotesRecord::deserialize(deserializer)?;
        Ok(NotesModel::new(record.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_note_ids() {
        let text = "Dungeon level 1\n- A1 entrance hall\n-B2: guard room\n  - C3 indented\n- toolongid here";
        let notes = parse_note_ids(text);
        assert_eq!(
            notes,
            vec![
                Note {
                    id: "A1".into(),
                    line: 1
                },
                Note {
                    id: "B2".into(),
                    line: 2
                },
            ]
        );
    }

    #[test]
    fn test_repeated_id_keeps_last_line() {
        let notes = parse_note_ids("- X\n\n- X again");
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].line, 2);
    }

    #[test]
    fn test_update_notifies_on_note_set_change() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicUsize, Ordering};

        let model = NotesModel::default();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        model.changed().connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        model.update("- A1 first");
        model.update("- A1 first, edited");
        model.update("- A1 first\n- A2 second");

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(model.note_ids(), vec!["A1", "A2"]);
        assert_eq!(model.note_position("A2"), Some(1));
        assert_eq!(model.text(), "- A1 first\n- A2 second");
    }

    #[test]
    fn test_json_shape() {
        let model = NotesModel::new("- R1 room");
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#"{"text":"- R1 room"}"#);

        let back: NotesModel = serde_json::from_str(&json).unwrap();
        assert_eq!(back.note_ids(), vec!["R1"]);
    }
}
