// Only names that do not clash with `bevy::prelude`.
pub use box_editor::{BoxParams, Editor, EditorConfig, EditorEvent, EditorMode, EditorPhase, Face};

pub use crate::{BoxEditor, BoxEditorPlugin, BoxEditorSettings, EditorCamera, EditorEvents};
