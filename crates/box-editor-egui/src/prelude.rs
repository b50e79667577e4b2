pub use box_editor::prelude::*;

pub use crate::{EditorExt, EguiTextMetrics, SceneTextures};
