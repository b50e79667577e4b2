//! Provides the box editor for the Egui library.
//!
//! The scene is painted with the egui painter: faces are projected with the
//! editor camera and drawn back to front, labels are drawn as rotated text
//! and the gizmo is drawn from its tessellated draw data.
//!
//! # Usage
//!
//! Create an [`Editor`] once.
//!
//! ```
//! use box_editor_egui::prelude::*;
//!
//! let editor = Editor::new(EditorConfig::isometric(), Rect::NOTHING);
//! ```
//!
//! Then show it every frame. The editor takes all the space that is left in
//! the `Ui` and returns what happened this frame.
//!
//! ```ignore
//! let textures = SceneTextures::default();
//! for event in editor.interact(ui, &textures) {
//!     if let EditorEvent::DimensionChanged { axis, value } = event {
//!         println!("{} is now {value}", axis.name());
//!     }
//! }
//! ```

use egui::{FontId, Sense, Ui};

pub use box_editor::*;

mod paint;
pub mod prelude;

pub use paint::{SceneTextures, paint_gizmo, paint_scene};

/// Measures label text with the egui fonts.
///
/// Fonts are only available once the context has run a frame, so create
/// editors using this inside `update`.
#[derive(Clone)]
pub struct EguiTextMetrics {
    ctx: egui::Context,
}

impl EguiTextMetrics {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx }
    }
}

impl TextMetrics for EguiTextMetrics {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        self.ctx.fonts(|fonts| {
            fonts
                .layout_no_wrap(
                    text.to_owned(),
                    FontId::proportional(font_size),
                    Color32::BLACK,
                )
                .size()
                .x
        })
    }
}

pub trait EditorExt {
    /// Feed this frame's input to the editor and draw it to Ui.
    ///
    /// Returns the events the input produced.
    fn interact(&mut self, ui: &mut Ui, textures: &SceneTextures) -> Vec<EditorEvent>;
}

impl EditorExt for Editor {
    fn interact(&mut self, ui: &mut Ui, textures: &SceneTextures) -> Vec<EditorEvent> {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());

        let mut events = self.resize(rect);
        self.set_pixels_per_point(ui.ctx().pixels_per_point());

        let (hover_pos, pressed, released, moving, scroll) = ui.input(|input| {
            (
                input.pointer.hover_pos(),
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
                input.pointer.is_moving(),
                input.smooth_scroll_delta.y,
            )
        });

        if let Some(pos) = hover_pos {
            if pressed && response.hovered() {
                events.extend(self.pointer_down(pos));
            } else if moving {
                events.extend(self.pointer_move(pos));
            }
        }

        if released {
            events.extend(self.pointer_up());
        }

        if response.hovered() && scroll != 0.0 {
            // One wheel notch scrolls about 50 points.
            self.zoom(f64::from(scroll) / 50.0);
        }

        let painter = ui.painter_at(rect);
        paint_scene(&painter, self, textures);
        paint_gizmo(&painter, self.gizmo().draw());

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn egui_metrics_measure_with_loaded_fonts() {
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |_| {});

        let metrics = EguiTextMetrics::new(ctx);
        let short = metrics.text_width("w: 1", 24.0);
        let long = metrics.text_width("w: 1000", 24.0);

        assert!(short > 0.0);
        assert!(long > short);
        assert!(metrics.text_width("w: 1", 48.0) > short);
    }

    #[test]
    fn reexported_color_is_the_egui_color() {
        let color: egui::Color32 = Color32::BLACK;
        assert_eq!(color, egui::Color32::from_rgb(0, 0, 0));
    }
}
