use box_editor_egui::prelude::*;
use eframe::{NativeOptions, egui};

struct ExampleApp {
    editor: Option<Editor>,
    textures: SceneTextures,
    last_change: Option<(Axis, f64)>,
}

impl ExampleApp {
    fn new() -> Self {
        Self {
            editor: None,
            textures: SceneTextures::default(),
            last_change: None,
        }
    }

    fn draw_editor(&mut self, ui: &mut egui::Ui) {
        let editor = self
            .editor
            .get_or_insert_with(|| Editor::new(EditorConfig::isometric(), ui.max_rect()));

        for event in editor.interact(ui, &self.textures) {
            if let EditorEvent::DimensionChanged { axis, value } = event {
                self.last_change = Some((axis, value));
            }
        }
    }

    fn draw_options(&self, ui: &mut egui::Ui) {
        ui.heading("Box");
        ui.separator();

        let Some(editor) = &self.editor else {
            return;
        };

        let params = editor.params();
        for axis in Axis::ALL {
            ui.label(format!("{}: {:.0}", axis.name(), params.dimension(axis)));
        }

        if let Some((axis, value)) = self.last_change {
            ui.separator();
            ui.label(format!("last change: {} = {value:.0}", axis.name()));
        }
    }
}

impl eframe::App for ExampleApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        egui::SidePanel::left("options_panel").show(ctx, |ui| {
            self.draw_options(ui);
        });

        egui::CentralPanel::default()
            .frame(egui::Frame::new())
            .show(ctx, |ui| {
                self.draw_editor(ui);
            });

        ctx.request_repaint();
    }
}

fn main() -> eframe::Result<()> {
    eframe::run_native(
        "box_editor_egui example",
        NativeOptions::default(),
        Box::new(|_| Ok(Box::new(ExampleApp::new()))),
    )
}
