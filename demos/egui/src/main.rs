use anyhow::Context as _;
use eframe::{NativeOptions, egui};

use box_editor_egui::material::DEFAULT_IMAGE_PATH;
use box_editor_egui::prelude::*;

const MAX_SLIDER_DIMENSION: f64 = 500.0;

const DESCRIPTION: &str = "Click a white handle on the box to select it, then drag the arrow \
    to resize the box along that axis. Click empty space to deselect. Drag empty space to \
    orbit the camera and scroll to zoom.";

struct DemoApp {
    mode: EditorMode,
    /// Created on the first frame, once fonts are available for measuring labels.
    editor: Option<Editor>,
    textures: SceneTextures,
    image: Option<egui::TextureHandle>,
}

/// Loads an image from disk into an egui texture.
fn load_texture(ctx: &egui::Context, path: &str) -> anyhow::Result<egui::TextureHandle> {
    let image = image::open(path)
        .with_context(|| format!("failed to load {path}"))?
        .to_rgba8();

    let size = [image.width() as usize, image.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());

    Ok(ctx.load_texture(path, color_image, egui::TextureOptions::LINEAR))
}

impl DemoApp {
    fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut textures = SceneTextures::default();

        let image = match load_texture(&cc.egui_ctx, DEFAULT_IMAGE_PATH) {
            Ok(texture) => {
                textures.insert(DEFAULT_IMAGE_PATH, texture.clone());
                Some(texture)
            }
            Err(err) => {
                log::warn!("{err:#}, the panel will be blank");
                None
            }
        };

        Self {
            mode: EditorMode::Isometric,
            editor: None,
            textures,
            image,
        }
    }

    fn draw_options(&mut self, ui: &mut egui::Ui) {
        ui.heading("Box");
        ui.separator();

        let mut mode = self.mode;
        egui::ComboBox::from_label("Mode")
            .selected_text(mode.name())
            .show_ui(ui, |ui| {
                for option in EditorMode::ALL {
                    ui.selectable_value(&mut mode, option, option.name());
                }
            });

        if mode != self.mode {
            log::info!("switching to {} mode", mode.name());
            self.mode = mode;
            self.editor = None;
        }

        let Some(editor) = &mut self.editor else {
            return;
        };

        ui.add_space(8.0);

        egui::Grid::new("dimensions_grid")
            .num_columns(2)
            .show(ui, |ui| {
                for axis in Axis::ALL {
                    let mut value = editor.params().dimension(axis);
                    ui.label(axis.name());
                    let slider = egui::Slider::new(&mut value, MIN_DIMENSION..=MAX_SLIDER_DIMENSION)
                        .fixed_decimals(0);
                    if ui.add(slider).changed() {
                        editor.set_dimension(axis, value);
                    }
                    ui.end_row();
                }
            });

        ui.add_space(8.0);

        let selected = editor
            .attached_face()
            .map_or_else(|| "none".to_owned(), |face| face.to_string());
        ui.label(format!("Selected handle: {selected}"));
        ui.label(format!("Phase: {:?}", editor.phase()));
    }

    fn draw_description(&self, ui: &mut egui::Ui) {
        if let Some(image) = &self.image {
            ui.add(egui::Image::new(image).max_width(ui.available_width()));
        } else {
            let (rect, _) = ui.allocate_exact_size(
                egui::vec2(ui.available_width(), ui.available_width() * 0.6),
                egui::Sense::hover(),
            );
            ui.painter().rect_filled(rect, 0.0, egui::Color32::WHITE);
        }

        ui.add_space(8.0);
        ui.heading("Box editor");
        ui.label(DESCRIPTION);
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        egui::SidePanel::left("options_panel").show(ctx, |ui| {
            self.draw_options(ui);
        });

        egui::SidePanel::right("description_panel")
            .default_width(240.0)
            .show(ctx, |ui| {
                self.draw_description(ui);
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::new())
            .show(ctx, |ui| {
                let mode = self.mode;
                let editor = self.editor.get_or_insert_with(|| {
                    Editor::with_text_metrics(
                        mode.config(),
                        ui.max_rect(),
                        EguiTextMetrics::new(ctx.clone()),
                    )
                });

                editor.interact(ui, &self.textures);
            });

        ctx.request_repaint();
    }
}

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    eframe::run_native(
        "box-editor",
        NativeOptions::default(),
        Box::new(|cc| Ok(Box::new(DemoApp::new(cc)))),
    )
}
