use crate::app::EditorApp;
use crate::editor::Editor;
use crate::layer::ShapeGeometry;
use crate::selection::SelectionMode;
use crate::tool::{ToolId, ToolOptions};

pub fn tools_panel(app: &mut EditorApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active = app.editor().active_tool();
            for id in ToolId::ALL {
                if ui.selectable_label(active == Some(id), id.name()).clicked() {
                    log::info!("Tool selected from UI: {}", id);
                    if active == Some(id) {
                        app.editor_mut().deactivate_tool();
                    } else if let Err(err) = app.editor_mut().activate_tool(id) {
                        app.set_status(err.to_string());
                    }
                }
            }

            if let Some(id) = active {
                ui.separator();
                ui.heading("Tool Options");
                tool_options_ui(app, ui, id);
            }

            ui.separator();
            colors_ui(app, ui);

            ui.separator();
            history_ui(app, ui);
        });
}

fn tool_options_ui(app: &mut EditorApp, ui: &mut egui::Ui, id: ToolId) {
    let Some(mut options) = app.editor().tool_options(id) else {
        ui.label("No options");
        return;
    };
    let before = options.clone();
    match &mut options {
        ToolOptions::Brush { width } => {
            ui.add(egui::Slider::new(width, 0.5..=200.0).text("Width"));
        }
        ToolOptions::Marquee { mode, feather } => {
            ui.horizontal(|ui| {
                ui.selectable_value(mode, SelectionMode::Rectangle, "Rectangle");
                ui.selectable_value(mode, SelectionMode::Ellipse, "Ellipse");
            });
            ui.add(egui::Slider::new(feather, 0.0..=50.0).text("Feather"));
        }
        ToolOptions::Shape { geometry } => {
            egui::ComboBox::from_label("Shape")
                .selected_text(geometry.label())
                .show_ui(ui, |ui| {
                    for choice in [
                        ShapeGeometry::Rectangle,
                        ShapeGeometry::Ellipse,
                        ShapeGeometry::LINE,
                        ShapeGeometry::Polygon { sides: 5 },
                    ] {
                        let label = choice.label();
                        ui.selectable_value(geometry, choice, label);
                    }
                });
            if let ShapeGeometry::Polygon { sides } = geometry {
                ui.add(egui::Slider::new(sides, 3..=12).text("Sides"));
            }
        }
        ToolOptions::Text { font_family, font_size } => {
            ui.horizontal(|ui| {
                ui.label("Font");
                ui.text_edit_singleline(font_family);
            });
            ui.add(egui::Slider::new(font_size, 6.0..=200.0).text("Size"));
        }
    }
    if options != before {
        app.editor_mut().set_tool_options(id, options);
    }
}

fn colors_ui(app: &mut EditorApp, ui: &mut egui::Ui) {
    ui.heading("Colors");
    let colors = app.editor().document().colors().clone();

    ui.horizontal(|ui| {
        let mut foreground = colors.foreground();
        if ui.color_edit_button_srgba(&mut foreground).changed() {
            app.editor_mut().set_foreground_color(foreground);
        }
        let mut background = colors.background();
        if ui.color_edit_button_srgba(&mut background).changed() {
            app.editor_mut().set_background_color(background);
        }
        if ui.button("⇄").on_hover_text("Swap colors").clicked() {
            app.editor_mut().swap_colors();
        }
    });

    ui.horizontal_wrapped(|ui| {
        for color in colors.recent() {
            let (rect, response) = ui.allocate_exact_size(egui::vec2(16.0, 16.0), egui::Sense::click());
            ui.painter().rect_filled(rect, 2.0, *color);
            if response.clicked() {
                app.editor_mut().set_foreground_color(*color);
            }
        }
    });
}

/// Undo and Redo buttons, disabled when unavailable and naming the action on hover.
///
/// Returns which of the two was clicked.
pub fn undo_redo_buttons(ui: &mut egui::Ui, editor: &Editor) -> (bool, bool) {
    let history = editor.history();
    let mut undo = ui.add_enabled(history.can_undo(), egui::Button::new("Undo"));
    if let Some(description) = history.undo_description() {
        undo = undo.on_hover_text(format!("Undo {description}"));
    }
    let mut redo = ui.add_enabled(history.can_redo(), egui::Button::new("Redo"));
    if let Some(description) = history.redo_description() {
        redo = redo.on_hover_text(format!("Redo {description}"));
    }
    (undo.clicked(), redo.clicked())
}

fn history_ui(app: &mut EditorApp, ui: &mut egui::Ui) {
    ui.heading("History");
    let (undo, redo) = ui.horizontal(|ui| undo_redo_buttons(ui, app.editor())).inner;
    if undo {
        let _ = app.editor_mut().undo();
    }
    if redo {
        let _ = app.editor_mut().redo();
    }

    let history = app.editor().history();
    let current = history.current_index();
    let rows: Vec<(usize, String)> = history
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| (index, entry.description().to_owned()))
        .collect();

    let mut jump = None;
    egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
        for (index, description) in rows {
            if ui.selectable_label(current == Some(index), description).clicked() {
                jump = Some(index);
            }
        }
    });
    if let Some(index) = jump {
        if let Err(advisory) = app.editor_mut().go_to_history(index) {
            app.set_status(advisory.to_string());
        }
    }
}
