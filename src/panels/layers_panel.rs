use crate::app::EditorApp;
use crate::document::LayerMove;
use crate::layer::{
    AdjustmentContent, AdjustmentKind, BlendMode, LayerContent, LayerId, LayerKind, LayerOverrides, TextContent,
};

const THUMBNAIL_SIDE: f32 = 24.0;

pub fn layers_panel(app: &mut EditorApp, ctx: &egui::Context) {
    egui::SidePanel::right("layers_panel")
        .resizable(true)
        .default_width(240.0)
        .show(ctx, |ui| {
            ui.heading("Layers");

            ui.horizontal(|ui| {
                ui.menu_button("➕", |ui| {
                    for kind in [
                        LayerKind::Raster,
                        LayerKind::Text,
                        LayerKind::Shape,
                        LayerKind::Adjustment,
                        LayerKind::Group,
                    ] {
                        if ui.button(kind.label()).clicked() {
                            app.editor_mut().create_layer(kind, LayerOverrides::default());
                            ui.close_menu();
                        }
                    }
                });
                let active = app.editor().document().active_layer_id();
                if let Some(id) = active {
                    layer_actions_ui(app, ui, id);
                }
            });

            ui.separator();
            layer_list_ui(app, ui);

            if let Some(id) = app.editor().document().active_layer_id() {
                ui.separator();
                layer_properties_ui(app, ui, id);
            }
        });
}

fn layer_actions_ui(app: &mut EditorApp, ui: &mut egui::Ui, id: LayerId) {
    if ui.button("🗑").on_hover_text("Delete").clicked() {
        app.editor_mut().delete_layer(id);
    }
    if ui.button("⎘").on_hover_text("Duplicate").clicked() {
        app.editor_mut().duplicate_layer(id);
    }
    for (label, hint, direction) in [
        ("⏶", "Move up", LayerMove::Up),
        ("⏷", "Move down", LayerMove::Down),
        ("⏫", "Bring to front", LayerMove::Top),
        ("⏬", "Send to back", LayerMove::Bottom),
    ] {
        if ui.button(label).on_hover_text(hint).clicked() {
            app.editor_mut().move_layer(id, direction);
        }
    }
}

fn layer_list_ui(app: &mut EditorApp, ui: &mut egui::Ui) {
    struct Row {
        id: LayerId,
        name: String,
        visible: bool,
        locked: bool,
        thumbnail: Option<egui::TextureId>,
    }

    let active = app.editor().document().active_layer_id();
    let layers: Vec<_> = app
        .editor()
        .document()
        .layers()
        .iter()
        .rev()
        .map(|layer| (layer.id, layer.name.clone(), layer.visible, layer.locked, layer.presentation.thumbnail.clone()))
        .collect();
    let rows: Vec<Row> = layers
        .into_iter()
        .map(|(id, name, visible, locked, thumbnail)| Row {
            id,
            name,
            visible,
            locked,
            thumbnail: thumbnail.map(|image| app.texture(ui.ctx(), &format!("thumb-{id}"), image)),
        })
        .collect();

    egui::ScrollArea::vertical().show(ui, |ui| {
        for row in rows {
            ui.horizontal(|ui| {
                let mut visible = row.visible;
                if ui.checkbox(&mut visible, "").on_hover_text("Visible").changed() {
                    app.editor_mut().set_layer_visibility(row.id, visible);
                }
                let mut locked = row.locked;
                if ui.toggle_value(&mut locked, "🔒").changed() {
                    app.editor_mut().set_layer_locked(row.id, locked);
                }
                if let Some(texture) = row.thumbnail {
                    ui.image((texture, egui::vec2(THUMBNAIL_SIDE, THUMBNAIL_SIDE)));
                }
                if ui.selectable_label(active == Some(row.id), &row.name).clicked() {
                    app.editor_mut().set_active_layer(row.id);
                }
            });
        }
    });
}

fn layer_properties_ui(app: &mut EditorApp, ui: &mut egui::Ui, id: LayerId) {
    let Some(layer) = app.editor().document().layer(id) else {
        return;
    };
    let original_name = layer.name.clone();
    let original_opacity = i32::from(layer.opacity);
    let original_blend = layer.blend_mode;
    let kind = layer.kind();
    let content = layer.content.clone();

    ui.label(format!("{} layer", kind.label()));

    let name_key = ui.id().with(("name", id));
    let mut name = ui
        .data(|d| d.get_temp::<String>(name_key))
        .unwrap_or_else(|| original_name.clone());
    let response = ui.text_edit_singleline(&mut name);
    if response.lost_focus() {
        ui.data_mut(|d| d.remove::<String>(name_key));
        if name != original_name {
            app.editor_mut().rename_layer(id, &name);
        }
    } else if response.has_focus() {
        ui.data_mut(|d| d.insert_temp(name_key, name));
    }

    // The in-progress slider value lives in egui memory so a drag records one history entry
    let key = ui.id().with(("opacity", id));
    let mut opacity = ui.data(|d| d.get_temp::<i32>(key)).unwrap_or(original_opacity);
    let response = ui.add(egui::Slider::new(&mut opacity, 0..=100).text("Opacity"));
    if response.dragged() {
        ui.data_mut(|d| d.insert_temp(key, opacity));
    } else {
        ui.data_mut(|d| d.remove::<i32>(key));
        if opacity != original_opacity {
            app.editor_mut().set_layer_opacity(id, opacity);
        }
    }

    let mut blend_mode = original_blend;
    egui::ComboBox::from_label("Blend")
        .selected_text(blend_mode.label())
        .show_ui(ui, |ui| {
            for mode in BlendMode::ALL {
                ui.selectable_value(&mut blend_mode, mode, mode.label());
            }
        });
    if blend_mode != original_blend {
        app.editor_mut().set_layer_blend_mode(id, blend_mode);
    }

    match content {
        LayerContent::Text(text) => {
            ui.separator();
            text_content_ui(app, ui, id, text);
        }
        LayerContent::Adjustment(adjustment) => {
            ui.separator();
            adjustment_content_ui(app, ui, id, adjustment);
        }
        _ => {}
    }
}

fn text_content_ui(app: &mut EditorApp, ui: &mut egui::Ui, id: LayerId, text: TextContent) {
    // Edits are buffered until focus leaves the field
    let key = ui.id().with(("text", id));
    let mut content = ui
        .data(|d| d.get_temp::<String>(key))
        .unwrap_or_else(|| text.content.clone());
    let response = ui.add(egui::TextEdit::multiline(&mut content).desired_rows(3));
    if app.take_text_focus(id) {
        response.request_focus();
    }
    if response.lost_focus() {
        ui.data_mut(|d| d.remove::<String>(key));
        if content != text.content {
            let edited = TextContent { content, ..text };
            app.editor_mut().set_layer_content(id, LayerContent::Text(edited));
        }
        return;
    }
    if response.has_focus() {
        ui.data_mut(|d| d.insert_temp(key, content));
    }

    let size_key = ui.id().with(("font_size", id));
    let mut font_size = ui.data(|d| d.get_temp::<f32>(size_key)).unwrap_or(text.font_size);
    let response = ui.add(egui::Slider::new(&mut font_size, 6.0..=200.0).text("Size"));
    if response.dragged() {
        ui.data_mut(|d| d.insert_temp(size_key, font_size));
    } else {
        ui.data_mut(|d| d.remove::<f32>(size_key));
        if font_size != text.font_size {
            let edited = TextContent { font_size, ..text };
            app.editor_mut().set_layer_content(id, LayerContent::Text(edited));
        }
    }
}

fn adjustment_content_ui(app: &mut EditorApp, ui: &mut egui::Ui, id: LayerId, adjustment: AdjustmentContent) {
    let mut kind = adjustment.kind;
    egui::ComboBox::from_id_salt(("adjustment_kind", id))
        .selected_text(kind.label())
        .show_ui(ui, |ui| {
            for choice in AdjustmentKind::ALL {
                ui.selectable_value(&mut kind, choice, choice.label());
            }
        });
    if kind != adjustment.kind {
        // Switching kind starts from that kind's neutral parameters
        app.editor_mut()
            .set_layer_content(id, LayerContent::Adjustment(AdjustmentContent::new(kind)));
        return;
    }

    for (name, value) in &adjustment.params {
        let key = ui.id().with(("param", id, name.as_str()));
        let mut current = ui.data(|d| d.get_temp::<f32>(key)).unwrap_or(*value);
        let range = AdjustmentKind::param_range(name);
        let response = ui.add(egui::Slider::new(&mut current, range).text(name.as_str()));
        if response.dragged() {
            ui.data_mut(|d| d.insert_temp(key, current));
        } else {
            ui.data_mut(|d| d.remove::<f32>(key));
            if current != *value {
                let mut params = adjustment.params.clone();
                params.insert(name.clone(), current);
                let edited = AdjustmentContent { kind, params };
                app.editor_mut().set_layer_content(id, LayerContent::Adjustment(edited));
                return;
            }
        }
    }
}
