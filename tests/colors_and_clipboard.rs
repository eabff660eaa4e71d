use egui::Color32;
use image_editor::color::{ColorState, MAX_RECENT_COLORS};
use image_editor::document::{Document, NewProjectOptions};
use image_editor::layer::{LayerKind, LayerOverrides};

fn new_document() -> Document {
    Document::new(800, 600, NewProjectOptions::default()).unwrap()
}

#[test]
fn test_swap_is_its_own_inverse() {
    let mut colors = ColorState::default();
    colors.set_foreground(Color32::RED);
    colors.set_background(Color32::BLUE);

    colors.swap();
    assert_eq!(colors.foreground(), Color32::BLUE);
    assert_eq!(colors.background(), Color32::RED);

    colors.swap();
    assert_eq!(colors.foreground(), Color32::RED);
    assert_eq!(colors.background(), Color32::BLUE);
}

#[test]
fn test_swap_leaves_recent_untouched() {
    let mut colors = ColorState::default();
    colors.set_foreground(Color32::RED);
    let recent = colors.recent().to_vec();
    colors.swap();
    assert_eq!(colors.recent(), recent.as_slice());
}

#[test]
fn test_recent_colors_dedup_newest_first() {
    let mut colors = ColorState::default();
    colors.set_foreground(Color32::RED);
    colors.set_background(Color32::GREEN);
    colors.set_foreground(Color32::RED);

    assert_eq!(colors.recent(), &[Color32::RED, Color32::GREEN]);
}

#[test]
fn test_recent_colors_capped() {
    let mut colors = ColorState::default();
    for i in 0..25u8 {
        colors.set_foreground(Color32::from_gray(i));
    }
    assert_eq!(colors.recent().len(), MAX_RECENT_COLORS);
    assert_eq!(colors.recent()[0], Color32::from_gray(24));
}

#[test]
fn test_document_color_operations() {
    let mut doc = new_document();
    doc.set_foreground_color(Color32::YELLOW);
    doc.set_background_color(Color32::BLACK);
    doc.swap_colors();
    assert_eq!(doc.colors().foreground(), Color32::BLACK);
    assert_eq!(doc.colors().background(), Color32::YELLOW);
}

#[test]
fn test_copy_paste_assigns_new_id() {
    let mut doc = new_document();
    let source = doc.create_layer(LayerKind::Shape, LayerOverrides::named("Rect")).id;
    doc.set_layer_opacity(source, 30);

    assert!(doc.copy());
    let item = doc.clipboard().unwrap();
    assert_eq!(item.kind, LayerKind::Shape);
    assert_eq!(item.payload.id, source);

    let pasted = doc.paste().unwrap().clone();
    assert_ne!(pasted.id, source);
    assert_eq!(pasted.name, "Rect");
    assert_eq!(pasted.opacity, 30);
    assert_eq!(pasted.z_index, 2);
    assert_eq!(doc.active_layer_id(), Some(pasted.id));

    // Pasting twice still yields distinct layers
    let again = doc.paste().unwrap().id;
    assert_ne!(again, pasted.id);
    assert_eq!(doc.layer_count(), 4);
}

#[test]
fn test_cut_removes_active_layer() {
    let mut doc = new_document();
    let source = doc.create_layer(LayerKind::Text, LayerOverrides::default()).id;

    assert!(doc.cut());
    assert!(doc.layer(source).is_none());
    assert_eq!(doc.layer_count(), 1);

    let pasted = doc.paste().unwrap();
    assert_eq!(pasted.kind(), LayerKind::Text);
    assert_ne!(pasted.id, source);
}

#[test]
fn test_clipboard_without_active_layer() {
    let mut doc = new_document();
    let background = doc.layers()[0].id;
    doc.delete_layer(background);

    assert!(!doc.copy());
    assert!(!doc.cut());
    assert!(doc.paste().is_none());
}

#[test]
fn test_paste_keeps_lock_state() {
    let mut doc = new_document();
    // The background layer is locked
    assert!(doc.copy());
    let pasted = doc.paste().unwrap();
    assert!(pasted.locked);
}
