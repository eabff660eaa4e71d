use egui::{Color32, Pos2, Rect, Vec2};
use image_editor::document::{BACKGROUND_LAYER_NAME, Document, LayerMove, NewProjectOptions};
use image_editor::layer::{
    BlendMode, GroupContent, LayerContent, LayerKind, LayerOverrides, ShapeContent, TextContent,
};
use image_editor::selection::{Selection, SelectionShape};

fn new_document() -> Document {
    Document::new(800, 600, NewProjectOptions::default()).unwrap()
}

fn assert_dense(doc: &Document) {
    let mut z: Vec<usize> = doc.layers().iter().map(|layer| layer.z_index).collect();
    z.sort_unstable();
    let expected: Vec<usize> = (0..doc.layer_count()).collect();
    assert_eq!(z, expected, "z-indices must be a dense permutation");
    for (index, layer) in doc.layers().iter().enumerate() {
        assert_eq!(layer.z_index, index, "layer list is kept in paint order");
    }
}

#[test]
fn test_new_project_has_locked_background() {
    let doc = new_document();
    assert_eq!(doc.layer_count(), 1);
    let background = &doc.layers()[0];
    assert_eq!(background.name, BACKGROUND_LAYER_NAME);
    assert!(background.locked);
    assert_eq!(background.opacity, 100);
    assert_eq!(background.z_index, 0);
    assert_eq!(background.kind(), LayerKind::Raster);
    assert_eq!(background.size, Vec2::new(800.0, 600.0));
    assert_eq!(doc.canvas_size(), [800, 600]);
    assert!(doc.selection().is_none());
}

#[test]
fn test_new_project_rejects_empty_canvas() {
    assert!(Document::new(0, 600, NewProjectOptions::default()).is_err());

    let mut doc = new_document();
    let before = doc.layers()[0].id;
    assert!(doc.new_project(800, 0, NewProjectOptions::default()).is_err());
    assert_eq!(doc.layers()[0].id, before, "failed new_project leaves the document alone");
}

#[test]
fn test_layer_lifecycle_scenario() {
    let mut doc = new_document();
    let background_id = doc.layers()[0].id;

    let rect_id = doc.create_layer(LayerKind::Shape, LayerOverrides::named("Rect")).id;
    assert_eq!(doc.layer_count(), 2);
    assert_eq!(doc.layer(rect_id).unwrap().z_index, 1);
    assert_eq!(doc.active_layer_id(), Some(rect_id));

    assert!(doc.move_layer(rect_id, LayerMove::Down));
    assert_eq!(doc.layer(background_id).unwrap().z_index, 1);
    assert_eq!(doc.layer(rect_id).unwrap().z_index, 0);

    assert!(doc.delete_layer(background_id));
    assert_eq!(doc.layer_count(), 1);
    assert_eq!(doc.layer(rect_id).unwrap().z_index, 0);
}

#[test]
fn test_create_layer_defaults() {
    let mut doc = new_document();
    doc.set_foreground_color(Color32::RED);

    let shape = doc.create_layer(LayerKind::Shape, LayerOverrides::default()).clone();
    assert_eq!(shape.name, "Shape 2");
    match &shape.content {
        LayerContent::Shape(content) => assert_eq!(content.fill, Some(Color32::RED)),
        other => panic!("expected shape content, got {other:?}"),
    }
    assert_eq!(shape.rect().center(), doc.canvas_rect().center());

    let text = doc.create_layer(LayerKind::Text, LayerOverrides::default()).clone();
    assert_eq!(text.content, LayerContent::Text(TextContent::default()));

    let group = doc.create_layer(LayerKind::Group, LayerOverrides::default()).clone();
    assert_eq!(group.rect(), doc.canvas_rect());
}

#[test]
fn test_mismatched_content_override_is_ignored() {
    let mut doc = new_document();
    let overrides = LayerOverrides::named("Odd").with_content(LayerContent::Text(TextContent::default()));
    let layer = doc.create_layer(LayerKind::Shape, overrides);
    assert_eq!(layer.kind(), LayerKind::Shape);
    assert_eq!(layer.name, "Odd");
}

#[test]
fn test_z_index_stays_dense() {
    let mut doc = new_document();
    let mut ids = vec![doc.layers()[0].id];
    for kind in [LayerKind::Raster, LayerKind::Text, LayerKind::Shape, LayerKind::Adjustment] {
        ids.push(doc.create_layer(kind, LayerOverrides::default()).id);
        assert_dense(&doc);
    }

    assert!(doc.move_layer(ids[0], LayerMove::Top));
    assert_dense(&doc);
    assert!(doc.move_layer(ids[4], LayerMove::Bottom));
    assert_dense(&doc);

    let copy = doc.duplicate_layer(ids[2]).unwrap().id;
    assert_dense(&doc);
    assert!(doc.delete_layer(ids[1]));
    assert_dense(&doc);
    assert!(doc.move_layer(copy, LayerMove::Up));
    assert_dense(&doc);
    assert!(doc.delete_layer(ids[0]));
    assert_dense(&doc);
}

#[test]
fn test_move_at_boundary_is_noop() {
    let mut doc = new_document();
    let background = doc.layers()[0].id;
    let top = doc.create_layer(LayerKind::Raster, LayerOverrides::default()).id;
    let revision = doc.revision();

    assert!(!doc.move_layer(top, LayerMove::Up));
    assert!(!doc.move_layer(top, LayerMove::Top));
    assert!(!doc.move_layer(background, LayerMove::Down));
    assert!(!doc.move_layer(background, LayerMove::Bottom));
    assert_eq!(doc.revision(), revision);
}

#[test]
fn test_missing_layer_is_silent_noop() {
    let mut doc = new_document();
    let missing = image_editor::layer::LayerId::new();
    let revision = doc.revision();

    assert!(!doc.delete_layer(missing));
    assert!(doc.duplicate_layer(missing).is_none());
    assert!(!doc.move_layer(missing, LayerMove::Up));
    assert!(!doc.set_layer_opacity(missing, 50));
    assert!(!doc.rename_layer(missing, "nope"));
    assert!(!doc.set_active_layer(missing));
    assert_eq!(doc.revision(), revision);
    assert_eq!(doc.layer_count(), 1);
}

#[test]
fn test_delete_active_falls_back_to_neighbor() {
    let mut doc = new_document();
    let background = doc.layers()[0].id;
    let middle = doc.create_layer(LayerKind::Raster, LayerOverrides::default()).id;
    let top = doc.create_layer(LayerKind::Raster, LayerOverrides::default()).id;

    // Deleting the top layer clamps to the new last index
    assert!(doc.delete_layer(top));
    assert_eq!(doc.active_layer_id(), Some(middle));

    // Deleting in the middle picks whatever now sits at that index
    let new_top = doc.create_layer(LayerKind::Raster, LayerOverrides::default()).id;
    assert!(doc.set_active_layer(middle));
    assert!(doc.delete_layer(middle));
    assert_eq!(doc.active_layer_id(), Some(new_top));

    assert!(doc.delete_layer(new_top));
    assert!(doc.delete_layer(background));
    assert_eq!(doc.active_layer_id(), None);
    assert_eq!(doc.layer_count(), 0);
}

#[test]
fn test_delete_inactive_keeps_active() {
    let mut doc = new_document();
    let background = doc.layers()[0].id;
    let top = doc.create_layer(LayerKind::Raster, LayerOverrides::default()).id;
    assert!(doc.delete_layer(background));
    assert_eq!(doc.active_layer_id(), Some(top));
}

#[test]
fn test_delete_removes_group_membership() {
    let mut doc = new_document();
    let child = doc.create_layer(LayerKind::Shape, LayerOverrides::default()).id;
    let group = doc.create_layer(LayerKind::Group, LayerOverrides::default()).id;
    let content = LayerContent::Group(GroupContent {
        children: vec![child],
        expanded: true,
    });
    assert!(doc.set_layer_content(group, content));

    assert!(doc.delete_layer(child));
    match &doc.layer(group).unwrap().content {
        LayerContent::Group(group) => assert!(group.children.is_empty()),
        other => panic!("expected group content, got {other:?}"),
    }
}

#[test]
fn test_duplicate_layer() {
    let mut doc = new_document();
    let source = doc.create_layer(LayerKind::Shape, LayerOverrides::named("Rect")).id;
    doc.set_layer_opacity(source, 40);
    doc.set_layer_locked(source, true);
    let source_z = doc.layer(source).unwrap().z_index;

    let copy = doc.duplicate_layer(source).unwrap().clone();
    assert_ne!(copy.id, source);
    assert_eq!(copy.name, "Rect copy");
    assert_eq!(copy.z_index, source_z + 1);
    assert_eq!(copy.opacity, 40);
    assert!(copy.locked, "lock state is copied");
    assert_eq!(copy.content, doc.layer(source).unwrap().content);
    assert_eq!(doc.active_layer_id(), Some(copy.id));
}

#[test]
fn test_layer_properties() {
    let mut doc = new_document();
    let id = doc.create_layer(LayerKind::Raster, LayerOverrides::default()).id;
    let before = doc.layer(id).unwrap().updated_at;

    assert!(doc.set_layer_opacity(id, 150));
    assert_eq!(doc.layer(id).unwrap().opacity, 100);
    assert!(doc.set_layer_opacity(id, -20));
    assert_eq!(doc.layer(id).unwrap().opacity, 0);

    assert!(doc.set_layer_blend_mode(id, BlendMode::Multiply));
    assert!(doc.set_layer_visibility(id, false));
    assert!(doc.rename_layer(id, "Paint"));
    assert!(doc.translate_layer(id, Vec2::new(5.0, -5.0)));

    let layer = doc.layer(id).unwrap();
    assert_eq!(layer.blend_mode, BlendMode::Multiply);
    assert!(!layer.visible);
    assert_eq!(layer.name, "Paint");
    assert_eq!(layer.position, Pos2::new(5.0, -5.0));
    assert!(layer.updated_at >= before);
}

#[test]
fn test_set_content_requires_same_kind() {
    let mut doc = new_document();
    let id = doc.create_layer(LayerKind::Shape, LayerOverrides::default()).id;
    assert!(!doc.set_layer_content(id, LayerContent::Text(TextContent::default())));
    assert!(doc.set_layer_content(id, LayerContent::Shape(ShapeContent::filled(Color32::BLUE))));
}

#[test]
fn test_selection_replace_and_clear() {
    let mut doc = new_document();
    let first = Selection::rectangle(Rect::from_min_size(Pos2::ZERO, Vec2::splat(10.0)));
    let second = Selection::new(SelectionShape::Ellipse(Rect::from_min_size(
        Pos2::new(5.0, 5.0),
        Vec2::splat(20.0),
    )));

    assert!(doc.set_selection(first));
    assert!(doc.set_selection(second.clone()));
    assert_eq!(doc.selection(), Some(&second));

    assert!(doc.clear_selection());
    assert!(doc.selection().is_none());
    assert!(!doc.clear_selection());
}

#[test]
fn test_degenerate_selection_is_discarded() {
    let mut doc = new_document();
    let zero = Selection::rectangle(Rect::from_min_size(Pos2::new(3.0, 3.0), Vec2::ZERO));
    assert!(!doc.set_selection(zero));
    assert!(doc.selection().is_none());

    let flat = Selection::new(SelectionShape::Ellipse(Rect::from_min_max(
        Pos2::new(0.0, 5.0),
        Pos2::new(40.0, 5.0),
    )));
    assert!(!doc.set_selection(flat));
}

#[test]
fn test_select_all_covers_canvas() {
    let mut doc = new_document();
    assert!(doc.select_all());
    assert_eq!(doc.selection().unwrap().bounds(), doc.canvas_rect());
}

#[test]
fn test_resize_canvas() {
    let mut doc = new_document();
    assert!(doc.resize_canvas(0, 10).is_err());
    assert!(doc.resize_canvas(1024, 768).is_ok());
    assert_eq!(doc.canvas_size(), [1024, 768]);
}

#[test]
fn test_revision_tracks_changes() {
    let mut doc = new_document();
    let start = doc.revision();
    let id = doc.create_layer(LayerKind::Raster, LayerOverrides::default()).id;
    assert!(doc.revision() > start);

    let before = doc.revision();
    doc.set_layer_presentation(id, Default::default());
    assert_eq!(doc.revision(), before, "presentation is not document state");
}

/// Small deterministic xorshift generator so the sequence is reproducible
struct Xorshift(u64);

impl Xorshift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    fn below(&mut self, bound: usize) -> usize {
        (self.next() % bound as u64) as usize
    }
}

#[test]
fn test_z_order_stays_dense_under_random_operations() {
    const KINDS: [LayerKind; 4] = [LayerKind::Raster, LayerKind::Text, LayerKind::Shape, LayerKind::Adjustment];
    const MOVES: [LayerMove; 4] = [LayerMove::Up, LayerMove::Down, LayerMove::Top, LayerMove::Bottom];

    for seed in [0x9E37_79B9_7F4A_7C15_u64, 42, 7_777_777] {
        let mut rng = Xorshift(seed);
        let mut doc = new_document();
        for step in 0..400 {
            let count = doc.layer_count();
            let target = (count > 0).then(|| doc.layers()[rng.below(count)].id);
            match (rng.below(4), target) {
                (0, _) | (_, None) => {
                    doc.create_layer(KINDS[rng.below(KINDS.len())], LayerOverrides::default());
                }
                (1, Some(id)) => {
                    assert!(doc.delete_layer(id));
                    assert!(doc.layer(id).is_none());
                }
                (2, Some(id)) => {
                    assert!(doc.duplicate_layer(id).is_some());
                }
                (_, Some(id)) => {
                    doc.move_layer(id, MOVES[rng.below(MOVES.len())]);
                }
            }
            assert_dense(&doc);
            if let Some(active) = doc.active_layer_id() {
                assert!(doc.layer(active).is_some(), "seed {seed:#x} step {step}: dangling active layer");
            }
        }
    }
}
