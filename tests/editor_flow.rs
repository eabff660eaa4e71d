use egui::{Color32, Pos2, Rect, Vec2, pos2};
use image_editor::document::{LayerMove, NewProjectOptions};
use image_editor::editor::{Editor, EditorSettings};
use image_editor::error::{HistoryAdvisory, ToolError};
use image_editor::history::ActionKind;
use image_editor::layer::{
    AdjustmentContent, AdjustmentKind, LayerContent, LayerKind, LayerOverrides, ShapeGeometry, TextContent,
};
use image_editor::selection::Selection;
use image_editor::surface::{DrawingMode, PointerEvent, Primitive, Scene, SharedSurface};
use image_editor::tool::{ToolId, ToolOptions, ToolOutcome};
use std::cell::RefCell;
use std::rc::Rc;

fn editor_with_scene() -> (Editor, Rc<RefCell<Scene>>) {
    let mut editor = Editor::default();
    let scene = Rc::new(RefCell::new(Scene::new()));
    let surface: SharedSurface = scene.clone();
    editor.attach_surface(surface);
    (editor, scene)
}

fn drag(editor: &mut Editor, from: Pos2, to: Pos2) -> Option<ToolOutcome> {
    editor.handle_pointer(PointerEvent::Down(from));
    editor.handle_pointer(PointerEvent::Move(to));
    editor.handle_pointer(PointerEvent::Up(to))
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([255, 0, 0, 255]));
    let mut bytes = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn test_fresh_editor() {
    let editor = Editor::default();
    assert_eq!(editor.document().layer_count(), 1);
    assert_eq!(editor.history().len(), 1);
    assert_eq!(editor.history().entries()[0].kind(), ActionKind::Project);
    assert!(!editor.can_undo());
    assert!(!editor.can_redo());
}

#[test]
fn test_settings_shape_new_editor() {
    let settings = EditorSettings {
        canvas_width: 320,
        canvas_height: 200,
        history_size: 3,
        brush_width: 12.0,
        ..EditorSettings::default()
    };
    let editor = Editor::new(settings);
    assert_eq!(editor.document().canvas_size(), [320, 200]);
    assert_eq!(editor.history().max_size(), 3);
    assert_eq!(editor.tool_options(ToolId::Brush), Some(ToolOptions::Brush { width: 12.0 }));
}

#[test]
fn test_invalid_canvas_setting_falls_back() {
    let settings = EditorSettings {
        canvas_width: 0,
        ..EditorSettings::default()
    };
    let editor = Editor::new(settings);
    assert_eq!(editor.document().canvas_size(), [800, 600]);
}

#[test]
fn test_settings_deserialize_with_defaults() {
    let settings: EditorSettings = serde_json::from_str(r#"{ "brush_width": 3.0 }"#).unwrap();
    assert_eq!(settings.brush_width, 3.0);
    assert_eq!(settings.history_size, EditorSettings::default().history_size);
}

#[test]
fn test_operations_are_recorded() {
    let mut editor = Editor::default();
    let id = editor.create_layer(LayerKind::Shape, LayerOverrides::named("Rect"));
    editor.set_layer_opacity(id, 40);
    editor.rename_layer(id, "Box");
    editor.move_layer(id, LayerMove::Down);
    let copy = editor.duplicate_layer(id).unwrap();
    editor.delete_layer(copy);

    let kinds: Vec<_> = editor.history().entries().iter().map(|entry| entry.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            ActionKind::Project,
            ActionKind::CreateLayer,
            ActionKind::LayerProperty,
            ActionKind::RenameLayer,
            ActionKind::MoveLayer,
            ActionKind::DuplicateLayer,
            ActionKind::DeleteLayer,
        ]
    );
}

#[test]
fn test_noops_are_not_recorded() {
    let mut editor = Editor::default();
    let missing = image_editor::layer::LayerId::new();
    let background = editor.document().layers()[0].id;

    assert!(!editor.delete_layer(missing));
    assert!(editor.duplicate_layer(missing).is_none());
    assert!(!editor.move_layer(background, LayerMove::Down));
    assert!(!editor.clear_selection());
    assert!(!editor.set_selection(Selection::rectangle(Rect::from_min_size(Pos2::ZERO, Vec2::ZERO))));
    assert_eq!(editor.history().len(), 1);
}

#[test]
fn test_undo_redo_resyncs_surface() {
    let (mut editor, scene) = editor_with_scene();
    assert_eq!(scene.borrow().len(), 1);

    let id = editor.create_layer(LayerKind::Text, LayerOverrides::default());
    editor.tick();
    assert_eq!(scene.borrow().len(), 2);
    assert!(editor.document().layer(id).unwrap().presentation.surface_object.is_some());

    assert_eq!(editor.undo(), Ok(0));
    assert_eq!(scene.borrow().len(), 1);
    assert!(editor.document().layer(id).is_none());

    assert_eq!(editor.redo(), Ok(1));
    assert_eq!(scene.borrow().len(), 2);
    assert_eq!(editor.redo(), Err(HistoryAdvisory::NothingToRedo));
}

#[test]
fn test_go_to_history() {
    let mut editor = Editor::default();
    for _ in 0..3 {
        editor.create_layer(LayerKind::Raster, LayerOverrides::default());
    }
    assert_eq!(editor.go_to_history(1), Ok(1));
    assert_eq!(editor.document().layer_count(), 2);
    assert!(editor.go_to_history(10).is_err());
}

#[test]
fn test_new_project_resets_history() {
    let mut editor = Editor::default();
    editor.create_layer(LayerKind::Raster, LayerOverrides::default());
    editor.new_project(1024, 768, NewProjectOptions::default()).unwrap();

    assert_eq!(editor.history().len(), 1);
    assert!(!editor.can_undo());
    assert_eq!(editor.document().canvas_size(), [1024, 768]);
    assert!(editor.new_project(0, 0, NewProjectOptions::default()).is_err());
}

#[test]
fn test_load_project_resets_history() {
    let mut source = Editor::default();
    source.create_layer(LayerKind::Shape, LayerOverrides::named("Rect"));
    let record = source.save_project();

    let (mut editor, scene) = editor_with_scene();
    editor.create_layer(LayerKind::Raster, LayerOverrides::default());
    editor.load_project(record).unwrap();

    assert_eq!(editor.history().len(), 1);
    assert_eq!(editor.document().layer_count(), 2);
    assert_eq!(scene.borrow().len(), 2);
}

#[test]
fn test_set_history_size() {
    let mut editor = Editor::default();
    for _ in 0..5 {
        editor.create_layer(LayerKind::Raster, LayerOverrides::default());
    }
    editor.set_history_size(2);
    assert_eq!(editor.history().len(), 2);
    assert_eq!(editor.settings().history_size, 2);
}

#[test]
fn test_tools_need_surface() {
    let mut editor = Editor::default();
    assert_eq!(editor.activate_tool(ToolId::Brush), Err(ToolError::SurfaceNotReady));
    assert_eq!(
        editor.activate_tool_by_name("smudge"),
        Err(ToolError::UnknownTool("smudge".to_owned()))
    );
}

#[test]
fn test_brush_stroke_becomes_shape_layer() {
    let (mut editor, scene) = editor_with_scene();
    editor.set_foreground_color(Color32::RED);
    editor.activate_tool(ToolId::Brush).unwrap();

    editor.handle_pointer(PointerEvent::Down(pos2(10.0, 20.0)));
    editor.handle_pointer(PointerEvent::Move(pos2(30.0, 25.0)));
    editor.handle_pointer(PointerEvent::Up(pos2(50.0, 60.0)));

    let layer = editor.document().active_layer().unwrap();
    assert_eq!(layer.kind(), LayerKind::Shape);
    assert_eq!(layer.position, pos2(10.0, 20.0));
    assert_eq!(layer.size, Vec2::new(40.0, 40.0));
    match &layer.content {
        LayerContent::Shape(shape) => {
            assert_eq!(
                shape.geometry,
                ShapeGeometry::Path(vec![pos2(0.0, 0.0), pos2(20.0, 5.0), pos2(40.0, 40.0)])
            );
            assert_eq!(shape.stroke, Some(Color32::RED));
        }
        other => panic!("expected shape content, got {other:?}"),
    }
    assert_eq!(editor.history().current_entry().unwrap().kind(), ActionKind::Stroke);

    editor.tick();
    // Background plus the stroke; the preview is gone
    assert_eq!(scene.borrow().len(), 2);
}

#[test]
fn test_single_point_stroke_is_ignored() {
    let (mut editor, _scene) = editor_with_scene();
    editor.activate_tool(ToolId::Brush).unwrap();
    editor.handle_pointer(PointerEvent::Down(pos2(10.0, 10.0)));
    editor.handle_pointer(PointerEvent::Up(pos2(10.0, 10.0)));
    assert_eq!(editor.document().layer_count(), 1);
    assert_eq!(editor.history().len(), 1);
}

#[test]
fn test_color_change_refreshes_brush() {
    let (mut editor, scene) = editor_with_scene();
    editor.activate_tool(ToolId::Brush).unwrap();
    editor.set_foreground_color(Color32::GREEN);
    assert_eq!(
        scene.borrow().drawing_mode(),
        DrawingMode::Brush {
            color: Color32::GREEN,
            width: 5.0
        }
    );
    assert_eq!(editor.active_tool(), Some(ToolId::Brush));
}

#[test]
fn test_marquee_selects_and_click_deselects() {
    let (mut editor, _scene) = editor_with_scene();
    editor.activate_tool(ToolId::Marquee).unwrap();

    drag(&mut editor, pos2(100.0, 100.0), pos2(20.0, 40.0));
    let selection = editor.document().selection().unwrap();
    assert_eq!(selection.bounds(), Rect::from_min_max(pos2(20.0, 40.0), pos2(100.0, 100.0)));
    assert_eq!(editor.history().current_entry().unwrap().kind(), ActionKind::Selection);

    editor.handle_pointer(PointerEvent::Down(pos2(5.0, 5.0)));
    editor.handle_pointer(PointerEvent::Up(pos2(5.0, 5.0)));
    assert!(editor.document().selection().is_none());
}

#[test]
fn test_shape_tool_creates_layer() {
    let (mut editor, _scene) = editor_with_scene();
    editor.set_foreground_color(Color32::BLUE);
    editor.activate_tool(ToolId::Shape).unwrap();
    editor.set_tool_options(ToolId::Shape, ToolOptions::Shape { geometry: ShapeGeometry::Ellipse });

    drag(&mut editor, pos2(0.0, 0.0), pos2(30.0, 40.0));
    let layer = editor.document().active_layer().unwrap();
    assert_eq!(layer.rect(), Rect::from_min_size(Pos2::ZERO, Vec2::new(30.0, 40.0)));
    match &layer.content {
        LayerContent::Shape(shape) => {
            assert_eq!(shape.geometry, ShapeGeometry::Ellipse);
            assert_eq!(shape.fill, Some(Color32::BLUE));
        }
        other => panic!("expected shape content, got {other:?}"),
    }

    // A click without a drag draws nothing
    let count = editor.document().layer_count();
    editor.handle_pointer(PointerEvent::Down(pos2(5.0, 5.0)));
    editor.handle_pointer(PointerEvent::Up(pos2(5.0, 5.0)));
    assert_eq!(editor.document().layer_count(), count);
}

#[test]
fn test_text_click_places_default_box() {
    let (mut editor, _scene) = editor_with_scene();
    editor.activate_tool(ToolId::Text).unwrap();
    editor.handle_pointer(PointerEvent::Down(pos2(40.0, 50.0)));
    editor.handle_pointer(PointerEvent::Up(pos2(40.0, 50.0)));

    let layer = editor.document().active_layer().unwrap();
    assert_eq!(layer.kind(), LayerKind::Text);
    assert_eq!(layer.position, pos2(40.0, 50.0));
    assert_eq!(layer.size, Vec2::new(200.0, 50.0));
    assert_eq!(editor.history().current_entry().unwrap().kind(), ActionKind::Text);
}

#[test]
fn test_select_tool_picks_and_moves_layer() {
    let (mut editor, _scene) = editor_with_scene();
    let overrides = LayerOverrides::named("Box").with_bounds(pos2(100.0, 100.0), Vec2::splat(50.0));
    let id = editor.create_layer(LayerKind::Shape, overrides);
    let background = editor.document().layers()[0].id;
    editor.set_active_layer(background);
    editor.tick();
    editor.activate_tool(ToolId::Select).unwrap();

    drag(&mut editor, pos2(110.0, 110.0), pos2(130.0, 100.0));
    assert_eq!(editor.document().active_layer_id(), Some(id));
    assert_eq!(editor.document().layer(id).unwrap().position, pos2(120.0, 90.0));
    assert_eq!(editor.history().current_entry().unwrap().kind(), ActionKind::Transform);
}

#[test]
fn test_locked_layer_is_not_moved() {
    let (mut editor, _scene) = editor_with_scene();
    editor.tick();
    editor.activate_tool(ToolId::Select).unwrap();
    let background = editor.document().layers()[0].id;
    let entries = editor.history().len();

    drag(&mut editor, pos2(10.0, 10.0), pos2(60.0, 60.0));
    assert_eq!(editor.document().layer(background).unwrap().position, Pos2::ZERO);
    assert_eq!(editor.history().len(), entries);
}

#[test]
fn test_clipboard_through_editor() {
    let mut editor = Editor::default();
    editor.create_layer(LayerKind::Shape, LayerOverrides::named("Rect"));
    assert!(editor.copy());
    let entries = editor.history().len();
    assert_eq!(entries, 2, "copy is not an undoable action");

    let pasted = editor.paste().unwrap();
    assert_eq!(editor.document().active_layer_id(), Some(pasted));
    assert!(editor.cut());
    assert_eq!(editor.history().len(), entries + 2);
    assert_eq!(editor.undo(), Ok(entries));
    assert!(editor.document().layer(pasted).is_some());
}

#[test]
fn test_import_image() {
    let (mut editor, scene) = editor_with_scene();
    let id = editor.import_image("photo.png", &png_bytes(80, 20)).unwrap();

    let layer = editor.document().layer(id).unwrap();
    assert_eq!(layer.name, "photo.png");
    assert_eq!(layer.size, Vec2::new(80.0, 20.0));
    let storage = match &layer.content {
        LayerContent::Raster(raster) => raster.storage.unwrap(),
        other => panic!("expected raster content, got {other:?}"),
    };
    assert_eq!(editor.bridge().pixels().get(storage).unwrap().size, [80, 20]);
    let thumbnail = layer.presentation.thumbnail.clone().unwrap();
    assert_eq!(thumbnail.size, [40, 10]);
    assert_eq!(editor.history().current_entry().unwrap().kind(), ActionKind::Import);

    editor.tick();
    assert_eq!(scene.borrow().len(), 2);
}

#[test]
fn test_import_rejects_garbage() {
    let mut editor = Editor::default();
    assert!(editor.import_image("junk", b"definitely not an image").is_err());
    assert_eq!(editor.document().layer_count(), 1);
    assert_eq!(editor.history().len(), 1);
}

#[test]
fn test_tick_runs_compression() {
    let (mut editor, _scene) = editor_with_scene();
    for _ in 0..12 {
        editor.create_layer(LayerKind::Raster, LayerOverrides::default());
        editor.tick();
    }
    // 13 entries, cursor at 12: entries 0 and 1 are past the distance
    let compressed: Vec<bool> = editor.history().entries().iter().map(|e| e.is_compressed()).collect();
    assert!(compressed[0] && compressed[1]);
    assert!(compressed[2..].iter().all(|c| !c));
}

#[test]
fn test_detach_surface_idles_tools() {
    let (mut editor, scene) = editor_with_scene();
    editor.activate_tool(ToolId::Pan).unwrap();
    editor.detach_surface();
    assert_eq!(editor.active_tool(), None);
    assert!(scene.borrow().is_pristine());
    assert_eq!(editor.activate_tool(ToolId::Pan), Err(ToolError::SurfaceNotReady));
}

fn surface_primitive(editor: &Editor, scene: &Rc<RefCell<Scene>>) -> Primitive {
    let layer = editor.document().active_layer().unwrap();
    let object = layer.presentation.surface_object.unwrap();
    scene.borrow().object(object).unwrap().primitive.clone()
}

#[test]
fn test_line_follows_both_diagonals() {
    let (mut editor, scene) = editor_with_scene();
    editor.activate_tool(ToolId::Shape).unwrap();
    editor.set_tool_options(ToolId::Shape, ToolOptions::Shape { geometry: ShapeGeometry::LINE });

    drag(&mut editor, pos2(100.0, 200.0), pos2(160.0, 120.0));
    editor.tick();
    let rising = editor.document().active_layer().unwrap();
    assert_eq!(rising.position, pos2(100.0, 120.0));
    match &rising.content {
        LayerContent::Shape(shape) => assert_eq!(
            shape.geometry,
            ShapeGeometry::Line {
                from: pos2(0.0, 80.0),
                to: pos2(60.0, 0.0)
            }
        ),
        other => panic!("expected shape content, got {other:?}"),
    }
    assert_eq!(
        surface_primitive(&editor, &scene),
        Primitive::Line {
            from: pos2(100.0, 200.0),
            to: pos2(160.0, 120.0)
        }
    );

    drag(&mut editor, pos2(100.0, 120.0), pos2(160.0, 200.0));
    editor.tick();
    assert_eq!(
        surface_primitive(&editor, &scene),
        Primitive::Line {
            from: pos2(100.0, 120.0),
            to: pos2(160.0, 200.0)
        }
    );

    // Dragging back to front draws the same segment reversed
    drag(&mut editor, pos2(160.0, 200.0), pos2(100.0, 120.0));
    editor.tick();
    assert_eq!(
        surface_primitive(&editor, &scene),
        Primitive::Line {
            from: pos2(160.0, 200.0),
            to: pos2(100.0, 120.0)
        }
    );
}

#[test]
fn test_eraser_stroke_creates_erase_layer() {
    let (mut editor, scene) = editor_with_scene();
    editor.set_foreground_color(Color32::RED);
    editor.activate_tool(ToolId::Eraser).unwrap();
    assert_eq!(scene.borrow().drawing_mode(), DrawingMode::Eraser { width: 20.0 });

    drag(&mut editor, pos2(10.0, 10.0), pos2(60.0, 30.0));
    let layer = editor.document().active_layer().unwrap();
    assert_eq!(layer.name, "Eraser");
    match &layer.content {
        LayerContent::Shape(shape) => {
            assert!(shape.erase);
            assert_eq!(shape.stroke_width, 20.0);
            assert_eq!(shape.stroke, Some(Color32::WHITE), "eraser ignores the foreground");
        }
        other => panic!("expected shape content, got {other:?}"),
    }
    assert_eq!(editor.history().current_entry().unwrap().description(), "Erase");

    editor.tick();
    let object = editor.document().active_layer().unwrap().presentation.surface_object.unwrap();
    assert!(scene.borrow().object(object).unwrap().props.erase);
}

#[test]
fn test_pencil_stroke_is_opaque() {
    let (mut editor, _scene) = editor_with_scene();
    editor.set_foreground_color(Color32::from_rgba_unmultiplied(0, 0, 255, 100));
    editor.activate_tool(ToolId::Pencil).unwrap();

    drag(&mut editor, pos2(0.0, 0.0), pos2(20.0, 20.0));
    let layer = editor.document().active_layer().unwrap();
    assert_eq!(layer.name, "Stroke");
    match &layer.content {
        LayerContent::Shape(shape) => {
            assert!(!shape.erase);
            assert_eq!(shape.stroke_width, 2.0);
            assert_eq!(shape.stroke.map(|c| c.a()), Some(255));
        }
        other => panic!("expected shape content, got {other:?}"),
    }
}

#[test]
fn test_text_edit_is_one_history_entry() {
    let mut editor = Editor::default();
    let id = editor.create_layer(LayerKind::Text, LayerOverrides::named("Title"));
    let before = editor.history().len();
    let LayerContent::Text(text) = editor.document().layer(id).unwrap().content.clone() else {
        panic!("text layer without text content");
    };

    let edited = TextContent {
        content: "Hello\nworld".to_owned(),
        ..text.clone()
    };
    assert!(editor.set_layer_content(id, LayerContent::Text(edited)));
    assert_eq!(editor.history().len(), before + 1);
    let entry = editor.history().current_entry().unwrap();
    assert_eq!(entry.kind(), ActionKind::Text);
    assert_eq!(entry.description(), "Edit Title");

    editor.undo().unwrap();
    assert_eq!(editor.document().layer(id).unwrap().content, LayerContent::Text(text));
}

#[test]
fn test_adjustment_parameter_edit() {
    let mut editor = Editor::default();
    let id = editor.create_layer(LayerKind::Adjustment, LayerOverrides::named("Tone"));

    let mut params = AdjustmentKind::BrightnessContrast.default_params();
    params.insert("contrast".to_owned(), 35.0);
    let edited = AdjustmentContent {
        kind: AdjustmentKind::BrightnessContrast,
        params,
    };
    assert!(editor.set_layer_content(id, LayerContent::Adjustment(edited)));
    assert_eq!(editor.history().current_entry().unwrap().kind(), ActionKind::Adjustment);

    assert!(editor.set_layer_content(
        id,
        LayerContent::Adjustment(AdjustmentContent::new(AdjustmentKind::Levels))
    ));
    match &editor.document().layer(id).unwrap().content {
        LayerContent::Adjustment(adjustment) => {
            assert_eq!(adjustment.kind, AdjustmentKind::Levels);
            assert_eq!(adjustment.params.get("gamma"), Some(&1.0));
        }
        other => panic!("expected adjustment content, got {other:?}"),
    }
    assert_eq!(AdjustmentKind::param_range("gamma"), 0.1..=10.0);
    assert_eq!(AdjustmentKind::param_range("hue"), -180.0..=180.0);
}
