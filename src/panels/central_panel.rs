use crate::app::EditorApp;
use crate::selection::SelectionShape;
use crate::surface::{DrawableProps, PointerEvent, Primitive, RenderSurface, SceneObject};
use crate::tool::ToolOutcome;
use egui::emath::TSTransform;
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, Vec2, pos2};
use std::f32::consts::TAU;

const ELLIPSE_SEGMENTS: usize = 48;
const DASH: f32 = 4.0;
const CANVAS_MARGIN: Vec2 = Vec2::splat(24.0);
const CANVAS_COLOR: Color32 = Color32::WHITE;
const ZOOM_PRESETS: [f32; 5] = [0.25, 0.5, 1.0, 2.0, 4.0];

pub fn central_panel(app: &mut EditorApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        zoom_controls_ui(app, ui);

        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;
        let scene = app.scene();

        if response.hovered() {
            // Ctrl+scroll or pinch
            let zoom_delta = ctx.input(|i| i.zoom_delta());
            if zoom_delta != 1.0 {
                let zoom = scene.borrow().zoom();
                scene.borrow_mut().set_zoom(zoom * zoom_delta);
            }
        }

        // World coordinates are canvas pixels; pan and zoom map them to the screen
        let origin = rect.min + CANVAS_MARGIN + scene.borrow().view_offset();
        let view = TSTransform::new(origin.to_vec2(), scene.borrow().zoom());
        let to_world = |screen: Pos2| view.inverse().mul_pos(screen);

        for event in pointer_events(app, &response, to_world) {
            if let Some(ToolOutcome::TextBox { .. }) = app.editor_mut().handle_pointer(event) {
                if let Some(id) = app.editor().document().active_layer_id() {
                    app.request_text_focus(id);
                }
            }
        }

        if response.hovered() {
            ctx.set_cursor_icon(scene.borrow().cursor());
        }

        let painter = painter.with_clip_rect(rect);
        let document_canvas = view.mul_rect(app.editor().document().canvas_rect());
        painter.rect_filled(document_canvas, 0.0, CANVAS_COLOR);
        painter.rect_stroke(document_canvas, 0.0, Stroke::new(1.0, Color32::DARK_GRAY));

        let objects: Vec<SceneObject> = scene
            .borrow()
            .objects_in_order()
            .map(|(_, object)| object.clone())
            .collect();
        for object in &objects {
            paint_object(app, ctx, &painter, object, view);
        }

        paint_active_outline(app, &painter, view);
        paint_selection(app, &painter, view);
    });
}

fn zoom_controls_ui(app: &mut EditorApp, ui: &mut egui::Ui) {
    let scene = app.scene();
    ui.horizontal(|ui| {
        if ui.button("−").on_hover_text("Zoom out").clicked() {
            scene.borrow_mut().zoom_out();
        }
        if ui.button("+").on_hover_text("Zoom in").clicked() {
            scene.borrow_mut().zoom_in();
        }
        if ui.button("Fit").on_hover_text("Reset zoom and pan").clicked() {
            scene.borrow_mut().reset_view();
        }
        let zoom = scene.borrow().zoom();
        egui::ComboBox::from_id_salt("zoom_presets")
            .selected_text(format!("{:.0}%", zoom * 100.0))
            .show_ui(ui, |ui| {
                for preset in ZOOM_PRESETS {
                    if ui.selectable_label(zoom == preset, format!("{:.0}%", preset * 100.0)).clicked() {
                        scene.borrow_mut().set_zoom(preset);
                    }
                }
            });
    });
}

/// Translate this frame's egui pointer state into press / drag / release events
fn pointer_events(
    app: &mut EditorApp,
    response: &egui::Response,
    to_world: impl Fn(Pos2) -> Pos2,
) -> Vec<PointerEvent> {
    let mut events = Vec::new();
    let pos = response.interact_pointer_pos().map(&to_world).or(app.last_pointer());

    if response.clicked() {
        if let Some(pos) = pos {
            events.push(PointerEvent::Down(pos));
            events.push(PointerEvent::Up(pos));
        }
    } else if response.drag_started() {
        if let Some(pos) = pos {
            events.push(PointerEvent::Down(pos));
        }
    } else if response.dragged() {
        if let Some(pos) = pos {
            if app.last_pointer() != Some(pos) {
                events.push(PointerEvent::Move(pos));
            }
        }
    }
    if response.drag_stopped() {
        if let Some(pos) = pos {
            events.push(PointerEvent::Up(pos));
        }
    }

    if events.is_empty() && !response.dragged() {
        app.set_last_pointer(response.hover_pos().map(&to_world));
    } else {
        app.set_last_pointer(pos);
    }
    events
}

fn paint_object(app: &mut EditorApp, ctx: &egui::Context, painter: &Painter, object: &SceneObject, view: TSTransform) {
    let props = &object.props;
    if !props.visible {
        return;
    }
    let bounds = view.mul_rect(props.bounds);
    let fill = props
        .fill
        .map(|color| color.gamma_multiply(props.opacity))
        .unwrap_or(Color32::TRANSPARENT);
    // egui cannot cut paint away, so erased strokes show the bare canvas
    let stroke_color = if props.erase { Some(CANVAS_COLOR) } else { props.stroke };
    let stroke = stroke_color
        .map(|color| Stroke::new(props.stroke_width * view.scaling, color.gamma_multiply(props.opacity)))
        .unwrap_or(Stroke::NONE);

    match &object.primitive {
        Primitive::Image { storage } => {
            let image = storage.and_then(|storage| {
                let pixels = app.editor().bridge().pixels().get(storage)?.clone();
                Some((storage, pixels))
            });
            if let Some((storage, pixels)) = image {
                let texture = app.texture(ctx, &format!("pixels-{}", storage.0), pixels);
                let uv = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));
                painter.image(texture, bounds, uv, Color32::WHITE.gamma_multiply(props.opacity));
            }
        }
        Primitive::Rect { corner_radius } => {
            if props.dashed {
                painter.extend(dashed_outline(rect_points(bounds), props));
            } else {
                painter.rect(bounds, *corner_radius * view.scaling, fill, stroke);
            }
        }
        Primitive::Ellipse => {
            let points = ellipse_points(bounds);
            if props.dashed {
                painter.extend(dashed_outline(points, props));
            } else {
                painter.add(Shape::convex_polygon(points, fill, stroke));
            }
        }
        Primitive::Line { from, to } => {
            painter.line_segment([view.mul_pos(*from), view.mul_pos(*to)], stroke);
        }
        Primitive::Polygon { sides } => {
            let points = polygon_points(bounds, *sides);
            if props.dashed {
                painter.extend(dashed_outline(points, props));
            } else {
                painter.add(Shape::convex_polygon(points, fill, stroke));
            }
        }
        Primitive::Path { points } => {
            let points: Vec<Pos2> = points.iter().map(|p| view.mul_pos(*p)).collect();
            painter.add(Shape::line(points, stroke));
        }
        Primitive::Text { content, font_size } => {
            let font = FontId::proportional(font_size * view.scaling);
            painter.text(bounds.min, Align2::LEFT_TOP, content, font, fill);
        }
        Primitive::Group => {}
    }
}

fn paint_active_outline(app: &EditorApp, painter: &Painter, view: TSTransform) {
    let scene = app.scene();
    if !scene.borrow().object_selection() {
        return;
    }
    if let Some(layer) = app.editor().document().active_layer() {
        let outline = view.mul_rect(layer.rect());
        painter.rect_stroke(outline, 0.0, Stroke::new(1.0, Color32::LIGHT_BLUE));
    }
}

fn paint_selection(app: &EditorApp, painter: &Painter, view: TSTransform) {
    let Some(selection) = app.editor().document().selection() else {
        return;
    };
    let points = match &selection.shape {
        SelectionShape::Rectangle(rect) => rect_points(view.mul_rect(*rect)),
        SelectionShape::Ellipse(rect) => ellipse_points(view.mul_rect(*rect)),
    };
    let mut points = points;
    if let Some(first) = points.first().copied() {
        points.push(first);
    }
    painter.extend(Shape::dashed_line(&points, Stroke::new(1.0, Color32::BLACK), DASH, DASH));
}

fn dashed_outline(points: Vec<Pos2>, props: &DrawableProps) -> Vec<Shape> {
    let mut points = points;
    if let Some(first) = points.first().copied() {
        points.push(first);
    }
    let color = props.stroke.unwrap_or(Color32::BLACK);
    Shape::dashed_line(&points, Stroke::new(props.stroke_width.max(1.0), color), DASH, DASH)
}

fn rect_points(rect: Rect) -> Vec<Pos2> {
    vec![rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()]
}

fn ellipse_points(rect: Rect) -> Vec<Pos2> {
    let center = rect.center();
    let radius = rect.size() / 2.0;
    (0..ELLIPSE_SEGMENTS)
        .map(|i| {
            let angle = TAU * i as f32 / ELLIPSE_SEGMENTS as f32;
            center + Vec2::new(radius.x * angle.cos(), radius.y * angle.sin())
        })
        .collect()
}

fn polygon_points(rect: Rect, sides: u32) -> Vec<Pos2> {
    let sides = sides.max(3);
    let center = rect.center();
    let radius = rect.size() / 2.0;
    (0..sides)
        .map(|i| {
            // Start at the top so a triangle points up
            let angle = TAU * i as f32 / sides as f32 - TAU / 4.0;
            center + Vec2::new(radius.x * angle.cos(), radius.y * angle.sin())
        })
        .collect()
}
