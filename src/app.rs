use crate::editor::{Editor, EditorSettings};
use crate::layer::LayerId;
use crate::panels::{central_panel, layers_panel, tools_panel};
use crate::surface::{Scene, SharedSurface};
use egui::{ColorImage, Key, KeyboardShortcut, Modifiers, TextureHandle, TextureId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

const UNDO: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Z);
const REDO: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND.plus(Modifiers::SHIFT), Key::Z);
const COPY: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::C);
const CUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::X);
const PASTE: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::V);
const SELECT_ALL: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::A);
const DESELECT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::D);
const ZOOM_IN: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Equals);
const ZOOM_OUT: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Minus);
const ZOOM_RESET: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Num0);

pub struct EditorApp {
    editor: Editor,
    scene: Rc<RefCell<Scene>>,
    /// Last pointer position over the canvas, in world coordinates
    last_pointer: Option<egui::Pos2>,
    status: Option<String>,
    // GPU textures keyed by pixel storage / thumbnail name
    textures: HashMap<String, TextureHandle>,
    show_new_project: bool,
    new_project_size: [u32; 2],
    /// Text layer whose content editor should grab focus next frame
    text_focus: Option<LayerId>,
}

impl std::fmt::Debug for EditorApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorApp")
            .field("editor", &self.editor)
            .field("scene", &"<scene>")
            .field("status", &self.status)
            .field("textures", &self.textures.len())
            .finish()
    }
}

impl Default for EditorApp {
    fn default() -> Self {
        Self::with_settings(EditorSettings::default())
    }
}

impl EditorApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Load previous settings (if any)
        let settings = cc
            .storage
            .and_then(|storage| eframe::get_value::<EditorSettings>(storage, eframe::APP_KEY))
            .unwrap_or_default();
        Self::with_settings(settings)
    }

    pub fn with_settings(settings: EditorSettings) -> Self {
        let new_project_size = [settings.canvas_width, settings.canvas_height];
        let mut editor = Editor::new(settings);
        let scene = Rc::new(RefCell::new(Scene::new()));
        let surface: SharedSurface = scene.clone();
        editor.attach_surface(surface);
        Self {
            editor,
            scene,
            last_pointer: None,
            status: None,
            textures: HashMap::new(),
            show_new_project: false,
            new_project_size,
            text_focus: None,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn scene(&self) -> Rc<RefCell<Scene>> {
        self.scene.clone()
    }

    pub fn last_pointer(&self) -> Option<egui::Pos2> {
        self.last_pointer
    }

    pub fn set_last_pointer(&mut self, pos: Option<egui::Pos2>) {
        self.last_pointer = pos;
    }

    /// Ask the layers panel to start editing the text of `id`
    pub fn request_text_focus(&mut self, id: LayerId) {
        self.text_focus = Some(id);
    }

    pub fn take_text_focus(&mut self, id: LayerId) -> bool {
        if self.text_focus == Some(id) {
            self.text_focus = None;
            return true;
        }
        false
    }

    /// Upload `image` once and reuse the texture on later frames
    pub fn texture(&mut self, ctx: &egui::Context, key: &str, image: Arc<ColorImage>) -> TextureId {
        self.textures
            .entry(key.to_owned())
            .or_insert_with(|| ctx.load_texture(key, image, egui::TextureOptions::LINEAR))
            .id()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        let status = status.into();
        log::info!("{status}");
        self.status = Some(status);
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        // Redo first so Cmd+Shift+Z is not consumed as undo
        if ctx.input_mut(|i| i.consume_shortcut(&REDO)) {
            if let Err(advisory) = self.editor.redo() {
                self.set_status(advisory.to_string());
            }
        }
        if ctx.input_mut(|i| i.consume_shortcut(&UNDO)) {
            if let Err(advisory) = self.editor.undo() {
                self.set_status(advisory.to_string());
            }
        }
        if ctx.input_mut(|i| i.consume_shortcut(&COPY)) {
            self.editor.copy();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&CUT)) {
            self.editor.cut();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&PASTE)) {
            self.editor.paste();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&SELECT_ALL)) {
            self.editor.select_all();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&DESELECT)) {
            self.editor.clear_selection();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&ZOOM_IN)) {
            self.scene.borrow_mut().zoom_in();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&ZOOM_OUT)) {
            self.scene.borrow_mut().zoom_out();
        }
        if ctx.input_mut(|i| i.consume_shortcut(&ZOOM_RESET)) {
            self.scene.borrow_mut().reset_view();
        }
        if ctx.input(|i| i.key_pressed(Key::Delete)) {
            if let Some(id) = self.editor.document().active_layer_id() {
                self.editor.delete_layer(id);
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            let name = file.name.clone();
            let bytes = match (&file.bytes, &file.path) {
                (Some(bytes), _) => Some(bytes.to_vec()),
                #[cfg(not(target_arch = "wasm32"))]
                (None, Some(path)) => match std::fs::read(path) {
                    Ok(bytes) => Some(bytes),
                    Err(err) => {
                        self.set_status(format!("Could not read {}: {err}", path.display()));
                        None
                    }
                },
                _ => None,
            };
            let Some(bytes) = bytes else {
                continue;
            };
            let name = if name.is_empty() { "Image".to_owned() } else { name };
            match self.editor.import_image(&name, &bytes) {
                Ok(_) => self.set_status(format!("Imported {name}")),
                Err(err) => self.set_status(format!("Import failed: {err}")),
            }
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New Project…").clicked() {
                        self.show_new_project = true;
                        ui.close_menu();
                    }
                    #[cfg(not(target_arch = "wasm32"))]
                    {
                        if ui.button("Save").clicked() {
                            self.save_to_disk();
                            ui.close_menu();
                        }
                        if ui.button("Open").clicked() {
                            self.open_from_disk();
                            ui.close_menu();
                        }
                    }
                });
                ui.menu_button("Edit", |ui| {
                    let (undo, redo) = crate::panels::undo_redo_buttons(ui, &self.editor);
                    if undo {
                        let _ = self.editor.undo();
                        ui.close_menu();
                    }
                    if redo {
                        let _ = self.editor.redo();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Select All").clicked() {
                        self.editor.select_all();
                        ui.close_menu();
                    }
                    if ui.button("Deselect").clicked() {
                        self.editor.clear_selection();
                        ui.close_menu();
                    }
                });
                if let Some(status) = &self.status {
                    ui.separator();
                    ui.label(status);
                }
            });
        });
    }

    fn new_project_window(&mut self, ctx: &egui::Context) {
        if !self.show_new_project {
            return;
        }
        let mut open = true;
        let mut create = false;
        egui::Window::new("New Project")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Width");
                    ui.add(egui::DragValue::new(&mut self.new_project_size[0]).range(1..=16384));
                    ui.label("Height");
                    ui.add(egui::DragValue::new(&mut self.new_project_size[1]).range(1..=16384));
                });
                create = ui.button("Create").clicked();
            });
        if create {
            let [width, height] = self.new_project_size;
            let options = self.editor.settings().project_options();
            match self.editor.new_project(width, height, options) {
                Ok(()) => self.set_status(format!("New project {width}x{height}")),
                Err(err) => self.set_status(err.to_string()),
            }
            open = false;
        }
        self.show_new_project = open;
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn project_path(&self) -> std::path::PathBuf {
        std::path::PathBuf::from(format!("{}.json", self.editor.document().project().name))
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn save_to_disk(&mut self) {
        let path = self.project_path();
        let record = self.editor.save_project();
        match record.write_to(&path) {
            Ok(()) => self.set_status(format!("Saved {}", path.display())),
            Err(err) => self.set_status(format!("Save failed: {err}")),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn open_from_disk(&mut self) {
        let path = self.project_path();
        let result = crate::document::ProjectRecord::read_from(&path)
            .and_then(|record| self.editor.load_project(record));
        match result {
            Ok(()) => self.set_status(format!("Opened {}", path.display())),
            Err(err) => self.set_status(format!("Open failed: {err}")),
        }
    }
}

impl eframe::App for EditorApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, eframe::APP_KEY, self.editor.settings());
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);
        self.handle_dropped_files(ctx);

        self.menu_bar(ctx);
        tools_panel(self, ctx);
        layers_panel(self, ctx);
        central_panel(self, ctx);
        self.new_project_window(ctx);

        self.editor.tick();
    }
}
