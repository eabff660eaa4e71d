//! Keeps the rendering surface's object set in step with the document's layers.
//!
//! The bridge only reads the document. Changes that originate on the surface
//! come back as tool outcomes and go through document operations instead.

mod pixels;

pub use pixels::{ImportedImage, PixelStore, THUMBNAIL_SIZE};

use crate::document::Document;
use crate::layer::{Layer, LayerContent, LayerId, ShapeGeometry};
use crate::surface::{DrawableProps, ObjectId, Primitive, RenderSurface};
use std::collections::{HashMap, HashSet};

/// How many surface objects one reconciliation touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub removed: usize,
}

impl SyncReport {
    pub fn is_empty(&self) -> bool {
        self.created == 0 && self.updated == 0 && self.removed == 0
    }
}

#[derive(Debug, Clone)]
struct Mapping {
    object: ObjectId,
    primitive: Primitive,
    props: DrawableProps,
}

#[derive(Debug, Default)]
pub struct RenderBridge {
    objects: HashMap<LayerId, Mapping>,
    last_revision: Option<u64>,
    pixels: PixelStore,
}

/// Surface primitive and properties for a layer
pub fn describe_layer(layer: &Layer) -> (Primitive, DrawableProps) {
    let mut props = DrawableProps::new(layer.rect());
    props.visible = layer.visible;
    props.opacity = f32::from(layer.opacity) / 100.0;
    props.blend_mode = layer.blend_mode;

    let primitive = match &layer.content {
        LayerContent::Raster(raster) => Primitive::Image {
            storage: raster.storage,
        },
        LayerContent::Text(text) => {
            props.fill = Some(text.fill);
            Primitive::Text {
                content: text.content.clone(),
                font_size: text.font_size,
            }
        }
        LayerContent::Shape(shape) => {
            props.fill = shape.fill;
            props.stroke = shape.stroke;
            props.stroke_width = shape.stroke_width;
            props.erase = shape.erase;
            match &shape.geometry {
                ShapeGeometry::Rectangle => Primitive::Rect {
                    corner_radius: shape.corner_radius,
                },
                ShapeGeometry::Ellipse => Primitive::Ellipse,
                ShapeGeometry::Line { from, to } => Primitive::Line {
                    from: layer.position + from.to_vec2(),
                    to: layer.position + to.to_vec2(),
                },
                ShapeGeometry::Polygon { sides } => Primitive::Polygon { sides: *sides },
                ShapeGeometry::Path(points) => Primitive::Path {
                    points: points
                        .iter()
                        .map(|p| layer.position + p.to_vec2())
                        .collect(),
                },
            }
        }
        LayerContent::Adjustment(_) | LayerContent::Group(_) => Primitive::Group,
    };
    (primitive, props)
}

impl RenderBridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pixels(&self) -> &PixelStore {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut PixelStore {
        &mut self.pixels
    }

    pub fn object_for(&self, layer: LayerId) -> Option<ObjectId> {
        self.objects.get(&layer).map(|mapping| mapping.object)
    }

    pub fn layer_for(&self, object: ObjectId) -> Option<LayerId> {
        self.objects
            .iter()
            .find(|(_, mapping)| mapping.object == object)
            .map(|(id, _)| *id)
    }

    pub fn mapped_count(&self) -> usize {
        self.objects.len()
    }

    /// Forget every mapping, e.g. when the surface is replaced
    pub fn detach(&mut self) {
        self.objects.clear();
        self.last_revision = None;
    }

    /// Reconcile only when the document changed since the last sync
    pub fn sync_if_changed(&mut self, doc: &Document, surface: &mut dyn RenderSurface) -> Option<SyncReport> {
        if self.last_revision == Some(doc.revision()) {
            return None;
        }
        Some(self.sync(doc, surface))
    }

    /// Make the surface's object set match the document's layers
    pub fn sync(&mut self, doc: &Document, surface: &mut dyn RenderSurface) -> SyncReport {
        let mut report = SyncReport::default();

        let live: HashSet<LayerId> = doc.layers().iter().map(|layer| layer.id).collect();
        let stale: Vec<LayerId> = self
            .objects
            .keys()
            .filter(|id| !live.contains(id))
            .copied()
            .collect();
        for id in stale {
            if let Some(mapping) = self.objects.remove(&id) {
                surface.remove_object(mapping.object);
                report.removed += 1;
            }
        }

        let mut order = Vec::with_capacity(doc.layer_count());
        for layer in doc.layers() {
            let (primitive, props) = describe_layer(layer);
            let object = match self.objects.get_mut(&layer.id) {
                Some(mapping) => {
                    let primitive_changed = mapping.primitive != primitive;
                    if primitive_changed || mapping.props != props {
                        let replace = primitive_changed.then(|| primitive.clone());
                        if surface.update_object(mapping.object, replace, props.clone()) {
                            report.updated += 1;
                        } else {
                            // The surface lost the object; put it back
                            mapping.object = surface.create_object(primitive.clone(), props.clone());
                            report.created += 1;
                        }
                        mapping.primitive = primitive;
                        mapping.props = props;
                    }
                    mapping.object
                }
                None => {
                    let object = surface.create_object(primitive.clone(), props.clone());
                    self.objects.insert(
                        layer.id,
                        Mapping {
                            object,
                            primitive,
                            props,
                        },
                    );
                    report.created += 1;
                    object
                }
            };
            order.push(object);
        }
        surface.reorder(&order);
        self.last_revision = Some(doc.revision());

        if !report.is_empty() {
            log::debug!(
                "Bridge sync: {} created, {} updated, {} removed",
                report.created,
                report.updated,
                report.removed
            );
        }
        report
    }
}
