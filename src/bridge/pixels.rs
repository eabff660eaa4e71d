use crate::error::ProjectResult;
use crate::layer::PixelStorageId;
use egui::ColorImage;
use std::collections::HashMap;
use std::sync::Arc;

/// Longest edge of generated thumbnails
pub const THUMBNAIL_SIZE: u32 = 40;

/// Result of decoding an image into the store
#[derive(Clone)]
pub struct ImportedImage {
    pub storage: PixelStorageId,
    /// Width, height in pixels
    pub size: [usize; 2],
    pub thumbnail: Arc<ColorImage>,
}

impl std::fmt::Debug for ImportedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImportedImage")
            .field("storage", &self.storage)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Backing pixels for raster layers
#[derive(Default)]
pub struct PixelStore {
    images: HashMap<PixelStorageId, Arc<ColorImage>>,
}

impl std::fmt::Debug for PixelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelStore")
            .field("images", &format!("<{} images>", self.images.len()))
            .finish()
    }
}

impl PixelStore {
    pub fn get(&self, id: PixelStorageId) -> Option<&Arc<ColorImage>> {
        self.images.get(&id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn insert(&mut self, image: ColorImage) -> PixelStorageId {
        let id = PixelStorageId::new();
        self.images.insert(id, Arc::new(image));
        id
    }

    /// Decode PNG/JPEG/... bytes and keep the pixels
    pub fn import(&mut self, bytes: &[u8]) -> ProjectResult<ImportedImage> {
        let decoded = image::load_from_memory(bytes)?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("Decoded image: {}x{}", width, height);

        let scale = THUMBNAIL_SIZE as f32 / width.max(height).max(1) as f32;
        let thumb_w = ((width as f32 * scale).round() as u32).max(1);
        let thumb_h = ((height as f32 * scale).round() as u32).max(1);
        let thumb = image::imageops::thumbnail(&rgba, thumb_w, thumb_h);
        let thumbnail = ColorImage::from_rgba_unmultiplied(
            [thumb_w as usize, thumb_h as usize],
            thumb.as_raw(),
        );

        let size = [width as usize, height as usize];
        let image = ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
        let storage = self.insert(image);
        Ok(ImportedImage {
            storage,
            size,
            thumbnail: Arc::new(thumbnail),
        })
    }
}
