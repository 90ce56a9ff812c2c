//! Equirectangular Earth map loading

use std::path::Path;

use anyhow::{Context, Result};
use image::{DynamicImage, GenericImageView};

/// Default location of the Earth map, relative to the working directory
pub const DEFAULT_EARTH_TEXTURE: &str = "assets/uvearth.jpeg";

/// Load an Earth map from a file path
pub fn load_earth_texture(path: impl AsRef<Path>) -> Result<EarthTexture> {
    let path = path.as_ref();
    log::info!("Loading texture: {:?}", path);

    let img = image::open(path).with_context(|| format!("Failed to load texture: {:?}", path))?;

    Ok(EarthTexture::from_image(img))
}

/// RGBA pixels of an equirectangular map: x spans longitude -180..180,
/// y spans latitude 90..-90
pub struct EarthTexture {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl EarthTexture {
    pub fn from_image(img: DynamicImage) -> Self {
        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();

        Self {
            width,
            height,
            data: rgba.into_raw(),
        }
    }

    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied(
            [self.width as usize, self.height as usize],
            &self.data,
        )
    }
}

/// Texture coordinate of a geographic point on an equirectangular map
pub fn equirect_uv(longitude: f64, latitude: f64) -> egui::Pos2 {
    egui::pos2(
        ((longitude + 180.0) / 360.0).clamp(0.0, 1.0) as f32,
        ((90.0 - latitude) / 180.0).clamp(0.0, 1.0) as f32,
    )
}
