use std::io::Cursor;

use anyhow::{anyhow, Context, Result};
use eframe::egui;
use fast_image_resize::images::Image;
use fast_image_resize::{PixelType, ResizeOptions, Resizer};
use image::DynamicImage;
use zune_jpeg::JpegDecoder;

/// Images larger than this are downscaled before texture upload. 4K is
/// plenty for a preview.
pub const MAX_TEXTURE_WIDTH: u32 = 3840;
pub const MAX_TEXTURE_HEIGHT: u32 = 2160;

/// A decoded image ready to become a texture.
#[derive(Debug)]
pub struct StageImage {
    pub size: egui::Vec2,
    pub color_image: egui::ColorImage,
}

pub fn to_color_image(img: &DynamicImage) -> egui::ColorImage {
    let rgba = img.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let pixels = rgba.into_raw();
    egui::ColorImage::from_rgba_unmultiplied(size, &pixels)
}

pub fn looks_like_jpeg(name: Option<&str>, bytes: &[u8]) -> bool {
    if let Some(name) = name {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
            return true;
        }
    }
    // SOI marker
    bytes.starts_with(&[0xFF, 0xD8])
}

/// Decodes raw file bytes, trying zune-jpeg first for JPEGs and falling back
/// to the generic decoder for everything else (or if the fast path fails).
pub fn decode_image(name: Option<&str>, bytes: &[u8]) -> Result<DynamicImage> {
    if looks_like_jpeg(name, bytes) {
        let mut decoder = JpegDecoder::new(Cursor::new(bytes));
        if let Ok(pixels) = decoder.decode() {
            if let Some(info) = decoder.info() {
                // zune-jpeg usually returns RGB8
                if let Some(rgb) =
                    image::RgbImage::from_raw(info.width as u32, info.height as u32, pixels)
                {
                    return Ok(DynamicImage::ImageRgb8(rgb));
                }
            }
        }
    }
    image::load_from_memory(bytes).context("unsupported or corrupt image data")
}

/// Downscales images beyond the texture limits, preserving aspect ratio.
/// Smaller images pass through untouched.
pub fn downscale_if_huge(image: DynamicImage) -> Result<DynamicImage> {
    if image.width() <= MAX_TEXTURE_WIDTH && image.height() <= MAX_TEXTURE_HEIGHT {
        return Ok(image);
    }

    let ratio = image.width() as f64 / image.height() as f64;
    let (new_w, new_h) = if ratio > MAX_TEXTURE_WIDTH as f64 / MAX_TEXTURE_HEIGHT as f64 {
        (MAX_TEXTURE_WIDTH, (MAX_TEXTURE_WIDTH as f64 / ratio) as u32)
    } else {
        ((MAX_TEXTURE_HEIGHT as f64 * ratio) as u32, MAX_TEXTURE_HEIGHT)
    };

    let rgba = image.to_rgba8();
    let src = Image::from_vec_u8(rgba.width(), rgba.height(), rgba.into_raw(), PixelType::U8x4)
        .map_err(|err| anyhow!("resize source: {err}"))?;
    let mut dst = Image::new(new_w, new_h, PixelType::U8x4);
    let mut resizer = Resizer::new();
    resizer
        .resize(&src, &mut dst, &ResizeOptions::default())
        .map_err(|err| anyhow!("resize: {err}"))?;

    let buffer = image::RgbaImage::from_raw(new_w, new_h, dst.into_vec())
        .ok_or_else(|| anyhow!("resized buffer has unexpected length"))?;
    Ok(DynamicImage::ImageRgba8(buffer))
}

/// Full pipeline from raw file bytes to a texture-ready image.
pub fn prepare_stage_image(name: Option<&str>, bytes: &[u8]) -> Result<StageImage> {
    let decoded = decode_image(name, bytes)?;
    let decoded = downscale_if_huge(decoded)?;
    let size = egui::Vec2::new(decoded.width() as f32, decoded.height() as f32);
    Ok(StageImage {
        size,
        color_image: to_color_image(&decoded),
    })
}
