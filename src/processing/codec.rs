//! Codec adapter over the `image` crate.
//!
//! Decoding sniffs the input format from the bytes themselves, so a mislabeled
//! upload still converts. Encoding normalises the pixel layout to something the
//! target encoder accepts before handing it over.

use std::borrow::Cow;

use image::codecs::avif::AvifEncoder;
use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, DynamicImage};
use tracing::debug;

use crate::utils::{ConversionError, TargetFormat};

type Result<T> = std::result::Result<T, ConversionError>;

// 1 (slowest) to 10 (fastest); ravif's own default is 4
const AVIF_SPEED: u8 = 8;

/// Turns the bytes of one image into the bytes of the same image in another format.
///
/// Implementations must be pure: no I/O, no shared mutable state.
pub trait Codec: Send + Sync {
    fn convert(&self, bytes: &[u8], format: TargetFormat, quality: u8) -> Result<Vec<u8>>;
}

/// Default [`Codec`] backed by the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCodec;

impl Codec for ImageCodec {
    fn convert(&self, bytes: &[u8], format: TargetFormat, quality: u8) -> Result<Vec<u8>> {
        let image = decode(bytes)?;
        debug!("Decoded {}x{} {:?} image", image.width(), image.height(), image.color());
        encode(&image, format, quality)
    }
}

/// Decodes raw bytes into an in-memory image.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(ConversionError::decode)
}

/// Encodes `image` as `format`.
///
/// `quality` reaches the JPEG, WebP and AVIF encoders. PNG and BMP have
/// nothing to tune with it.
pub fn encode(image: &DynamicImage, format: TargetFormat, quality: u8) -> Result<Vec<u8>> {
    let mut buf = Vec::new();

    let written = match format {
        TargetFormat::PNG => png_layout(image).write_with_encoder(PngEncoder::new_with_quality(
            &mut buf,
            CompressionType::Default,
            FilterType::Adaptive,
        )),
        TargetFormat::JPEG | TargetFormat::JFIF => without_alpha(image)
            .write_with_encoder(JpegEncoder::new_with_quality(&mut buf, quality)),
        TargetFormat::BMP => to_8bit(image).write_with_encoder(BmpEncoder::new(&mut buf)),
        TargetFormat::WEBP => return encode_webp(image, quality),
        TargetFormat::AVIF => to_rgb_or_rgba(image).write_with_encoder(
            AvifEncoder::new_with_speed_quality(&mut buf, AVIF_SPEED, quality),
        ),
    };

    written.map_err(ConversionError::encode)?;
    Ok(buf)
}

/// Lossy WebP through libwebp; the `image` crate only writes lossless WebP.
fn encode_webp(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let image = to_rgb_or_rgba(image);
    let (width, height) = (image.width(), image.height());

    let encoder = if image.color().has_alpha() {
        webp::Encoder::from_rgba(image.as_bytes(), width, height)
    } else {
        webp::Encoder::from_rgb(image.as_bytes(), width, height)
    };

    let memory = encoder
        .encode_simple(false, f32::from(quality))
        .map_err(|err| ConversionError::Encode(format!("WebP encoding failed: {err:?}")))?;
    Ok(memory.to_vec())
}

/// PNG stores 8 and 16 bits per channel as they are; float layouts become 16-bit.
fn png_layout(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image.color() {
        ColorType::L8
        | ColorType::La8
        | ColorType::Rgb8
        | ColorType::Rgba8
        | ColorType::L16
        | ColorType::La16
        | ColorType::Rgb16
        | ColorType::Rgba16 => Cow::Borrowed(image),
        color if color.has_alpha() => Cow::Owned(DynamicImage::ImageRgba16(image.to_rgba16())),
        _ => Cow::Owned(DynamicImage::ImageRgb16(image.to_rgb16())),
    }
}

/// Narrows 16-bit and float layouts to 8 bits per channel, keeping alpha.
fn to_8bit(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image.color() {
        ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => Cow::Borrowed(image),
        color if color.has_alpha() => Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8())),
        _ => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
    }
}

/// JPEG carries no alpha channel; it is dropped, not blended.
fn without_alpha(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image.color() {
        ColorType::L8 | ColorType::Rgb8 => Cow::Borrowed(image),
        _ => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
    }
}

fn to_rgb_or_rgba(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image.color() {
        ColorType::Rgb8 | ColorType::Rgba8 => Cow::Borrowed(image),
        color if color.has_alpha() => Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8())),
        _ => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
    }
}
