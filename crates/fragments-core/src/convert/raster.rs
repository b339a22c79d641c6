//! Raster image re-encoding.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat};

use super::BoxedError;
use crate::media::MediaType;

/// Returns the codec format for an image media type.
pub fn image_format(media_type: MediaType) -> Option<ImageFormat> {
    match media_type {
        MediaType::ImagePng => Some(ImageFormat::Png),
        MediaType::ImageJpeg => Some(ImageFormat::Jpeg),
        MediaType::ImageWebp => Some(ImageFormat::WebP),
        MediaType::ImageAvif => Some(ImageFormat::Avif),
        MediaType::ImageGif => Some(ImageFormat::Gif),
        _ => None,
    }
}

/// Decodes `input` and encodes it as `target`.
///
/// JPEG has no alpha channel, so images are flattened to RGB first; every
/// other target receives RGBA.
pub fn transcode(input: &[u8], target: ImageFormat) -> Result<Vec<u8>, BoxedError> {
    let decoded = image::load_from_memory(input)?;
    let prepared = match target {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(decoded.to_rgb8()),
        _ => DynamicImage::ImageRgba8(decoded.to_rgba8()),
    };

    let mut output = Cursor::new(Vec::new());
    prepared.write_to(&mut output, target)?;
    Ok(output.into_inner())
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::*;

    fn sample_png() -> Vec<u8> {
        let image = RgbaImage::from_pixel(4, 3, Rgba([200, 10, 10, 255]));
        let mut output = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(image)
            .write_to(&mut output, ImageFormat::Png)
            .unwrap();
        output.into_inner()
    }

    #[test]
    fn png_to_jpeg_keeps_dimensions() {
        let jpeg = transcode(&sample_png(), ImageFormat::Jpeg).unwrap();
        assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);

        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (4, 3));
    }

    #[test]
    fn png_to_gif() {
        let gif = transcode(&sample_png(), ImageFormat::Gif).unwrap();
        assert_eq!(image::guess_format(&gif).unwrap(), ImageFormat::Gif);
    }

    #[test]
    fn corrupt_input_fails() {
        assert!(transcode(b"definitely not an image", ImageFormat::Png).is_err());
    }

    #[test]
    fn formats_for_media_types() {
        assert_eq!(image_format(MediaType::ImageWebp), Some(ImageFormat::WebP));
        assert_eq!(image_format(MediaType::TextPlain), None);
    }
}
