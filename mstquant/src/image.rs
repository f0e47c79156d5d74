//! Image utilities.

use std::{io::Cursor, ops::Index, path::Path};

use image::{io::Reader, DynamicImage, Rgb, RgbImage};

use crate::{error::Error, Color};

/// A row-major grid of pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image<T> {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<T>,
}

impl<T> Image<T> {
    /// Wraps a pixel buffer, checking that it holds exactly `width * height` pixels.
    pub fn new(width: usize, height: usize, pixels: Vec<T>) -> Result<Self, Error> {
        if width * height != pixels.len() {
            return Err(Error::BufferSizeMismatch {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }
}

impl<T> Index<(usize, usize)> for Image<T> {
    type Output = T;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.pixels[index.0 + index.1 * self.width]
    }
}

impl Image<Color> {
    /// Decodes an image file into RGB. Alpha is dropped, grayscale is expanded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        Ok(Self::from_rgb_image(&image::open(path)?.to_rgb8()))
    }

    /// Decodes an in-memory encoded image (PNG, JPEG, BMP, ...).
    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        Ok(Self::from_rgb_image(&image::load_from_memory(bytes)?.to_rgb8()))
    }

    /// Like [`Self::decode`], but reads only the header first and refuses images with more than
    /// `max_pixels` pixels before any of the raster is allocated.
    pub fn decode_limited(bytes: &[u8], max_pixels: usize) -> Result<Self, Error> {
        let (width, height) = Reader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .into_dimensions()?;
        let pixels = width as u64 * height as u64;
        if pixels > max_pixels as u64 {
            return Err(Error::ImageTooLarge {
                pixels,
                limit: max_pixels,
            });
        }

        let image = Reader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .decode()?;
        Ok(Self::from_rgb_image(&image.to_rgb8()))
    }

    pub fn from_rgb_image(image: &RgbImage) -> Self {
        Self {
            width: image.width() as usize,
            height: image.height() as usize,
            pixels: image.pixels().map(|&Rgb(color)| color).collect(),
        }
    }

    pub fn to_rgb_image(&self) -> RgbImage {
        let raw = self.pixels.iter().copied().flatten().collect();
        // The buffer length is width * height * 3 by construction.
        RgbImage::from_raw(self.width as u32, self.height as u32, raw)
            .unwrap_or_else(|| RgbImage::new(self.width as u32, self.height as u32))
    }

    /// Encodes the image, picking the format from the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        DynamicImage::from(self.to_rgb_image()).save(path)?;
        Ok(())
    }

    /// Encodes the image as PNG into memory.
    pub fn encode_png(&self) -> Result<Vec<u8>, Error> {
        let mut buffer = std::io::Cursor::new(Vec::new());
        DynamicImage::from(self.to_rgb_image())
            .write_to(&mut buffer, image::ImageOutputFormat::Png)?;
        Ok(buffer.into_inner())
    }
}
