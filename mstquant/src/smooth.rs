//! Separable Gaussian smoothing, usable as a pre-pass before quantization.

use rayon::prelude::*;

use crate::{error::Error, image::Image, Color};

/// Builds a normalized 1-D Gaussian kernel. Even sizes are bumped up to the next odd size so
/// that the kernel has a center tap.
pub fn gaussian_kernel(mask_size: usize, sigma: f64) -> Result<Vec<f64>, Error> {
    if mask_size == 0 {
        return Err(Error::InvalidMaskSize);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(Error::InvalidSigma);
    }

    let size = mask_size | 1;
    let half = (size / 2) as isize;
    let mut kernel: Vec<_> = (-half..=half)
        .map(|y| (-((y * y) as f64) / (2.0 * sigma * sigma)).exp())
        .collect();
    let sum: f64 = kernel.iter().sum();
    for tap in &mut kernel {
        *tap /= sum;
    }
    Ok(kernel)
}

/// Blurs the image vertically then horizontally. Taps falling outside the image are dropped
/// without renormalizing, which darkens borders slightly; results are truncated to integers.
pub fn gaussian_blur(image: &Image<Color>, mask_size: usize, sigma: f64) -> Result<Image<Color>, Error> {
    let kernel = gaussian_kernel(mask_size, sigma)?;
    let half = (kernel.len() / 2) as isize;
    let (width, height) = (image.width, image.height);
    if image.is_empty() {
        return Ok(image.clone());
    }

    let vertical: Vec<[f64; 3]> = (0..width * height)
        .into_par_iter()
        .map(|index| {
            let (x, y) = (index % width, (index / width) as isize);
            let mut sum = [0.0; 3];
            for (tap, offset) in kernel.iter().zip(-half..=half) {
                let yy = y + offset;
                if yy >= 0 && (yy as usize) < height {
                    let color = image[(x, yy as usize)];
                    for channel in 0..3 {
                        sum[channel] += tap * color[channel] as f64;
                    }
                }
            }
            sum
        })
        .collect();

    let pixels = (0..width * height)
        .into_par_iter()
        .map(|index| {
            let (x, y) = ((index % width) as isize, index / width);
            let mut sum = [0.0; 3];
            for (tap, offset) in kernel.iter().zip(-half..=half) {
                let xx = x + offset;
                if xx >= 0 && (xx as usize) < width {
                    let color = vertical[xx as usize + y * width];
                    for channel in 0..3 {
                        sum[channel] += tap * color[channel];
                    }
                }
            }
            sum.map(|x| x as u8)
        })
        .collect();

    Ok(Image {
        width,
        height,
        pixels,
    })
}
