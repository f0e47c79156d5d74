use image::ImageError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error while loading image: {0}")]
    Image(#[from] ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot reduce {distinct} distinct colors to {requested} (expected 1..={distinct})")]
    InvalidClusterCount { requested: usize, distinct: usize },
    #[error("Image has {distinct} distinct colors, which exceeds the limit of {limit}")]
    TooManyColors { distinct: usize, limit: usize },
    #[error("Image has {pixels} pixels, which exceeds the limit of {limit}")]
    ImageTooLarge { pixels: u64, limit: usize },
    #[error("Pixel buffer of length {len} does not match dimensions {width}x{height}")]
    BufferSizeMismatch {
        width: usize,
        height: usize,
        len: usize,
    },

    #[error("Gaussian mask size must be at least 1")]
    InvalidMaskSize,
    #[error("Gaussian sigma must be a positive finite number")]
    InvalidSigma,
}
