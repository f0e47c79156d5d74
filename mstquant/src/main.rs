use std::path::{Path, PathBuf};

use clap::Parser;
use mstquant::{gaussian_blur, palette::to_hex, Error, Image, Quantizer};
use pbr::ProgressBar;
use tracing::{debug, info_span};

/// Reduce the number of colors in images by cutting the minimum spanning tree of their colors.
#[derive(Parser)]
#[clap(author, version, about)]
struct Args {
    /// One or more input image paths.
    #[clap(required = true)]
    inputs: Vec<PathBuf>,

    /// The number of colors to reduce each image to.
    #[clap(short = 'k', long, default_value_t = 16)]
    colors: usize,

    /// Output directory. Results keep their input's file stem and are saved as PNG.
    #[clap(short, long)]
    out_dir: Option<PathBuf>,

    /// Output filename prefix, used when no output directory is given.
    #[clap(short, long, default_value = "quantized_")]
    prefix: String,

    /// Smooth images with a Gaussian filter of this sigma before quantizing.
    #[clap(long)]
    smooth: Option<f64>,

    /// Size of the Gaussian mask used by --smooth. Even sizes are rounded up.
    #[clap(long, default_value_t = 5)]
    mask_size: usize,

    /// Print each image's palette as hex colors.
    #[clap(long)]
    palette: bool,
}

fn output_path(args: &Args, input: &Path) -> PathBuf {
    match &args.out_dir {
        Some(dir) => {
            let stem = input.file_stem().unwrap_or_default().to_string_lossy();
            dir.join(format!("{stem}.png"))
        }
        None => {
            let name = input.file_name().unwrap_or_default().to_string_lossy();
            input.with_file_name(format!("{}{name}", args.prefix))
        }
    }
}

fn process(args: &Args, quantizer: &Quantizer, input: &Path) -> Result<(), Error> {
    let _span = info_span!("process", ?input).entered();

    debug!("loading image");
    let mut image = Image::open(input)?;
    if let Some(sigma) = args.smooth {
        debug!(sigma, mask_size = args.mask_size, "smoothing image");
        image = gaussian_blur(&image, args.mask_size, sigma)?;
    }

    let result = quantizer.quantize(&image)?;
    eprintln!(
        "{}: {} distinct colors, MST weight {:.2}",
        input.display(),
        result.distinct_count(),
        result.rounded_mst_weight()
    );
    if args.palette {
        let palette: Vec<_> = result.palette().iter().map(|&c| to_hex(c)).collect();
        eprintln!("{}", palette.join(","));
    }

    let out_path = output_path(args, input);
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    result.image().save(&out_path)?;
    debug!(?out_path, "saved image");

    Ok(())
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let quantizer = Quantizer::new(args.colors);

    let mut progress = ProgressBar::on(std::io::stderr(), args.inputs.len() as u64);
    for input in &args.inputs {
        process(&args, &quantizer, input)?;
        progress.inc();
    }
    progress.finish();

    Ok(())
}
