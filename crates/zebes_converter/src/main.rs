//! Resize an image and key out a background color, writing an RGBA PNG.

use image::imageops::FilterType;
use image::{Rgb, RgbImage, RgbaImage};
use std::path::PathBuf;

const DEFAULT_TOLERANCE: f64 = 30.0;

#[derive(Debug, Clone, PartialEq)]
struct ConvertArgs {
    input: PathBuf,
    output: PathBuf,
    width: u32,
    height: u32,
    chroma_key: [u8; 3],
    tolerance: f64,
}

fn usage() -> String {
    "Usage: zebes_converter <input> <output_png> <width> <height> <R> <G> <B> [tolerance=30]\nExample: zebes_converter samus.jpg assets/textures/samus.png 64 64 0 255 0 40".to_string()
}

fn parse_number<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, String>
where
    T::Err: std::fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| format!("Invalid {name} '{raw}': {e}"))
}

fn parse_args(args: &[String]) -> Result<ConvertArgs, String> {
    if args.len() < 8 || args.len() > 9 {
        return Err(usage());
    }
    let width: u32 = parse_number("width", &args[3])?;
    let height: u32 = parse_number("height", &args[4])?;
    if width == 0 || height == 0 {
        return Err(format!("Target size must be positive, got {width}x{height}"));
    }
    let chroma_key = [
        parse_number("R", &args[5])?,
        parse_number("G", &args[6])?,
        parse_number("B", &args[7])?,
    ];
    let tolerance = match args.get(8) {
        Some(raw) => parse_number("tolerance", raw)?,
        None => DEFAULT_TOLERANCE,
    };
    Ok(ConvertArgs {
        input: PathBuf::from(&args[1]),
        output: PathBuf::from(&args[2]),
        width,
        height,
        chroma_key,
        tolerance,
    })
}

fn color_distance(a: [u8; 3], b: [u8; 3]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Returns the keyed image and how many pixels became transparent.
fn chroma_key(rgb: &RgbImage, key: [u8; 3], tolerance: f64) -> (RgbaImage, usize) {
    let mut transparent = 0;
    let rgba = RgbaImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let Rgb(p) = *rgb.get_pixel(x, y);
        let alpha = if color_distance(p, key) <= tolerance {
            transparent += 1;
            0
        } else {
            255
        };
        image::Rgba([p[0], p[1], p[2], alpha])
    });
    (rgba, transparent)
}

fn convert(args: &ConvertArgs) -> Result<(), String> {
    log::info!("Reading input file: {}", args.input.display());
    let source = image::open(&args.input)
        .map_err(|e| format!("Failed to load image '{}': {e}", args.input.display()))?
        .to_rgb8();
    log::info!("Original dimensions: {}x{}", source.width(), source.height());

    let resized = image::imageops::resize(&source, args.width, args.height, FilterType::Triangle);
    log::info!("Resized to: {}x{}", args.width, args.height);

    let (keyed, transparent) = chroma_key(&resized, args.chroma_key, args.tolerance);
    log::info!("Made {transparent} pixels transparent");

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
    }
    log::info!("Writing output to: {}", args.output.display());
    keyed
        .save_with_format(&args.output, image::ImageFormat::Png)
        .map_err(|e| format!("Failed to write PNG file to '{}': {e}", args.output.display()))
}

fn main() -> Result<(), String> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let parsed = parse_args(&args).inspect_err(|e| log::error!("{e}"))?;
    convert(&parsed).inspect_err(|e| log::error!("Operation failed: {e}"))?;
    log::info!("Conversion successful.");
    Ok(())
}
