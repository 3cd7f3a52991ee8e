#![forbid(unsafe_code)]

//! Best-effort bitmap output for rendered charts.
//!
//! [`rasterize_chart`] never fails loudly: empty data, unsupported chart types and encoder
//! errors all come back as `None`, because a missing chart image is something every caller
//! already has to handle. Use [`svg_to_png`] / [`svg_to_jpeg`] directly when the reason matters.

use crate::ChartSpec;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("failed to parse SVG")]
    SvgParse,
    #[error("failed to allocate pixmap for raster rendering")]
    PixmapAlloc,
    #[error("failed to encode PNG")]
    PngEncode,
    #[error("invalid background color for JPG rendering")]
    JpegBackground,
    #[error("JPG rendering requires an opaque background color (e.g. white)")]
    JpegOpaqueBackgroundRequired,
    #[error("failed to encode JPG")]
    JpegEncode,
    #[error("bitmap encoder panicked")]
    EncoderPanic,
}

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BitmapFormat {
    #[default]
    Png,
    Jpeg,
}

impl FromStr for BitmapFormat {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            _ => Err(()),
        }
    }
}

impl BitmapFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RasterOptions {
    pub format: BitmapFormat,
    /// Pixels per SVG unit; 2.0 keeps text crisp on high-density displays.
    pub scale: f32,
    pub background: Option<String>,
    pub jpeg_quality: u8,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            format: BitmapFormat::Png,
            scale: 2.0,
            background: Some("white".to_string()),
            jpeg_quality: 90,
        }
    }
}

/// Turns a finished SVG document into bitmap bytes.
///
/// This is the seam to the image backend; [`ResvgEncoder`] is the built-in implementation.
pub trait BitmapEncoder: Send + Sync {
    fn encode(&self, svg: &str) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Default)]
pub struct ResvgEncoder {
    pub options: RasterOptions,
}

impl ResvgEncoder {
    pub fn new(options: RasterOptions) -> Self {
        Self { options }
    }
}

impl BitmapEncoder for ResvgEncoder {
    fn encode(&self, svg: &str) -> Result<Vec<u8>> {
        match self.options.format {
            BitmapFormat::Png => svg_to_png(svg, &self.options),
            BitmapFormat::Jpeg => svg_to_jpeg(svg, &self.options),
        }
    }
}

/// Rasterizes `spec` with the built-in resvg encoder.
///
/// Returns `None` when there is no data, the chart type is unsupported, or encoding fails.
/// Runtime-agnostic: the work is CPU-bound and the future completes on first poll.
pub async fn rasterize_chart(spec: &ChartSpec, options: &RasterOptions) -> Option<Vec<u8>> {
    rasterize_chart_sync(spec, options)
}

/// Same as [`rasterize_chart`], but with a caller-supplied encoder.
pub async fn rasterize_chart_with(
    spec: &ChartSpec,
    encoder: &dyn BitmapEncoder,
) -> Option<Vec<u8>> {
    rasterize_chart_with_sync(spec, encoder)
}

/// Synchronous rasterization helper (executor-free).
pub fn rasterize_chart_sync(spec: &ChartSpec, options: &RasterOptions) -> Option<Vec<u8>> {
    rasterize_chart_with_sync(spec, &ResvgEncoder::new(options.clone()))
}

pub fn rasterize_chart_with_sync(spec: &ChartSpec, encoder: &dyn BitmapEncoder) -> Option<Vec<u8>> {
    if spec.data.is_empty() {
        tracing::debug!(chart_type = %spec.chart_type, "no rows; skipping rasterization");
        return None;
    }

    let svg = super::render_svg(spec)?;

    let encoded = catch_unwind(AssertUnwindSafe(|| encoder.encode(&svg)))
        .unwrap_or(Err(RasterError::EncoderPanic));
    match encoded {
        Ok(bytes) if !bytes.is_empty() => Some(bytes),
        Ok(_) => {
            tracing::warn!(chart_type = %spec.chart_type, "encoder returned no bytes");
            None
        }
        Err(err) => {
            tracing::warn!(chart_type = %spec.chart_type, error = %err, "chart rasterization failed");
            None
        }
    }
}

pub fn svg_to_png(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let pixmap = svg_to_pixmap(svg, options.scale, options.background.as_deref())?;
    pixmap.encode_png().map_err(|_| RasterError::PngEncode)
}

pub fn svg_to_jpeg(svg: &str, options: &RasterOptions) -> Result<Vec<u8>> {
    let bg = options.background.as_deref().unwrap_or("white");
    let Some(color) = parse_tiny_skia_color(bg) else {
        return Err(RasterError::JpegBackground);
    };
    if color.alpha() != 1.0 {
        return Err(RasterError::JpegOpaqueBackgroundRequired);
    }

    let pixmap = svg_to_pixmap(svg, options.scale, Some(bg))?;
    let (w, h) = (pixmap.width(), pixmap.height());

    // The pixmap was filled with an opaque color first, so alpha is always 255 and can go.
    let rgb: Vec<u8> = pixmap
        .data()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let mut out = Vec::new();
    let mut enc =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, options.jpeg_quality);
    enc.encode(&rgb, w, h, image::ExtendedColorType::Rgb8)
        .map_err(|_| RasterError::JpegEncode)?;
    Ok(out)
}

/// System fonts, loaded once per process and shared by every encode.
fn font_database() -> Arc<usvg::fontdb::Database> {
    static FONTS: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = usvg::fontdb::Database::new();
            db.load_system_fonts();
            tracing::debug!(faces = db.len(), "loaded system fonts for rasterization");
            Arc::new(db)
        })
        .clone()
}

fn svg_to_pixmap(svg: &str, scale: f32, background: Option<&str>) -> Result<tiny_skia::Pixmap> {
    let mut opt = usvg::Options::default();
    opt.fontdb = font_database();
    opt.font_family = "Helvetica".to_string();

    let tree = usvg::Tree::from_str(svg, &opt).map_err(|_| RasterError::SvgParse)?;

    let size = tree.size();
    let width_px = (size.width() * scale).ceil().max(1.0) as u32;
    let height_px = (size.height() * scale).ceil().max(1.0) as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or(RasterError::PixmapAlloc)?;

    if let Some(color) = background.and_then(parse_tiny_skia_color) {
        pixmap.fill(color);
    }

    resvg::render(
        &tree,
        tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap)
}

fn parse_tiny_skia_color(text: &str) -> Option<tiny_skia::Color> {
    let s = text.trim().to_ascii_lowercase();
    match s.as_str() {
        "transparent" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 0)),
        "white" => return Some(tiny_skia::Color::from_rgba8(255, 255, 255, 255)),
        "black" => return Some(tiny_skia::Color::from_rgba8(0, 0, 0, 255)),
        _ => {}
    }

    let hex = s.strip_prefix('#')?;
    fn hex2(b: &[u8]) -> Option<u8> {
        let hi = (*b.first()? as char).to_digit(16)? as u8;
        let lo = (*b.get(1)? as char).to_digit(16)? as u8;
        Some((hi << 4) | lo)
    }
    fn hex1(c: u8) -> Option<u8> {
        let v = (c as char).to_digit(16)? as u8;
        Some((v << 4) | v)
    }

    let bytes = hex.as_bytes();
    let [r, g, b, a] = match bytes.len() {
        3 => [hex1(bytes[0])?, hex1(bytes[1])?, hex1(bytes[2])?, 255],
        4 => [
            hex1(bytes[0])?,
            hex1(bytes[1])?,
            hex1(bytes[2])?,
            hex1(bytes[3])?,
        ],
        6 => [
            hex2(&bytes[0..2])?,
            hex2(&bytes[2..4])?,
            hex2(&bytes[4..6])?,
            255,
        ],
        8 => [
            hex2(&bytes[0..2])?,
            hex2(&bytes[2..4])?,
            hex2(&bytes[4..6])?,
            hex2(&bytes[6..8])?,
        ],
        _ => return None,
    };
    Some(tiny_skia::Color::from_rgba8(r, g, b, a))
}
