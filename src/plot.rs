//! Wilson plot rendering
//!
//! The figure is drawn in memory with [plotters] and written to disk in a single
//! step, so a failed rendering never leaves a partial image behind.

use crate::WilsonPoint;
use image::{ImageFormat, RgbImage};
use itertools::{Itertools, MinMaxResult};
use plotters::{coord::Shift, prelude::*};
use std::{
    fs, io,
    io::Cursor,
    ops::Range,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum PlotError {
    #[error("no Wilson point to plot")]
    EmptyDataset,
    #[error("cannot infer a supported image format from {0:?}")]
    UnsupportedFormat(PathBuf),
    #[error("failed to draw the Wilson plot: {0}")]
    Draw(String),
    #[error("failed to encode the image")]
    Encode(#[from] image::ImageError),
    #[error("failed to write {path:?}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
type Result<T> = std::result::Result<T, PlotError>;

/// Output image format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Svg,
    Raster(ImageFormat),
}
impl Format {
    fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("svg") => Ok(Format::Svg),
            Some(ext) => match ImageFormat::from_extension(ext) {
                Some(
                    format @ (ImageFormat::Png
                    | ImageFormat::Jpeg
                    | ImageFormat::Bmp
                    | ImageFormat::Tiff),
                ) => Ok(Format::Raster(format)),
                _ => Err(PlotError::UnsupportedFormat(path.to_path_buf())),
            },
            None => Err(PlotError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Axis range of the values with a 5% margin on both ends
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = match values.minmax() {
        MinMaxResult::NoElements => (0f64, 1f64),
        MinMaxResult::OneElement(value) => (value, value),
        MinMaxResult::MinMax(min, max) => (min, max),
    };
    let padding = if max > min {
        (max - min) * 5e-2
    } else {
        min.abs().max(1f64) * 5e-2
    };
    min - padding..max + padding
}

/// Round resolutions [Å] marked on the resolution axis of low resolution data
const LOW_RESOLUTION_TICKS: [f64; 6] = [5.5, 3.0, 2.0, 1.5, 1.3, 1.2];
/// Round resolutions [Å] marked on the resolution axis of atomic resolution data
const HIGH_RESOLUTION_TICKS: [f64; 11] =
    [5.5, 3.0, 2.0, 1.5, 1.4, 1.3, 1.2, 1.1, 1.0, 0.9, 0.8];

/// 1/d^2 positions of the round resolutions inside the 1/d^2 range
fn resolution_ticks(x_range: &Range<f64>) -> Vec<f64> {
    let d_max = x_range.start.max(1e-10).sqrt().recip();
    let d_min = x_range.end.max(1e-10).sqrt().recip();
    let ticks: &[f64] = if d_min > 1.2 {
        &LOW_RESOLUTION_TICKS
    } else {
        &HIGH_RESOLUTION_TICKS
    };
    ticks
        .iter()
        .filter(|&&d| d_min <= d && d <= d_max)
        .map(|d| (d * d).recip())
        .collect()
}

/// Resolution [Å] tick label of a 1/d^2 value
fn resolution_label(x: f64) -> String {
    if x > 0f64 {
        format!("{:.1}", x.sqrt().recip())
    } else {
        String::new()
    }
}

/// Wilson plot figure
#[derive(Debug, Clone)]
pub struct PlotSpec {
    path: PathBuf,
    x_label: String,
    y_label: String,
    size: (u32, u32),
    point_size: u32,
    connect: bool,
    resolution_axis: bool,
}
impl PlotSpec {
    /// Creates the figure that will be written to `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            x_label: String::from("1/d² (Å⁻²)"),
            y_label: String::from("ln⟨I⟩"),
            size: (1200, 900),
            point_size: 5,
            connect: true,
            resolution_axis: true,
        }
    }
    pub fn x_label<S: Into<String>>(self, x_label: S) -> Self {
        Self {
            x_label: x_label.into(),
            ..self
        }
    }
    pub fn y_label<S: Into<String>>(self, y_label: S) -> Self {
        Self {
            y_label: y_label.into(),
            ..self
        }
    }
    /// Image width and height in pixels
    pub fn size(self, width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            ..self
        }
    }
    /// Radius of the point markers in pixels
    pub fn point_size(self, point_size: u32) -> Self {
        Self { point_size, ..self }
    }
    /// Draws a line through the points
    pub fn connect(self, connect: bool) -> Self {
        Self { connect, ..self }
    }
    /// Adds the shell resolution [Å] axis at the top of the figure
    pub fn resolution_axis(self, resolution_axis: bool) -> Self {
        Self {
            resolution_axis,
            ..self
        }
    }
    pub fn path(&self) -> &Path {
        &self.path
    }
    /// Renders the Wilson plot and writes it to the figure path
    pub fn render(&self, points: &[WilsonPoint]) -> Result<()> {
        if points.is_empty() {
            return Err(PlotError::EmptyDataset);
        }
        let format = Format::from_path(&self.path)?;
        let (width, height) = self.size;
        let bytes = match format {
            Format::Svg => {
                let mut svg = String::new();
                {
                    let root = SVGBackend::with_string(&mut svg, self.size).into_drawing_area();
                    self.draw(root, points)
                        .map_err(|e| PlotError::Draw(e.to_string()))?;
                }
                svg.into_bytes()
            }
            Format::Raster(format) => {
                let mut buffer = vec![0u8; width as usize * height as usize * 3];
                {
                    let root =
                        BitMapBackend::with_buffer(&mut buffer, self.size).into_drawing_area();
                    self.draw(root, points)
                        .map_err(|e| PlotError::Draw(e.to_string()))?;
                }
                let image = RgbImage::from_raw(width, height, buffer)
                    .ok_or_else(|| PlotError::Draw("pixel buffer size mismatch".to_string()))?;
                let mut bytes = Cursor::new(Vec::new());
                image.write_to(&mut bytes, format)?;
                bytes.into_inner()
            }
        };
        fs::write(&self.path, bytes).map_err(|source| PlotError::Write {
            path: self.path.clone(),
            source,
        })?;
        log::info!("Wilson plot saved to {:?}", self.path);
        Ok(())
    }
    fn draw<DB: DrawingBackend>(
        &self,
        root: DrawingArea<DB, Shift>,
        points: &[WilsonPoint],
    ) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        root.fill(&WHITE)?;

        let x_range = padded_range(points.iter().map(|p| p.x));
        let y_range = padded_range(points.iter().map(|p| p.y));
        let mut chart = ChartBuilder::on(&root)
            .set_label_area_size(LabelAreaPosition::Left, 70)
            .set_label_area_size(LabelAreaPosition::Bottom, 60)
            .set_label_area_size(
                LabelAreaPosition::Top,
                if self.resolution_axis { 60 } else { 0 },
            )
            .margin(20)
            .build_cartesian_2d(x_range.clone(), y_range.clone())?
            .set_secondary_coord(
                x_range.clone().with_key_points(resolution_ticks(&x_range)),
                y_range,
            );
        chart
            .configure_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .axis_desc_style(("sans-serif", 22))
            .label_style(("sans-serif", 16))
            .draw()?;
        if self.resolution_axis {
            chart
                .configure_secondary_axes()
                .x_desc("Resolution (Å)")
                .x_label_formatter(&|x: &f64| resolution_label(*x))
                .axis_desc_style(("sans-serif", 22))
                .label_style(("sans-serif", 16))
                .draw()?;
        }

        let color = colorous::TABLEAU10[0];
        let rgb = RGBColor(color.r, color.g, color.b);
        if self.connect {
            chart.draw_series(LineSeries::new(points.iter().map(|p| (p.x, p.y)), &rgb))?;
        }
        chart.draw_series(
            points
                .iter()
                .map(|p| Circle::new((p.x, p.y), self.point_size, rgb.filled())),
        )?;

        root.present()?;
        Ok(())
    }
}
