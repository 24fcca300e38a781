use crate::error::RenderError;
use plotters::prelude::*;
use polars::prelude::{DataFrame, DataType, Series};
use std::{
    error::Error,
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

const BAR_SIZE: (u32, u32) = (1200, 600);
const HISTOGRAM_SIZE: (u32, u32) = (1000, 600);

#[derive(Debug, Clone, PartialEq)]
pub enum ChartKind {
    /// Binned density of a numeric column.
    Histogram { column: String, bins: usize },
    /// One bar per row, in row order, labelled by `category`.
    Bar { category: String, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabels {
    pub title: String,
    pub x: String,
    pub y: String,
}

impl AxisLabels {
    pub fn new(title: &str, x: &str, y: &str) -> Self {
        AxisLabels {
            title: title.to_string(),
            x: x.to_string(),
            y: y.to_string(),
        }
    }
}

/// Turns a materialized extract into an image file.
pub trait ChartRenderer: Send + Sync {
    /// Renders `extract` and returns the path of the written artifact.
    fn render(
        &self,
        extract: &DataFrame,
        kind: &ChartKind,
        labels: &AxisLabels,
        file_name: &str,
    ) -> Result<PathBuf, RenderError>;
}

/// PNG renderer writing into a single output directory.
pub struct PlottersRenderer {
    output_dir: PathBuf,
}

impl PlottersRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(
        &self,
        extract: &DataFrame,
        kind: &ChartKind,
        labels: &AxisLabels,
        file_name: &str,
    ) -> Result<PathBuf, RenderError> {
        if extract.height() == 0 {
            return Err(RenderError::EmptyExtract(file_name.to_string()));
        }

        let drawing = |e: Box<dyn Error>| RenderError::Drawing {
            chart: file_name.to_string(),
            message: e.to_string(),
        };

        match kind {
            ChartKind::Bar { category, value } => {
                let bars = bar_points(extract, category, value, file_name)?;
                fs::create_dir_all(&self.output_dir)?;
                let path = self.output_dir.join(file_name);
                draw_bars(&path, labels, &bars).map_err(drawing)?;
                info!("Plot '{}' saved to '{}'", file_name, self.output_dir.display());
                Ok(path)
            }
            ChartKind::Histogram { column, bins } => {
                let values = numeric_values(extract, column, file_name)?;
                let bins = histogram_bins(&values, *bins);
                fs::create_dir_all(&self.output_dir)?;
                let path = self.output_dir.join(file_name);
                draw_histogram(&path, labels, &bins).map_err(drawing)?;
                info!(
                    "Histogram '{}' saved to '{}'",
                    file_name,
                    self.output_dir.display()
                );
                Ok(path)
            }
        }
    }
}

fn column<'a>(
    extract: &'a DataFrame,
    name: &str,
    chart: &str,
) -> Result<&'a Series, RenderError> {
    extract
        .column(name)
        .map(|c| c.as_materialized_series())
        .map_err(|_| RenderError::MissingColumn {
            column: name.to_string(),
            chart: chart.to_string(),
        })
}

fn numeric(series: &Series, chart: &str) -> Result<Vec<Option<f64>>, RenderError> {
    let values = series
        .strict_cast(&DataType::Float64)
        .map_err(|_| RenderError::NonNumeric {
            column: series.name().to_string(),
            chart: chart.to_string(),
            dtype: series.dtype().to_string(),
        })?;
    Ok(values.f64()?.into_iter().collect())
}

/// `(category label, bar height)` for every row. Null heights draw as zero.
pub fn bar_points(
    extract: &DataFrame,
    category: &str,
    value: &str,
    chart: &str,
) -> Result<Vec<(String, f64)>, RenderError> {
    let categories = column(extract, category, chart)?.cast(&DataType::String)?;
    let heights = numeric(column(extract, value, chart)?, chart)?;

    Ok(categories
        .str()?
        .into_iter()
        .zip(heights)
        .map(|(c, v)| (c.unwrap_or("null").to_string(), v.unwrap_or(0.0)))
        .collect())
}

fn numeric_values(
    extract: &DataFrame,
    name: &str,
    chart: &str,
) -> Result<Vec<f64>, RenderError> {
    let values = numeric(column(extract, name, chart)?, chart)?;
    Ok(values.into_iter().flatten().collect())
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
    /// Count normalized so the bin areas sum to one.
    pub density: f64,
}

/// Splits `values` into `bins` equal-width bins spanning their range. The
/// last bin is closed on the right so the maximum is counted.
pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<Bin> {
    let bins = bins.max(1);
    if values.is_empty() {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (start, width, bins) = if max > min {
        (min, (max - min) / bins as f64, bins)
    } else {
        (min - 0.5, 1.0, 1)
    };

    let mut counts = vec![0usize; bins];
    for v in values {
        let idx = (((v - start) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let total = values.len() as f64;
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| Bin {
            start: start + i as f64 * width,
            end: start + (i + 1) as f64 * width,
            count,
            density: count as f64 / (total * width),
        })
        .collect()
}

fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (low, high) = values.fold((0.0f64, 0.0f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if high - low <= f64::EPSILON {
        return (0.0, 1.0);
    }
    (low * 1.1, high * 1.1)
}

fn draw_bars(
    path: &Path,
    labels: &AxisLabels,
    bars: &[(String, f64)],
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, BAR_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (low, high) = value_range(bars.iter().map(|(_, v)| *v));
    let mut chart = ChartBuilder::on(&root)
        .caption(&labels.title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(140)
        .y_label_area_size(80)
        .build_cartesian_2d((0..bars.len()).into_segmented(), low..high)?;

    let category = |x: &SegmentValue<usize>| match x {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => {
            bars.get(*i).map(|(c, _)| c.clone()).unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .x_label_formatter(&category)
        .x_label_style(
            ("sans-serif", 12)
                .into_font()
                .transform(FontTransform::Rotate90),
        )
        .x_desc(labels.x.as_str())
        .y_desc(labels.y.as_str())
        .draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(BLUE.mix(0.7).filled())
            .margin(4)
            .data(bars.iter().enumerate().map(|(i, (_, v))| (i, *v))),
    )?;

    root.present()?;
    Ok(())
}

fn draw_histogram(path: &Path, labels: &AxisLabels, bins: &[Bin]) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, HISTOGRAM_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let x_min = bins.first().map_or(0.0, |b| b.start);
    let x_max = bins.last().map_or(1.0, |b| b.end);
    let (_, y_max) = value_range(bins.iter().map(|b| b.density));
    let mut chart = ChartBuilder::on(&root)
        .caption(&labels.title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .x_desc(labels.x.as_str())
        .y_desc(labels.y.as_str())
        .draw()?;

    chart.draw_series(bins.iter().map(|b| {
        Rectangle::new([(b.start, 0.0), (b.end, b.density)], BLUE.mix(0.7).filled())
    }))?;
    chart.draw_series(
        bins.iter()
            .map(|b| Rectangle::new([(b.start, 0.0), (b.end, b.density)], BLACK.stroke_width(1))),
    )?;

    root.present()?;
    Ok(())
}
