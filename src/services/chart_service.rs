use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use plotters::prelude::*;
use plotters::style::RGBColor;
use tracing::debug;

use crate::error::BotError;
use crate::models::{ComponentSeries, IndexReading, SentimentBand, SeriesPoint};

/// Default trailing window for all charts.
pub const DEFAULT_WINDOW_DAYS: i64 = 365;

const TREND_WIDTH: u32 = 1200;
const TREND_HEIGHT: u32 = 600;
const GRID_WIDTH: u32 = 1400;
const GRID_HEIGHT: u32 = 1600;
const GRID_ROWS: usize = 4;
const GRID_COLS: usize = 2;

const INDEX_LINE_COLOR: RGBColor = RGBColor(31, 119, 180);

static CHART_SEQ: AtomicU64 = AtomicU64::new(0);

fn band_fill_color(band: SentimentBand) -> RGBColor {
    match band {
        SentimentBand::ExtremeFear => RGBColor(214, 39, 40),
        SentimentBand::Fear => RGBColor(255, 127, 14),
        SentimentBand::Neutral => RGBColor(188, 189, 34),
        SentimentBand::Greed => RGBColor(44, 160, 44),
        SentimentBand::ExtremeGreed => RGBColor(23, 190, 207),
    }
}

fn temp_chart_path() -> std::path::PathBuf {
    let seq = CHART_SEQ.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!(
        "feargreed_chart_{}_{}_{}.png",
        std::process::id(),
        Utc::now().timestamp_millis(),
        seq
    ))
}

/// Render the aggregate index over the trailing window as PNG bytes.
///
/// The chart fixes the y-axis to [0, 100], shades the five sentiment
/// zones, marks the zone thresholds with dashed lines and annotates the
/// current value at the end of the line.
pub fn render_trend(
    history: &[SeriesPoint],
    current: &IndexReading,
    window_days: i64,
) -> Result<Vec<u8>, BotError> {
    let cutoff = Utc::now() - chrono::Duration::days(window_days);
    let points: Vec<SeriesPoint> = history
        .iter()
        .filter(|p| p.timestamp >= cutoff)
        .copied()
        .collect();

    if points.len() < 2 {
        return Err(BotError::Render(format!(
            "not enough points to draw the index trend (minimum 2, got {})",
            points.len()
        )));
    }

    let x_min = points[0].timestamp;
    let x_max = points[points.len() - 1].timestamp;

    let temp_file = temp_chart_path();
    {
        let root = BitMapBackend::new(&temp_file, (TREND_WIDTH, TREND_HEIGHT)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| BotError::Render(format!("failed to fill canvas: {}", e)))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("CNN Fear & Greed Index (last {} days)", window_days),
                ("sans-serif", 36.0).into_font(),
            )
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(x_min..x_max, 0.0..100.0)
            .map_err(|e| BotError::Render(format!("failed to build chart: {}", e)))?;

        chart
            .configure_mesh()
            .y_desc("Index value")
            .x_desc("Date")
            .x_label_formatter(&|ts| ts.format("%Y-%m-%d").to_string())
            .draw()
            .map_err(|e| BotError::Render(format!("failed to draw mesh: {}", e)))?;

        // Shaded sentiment zones behind the series
        for band in SentimentBand::ALL {
            let (low, high) = band.bounds();
            chart
                .draw_series(std::iter::once(Rectangle::new(
                    [(x_min, low), (x_max, high)],
                    band_fill_color(band).mix(0.25).filled(),
                )))
                .map_err(|e| BotError::Render(format!("failed to draw band: {}", e)))?
                .label(format!("{} ({:.0}-{:.0})", band.label(), low, high))
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], band_fill_color(band).filled())
                });
        }

        // Dashed threshold lines at the zone boundaries
        for threshold in [25.0, 45.0, 55.0, 75.0] {
            chart
                .draw_series(DashedLineSeries::new(
                    vec![(x_min, threshold), (x_max, threshold)],
                    6,
                    4,
                    BLACK.mix(0.35).stroke_width(1),
                ))
                .map_err(|e| BotError::Render(format!("failed to draw threshold: {}", e)))?;
        }

        chart
            .draw_series(LineSeries::new(
                points.iter().map(|p| (p.timestamp, p.value)),
                INDEX_LINE_COLOR.stroke_width(2),
            ))
            .map_err(|e| BotError::Render(format!("failed to draw series: {}", e)))?
            .label("Fear & Greed Index")
            .legend(|(x, y)| {
                PathElement::new(vec![(x, y), (x + 15, y)], INDEX_LINE_COLOR.stroke_width(2))
            });

        // Current value marker and annotation at the end of the line
        let last = points[points.len() - 1];
        chart
            .draw_series(std::iter::once(Circle::new(
                (last.timestamp, last.value),
                4,
                INDEX_LINE_COLOR.filled(),
            )))
            .map_err(|e| BotError::Render(format!("failed to draw marker: {}", e)))?;
        chart
            .draw_series(std::iter::once(Text::new(
                format!("{:.1}", current.score),
                (last.timestamp, (last.value + 4.0).min(96.0)),
                ("sans-serif", 20.0).into_font().color(&BLACK),
            )))
            .map_err(|e| BotError::Render(format!("failed to draw annotation: {}", e)))?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK.mix(0.4))
            .draw()
            .map_err(|e| BotError::Render(format!("failed to draw legend: {}", e)))?;

        root.present()
            .map_err(|e| BotError::Render(format!("failed to render chart: {}", e)))?;
    }

    read_and_remove(&temp_file)
}

/// Render one subplot per component in a fixed 4x2 grid as PNG bytes.
pub fn render_components(series_set: &[ComponentSeries]) -> Result<Vec<u8>, BotError> {
    if series_set.is_empty() {
        return Err(BotError::Render("no component series to draw".to_string()));
    }
    for series in series_set {
        if series.points.len() < 2 {
            return Err(BotError::Render(format!(
                "component '{}' has too few points (minimum 2, got {})",
                series.component.title(),
                series.points.len()
            )));
        }
    }

    let temp_file = temp_chart_path();
    {
        let root = BitMapBackend::new(&temp_file, (GRID_WIDTH, GRID_HEIGHT)).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| BotError::Render(format!("failed to fill canvas: {}", e)))?;

        let cells = root.split_evenly((GRID_ROWS, GRID_COLS));
        for (series, cell) in series_set.iter().zip(cells.iter()) {
            draw_component_cell(cell, series)?;
        }

        root.present()
            .map_err(|e| BotError::Render(format!("failed to render chart: {}", e)))?;
    }

    read_and_remove(&temp_file)
}

fn draw_component_cell(
    cell: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    series: &ComponentSeries,
) -> Result<(), BotError> {
    let points = &series.points;
    let x_min = points[0].timestamp;
    let x_max = points[points.len() - 1].timestamp;

    let min_value = points.iter().map(|p| p.value).fold(f64::INFINITY, f64::min);
    let max_value = points.iter().map(|p| p.value).fold(f64::NEG_INFINITY, f64::max);
    // Pad the value range; avoid a zero-height axis for flat series
    let range = (max_value - min_value).max(1e-8);
    let padding = range * 0.1;
    let y_min = min_value - padding;
    let y_max = max_value + padding;

    let color = series.component.color();
    let caption = format!(
        "{} ({:.1}, {})",
        series.component.title(),
        series.score,
        crate::models::humanize_rating(&series.rating)
    );

    let mut chart = ChartBuilder::on(cell)
        .caption(caption, ("sans-serif", 18.0).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(45)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| BotError::Render(format!("failed to build subplot: {}", e)))?;

    chart
        .configure_mesh()
        .x_labels(4)
        .y_labels(5)
        .x_label_formatter(&|ts| ts.format("%Y-%m-%d").to_string())
        .draw()
        .map_err(|e| BotError::Render(format!("failed to draw subplot mesh: {}", e)))?;

    chart
        .draw_series(LineSeries::new(
            points.iter().map(|p| (p.timestamp, p.value)),
            color.stroke_width(2),
        ))
        .map_err(|e| BotError::Render(format!("failed to draw subplot series: {}", e)))?;

    let last = points[points.len() - 1];
    chart
        .draw_series(std::iter::once(Circle::new(
            (last.timestamp, last.value),
            3,
            color.filled(),
        )))
        .map_err(|e| BotError::Render(format!("failed to draw subplot marker: {}", e)))?;

    Ok(())
}

fn read_and_remove(path: &std::path::Path) -> Result<Vec<u8>, BotError> {
    let image_data = std::fs::read(path)
        .map_err(|e| BotError::Render(format!("failed to read chart file: {}", e)))?;
    // Best-effort cleanup; charts are never durable state
    let _ = std::fs::remove_file(path);
    debug!("Rendered chart of {} bytes", image_data.len());
    Ok(image_data)
}
