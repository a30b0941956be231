use chrono::NaiveDate;
use plotters::prelude::*;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::error::{ProcessingError, Result};
use crate::models::{EnergyCategory, WideTable};
use crate::settings::ChartConfig;
use crate::writers::StagedOutput;

/// First colours of matplotlib's tab20 map, one per category.
const CATEGORY_COLORS: [RGBColor; EnergyCategory::COUNT] = [
    RGBColor(31, 119, 180),
    RGBColor(174, 199, 232),
    RGBColor(255, 127, 14),
    RGBColor(255, 187, 120),
    RGBColor(44, 160, 44),
    RGBColor(152, 223, 138),
];

pub const TOTAL_PRODUCTION_CHART: &str = "total_production.svg";
pub const TOTAL_EMISSIONS_CHART: &str = "total_emissions.svg";
pub const PRODUCTION_BY_TYPE_CHART: &str = "production_by_type.svg";
pub const EMISSIONS_BY_TYPE_CHART: &str = "emissions_by_type.svg";

#[derive(Debug, Clone)]
pub struct RenderedChart {
    pub file_name: &'static str,
    pub svg: String,
}

type Series = Vec<(NaiveDate, f64)>;

pub struct ChartRenderer {
    config: ChartConfig,
}

impl ChartRenderer {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }

    /// Render the four charts in memory, in a fixed order.
    pub fn render_all(&self, table: &WideTable) -> Result<Vec<RenderedChart>> {
        let Some(x_range) = date_range(table)? else {
            warn!("no rows to chart");
            return Ok(Vec::new());
        };

        let total_production: Series = table
            .records
            .iter()
            .filter_map(|r| r.total_production.map(|v| (r.date, v)))
            .collect();
        let total_emissions: Series = table
            .records
            .iter()
            .map(|r| (r.date, r.total_emissions))
            .collect();

        let production_by_type: Vec<(String, Series)> = EnergyCategory::ALL
            .iter()
            .map(|c| {
                let series = table
                    .records
                    .iter()
                    .map(|r| (r.date, r.production.get(*c)))
                    .collect();
                (c.production_header().to_string(), series)
            })
            .collect();
        let emissions_by_type: Vec<(String, Series)> = EnergyCategory::ALL
            .iter()
            .map(|c| {
                let series = table
                    .records
                    .iter()
                    .map(|r| (r.date, r.emissions.get(*c)))
                    .collect();
                (c.emissions_header(), series)
            })
            .collect();

        Ok(vec![
            RenderedChart {
                file_name: TOTAL_PRODUCTION_CHART,
                svg: self.render_line(
                    "Total Energy Production (TWh) Over Time",
                    "Total Production (TWh)",
                    x_range.clone(),
                    &total_production,
                    BLUE,
                )?,
            },
            RenderedChart {
                file_name: TOTAL_EMISSIONS_CHART,
                svg: self.render_line(
                    "Total CO₂ Emissions (Mt CO₂) Over Time",
                    "Total CO₂ Emissions (Mt CO₂)",
                    x_range.clone(),
                    &total_emissions,
                    RED,
                )?,
            },
            RenderedChart {
                file_name: PRODUCTION_BY_TYPE_CHART,
                svg: self.render_stacked(
                    "Energy Production by Type Over Time",
                    "Production (TWh)",
                    x_range.clone(),
                    &production_by_type,
                )?,
            },
            RenderedChart {
                file_name: EMISSIONS_BY_TYPE_CHART,
                svg: self.render_stacked(
                    "CO₂ Emissions by Energy Type Over Time",
                    "CO₂ Emissions (Mt CO₂)",
                    x_range,
                    &emissions_by_type,
                )?,
            },
        ])
    }

    /// Stage rendered charts under the configured directory and return
    /// their destination paths.
    pub fn stage_all(
        &self,
        charts: &[RenderedChart],
        staged: &mut StagedOutput,
    ) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::with_capacity(charts.len());
        for chart in charts {
            let path = self.config.output_dir.join(chart.file_name);
            staged.stage(&path, chart.svg.as_bytes())?;
            paths.push(path);
        }

        if !paths.is_empty() {
            debug!(
                directory = %self.config.output_dir.display(),
                charts = paths.len(),
                "staged charts"
            );
        }
        Ok(paths)
    }

    fn render_line(
        &self,
        title: &str,
        y_label: &str,
        x_range: std::ops::Range<NaiveDate>,
        series: &[(NaiveDate, f64)],
        color: RGBColor,
    ) -> Result<String> {
        let (y_min, y_max) = value_bounds(series.iter().map(|(_, v)| *v));
        let mut svg = String::new();
        {
            let size = (self.config.width, self.config.height);
            let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
            root.fill(&WHITE).map_err(chart_error)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(title, (self.config.font_family.as_str(), self.config.caption_size))
                .margin(20)
                .x_label_area_size(40)
                .y_label_area_size(70)
                .build_cartesian_2d(x_range, y_min..y_max)
                .map_err(chart_error)?;

            chart
                .configure_mesh()
                .x_desc("Date")
                .y_desc(y_label)
                .x_label_formatter(&|date: &NaiveDate| date.format("%Y-%m").to_string())
                .draw()
                .map_err(chart_error)?;

            chart
                .draw_series(LineSeries::new(series.iter().copied(), color.stroke_width(2)))
                .map_err(chart_error)?;

            root.present().map_err(chart_error)?;
        }
        Ok(svg)
    }

    fn render_stacked(
        &self,
        title: &str,
        y_label: &str,
        x_range: std::ops::Range<NaiveDate>,
        layers: &[(String, Series)],
    ) -> Result<String> {
        let stacked = stack_layers(layers);
        let (y_min, y_max) = value_bounds(
            stacked
                .iter()
                .flat_map(|(_, series)| series.iter().map(|(_, v)| *v)),
        );

        let mut svg = String::new();
        {
            let size = (self.config.width, self.config.height);
            let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
            root.fill(&WHITE).map_err(chart_error)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(title, (self.config.font_family.as_str(), self.config.caption_size))
                .margin(20)
                .x_label_area_size(40)
                .y_label_area_size(70)
                .build_cartesian_2d(x_range, y_min..y_max)
                .map_err(chart_error)?;

            chart
                .configure_mesh()
                .x_desc("Date")
                .y_desc(y_label)
                .x_label_formatter(&|date: &NaiveDate| date.format("%Y-%m").to_string())
                .draw()
                .map_err(chart_error)?;

            // Top layer first so every lower layer is painted over it.
            for (index, (label, series)) in stacked.iter().enumerate().rev() {
                let color = CATEGORY_COLORS[index % CATEGORY_COLORS.len()];
                let alpha = self.config.area_alpha;
                chart
                    .draw_series(
                        AreaSeries::new(series.iter().copied(), 0.0, color.mix(alpha).filled())
                            .border_style(color.stroke_width(1)),
                    )
                    .map_err(chart_error)?
                    .label(label.as_str())
                    .legend(move |(x, y)| {
                        Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.mix(alpha).filled())
                    });
            }

            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font((self.config.font_family.as_str(), 14))
                .draw()
                .map_err(chart_error)?;

            root.present().map_err(chart_error)?;
        }
        Ok(svg)
    }
}

fn chart_error<E: std::fmt::Display>(error: E) -> ProcessingError {
    ProcessingError::Chart(error.to_string())
}

/// Cumulative sums layer over layer, each point keeping its date.
fn stack_layers(layers: &[(String, Series)]) -> Vec<(String, Series)> {
    let mut running: Vec<f64> = Vec::new();
    layers
        .iter()
        .map(|(label, series)| {
            running.resize(series.len(), 0.0);
            let cumulative = series
                .iter()
                .zip(running.iter_mut())
                .map(|((date, value), acc)| {
                    *acc += value;
                    (*date, *acc)
                })
                .collect();
            (label.clone(), cumulative)
        })
        .collect()
}

/// Y bounds with a little headroom, never an empty range.
fn value_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }

    let lower = min.min(0.0);
    let upper = if max > lower { max * 1.05 } else { lower + 1.0 };
    (lower, upper.max(lower + f64::EPSILON))
}

/// Date axis covering the table; a single date gets a one day wide axis.
fn date_range(table: &WideTable) -> Result<Option<std::ops::Range<NaiveDate>>> {
    let Some((first, last)) = table.date_range() else {
        return Ok(None);
    };

    let end = if last > first {
        last
    } else {
        first
            .succ_opt()
            .ok_or_else(|| ProcessingError::Chart(format!("no date after {}", first)))?
    };
    Ok(Some(first..end))
}
