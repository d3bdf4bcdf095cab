//! Bar charts of number frequencies, rendered headless to PNG with
//! [`plotters`]' bitmap backend.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::{collections::BTreeMap, path::Path};
use thiserror::Error;
use tracing::info;

use crate::tally::{SectionTally, TopN};

const CHART_SIZE: (u32, u32) = (1200, 720);
const BAR_SPAN: f64 = 0.8;

const SECTION_COLORS: [RGBColor; 6] = [
    RGBColor(102, 194, 165),
    RGBColor(252, 141, 98),
    RGBColor(141, 160, 203),
    RGBColor(231, 138, 195),
    RGBColor(166, 216, 84),
    RGBColor(255, 217, 47),
];

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to create output directory: {0}")]
    OutputDir(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

fn viridis_like(i: usize, n: usize) -> RGBColor {
    // dark purple → teal → yellow
    let t = if n <= 1 { 0.0 } else { i as f64 / (n - 1) as f64 };
    let lerp = |a: f64, b: f64, t: f64| (a + (b - a) * t).round() as u8;
    if t < 0.5 {
        let u = t * 2.0;
        RGBColor(lerp(68.0, 33.0, u), lerp(1.0, 145.0, u), lerp(84.0, 140.0, u))
    } else {
        let u = (t - 0.5) * 2.0;
        RGBColor(lerp(33.0, 253.0, u), lerp(145.0, 231.0, u), lerp(140.0, 37.0, u))
    }
}

/// Label for the category at x = `x`, or empty between categories.
fn category_label(x: f64, labels: &[String]) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Descending bar chart of a top-N view with each count printed above its
/// bar.
pub fn render_top_recurring(view: &TopN, title: &str, output_path: &Path) -> Result<()> {
    if view.is_empty() {
        return Err(PlotError::InvalidData("no numbers to plot".to_string()));
    }
    ensure_parent(output_path)?;

    let mut bars: Vec<(u32, u64)> = view.pairs();
    bars.sort_by(|a, b| b.1.cmp(&a.1));
    let labels: Vec<String> = bars.iter().map(|(n, _)| n.to_string()).collect();
    let y_max = bars.iter().map(|(_, c)| *c).max().unwrap_or(0) as f64 * 1.15 + 1.0;

    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 32))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..(bars.len() as f64 - 0.5), 0f64..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .x_label_formatter(&|x| category_label(*x, &labels))
        .y_label_formatter(&|y| format!("{:.0}", y))
        .x_desc("Winning Numbers")
        .y_desc("Frequency of Occurrence")
        .label_style(("sans-serif", 18))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let n = bars.len();
    chart
        .draw_series(bars.iter().enumerate().map(|(i, (_, count))| {
            let x = i as f64;
            Rectangle::new(
                [(x - BAR_SPAN / 2.0, 0.0), (x + BAR_SPAN / 2.0, *count as f64)],
                viridis_like(i, n).filled(),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    let label_style = TextStyle::from(("sans-serif", 16).into_font())
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart
        .draw_series(bars.iter().enumerate().map(|(i, (_, count))| {
            Text::new(
                count.to_string(),
                (i as f64, *count as f64 + y_max * 0.01),
                label_style.clone(),
            )
        }))
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    info!(path = %output_path.display(), bars = n, "wrote chart");
    Ok(())
}

/// Grouped bar chart: one group per number (in first-appearance order across
/// sections), one coloured bar per section that has that number in its top.
pub fn render_sections(tallies: &BTreeMap<usize, SectionTally>, output_path: &Path) -> Result<()> {
    let mut numbers: Vec<u32> = Vec::new();
    for tally in tallies.values() {
        for e in tally.top.iter() {
            if !numbers.contains(&e.number) {
                numbers.push(e.number);
            }
        }
    }
    if numbers.is_empty() {
        return Err(PlotError::InvalidData(
            "no section has any numbers to plot".to_string(),
        ));
    }
    ensure_parent(output_path)?;

    let labels: Vec<String> = numbers.iter().map(u32::to_string).collect();
    let y_max = tallies
        .values()
        .flat_map(|t| t.top.iter().map(|e| e.count))
        .max()
        .unwrap_or(0) as f64
        * 1.15
        + 1.0;
    let groups = tallies.len();
    let bar_width = BAR_SPAN / groups as f64;

    let root = BitMapBackend::new(output_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Top Recurring Winning Numbers by Section", ("sans-serif", 32))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(-0.5f64..(numbers.len() as f64 - 0.5), 0f64..y_max)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(numbers.len())
        .x_label_formatter(&|x| category_label(*x, &labels))
        .y_label_formatter(&|y| format!("{:.0}", y))
        .x_desc("Winning Numbers")
        .y_desc("Frequency of Occurrence")
        .label_style(("sans-serif", 18))
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    for (g, tally) in tallies.values().enumerate() {
        let color = SECTION_COLORS[g % SECTION_COLORS.len()];
        let offset = -BAR_SPAN / 2.0 + g as f64 * bar_width;
        let bars: Vec<(f64, f64)> = tally
            .top
            .iter()
            .filter_map(|e| {
                numbers
                    .iter()
                    .position(|&n| n == e.number)
                    .map(|i| (i as f64 + offset, e.count as f64))
            })
            .collect();

        chart
            .draw_series(
                bars.into_iter()
                    .map(move |(x, h)| Rectangle::new([(x, 0.0), (x + bar_width, h)], color.filled())),
            )
            .map_err(|e| PlotError::Drawing(e.to_string()))?
            .label(format!("Section {}", tally.section))
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 14, y + 6)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;
    info!(path = %output_path.display(), sections = groups, "wrote chart");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{load::DrawHistory, tally::tests::synthetic_draws};
    use tempfile::tempdir;

    #[test]
    fn category_labels_only_on_integers() {
        let labels = vec!["12".to_string(), "7".to_string()];
        assert_eq!(category_label(0.0, &labels), "12");
        assert_eq!(category_label(1.0, &labels), "7");
        assert_eq!(category_label(0.5, &labels), "");
        assert_eq!(category_label(2.0, &labels), "");
        assert_eq!(category_label(-1.0, &labels), "");
    }

    #[test]
    fn palette_spans_endpoints() {
        assert_eq!(viridis_like(0, 5), RGBColor(68, 1, 84));
        assert_eq!(viridis_like(4, 5), RGBColor(253, 231, 37));
        assert_eq!(viridis_like(0, 1), RGBColor(68, 1, 84));
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let dir = tempdir().unwrap();
        let err = render_top_recurring(&TopN::default(), "t", &dir.path().join("a.png"))
            .unwrap_err();
        assert!(matches!(err, PlotError::InvalidData(_)));

        let err = render_sections(&BTreeMap::new(), &dir.path().join("b.png")).unwrap_err();
        assert!(matches!(err, PlotError::InvalidData(_)));
    }

    #[test]
    #[ignore = "needs a system sans-serif font"]
    fn renders_pngs() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let history = DrawHistory::from_draws("synthetic.csv", synthetic_draws());

        let top = dir.path().join("charts/top.png");
        render_top_recurring(&history.top_recurring(10), "Top Recurring Winning Numbers", &top)?;
        assert!(top.metadata()?.len() > 0);

        let grouped = dir.path().join("charts/sections.png");
        render_sections(&history.top_by_sections(&[1, 2, 3, 4, 5, 6], 5), &grouped)?;
        assert!(grouped.metadata()?.len() > 0);
        Ok(())
    }
}
