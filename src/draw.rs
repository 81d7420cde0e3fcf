use std::path::Path;

use gnuplot::{
    AlignType::{AlignCenter, AlignLeft, AlignRight},
    ArrowheadType::Open,
    AutoOption::Fix,
    AxesCommon,
    Coordinate::{Axis, Graph},
    DashType, Figure,
    LabelOption::{self, Font, Rotate, TextAlign, TextColor, TextOffset},
    PlotOption::{ArrowSize, ArrowType, BorderColor, Color, FillAlpha, LineStyle, LineWidth},
    Tick,
};
use tracing::debug;

use crate::axis::{count_ticks, headroom, padded_range};
use crate::config::ChartStyle;
use crate::error::{PlotError, Result};
use crate::format::{human_count, thousands};
use crate::memory::{peak_label, MemorySample, MemorySummary, Peak};
use crate::usage::{UsageRow, UsageSummary};

const LINE_COLOR: &str = "#2E86AB";
const FILL_COLOR: &str = "#A23B72";
const BAR_COLORS: [&str; 6] = ["#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7", "#DDA0DD"];
const BAR_WIDTH: f64 = 0.6;

const MEMORY_TITLE: &str = "Memory Usage During Garbled Circuit Processing";
const USAGE_TITLE: &str = "Wire Usage Count Distribution - Bucketed";

/// Vector formats are sized at this many pixels (or points) per inch.
const VECTOR_PPI: f64 = 72.0;

/// File formats a chart can be saved as, picked from the output extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Svg,
    Pdf,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("png") => Ok(OutputFormat::Png),
            Some("svg") => Ok(OutputFormat::Svg),
            Some("pdf") => Ok(OutputFormat::Pdf),
            _ => Err(PlotError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    /// Font size multiplier so text keeps its physical size at high resolution.
    fn font_scale(self, dpi: u32) -> f64 {
        match self {
            OutputFormat::Png => dpi as f64 / VECTOR_PPI,
            OutputFormat::Svg | OutputFormat::Pdf => 1.0,
        }
    }
}

/// Where the peak annotation text sits relative to the peak.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Right,
    Left,
}

/// Anchor of the peak annotation: a tenth of the x span beside the peak and a
/// little below it, flipped to the left when the text would leave the plot.
pub fn annotation_anchor(peak: &Peak, x_lo: f64, x_hi: f64) -> (f64, f64, Side) {
    let span = x_hi - x_lo;
    let x = peak.gate_number as f64;
    let y = peak.live_wire_count as f64 * 0.9;
    // Rough width reserved for the label text.
    let text_room = span * 0.25;
    if x + span * 0.1 + text_room <= x_hi {
        (x + span * 0.1, y, Side::Right)
    } else {
        (x - span * 0.1, y, Side::Left)
    }
}

/// Label drawn above one bar: human-scaled count and share of all wires.
pub fn bar_label(wires: u64, percent: f64) -> String {
    format!("{}\n({:.1}%)", human_count(wires), percent)
}

/// Text of the top-right box naming the largest usage counts.
pub fn outlier_text(outliers: &[UsageRow]) -> String {
    let mut text = String::from("Extreme outliers:");
    for row in outliers {
        text.push_str(&format!(
            "\n{} uses: {} wires",
            thousands(row.usage_count),
            row.wire_count
        ));
    }
    text
}

struct Fonts<'a> {
    family: &'a str,
    scale: f64,
}

impl<'a> Fonts<'a> {
    fn new(style: &'a ChartStyle, format: Option<OutputFormat>) -> Self {
        Self {
            family: style.font.as_str(),
            scale: format.map_or(1.0, |format| format.font_scale(style.dpi)),
        }
    }

    fn sized(&self, points: f64) -> LabelOption<&'a str> {
        Font(self.family, points * self.scale)
    }
}

/// Line chart of live wires per gate with the area below filled and the peak marked.
pub fn draw_memory(
    samples: &[MemorySample],
    summary: &MemorySummary,
    style: &ChartStyle,
    output: Option<&Path>,
) -> Result<()> {
    let format = output.map(OutputFormat::from_path).transpose()?;
    let fonts = Fonts::new(style, format);

    let xs: Vec<f64> = samples.iter().map(|s| s.gate_number as f64).collect();
    let ys: Vec<f64> = samples.iter().map(|s| s.live_wire_count as f64).collect();
    let (x_lo, x_hi) = padded_range(summary.gate_min, summary.gate_max);
    let y_hi = headroom(summary.wires_max, 1.1);

    let peak = &summary.peak;
    let (text_x, text_y, side) = annotation_anchor(peak, x_lo, x_hi);
    let align = match side {
        Side::Right => AlignLeft,
        Side::Left => AlignRight,
    };
    let title = style.title.as_deref().unwrap_or(MEMORY_TITLE);

    let mut fg = Figure::new();
    fg.axes2d()
        .set_title(title, &[fonts.sized(14.0)])
        .set_x_label("Gate Number", &[fonts.sized(12.0)])
        .set_y_label("Live Wire Count", &[fonts.sized(12.0)])
        .set_x_range(Fix(x_lo), Fix(x_hi))
        .set_y_range(Fix(0.0), Fix(y_hi))
        .set_x_ticks_custom::<f64, String, _, _>(count_ticks(x_lo, x_hi), &[], &[fonts.sized(10.0)])
        .set_y_ticks_custom::<f64, String, _, _>(count_ticks(0.0, y_hi), &[], &[fonts.sized(10.0)])
        .set_x_grid(true)
        .set_y_grid(true)
        .set_grid_options(false, &[Color("gray"), LineStyle(DashType::Dot)])
        .fill_between(
            xs.iter().copied(),
            xs.iter().map(|_| 0.0),
            ys.iter().copied(),
            &[Color(FILL_COLOR), FillAlpha(0.3)],
        )
        .lines(
            xs.iter().copied(),
            ys.iter().copied(),
            &[Color(LINE_COLOR), LineWidth(1.5)],
        )
        .arrow(
            Axis(text_x),
            Axis(text_y),
            Axis(peak.gate_number as f64),
            Axis(peak.live_wire_count as f64),
            &[ArrowType(Open), ArrowSize(0.02), Color("red")],
        )
        .label(
            &peak_label(peak),
            Axis(text_x),
            Axis(text_y),
            &[TextAlign(align), TextColor("black"), fonts.sized(10.0)],
        );

    debug!("Rendering {} samples", samples.len());
    finish(&mut fg, style, output.zip(format))
}

/// Bar chart of wires per usage bucket, annotated with counts, percentages and outliers.
pub fn draw_usage(summary: &UsageSummary, style: &ChartStyle, output: Option<&Path>) -> Result<()> {
    let format = output.map(OutputFormat::from_path).transpose()?;
    let fonts = Fonts::new(style, format);

    let tallest = summary.buckets.iter().map(|b| b.wires).max().unwrap_or(0);
    let y_hi = headroom(tallest, 1.15);
    let x_ticks: Vec<Tick<f64, String>> = summary
        .buckets
        .iter()
        .enumerate()
        .map(|(i, total)| Tick::Major(i as f64, Fix(total.bucket.label().to_string())))
        .collect();
    let title = style.title.as_deref().unwrap_or(USAGE_TITLE);

    let mut fg = Figure::new();
    let axes = fg.axes2d();
    axes.set_title(title, &[fonts.sized(14.0)])
        .set_x_label("Usage Count Bucket", &[fonts.sized(12.0)])
        .set_y_label("Number of Wires", &[fonts.sized(12.0)])
        .set_x_range(Fix(-0.5), Fix(summary.buckets.len() as f64 - 0.5))
        .set_y_range(Fix(0.0), Fix(y_hi))
        .set_x_ticks_custom::<f64, String, _, _>(
            x_ticks,
            &[],
            &[Rotate(45.0), TextAlign(AlignRight), fonts.sized(10.0)],
        )
        .set_y_ticks_custom::<f64, String, _, _>(count_ticks(0.0, y_hi), &[], &[fonts.sized(10.0)])
        .set_y_grid(true)
        .set_grid_options(false, &[Color("gray"), LineStyle(DashType::Dot)]);

    for (i, total) in summary.buckets.iter().enumerate() {
        let x = i as f64;
        let height = total.wires as f64;
        axes.boxes_set_width(
            [x],
            [height],
            [BAR_WIDTH],
            &[
                Color(BAR_COLORS[i % BAR_COLORS.len()]),
                BorderColor(BAR_COLORS[i % BAR_COLORS.len()]),
                FillAlpha(0.8),
            ],
        );
        axes.label(
            &bar_label(total.wires, summary.percentage(total)),
            Axis(x),
            Axis(height + height * 0.01),
            &[TextAlign(AlignCenter), TextOffset(0.0, 1.5), fonts.sized(9.0)],
        );
    }

    axes.label(
        &outlier_text(&summary.outliers),
        Graph(0.98),
        Graph(0.95),
        &[TextAlign(AlignRight), fonts.sized(9.0)],
    );

    debug!("Rendering {} buckets", summary.buckets.len());
    finish(&mut fg, style, output.zip(format))
}

fn render_error(err: impl std::fmt::Display) -> PlotError {
    PlotError::Unclassified(format!("failed to run gnuplot: {err}"))
}

/// Shows the figure in a window, or writes it to `target` sized by the style.
fn finish(
    fg: &mut Figure,
    style: &ChartStyle,
    target: Option<(&Path, OutputFormat)>,
) -> Result<()> {
    let Some((path, format)) = target else {
        fg.show().map_err(render_error)?;
        return Ok(());
    };

    match format {
        OutputFormat::Png => {
            let dpi = style.dpi as f64;
            let width = (style.width * dpi).round() as u32;
            let height = (style.height * dpi).round() as u32;
            fg.save_to_png(path, width, height)
        }
        OutputFormat::Svg => {
            let width = (style.width * VECTOR_PPI).round() as u32;
            let height = (style.height * VECTOR_PPI).round() as u32;
            fg.save_to_svg(path, width, height)
        }
        OutputFormat::Pdf => fg.save_to_pdf(path, style.width as f32, style.height as f32),
    }
    .map_err(render_error)?;
    // Wait for gnuplot so the file is complete before reporting success.
    fg.close();

    println!("Plot saved to: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn format_follows_extension_case_insensitively() {
        assert_eq!(OutputFormat::from_path(Path::new("a.png")).unwrap(), OutputFormat::Png);
        assert_eq!(OutputFormat::from_path(Path::new("out/A.SVG")).unwrap(), OutputFormat::Svg);
        assert_eq!(OutputFormat::from_path(Path::new("plot.pdf")).unwrap(), OutputFormat::Pdf);
    }

    #[test]
    fn unknown_or_missing_extension_is_rejected() {
        for name in ["plot.jpg", "plot", "plot."] {
            match OutputFormat::from_path(Path::new(name)) {
                Err(PlotError::UnsupportedFormat(path)) => assert_eq!(path, PathBuf::from(name)),
                other => panic!("{name}: unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn raster_fonts_scale_with_dpi() {
        assert_eq!(OutputFormat::Png.font_scale(144), 2.0);
        assert_eq!(OutputFormat::Pdf.font_scale(300), 1.0);
    }

    #[test]
    fn annotation_sits_right_of_early_peak() {
        let peak = Peak {
            index: 1,
            gate_number: 100,
            live_wire_count: 50,
        };
        let (x, y, side) = annotation_anchor(&peak, 0.0, 1_000.0);
        assert_eq!(side, Side::Right);
        assert_eq!(x, 200.0);
        assert_eq!(y, 45.0);
    }

    #[test]
    fn annotation_flips_left_near_right_edge() {
        let peak = Peak {
            index: 9,
            gate_number: 950,
            live_wire_count: 10,
        };
        let (x, _, side) = annotation_anchor(&peak, 0.0, 1_000.0);
        assert_eq!(side, Side::Left);
        assert_eq!(x, 850.0);
    }

    #[test]
    fn bar_labels_combine_count_and_share() {
        assert_eq!(bar_label(1_500, 73.52), "1.5K\n(73.5%)");
        assert_eq!(bar_label(4, 1.96), "4\n(2.0%)");
    }

    #[test]
    fn outlier_box_lists_rows_in_order() {
        let text = outlier_text(&[
            UsageRow {
                usage_count: 12_000,
                wire_count: 1,
            },
            UsageRow {
                usage_count: 300,
                wire_count: 4,
            },
        ]);
        assert_eq!(
            text,
            "Extreme outliers:\n12,000 uses: 1 wires\n300 uses: 4 wires"
        );
    }
}
