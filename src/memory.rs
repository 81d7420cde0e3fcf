//! Live wire count over gate number, as exported by the memory simulation.

use std::fmt;

use serde::Deserialize;
use tracing::info;

use crate::config::{ChartStyle, Config};
use crate::draw::draw_memory;
use crate::error::{PlotError, Result};
use crate::format::thousands;
use crate::table::load_table;

pub const REQUIRED_COLUMNS: [&str; 2] = ["gate_number", "live_wire_count"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MemorySample {
    pub gate_number: u64,
    pub live_wire_count: u64,
}

/// The sample holding the highest live wire count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Peak {
    /// Row position in the input file
    pub index: usize,
    pub gate_number: u64,
    pub live_wire_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySummary {
    pub data_points: usize,
    pub gate_min: u64,
    pub gate_max: u64,
    pub wires_min: u64,
    pub wires_max: u64,
    pub peak: Peak,
}

impl MemorySummary {
    /// Min/max of both columns and the peak row. Ties on the peak go to the
    /// earliest row. Returns `None` for an empty series.
    pub fn compute(samples: &[MemorySample]) -> Option<Self> {
        let first = samples.first()?;
        let mut summary = MemorySummary {
            data_points: samples.len(),
            gate_min: first.gate_number,
            gate_max: first.gate_number,
            wires_min: first.live_wire_count,
            wires_max: first.live_wire_count,
            peak: Peak {
                index: 0,
                gate_number: first.gate_number,
                live_wire_count: first.live_wire_count,
            },
        };

        for (index, sample) in samples.iter().enumerate().skip(1) {
            summary.gate_min = summary.gate_min.min(sample.gate_number);
            summary.gate_max = summary.gate_max.max(sample.gate_number);
            summary.wires_min = summary.wires_min.min(sample.live_wire_count);
            if sample.live_wire_count > summary.wires_max {
                summary.wires_max = sample.live_wire_count;
                summary.peak = Peak {
                    index,
                    gate_number: sample.gate_number,
                    live_wire_count: sample.live_wire_count,
                };
            }
        }
        Some(summary)
    }
}

impl fmt::Display for MemorySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Data points: {}", thousands(self.data_points as u64))?;
        writeln!(
            f,
            "Gate range: {} - {}",
            thousands(self.gate_min),
            thousands(self.gate_max)
        )?;
        writeln!(
            f,
            "Live wire range: {} - {}",
            thousands(self.wires_min),
            thousands(self.wires_max)
        )?;
        write!(
            f,
            "Peak memory: {} live wires @ gate {}",
            thousands(self.peak.live_wire_count),
            thousands(self.peak.gate_number)
        )
    }
}

/// Text of the peak annotation on the chart.
pub fn peak_label(peak: &Peak) -> String {
    format!(
        "Peak: {} wires\n@ gate {}",
        thousands(peak.live_wire_count),
        thousands(peak.gate_number)
    )
}

/// Loads, summarizes and plots a memory simulation CSV.
pub fn run(config: &Config, style: &ChartStyle) -> Result<()> {
    let samples: Vec<MemorySample> = load_table(&config.csv_file, &REQUIRED_COLUMNS)?;
    let summary = MemorySummary::compute(&samples)
        .ok_or_else(|| PlotError::EmptyInput(config.csv_file.clone()))?;
    println!("{summary}");
    info!(
        "Peak at row {} (gate {}, {} wires)",
        summary.peak.index, summary.peak.gate_number, summary.peak.live_wire_count
    );

    draw_memory(&samples, &summary, style, config.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(rows: &[(u64, u64)]) -> Vec<MemorySample> {
        rows.iter()
            .map(|&(gate_number, live_wire_count)| MemorySample {
                gate_number,
                live_wire_count,
            })
            .collect()
    }

    #[test]
    fn summary_of_small_series() {
        let summary = MemorySummary::compute(&samples(&[(0, 5), (1, 12), (2, 3)])).unwrap();
        assert_eq!(summary.data_points, 3);
        assert_eq!((summary.gate_min, summary.gate_max), (0, 2));
        assert_eq!((summary.wires_min, summary.wires_max), (3, 12));
        assert_eq!(
            summary.peak,
            Peak {
                index: 1,
                gate_number: 1,
                live_wire_count: 12
            }
        );
    }

    #[test]
    fn peak_ties_go_to_first_row() {
        let summary = MemorySummary::compute(&samples(&[(10, 7), (20, 9), (30, 9)])).unwrap();
        assert_eq!(summary.peak.gate_number, 20);
        assert_eq!(summary.peak.index, 1);

        let reordered = MemorySummary::compute(&samples(&[(30, 9), (10, 7), (20, 9)])).unwrap();
        assert_eq!(reordered.peak.gate_number, 30);
        assert_eq!(reordered.peak.index, 0);
    }

    #[test]
    fn unordered_gates_still_give_extrema() {
        let summary = MemorySummary::compute(&samples(&[(5, 1), (2, 4), (9, 0)])).unwrap();
        assert_eq!((summary.gate_min, summary.gate_max), (2, 9));
        assert_eq!((summary.wires_min, summary.wires_max), (0, 4));
    }

    #[test]
    fn empty_series_has_no_summary() {
        assert_eq!(MemorySummary::compute(&[]), None);
    }

    #[test]
    fn report_uses_thousands_separators() {
        let summary =
            MemorySummary::compute(&samples(&[(10_000, 1_250), (20_000, 11_800)])).unwrap();
        let report = summary.to_string();
        assert!(report.contains("Gate range: 10,000 - 20,000"));
        assert!(report.contains("Live wire range: 1,250 - 11,800"));
        assert!(report.contains("Peak memory: 11,800 live wires @ gate 20,000"));
    }

    #[test]
    fn peak_label_has_two_lines() {
        let label = peak_label(&Peak {
            index: 3,
            gate_number: 1_500_000,
            live_wire_count: 42_000,
        });
        assert_eq!(label, "Peak: 42,000 wires\n@ gate 1,500,000");
    }
}
