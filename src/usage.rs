//! Wire usage histogram: how many wires were referenced how many times.

use std::fmt;

use serde::Deserialize;
use tracing::{debug, info};

use crate::config::{ChartStyle, Config};
use crate::draw::draw_usage;
use crate::error::{PlotError, Result};
use crate::format::{percentage, thousands};
use crate::table::load_table;

pub const REQUIRED_COLUMNS: [&str; 2] = ["usage_count", "wire_count"];

/// Number of rows listed in the outlier box.
pub const OUTLIER_ROWS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct UsageRow {
    pub usage_count: u64,
    pub wire_count: u64,
}

/// Fixed usage-count ranges, declared in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    Unused,
    UsedOnce,
    Few,
    Tens,
    Hundreds,
    Saturated,
}

impl Bucket {
    pub const ALL: [Bucket; 6] = [
        Bucket::Unused,
        Bucket::UsedOnce,
        Bucket::Few,
        Bucket::Tens,
        Bucket::Hundreds,
        Bucket::Saturated,
    ];

    pub fn of(usage_count: u64) -> Bucket {
        match usage_count {
            0 => Bucket::Unused,
            1 => Bucket::UsedOnce,
            2..=10 => Bucket::Few,
            11..=100 => Bucket::Tens,
            101..=254 => Bucket::Hundreds,
            _ => Bucket::Saturated,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Bucket::Unused => "0 (unused)",
            Bucket::UsedOnce => "1 (used once)",
            Bucket::Few => "2-10",
            Bucket::Tens => "11-100",
            Bucket::Hundreds => "101-254",
            Bucket::Saturated => "255+",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketTotal {
    pub bucket: Bucket,
    pub wires: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageSummary {
    pub data_points: usize,
    /// Sum of `wire_count` over all rows, before bucketing
    pub total_wires: u64,
    pub max_usage: u64,
    /// Row with the largest `wire_count`; first such row on ties
    pub most_common: UsageRow,
    /// One entry per bucket that has at least one row, in bucket order
    pub buckets: Vec<BucketTotal>,
    /// Rows with the largest usage counts, largest first
    pub outliers: Vec<UsageRow>,
}

fn add_wires(sum: u64, wires: u64) -> Result<u64> {
    sum.checked_add(wires)
        .ok_or_else(|| PlotError::Unclassified("wire count total overflows".to_string()))
}

/// Sums `wire_count` per bucket. Buckets without rows are left out rather
/// than reported as zero.
pub fn bucketize(rows: &[UsageRow]) -> Result<Vec<BucketTotal>> {
    let mut sums = [0u64; Bucket::ALL.len()];
    let mut seen = [false; Bucket::ALL.len()];
    for row in rows {
        let i = Bucket::of(row.usage_count).index();
        sums[i] = add_wires(sums[i], row.wire_count)?;
        seen[i] = true;
    }
    Ok(Bucket::ALL
        .iter()
        .filter(|bucket| seen[bucket.index()])
        .map(|&bucket| BucketTotal {
            bucket,
            wires: sums[bucket.index()],
        })
        .collect())
}

/// The `n` rows with the largest usage counts. Equal usage counts keep file order.
pub fn top_usage(rows: &[UsageRow], n: usize) -> Vec<UsageRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));
    sorted.truncate(n);
    sorted
}

impl UsageSummary {
    /// Returns `Ok(None)` for an empty table. Fails when the wire counts do
    /// not fit in a `u64` total.
    pub fn compute(rows: &[UsageRow]) -> Result<Option<Self>> {
        let Some(&first) = rows.first() else {
            return Ok(None);
        };
        let mut most_common = first;
        for row in &rows[1..] {
            if row.wire_count > most_common.wire_count {
                most_common = *row;
            }
        }

        let total_wires = rows
            .iter()
            .try_fold(0, |sum, row| add_wires(sum, row.wire_count))?;

        Ok(Some(UsageSummary {
            data_points: rows.len(),
            total_wires,
            max_usage: rows.iter().map(|row| row.usage_count).max().unwrap_or(0),
            most_common,
            buckets: bucketize(rows)?,
            outliers: top_usage(rows, OUTLIER_ROWS),
        }))
    }

    /// Share of all wires falling in `bucket`, measured against the
    /// un-bucketed total.
    pub fn percentage(&self, bucket: &BucketTotal) -> f64 {
        percentage(bucket.wires, self.total_wires)
    }
}

impl fmt::Display for UsageSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Data points: {} different usage counts", self.data_points)?;
        writeln!(f, "Total wires: {}", thousands(self.total_wires))?;
        writeln!(f, "Usage count range: 0 - {}", self.max_usage)?;
        writeln!(
            f,
            "Most common usage: {} ({} wires)",
            self.most_common.usage_count,
            thousands(self.most_common.wire_count)
        )?;
        write!(f, "\nBucketed distribution:")?;
        for total in &self.buckets {
            write!(
                f,
                "\n  {}: {} wires ({:.1}%)",
                total.bucket,
                thousands(total.wires),
                self.percentage(total)
            )?;
        }
        Ok(())
    }
}

/// Loads, buckets and plots a wire usage distribution CSV.
pub fn run(config: &Config, style: &ChartStyle) -> Result<()> {
    let rows: Vec<UsageRow> = load_table(&config.csv_file, &REQUIRED_COLUMNS)?;
    let summary = UsageSummary::compute(&rows)?
        .ok_or_else(|| PlotError::EmptyInput(config.csv_file.clone()))?;
    println!("{summary}");
    info!(
        "{} of {} buckets observed",
        summary.buckets.len(),
        Bucket::ALL.len()
    );
    debug!("Outliers: {:?}", summary.outliers);

    draw_usage(&summary, style, config.output.as_deref())
}
