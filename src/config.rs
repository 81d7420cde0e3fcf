use std::path::{Path, PathBuf};

use clap::{Args, CommandFactory, FromArgMatches, Parser};
use serde::{Deserialize, Serialize};
use serfig::collectors::{from_file, from_self};
use serfig::parsers::Toml;
use tracing::debug;

use crate::draw::OutputFormat;
use crate::error::{PlotError, Result};
use crate::Program;

pub const DEFAULT_WIDTH_IN: f64 = 12.0;
pub const DEFAULT_HEIGHT_IN: f64 = 8.0;
pub const DEFAULT_DPI: u32 = 300;
pub const DEFAULT_FONT: &str = "Sans";

#[derive(Debug, Clone, Parser)]
#[command(version)]
pub struct Config {
    /// CSV file to plot
    #[arg(value_name = "CSV_FILE")]
    pub csv_file: PathBuf,

    /// Output file for saving the plot (PNG, PDF, SVG)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// TOML file with chart style settings; command-line style flags take precedence
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Log diagnostics to stderr
    #[arg(short, long)]
    pub verbose: bool,

    #[command(flatten)]
    pub style: ChartStyle,
}

/// Figure settings that can come from a config file or the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Args)]
#[serde(default)]
pub struct ChartStyle {
    /// Figure width in inches
    #[arg(long, value_name = "INCHES", default_value_t = DEFAULT_WIDTH_IN)]
    pub width: f64,

    /// Figure height in inches
    #[arg(long, value_name = "INCHES", default_value_t = DEFAULT_HEIGHT_IN)]
    pub height: f64,

    /// Resolution of raster output in dots per inch
    #[arg(long, default_value_t = DEFAULT_DPI)]
    pub dpi: u32,

    /// Font family for all chart text
    #[arg(long, value_name = "FAMILY", default_value = DEFAULT_FONT)]
    pub font: String,

    /// Chart title, replacing the built-in one
    #[arg(long)]
    pub title: Option<String>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH_IN,
            height: DEFAULT_HEIGHT_IN,
            dpi: DEFAULT_DPI,
            font: DEFAULT_FONT.to_string(),
            title: None,
        }
    }
}

impl ChartStyle {
    fn validate(&self) -> Result<()> {
        if !(self.width > 0.0) || !(self.height > 0.0) {
            return Err(PlotError::Config(format!(
                "figure size must be positive, got {}x{} inches",
                self.width, self.height
            )));
        }
        if self.dpi == 0 {
            return Err(PlotError::Config("dpi must be positive".to_string()));
        }
        Ok(())
    }
}

impl Config {
    /// Parses the process arguments under the given program's name and help text.
    /// Exits through clap on usage errors.
    pub fn parse_for(program: Program) -> Self {
        let matches = Self::command()
            .name(program.name())
            .about(program.about())
            .after_help(program.examples())
            .get_matches();
        Self::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
    }

    /// Checks everything that can be checked before the CSV is read.
    pub fn validate(&self) -> Result<()> {
        if !self.csv_file.exists() {
            return Err(PlotError::FileNotFound(self.csv_file.clone()));
        }
        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(PlotError::FileNotFound(config_file.clone()));
            }
        }
        if let Some(output) = &self.output {
            let parent = output_parent(output);
            if !parent.is_dir() {
                return Err(PlotError::OutputDirectoryMissing(parent.to_path_buf()));
            }
            OutputFormat::from_path(output)?;
        }
        Ok(())
    }

    /// Layers the config file (if any) under the command-line style values.
    pub fn load_style(&self) -> Result<ChartStyle> {
        let mut builder: serfig::Builder<ChartStyle> = serfig::Builder::default();

        if let Some(config_file) = &self.config_file {
            let path = config_file.to_str().ok_or_else(|| {
                PlotError::Config(format!(
                    "config file path is not valid UTF-8: {}",
                    config_file.display()
                ))
            })?;
            builder = builder.collect(from_file(Toml, path));
        }
        builder = builder.collect(from_self(self.style.clone()));

        let style = builder
            .build()
            .map_err(|err| PlotError::Config(err.to_string()))?;
        style.validate()?;
        debug!("Chart style: {:?}", style);
        Ok(style)
    }
}

/// Directory an output file will be written into; a bare file name means the
/// current directory.
fn output_parent(output: &Path) -> &Path {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
