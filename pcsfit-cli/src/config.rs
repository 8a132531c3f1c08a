//! TOML job files for the `fit` subcommand.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use pcsfit::{
    ChannelNames, EndCondition, EvaluationGrid, FitOptions, ReduceParams, SplineOptions,
    TailSegment, TrailingKnot,
};

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub source: SourceConfig,
    #[serde(default)]
    pub channels: ChannelConfig,
    #[serde(default)]
    pub fit: FitConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the points to fit come from: archived control-system knots at a
/// given time, or a dense raw curve from a two-column text file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SourceConfig {
    Archive { archive: PathBuf, time: f64 },
    Curve { curve: PathBuf },
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    pub count: String,
    pub knot_x_prefix: String,
    pub knot_y_prefix: String,
    pub channels: usize,
    pub online_profile: String,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        let names = ChannelNames::default();
        ChannelConfig {
            count: names.count,
            knot_x_prefix: names.knot_x_prefix,
            knot_y_prefix: names.knot_y_prefix,
            channels: names.channels,
            online_profile: names.online_profile,
        }
    }
}

impl ChannelConfig {
    pub fn names(&self) -> ChannelNames {
        ChannelNames {
            count: self.count.clone(),
            knot_x_prefix: self.knot_x_prefix.clone(),
            knot_y_prefix: self.knot_y_prefix.clone(),
            channels: self.channels,
            online_profile: self.online_profile.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FitConfig {
    /// Present only when the input should be reduced before fitting.
    pub reduce: Option<ReduceConfig>,
    #[serde(default)]
    pub drop_last: bool,
    #[serde(default)]
    pub grid: GridChoice,
    #[serde(default)]
    pub end_condition: EndChoice,
    #[serde(default)]
    pub tail: TailChoice,
}

#[derive(Debug, Deserialize)]
pub struct ReduceConfig {
    #[serde(default)]
    pub power: f64,
    #[serde(default)]
    pub min_spacing: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GridChoice {
    #[default]
    Linear,
    Step,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndChoice {
    #[default]
    Natural,
    QuadraticTail,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TailChoice {
    #[default]
    Last,
    Penultimate,
}

impl GridChoice {
    pub fn grid(self) -> EvaluationGrid {
        match self {
            GridChoice::Linear => EvaluationGrid::profile(),
            GridChoice::Step => EvaluationGrid::control_system(),
        }
    }
}

impl FitConfig {
    pub fn options(&self) -> FitOptions {
        FitOptions {
            reduce: self.reduce.as_ref().map(|r| ReduceParams {
                power: r.power,
                min_spacing: r.min_spacing,
            }),
            trailing: if self.drop_last {
                TrailingKnot::Drop
            } else {
                TrailingKnot::Keep
            },
            grid: self.grid.grid(),
            spline: SplineOptions {
                end: match self.end_condition {
                    EndChoice::Natural => EndCondition::Natural,
                    EndChoice::QuadraticTail => EndCondition::QuadraticTail,
                },
                tail: match self.tail {
                    TailChoice::Last => TailSegment::Last,
                    TailChoice::Penultimate => TailSegment::Penultimate,
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_csv")]
    pub csv: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig { csv: default_csv() }
    }
}

fn default_csv() -> PathBuf {
    PathBuf::from("profile.csv")
}

pub fn load_config(path: &Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("invalid job file {}", path.display()))
}

pub fn parse_config(content: &str) -> anyhow::Result<JobConfig> {
    let config: JobConfig = toml::from_str(content)?;
    if let Some(r) = &config.fit.reduce {
        ReduceParams {
            power: r.power,
            min_spacing: r.min_spacing,
        }
        .validate()?;
    }
    Ok(config)
}
