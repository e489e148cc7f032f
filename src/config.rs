use crate::{
    error::PlotError,
    format,
    layout::{LayoutMode, Positions},
    markup::DisplayNames,
    phase::{Palette, Phase},
};
use anyhow::{Context, Result};
use clap::ValueEnum;
use log::{debug, error};
use serde::Deserialize;
use std::{collections::BTreeMap, fmt, ops::Range, path::Path, str::FromStr};

/// Y axis scale of a chart.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AxisScale {
    #[default]
    Linear,
    Log,
    /// Two stacked panels showing disjoint y ranges. `hspace` is the gap
    /// between the panels as a fraction of the average panel height.
    Broken {
        lower: (f64, f64),
        upper: (f64, f64),
        #[serde(default = "default_hspace")]
        hspace: f64,
    },
}

fn default_hspace() -> f64 {
    0.4
}

impl AxisScale {
    /// Map a data value (seconds) to the chart's y coordinate. Log charts plot
    /// `log10(v)` on a linear axis, so non-positive values are clamped to
    /// `floor`.
    pub fn to_axis(&self, value: f64, floor: f64) -> f64 {
        match self {
            AxisScale::Log => value.max(floor).log10(),
            _ => value,
        }
    }

    /// Tick label for a data value.
    pub fn format_value(&self, value: f64) -> String {
        match self {
            AxisScale::Log => format::human(value),
            _ => format::thousands(value),
        }
    }

    /// Tick label for an axis coordinate.
    pub fn format_tick(&self, y: f64) -> String {
        match self {
            AxisScale::Log => {
                // Only label whole decades
                if (y - y.round()).abs() > 1e-6 {
                    return String::new();
                }
                self.format_value(10f64.powi(y.round() as i32))
            }
            _ => self.format_value(y),
        }
    }

    pub fn validate(&self) -> Result<(), PlotError> {
        if let AxisScale::Broken {
            lower,
            upper,
            hspace,
        } = self
        {
            if !(lower.0 < lower.1 && upper.0 < upper.1 && lower.1 <= upper.0) {
                return Err(PlotError::InvalidConfig(format!(
                    "broken axis ranges must be increasing and disjoint (lower={lower:?}, upper={upper:?})"
                )));
            }
            if *hspace < 0.0 {
                return Err(PlotError::InvalidConfig(format!(
                    "broken axis hspace must not be negative (hspace={hspace})"
                )));
            }
        }

        Ok(())
    }

    pub fn ranges(&self) -> Option<(Range<f64>, Range<f64>)> {
        match self {
            AxisScale::Broken { lower, upper, .. } => Some((lower.0..lower.1, upper.0..upper.1)),
            _ => None,
        }
    }
}

impl fmt::Display for AxisScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisScale::Linear => write!(f, "linear"),
            AxisScale::Log => write!(f, "log"),
            AxisScale::Broken { lower, upper, .. } => write!(
                f,
                "broken({}..{}, {}..{})",
                lower.0, lower.1, upper.0, upper.1
            ),
        }
    }
}

/// Physical size of a figure.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FigureSize {
    /// Width given in typographic points of the target column, height in
    /// inches. Narrow figures for multi-column layouts.
    Points { width_pt: f64, height_in: f64 },
    /// Width grows with the number of labels, height in inches.
    PerLabel { width_in: f64, height_in: f64 },
}

impl Default for FigureSize {
    fn default() -> Self {
        FigureSize::Points {
            width_pt: 300.0,
            height_in: 2.15,
        }
    }
}

impl FigureSize {
    /// Two points per inch on a 72.27 pt inch, matching the report layout.
    pub const INCHES_PER_PT: f64 = 1.0 / 72.27 * 2.0;

    /// Figure size in inches for a chart with `num_labels` labels.
    pub fn inches(&self, num_labels: usize) -> (f64, f64) {
        match self {
            FigureSize::Points {
                width_pt,
                height_in,
            } => (width_pt * Self::INCHES_PER_PT * 0.67, height_in / 1.22),
            FigureSize::PerLabel {
                width_in,
                height_in,
            } => (
                (num_labels as f64 * width_in).floor().max(1.0),
                *height_in,
            ),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegendLocation {
    UpperLeft,
    #[default]
    UpperRight,
}

/// Drawing defaults asserted onto every figure a chart renders into.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Style {
    pub size: FigureSize,
    pub dpi: f64,
    pub font_family: String,
    /// Font sizes are in points and scaled by `dpi`.
    pub legend_font_size: f64,
    pub tick_font_size: f64,
    pub y_tick_font_size: f64,
    pub annotation_font_size: f64,
    pub label_font_size: f64,
    /// Render display-name markup (superscripts, daggers) instead of
    /// stripping it.
    pub typeset: bool,
    pub legend: LegendLocation,
}

impl Default for Style {
    fn default() -> Self {
        Style {
            size: FigureSize::default(),
            dpi: 100.0,
            font_family: "serif".to_string(),
            legend_font_size: 8.0,
            tick_font_size: 9.0,
            y_tick_font_size: 8.0,
            annotation_font_size: 7.0,
            label_font_size: 10.0,
            typeset: true,
            legend: LegendLocation::default(),
        }
    }
}

impl Style {
    pub fn size_px(&self, num_labels: usize) -> (u32, u32) {
        let (w, h) = self.size.inches(num_labels);
        ((w * self.dpi).round() as u32, (h * self.dpi).round() as u32)
    }

    pub fn font_px(&self, points: f64) -> f64 {
        (points * self.dpi / 72.0).max(1.0)
    }
}

/// Everything that varies between benchmark reports.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub name: String,
    pub layout_mode: LayoutMode,
    pub scale: AxisScale,
    pub positions: Positions,
    /// Tick text of each group in the grouped layouts, by group index.
    pub group_labels: Vec<String>,
    pub display_names: DisplayNames,
    /// Stacked bottom to top.
    pub phases: Vec<Phase>,
    pub bar_width: f64,
    pub spacer: f64,
    pub flat_bar_width: f64,
    /// Round the linear y axis up to a multiple of this step, plus one step.
    pub y_tick_step: Option<f64>,
    pub y_label: String,
    pub style: Style,
}

impl Default for ChartConfig {
    fn default() -> Self {
        ChartConfig {
            name: "benchmark".to_string(),
            layout_mode: LayoutMode::Flat,
            scale: AxisScale::Linear,
            positions: Positions::default(),
            group_labels: vec![],
            display_names: DisplayNames::new(),
            phases: Palette::Nn.phases(),
            bar_width: 0.002,
            spacer: 0.01,
            flat_bar_width: 0.30,
            y_tick_step: None,
            y_label: "Time [s]".to_string(),
            style: Style::default(),
        }
    }
}

impl ChartConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: ChartConfig =
            serde_yaml::from_str(yaml).context("error parsing chart configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &str) -> Result<Self> {
        let path = shellexpand::tilde(path).to_string();
        debug!("reading chart configuration (path={path})");
        let yaml = std::fs::read_to_string(Path::new(&path)).map_err(|e| {
            let reason = format!("error reading chart configuration (path={path}, error={e:?})");
            error!("{reason}");
            anyhow::anyhow!(reason)
        })?;
        Self::from_yaml(&yaml).with_context(|| format!("invalid chart configuration (path={path})"))
    }

    pub fn validate(&self) -> Result<(), PlotError> {
        if self.phases.is_empty() {
            return Err(PlotError::InvalidConfig(
                "at least one phase is required".to_string(),
            ));
        }
        self.scale.validate()?;

        match (self.layout_mode, &self.scale) {
            (LayoutMode::GroupedBrokenAxis, AxisScale::Broken { .. }) => {}
            (LayoutMode::GroupedBrokenAxis, scale) => {
                return Err(PlotError::InvalidConfig(format!(
                    "grouped-broken-axis layout needs a broken scale (scale={scale:?})"
                )));
            }
            _ => {}
        }
        if self.layout_mode.is_grouped() && self.positions.grouped.is_empty() {
            return Err(PlotError::InvalidConfig(format!(
                "layout mode needs grouped positions (mode={})",
                self.layout_mode
            )));
        }

        Ok(())
    }
}

/// Benchmark reports with a built-in chart configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum Benchmark {
    /// Neural network inference, broken y axis
    Nn,
    /// Cardio risk-score circuit, linear y axis
    Cardio,
    /// Microbenchmark kernels, grouped bars on a log axis
    Kernel,
}

impl fmt::Display for Benchmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Benchmark::Nn => write!(f, "nn"),
            Benchmark::Cardio => write!(f, "cardio"),
            Benchmark::Kernel => write!(f, "kernel"),
        }
    }
}

impl FromStr for Benchmark {
    type Err = ();

    fn from_str(input: &str) -> Result<Benchmark, Self::Err> {
        match input {
            "nn" => Ok(Benchmark::Nn),
            "cardio" => Ok(Benchmark::Cardio),
            "kernel" => Ok(Benchmark::Kernel),
            _ => Err(()),
        }
    }
}

impl Benchmark {
    pub fn iter_variants() -> std::slice::Iter<'static, Benchmark> {
        static VARIANTS: [Benchmark; 3] = [Benchmark::Nn, Benchmark::Cardio, Benchmark::Kernel];
        VARIANTS.iter()
    }

    pub fn config(&self) -> ChartConfig {
        match self {
            Benchmark::Nn => ChartConfig {
                name: self.to_string(),
                layout_mode: LayoutMode::Flat,
                scale: AxisScale::Broken {
                    lower: (0.0, 10.0),
                    upper: (120.0, 140.0),
                    hspace: 0.4,
                },
                positions: Positions {
                    flat: [
                        "SEAL-CKKS-Batched",
                        "SEALion",
                        "nGraph-HE-MLP",
                        "nGraph-HE-Cryptonets",
                        "nGraph-HE-LeNet5",
                        "EVA-MLP",
                    ]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
                    grouped: BTreeMap::new(),
                },
                display_names: DisplayNames::from([
                    ("SEAL-CKKS-Batched", "SEAL-CKKS\n(MLP)"),
                    ("SEALion", "SEALion\n(MLP)"),
                    ("nGraph-HE-MLP", "nGraph-HE\n(MLP)"),
                    ("nGraph-HE-Cryptonets", "nGraph-HE\n(Cryptonets)"),
                    ("nGraph-HE-LeNet5", "nGraph-HE\n(LeNet-5)"),
                    ("EVA-MLP", "EVA\n(MLP, LeNet-5)"),
                ]),
                phases: Palette::Nn.phases(),
                flat_bar_width: 0.30,
                style: Style {
                    size: FigureSize::Points {
                        width_pt: 300.0,
                        height_in: 2.15,
                    },
                    legend: LegendLocation::UpperLeft,
                    ..Style::default()
                },
                ..ChartConfig::default()
            },
            Benchmark::Cardio => ChartConfig {
                name: self.to_string(),
                layout_mode: LayoutMode::Flat,
                scale: AxisScale::Linear,
                display_names: DisplayNames::from([
                    ("Cingulata-UNOPT", "Cingulata\n(unopt.)"),
                    ("SEAL-BFV-Batched", "SEAL-BFV\n(batched)"),
                    ("SEAL-CKKS-Batched", "SEAL-CKKS\n(batched)"),
                    ("Cingulata-MultiStart-OPT-PARAMS", "Multi-Start^{\\dagger}"),
                    ("Cingulata-MultiStart", "Multi-Start"),
                    ("Lobster-OPT-PARAMS", "Lobster^{\\dagger}"),
                ]),
                phases: Palette::Cardio.phases(),
                flat_bar_width: 0.35,
                y_tick_step: Some(10.0),
                y_label: "Time (s)".to_string(),
                style: Style {
                    size: FigureSize::PerLabel {
                        width_in: 0.95,
                        height_in: 6.0,
                    },
                    dpi: 90.0,
                    ..Style::default()
                },
                ..ChartConfig::default()
            },
            Benchmark::Kernel => ChartConfig {
                name: self.to_string(),
                layout_mode: LayoutMode::Grouped,
                scale: AxisScale::Log,
                positions: Positions {
                    flat: vec![],
                    grouped: BTreeMap::from([
                        ("SEAL-BFV".to_string(), (0, 0)),
                        ("E3-SEAL".to_string(), (0, 1)),
                        ("TFHE".to_string(), (1, 0)),
                        ("E3-TFHE".to_string(), (1, 1)),
                        ("Cingulata".to_string(), (2, 0)),
                    ]),
                },
                group_labels: vec![
                    "SEAL\n(Native/E^{3})".to_string(),
                    "TFHE\n(Native/E^{3})".to_string(),
                    "Cingulata".to_string(),
                ],
                phases: Palette::Kernel.phases(),
                bar_width: 0.002,
                spacer: 0.01,
                style: Style {
                    size: FigureSize::Points {
                        width_pt: 252.0,
                        height_in: 2.5,
                    },
                    ..Style::default()
                },
                ..ChartConfig::default()
            },
        }
    }
}
