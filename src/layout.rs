//! Horizontal placement of bars and ticks.
//!
//! In the flat layout every label owns one integer slot. In the grouped
//! layouts labels are mapped to a `(group, slot)` pair: groups are laid out
//! left to right, each `slots * bar_width` wide and separated by `spacer`,
//! and a group's tick sits in the middle of its slots.

use crate::error::PlotError;
use clap::ValueEnum;
use serde::Deserialize;
use std::{collections::BTreeMap, fmt, ops::Range, str::FromStr};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutMode {
    #[default]
    Flat,
    Grouped,
    GroupedBrokenAxis,
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayoutMode::Flat => write!(f, "flat"),
            LayoutMode::Grouped => write!(f, "grouped"),
            LayoutMode::GroupedBrokenAxis => write!(f, "grouped-broken-axis"),
        }
    }
}

impl FromStr for LayoutMode {
    type Err = ();

    fn from_str(input: &str) -> Result<LayoutMode, Self::Err> {
        match input {
            "flat" => Ok(LayoutMode::Flat),
            "grouped" => Ok(LayoutMode::Grouped),
            "grouped-broken-axis" => Ok(LayoutMode::GroupedBrokenAxis),
            _ => Err(()),
        }
    }
}

impl LayoutMode {
    pub fn is_grouped(&self) -> bool {
        matches!(self, LayoutMode::Grouped | LayoutMode::GroupedBrokenAxis)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Position {
    Flat(usize),
    Grouped { group: usize, slot: usize },
}

/// Label to position tables, keyed by raw label.
///
/// An empty `flat` list means "use the order in which labels are passed to
/// the renderer".
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Positions {
    pub flat: Vec<String>,
    pub grouped: BTreeMap<String, (usize, usize)>,
}

/// Geometry of the grouped layout.
#[derive(Clone, Debug, PartialEq)]
pub struct Groups {
    pub bar_width: f64,
    pub spacer: f64,
    pub starts: Vec<f64>,
    pub widths: Vec<f64>,
}

impl Groups {
    pub fn new(positions: &BTreeMap<String, (usize, usize)>, bar_width: f64, spacer: f64) -> Self {
        let num_groups = positions.values().map(|(g, _)| g + 1).max().unwrap_or(0);
        let mut slots = vec![0usize; num_groups];
        for (group, _) in positions.values() {
            slots[*group] += 1;
        }

        let widths: Vec<f64> = slots.iter().map(|n| *n as f64 * bar_width).collect();
        let mut starts = Vec::with_capacity(num_groups);
        let mut end = 0.0;
        for width in &widths {
            let start = end + spacer;
            starts.push(start);
            end = start + width;
        }

        Groups {
            bar_width,
            spacer,
            starts,
            widths,
        }
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Tick coordinate of every group: the middle of its slots.
    pub fn centers(&self) -> Vec<f64> {
        self.starts
            .iter()
            .zip(&self.widths)
            .map(|(start, width)| start + width / 2.0)
            .collect()
    }

    pub fn bar_center(&self, group: usize, slot: usize) -> f64 {
        self.starts[group] + slot as f64 * self.bar_width + self.bar_width / 2.0
    }

    pub fn x_range(&self) -> Range<f64> {
        let end = match (self.starts.last(), self.widths.last()) {
            (Some(start), Some(width)) => start + width,
            _ => 0.0,
        };
        0.0..end + self.spacer
    }
}

/// What a tick stands for, before display names are applied.
#[derive(Clone, Debug, PartialEq)]
pub enum TickKey {
    Label(String),
    Group(usize),
}

/// Resolves labels to x coordinates for one render.
#[derive(Clone, Debug)]
pub struct Layout {
    mode: LayoutMode,
    order: Vec<String>,
    grouped: BTreeMap<String, (usize, usize)>,
    groups: Groups,
    flat_bar_width: f64,
}

impl Layout {
    pub fn new<S: AsRef<str>>(
        mode: LayoutMode,
        positions: &Positions,
        labels: &[S],
        bar_width: f64,
        spacer: f64,
        flat_bar_width: f64,
    ) -> Result<Self, PlotError> {
        if !(bar_width > 0.0 && flat_bar_width > 0.0 && spacer >= 0.0) {
            return Err(PlotError::InvalidConfig(format!(
                "bar widths must be positive (bar_width={bar_width}, flat_bar_width={flat_bar_width}, spacer={spacer})"
            )));
        }

        let order = if positions.flat.is_empty() {
            labels.iter().map(|l| l.as_ref().to_string()).collect()
        } else {
            positions.flat.clone()
        };

        Ok(Layout {
            mode,
            order,
            grouped: positions.grouped.clone(),
            groups: Groups::new(&positions.grouped, bar_width, spacer),
            flat_bar_width,
        })
    }

    pub fn position(&self, label: &str) -> Result<Position, PlotError> {
        let unresolved = || PlotError::UnresolvedLayoutKey {
            label: label.to_string(),
        };
        if self.mode.is_grouped() {
            self.grouped
                .get(label)
                .map(|(group, slot)| Position::Grouped {
                    group: *group,
                    slot: *slot,
                })
                .ok_or_else(unresolved)
        } else {
            self.order
                .iter()
                .position(|l| l == label)
                .map(Position::Flat)
                .ok_or_else(unresolved)
        }
    }

    pub fn bar_x(&self, position: Position) -> f64 {
        match position {
            Position::Flat(idx) => idx as f64,
            Position::Grouped { group, slot } => self.groups.bar_center(group, slot),
        }
    }

    /// Drawn width of a bar. Grouped bars leave a tenth of their slot empty.
    pub fn bar_width(&self) -> f64 {
        if self.mode.is_grouped() {
            self.groups.bar_width * 0.9
        } else {
            self.flat_bar_width
        }
    }

    pub fn ticks(&self) -> Vec<(f64, TickKey)> {
        if self.mode.is_grouped() {
            self.groups
                .centers()
                .into_iter()
                .enumerate()
                .map(|(g, x)| (x, TickKey::Group(g)))
                .collect()
        } else {
            self.order
                .iter()
                .enumerate()
                .map(|(i, l)| (i as f64, TickKey::Label(l.clone())))
                .collect()
        }
    }

    /// Members of `group`, ordered by slot.
    pub fn group_members(&self, group: usize) -> Vec<&str> {
        let mut members: Vec<(usize, &str)> = self
            .grouped
            .iter()
            .filter(|(_, (g, _))| *g == group)
            .map(|(label, (_, slot))| (*slot, label.as_str()))
            .collect();
        members.sort();
        members.into_iter().map(|(_, label)| label).collect()
    }

    pub fn x_range(&self) -> Range<f64> {
        if self.mode.is_grouped() {
            self.groups.x_range()
        } else {
            -0.5..(self.order.len().max(1) as f64 - 0.5)
        }
    }
}
