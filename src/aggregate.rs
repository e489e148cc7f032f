use crate::{error::PlotError, phase::Phase, table::ResultTable};

pub fn ms_to_sec(ms: f64) -> f64 {
    ms / 1_000.0
}

/// Per-label summary of a result table: the mean duration of every phase in
/// seconds (in phase order) and a single combined error magnitude.
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseDurations {
    pub means: Vec<f64>,
    /// Sum of the per-phase sample standard deviations, in seconds. Used as a
    /// symmetric error bar on top of the stacked bar.
    pub error: f64,
}

impl PhaseDurations {
    /// Aggregate `table` over `phases`. Returns `Ok(None)` for a table with no
    /// rows, which callers treat as "nothing to plot" for this label.
    pub fn from_table(
        label: &str,
        table: &ResultTable,
        phases: &[Phase],
    ) -> Result<Option<PhaseDurations>, PlotError> {
        if table.is_empty() {
            return Ok(None);
        }

        let mut means = Vec::with_capacity(phases.len());
        let mut error = 0.0;
        for phase in phases {
            let missing = || PlotError::MissingColumn {
                label: label.to_string(),
                column: phase.column.clone(),
            };
            let mean = table.mean(&phase.column).ok_or_else(missing)?;
            let std = table.std(&phase.column).ok_or_else(missing)?;

            means.push(ms_to_sec(mean));
            error += if std.is_nan() { 0.0 } else { std };
        }

        Ok(Some(PhaseDurations {
            means,
            error: ms_to_sec(error),
        }))
    }

    /// Bottom of every stacked segment: the sum of all phases below it.
    pub fn offsets(&self) -> Vec<f64> {
        self.means
            .iter()
            .scan(0.0, |acc, d| {
                let bottom = *acc;
                *acc += d;
                Some(bottom)
            })
            .collect()
    }

    pub fn total(&self) -> f64 {
        self.means.iter().sum()
    }
}
