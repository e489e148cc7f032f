use anyhow::{Context, Result};
use csv::ReaderBuilder;
use log::{debug, error};
use std::{
    collections::{BTreeMap, HashMap},
    io,
    path::Path,
};

/// One benchmark result set: named numeric columns, one row per trial.
///
/// Timing columns hold milliseconds. Empty cells are kept as `NaN` and are
/// ignored by the statistics below, so a partially filled run still counts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultTable {
    headers: Vec<String>,
    columns: BTreeMap<String, Vec<f64>>,
    num_rows: usize,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(column, values)` pairs. All columns must have the
    /// same number of rows.
    pub fn from_columns<I, S>(columns: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut table = ResultTable::new();
        for (name, values) in columns {
            let name = name.into();
            if !table.headers.is_empty() && values.len() != table.num_rows {
                anyhow::bail!(
                    "column length mismatch (column={name}, rows={}, expected={})",
                    values.len(),
                    table.num_rows
                );
            }
            table.num_rows = values.len();
            table.headers.push(name.clone());
            table.columns.insert(name, values);
        }

        Ok(table)
    }

    /// Parse a delimited table with a header row from any reader.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()
            .context("error reading table header")?
            .iter()
            .map(|h| h.to_string())
            .collect();

        // Empty cells deserialize to None
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];
        for (row, result) in reader.deserialize::<HashMap<String, Option<f64>>>().enumerate() {
            let record = result.map_err(|e| {
                let reason = format!("error parsing table row (row={row}, error={e})");
                error!("{reason}");
                anyhow::anyhow!(reason)
            })?;
            for (header, column) in headers.iter().zip(columns.iter_mut()) {
                column.push(record.get(header).copied().flatten().unwrap_or(f64::NAN));
            }
        }

        Self::from_columns(headers.into_iter().zip(columns))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        debug!("reading result table (path={})", path.display());
        let file = std::fs::File::open(path)
            .with_context(|| format!("error opening result table (path={})", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("error parsing result table (path={})", path.display()))
    }

    /// Append the rows of `other`. Both tables must share the same columns,
    /// unless `self` is still empty and column-less.
    pub fn append(&mut self, other: ResultTable) -> Result<()> {
        if self.headers.is_empty() {
            *self = other;
            return Ok(());
        }

        let mut ours = self.headers.clone();
        let mut theirs = other.headers.clone();
        ours.sort();
        theirs.sort();
        if ours != theirs {
            anyhow::bail!(
                "cannot append tables with different columns (ours={:?}, theirs={:?})",
                self.headers,
                other.headers
            );
        }

        for (name, values) in other.columns {
            if let Some(column) = self.columns.get_mut(&name) {
                column.extend(values);
            }
        }
        self.num_rows += other.num_rows;

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.num_rows
    }

    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns.get(name).map(|c| c.as_slice())
    }

    /// Arithmetic mean of the non-NaN samples, `None` for unknown columns.
    pub fn mean(&self, name: &str) -> Option<f64> {
        self.column(name).map(mean)
    }

    /// Sample standard deviation (n - 1 denominator), `None` for unknown
    /// columns. Fewer than two samples yield `NaN`.
    pub fn std(&self, name: &str) -> Option<f64> {
        self.column(name).map(std_dev)
    }
}

fn mean(values: &[f64]) -> f64 {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    if count == 0 {
        return f64::NAN;
    }
    sum / count as f64
}

fn std_dev(values: &[f64]) -> f64 {
    let samples: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if samples.len() < 2 {
        return f64::NAN;
    }

    let mean = mean(&samples);
    let var = samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (samples.len() - 1) as f64;
    var.sqrt()
}
