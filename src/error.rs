use thiserror::Error;

/// Error kinds raised while turning result tables into a figure.
///
/// `MissingColumn`, `LengthMismatch`, `EmptyInput` and `InvalidConfig` abort a
/// render. `UnresolvedLayoutKey` is only returned by position lookups; the
/// renderer logs it and skips the label.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlotError {
    #[error("result table is missing a phase column (label={label}, column={column})")]
    MissingColumn { label: String, column: String },
    #[error("labels and tables differ in length (labels={labels}, tables={tables})")]
    LengthMismatch { labels: usize, tables: usize },
    #[error("no labels to plot")]
    EmptyInput,
    #[error("no layout position for label (label={label})")]
    UnresolvedLayoutKey { label: String },
    #[error("invalid chart configuration: {0}")]
    InvalidConfig(String),
}

impl PlotError {
    /// Whether the renderer must stop on this error or may skip the label.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, PlotError::UnresolvedLayoutKey { .. })
    }
}
