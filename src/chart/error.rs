use thiserror::Error;

/// Errors raised while building a chart from a dataset snapshot.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ChartError {
    /// The dataset cannot be mapped onto bubble radii.
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
}
