//! Error taxonomy for the stats input boundary and the table adapter.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    /// The supplied statistics source does not have the expected shape.
    /// Raised at the input boundary; a failed load leaves prior state intact.
    #[error("invalid stats input: {0}")]
    InvalidInput(String),

    /// A sort or query referenced a column outside the declared schema.
    #[error("invalid column index: {0}")]
    InvalidColumn(usize),
}
