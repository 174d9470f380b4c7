use thiserror::Error;

/// A source handed back a record the core cannot assign a safe default to.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("record has a blank query symbol")]
    BlankSymbol,

    #[error("{symbol}: period label {period:?} appears more than once")]
    DuplicatePeriod { symbol: String, period: String },

    #[error("{symbol}: value keyed by undeclared period {period:?}")]
    UnknownPeriod { symbol: String, period: String },
}

#[derive(Error, Debug)]
pub enum FetchError {
    /// Network / HTTP failure; the symbol degrades to an empty record.
    #[error("transport error: {0:#}")]
    Transport(anyhow::Error),

    /// Contract violation; aborts the run.
    #[error(transparent)]
    Malformed(#[from] RecordError),
}
