//! Error types for name-card deck generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating a name-card deck.
///
/// Every error is fatal: the pipeline makes a single pass and never
/// recovers partially. Either the full presentation is written or
/// nothing is.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read the input file.
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed delimited input, as judged by the CSV parser.
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// ZIP packaging error (the PPTX container).
    #[error("ZIP error: {0}")]
    Zip(String),

    /// XML generation error (slide markup).
    #[error("XML error: {0}")]
    Xml(String),
}
