use thiserror::Error;

/// Schema violations found while loading a launch table.
///
/// Any of these is fatal at startup: the dashboard never opens on a table it
/// could not fully read.
#[derive(Debug, Error, PartialEq)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: null value in required column '{column}'")]
    NullValue { row: usize, column: &'static str },

    #[error("row {row}: '{value}' is not a valid payload mass")]
    InvalidPayload { row: usize, value: String },

    #[error("row {row}: class must be 0 or 1, got '{value}'")]
    InvalidClass { row: usize, value: String },

    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedColumnType {
        column: &'static str,
        data_type: String,
    },

    #[error("dataset contains no launch records")]
    EmptyDataset,
}
