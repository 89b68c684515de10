use sheetview_core::ViewError;
use thiserror::Error;

/// Errors that can occur while serializing sheet data
#[derive(Error, Debug)]
pub enum SheetError {
    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SheetError> for ViewError {
    fn from(err: SheetError) -> Self {
        ViewError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SheetError>;
