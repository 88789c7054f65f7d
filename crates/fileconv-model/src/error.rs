use thiserror::Error;

/// Failure of a single operation on a single file.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The file extension is neither `csv` nor `xlsx`.
    #[error("unsupported format for {file_name}: extension {extension:?}")]
    UnsupportedFormat {
        file_name: String,
        extension: Option<String>,
    },

    /// The content could not be read as a table with a header row.
    #[error("failed to parse {file_name}: {message}")]
    Parse { file_name: String, message: String },

    /// The table holds data the target format cannot represent.
    #[error("cannot write {format}: {message}")]
    Serialization { format: String, message: String },

    /// A selected column does not exist in the table.
    #[error("unknown column: {column}")]
    UnknownColumn { column: String },

    /// A table operation failed inside the data library.
    #[error("table operation failed: {message}")]
    Table { message: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    pub fn parse(file_name: impl Into<String>, message: impl ToString) -> Self {
        Self::Parse {
            file_name: file_name.into(),
            message: message.to_string(),
        }
    }

    pub fn serialization(format: impl Into<String>, message: impl ToString) -> Self {
        Self::Serialization {
            format: format.into(),
            message: message.to_string(),
        }
    }

    pub fn table(message: impl ToString) -> Self {
        Self::Table {
            message: message.to_string(),
        }
    }

    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat { .. } => "UnsupportedFormat",
            Self::Parse { .. } => "ParseError",
            Self::Serialization { .. } => "SerializationError",
            Self::UnknownColumn { .. } => "UnknownColumn",
            Self::Table { .. } => "TableError",
            Self::Io(_) => "IoError",
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
