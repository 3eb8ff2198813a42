use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error("utf8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    #[error("missing required attribute: {0}")]
    MissingAttr(&'static str),

    #[error("invalid number for {field}: {value:?}")]
    InvalidNumber { field: String, value: String },

    #[error("unexpected structure: {0}")]
    Structure(String),

    #[error("{} doesn't exist or is empty", .0.display())]
    MissingInput(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ConvertResult<T> = Result<T, ConvertError>;

/// Coarse classification of a [`ConvertError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input does not have the shape of a graph document.
    Structure,
    /// A numeric attribute could not be parsed.
    Value,
    /// Reading or writing a file failed.
    Io,
}

impl ConvertError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::InvalidNumber { .. } => ErrorKind::Value,
            ConvertError::Io(_) | ConvertError::MissingInput(_) => ErrorKind::Io,
            ConvertError::Json(err) if err.is_io() => ErrorKind::Io,
            ConvertError::Xml(quick_xml::Error::Io(_)) => ErrorKind::Io,
            ConvertError::Xml(_)
            | ConvertError::Attr(_)
            | ConvertError::Utf8(_)
            | ConvertError::Encoding(_)
            | ConvertError::MissingAttr(_)
            | ConvertError::Structure(_)
            | ConvertError::Json(_) => ErrorKind::Structure,
        }
    }
}
