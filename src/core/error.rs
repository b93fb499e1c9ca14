use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReceiptVecError {
    #[error("Conversion error: {0}")]
    Conversion(#[from] ConversionError),

    #[error("Parse rejected: {0}")]
    Parse(#[from] ParseRejection),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Guard violations raised by the embedding normalizer.
///
/// Each variant names the guard that tripped so operators can tell an
/// oversized payload from a NaN that crept in upstream.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Embedding is empty")]
    EmptyInput,

    #[error("Suspicious embedding size: {actual} dimensions exceeds corruption limit of {limit}")]
    SuspiciousSize { actual: usize, limit: usize },

    #[error("Embedding contains non-finite value at index {index}")]
    NonFiniteInput { index: usize },

    #[error("Converted embedding has {actual} dimensions, expected {expected}")]
    PostConversionLengthMismatch { expected: usize, actual: usize },

    /// Also raised when the L2 magnitude overflows; `index` is then the largest component
    #[error("Conversion produced non-finite value at index {index}")]
    NonFiniteAfterConversion { index: usize },
}

impl ConversionError {
    /// Short stable name for the guard, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            ConversionError::EmptyInput => "empty_or_not_array",
            ConversionError::SuspiciousSize { .. } => "suspicious_size",
            ConversionError::NonFiniteInput { .. } => "non_finite_input",
            ConversionError::PostConversionLengthMismatch { .. } => {
                "post_conversion_length_mismatch"
            }
            ConversionError::NonFiniteAfterConversion { .. } => "non_finite_after_conversion",
        }
    }
}

/// Why the parser refused a raw vector.
///
/// This is an ordinary return value, not a failure of the parser itself.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseRejection {
    #[error("No vector data")]
    Absent,

    #[error("Unsupported vector shape: {shape}")]
    UnsupportedShape { shape: &'static str },

    #[error("Element {index} is not a number: {token:?}")]
    UnparseableElement { index: usize, token: String },

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Element {index} is not finite")]
    NonFinite { index: usize },
}

impl ParseRejection {
    pub fn kind(&self) -> &'static str {
        match self {
            ParseRejection::Absent => "absent",
            ParseRejection::UnsupportedShape { .. } => "unsupported_shape",
            ParseRejection::UnparseableElement { .. } => "unparseable_element",
            ParseRejection::DimensionMismatch { .. } => "dimension_mismatch",
            ParseRejection::NonFinite { .. } => "non_finite",
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid configuration value: {field} = {value}")]
    InvalidValue { field: String, value: String },
}
