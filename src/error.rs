//! Error types and handling for strukt

/// Result type alias for strukt operations
pub type Result<T> = std::result::Result<T, StruktError>;

/// Error types for the memory-overlay engine.
///
/// Rejected arguments (`InvalidParameter`, `Bounds`, `OrderMismatch`,
/// `UnknownOrdinal`) surface immediately; a failed member declaration leaves
/// its layout unusable and construction should be aborted. `Unsupported`
/// means the operation is not available for this region or layout
/// configuration, not that the input was wrong.
#[derive(Debug, thiserror::Error)]
pub enum StruktError {
    /// I/O related errors (stream adapters, file-backed regions)
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Invalid parameters or declarations
    #[error("Invalid parameter: {parameter} - {message}")]
    InvalidParameter { parameter: String, message: String },

    /// Bit range outside the layout
    #[error(
        "Bit range out of bounds: offset {bit_offset}, size {bit_size}, layout is {layout_size} bytes"
    )]
    Bounds {
        bit_offset: usize,
        bit_size: usize,
        layout_size: usize,
    },

    /// Region too small for a bulk transfer at the layout's position
    #[error("Insufficient space: requested {requested}, available {available}")]
    InsufficientSpace { requested: usize, available: usize },

    /// Byte order of a region does not match the layout it is bound to
    #[error("Byte order mismatch: layout is {expected:?}, region is {actual:?}")]
    OrderMismatch {
        expected: crate::region::ByteOrder,
        actual: crate::region::ByteOrder,
    },

    /// Stored enumeration value has no declared variant
    #[error("Unknown ordinal: {ordinal} has no variant in a {bit_size}-bit enumeration")]
    UnknownOrdinal { ordinal: u64, bit_size: usize },

    /// Operation not available for this region or layout configuration
    #[error("Unsupported operation: {operation} - {message}")]
    Unsupported { operation: String, message: String },
}

impl StruktError {
    /// Create an I/O error from a standard I/O error
    pub fn from_io(source: std::io::Error, context: &str) -> Self {
        Self::Io {
            message: format!("{}: {}", context, source),
            source: Some(source),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a bounds error
    pub fn bounds(bit_offset: usize, bit_size: usize, layout_size: usize) -> Self {
        Self::Bounds {
            bit_offset,
            bit_size,
            layout_size,
        }
    }

    /// Create an unsupported operation error
    pub fn unsupported(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
            message: message.into(),
        }
    }
}
