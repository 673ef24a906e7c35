//! # Low-Level Encoders
//!
//! Capability traits for the byte-level encoders consumed by the column
//! writers, plus the default implementations:
//!
//! - [`plain::PlainEncoder`]: PLAIN encoding for every physical type
//! - [`rle::RleEncoder`]: RLE / bit-packed hybrid, used for definition and
//!   repetition levels in both page formats and for BOOLEAN values in V2
//! - [`rle::RleDecoder`]: the matching decoder
//!
//! Which encoder a column gets is decided by a [`PageProperties`]
//! implementation, selected once per output file.

pub mod plain;
mod properties;
pub mod rle;

use bytes::Bytes;
use parquet::basic::{Encoding, Type as PhysicalType};

pub use properties::{DefaultPageProperties, PageProperties};

/// Errors raised by the low-level encoders and decoders
#[derive(Debug, thiserror::Error)]
pub enum EncodingError {
    /// The encoder was handed a value of another physical type
    #[error("{encoding} encoder for {physical_type} cannot accept {found} values")]
    UnsupportedValue {
        /// Encoding of the encoder
        encoding: Encoding,
        /// Physical type the encoder was built for
        physical_type: PhysicalType,
        /// Physical type of the rejected value
        found: &'static str,
    },

    /// A fixed length value has the wrong length
    #[error("Fixed length value has {found} bytes, column declares {expected}")]
    FixedLengthMismatch {
        /// Declared length
        expected: usize,
        /// Supplied length
        found: usize,
    },

    /// A level exceeds the maximum the encoder was built for
    #[error("Level {level} exceeds maximum level {max_level}")]
    LevelOutOfRange {
        /// Rejected level
        level: u16,
        /// Maximum level
        max_level: u16,
    },

    /// A byte array is too long for a 4-byte length prefix
    #[error("Byte array of {0} bytes exceeds the maximum length")]
    ValueTooLarge(usize),

    /// Encoded input ended early
    #[error("Truncated input: {0}")]
    Truncated(String),
}

/// An opaque value encoder for one column.
///
/// Each `put_*` method corresponds to one physical type; an encoder only
/// accepts the type it was built for. Buffered bytes are handed out by
/// [`ValuesEncoder::flush_buffer`], after which the encoder is ready for the
/// next page.
pub trait ValuesEncoder: Send {
    /// Encoding written into page headers
    fn encoding(&self) -> Encoding;

    /// Physical type this encoder accepts
    fn physical_type(&self) -> PhysicalType;

    /// Encode a BOOLEAN
    fn put_boolean(&mut self, _value: bool) -> Result<(), EncodingError> {
        Err(self.unsupported("BOOLEAN"))
    }

    /// Encode an INT32
    fn put_i32(&mut self, _value: i32) -> Result<(), EncodingError> {
        Err(self.unsupported("INT32"))
    }

    /// Encode an INT64
    fn put_i64(&mut self, _value: i64) -> Result<(), EncodingError> {
        Err(self.unsupported("INT64"))
    }

    /// Encode a FLOAT
    fn put_f32(&mut self, _value: f32) -> Result<(), EncodingError> {
        Err(self.unsupported("FLOAT"))
    }

    /// Encode a DOUBLE
    fn put_f64(&mut self, _value: f64) -> Result<(), EncodingError> {
        Err(self.unsupported("DOUBLE"))
    }

    /// Encode a BYTE_ARRAY
    fn put_bytes(&mut self, _value: &[u8]) -> Result<(), EncodingError> {
        Err(self.unsupported("BYTE_ARRAY"))
    }

    /// Encode a FIXED_LEN_BYTE_ARRAY
    fn put_fixed(&mut self, _value: &[u8]) -> Result<(), EncodingError> {
        Err(self.unsupported("FIXED_LEN_BYTE_ARRAY"))
    }

    /// Size in bytes of the data buffered since the last flush
    fn estimated_size(&self) -> usize;

    /// Take the encoded bytes buffered since the last flush
    fn flush_buffer(&mut self) -> Bytes;

    /// Build the error returned for an unsupported `put_*` call
    fn unsupported(&self, found: &'static str) -> EncodingError {
        EncodingError::UnsupportedValue {
            encoding: self.encoding(),
            physical_type: self.physical_type(),
            found,
        }
    }
}

/// An opaque encoder for definition or repetition levels.
pub trait LevelEncoder: Send {
    /// Encoding written into page headers
    fn encoding(&self) -> Encoding;

    /// Append one level
    fn put(&mut self, level: u16) -> Result<(), EncodingError>;

    /// Size in bytes of the data buffered since the last flush
    fn estimated_size(&self) -> usize;

    /// Take the encoded bytes buffered since the last flush
    fn flush_buffer(&mut self) -> Bytes;
}
