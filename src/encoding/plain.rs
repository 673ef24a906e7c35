//! PLAIN encoding.
//!
//! Fixed-width types are written little-endian back to back, BOOLEAN values
//! are bit-packed LSB first, BYTE_ARRAY values carry a 4-byte little-endian
//! length prefix and FIXED_LEN_BYTE_ARRAY values are written raw.

use byteorder::{LittleEndian, WriteBytesExt};
use bytes::Bytes;
use parquet::basic::{Encoding, Type as PhysicalType};

use super::{EncodingError, ValuesEncoder};

/// PLAIN encoder for one physical type
#[derive(Debug)]
pub struct PlainEncoder {
    physical_type: PhysicalType,
    type_length: usize,
    buffer: Vec<u8>,
    bit_buffer: u8,
    bit_count: u8,
}

impl PlainEncoder {
    /// Create an encoder; `type_length` is only used for FIXED_LEN_BYTE_ARRAY
    pub fn new(physical_type: PhysicalType, type_length: usize) -> Self {
        Self {
            physical_type,
            type_length,
            buffer: Vec::new(),
            bit_buffer: 0,
            bit_count: 0,
        }
    }

    fn expect(&self, physical_type: PhysicalType, found: &'static str) -> Result<(), EncodingError> {
        if self.physical_type == physical_type {
            Ok(())
        } else {
            Err(self.unsupported(found))
        }
    }
}

impl ValuesEncoder for PlainEncoder {
    fn encoding(&self) -> Encoding {
        Encoding::PLAIN
    }

    fn physical_type(&self) -> PhysicalType {
        self.physical_type
    }

    fn put_boolean(&mut self, value: bool) -> Result<(), EncodingError> {
        self.expect(PhysicalType::BOOLEAN, "BOOLEAN")?;
        if value {
            self.bit_buffer |= 1 << self.bit_count;
        }
        self.bit_count += 1;
        if self.bit_count == 8 {
            self.buffer.push(self.bit_buffer);
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
        Ok(())
    }

    fn put_i32(&mut self, value: i32) -> Result<(), EncodingError> {
        self.expect(PhysicalType::INT32, "INT32")?;
        // Writes into a Vec cannot fail.
        let _ = self.buffer.write_i32::<LittleEndian>(value);
        Ok(())
    }

    fn put_i64(&mut self, value: i64) -> Result<(), EncodingError> {
        self.expect(PhysicalType::INT64, "INT64")?;
        let _ = self.buffer.write_i64::<LittleEndian>(value);
        Ok(())
    }

    fn put_f32(&mut self, value: f32) -> Result<(), EncodingError> {
        self.expect(PhysicalType::FLOAT, "FLOAT")?;
        let _ = self.buffer.write_f32::<LittleEndian>(value);
        Ok(())
    }

    fn put_f64(&mut self, value: f64) -> Result<(), EncodingError> {
        self.expect(PhysicalType::DOUBLE, "DOUBLE")?;
        let _ = self.buffer.write_f64::<LittleEndian>(value);
        Ok(())
    }

    fn put_bytes(&mut self, value: &[u8]) -> Result<(), EncodingError> {
        self.expect(PhysicalType::BYTE_ARRAY, "BYTE_ARRAY")?;
        let length = u32::try_from(value.len()).map_err(|_| EncodingError::ValueTooLarge(value.len()))?;
        let _ = self.buffer.write_u32::<LittleEndian>(length);
        self.buffer.extend_from_slice(value);
        Ok(())
    }

    fn put_fixed(&mut self, value: &[u8]) -> Result<(), EncodingError> {
        self.expect(PhysicalType::FIXED_LEN_BYTE_ARRAY, "FIXED_LEN_BYTE_ARRAY")?;
        if value.len() != self.type_length {
            return Err(EncodingError::FixedLengthMismatch {
                expected: self.type_length,
                found: value.len(),
            });
        }
        self.buffer.extend_from_slice(value);
        Ok(())
    }

    fn estimated_size(&self) -> usize {
        self.buffer.len() + usize::from(self.bit_count > 0)
    }

    fn flush_buffer(&mut self) -> Bytes {
        if self.bit_count > 0 {
            self.buffer.push(self.bit_buffer);
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
        Bytes::from(std::mem::take(&mut self.buffer))
    }
}
