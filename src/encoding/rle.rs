//! RLE / bit-packed hybrid encoding.
//!
//! A stream is a sequence of runs, each introduced by a ULEB128 header:
//!
//! - `header = count << 1`: an RLE run of `count` copies of one value,
//!   stored in `ceil(bit_width / 8)` little-endian bytes
//! - `header = (groups << 1) | 1`: a bit-packed run of `groups * 8`
//!   values, `bit_width` bits each, LSB first
//!
//! Data page V1 prefixes level streams with their 4-byte little-endian byte
//! length; data page V2 stores them bare and records the length in the page
//! header.

use byteorder::{ByteOrder, LittleEndian};
use bytes::Bytes;
use parquet::basic::{Encoding, Type as PhysicalType};

use super::{EncodingError, LevelEncoder, ValuesEncoder};

/// Values per bit-packed group
const GROUP_SIZE: usize = 8;
/// Shortest repetition worth an RLE run
const MIN_RLE_RUN: usize = 8;
/// Size of the V1 length prefix
const LENGTH_PREFIX: usize = 4;

/// Number of bits needed to store every level up to `max_level`
pub fn bit_width(max_level: u16) -> u8 {
    // At most 16, always fits.
    (u16::BITS - max_level.leading_zeros()) as u8
}

/// Buffering RLE / bit-packed hybrid encoder.
///
/// Values are buffered until [`RleEncoder::flush_buffer`] so that runs can be
/// chosen over the whole page.
#[derive(Debug, Clone)]
pub struct RleEncoder {
    bit_width: u8,
    values: Vec<u64>,
}

impl RleEncoder {
    /// Create an encoder for values of `bit_width` bits
    pub fn new(bit_width: u8) -> Self {
        Self {
            bit_width,
            values: Vec::new(),
        }
    }

    /// Bit width of the encoded values
    pub fn bit_width(&self) -> u8 {
        self.bit_width
    }

    /// Append a value
    pub fn put(&mut self, value: u64) {
        self.values.push(value);
    }

    /// Number of buffered values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing is buffered
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Upper bound of the encoded size when every value is bit-packed
    pub fn estimated_size(&self) -> usize {
        if self.values.is_empty() {
            return 0;
        }
        let groups = self.values.len().div_ceil(GROUP_SIZE);
        groups * usize::from(self.bit_width) + varint_len((groups as u64) << 1 | 1)
    }

    /// Encode and clear the buffered values
    pub fn flush_buffer(&mut self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.estimated_size());
        encode_runs(self.bit_width, &self.values, &mut out);
        self.values.clear();
        out
    }
}

fn encode_runs(bit_width: u8, values: &[u64], out: &mut Vec<u8>) {
    let mut pending: Vec<u64> = Vec::new();
    let mut i = 0;
    while i < values.len() {
        let value = values[i];
        let mut run = 1;
        while i + run < values.len() && values[i + run] == value {
            run += 1;
        }

        if run < MIN_RLE_RUN {
            pending.extend_from_slice(&values[i..i + run]);
            i += run;
            continue;
        }

        // Runs may only start on a group boundary; top up the open group first.
        let fill = (GROUP_SIZE - pending.len() % GROUP_SIZE) % GROUP_SIZE;
        pending.extend(std::iter::repeat(value).take(fill));
        i += fill;
        run -= fill;

        if run >= MIN_RLE_RUN {
            write_bit_packed(bit_width, &pending, out);
            pending.clear();
            write_rle_run(bit_width, run, value, out);
        } else {
            pending.extend(std::iter::repeat(value).take(run));
        }
        i += run;
    }
    write_bit_packed(bit_width, &pending, out);
}

fn write_rle_run(bit_width: u8, count: usize, value: u64, out: &mut Vec<u8>) {
    write_varint((count as u64) << 1, out);
    let value_bytes = usize::from(bit_width).div_ceil(8);
    out.extend_from_slice(&value.to_le_bytes()[..value_bytes]);
}

fn write_bit_packed(bit_width: u8, values: &[u64], out: &mut Vec<u8>) {
    if values.is_empty() {
        return;
    }
    let groups = values.len().div_ceil(GROUP_SIZE);
    write_varint((groups as u64) << 1 | 1, out);

    let mask = if bit_width >= 64 {
        u64::MAX
    } else {
        (1u64 << bit_width) - 1
    };
    let mut current: u64 = 0;
    let mut bits: u32 = 0;
    let padded = values.iter().copied().chain(std::iter::repeat(0));
    for value in padded.take(groups * GROUP_SIZE) {
        current |= (value & mask) << bits;
        bits += u32::from(bit_width);
        while bits >= 8 {
            out.push(current as u8);
            current >>= 8;
            bits -= 8;
        }
    }
    if bits > 0 {
        out.push(current as u8);
    }
}

fn write_varint(mut value: u64, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value as u8) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

fn varint_len(mut value: u64) -> usize {
    let mut len = 1;
    while value >= 0x80 {
        value >>= 7;
        len += 1;
    }
    len
}

/// Decoder for RLE / bit-packed hybrid streams
#[derive(Debug)]
pub struct RleDecoder<'a> {
    bit_width: u8,
    data: &'a [u8],
    offset: usize,
    rle_left: u64,
    rle_value: u64,
    packed: Vec<u64>,
    packed_offset: usize,
}

impl<'a> RleDecoder<'a> {
    /// Decode `data`, a bare (unprefixed) stream of `bit_width`-bit values
    pub fn new(bit_width: u8, data: &'a [u8]) -> Self {
        Self {
            bit_width,
            data,
            offset: 0,
            rle_left: 0,
            rle_value: 0,
            packed: Vec::new(),
            packed_offset: 0,
        }
    }

    /// Decode the next `count` values
    pub fn decode(&mut self, count: usize) -> Result<Vec<u64>, EncodingError> {
        let mut out = Vec::with_capacity(count.min(self.data.len() * 8 + 8));
        while out.len() < count {
            if self.rle_left > 0 {
                let take = (self.rle_left).min((count - out.len()) as u64);
                out.extend(std::iter::repeat(self.rle_value).take(take as usize));
                self.rle_left -= take;
            } else if self.packed_offset < self.packed.len() {
                let take = (self.packed.len() - self.packed_offset).min(count - out.len());
                out.extend_from_slice(&self.packed[self.packed_offset..self.packed_offset + take]);
                self.packed_offset += take;
            } else {
                self.next_run()?;
            }
        }
        Ok(out)
    }

    fn next_run(&mut self) -> Result<(), EncodingError> {
        let header = self.read_varint()?;
        if header & 1 == 1 {
            let groups = usize::try_from(header >> 1)
                .map_err(|_| EncodingError::Truncated("bit-packed run too long".to_string()))?;
            let values = groups
                .checked_mul(GROUP_SIZE)
                .ok_or_else(|| EncodingError::Truncated("bit-packed run too long".to_string()))?;
            if self.bit_width == 0 {
                // Zero-width values occupy no bytes: a run of zeros.
                self.rle_left = values as u64;
                self.rle_value = 0;
                return Ok(());
            }
            let byte_len = groups
                .checked_mul(usize::from(self.bit_width))
                .ok_or_else(|| EncodingError::Truncated("bit-packed run too long".to_string()))?;
            let bytes = self.take(byte_len)?;
            self.packed = unpack(self.bit_width, bytes, values);
            self.packed_offset = 0;
        } else {
            let value_bytes = usize::from(self.bit_width).div_ceil(8);
            let bytes = self.take(value_bytes)?;
            let mut buffer = [0u8; 8];
            buffer[..value_bytes].copy_from_slice(bytes);
            self.rle_left = header >> 1;
            self.rle_value = u64::from_le_bytes(buffer);
        }
        Ok(())
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], EncodingError> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.data.len())
            .ok_or_else(|| {
                EncodingError::Truncated(format!(
                    "needed {len} bytes at offset {}, stream has {}",
                    self.offset,
                    self.data.len()
                ))
            })?;
        let bytes = &self.data[self.offset..end];
        self.offset = end;
        Ok(bytes)
    }

    fn read_varint(&mut self) -> Result<u64, EncodingError> {
        let mut value: u64 = 0;
        let mut shift = 0;
        loop {
            let byte = *self
                .data
                .get(self.offset)
                .ok_or_else(|| EncodingError::Truncated("run header".to_string()))?;
            self.offset += 1;
            if shift >= 64 {
                return Err(EncodingError::Truncated("run header longer than 64 bits".to_string()));
            }
            value |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }
}

fn unpack(bit_width: u8, bytes: &[u8], count: usize) -> Vec<u64> {
    let mut out = Vec::with_capacity(count);
    if bit_width == 0 {
        out.resize(count, 0);
        return out;
    }
    let mask = if bit_width >= 64 {
        u64::MAX
    } else {
        (1u64 << bit_width) - 1
    };
    let mut current: u128 = 0;
    let mut bits: u32 = 0;
    let mut input = bytes.iter();
    while out.len() < count {
        while bits < u32::from(bit_width) {
            match input.next() {
                Some(byte) => {
                    current |= u128::from(*byte) << bits;
                    bits += 8;
                }
                None => return out,
            }
        }
        out.push((current as u64) & mask);
        current >>= bit_width;
        bits -= u32::from(bit_width);
    }
    out
}

/// Decode a V1 level section (4-byte length prefix + hybrid stream).
///
/// Returns the levels and the number of bytes consumed, prefix included.
/// A `max_level` of 0 means the section is absent: all levels are 0 and no
/// bytes are consumed.
pub fn decode_levels_v1(
    data: &[u8],
    max_level: u16,
    count: usize,
) -> Result<(Vec<u16>, usize), EncodingError> {
    if max_level == 0 {
        return Ok((vec![0; count], 0));
    }
    if data.len() < LENGTH_PREFIX {
        return Err(EncodingError::Truncated("level length prefix".to_string()));
    }
    let length = LittleEndian::read_u32(&data[..LENGTH_PREFIX]) as usize;
    let end = LENGTH_PREFIX
        .checked_add(length)
        .filter(|end| *end <= data.len())
        .ok_or_else(|| EncodingError::Truncated(format!("level section of {length} bytes")))?;
    let levels = decode_levels_v2(&data[LENGTH_PREFIX..end], max_level, count)?;
    Ok((levels, end))
}

/// Decode a bare V2 level section
pub fn decode_levels_v2(data: &[u8], max_level: u16, count: usize) -> Result<Vec<u16>, EncodingError> {
    if max_level == 0 {
        return Ok(vec![0; count]);
    }
    let mut decoder = RleDecoder::new(bit_width(max_level), data);
    decoder
        .decode(count)?
        .into_iter()
        .map(|level| {
            u16::try_from(level)
                .ok()
                .filter(|level| *level <= max_level)
                .ok_or(EncodingError::LevelOutOfRange {
                    level: u16::try_from(level).unwrap_or(u16::MAX),
                    max_level,
                })
        })
        .collect()
}

/// Level encoder producing V1 (length-prefixed) or V2 (bare) hybrid streams.
///
/// A column whose maximum level is 0 has no level section at all; the
/// encoder then only checks that every level is 0 and emits nothing.
#[derive(Debug)]
pub struct RleLevelEncoder {
    max_level: u16,
    length_prefixed: bool,
    encoder: RleEncoder,
}

impl RleLevelEncoder {
    /// Encoder for data page V1
    pub fn v1(max_level: u16) -> Self {
        Self {
            max_level,
            length_prefixed: true,
            encoder: RleEncoder::new(bit_width(max_level)),
        }
    }

    /// Encoder for data page V2
    pub fn v2(max_level: u16) -> Self {
        Self {
            max_level,
            length_prefixed: false,
            encoder: RleEncoder::new(bit_width(max_level)),
        }
    }
}

impl LevelEncoder for RleLevelEncoder {
    fn encoding(&self) -> Encoding {
        Encoding::RLE
    }

    fn put(&mut self, level: u16) -> Result<(), EncodingError> {
        if level > self.max_level {
            return Err(EncodingError::LevelOutOfRange {
                level,
                max_level: self.max_level,
            });
        }
        if self.max_level > 0 {
            self.encoder.put(u64::from(level));
        }
        Ok(())
    }

    fn estimated_size(&self) -> usize {
        if self.max_level == 0 || self.encoder.is_empty() {
            return 0;
        }
        let prefix = if self.length_prefixed { LENGTH_PREFIX } else { 0 };
        prefix + self.encoder.estimated_size()
    }

    fn flush_buffer(&mut self) -> Bytes {
        if self.max_level == 0 {
            return Bytes::new();
        }
        let encoded = self.encoder.flush_buffer();
        if !self.length_prefixed {
            return Bytes::from(encoded);
        }
        let mut out = Vec::with_capacity(LENGTH_PREFIX + encoded.len());
        out.extend_from_slice(&(encoded.len() as u32).to_le_bytes());
        out.extend_from_slice(&encoded);
        Bytes::from(out)
    }
}

/// RLE encoder for BOOLEAN values (bit width 1, length-prefixed)
#[derive(Debug)]
pub struct RleBooleanEncoder {
    encoder: RleEncoder,
}

impl RleBooleanEncoder {
    /// Create an empty encoder
    pub fn new() -> Self {
        Self {
            encoder: RleEncoder::new(1),
        }
    }
}

impl Default for RleBooleanEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ValuesEncoder for RleBooleanEncoder {
    fn encoding(&self) -> Encoding {
        Encoding::RLE
    }

    fn physical_type(&self) -> PhysicalType {
        PhysicalType::BOOLEAN
    }

    fn put_boolean(&mut self, value: bool) -> Result<(), EncodingError> {
        self.encoder.put(u64::from(value));
        Ok(())
    }

    fn estimated_size(&self) -> usize {
        if self.encoder.is_empty() {
            return 0;
        }
        LENGTH_PREFIX + self.encoder.estimated_size()
    }

    fn flush_buffer(&mut self) -> Bytes {
        let encoded = self.encoder.flush_buffer();
        let mut out = Vec::with_capacity(LENGTH_PREFIX + encoded.len());
        out.extend_from_slice(&(encoded.len() as u32).to_le_bytes());
        out.extend_from_slice(&encoded);
        Bytes::from(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(bit_width: u8, values: &[u64]) -> Vec<u8> {
        let mut encoder = RleEncoder::new(bit_width);
        for value in values {
            encoder.put(*value);
        }
        let encoded = encoder.flush_buffer();
        let decoded = RleDecoder::new(bit_width, &encoded).decode(values.len()).unwrap();
        assert_eq!(decoded, values);
        encoded
    }

    #[test]
    fn test_bit_width() {
        assert_eq!(bit_width(0), 0);
        assert_eq!(bit_width(1), 1);
        assert_eq!(bit_width(2), 2);
        assert_eq!(bit_width(3), 2);
        assert_eq!(bit_width(4), 3);
    }

    #[test]
    fn test_long_run_uses_rle() {
        let encoded = roundtrip(1, &[1; 100]);
        // header (100 << 1 = 200 as varint: 2 bytes) + 1 value byte
        assert_eq!(encoded, vec![0xC8, 0x01, 0x01]);
    }

    #[test]
    fn test_short_values_are_bit_packed() {
        let encoded = roundtrip(2, &[0, 1, 2, 3]);
        // one group, header (1 << 1) | 1, then 8 values * 2 bits = 2 bytes
        assert_eq!(encoded, vec![0x03, 0b1110_0100, 0x00]);
    }

    #[test]
    fn test_mixed_runs() {
        let mut values = vec![0, 1, 0];
        values.extend(std::iter::repeat(1).take(20));
        values.extend([0, 0, 1]);
        values.extend(std::iter::repeat(3).take(9));
        roundtrip(2, &values);
    }

    #[test]
    fn test_decoder_reports_truncation() {
        let err = RleDecoder::new(3, &[0x05, 0xFF]).decode(16).unwrap_err();
        assert!(matches!(err, EncodingError::Truncated(_)));
    }

    #[test]
    fn test_level_encoder_v1_prefix() {
        let mut encoder = RleLevelEncoder::v1(1);
        for level in [1, 0, 1, 1] {
            encoder.put(level).unwrap();
        }
        let bytes = encoder.flush_buffer();
        let (levels, consumed) = decode_levels_v1(&bytes, 1, 4).unwrap();
        assert_eq!(levels, vec![1, 0, 1, 1]);
        assert_eq!(consumed, bytes.len());
        assert_eq!(LittleEndian::read_u32(&bytes[..4]) as usize, bytes.len() - 4);
    }

    #[test]
    fn test_level_encoder_v2_is_bare() {
        let mut encoder = RleLevelEncoder::v2(2);
        for level in [2, 2, 1, 0] {
            encoder.put(level).unwrap();
        }
        let bytes = encoder.flush_buffer();
        assert_eq!(decode_levels_v2(&bytes, 2, 4).unwrap(), vec![2, 2, 1, 0]);
    }

    #[test]
    fn test_level_encoder_rejects_out_of_range() {
        let mut encoder = RleLevelEncoder::v2(1);
        assert!(matches!(
            encoder.put(2),
            Err(EncodingError::LevelOutOfRange {
                level: 2,
                max_level: 1
            })
        ));
    }

    #[test]
    fn test_zero_max_level_emits_nothing() {
        let mut encoder = RleLevelEncoder::v1(0);
        encoder.put(0).unwrap();
        assert_eq!(encoder.estimated_size(), 0);
        assert!(encoder.flush_buffer().is_empty());
        assert_eq!(decode_levels_v1(&[], 0, 3).unwrap(), (vec![0, 0, 0], 0));
    }

    #[test]
    fn test_boolean_rle_encoder() {
        let mut encoder = RleBooleanEncoder::new();
        for value in [true, true, false] {
            encoder.put_boolean(value).unwrap();
        }
        let bytes = encoder.flush_buffer();
        let length = LittleEndian::read_u32(&bytes[..4]) as usize;
        let decoded = RleDecoder::new(1, &bytes[4..4 + length]).decode(3).unwrap();
        assert_eq!(decoded, vec![1, 1, 0]);
        assert!(encoder.put_i32(1).is_err());
    }
}
