//! Variable-length codecs: booleans, fixed-width fields, byte-literals and
//! the modified interleaved exp-Golomb codes used for every other integer
//! field in a VC-2 bitstream.
//!
//! All read functions are generic over [`BitSource`] so they work equally
//! against an unbounded [`BitReader`] or a [`BoundedReader`] slice opened
//! for a single slice or component within a slice.

use crate::bitreader::{BitReader, BitSource, BoundedReader};
use crate::bitwriter::{BitWriter, BoundedWriter};
use crate::error::Result;

pub fn read_bool<B: BitSource>(r: &mut B) -> bool {
    r.read_bit()
}

pub fn read_nbits<B: BitSource>(r: &mut B, n: u32) -> u64 {
    let mut value = 0u64;
    for _ in 0..n {
        value = (value << 1) | (r.read_bit() as u64);
    }
    value
}

/// Byte-aligns then reads `8*n_bytes` bits as an unsigned big-endian
/// integer. Only defined on the unbounded reader since byte-alignment has
/// no meaning inside a bounded slice block.
pub fn read_uint_lit(r: &mut BitReader, n_bytes: u32) -> u64 {
    r.byte_align();
    read_nbits(r, n_bytes * 8)
}

/// Modified interleaved exp-Golomb unsigned integer: a `0` bit means "more
/// data follows", a `1` bit is the stop marker. The decoded magnitude is
/// the running value built up from the interleaved data bits, minus one.
pub fn read_uint<B: BitSource>(r: &mut B) -> u64 {
    let mut value: u64 = 1;
    loop {
        if r.read_bit() {
            break;
        }
        value <<= 1;
        value |= r.read_bit() as u64;
    }
    value - 1
}

/// `read_uint` followed by a sign bit when the magnitude is non-zero
/// (`1` negates).
pub fn read_sint<B: BitSource>(r: &mut B) -> i64 {
    let magnitude = read_uint(r);
    if magnitude == 0 {
        return 0;
    }
    if r.read_bit() {
        -(magnitude as i64)
    } else {
        magnitude as i64
    }
}

pub fn write_bool(w: &mut BitWriter, value: bool) {
    w.write_bit(value);
}

pub fn write_nbits(w: &mut BitWriter, value: u64, n: u32) {
    for i in (0..n).rev() {
        w.write_bit((value >> i) & 1 != 0);
    }
}

pub fn write_uint_lit(w: &mut BitWriter, value: u64, n_bytes: u32) {
    w.byte_align();
    write_nbits(w, value, n_bytes * 8);
}

pub fn write_uint(w: &mut BitWriter, value: u64) {
    let v = value + 1;
    let k = 63 - v.leading_zeros();
    for i in (0..k).rev() {
        w.write_bit(false);
        w.write_bit((v >> i) & 1 != 0);
    }
    w.write_bit(true);
}

pub fn write_sint(w: &mut BitWriter, value: i64) {
    write_uint(w, value.unsigned_abs());
    if value != 0 {
        w.write_bit(value < 0);
    }
}

/// Number of bits `write_uint` would produce for `value`, per the closed
/// form `2*floor(log2(value+1))+1`.
pub fn uint_length(value: u64) -> u32 {
    let v = value + 1;
    2 * (63 - v.leading_zeros()) + 1
}

pub fn sint_length(value: i64) -> u32 {
    if value == 0 {
        uint_length(0)
    } else {
        uint_length(value.unsigned_abs()) + 1
    }
}

// Bounded variants, the `_b` suffixed family from the reference decoder.

pub fn read_bool_b(r: &mut BoundedReader) -> bool {
    read_bool(r)
}

pub fn read_nbits_b(r: &mut BoundedReader, n: u32) -> u64 {
    read_nbits(r, n)
}

pub fn read_uint_b(r: &mut BoundedReader) -> u64 {
    read_uint(r)
}

pub fn read_sint_b(r: &mut BoundedReader) -> i64 {
    read_sint(r)
}

pub fn write_bool_b(w: &mut BoundedWriter, value: bool) -> Result<()> {
    w.write_bit(value)
}

pub fn write_nbits_b(w: &mut BoundedWriter, value: u64, n: u32) -> Result<()> {
    for i in (0..n).rev() {
        w.write_bit((value >> i) & 1 != 0)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_byte_uint_example() {
        let data = vec![0x1f];
        let mut r = BitReader::new(&data);
        assert_eq!(read_uint(&mut r), 4);
        assert_eq!(r.bits_past_eof(), 0);
        assert_eq!(read_uint(&mut r), 0);
        assert_eq!(r.bits_past_eof(), 0);
    }

    #[test]
    fn uint_round_trips() {
        for v in [0u64, 1, 2, 4, 5, 14, 100, 1 << 20] {
            let mut w = BitWriter::new();
            write_uint(&mut w, v);
            let bytes = w.into_bytes();
            let mut r = BitReader::new(&bytes);
            assert_eq!(read_uint(&mut r), v);
        }
    }

    #[test]
    fn sint_round_trips_at_bounds() {
        for v in [0i64, 1, -1, (1i64 << 31) - 1, -(1i64 << 31)] {
            let mut w = BitWriter::new();
            write_sint(&mut w, v);
            let bytes = w.into_bytes();
            let mut r = BitReader::new(&bytes);
            assert_eq!(read_sint(&mut r), v);
        }
    }

    #[test]
    fn uint_length_matches_closed_form() {
        assert_eq!(uint_length(0), 1);
        assert_eq!(uint_length(4), 5);
    }
}
