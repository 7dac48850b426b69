//! Bit-granular writer, symmetric with [`crate::bitreader::BitReader`].

use crate::error::{Result, Vc2Error};

pub struct BitWriter {
    bytes: Vec<u8>,
    cur: u8,
    bit_pos: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self {
            bytes: Vec::new(),
            cur: 0,
            bit_pos: 7,
        }
    }

    pub fn tell(&self) -> (u64, u8) {
        (self.bytes.len() as u64, self.bit_pos)
    }

    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.cur |= 1 << self.bit_pos;
        }
        if self.bit_pos == 0 {
            self.bytes.push(self.cur);
            self.cur = 0;
            self.bit_pos = 7;
        } else {
            self.bit_pos -= 1;
        }
    }

    pub fn byte_aligned(&self) -> bool {
        self.bit_pos == 7
    }

    pub fn byte_align(&mut self) {
        while !self.byte_aligned() {
            self.write_bit(false);
        }
    }

    /// Commit the partial trailing byte, leaving the cursor positioned to
    /// continue writing within it.
    pub fn flush(&mut self) -> &[u8] {
        if self.bit_pos != 7 {
            self.bytes.push(self.cur);
        }
        &self.bytes
    }

    pub fn into_bytes(mut self) -> Vec<u8> {
        if self.bit_pos != 7 {
            self.bytes.push(self.cur);
        }
        self.bytes
    }

    pub fn bounded(&mut self, n_bits: u64) -> BoundedWriter<'_> {
        BoundedWriter {
            inner: self,
            bits_remaining: n_bits,
        }
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// A bounded write window: writing `1` past the declared length is silently
/// discarded, writing `0` past the end is a [`Vc2Error::BoundedBlockOverflow`].
pub struct BoundedWriter<'w> {
    inner: &'w mut BitWriter,
    bits_remaining: u64,
}

impl<'w> BoundedWriter<'w> {
    pub fn bits_remaining(&self) -> u64 {
        self.bits_remaining
    }

    pub fn write_bit(&mut self, bit: bool) -> Result<()> {
        if self.bits_remaining == 0 {
            return if bit {
                Ok(())
            } else {
                Err(Vc2Error::BoundedBlockOverflow)
            };
        }
        self.bits_remaining -= 1;
        self.inner.write_bit(bit);
        Ok(())
    }

    /// Pad the remainder of the bound with `1` bits.
    pub fn flush_outputb(&mut self) -> Result<()> {
        while self.bits_remaining > 0 {
            self.write_bit(true)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_bits() {
        let mut w = BitWriter::new();
        for bit in [true, false, true, true, false, false, true, false] {
            w.write_bit(bit);
        }
        assert_eq!(w.into_bytes(), vec![0b1011_0010]);
    }

    #[test]
    fn bounded_writer_rejects_zero_past_end() {
        let mut w = BitWriter::new();
        let mut b = w.bounded(2);
        b.write_bit(true).unwrap();
        b.write_bit(false).unwrap();
        assert!(b.write_bit(true).is_ok());
        assert!(b.write_bit(false).is_err());
    }
}
