use crate::{IoError, IoResult};

/// Reads little-endian encoded values from a borrowed buffer.
#[derive(Debug, Clone)]
pub struct MemoryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> MemoryReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Starts reading at `position`; a position past the end reads nothing.
    pub fn with_position(data: &'a [u8], position: usize) -> Self {
        Self {
            data,
            position: position.min(data.len()),
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Returns the next byte without consuming it.
    pub fn peek(&self) -> Option<u8> {
        self.data.get(self.position).copied()
    }

    fn take(&mut self, count: usize) -> IoResult<&'a [u8]> {
        if count > self.remaining() {
            return Err(IoError::EndOfStream {
                needed: count,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.position..self.position + count];
        self.position += count;
        Ok(slice)
    }

    fn take_array<const N: usize>(&mut self) -> IoResult<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    pub fn read_u8(&mut self) -> IoResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> IoResult<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(IoError::invalid_format(format!("invalid boolean byte {other:#04x}"))),
        }
    }

    pub fn read_u16(&mut self) -> IoResult<u16> {
        Ok(u16::from_le_bytes(self.take_array()?))
    }

    pub fn read_i16(&mut self) -> IoResult<i16> {
        Ok(i16::from_le_bytes(self.take_array()?))
    }

    pub fn read_u32(&mut self) -> IoResult<u32> {
        Ok(u32::from_le_bytes(self.take_array()?))
    }

    pub fn read_u64(&mut self) -> IoResult<u64> {
        Ok(u64::from_le_bytes(self.take_array()?))
    }

    pub fn read_i64(&mut self) -> IoResult<i64> {
        Ok(i64::from_le_bytes(self.take_array()?))
    }

    /// Reads exactly `count` raw bytes.
    pub fn read_bytes(&mut self, count: usize) -> IoResult<Vec<u8>> {
        Ok(self.take(count)?.to_vec())
    }

    /// Reads a variable-length integer no larger than `max`.
    pub fn read_var_int(&mut self, max: u64) -> IoResult<u64> {
        let value = match self.read_u8()? {
            0xFD => {
                let value = u64::from(self.read_u16()?);
                if value < 0xFD {
                    return Err(IoError::NonCanonicalVarInt);
                }
                value
            }
            0xFE => {
                let value = u64::from(self.read_u32()?);
                if value <= 0xFFFF {
                    return Err(IoError::NonCanonicalVarInt);
                }
                value
            }
            0xFF => {
                let value = self.read_u64()?;
                if value <= 0xFFFF_FFFF {
                    return Err(IoError::NonCanonicalVarInt);
                }
                value
            }
            small => u64::from(small),
        };
        if value > max {
            return Err(IoError::TooLarge { value, max });
        }
        Ok(value)
    }

    /// Reads a var-int length prefix and that many bytes.
    pub fn read_var_bytes(&mut self, max: usize) -> IoResult<Vec<u8>> {
        let length = self.read_var_int(max as u64)? as usize;
        self.read_bytes(length)
    }

    pub fn read_var_string(&mut self, max: usize) -> IoResult<String> {
        let bytes = self.read_var_bytes(max)?;
        String::from_utf8(bytes).map_err(|_| IoError::InvalidUtf8)
    }
}
