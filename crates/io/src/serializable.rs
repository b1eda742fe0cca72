//! Serialization traits shared by hashed and stored data.

use crate::{BinaryWriter, IoResult, MemoryReader};

/// A type with a canonical binary encoding.
///
/// Encoding into a [`BinaryWriter`] cannot fail; decoding validates every
/// length prefix against the caller's bounds.
pub trait Serializable {
    /// The size of the object in bytes after serialization.
    fn size(&self) -> usize;

    fn serialize(&self, writer: &mut BinaryWriter);

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self>
    where
        Self: Sized;
}

/// Convenience conversions for [`Serializable`] types.
pub trait SerializableExt: Serializable {
    /// Encodes the object into a fresh byte vector.
    fn to_array(&self) -> Vec<u8> {
        let mut writer = BinaryWriter::with_capacity(self.size());
        self.serialize(&mut writer);
        writer.into_bytes()
    }

    /// Decodes an object that must span the whole buffer.
    fn from_array(data: &[u8]) -> IoResult<Self>
    where
        Self: Sized,
    {
        let mut reader = MemoryReader::new(data);
        let value = Self::deserialize(&mut reader)?;
        if !reader.is_empty() {
            return Err(crate::IoError::invalid_format(format!(
                "{} trailing bytes",
                reader.remaining()
            )));
        }
        Ok(value)
    }
}

impl<T: Serializable> SerializableExt for T {}

/// Helper functions for serialization.
pub mod helper {
    use super::Serializable;
    use crate::{BinaryWriter, IoResult, MemoryReader};

    /// Serializes a var-int count followed by each item.
    pub fn serialize_array<T: Serializable>(items: &[T], writer: &mut BinaryWriter) {
        writer.write_var_int(items.len() as u64);
        for item in items {
            item.serialize(writer);
        }
    }

    /// Deserializes a var-int count (at most `max`) followed by that many items.
    pub fn deserialize_array<T: Serializable>(
        reader: &mut MemoryReader,
        max: usize,
    ) -> IoResult<Vec<T>> {
        let count = reader.read_var_int(max as u64)? as usize;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(T::deserialize(reader)?);
        }
        Ok(items)
    }

    /// Gets the size of a serialized array.
    pub fn get_array_size<T: Serializable>(items: &[T]) -> usize {
        get_var_size(items.len() as u64) + items.iter().map(Serializable::size).sum::<usize>()
    }

    /// Gets the size of a var-int length prefix plus `len` bytes.
    pub fn get_var_bytes_size(len: usize) -> usize {
        get_var_size(len as u64) + len
    }

    /// Gets the size of a variable-length integer.
    pub fn get_var_size(value: u64) -> usize {
        if value < 0xFD {
            1
        } else if value <= 0xFFFF {
            3
        } else if value <= 0xFFFF_FFFF {
            5
        } else {
            9
        }
    }
}
