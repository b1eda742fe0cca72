/// Discriminant of a [`StackItem`](super::StackItem), doubling as its
/// serialization tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StackItemType {
    ByteArray = 0x00,
    Boolean = 0x01,
    Integer = 0x02,
    InteropInterface = 0x40,
    Array = 0x80,
    Struct = 0x81,
    Map = 0x82,
}

impl StackItemType {
    pub fn from_byte(value: u8) -> Option<Self> {
        match value {
            0x00 => Some(Self::ByteArray),
            0x01 => Some(Self::Boolean),
            0x02 => Some(Self::Integer),
            0x40 => Some(Self::InteropInterface),
            0x80 => Some(Self::Array),
            0x81 => Some(Self::Struct),
            0x82 => Some(Self::Map),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ByteArray => "ByteArray",
            Self::Boolean => "Boolean",
            Self::Integer => "Integer",
            Self::InteropInterface => "InteropInterface",
            Self::Array => "Array",
            Self::Struct => "Struct",
            Self::Map => "Map",
        }
    }

    pub fn is_compound(self) -> bool {
        matches!(self, Self::Array | Self::Struct | Self::Map)
    }
}
