// Copyright (C) 2024-2025 The Sidechain Developers.
//
// fixed64.rs file belongs to the sidechain-rs project and is free
// software distributed under the MIT software license, see the
// accompanying file LICENSE in the main directory of the
// repository or http://www.opensource.org/licenses/mit-license.php
// for more details.
//
// Redistribution and use in source and binary forms with or without
// modifications are permitted.

use sidechain_config::FIXED64_ONE;
use sidechain_io::{BinaryWriter, IoResult, MemoryReader, Serializable};
use std::fmt;

/// A signed amount with eight implied decimal places.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, serde::Serialize, serde::Deserialize,
)]
pub struct Fixed64(pub i64);

impl Fixed64 {
    pub const ZERO: Self = Self(0);

    pub fn from_units(units: i64) -> Self {
        Self(units)
    }

    /// Whole tokens, saturating on overflow.
    pub fn from_whole(tokens: i64) -> Self {
        Self(tokens.saturating_mul(FIXED64_ONE))
    }

    pub fn units(&self) -> i64 {
        self.0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

impl Serializable for Fixed64 {
    fn size(&self) -> usize {
        8
    }

    fn serialize(&self, writer: &mut BinaryWriter) {
        writer.write_i64(self.0);
    }

    fn deserialize(reader: &mut MemoryReader) -> IoResult<Self> {
        Ok(Self(reader.read_i64()?))
    }
}

impl fmt::Display for Fixed64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let one = FIXED64_ONE as u64;
        write!(f, "{sign}{}.{:08}", abs / one, abs % one)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_eight_decimals() {
        assert_eq!(Fixed64::from_units(150_000_000).to_string(), "1.50000000");
        assert_eq!(Fixed64::from_units(-1).to_string(), "-0.00000001");
    }

    #[test]
    fn checked_arithmetic_detects_overflow() {
        assert_eq!(Fixed64(i64::MAX).checked_add(Fixed64(1)), None);
        assert_eq!(Fixed64(5).checked_sub(Fixed64(2)), Some(Fixed64(3)));
    }
}
