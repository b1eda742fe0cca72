//! Script builder for assembling VM bytecode.

use num_bigint::BigInt;
use sidechain_core::UInt168;
use sidechain_io::BinaryWriter;

use crate::op_code::OpCode;
use crate::stack_item::stack_item::int_to_bytes;

/// Assembles a script instruction by instruction.
#[derive(Debug, Default, Clone)]
pub struct ScriptBuilder {
    script: Vec<u8>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.script.len()
    }

    pub fn is_empty(&self) -> bool {
        self.script.is_empty()
    }

    /// Emits a raw byte.
    pub fn emit(&mut self, byte: u8) -> &mut Self {
        self.script.push(byte);
        self
    }

    pub fn emit_opcode(&mut self, op: OpCode) -> &mut Self {
        self.emit(op.as_byte())
    }

    pub fn emit_raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.script.extend_from_slice(bytes);
        self
    }

    /// Emits the shortest push of `data`.
    pub fn emit_push(&mut self, data: &[u8]) -> &mut Self {
        let len = data.len();
        if len == 0 {
            return self.emit_opcode(OpCode::PUSH0);
        }
        if len <= OpCode::PUSHBYTES75.as_byte() as usize {
            self.emit(len as u8);
        } else if len <= 0xFF {
            self.emit_opcode(OpCode::PUSHDATA1).emit(len as u8);
        } else if len <= 0xFFFF {
            self.emit_opcode(OpCode::PUSHDATA2)
                .emit_raw(&(len as u16).to_le_bytes());
        } else {
            self.emit_opcode(OpCode::PUSHDATA4)
                .emit_raw(&(len as u32).to_le_bytes());
        }
        self.emit_raw(data)
    }

    pub fn emit_push_int(&mut self, value: i64) -> &mut Self {
        match value {
            -1 => self.emit_opcode(OpCode::PUSHM1),
            0 => self.emit_opcode(OpCode::PUSH0),
            1..=16 => self.emit(OpCode::PUSH1.as_byte() + value as u8 - 1),
            _ => self.emit_push(&int_to_bytes(&BigInt::from(value))),
        }
    }

    pub fn emit_push_bigint(&mut self, value: &BigInt) -> &mut Self {
        self.emit_push(&int_to_bytes(value))
    }

    pub fn emit_push_bool(&mut self, value: bool) -> &mut Self {
        self.emit_opcode(if value { OpCode::PUSHT } else { OpCode::PUSHF })
    }

    pub fn emit_push_string(&mut self, value: &str) -> &mut Self {
        self.emit_push(value.as_bytes())
    }

    /// Emits a jump or call with an offset relative to the opcode itself.
    pub fn emit_jump(&mut self, op: OpCode, offset: i16) -> &mut Self {
        debug_assert!(matches!(
            op,
            OpCode::JMP | OpCode::JMPIF | OpCode::JMPIFNOT | OpCode::CALL
        ));
        self.emit_opcode(op).emit_raw(&offset.to_le_bytes())
    }

    pub fn emit_call(&mut self, offset: i16) -> &mut Self {
        self.emit_jump(OpCode::CALL, offset)
    }

    pub fn emit_app_call(&mut self, code_hash: &UInt168, tail: bool) -> &mut Self {
        let op = if tail { OpCode::TAILCALL } else { OpCode::APPCALL };
        self.emit_opcode(op).emit_raw(code_hash.as_bytes())
    }

    pub fn emit_syscall(&mut self, api: &str) -> &mut Self {
        let mut writer = BinaryWriter::new();
        writer.write_var_string(api);
        self.emit_opcode(OpCode::SYSCALL).emit_raw(writer.as_bytes())
    }

    pub fn to_array(&self) -> Vec<u8> {
        self.script.clone()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.script
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_integers_use_constant_opcodes() {
        let mut builder = ScriptBuilder::new();
        builder.emit_push_int(-1).emit_push_int(0).emit_push_int(16).emit_push_int(17);
        assert_eq!(builder.to_array(), vec![0x4F, 0x00, 0x60, 0x01, 0x11]);
    }

    #[test]
    fn push_data_prefixes() {
        let mut builder = ScriptBuilder::new();
        builder.emit_push(&[0xAA; 76]);
        assert_eq!(&builder.to_array()[..2], &[0x4C, 76]);

        let mut builder = ScriptBuilder::new();
        builder.emit_push(&[0xAA; 0x100]);
        assert_eq!(&builder.to_array()[..3], &[0x4D, 0x00, 0x01]);
    }

    #[test]
    fn syscall_encodes_name_with_length() {
        let mut builder = ScriptBuilder::new();
        builder.emit_syscall("Test.Echo");
        let script = builder.to_array();
        assert_eq!(script[0], 0x68);
        assert_eq!(script[1], 9);
        assert_eq!(&script[2..], b"Test.Echo");
    }
}
