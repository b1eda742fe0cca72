//! Per-family opcode behavior.

use std::rc::Rc;

use num_bigint::BigInt;
use p256::ecdsa::{signature::Signer, Signature, SigningKey};
use sidechain_core::Transaction;
use sidechain_vm::{
    ExecutionEngine, FaultReason, InteropService, OpCode, ScriptBuilder, StackItem, VMState,
    VmError,
};

fn run(builder: &ScriptBuilder) -> ExecutionEngine {
    let mut engine = ExecutionEngine::new(InteropService::new());
    engine.load_script(builder.to_array(), false).unwrap();
    engine.execute();
    engine
}

fn ints(engine: &ExecutionEngine) -> Vec<i64> {
    engine
        .evaluation_stack()
        .iter()
        .map(|item| i64::try_from(item.as_int()).unwrap())
        .collect()
}

fn top_bytes(engine: &ExecutionEngine) -> Vec<u8> {
    engine.result().map(StackItem::as_bytes).unwrap_or_default()
}

fn push_ints(builder: &mut ScriptBuilder, values: &[i64]) {
    for value in values {
        builder.emit_push_int(*value);
    }
}

#[test]
fn test_stack_shuffles() {
    let cases: &[(&[i64], OpCode, &[i64])] = &[
        (&[1, 2, 3], OpCode::ROT, &[1, 3, 2]),
        (&[1, 2, 3], OpCode::SWAP, &[2, 3, 1]),
        (&[1, 2], OpCode::TUCK, &[2, 1, 2]),
        (&[1, 2], OpCode::OVER, &[1, 2, 1]),
        (&[1, 2], OpCode::NIP, &[2]),
        (&[1, 2], OpCode::DUP, &[2, 2, 1]),
        (&[1, 2], OpCode::DROP, &[1]),
        (&[1, 1], OpCode::DEPTH, &[2, 1, 1]),
        (&[1, 2, 3, 2], OpCode::PICK, &[1, 3, 2, 1]),
        (&[1, 2, 3, 2], OpCode::ROLL, &[1, 3, 2]),
        (&[1, 2, 3, 1], OpCode::XDROP, &[3, 1]),
        (&[1, 2, 3, 2], OpCode::XSWAP, &[1, 2, 3]),
        (&[1, 2, 3, 2], OpCode::XTUCK, &[3, 2, 3, 1]),
    ];
    for (input, op, expected) in cases {
        let mut builder = ScriptBuilder::new();
        push_ints(&mut builder, input);
        builder.emit_opcode(*op);
        let engine = run(&builder);
        assert_eq!(engine.state(), VMState::HALT, "{op}");
        assert_eq!(ints(&engine), expected.to_vec(), "{op}");
    }
}

#[test]
fn test_alt_stack_round_trip() {
    let mut builder = ScriptBuilder::new();
    builder
        .emit_push_int(1)
        .emit_opcode(OpCode::TOALTSTACK)
        .emit_opcode(OpCode::DUPFROMALTSTACK)
        .emit_opcode(OpCode::FROMALTSTACK);
    let engine = run(&builder);
    assert_eq!(engine.state(), VMState::HALT);
    assert_eq!(ints(&engine), vec![1, 1]);
    assert!(engine.alt_stack().is_empty());
}

#[test]
fn test_xtuck_rejects_zero_depth() {
    let mut builder = ScriptBuilder::new();
    push_ints(&mut builder, &[1, 0]);
    builder.emit_opcode(OpCode::XTUCK);
    assert_eq!(run(&builder).state(), VMState::FAULT);
}

#[test]
fn test_splice() {
    let mut builder = ScriptBuilder::new();
    builder
        .emit_push(b"abc")
        .emit_push(b"de")
        .emit_opcode(OpCode::CAT);
    assert_eq!(top_bytes(&run(&builder)), b"abcde");

    let mut builder = ScriptBuilder::new();
    builder
        .emit_push(b"abcdef")
        .emit_push_int(1)
        .emit_push_int(3)
        .emit_opcode(OpCode::SUBSTR);
    assert_eq!(top_bytes(&run(&builder)), b"bcd");

    let mut builder = ScriptBuilder::new();
    builder
        .emit_push(b"abc")
        .emit_push_int(5)
        .emit_opcode(OpCode::LEFT);
    assert_eq!(top_bytes(&run(&builder)), b"abc");

    let mut builder = ScriptBuilder::new();
    builder
        .emit_push(b"abc")
        .emit_push_int(2)
        .emit_opcode(OpCode::RIGHT);
    assert_eq!(top_bytes(&run(&builder)), b"bc");

    let mut builder = ScriptBuilder::new();
    builder.emit_push(b"abc").emit_opcode(OpCode::SIZE);
    assert_eq!(ints(&run(&builder)), vec![3]);
}

#[test]
fn test_splice_faults() {
    let mut builder = ScriptBuilder::new();
    builder
        .emit_push(b"abc")
        .emit_push_int(5)
        .emit_opcode(OpCode::RIGHT);
    assert_eq!(run(&builder).state(), VMState::FAULT);

    let mut builder = ScriptBuilder::new();
    builder
        .emit_push(b"abc")
        .emit_push_int(-1)
        .emit_opcode(OpCode::LEFT);
    assert_eq!(run(&builder).state(), VMState::FAULT);
}

#[test]
fn test_arithmetic() {
    let cases: &[(&[i64], OpCode, i64)] = &[
        (&[7, 2], OpCode::DIV, 3),
        (&[-7, 2], OpCode::DIV, -3),
        (&[-7, 2], OpCode::MOD, -1),
        (&[6, 7], OpCode::MUL, 42),
        (&[6, 7], OpCode::SUB, -1),
        (&[1, 8], OpCode::SHL, 256),
        (&[256, 4], OpCode::SHR, 16),
        (&[3, 9], OpCode::MIN, 3),
        (&[3, 9], OpCode::MAX, 9),
        (&[12, 10], OpCode::AND, 8),
        (&[12, 10], OpCode::OR, 14),
        (&[12, 10], OpCode::XOR, 6),
        (&[5], OpCode::INVERT, -6),
        (&[-5], OpCode::ABS, 5),
        (&[-5], OpCode::SIGN, -1),
        (&[5], OpCode::NEGATE, -5),
        (&[5], OpCode::INC, 6),
        (&[5], OpCode::DEC, 4),
    ];
    for (input, op, expected) in cases {
        let mut builder = ScriptBuilder::new();
        push_ints(&mut builder, input);
        builder.emit_opcode(*op);
        let engine = run(&builder);
        assert_eq!(engine.state(), VMState::HALT, "{op}");
        assert_eq!(ints(&engine), vec![*expected], "{op}");
    }
}

#[test]
fn test_comparisons() {
    let cases: &[(&[i64], OpCode, bool)] = &[
        (&[1, 2], OpCode::LT, true),
        (&[2, 2], OpCode::LTE, true),
        (&[1, 2], OpCode::GT, false),
        (&[2, 2], OpCode::GTE, true),
        (&[2, 2], OpCode::NUMEQUAL, true),
        (&[2, 3], OpCode::NUMNOTEQUAL, true),
        (&[5, 1, 10], OpCode::WITHIN, true),
        (&[10, 1, 10], OpCode::WITHIN, false),
        (&[1, 0], OpCode::BOOLAND, false),
        (&[1, 0], OpCode::BOOLOR, true),
        (&[0], OpCode::NOT, true),
        (&[3], OpCode::NZ, true),
    ];
    for (input, op, expected) in cases {
        let mut builder = ScriptBuilder::new();
        push_ints(&mut builder, input);
        builder.emit_opcode(*op);
        let engine = run(&builder);
        assert_eq!(engine.state(), VMState::HALT, "{op}");
        assert_eq!(engine.result().map(StackItem::as_bool), Some(*expected), "{op}");
    }
}

#[test]
fn test_equal_compares_values() {
    let mut builder = ScriptBuilder::new();
    builder
        .emit_push_int(1)
        .emit_push_bool(true)
        .emit_opcode(OpCode::EQUAL);
    assert_eq!(run(&builder).result().map(StackItem::as_bool), Some(true));
}

#[test]
fn test_arithmetic_faults() {
    let mut builder = ScriptBuilder::new();
    push_ints(&mut builder, &[1, 0]);
    builder.emit_opcode(OpCode::DIV);
    let engine = run(&builder);
    assert_eq!(engine.state(), VMState::FAULT);

    let mut builder = ScriptBuilder::new();
    push_ints(&mut builder, &[1, 257]);
    builder.emit_opcode(OpCode::SHL);
    assert_eq!(run(&builder).state(), VMState::FAULT);

    // 2^254 still fits in 32 signed bytes, 2^255 does not.
    let mut builder = ScriptBuilder::new();
    push_ints(&mut builder, &[1, 254]);
    builder.emit_opcode(OpCode::SHL);
    assert_eq!(run(&builder).state(), VMState::HALT);

    let mut builder = ScriptBuilder::new();
    push_ints(&mut builder, &[1, 255]);
    builder.emit_opcode(OpCode::SHL);
    let engine = run(&builder);
    assert_eq!(engine.state(), VMState::FAULT);
    assert_eq!(engine.fault_reason(), Some(FaultReason::ResourceExhausted));
}

#[test]
fn test_pack_and_pick() {
    let mut builder = ScriptBuilder::new();
    push_ints(&mut builder, &[3, 2, 1, 3]);
    builder
        .emit_opcode(OpCode::PACK)
        .emit_opcode(OpCode::DUP)
        .emit_push_int(0)
        .emit_opcode(OpCode::PICKITEM)
        .emit_opcode(OpCode::SWAP)
        .emit_opcode(OpCode::ARRAYSIZE);
    let engine = run(&builder);
    assert_eq!(engine.state(), VMState::HALT);
    assert_eq!(ints(&engine), vec![3, 1]);
}

#[test]
fn test_unpack_reverses_and_counts() {
    let mut builder = ScriptBuilder::new();
    push_ints(&mut builder, &[3, 2, 1, 3]);
    builder
        .emit_opcode(OpCode::PACK)
        .emit_opcode(OpCode::UNPACK);
    let engine = run(&builder);
    assert_eq!(ints(&engine), vec![3, 1, 2, 3]);
}

#[test]
fn test_struct_is_copied_on_append() {
    for (constructor, expected) in [(OpCode::NEWSTRUCT, 0), (OpCode::NEWARRAY, 1)] {
        let mut builder = ScriptBuilder::new();
        builder
            .emit_push_int(0)
            .emit_opcode(OpCode::NEWARRAY)
            .emit_opcode(OpCode::DUP)
            .emit_push_int(0)
            .emit_opcode(constructor)
            .emit_opcode(OpCode::DUP)
            .emit_opcode(OpCode::TOALTSTACK)
            .emit_opcode(OpCode::APPEND)
            .emit_opcode(OpCode::FROMALTSTACK)
            .emit_push_int(1)
            .emit_opcode(OpCode::APPEND)
            .emit_push_int(0)
            .emit_opcode(OpCode::PICKITEM)
            .emit_opcode(OpCode::ARRAYSIZE);
        let engine = run(&builder);
        assert_eq!(engine.state(), VMState::HALT, "{constructor}");
        assert_eq!(ints(&engine), vec![expected], "{constructor}");
    }
}

#[test]
fn test_map_operations() {
    let mut builder = ScriptBuilder::new();
    builder
        .emit_opcode(OpCode::NEWMAP)
        .emit_opcode(OpCode::DUP)
        .emit_push(b"k")
        .emit_push_int(5)
        .emit_opcode(OpCode::SETITEM)
        .emit_opcode(OpCode::DUP)
        .emit_push(b"k")
        .emit_opcode(OpCode::PICKITEM)
        .emit_opcode(OpCode::SWAP)
        .emit_opcode(OpCode::DUP)
        .emit_push(b"x")
        .emit_opcode(OpCode::HASKEY)
        .emit_opcode(OpCode::SWAP)
        .emit_opcode(OpCode::KEYS)
        .emit_opcode(OpCode::ARRAYSIZE);
    let engine = run(&builder);
    assert_eq!(engine.state(), VMState::HALT);
    let stack: Vec<_> = engine.evaluation_stack().iter().cloned().collect();
    assert_eq!(stack[0].as_int(), BigInt::from(1));
    assert!(!stack[1].as_bool());
    assert_eq!(stack[2].as_int(), BigInt::from(5));
}

#[test]
fn test_remove_and_reverse() {
    let mut builder = ScriptBuilder::new();
    push_ints(&mut builder, &[3, 2, 1, 3]);
    builder
        .emit_opcode(OpCode::PACK)
        .emit_opcode(OpCode::DUP)
        .emit_push_int(0)
        .emit_opcode(OpCode::REMOVE)
        .emit_opcode(OpCode::DUP)
        .emit_opcode(OpCode::REVERSE)
        .emit_opcode(OpCode::VALUES)
        .emit_opcode(OpCode::UNPACK);
    let engine = run(&builder);
    assert_eq!(engine.state(), VMState::HALT);
    assert_eq!(ints(&engine), vec![2, 3, 2]);
}

#[test]
fn test_compound_faults() {
    let mut builder = ScriptBuilder::new();
    push_ints(&mut builder, &[1, 1]);
    builder
        .emit_opcode(OpCode::PACK)
        .emit_push_int(4)
        .emit_opcode(OpCode::PICKITEM);
    assert_eq!(run(&builder).state(), VMState::FAULT);

    let mut builder = ScriptBuilder::new();
    push_ints(&mut builder, &[7, 0]);
    builder.emit_opcode(OpCode::PICKITEM);
    let engine = run(&builder);
    assert_eq!(engine.state(), VMState::FAULT);
    assert_eq!(engine.fault_reason(), Some(FaultReason::TypeMismatch));

    let mut builder = ScriptBuilder::new();
    builder
        .emit_opcode(OpCode::NEWMAP)
        .emit_push(b"missing")
        .emit_opcode(OpCode::PICKITEM);
    assert_eq!(run(&builder).state(), VMState::FAULT);
}

#[test]
fn test_throw() {
    let mut builder = ScriptBuilder::new();
    builder.emit_push_int(1).emit_opcode(OpCode::THROWIFNOT);
    assert_eq!(run(&builder).state(), VMState::HALT);

    let mut builder = ScriptBuilder::new();
    builder.emit_push_int(0).emit_opcode(OpCode::THROWIFNOT);
    let engine = run(&builder);
    assert_eq!(engine.state(), VMState::FAULT);
    assert!(matches!(engine.fault_error(), Some(VmError::Throw)));
}

#[test]
fn test_hash_opcodes() {
    let mut builder = ScriptBuilder::new();
    builder.emit_push(b"abc").emit_opcode(OpCode::SHA256);
    assert_eq!(
        hex::encode(top_bytes(&run(&builder))),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );

    for (op, len) in [(OpCode::SHA1, 20), (OpCode::HASH160, 20), (OpCode::HASH256, 32)] {
        let mut builder = ScriptBuilder::new();
        builder.emit_push(b"abc").emit_opcode(op);
        assert_eq!(top_bytes(&run(&builder)).len(), len, "{op}");
    }
}

struct Signer3 {
    keys: Vec<SigningKey>,
    tx: Rc<Transaction>,
}

impl Signer3 {
    fn new() -> Self {
        let keys = (1u8..=3)
            .map(|seed| SigningKey::from_slice(&[seed; 32]).unwrap())
            .collect();
        Self {
            keys,
            tx: Rc::new(Transaction::invoke(vec![OpCode::PUSH1.as_byte()])),
        }
    }

    fn public_key(&self, index: usize) -> Vec<u8> {
        self.keys[index]
            .verifying_key()
            .to_encoded_point(true)
            .as_bytes()
            .to_vec()
    }

    fn signature(&self, index: usize) -> Vec<u8> {
        let signature: Signature = self.keys[index].sign(&self.tx.sign_data());
        signature.to_bytes().to_vec()
    }

    fn run(&self, builder: &ScriptBuilder) -> ExecutionEngine {
        let mut engine =
            ExecutionEngine::new(InteropService::new()).with_container(self.tx.clone());
        engine.load_script(builder.to_array(), false).unwrap();
        engine.execute();
        engine
    }
}

#[test]
fn test_checksig() {
    let signer = Signer3::new();
    let mut builder = ScriptBuilder::new();
    builder
        .emit_push(&signer.signature(0))
        .emit_push(&signer.public_key(0))
        .emit_opcode(OpCode::CHECKSIG);
    let engine = signer.run(&builder);
    assert_eq!(engine.state(), VMState::HALT);
    assert_eq!(engine.result().map(StackItem::as_bool), Some(true));

    let mut builder = ScriptBuilder::new();
    builder
        .emit_push(&signer.signature(0))
        .emit_push(&signer.public_key(1))
        .emit_opcode(OpCode::CHECKSIG);
    assert_eq!(signer.run(&builder).result().map(StackItem::as_bool), Some(false));

    // No container, nothing to verify against.
    let mut builder = ScriptBuilder::new();
    builder
        .emit_push(&signer.signature(0))
        .emit_push(&signer.public_key(0))
        .emit_opcode(OpCode::CHECKSIG);
    assert_eq!(run(&builder).state(), VMState::FAULT);
}

#[test]
fn test_checkmultisig_requires_key_order() {
    let signer = Signer3::new();
    let script = |first: usize, second: usize| {
        let mut builder = ScriptBuilder::new();
        builder
            .emit_push(&signer.signature(first))
            .emit_push(&signer.signature(second))
            .emit_push_int(2);
        for index in 0..3 {
            builder.emit_push(&signer.public_key(index));
        }
        builder.emit_push_int(3).emit_opcode(OpCode::CHECKMULTISIG);
        builder
    };

    let engine = signer.run(&script(0, 2));
    assert_eq!(engine.state(), VMState::HALT);
    assert_eq!(engine.result().map(StackItem::as_bool), Some(true));

    let engine = signer.run(&script(2, 0));
    assert_eq!(engine.state(), VMState::HALT);
    assert_eq!(engine.result().map(StackItem::as_bool), Some(false));
}
