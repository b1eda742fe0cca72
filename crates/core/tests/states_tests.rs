//! Encoding of ledger states and chain types as the store sees them.

use sidechain_core::{
    create_signature_redeem_script, to_code_hash, to_program_hash, AccountState, AssetState,
    AssetType, ContractState, Fixed64, FunctionCode, Header, ProgramPrefix, StateKind,
    StateValue, StorageItem, StorageKey, Transaction, UInt168, UInt256,
};
use sidechain_io::SerializableExt;

fn sample_asset() -> AssetState {
    AssetState {
        asset_id: UInt256::from_bytes(&[7u8; 32]).unwrap(),
        asset_type: AssetType::Share,
        name: "share".to_string(),
        amount: Fixed64::from_units(1_000),
        available: Fixed64::ZERO,
        precision: 8,
        owner: vec![0x02; 33],
        admin: UInt168::from_bytes(&[0x21; 21]).unwrap(),
        issuer: UInt168::from_bytes(&[0x12; 21]).unwrap(),
        expiration: 2_000_001,
        is_frozen: false,
    }
}

#[test]
fn test_storage_key_is_hash_then_var_bytes() {
    let code_hash = to_code_hash(&[0x51, 0x66]);
    let key = StorageKey::new(code_hash, b"abc".to_vec());
    let encoded = key.to_array();

    assert_eq!(&encoded[..21], code_hash.as_bytes());
    assert_eq!(&encoded[21..], &[3, b'a', b'b', b'c']);
    assert_eq!(StorageKey::from_array(&encoded).unwrap(), key);
}

#[test]
fn test_states_decode_by_kind() {
    let values = [
        StateValue::Storage(StorageItem::new(vec![1, 2, 3])),
        StateValue::Asset(sample_asset()),
        StateValue::Account(AccountState::new(UInt168::from_bytes(&[0x21; 21]).unwrap())),
        StateValue::Contract(ContractState {
            code: FunctionCode::new(vec![0x51, 0x66], vec![0x05], 0x01),
            name: "n".into(),
            version: "v".into(),
            author: "a".into(),
            email: "e".into(),
            description: "d".into(),
        }),
    ];
    for value in values {
        let bytes = value.to_bytes();
        assert_eq!(bytes[0], 0, "state version byte");
        assert_eq!(StateValue::from_bytes(value.kind(), &bytes).unwrap(), value);
    }
}

#[test]
fn test_wrong_kind_fails_to_decode() {
    let bytes = StateValue::Asset(sample_asset()).to_bytes();
    assert!(StateValue::from_bytes(StateKind::Storage, &bytes).is_err());
}

#[test]
fn test_program_hash_prefixes() {
    let key = [0x02; 33];
    let redeem = create_signature_redeem_script(&key);
    assert_eq!(to_program_hash(&redeem).prefix(), ProgramPrefix::Standard as u8);

    let code = vec![0x51, 0x66];
    let contract_hash = to_code_hash(&code);
    assert_eq!(contract_hash.prefix(), ProgramPrefix::SmartContract as u8);
    assert_eq!(FunctionCode::new(code, Vec::new(), 0).code_hash(), contract_hash);
}

#[test]
fn test_transaction_encoding_and_hash() {
    let tx = Transaction::invoke(vec![0x51]);
    let decoded = Transaction::from_array(&tx.to_array()).unwrap();
    assert_eq!(decoded, tx);
    assert_eq!(decoded.invoke_code(), Some(&[0x51][..]));

    let mut changed = tx.clone();
    changed.lock_time = 9;
    assert_ne!(changed.hash(), tx.hash());
}

#[test]
fn test_header_hash_tracks_height() {
    let header = Header {
        version: 0,
        previous: UInt256::zero(),
        merkle_root: UInt256::zero(),
        timestamp: 1,
        bits: 0,
        height: 1,
        nonce: 0,
    };
    let next = Header {
        height: 2,
        ..header.clone()
    };
    assert_ne!(header.hash(), next.hash());
    assert_eq!(Header::from_array(&header.to_array()).unwrap(), header);
}

#[test]
fn test_asset_state_json_keeps_every_field() {
    let asset = sample_asset();
    let json = serde_json::to_value(&asset).unwrap();
    assert_eq!(json["name"], "share");
    assert_eq!(json["expiration"], 2_000_001);

    let back: AssetState = serde_json::from_value(json).unwrap();
    assert_eq!(back, asset);
}
