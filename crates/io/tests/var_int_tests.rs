use proptest::prelude::*;
use sidechain_io::{helper, BinaryWriter, MemoryReader};

proptest! {
    #[test]
    fn var_int_decodes_to_written_value(value in any::<u64>()) {
        let mut writer = BinaryWriter::new();
        writer.write_var_int(value);
        prop_assert_eq!(writer.len(), helper::get_var_size(value));

        let bytes = writer.into_bytes();
        let mut reader = MemoryReader::new(&bytes);
        prop_assert_eq!(reader.read_var_int(u64::MAX).unwrap(), value);
        prop_assert!(reader.is_empty());
    }

    #[test]
    fn var_bytes_respect_bound(data in proptest::collection::vec(any::<u8>(), 0..300)) {
        let mut writer = BinaryWriter::new();
        writer.write_var_bytes(&data);
        let bytes = writer.into_bytes();

        let mut reader = MemoryReader::new(&bytes);
        prop_assert_eq!(reader.read_var_bytes(300).unwrap(), data.clone());

        if !data.is_empty() {
            let mut reader = MemoryReader::new(&bytes);
            prop_assert!(reader.read_var_bytes(data.len() - 1).is_err());
        }
    }
}
