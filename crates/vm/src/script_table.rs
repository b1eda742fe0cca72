use sidechain_core::UInt168;

/// Resolves the code of a deployed contract for `APPCALL` and `TAILCALL`.
pub trait ScriptTable {
    fn get_script(&self, code_hash: &UInt168) -> Option<Vec<u8>>;
}

impl<F> ScriptTable for F
where
    F: Fn(&UInt168) -> Option<Vec<u8>>,
{
    fn get_script(&self, code_hash: &UInt168) -> Option<Vec<u8>> {
        self(code_hash)
    }
}
