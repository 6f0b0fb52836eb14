use crate::foundation::types::Hash32;
use crate::foundation::VaultError;

pub fn decode_hex(s: &str) -> Result<Vec<u8>, VaultError> {
    hex::decode(s).map_err(|e| e.into())
}

/// Parses a 32-byte value from hex, accepting an optional `0x` prefix.
pub fn parse_hex_32bytes(s: &str) -> Result<Hash32, VaultError> {
    let raw = s.strip_prefix("0x").unwrap_or(s);
    let bytes = decode_hex(raw)?;
    bytes
        .try_into()
        .map_err(|_| VaultError::EncodingError(format!("expected 32 bytes of hex, got {} chars", raw.len())))
}
