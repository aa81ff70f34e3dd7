//! Length counters (`writers/length`, `license/count`): 4-byte big-endian u32

use crate::errors::{CodecError, CodecResult};

/// Width of an encoded counter
pub const COUNTER_BYTE_LENGTH: usize = 4;

/// Encode a counter value
pub fn encode(value: u32) -> [u8; COUNTER_BYTE_LENGTH] {
    value.to_be_bytes()
}

/// Decode a counter value
pub fn decode(bytes: &[u8]) -> CodecResult<u32> {
    let array: [u8; COUNTER_BYTE_LENGTH] = bytes
        .try_into()
        .map_err(|_| CodecError::length("counter", COUNTER_BYTE_LENGTH, bytes.len()))?;
    Ok(u32::from_be_bytes(array))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters() {
        assert_eq!(encode(1), [0, 0, 0, 1]);
        assert_eq!(decode(&encode(70_000)), Ok(70_000));
        assert!(decode(&[0, 1]).is_err());
        assert!(decode(&[0, 0, 0, 0, 1]).is_err());
    }
}
