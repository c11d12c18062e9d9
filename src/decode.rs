//! Little-endian field decoding.
//!
//! Everything on an ext2 volume is stored little-endian. Structures are never
//! overlaid on raw bytes; each field is decoded from its byte position into a
//! host integer, so a value passes through here exactly once.

pub fn decode_u16(bytes: &[u8]) -> u16 {
  u16::from_le_bytes([bytes[0], bytes[1]])
}

pub fn decode_u32(bytes: &[u8]) -> u32 {
  u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

/// Decodes a block of 32-bit block pointers. Trailing bytes that do not form
/// a whole entry are ignored.
pub fn decode_pointers(bytes: &[u8]) -> Vec<u32> {
  bytes.chunks_exact(4).map(decode_u32).collect()
}
