use crate::decode::decode_u32;
use crate::error::{Error, Result};

pub const GROUP_DESC_SIZE: u64 = 32;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct GroupDesc {
  pub block_bitmap: u32,
  pub inode_bitmap: u32,
  pub inode_table: u32,
}

impl GroupDesc {
  pub fn decode(bytes: &[u8]) -> Result<GroupDesc> {
    if bytes.len() < 12 {
      return Err(Error::decode(
        format!("Group descriptor needs 12 bytes, got {}", bytes.len())));
    }
    Ok(GroupDesc {
      block_bitmap: decode_u32(&bytes[0..]),
      inode_bitmap: decode_u32(&bytes[4..]),
      inode_table: decode_u32(&bytes[8..]),
    })
  }
}
