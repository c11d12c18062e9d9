//! Guesses about the role of a data block, for poking at images whose
//! inodes are damaged. A block full of small numbers may just as well be
//! ordinary data; these checks only rule blocks out.

use crate::context::Context;
use crate::decode::decode_pointers;
use crate::error::Result;
use crate::superblock::Superblock;

/// Whether every 32-bit entry of `block` is a valid block number.
pub fn looks_indirect(superblock: &Superblock, block: &[u8]) -> bool {
  let blocks_count = superblock.blocks_count;
  decode_pointers(block).iter().all(|&entry| entry < blocks_count)
}

/// Whether every entry of `block` names a block that itself looks like a
/// single indirect block. Each referenced block is read; a failed read is an
/// error.
pub fn looks_double_indirect(ctx: &Context, block: &[u8]) -> Result<bool> {
  let superblock = ctx.superblock();
  if !looks_indirect(superblock, block) {
    return Ok(false);
  }
  for entry in decode_pointers(block) {
    let child = ctx.read_block(entry as u64)?;
    if !looks_indirect(superblock, &child[..]) {
      return Ok(false);
    }
  }
  Ok(true)
}
