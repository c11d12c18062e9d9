use tracing::trace;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::options::BitmapBase;
use crate::superblock::Superblock;

/// Group index and index within the group of inode `ino` (1-based).
/// Inode 0 does not exist; it maps to the same slot as inode 1.
pub fn ino_group(superblock: &Superblock, ino: u64) -> (u64, u64) {
  let group_size = superblock.inodes_per_group as u64;
  let index = ino.saturating_sub(1);
  (index / group_size, index % group_size)
}

/// Group index and index within the group of `block`.
pub fn block_group(superblock: &Superblock, base: BitmapBase, block: u64) -> (u64, u64) {
  let group_size = superblock.blocks_per_group as u64;
  let rel_block = match base {
    BitmapBase::Absolute => block,
    BitmapBase::FirstDataBlock => block.saturating_sub(superblock.first_data_block as u64),
  };
  (rel_block / group_size, rel_block % group_size)
}

/// Whether `block` is marked free in its group's block bitmap.
pub fn is_block_free(ctx: &Context, block: u64) -> Result<bool> {
  ctx.check_block(block)?;
  let (group_idx, local_idx) = block_group(ctx.superblock(), ctx.options().bitmap_base, block);
  let desc = ctx.read_group_desc(group_idx)?;
  trace!(block, group_idx, local_idx, bitmap = desc.block_bitmap, "block bitmap lookup");
  let allocated = test_bit(ctx, desc.block_bitmap as u64, local_idx)?;
  Ok(!allocated)
}

/// Whether inode `ino` is marked free in its group's inode bitmap.
pub fn is_inode_free(ctx: &Context, ino: u64) -> Result<bool> {
  let inodes_count = ctx.superblock().inodes_count as u64;
  if ino == 0 || ino > inodes_count {
    return Err(Error::bounds("inode", ino, inodes_count));
  }
  let (group_idx, local_idx) = ino_group(ctx.superblock(), ino);
  let desc = ctx.read_group_desc(group_idx)?;
  trace!(ino, group_idx, local_idx, bitmap = desc.inode_bitmap, "inode bitmap lookup");
  let allocated = test_bit(ctx, desc.inode_bitmap as u64, local_idx)?;
  Ok(!allocated)
}

fn test_bit(ctx: &Context, bitmap_block: u64, local_idx: u64) -> Result<bool> {
  let bitmap = ctx.read_block(bitmap_block)?;
  let (local_byte, local_bit) = (local_idx / 8, local_idx % 8);
  let byte = match bitmap.get(local_byte as usize) {
    Some(byte) => *byte,
    None => return Err(Error::bounds("bitmap byte", local_byte, bitmap.len() as u64)),
  };
  Ok((byte >> local_bit) & 1 == 1)
}
