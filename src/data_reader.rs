use tracing::trace;
use crate::context::Context;
use crate::decode::decode_pointers;
use crate::error::{Error, Result};
use crate::inode::{Inode, DIRECT_BLOCKS, SINGLE_INDIRECT, DOUBLE_INDIRECT, TRIPLE_INDIRECT};

/// Where a logical file block lives.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BlockRef {
  Block(u64),
  /// A zero pointer somewhere on the path; reads as zeros.
  Hole,
}

/// Position of a logical block in the pointer tree, as entry indices from the
/// outermost indirect block inwards.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum BlockPos {
  Level0(u64),
  Level1(u64),
  Level2(u64, u64),
  Level3(u64, u64, u64),
  OutOfRange,
}

impl BlockPos {
  pub fn of(pointers_per_block: u64, file_block: u64) -> BlockPos {
    let indirect_1_size = pointers_per_block;
    let indirect_2_size = indirect_1_size * indirect_1_size;
    let indirect_3_size = indirect_1_size * indirect_2_size;
    let direct = DIRECT_BLOCKS as u64;

    if file_block < direct {
      return BlockPos::Level0(file_block);
    }
    let rel = file_block - direct;
    if rel < indirect_1_size {
      return BlockPos::Level1(rel);
    }
    let rel = rel - indirect_1_size;
    if rel < indirect_2_size {
      return BlockPos::Level2(rel / indirect_1_size, rel % indirect_1_size);
    }
    let rel = rel - indirect_2_size;
    if rel < indirect_3_size {
      BlockPos::Level3(rel / indirect_2_size,
        (rel / indirect_1_size) % indirect_1_size,
        rel % indirect_1_size)
    } else {
      BlockPos::OutOfRange
    }
  }

  /// Index into the inode's pointer array, then the entry to take at each
  /// indirect level.
  fn path(&self) -> Option<(usize, [u64; 3], usize)> {
    match *self {
      BlockPos::Level0(i) => Some((i as usize, [0; 3], 0)),
      BlockPos::Level1(i0) => Some((SINGLE_INDIRECT, [i0, 0, 0], 1)),
      BlockPos::Level2(i1, i0) => Some((DOUBLE_INDIRECT, [i1, i0, 0], 2)),
      BlockPos::Level3(i2, i1, i0) => Some((TRIPLE_INDIRECT, [i2, i1, i0], 3)),
      BlockPos::OutOfRange => None,
    }
  }
}

/// First logical block past the triple indirect range.
pub fn max_file_blocks(pointers_per_block: u64) -> u64 {
  let n = pointers_per_block;
  DIRECT_BLOCKS as u64 + n + n * n + n * n * n
}

/// Maps logical block `file_block` of `inode` to a physical block.
pub fn resolve_block(ctx: &Context, inode: &Inode, file_block: u64) -> Result<BlockRef> {
  let pointers_per_block = ctx.superblock().pointers_per_block();
  let pos = BlockPos::of(pointers_per_block, file_block);
  let (root, entries, depth) = match pos.path() {
    Some(path) => path,
    None => return Err(Error::bounds("file block", file_block,
        max_file_blocks(pointers_per_block))),
  };

  let mut block = inode.block[root] as u64;
  for &entry in &entries[..depth] {
    if block == 0 {
      break;
    }
    let pointers = read_indirect(ctx, block)?;
    trace!(ino = inode.ino, file_block, indirect = block, entry, "follow indirect");
    block = pointers[entry as usize] as u64;
  }

  if block == 0 {
    trace!(ino = inode.ino, file_block, "hole");
    return Ok(BlockRef::Hole);
  }
  ctx.check_block(block)?;
  Ok(BlockRef::Block(block))
}

fn read_indirect(ctx: &Context, indirect_block: u64) -> Result<Vec<u32>> {
  let bytes = ctx.read_block(indirect_block)?;
  Ok(decode_pointers(&bytes[..]))
}
