/// Where the block group descriptor table starts.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DescTableLocation {
  /// The block right after the one holding the superblock
  /// (`first_data_block + 1`).
  AfterSuperblock,
  /// Byte `block_size * 2`, regardless of the block size. Only agrees with
  /// `AfterSuperblock` on 1 KiB volumes.
  DoubleBlockSize,
}

/// What bit 0 of a group's block bitmap stands for.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BitmapBase {
  /// Group is `block / blocks_per_group`, bit 0 is the group's first block
  /// counted from block 0.
  Absolute,
  /// Block numbers are taken relative to `first_data_block` first.
  FirstDataBlock,
}

#[derive(Debug, Copy, Clone)]
pub struct Options {
  pub desc_table: DescTableLocation,
  pub bitmap_base: BitmapBase,
  /// Refuse volumes whose superblock magic is not 0xef53.
  pub require_magic: bool,
  /// Refuse volumes that were not cleanly unmounted.
  pub require_clean: bool,
}

impl Default for Options {
  fn default() -> Options {
    Options {
      desc_table: DescTableLocation::AfterSuperblock,
      bitmap_base: BitmapBase::Absolute,
      require_magic: false,
      require_clean: false,
    }
  }
}
