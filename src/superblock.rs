use tracing::{debug, warn};
use crate::context::make_buffer;
use crate::decode::{decode_u16, decode_u32};
use crate::error::{Error, Result};
use crate::options::Options;
use crate::volume::Volume;

pub const SUPERBLOCK_OFFSET: u64 = 1024;
pub const SUPERBLOCK_SIZE: u64 = 1024;
pub const MAGIC: u16 = 0xef53;
pub const STATE_CLEAN: u16 = 1;
pub const MAX_LOG_BLOCK_SIZE: u32 = 6;
pub const GOOD_OLD_INODE_SIZE: u16 = 128;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Superblock {
  pub inodes_count: u32,
  pub blocks_count: u32,
  pub first_data_block: u32,
  pub log_block_size: u32,
  pub blocks_per_group: u32,
  pub inodes_per_group: u32,
  pub magic: u16,
  pub state: u16,
  pub rev_level: u32,
  pub inode_size: u16,
}

impl Superblock {
  pub fn read(volume: &dyn Volume, options: &Options) -> Result<Superblock> {
    let mut superblock_buf = make_buffer(SUPERBLOCK_SIZE)?;
    volume.read(SUPERBLOCK_OFFSET, &mut superblock_buf[..])?;
    let superblock = Superblock::decode(&superblock_buf[..])?;
    superblock.check(options)?;
    Ok(superblock)
  }

  pub fn decode(bytes: &[u8]) -> Result<Superblock> {
    if bytes.len() < 90 {
      return Err(Error::decode(
        format!("Superblock needs at least 90 bytes, got {}", bytes.len())));
    }
    let rev = decode_u32(&bytes[76..]);
    let superblock = Superblock {
      inodes_count: decode_u32(&bytes[0..]),
      blocks_count: decode_u32(&bytes[4..]),
      first_data_block: decode_u32(&bytes[20..]),
      log_block_size: decode_u32(&bytes[24..]),
      blocks_per_group: decode_u32(&bytes[32..]),
      inodes_per_group: decode_u32(&bytes[40..]),
      magic: decode_u16(&bytes[56..]),
      state: decode_u16(&bytes[58..]),
      rev_level: rev,
      inode_size: if rev >= 1 { decode_u16(&bytes[88..]) } else { GOOD_OLD_INODE_SIZE },
    };

    if superblock.blocks_per_group == 0 {
      return Err(Error::decode("Blocks per group is zero"));
    }
    if superblock.inodes_per_group == 0 {
      return Err(Error::decode("Inodes per group is zero"));
    }
    if superblock.log_block_size > MAX_LOG_BLOCK_SIZE {
      return Err(Error::decode(format!(
        "Block size exponent {} is larger than {}",
        superblock.log_block_size, MAX_LOG_BLOCK_SIZE)));
    }
    let inode_size = superblock.inode_size as u64;
    if inode_size < GOOD_OLD_INODE_SIZE as u64 || inode_size > superblock.block_size() {
      return Err(Error::decode(format!("Invalid inode size {}", inode_size)));
    }

    debug!(
      inodes = superblock.inodes_count,
      blocks = superblock.blocks_count,
      block_size = superblock.block_size(),
      groups = superblock.group_count(),
      "decoded superblock");
    Ok(superblock)
  }

  fn check(&self, options: &Options) -> Result<()> {
    if self.magic != MAGIC {
      if options.require_magic {
        return Err(Error::decode(
          format!("Bad magic 0x{:x}, expected 0x{:x}", self.magic, MAGIC)));
      }
      warn!(magic = self.magic, "superblock magic does not match ext2");
    }
    if !self.is_clean() {
      if options.require_clean {
        return Err(Error::decode(
          format!("Volume is in an invalid state (0x{:x})", self.state)));
      }
      warn!(state = self.state, "volume was not cleanly unmounted");
    }
    Ok(())
  }

  pub fn block_size(&self) -> u64 {
    1024 << self.log_block_size
  }

  /// Number of 32-bit block pointers held by one indirect block.
  pub fn pointers_per_block(&self) -> u64 {
    self.block_size() / 4
  }

  pub fn group_count(&self) -> u64 {
    let blocks_per_group = self.blocks_per_group as u64;
    (self.blocks_count as u64 + blocks_per_group - 1) / blocks_per_group
  }

  pub fn is_clean(&self) -> bool {
    self.state == STATE_CLEAN
  }
}
