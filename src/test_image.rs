//! Builder for small synthetic images used by the unit tests.
//!
//! Every group gets the same layout relative to its first block `base`:
//! descriptor table (group 0 only) at `base + 1`, block bitmap at
//! `base + 2`, inode bitmap at `base + 3` and inode table from `base + 4`.
//! Bitmaps start out all zero.

use crate::context::Context;
use crate::group_desc::GroupDesc;
use crate::options::Options;
use crate::volume::MemVolume;

pub const INODES_PER_GROUP: u32 = 16;

#[derive(Debug, Copy, Clone)]
pub struct SuperblockSpec {
  pub inodes_count: u32,
  pub blocks_count: u32,
  pub first_data_block: u32,
  pub log_block_size: u32,
  pub blocks_per_group: u32,
  pub inodes_per_group: u32,
  pub state: u16,
}

impl SuperblockSpec {
  pub fn write(&self, image: &mut [u8]) {
    let sb = &mut image[1024..2048];
    put_u32(sb, 0, self.inodes_count);
    put_u32(sb, 4, self.blocks_count);
    put_u32(sb, 20, self.first_data_block);
    put_u32(sb, 24, self.log_block_size);
    put_u32(sb, 32, self.blocks_per_group);
    put_u32(sb, 40, self.inodes_per_group);
    sb[58..60].copy_from_slice(&self.state.to_le_bytes());
  }
}

#[derive(Debug, Copy, Clone, Default)]
pub struct InodeSpec {
  pub mode: u16,
  pub uid: u16,
  pub size: u32,
  /// atime, ctime, mtime, dtime
  pub times: [u32; 4],
  pub block: [u32; 15],
}

#[derive(Clone)]
pub struct TestImage {
  pub bytes: Vec<u8>,
  pub superblock: SuperblockSpec,
}

impl TestImage {
  pub fn new(log_block_size: u32, blocks_count: u32, blocks_per_group: u32) -> TestImage {
    let block_size = 1024usize << log_block_size;
    let groups = (blocks_count + blocks_per_group - 1) / blocks_per_group;
    let superblock = SuperblockSpec {
      inodes_count: groups * INODES_PER_GROUP,
      blocks_count,
      first_data_block: if log_block_size == 0 { 1 } else { 0 },
      log_block_size,
      blocks_per_group,
      inodes_per_group: INODES_PER_GROUP,
      state: 1,
    };
    let mut image = TestImage {
      bytes: vec![0; blocks_count as usize * block_size],
      superblock,
    };
    superblock.write(&mut image.bytes);
    for group in 0..groups as u64 {
      let desc = image.group_desc(group);
      image.put_group_desc(group, desc);
    }
    image
  }

  pub fn block_size(&self) -> usize {
    1024 << self.superblock.log_block_size
  }

  pub fn pointers_per_block(&self) -> u64 {
    self.block_size() as u64 / 4
  }

  /// The layout-derived descriptor of `group`.
  pub fn group_desc(&self, group: u64) -> GroupDesc {
    let base = self.superblock.first_data_block + group as u32 * self.superblock.blocks_per_group;
    GroupDesc { block_bitmap: base + 2, inode_bitmap: base + 3, inode_table: base + 4 }
  }

  pub fn group0(&self) -> GroupDesc {
    self.group_desc(0)
  }

  pub fn put_group_desc(&mut self, group: u64, desc: GroupDesc) {
    let table = (self.superblock.first_data_block as usize + 1) * self.block_size();
    let record = &mut self.bytes[table + 32 * group as usize..][..32];
    put_u32(record, 0, desc.block_bitmap);
    put_u32(record, 4, desc.inode_bitmap);
    put_u32(record, 8, desc.inode_table);
  }

  pub fn inode_offset(&self, ino: u64) -> usize {
    let group = (ino - 1) / INODES_PER_GROUP as u64;
    let index = (ino - 1) % INODES_PER_GROUP as u64;
    let table = self.group_desc(group).inode_table as usize;
    table * self.block_size() + index as usize * 128
  }

  pub fn put_inode(&mut self, ino: u64, spec: &InodeSpec) {
    let offset = self.inode_offset(ino);
    let record = &mut self.bytes[offset..offset + 128];
    record[0..2].copy_from_slice(&spec.mode.to_le_bytes());
    record[2..4].copy_from_slice(&spec.uid.to_le_bytes());
    put_u32(record, 4, spec.size);
    for (i, time) in spec.times.iter().enumerate() {
      put_u32(record, 8 + 4 * i, *time);
    }
    for (i, pointer) in spec.block.iter().enumerate() {
      put_u32(record, 40 + 4 * i, *pointer);
    }
  }

  /// Marks the image as revision 1 with 128-byte inode records.
  pub fn set_dynamic_revision(&mut self) {
    put_u32(&mut self.bytes, 1024 + 76, 1);
    self.bytes[1024 + 88..1024 + 90].copy_from_slice(&128u16.to_le_bytes());
  }

  /// Sets the high 32 bits of the size of inode `ino`.
  pub fn put_size_high(&mut self, ino: u64, size_high: u32) {
    let offset = self.inode_offset(ino);
    put_u32(&mut self.bytes, offset + 108, size_high);
  }

  pub fn put_block(&mut self, block: u64, data: &[u8]) {
    let offset = block as usize * self.block_size();
    self.bytes[offset..offset + data.len()].copy_from_slice(data);
  }

  /// Writes `pointers` at the start of `block`, zeroing the rest of it.
  pub fn put_pointers(&mut self, block: u64, pointers: &[u32]) {
    let mut data = vec![0; self.block_size()];
    for (i, pointer) in pointers.iter().enumerate() {
      put_u32(&mut data, 4 * i, *pointer);
    }
    self.put_block(block, &data);
  }

  pub fn set_bit(&mut self, bitmap_block: u64, bit: u64) {
    let offset = bitmap_block as usize * self.block_size() + (bit / 8) as usize;
    self.bytes[offset] |= 1 << (bit % 8);
  }

  pub fn context(&self) -> Context {
    self.context_with(Options::default())
  }

  pub fn context_with(&self, options: Options) -> Context {
    Context::open_with(Box::new(MemVolume(self.bytes.clone())), options).unwrap()
  }
}

fn put_u32(bytes: &mut [u8], offset: usize, value: u32) {
  bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}
