use tracing::{debug, trace};
use crate::data_reader::{self, BlockRef};
use crate::error::{Error, Result};
use crate::group::{self, ino_group};
use crate::group_desc::{GroupDesc, GROUP_DESC_SIZE};
use crate::inode::Inode;
use crate::options::{DescTableLocation, Options};
use crate::read_file::{self, FileChunks};
use crate::superblock::Superblock;
use crate::volume::Volume;

/// An opened image: the volume it is read from and its superblock.
///
/// Nothing besides the superblock is cached. Group descriptors, inodes and
/// data blocks are read again on every request.
pub struct Context {
  volume: Box<dyn Volume>,
  superblock: Superblock,
  options: Options,
}

impl Context {
  pub fn open(volume: Box<dyn Volume>) -> Result<Context> {
    Context::open_with(volume, Options::default())
  }

  pub fn open_with(volume: Box<dyn Volume>, options: Options) -> Result<Context> {
    let superblock = Superblock::read(&*volume, &options)?;
    debug!(?options, "opened ext2 image");
    Ok(Context { volume, superblock, options })
  }

  pub fn superblock(&self) -> &Superblock {
    &self.superblock
  }

  pub fn options(&self) -> &Options {
    &self.options
  }

  pub fn block_size(&self) -> u64 {
    self.superblock.block_size()
  }

  pub fn read(&self, offset: u64, buffer: &mut [u8]) -> Result<()> {
    trace!(offset, len = buffer.len(), "read");
    self.volume.read(offset, buffer)
  }

  /// Reads one whole block.
  pub fn read_block(&self, block: u64) -> Result<Vec<u8>> {
    self.check_block(block)?;
    let mut buffer = make_buffer(self.block_size())?;
    self.read(block * self.block_size(), &mut buffer[..])?;
    Ok(buffer)
  }

  pub fn read_group_desc(&self, group_idx: u64) -> Result<GroupDesc> {
    let group_count = self.superblock.group_count();
    if group_idx >= group_count {
      return Err(Error::bounds("group", group_idx, group_count));
    }
    let offset = self.desc_table_offset() + group_idx * GROUP_DESC_SIZE;
    trace!(group_idx, offset, "read group descriptor");
    let mut desc_buf = make_buffer(GROUP_DESC_SIZE)?;
    self.read(offset, &mut desc_buf[..])?;
    GroupDesc::decode(&desc_buf[..])
  }

  pub fn read_inode(&self, ino: u64) -> Result<Inode> {
    let inodes_count = self.superblock.inodes_count as u64;
    if ino == 0 || ino > inodes_count {
      return Err(Error::bounds("inode", ino, inodes_count));
    }
    let (group_idx, local_idx) = ino_group(&self.superblock, ino);
    let group_desc = self.read_group_desc(group_idx)?;
    let inode_size = self.superblock.inode_size as u64;
    let offset = group_desc.inode_table as u64 * self.block_size()
        + local_idx * inode_size;
    trace!(ino, group_idx, local_idx, offset, "read inode");

    let mut inode_buf = make_buffer(inode_size)?;
    self.read(offset, &mut inode_buf[..])?;
    Inode::decode(&self.superblock, ino, &inode_buf[..])
  }

  pub fn resolve_block(&self, inode: &Inode, file_block: u64) -> Result<BlockRef> {
    data_reader::resolve_block(self, inode, file_block)
  }

  pub fn file_chunks<'c>(&'c self, inode: &Inode) -> FileChunks<'c> {
    read_file::file_chunks(self, inode)
  }

  pub fn is_block_free(&self, block: u64) -> Result<bool> {
    group::is_block_free(self, block)
  }

  pub fn is_inode_free(&self, ino: u64) -> Result<bool> {
    group::is_inode_free(self, ino)
  }

  pub(crate) fn check_block(&self, block: u64) -> Result<()> {
    let blocks_count = self.superblock.blocks_count as u64;
    if block >= blocks_count {
      return Err(Error::bounds("block", block, blocks_count));
    }
    Ok(())
  }

  fn desc_table_offset(&self) -> u64 {
    match self.options.desc_table {
      DescTableLocation::AfterSuperblock =>
        (self.superblock.first_data_block as u64 + 1) * self.block_size(),
      DescTableLocation::DoubleBlockSize =>
        self.block_size() * 2,
    }
  }
}

/// Allocates a zeroed buffer, reporting failure instead of aborting.
pub fn make_buffer(size: u64) -> Result<Vec<u8>> {
  let size = size as usize;
  let mut buffer = Vec::new();
  buffer.try_reserve_exact(size).map_err(|_| Error::Alloc { size })?;
  buffer.resize(size, 0);
  Ok(buffer)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_image::TestImage;
  use crate::volume::MemVolume;

  #[test]
  fn read_block_returns_whole_block() {
    let mut image = TestImage::new(0, 200, 100);
    image.put_block(50, &[7; 1024]);
    let ctx = image.context();
    let block = ctx.read_block(50).unwrap();
    assert_eq!(block.len(), 1024);
    assert!(block.iter().all(|&b| b == 7));
  }

  #[test]
  fn read_block_past_declared_count() {
    let ctx = TestImage::new(0, 200, 100).context();
    assert!(matches!(ctx.read_block(200), Err(Error::Bounds { what: "block", .. })));
  }

  #[test]
  fn read_block_past_end_of_image() {
    let image = TestImage::new(0, 200, 100);
    let mut bytes = image.bytes.clone();
    bytes.truncate(150 * 1024 + 10);
    let ctx = Context::open(Box::new(MemVolume(bytes))).unwrap();
    assert!(matches!(ctx.read_block(150), Err(Error::Io(_))));
  }

  #[test]
  fn make_buffer_reports_huge_sizes() {
    assert!(matches!(make_buffer(u64::MAX), Err(Error::Alloc { .. })));
    assert_eq!(make_buffer(3).unwrap(), vec![0, 0, 0]);
  }
}
