use time::Timespec;
use crate::decode::{decode_u16, decode_u32};
use crate::error::{Error, Result};
use crate::superblock::Superblock;

pub const DIRECT_BLOCKS: usize = 12;
pub const SINGLE_INDIRECT: usize = 12;
pub const DOUBLE_INDIRECT: usize = 13;
pub const TRIPLE_INDIRECT: usize = 14;

/// The part of an on-disk inode needed to locate and read its data.
///
/// `block` holds the 12 direct pointers followed by the single, double and
/// triple indirect pointers.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Inode {
  pub ino: u64,
  pub mode: u16,
  pub uid: u16,
  pub size: u64,
  pub atime: u32,
  pub ctime: u32,
  pub mtime: u32,
  pub dtime: u32,
  pub block: [u32; 15],
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FileType {
  Regular,
  Dir,
  CharDev,
  BlockDev,
  Fifo,
  Socket,
  Symlink,
}

impl Inode {
  pub fn decode(superblock: &Superblock, ino: u64, bytes: &[u8]) -> Result<Inode> {
    if bytes.len() < 128 {
      return Err(Error::decode(
        format!("Inode {} needs 128 bytes, got {}", ino, bytes.len())));
    }
    let mode = decode_u16(&bytes[0..]);

    let size_low = decode_u32(&bytes[4..]) as u64;
    let size_high =
      if superblock.rev_level >= 1 && file_type_of(mode) == Some(FileType::Regular) {
        decode_u32(&bytes[108..])
      } else {
        0
      } as u64;

    let mut block = [0; 15];
    for (i, pointer) in block.iter_mut().enumerate() {
      *pointer = decode_u32(&bytes[40 + 4 * i..]);
    }

    Ok(Inode {
      ino,
      mode,
      uid: decode_u16(&bytes[2..]),
      size: size_low + (size_high << 32),
      atime: decode_u32(&bytes[8..]),
      ctime: decode_u32(&bytes[12..]),
      mtime: decode_u32(&bytes[16..]),
      dtime: decode_u32(&bytes[20..]),
      block,
    })
  }

  pub fn direct(&self) -> &[u32] {
    &self.block[..DIRECT_BLOCKS]
  }

  pub fn single_indirect(&self) -> u32 {
    self.block[SINGLE_INDIRECT]
  }

  pub fn double_indirect(&self) -> u32 {
    self.block[DOUBLE_INDIRECT]
  }

  pub fn triple_indirect(&self) -> u32 {
    self.block[TRIPLE_INDIRECT]
  }

  /// `None` when the type nibble of the mode is not a known file type.
  pub fn file_type(&self) -> Option<FileType> {
    file_type_of(self.mode)
  }

  pub fn access_rights(&self) -> u16 {
    self.mode & 0o7777
  }

  pub fn atime_spec(&self) -> Timespec {
    Timespec::new(self.atime as i64, 0)
  }

  pub fn ctime_spec(&self) -> Timespec {
    Timespec::new(self.ctime as i64, 0)
  }

  pub fn mtime_spec(&self) -> Timespec {
    Timespec::new(self.mtime as i64, 0)
  }

  pub fn dtime_spec(&self) -> Timespec {
    Timespec::new(self.dtime as i64, 0)
  }
}

fn file_type_of(mode: u16) -> Option<FileType> {
  Some(match (mode & 0xf000) >> 12 {
    1  => FileType::Fifo,
    2  => FileType::CharDev,
    4  => FileType::Dir,
    6  => FileType::BlockDev,
    8  => FileType::Regular,
    10 => FileType::Symlink,
    12 => FileType::Socket,
    _ => return None,
  })
}
