use std::{fs, io, path};
use tracing::trace;
use crate::error::Result;

/// Random-access byte source holding an ext2 image.
///
/// Every read names its own offset; implementations must not keep a shared
/// cursor between calls. A read that cannot fill the whole buffer fails.
pub trait Volume {
  fn read(&self, offset: u64, buffer: &mut [u8]) -> Result<()>;
}

pub struct FileVolume(pub fs::File);

impl FileVolume {
  pub fn open<P: AsRef<path::Path>>(path: P) -> Result<FileVolume> {
    Ok(FileVolume(fs::File::open(path)?))
  }
}

impl Volume for FileVolume {
  #[cfg(unix)]
  fn read(&self, offset: u64, buffer: &mut [u8]) -> Result<()> {
    use std::os::unix::fs::FileExt;
    trace!(offset, len = buffer.len(), "pread");
    self.0.read_exact_at(buffer, offset)?;
    Ok(())
  }

  #[cfg(windows)]
  fn read(&self, offset: u64, buffer: &mut [u8]) -> Result<()> {
    use std::os::windows::fs::FileExt;
    trace!(offset, len = buffer.len(), "seek_read");
    let mut total_read = 0;
    while total_read < buffer.len() {
      let pos = offset + total_read as u64;
      match self.0.seek_read(&mut buffer[total_read..], pos)? {
        0 => return Err(short_read(offset, buffer.len(), total_read).into()),
        n => total_read += n,
      }
    }
    Ok(())
  }
}

/// In-memory image, mostly useful for images already loaded or built by hand.
pub struct MemVolume(pub Vec<u8>);

impl Volume for MemVolume {
  fn read(&self, offset: u64, buffer: &mut [u8]) -> Result<()> {
    let len = self.0.len() as u64;
    let start = offset.min(len);
    let end = offset.saturating_add(buffer.len() as u64).min(len);
    let available = (end - start) as usize;
    if available < buffer.len() {
      return Err(short_read(offset, buffer.len(), available).into());
    }
    buffer.copy_from_slice(&self.0[start as usize..end as usize]);
    Ok(())
  }
}

fn short_read(offset: u64, wanted: usize, got: usize) -> io::Error {
  io::Error::new(io::ErrorKind::UnexpectedEof,
    format!("short read at offset {}: wanted {} bytes, got {}", offset, wanted, got))
}
