use std::{cmp, io};
use tracing::trace;
use crate::context::{make_buffer, Context};
use crate::data_reader::{resolve_block, BlockRef};
use crate::error::Result;
use crate::inode::Inode;

/// Lazily yields the content of a file one block at a time.
///
/// Every item is a whole block except possibly the last, which is cut to the
/// file size. Holes come out as zeros. The iterator stops after the first
/// error; build a new one with [`file_chunks`] to start over.
pub struct FileChunks<'c> {
  ctx: &'c Context,
  inode: Inode,
  next_block: u64,
  block_count: u64,
  failed: bool,
}

pub fn file_chunks<'c>(ctx: &'c Context, inode: &Inode) -> FileChunks<'c> {
  let block_size = ctx.block_size();
  FileChunks {
    ctx,
    inode: *inode,
    next_block: 0,
    block_count: inode.size / block_size + (inode.size % block_size != 0) as u64,
    failed: false,
  }
}

impl<'c> FileChunks<'c> {
  fn chunk_len(&self, file_block: u64) -> u64 {
    let block_size = self.ctx.block_size();
    cmp::min(block_size, self.inode.size - file_block * block_size)
  }
}

impl<'c> Iterator for FileChunks<'c> {
  type Item = Result<Vec<u8>>;

  fn next(&mut self) -> Option<Result<Vec<u8>>> {
    if self.failed || self.next_block >= self.block_count {
      return None;
    }
    let file_block = self.next_block;
    let mut chunk = match make_buffer(self.chunk_len(file_block)) {
      Ok(chunk) => chunk,
      Err(err) => {
        self.failed = true;
        return Some(Err(err));
      },
    };
    match read_block_part(self.ctx, &self.inode, file_block, 0, &mut chunk[..]) {
      Ok(()) => {
        self.next_block += 1;
        Some(Ok(chunk))
      },
      Err(err) => {
        self.failed = true;
        Some(Err(err))
      },
    }
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    if self.failed {
      return (0, Some(0));
    }
    let remaining = (self.block_count - self.next_block) as usize;
    (0, Some(remaining))
  }
}

/// Reads up to `buffer.len()` bytes of file data starting at `offset`.
/// Returns the number of bytes read, which is short only at end of file.
pub fn read_inode_data(ctx: &Context, inode: &Inode,
  offset: u64, buffer: &mut [u8]) -> Result<u64>
{
  let block_size = ctx.block_size();
  let max_length = cmp::min(buffer.len() as u64, inode.size.saturating_sub(offset));
  let mut chunk_begin = 0;
  while chunk_begin < max_length {
    let chunk_block = (offset + chunk_begin) / block_size;
    let chunk_offset = (offset + chunk_begin) % block_size;
    let chunk_length = cmp::min(max_length - chunk_begin,
        block_size - chunk_offset);
    read_block_part(ctx, inode, chunk_block, chunk_offset,
      &mut buffer[chunk_begin as usize..(chunk_begin + chunk_length) as usize])?;
    chunk_begin += chunk_length;
  }
  Ok(chunk_begin)
}

/// Writes the whole file content to `out`, returning the number of bytes.
pub fn copy_inode_data<W: io::Write>(ctx: &Context, inode: &Inode, out: &mut W) -> Result<u64> {
  let mut total = 0;
  for chunk in file_chunks(ctx, inode) {
    let chunk = chunk?;
    out.write_all(&chunk[..])?;
    total += chunk.len() as u64;
  }
  Ok(total)
}

fn read_block_part(ctx: &Context, inode: &Inode, file_block: u64,
  offset: u64, buffer: &mut [u8]) -> Result<()>
{
  match resolve_block(ctx, inode, file_block)? {
    BlockRef::Block(block) => {
      trace!(ino = inode.ino, file_block, block, offset, len = buffer.len(), "read file block");
      ctx.read(block * ctx.block_size() + offset, buffer)
    },
    BlockRef::Hole => {
      buffer.iter_mut().for_each(|byte| *byte = 0);
      Ok(())
    },
  }
}
