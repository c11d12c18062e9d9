//! Read-only access to ext2 images: superblock, group descriptors, inodes,
//! block pointer resolution and file content, decoded straight from the
//! image bytes without mounting anything.

pub use context::{Context, make_buffer};
pub use data_reader::{BlockPos, BlockRef, resolve_block, max_file_blocks};
pub use decode::{decode_u16, decode_u32, decode_pointers};
pub use error::{Error, Result};
pub use group::{block_group, ino_group, is_block_free, is_inode_free};
pub use group_desc::GroupDesc;
pub use heuristic::{looks_indirect, looks_double_indirect};
pub use inode::{FileType, Inode};
pub use options::{BitmapBase, DescTableLocation, Options};
pub use read_file::{FileChunks, file_chunks, read_inode_data, copy_inode_data};
pub use superblock::{Superblock, MAGIC};
pub use volume::{FileVolume, MemVolume, Volume};

mod context;
mod data_reader;
mod decode;
mod error;
mod group;
mod group_desc;
mod heuristic;
mod inode;
mod options;
mod read_file;
mod superblock;
mod volume;

#[cfg(test)]
mod test_image;
