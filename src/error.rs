use std::{io, result};

#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// A positioned read failed or came back short.
  #[error("IO error: {0}")]
  Io(#[from] io::Error),

  #[error("Could not allocate a buffer of {size} bytes")]
  Alloc { size: usize },

  /// An inode, block, group or logical index outside the declared ranges.
  #[error("{what} {value} is out of range (limit {limit})")]
  Bounds { what: &'static str, value: u64, limit: u64 },

  /// The image contains values that cannot be interpreted consistently.
  #[error("Decode error: {0}")]
  Decode(String),
}

pub type Result<T> = result::Result<T, Error>;

impl Error {
  pub fn decode<S: Into<String>>(message: S) -> Error {
    Error::Decode(message.into())
  }

  pub fn bounds(what: &'static str, value: u64, limit: u64) -> Error {
    Error::Bounds { what, value, limit }
  }
}
