mod avl;
mod depth;
mod error;
mod policy;

pub use crate::avl::{Avl, Stats};
pub use crate::depth::Depth;
pub use crate::error::AvlError;
pub use crate::policy::{KeyEq, KeyOrder, Natural};

#[cfg(test)]
mod proptests;
