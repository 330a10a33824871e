pub mod create;
pub mod delete;
mod index;
pub mod members;

pub use index::*;
