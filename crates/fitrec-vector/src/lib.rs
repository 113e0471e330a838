pub mod cache;
pub mod index;

pub use cache::VectorCache;
pub use index::FlatIndex;
