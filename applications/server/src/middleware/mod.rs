/// Request middleware
pub mod blocked;

pub use blocked::block_private_paths;
