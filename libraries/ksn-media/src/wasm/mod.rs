//! WASM bindings for ksn-media
//!
//! DOM implementations of the platform traits plus the module entry
//! point that wires the page once the document is ready.

pub mod dom;
pub mod page;

pub use dom::{DomMedia, DomModalHost, DomModalSurface, DomPlayerView};
pub use page::start;
