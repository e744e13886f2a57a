//! KSN Site - Media Presentation
//!
//! Platform-agnostic core of the site's interactive media layer.
//!
//! This crate provides:
//! - Exclusive playback: at most one audio/video element plays site-wide
//! - Hero and track-card audio players (seek, volume, error annotation)
//! - Image and video lightbox carousels with wrap-around navigation
//! - Validated lightbox items parsed once from markup attributes
//! - An idempotent page bootstrap
//!
//! # Architecture
//!
//! The page is single threaded and event driven. Every platform object the
//! core touches sits behind a trait:
//! - [`MediaElement`] - an `<audio>`/`<video>` element
//! - [`PlayerView`] - the controls and displays of one player
//! - [`ModalHost`] / [`ModalSurface`] - the document and one modal dialog
//!
//! The `wasm` feature provides DOM implementations of these traits and a
//! `#[wasm_bindgen(start)]` entry point. Tests drive the same state machines
//! with in-memory doubles.
//!
//! # Example: Exclusive playback
//!
//! ```rust,no_run
//! use ksn_media::{MediaHandle, MediaRegistry};
//!
//! fn wire(registry: &MediaRegistry, hero: &MediaHandle, track: &MediaHandle) {
//!     let hero_id = registry.register(hero);
//!     registry.register(track);
//!
//!     // The hero just started: pause everyone else
//!     registry.pause_all_except(Some(hero_id));
//! }
//! ```
//!
//! # Example: Time display
//!
//! ```rust
//! use ksn_media::format_time;
//!
//! assert_eq!(format_time(Some(125.0)), "2:05");
//! assert_eq!(format_time(None), "0:00");
//! ```

mod bootstrap;
mod carousel;
mod coordinator;
mod element;
mod error;
mod item;
mod player;
mod time;

#[cfg(test)]
mod mock;

#[cfg(feature = "wasm")]
pub mod wasm;

// Public exports
pub use bootstrap::{InitGuard, Site, SiteParts, SITE_INIT};
pub use carousel::{
    wrap_index, Carousel, CarouselKind, CarouselSession, ClickTarget, DismissReason, Key,
    ModalHost, ModalSurface, OpenOutcome, SharedModalHost, VideoAction, VideoInput, VideoPhase,
    VideoSequencer, DEFAULT_ALT,
};
pub use coordinator::MediaRegistry;
pub use element::{MediaElement, MediaEvent, MediaHandle, MediaId, MediaKind};
pub use error::{MediaError, Result};
pub use item::{Catalog, MediaItem, RawItemAttributes};
pub use player::{
    Affordance, AudioPlayer, HeroParts, PlayerState, PlayerStatus, PlayerTexts, PlayerVariant,
    PlayerView, TrackParts, DEFAULT_VOLUME,
};
pub use time::format_time;
