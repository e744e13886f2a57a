//! Media items and catalogs
//!
//! Lightbox triggers describe their media through loosely typed markup
//! attributes. They are parsed exactly once, at wiring time, into
//! [`MediaItem`]s; a trigger without a usable source is simply not
//! openable.

use crate::error::{MediaError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Raw attribute strings read from a lightbox trigger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawItemAttributes {
    /// `data-src`
    pub src: Option<String>,
    /// `data-title`
    pub title: Option<String>,
    /// `data-poster` (video only)
    pub poster: Option<String>,
}

impl RawItemAttributes {
    pub fn new(src: Option<&str>, title: Option<&str>, poster: Option<&str>) -> Self {
        Self {
            src: src.map(str::to_string),
            title: title.map(str::to_string),
            poster: poster.map(str::to_string),
        }
    }
}

/// One presentable image or video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    source_url: String,
    title: Option<String>,
    poster_url: Option<String>,
}

impl MediaItem {
    /// Create an item; the source must not be blank
    pub fn new(source_url: impl Into<String>) -> Result<Self> {
        let source_url = source_url.into();
        if source_url.trim().is_empty() {
            return Err(MediaError::InvalidItem("missing source URL".into()));
        }

        Ok(Self {
            source_url,
            title: None,
            poster_url: None,
        })
    }

    /// Attach a title (blank titles are dropped)
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = non_blank(title.into());
        self
    }

    /// Attach a poster image (blank posters are dropped)
    pub fn with_poster(mut self, poster_url: impl Into<String>) -> Self {
        self.poster_url = non_blank(poster_url.into());
        self
    }

    /// Parse raw markup attributes
    pub fn from_attributes(attrs: &RawItemAttributes) -> Result<Self> {
        let source = attrs
            .src
            .as_deref()
            .ok_or_else(|| MediaError::InvalidItem("missing source URL".into()))?;

        let mut item = Self::new(source)?;
        if let Some(title) = &attrs.title {
            item = item.with_title(title.as_str());
        }
        if let Some(poster) = &attrs.poster {
            item = item.with_poster(poster.as_str());
        }
        Ok(item)
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn poster_url(&self) -> Option<&str> {
        self.poster_url.as_deref()
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Ordered, page-lifetime collection of items
///
/// Keeps the mapping from trigger position (markup order) to item index,
/// since invalid triggers are left out of traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<MediaItem>,
    triggers: Vec<Option<usize>>,
}

impl Catalog {
    /// Build a catalog from triggers in markup order
    pub fn from_raw<I>(raw: I) -> Self
    where
        I: IntoIterator<Item = RawItemAttributes>,
    {
        let mut catalog = Self::default();

        for (position, attrs) in raw.into_iter().enumerate() {
            match MediaItem::from_attributes(&attrs) {
                Ok(item) => {
                    catalog.triggers.push(Some(catalog.items.len()));
                    catalog.items.push(item);
                }
                Err(e) => {
                    debug!(trigger = position, error = %e, "Skipping lightbox trigger");
                    catalog.triggers.push(None);
                }
            }
        }

        catalog
    }

    /// Build a catalog from already validated items
    pub fn from_items(items: Vec<MediaItem>) -> Self {
        let triggers = (0..items.len()).map(Some).collect();
        Self { items, triggers }
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&MediaItem> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of triggers seen in markup, openable or not
    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    /// Item index opened by the trigger at `position`
    pub fn index_for_trigger(&self, position: usize) -> Option<usize> {
        self.triggers.get(position).copied().flatten()
    }
}
