//! In-memory media element for unit tests

use crate::element::{MediaElement, MediaHandle, MediaKind};
use crate::error::{MediaError, Result};
use std::cell::RefCell;
use std::rc::Rc;

pub(crate) struct FakeMedia {
    pub kind: MediaKind,
    pub paused: bool,
    pub refuse_pause: bool,
    pub refuse_play: bool,
    pub current_time: f64,
    pub duration: Option<f64>,
    pub volume: f64,
    pub ops: Vec<String>,
}

impl FakeMedia {
    fn new(kind: MediaKind) -> Self {
        Self {
            kind,
            paused: true,
            refuse_pause: false,
            refuse_play: false,
            current_time: 0.0,
            duration: None,
            volume: 1.0,
            ops: Vec::new(),
        }
    }

    pub fn audio_handle() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(MediaKind::Audio)))
    }

    pub fn video_handle() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(MediaKind::Video)))
    }

    pub fn as_media(handle: &Rc<RefCell<Self>>) -> MediaHandle {
        handle.clone()
    }
}

impl MediaElement for FakeMedia {
    fn kind(&self) -> MediaKind {
        self.kind
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn play(&mut self) -> Result<()> {
        self.ops.push("play".into());
        if self.refuse_play {
            return Err(MediaError::PlayRejected("NotAllowedError".into()));
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.ops.push("pause".into());
        if self.refuse_pause {
            return Err(MediaError::PauseRejected("InvalidStateError".into()));
        }
        self.paused = true;
        Ok(())
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.current_time = seconds;
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn set_source(&mut self, url: &str) {
        self.ops.push(format!("src:{url}"));
    }

    fn set_poster(&mut self, poster: Option<&str>) {
        self.ops.push(format!("poster:{}", poster.unwrap_or("-")));
    }

    fn load(&mut self) {
        self.ops.push("load".into());
    }
}
