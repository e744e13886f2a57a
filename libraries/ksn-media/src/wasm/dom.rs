//! DOM implementations of the platform traits

use super::page::{with_carousel, with_site};
use crate::{
    Affordance, Carousel, CarouselKind, ClickTarget, DismissReason, Key, MediaElement, MediaError,
    MediaEvent, MediaHandle, MediaKind, ModalHost, ModalSurface, PlayerView,
};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlButtonElement, HtmlDialogElement, HtmlElement,
    HtmlImageElement, HtmlInputElement, HtmlMediaElement, KeyboardEvent, Window,
};

pub(crate) type Listener = Closure<dyn FnMut(Event)>;

/// Attach `handler` to `target`; the caller decides the closure's lifetime
pub(crate) fn add_listener(
    target: &EventTarget,
    name: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<Listener, JsValue> {
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
    Ok(closure)
}

/// Drop listeners once the current dispatch has returned
fn release(listeners: Vec<Listener>) {
    if listeners.is_empty() {
        return;
    }
    wasm_bindgen_futures::spawn_local(async move {
        drop(listeners);
    });
}

/// First element matching `selector`, cast to `T`
pub(crate) fn select<T: JsCast>(found: Result<Option<Element>, JsValue>) -> Option<T> {
    found.ok().flatten().and_then(|el| el.dyn_into::<T>().ok())
}

fn platform_error(e: JsValue) -> MediaError {
    MediaError::Platform(format!("{e:?}"))
}

fn log_failure(what: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        debug!(error = ?e, "{what} failed");
    }
}

// ===== Media element =====

/// `<audio>`/`<video>` element
pub struct DomMedia {
    element: HtmlMediaElement,
    kind: MediaKind,
}

impl DomMedia {
    pub fn new(element: HtmlMediaElement, kind: MediaKind) -> Self {
        Self { element, kind }
    }

    pub fn shared(element: HtmlMediaElement, kind: MediaKind) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(element, kind)))
    }

    pub fn element(&self) -> &HtmlMediaElement {
        &self.element
    }
}

impl MediaElement for DomMedia {
    fn kind(&self) -> MediaKind {
        self.kind
    }

    fn is_paused(&self) -> bool {
        self.element.paused()
    }

    fn play(&mut self) -> crate::Result<()> {
        let promise = self
            .element
            .play()
            .map_err(|e| MediaError::PlayRejected(format!("{e:?}")))?;

        // Autoplay refusals arrive as a rejected promise
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                debug!(error = ?e, "Media play blocked");
            }
        });
        Ok(())
    }

    fn unlock_playback(&mut self) -> crate::Result<()> {
        let promise = self
            .element
            .play()
            .map_err(|e| MediaError::PlayRejected(format!("{e:?}")))?;

        let element = self.element.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => log_failure("Pausing after unlock", element.pause()),
                Err(e) => debug!(error = ?e, "Autoplay unlock blocked"),
            }
        });
        Ok(())
    }

    fn pause(&mut self) -> crate::Result<()> {
        self.element
            .pause()
            .map_err(|e| MediaError::PauseRejected(format!("{e:?}")))
    }

    fn current_time(&self) -> f64 {
        self.element.current_time()
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.element.set_current_time(seconds);
    }

    fn duration(&self) -> Option<f64> {
        let duration = self.element.duration();
        (!duration.is_nan()).then_some(duration)
    }

    fn volume(&self) -> f64 {
        self.element.volume()
    }

    fn set_volume(&mut self, volume: f64) {
        self.element.set_volume(volume);
    }

    fn set_source(&mut self, url: &str) {
        log_failure("Setting media source", self.element.set_attribute("src", url));
    }

    fn set_poster(&mut self, poster: Option<&str>) {
        let result = match poster {
            Some(url) => self.element.set_attribute("poster", url),
            None => self.element.remove_attribute("poster"),
        };
        log_failure("Setting poster", result);
    }

    fn load(&mut self) {
        self.element.load();
    }

    fn set_inline_playback(&mut self) {
        log_failure("Setting playsinline", self.element.set_attribute("playsinline", "true"));
        log_failure(
            "Setting webkit-playsinline",
            self.element.set_attribute("webkit-playsinline", "true"),
        );
    }
}

// ===== Player view =====

/// Controls of one player, located once at startup
pub struct DomPlayerView {
    /// Player container or track card, carries `is-playing`
    pub(crate) root: Element,
    pub(crate) button: HtmlButtonElement,
    /// Hero icon span; track cards put the icon on the button itself
    pub(crate) icon: Option<Element>,
    pub(crate) label: Option<Element>,
    pub(crate) current: Element,
    pub(crate) duration: Element,
    pub(crate) seek: HtmlInputElement,
    /// Hero error slot
    pub(crate) error_slot: Option<Element>,
    /// Track cards append their annotation instead
    pub(crate) append_error: bool,
}

const TRACK_ERROR_CLASS: &str = "track-card__error";

impl PlayerView for DomPlayerView {
    fn render_affordance(&mut self, affordance: &Affordance<'_>) {
        let pressed = if affordance.playing { "true" } else { "false" };
        log_failure("Setting aria-pressed", self.button.set_attribute("aria-pressed", pressed));

        match &self.icon {
            Some(icon) => icon.set_text_content(Some(affordance.icon)),
            None => self.button.set_text_content(Some(affordance.icon)),
        }
        if let (Some(label), Some(text)) = (&self.label, affordance.label) {
            label.set_text_content(Some(text));
        }

        let toggled = self
            .root
            .class_list()
            .toggle_with_force("is-playing", affordance.playing)
            .map(|_| ());
        log_failure("Toggling is-playing", toggled);
    }

    fn set_label(&mut self, text: &str) {
        if let Some(label) = &self.label {
            label.set_text_content(Some(text));
        }
    }

    fn set_current_text(&mut self, text: &str) {
        self.current.set_text_content(Some(text));
    }

    fn set_duration_text(&mut self, text: &str) {
        self.duration.set_text_content(Some(text));
    }

    fn set_seek_position(&mut self, percent: f64) {
        self.seek.set_value(&percent.to_string());
    }

    fn set_seek_enabled(&mut self, enabled: bool) {
        self.seek.set_disabled(!enabled);
    }

    fn set_play_enabled(&mut self, enabled: bool) {
        self.button.set_disabled(!enabled);
    }

    fn has_error_annotation(&self) -> bool {
        if let Some(slot) = &self.error_slot {
            return slot.text_content().is_some_and(|text| !text.is_empty());
        }
        self.append_error
            && select::<Element>(self.root.query_selector(&format!(".{TRACK_ERROR_CLASS}"))).is_some()
    }

    fn show_error(&mut self, message: &str) {
        if let Some(slot) = &self.error_slot {
            slot.set_text_content(Some(message));
            return;
        }
        if !self.append_error {
            return;
        }

        let Some(document) = self.root.owner_document() else {
            return;
        };
        match document.create_element("span") {
            Ok(span) => {
                span.set_class_name(TRACK_ERROR_CLASS);
                span.set_text_content(Some(message));
                log_failure("Appending error annotation", self.root.append_child(&span).map(|_| ()));
            }
            Err(e) => warn!(error = ?e, "Failed to create error annotation"),
        }
    }
}

// ===== Modal host =====

/// Document-level modal services
pub struct DomModalHost {
    window: Window,
    document: Document,
    key_listener: Option<Listener>,
}

impl DomModalHost {
    pub fn new(window: Window, document: Document) -> Self {
        Self {
            window,
            document,
            key_listener: None,
        }
    }
}

impl ModalHost for DomModalHost {
    fn supports_native_modal(&self) -> bool {
        js_sys::Reflect::has(&self.window, &JsValue::from_str("HTMLDialogElement")).unwrap_or(false)
    }

    fn open_external(&mut self, url: &str) {
        if let Err(e) = self
            .window
            .open_with_url_and_target_and_features(url, "_blank", "noopener")
        {
            warn!(url, error = ?e, "Failed to open media in a new tab");
        }
    }

    fn mount(&mut self, kind: CarouselKind) -> crate::Result<Box<dyn ModalSurface>> {
        let surface = DomModalSurface::mount(&self.document, kind).map_err(platform_error)?;
        Ok(Box::new(surface))
    }

    fn set_scroll_locked(&mut self, locked: bool) {
        let Some(body) = self.document.body() else {
            return;
        };
        let classes = body.class_list();
        let result = if locked {
            classes.add_1("modal-open")
        } else {
            classes.remove_1("modal-open")
        };
        log_failure("Toggling modal-open", result);
    }

    fn attach_key_listener(&mut self) {
        if self.key_listener.is_some() {
            return;
        }

        let listener = add_listener(&self.document, "keydown", |event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key) else {
                return;
            };
            with_site(|site| site.handle_key(Key::from_name(&key)));
        });
        match listener {
            Ok(listener) => self.key_listener = Some(listener),
            Err(e) => warn!(error = ?e, "Failed to attach lightbox key listener"),
        }
    }

    fn detach_key_listener(&mut self) {
        let Some(listener) = self.key_listener.take() else {
            return;
        };
        log_failure(
            "Removing key listener",
            self.document
                .remove_event_listener_with_callback("keydown", listener.as_ref().unchecked_ref()),
        );
        release(vec![listener]);
    }
}

// ===== Modal surface =====

fn template(kind: CarouselKind) -> String {
    let viewer = match kind {
        CarouselKind::Image => r#"<img alt="" />"#,
        CarouselKind::Video => r#"<video controls playsinline preload="metadata"></video>"#,
    };

    format!(
        r#"<div class="media-modal__content">
  <button class="media-modal__close" type="button" aria-label="Zavrit">&times;</button>
  <div class="media-modal__title"></div>
  <div class="media-modal__viewer">{viewer}</div>
  <div class="media-modal__controls">
    <button class="media-modal__nav" type="button" data-step="-1" aria-label="Predchozi">&larr;</button>
    <span class="media-modal__counter"></span>
    <button class="media-modal__nav" type="button" data-step="1" aria-label="Dalsi">&rarr;</button>
  </div>
</div>"#
    )
}

/// `<dialog class="media-modal">` appended to the body
pub struct DomModalSurface {
    dialog: HtmlDialogElement,
    title: Option<HtmlElement>,
    counter: Option<Element>,
    controls: Option<HtmlElement>,
    prev: Option<HtmlButtonElement>,
    next: Option<HtmlButtonElement>,
    image: Option<HtmlImageElement>,
    video: Option<Rc<RefCell<DomMedia>>>,
    listeners: Vec<Listener>,
}

impl DomModalSurface {
    fn mount(document: &Document, kind: CarouselKind) -> Result<Self, JsValue> {
        let dialog: HtmlDialogElement = document.create_element("dialog")?.dyn_into()?;
        dialog.set_class_name("media-modal");
        dialog.set_inner_html(&template(kind));

        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        body.append_child(&dialog)?;

        let video = select::<HtmlMediaElement>(dialog.query_selector("video"))
            .map(|element| DomMedia::shared(element, MediaKind::Video));

        let mut surface = Self {
            title: select(dialog.query_selector(".media-modal__title")),
            counter: select(dialog.query_selector(".media-modal__counter")),
            controls: select(dialog.query_selector(".media-modal__controls")),
            prev: select(dialog.query_selector(r#"[data-step="-1"]"#)),
            next: select(dialog.query_selector(r#"[data-step="1"]"#)),
            image: select(dialog.query_selector("img")),
            video,
            listeners: Vec::new(),
            dialog,
        };
        if let Err(e) = surface.bind(kind) {
            surface.remove();
            return Err(e);
        }
        Ok(surface)
    }

    fn bind(&mut self, kind: CarouselKind) -> Result<(), JsValue> {
        if let Some(close) = select::<EventTarget>(self.dialog.query_selector(".media-modal__close")) {
            self.listeners.push(add_listener(&close, "click", move |_| {
                with_carousel(kind, |c| c.dismiss(DismissReason::CloseControl));
            })?);
        }

        for (button, delta) in [(&self.prev, -1), (&self.next, 1)] {
            if let Some(button) = button {
                self.listeners.push(add_listener(button, "click", move |_| {
                    with_carousel(kind, |c| c.step(delta));
                })?);
            }
        }

        let dialog_value: JsValue = self.dialog.clone().into();
        self.listeners.push(add_listener(&self.dialog, "click", move |event| {
            let target: Option<JsValue> = event.target().map(Into::into);
            let clicked = if target.as_ref() == Some(&dialog_value) {
                ClickTarget::Surface
            } else {
                ClickTarget::Content
            };
            with_carousel(kind, |c| c.handle_click(clicked));
        })?);

        self.listeners.push(add_listener(&self.dialog, "cancel", move |event| {
            event.prevent_default();
            with_carousel(kind, Carousel::handle_cancel);
        })?);

        if let Some(video) = &self.video {
            let element = video.borrow().element().clone();
            let events = [
                ("loadeddata", MediaEvent::LoadedData),
                ("play", MediaEvent::Play),
                ("error", MediaEvent::Error),
            ];
            for (name, event) in events {
                self.listeners.push(add_listener(&element, name, move |_| {
                    with_site(|site| {
                        if let Some(id) = site.videos().and_then(Carousel::video_id) {
                            site.dispatch(id, event);
                        }
                    });
                })?);
            }
        }

        Ok(())
    }
}

impl ModalSurface for DomModalSurface {
    fn set_navigation_visible(&mut self, visible: bool) {
        if let Some(controls) = &self.controls {
            controls.set_hidden(!visible);
        }
        for button in [&self.prev, &self.next].into_iter().flatten() {
            button.set_disabled(!visible);
        }
    }

    fn set_counter(&mut self, text: &str) {
        if let Some(counter) = &self.counter {
            counter.set_text_content(Some(text));
        }
    }

    fn set_title(&mut self, title: Option<&str>) {
        if let Some(el) = &self.title {
            el.set_text_content(Some(title.unwrap_or_default()));
            el.set_hidden(title.is_none());
        }
    }

    fn show_image(&mut self, src: &str, alt: &str) {
        if let Some(image) = &self.image {
            image.set_src(src);
            image.set_alt(alt);
        }
    }

    fn video(&self) -> Option<MediaHandle> {
        self.video.as_ref().map(|video| {
            let handle: MediaHandle = video.clone();
            handle
        })
    }

    fn show_modal(&mut self) {
        log_failure("Showing modal", self.dialog.show_modal());
    }

    fn close_native(&mut self) -> crate::Result<()> {
        if !self.dialog.open() {
            return Err(MediaError::AlreadyClosed);
        }
        self.dialog.close();
        Ok(())
    }

    fn remove(&mut self) {
        self.dialog.remove();
        release(std::mem::take(&mut self.listeners));
    }
}
