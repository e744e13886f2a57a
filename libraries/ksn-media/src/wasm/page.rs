//! Page entry point: locate markup, wire the [`Site`], bind DOM events

use super::dom::{add_listener, select, DomMedia, DomModalHost, DomPlayerView};
use crate::{
    Carousel, CarouselKind, HeroParts, MediaEvent, MediaHandle, MediaId, MediaKind, PlayerTexts,
    RawItemAttributes, SharedModalHost, Site, SiteParts, TrackParts, SITE_INIT,
};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, Element, HtmlButtonElement, HtmlInputElement,
    HtmlMediaElement,
};

thread_local! {
    static SITE: RefCell<Option<Site>> = const { RefCell::new(None) };
}

/// Run `f` against the wired site
///
/// Returns `None` before wiring and for re-entrant calls.
pub(crate) fn with_site<R>(f: impl FnOnce(&mut Site) -> R) -> Option<R> {
    SITE.with(|cell| {
        let Ok(mut slot) = cell.try_borrow_mut() else {
            debug!("Site busy, dropping nested event");
            return None;
        };
        slot.as_mut().map(f)
    })
}

/// Run `f` against the lightbox of `kind`
pub(crate) fn with_carousel<R>(kind: CarouselKind, f: impl FnOnce(&mut Carousel) -> R) -> Option<R> {
    with_site(|site| {
        let carousel = match kind {
            CarouselKind::Image => site.gallery_mut(),
            CarouselKind::Video => site.videos_mut(),
        };
        carousel.map(f)
    })
    .flatten()
}

/// Module entry point
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let document = document()?;
    if document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(|| {
            if let Err(e) = boot() {
                web_sys::console::error_2(&JsValue::from_str("Media wiring failed:"), &e);
            }
        });
        document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
        return Ok(());
    }

    boot()
}

fn document() -> Result<Document, JsValue> {
    web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document"))
}

fn boot() -> Result<(), JsValue> {
    let mut result = Ok(());
    SITE_INIT.run_once(|| result = mount());
    result
}

struct HeroDom {
    audio: HtmlMediaElement,
    button: HtmlButtonElement,
    seek: HtmlInputElement,
    volume: HtmlInputElement,
}

struct TrackDom {
    audio: HtmlMediaElement,
    button: HtmlButtonElement,
    seek: HtmlInputElement,
}

fn mount() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let document = document()?;

    if let Some(root) = document.document_element() {
        root.class_list().add_1("js")?;
    }

    let (hero_parts, hero_dom) = match scan_hero(&document) {
        Some((parts, dom)) => (Some(parts), Some(dom)),
        None => (None, None),
    };
    let (track_parts, track_dom): (Vec<_>, Vec<_>) = scan_tracks(&document)?.into_iter().unzip();

    let mut wired: Vec<&HtmlMediaElement> = track_dom.iter().map(|dom| &dom.audio).collect();
    if let Some(dom) = &hero_dom {
        wired.push(&dom.audio);
    }
    let loose: Vec<HtmlMediaElement> = query_all(&document, "audio, video")?
        .into_iter()
        .filter_map(|el| el.dyn_into::<HtmlMediaElement>().ok())
        .filter(|el| !wired.contains(&el))
        .collect();

    let gallery_triggers = query_all(&document, "[data-gallery]")?;
    let video_triggers = query_all(&document, "[data-video]")?;

    let host: SharedModalHost = Rc::new(RefCell::new(DomModalHost::new(window.clone(), document)));
    let site = Site::wire(SiteParts {
        hero: hero_parts,
        tracks: track_parts,
        gallery: gallery_triggers.iter().map(attributes).collect(),
        videos: video_triggers.iter().map(attributes).collect(),
        modal_host: Some(host),
        texts: PlayerTexts::default(),
        loose_media: loose.iter().map(loose_handle).collect(),
    });

    if let (Some(player), Some(dom)) = (site.hero(), hero_dom) {
        bind_hero(player.id(), &dom)?;
    }
    // Incomplete cards were filtered during the scan, so positions line up
    for (index, (player, dom)) in site.tracks().iter().zip(&track_dom).enumerate() {
        bind_track(index, player.id(), dom)?;
    }

    for (id, element) in site.loose_media_ids().into_iter().zip(&loose) {
        bind_media(element, id)?;
    }

    for (position, trigger) in gallery_triggers.iter().enumerate() {
        add_listener(trigger, "click", move |_| {
            with_site(|site| site.open_gallery(position));
        })?
        .forget();
    }
    for (position, trigger) in video_triggers.iter().enumerate() {
        add_listener(trigger, "click", move |_| {
            with_site(|site| site.open_video(position));
        })?
        .forget();
    }

    if site.hero().is_some() {
        let options = AddEventListenerOptions::new();
        options.set_once(true);
        for name in ["pointerdown", "keydown"] {
            let unlock = Closure::<dyn FnMut()>::new(|| {
                with_site(Site::first_gesture);
            });
            window.add_event_listener_with_callback_and_add_event_listener_options(
                name,
                unlock.as_ref().unchecked_ref(),
                &options,
            )?;
            unlock.forget();
        }
    }

    SITE.with(|cell| *cell.borrow_mut() = Some(site));
    Ok(())
}

fn scan_hero(document: &Document) -> Option<(HeroParts, HeroDom)> {
    let root: Element = select(document.query_selector(r#"[data-player="hero"]"#))?;
    let audio: HtmlMediaElement = select(root.query_selector("[data-hero-audio]"))?;
    let button: HtmlButtonElement = select(root.query_selector("[data-hero-play]"))?;
    let icon: Element = select(root.query_selector("[data-hero-icon]"))?;
    let label: Element = select(root.query_selector("[data-hero-label]"))?;
    let current: Element = select(root.query_selector("[data-hero-current]"))?;
    let duration: Element = select(root.query_selector("[data-hero-duration]"))?;
    let seek: HtmlInputElement = select(root.query_selector("[data-hero-seek]"))?;
    let volume: HtmlInputElement = select(root.query_selector("[data-hero-volume]"))?;
    let error_slot = select(root.query_selector(".audio-player__error"));

    let view = DomPlayerView {
        root,
        button: button.clone(),
        icon: Some(icon),
        label: Some(label),
        current,
        duration,
        seek: seek.clone(),
        error_slot,
        append_error: false,
    };
    let parts = HeroParts {
        element: Some(DomMedia::shared(audio.clone(), MediaKind::Audio)),
        view: Some(Box::new(view)),
        volume_control: Some(volume.value()),
    };

    Some((
        parts,
        HeroDom {
            audio,
            button,
            seek,
            volume,
        },
    ))
}

fn scan_tracks(document: &Document) -> Result<Vec<(TrackParts, TrackDom)>, JsValue> {
    let cards = query_all(document, "[data-track]")?;
    Ok(cards.into_iter().filter_map(scan_track).collect())
}

fn scan_track(card: Element) -> Option<(TrackParts, TrackDom)> {
    let audio: HtmlMediaElement = select(card.query_selector("audio"))?;
    let button: HtmlButtonElement = select(card.query_selector(r#"[data-role="track-play"]"#))?;
    let current: Element = select(card.query_selector(r#"[data-role="track-current"]"#))?;
    let duration: Element = select(card.query_selector(r#"[data-role="track-duration"]"#))?;
    let seek: HtmlInputElement = select(card.query_selector(r#"[data-role="track-seek"]"#))?;

    let view = DomPlayerView {
        root: card,
        button: button.clone(),
        icon: None,
        label: None,
        current,
        duration,
        seek: seek.clone(),
        error_slot: None,
        append_error: true,
    };
    let parts = TrackParts {
        element: Some(DomMedia::shared(audio.clone(), MediaKind::Audio)),
        view: Some(Box::new(view)),
    };

    Some((parts, TrackDom { audio, button, seek }))
}

fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, JsValue> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

fn loose_handle(element: &HtmlMediaElement) -> MediaHandle {
    let kind = if element.tag_name().eq_ignore_ascii_case("video") {
        MediaKind::Video
    } else {
        MediaKind::Audio
    };
    DomMedia::shared(element.clone(), kind)
}

fn attributes(trigger: &Element) -> RawItemAttributes {
    RawItemAttributes {
        src: trigger.get_attribute("data-src"),
        title: trigger.get_attribute("data-title"),
        poster: trigger.get_attribute("data-poster"),
    }
}

fn bind_media(element: &HtmlMediaElement, id: MediaId) -> Result<(), JsValue> {
    let events = [
        ("loadedmetadata", MediaEvent::LoadedMetadata),
        ("timeupdate", MediaEvent::TimeUpdate),
        ("play", MediaEvent::Play),
        ("pause", MediaEvent::Pause),
        ("ended", MediaEvent::Ended),
        ("error", MediaEvent::Error),
    ];

    for (name, event) in events {
        add_listener(element, name, move |_| {
            with_site(|site| site.dispatch(id, event));
        })?
        .forget();
    }
    Ok(())
}

fn seek_percent(seek: &HtmlInputElement) -> Option<f64> {
    seek.value().parse().ok()
}

fn bind_hero(id: MediaId, dom: &HeroDom) -> Result<(), JsValue> {
    bind_media(&dom.audio, id)?;

    add_listener(&dom.button, "click", |_| {
        with_site(|site| {
            if let Some(hero) = site.hero_mut() {
                hero.toggle();
            }
        });
    })?
    .forget();

    let seek = dom.seek.clone();
    add_listener(&dom.seek, "input", move |_| {
        let Some(percent) = seek_percent(&seek) else {
            return;
        };
        with_site(|site| {
            if let Some(hero) = site.hero_mut() {
                hero.seek(percent);
            }
        });
    })?
    .forget();

    let volume = dom.volume.clone();
    add_listener(&dom.volume, "input", move |_| {
        let raw = volume.value();
        with_site(|site| {
            if let Some(hero) = site.hero_mut() {
                hero.set_volume(&raw);
            }
        });
    })?
    .forget();

    Ok(())
}

fn bind_track(index: usize, id: MediaId, dom: &TrackDom) -> Result<(), JsValue> {
    bind_media(&dom.audio, id)?;

    add_listener(&dom.button, "click", move |_| {
        with_site(|site| {
            if let Some(track) = site.track_mut(index) {
                track.toggle();
            }
        });
    })?
    .forget();

    let seek = dom.seek.clone();
    add_listener(&dom.seek, "input", move |_| {
        let Some(percent) = seek_percent(&seek) else {
            return;
        };
        with_site(|site| {
            if let Some(track) = site.track_mut(index) {
                track.seek(percent);
            }
        });
    })?
    .forget();

    Ok(())
}
