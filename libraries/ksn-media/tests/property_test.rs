//! Property-based tests for time formatting and carousel navigation

mod common;

use common::{images, Page, PageLayout};
use ksn_media::{format_time, wrap_index, Key};
use proptest::prelude::*;

fn parse_display(text: &str) -> Option<(u64, u64)> {
    let (minutes, seconds) = text.split_once(':')?;
    Some((minutes.parse().ok()?, seconds.parse().ok()?))
}

proptest! {
    /// Property: output is always M:SS with two-digit seconds below 60
    #[test]
    fn format_time_shape(seconds in proptest::num::f64::ANY) {
        let text = format_time(Some(seconds));
        let (_, secs) = text.split_once(':').unwrap();

        prop_assert_eq!(secs.len(), 2);
        let (_, s) = parse_display(&text).unwrap();
        prop_assert!(s < 60);
    }

    /// Property: the display round-trips to the truncated input
    #[test]
    fn format_time_truncates(seconds in 0.0f64..1_000_000.0) {
        let (m, s) = parse_display(&format_time(Some(seconds))).unwrap();
        prop_assert_eq!(m * 60 + s, seconds.floor() as u64);
    }

    /// Property: negative input falls back to zero
    #[test]
    fn format_time_negative_is_zero(seconds in f64::MIN..0.0) {
        prop_assert_eq!(format_time(Some(seconds)), "0:00");
    }

    /// Property: wrapped index is always in range
    #[test]
    fn wrap_index_in_range(index in 0usize..100, delta in -1000isize..1000, total in 1usize..100) {
        let index = index % total;
        prop_assert!(wrap_index(index, delta, total) < total);
    }

    /// Property: stepping forward then back returns to the start
    #[test]
    fn wrap_index_inverse(index in 0usize..50, delta in -200isize..200, total in 1usize..50) {
        let index = index % total;
        let there = wrap_index(index, delta, total);
        prop_assert_eq!(wrap_index(there, -delta, total), index);
    }

    /// Property: a full lap of arrow presses lands on the starting item
    #[test]
    fn full_lap_returns_home(total in 2usize..8, start in 0usize..8, left in any::<bool>()) {
        let start = start % total;
        let mut page = Page::build(PageLayout {
            gallery: images(total),
            ..PageLayout::default()
        });
        page.site.open_gallery(start);

        let key = if left { Key::ArrowLeft } else { Key::ArrowRight };
        for _ in 0..total {
            prop_assert!(page.site.handle_key(key));
        }

        let session = page.site.gallery().unwrap().session().unwrap();
        prop_assert_eq!(session.current_index(), start);
        prop_assert_eq!(session.counter_text(), format!("{} / {}", start + 1, total));
    }
}
