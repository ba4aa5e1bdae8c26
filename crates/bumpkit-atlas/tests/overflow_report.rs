//! Integration test: a texture that runs out of room logs one error.
//!
//! A counting subscriber is installed for the duration of each test and
//! every ERROR event it sees is tallied.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use bumpkit_atlas::{AtlasConfig, GlyphAtlas, GlyphMetrics, TextureAtlas};
use bumpkit_test_utils::fixtures::heap;
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Level, Metadata, Subscriber};

/// Counts ERROR events; ignores spans.
struct ErrorCounter {
    errors: Arc<AtomicUsize>,
}

impl Subscriber for ErrorCounter {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        if *event.metadata().level() == Level::ERROR {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

/// Run `f` under a fresh counter and return the number of ERROR events.
fn count_errors(f: impl FnOnce()) -> usize {
    let errors = Arc::new(AtomicUsize::new(0));
    let subscriber = ErrorCounter {
        errors: Arc::clone(&errors),
    };
    tracing::subscriber::with_default(subscriber, f);
    errors.load(Ordering::SeqCst)
}

#[test]
fn repeated_overflow_logs_once() {
    let errors = count_errors(|| {
        let alloc = heap();
        let mut texture = TextureAtlas::new(&alloc, &AtlasConfig::new(8, 8)).unwrap();
        for _ in 0..5 {
            assert!(texture.place(4, 9).is_none());
        }
        assert_eq!(texture.failures(), 5);
        // Room is still found after a failure, and nothing more is logged.
        assert!(texture.place(2, 2).is_some());
        assert!(texture.place(9, 1).is_none());
        assert_eq!(texture.failures(), 6);
    });
    assert_eq!(errors, 1);
}

#[test]
fn each_atlas_reports_its_own_overflow() {
    let errors = count_errors(|| {
        let alloc = heap();
        for _ in 0..2 {
            let mut atlas = GlyphAtlas::new(&alloc, &alloc, &AtlasConfig::new(8, 8)).unwrap();
            for codepoint in 0x41..0x45 {
                let metrics = GlyphMetrics {
                    codepoint,
                    advance: 8,
                    width: 8,
                    height: 16,
                    ..GlyphMetrics::default()
                };
                let glyph = atlas.add_glyph(metrics, &[]).unwrap();
                assert!(!glyph.is_placed());
            }
            assert_eq!(atlas.unplaced().unwrap(), 4);
            atlas.release().unwrap();
        }
    });
    assert_eq!(errors, 2);
}

#[test]
fn fitting_placements_log_nothing() {
    let errors = count_errors(|| {
        let alloc = heap();
        let mut texture = TextureAtlas::new(&alloc, &AtlasConfig::new(16, 16)).unwrap();
        for _ in 0..4 {
            assert!(texture.place(3, 3).is_some());
        }
        texture.release().unwrap();
    });
    assert_eq!(errors, 0);
}
