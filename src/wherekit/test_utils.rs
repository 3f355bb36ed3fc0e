//! Fixtures shared by unit tests and, behind the `test_utils` feature, by
//! downstream crates.

use crate::model::Palette;
use crate::store::memory::InMemoryStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Six palettes covering every preset:
///
/// | name    | hue | sat  | bright |
/// |---------|-----|------|--------|
/// | Scarlet | 5   | 0.95 | 0.8    |
/// | Amber   | 45  | 0.8  | 0.9    |
/// | Jade    | 150 | 0.2  | 0.4    |
/// | Teal    | 185 | 0.5  | 0.6    |
/// | Indigo  | 260 | 0.1  | 0.3    |
/// | Crimson | 350 | 0.9  | 0.7    |
pub fn palettes() -> Vec<Palette> {
    vec![
        Palette::new("Scarlet", 5, 0.95, 0.8),
        Palette::new("Amber", 45, 0.8, 0.9),
        Palette::new("Jade", 150, 0.2, 0.4),
        Palette::new("Teal", 185, 0.5, 0.6),
        Palette::new("Indigo", 260, 0.1, 0.3),
        Palette::new("Crimson", 350, 0.9, 0.7),
    ]
}

pub fn palette_store() -> InMemoryStore<Palette> {
    InMemoryStore::with_records(palettes())
}

struct WarningCounter(Arc<AtomicUsize>);

impl<S: Subscriber> Layer<S> for WarningCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

/// Run `f` under a scoped subscriber and return how many warnings it emitted.
pub fn count_warnings(f: impl FnOnce()) -> usize {
    let counter = Arc::new(AtomicUsize::new(0));
    let subscriber = tracing_subscriber::registry().with(WarningCounter(Arc::clone(&counter)));
    tracing::subscriber::with_default(subscriber, f);
    counter.load(Ordering::SeqCst)
}
