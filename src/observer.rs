//! Observer trait for presentation bindings.
//!
//! Inject an [`Arc<dyn ConversionObserver>`] via
//! [`crate::Orchestrator::with_observer`] to mirror every state transition
//! into a real UI: toggle a spinner, swap the preview, retarget the download
//! link. The orchestrator calls these hooks after it has updated its own
//! [`crate::Presentation`], so reading the presentation from inside a hook
//! sees the new state.
//!
//! # Example
//!
//! ```rust
//! use svg_halftone::ConversionObserver;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//!
//! struct CountingObserver {
//!     published: AtomicUsize,
//! }
//!
//! impl ConversionObserver for CountingObserver {
//!     fn on_published(&self, sequence: u64, _publication: &svg_halftone::Publication) {
//!         self.published.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("cycle {sequence} published");
//!     }
//! }
//! ```

use crate::output::{Publication, SkipReason};
use std::sync::Arc;

/// Called by the orchestrator on each presentation change.
///
/// All methods have default no-op implementations so implementors only
/// override what they care about. Hooks run on whichever task drives the
/// cycle and must not block.
pub trait ConversionObserver: Send + Sync {
    /// A file was selected; the name display should change.
    fn on_file_selected(&self, name: &str) {
        let _ = name;
    }

    /// A cycle passed validation; the busy indicator is now visible.
    fn on_busy(&self, sequence: u64) {
        let _ = sequence;
    }

    /// A cycle published a document. The busy indicator is hidden.
    fn on_published(&self, sequence: u64, publication: &Publication) {
        let _ = (sequence, publication);
    }

    /// A cycle published the failure placeholder. The busy indicator is
    /// hidden; the download link is unchanged.
    fn on_failed(&self, sequence: u64, placeholder: &str, reason: &str) {
        let _ = (sequence, placeholder, reason);
    }

    /// A trigger was ignored. Nothing in the presentation changed.
    fn on_skipped(&self, reason: &SkipReason) {
        let _ = reason;
    }

    /// A cycle finished after a newer one was dispatched and was discarded.
    fn on_superseded(&self, sequence: u64) {
        let _ = sequence;
    }
}

/// Observer that ignores every event. This is the default.
pub struct NoopObserver;

impl ConversionObserver for NoopObserver {}

/// Convenience alias matching the type stored in the orchestrator.
pub type ObserverHandle = Arc<dyn ConversionObserver>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::DownloadArtifact;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Tracking {
        busy: AtomicUsize,
        published: AtomicUsize,
        failed: AtomicUsize,
    }

    impl ConversionObserver for Tracking {
        fn on_busy(&self, _sequence: u64) {
            self.busy.fetch_add(1, Ordering::SeqCst);
        }

        fn on_published(&self, _sequence: u64, _publication: &Publication) {
            self.published.fetch_add(1, Ordering::SeqCst);
        }

        fn on_failed(&self, _sequence: u64, _placeholder: &str, _reason: &str) {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_observer_does_not_panic() {
        let o = NoopObserver;
        o.on_file_selected("a.png");
        o.on_busy(1);
        o.on_failed(1, "<p>x</p>", "boom");
        o.on_skipped(&SkipReason::NoFile);
        o.on_superseded(1);
    }

    #[test]
    fn overridden_hooks_receive_events() {
        let t = Tracking::default();
        let publication = Publication {
            preview: "<svg/>".into(),
            download: DownloadArtifact {
                href: "data:,".into(),
                file_name: "a.svg".into(),
            },
        };
        t.on_busy(1);
        t.on_published(1, &publication);
        t.on_busy(2);
        t.on_failed(2, "<p>x</p>", "no output");
        t.on_skipped(&SkipReason::NoFile);

        assert_eq!(t.busy.load(Ordering::SeqCst), 2);
        assert_eq!(t.published.load(Ordering::SeqCst), 1);
        assert_eq!(t.failed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn handle_is_shareable() {
        let h: ObserverHandle = Arc::new(NoopObserver);
        let h2 = Arc::clone(&h);
        h2.on_busy(3);
    }
}
