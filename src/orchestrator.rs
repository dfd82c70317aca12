//! The conversion orchestrator.
//!
//! Every input change is a [`Trigger`]. Each trigger runs the same cycle:
//!
//! ```text
//! apply trigger ─▶ validate ─▶ Busy ─▶ stage (await) ─▶ engine ─▶ publish
//!        │             │
//!        └─ no file ───┴─ invalid ─▶ skipped, nothing changes
//! ```
//!
//! Everything up to and including the switch to Busy happens synchronously
//! inside [`Orchestrator::dispatch`]; the returned future covers the rest.
//! Several cycles may be in flight at once. [`PublishPolicy`] decides which
//! of them is allowed to publish when they finish out of order.

use crate::config::{ConversionParameters, FormControls, OrchestratorConfig, PublishPolicy};
use crate::engine::{EngineRequest, RenderEngine};
use crate::observer::{ConversionObserver, ObserverHandle};
use crate::output::{CycleOutcome, Presentation, SkipReason, UiState, VectorDocument};
use crate::pipeline::stage::{stage, FileSource};
use crate::pipeline::{publish, validate};
use futures::future::{self, BoxFuture};
use futures::FutureExt;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// An input change that re-evaluates the conversion.
#[derive(Clone)]
pub enum Trigger {
    /// A new file replaced the current selection.
    FileSelected(Arc<dyn FileSource>),
    OutputWidth(String),
    Spacing(String),
    Shape(String),
    Grid(String),
    /// The "keep light background" checkbox.
    LightBackground(bool),
    CutPaths(bool),
    /// Re-run with the current controls.
    Refresh,
}

impl Trigger {
    pub fn file(source: impl FileSource + 'static) -> Self {
        Trigger::FileSelected(Arc::new(source))
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::FileSelected(src) => f.debug_tuple("FileSelected").field(&src.name()).finish(),
            Trigger::OutputWidth(v) => f.debug_tuple("OutputWidth").field(v).finish(),
            Trigger::Spacing(v) => f.debug_tuple("Spacing").field(v).finish(),
            Trigger::Shape(v) => f.debug_tuple("Shape").field(v).finish(),
            Trigger::Grid(v) => f.debug_tuple("Grid").field(v).finish(),
            Trigger::LightBackground(v) => f.debug_tuple("LightBackground").field(v).finish(),
            Trigger::CutPaths(v) => f.debug_tuple("CutPaths").field(v).finish(),
            Trigger::Refresh => f.write_str("Refresh"),
        }
    }
}

/// Owner of the conversion-request lifecycle and the presentation state.
///
/// Cheap to clone; clones share the same state.
///
/// # Example
/// ```rust,no_run
/// use svg_halftone::{MemorySource, Orchestrator, OrchestratorConfig, Trigger};
/// use halftone_engine::HalftoneEngine;
///
/// # #[tokio::main]
/// # async fn main() {
/// let orchestrator = Orchestrator::new(HalftoneEngine::default(), OrchestratorConfig::default());
/// let bytes = std::fs::read("portrait.png").unwrap();
/// orchestrator.handle(Trigger::file(MemorySource::new("portrait.png", bytes))).await;
/// orchestrator.handle(Trigger::Spacing("3".into())).await;
///
/// if let Some(download) = orchestrator.presentation().download {
///     println!("{}", download.href);
/// }
/// # }
/// ```
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

struct Inner {
    engine: Box<dyn RenderEngine>,
    config: OrchestratorConfig,
    observer: Option<ObserverHandle>,
    session: Mutex<Session>,
}

struct Session {
    controls: FormControls,
    source: Option<Arc<dyn FileSource>>,
    presentation: Presentation,
    /// Sequence number of the most recently dispatched cycle.
    dispatched: u64,
}

impl Orchestrator {
    pub fn new(engine: impl RenderEngine + 'static, config: OrchestratorConfig) -> Self {
        Self::build(Box::new(engine), config, None)
    }

    /// Like [`Orchestrator::new`], reporting every transition to `observer`.
    pub fn with_observer(
        engine: impl RenderEngine + 'static,
        config: OrchestratorConfig,
        observer: ObserverHandle,
    ) -> Self {
        Self::build(Box::new(engine), config, Some(observer))
    }

    fn build(
        engine: Box<dyn RenderEngine>,
        config: OrchestratorConfig,
        observer: Option<ObserverHandle>,
    ) -> Self {
        let session = Session {
            controls: config.controls.clone(),
            source: None,
            presentation: Presentation::default(),
            dispatched: 0,
        };
        Self {
            inner: Arc::new(Inner {
                engine,
                config,
                observer,
                session: Mutex::new(session),
            }),
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.inner.config
    }

    /// Snapshot of everything the presentation layer shows.
    pub fn presentation(&self) -> Presentation {
        self.lock().presentation.clone()
    }

    pub fn ui_state(&self) -> UiState {
        self.lock().presentation.state.clone()
    }

    /// Snapshot of the current control values.
    pub fn controls(&self) -> FormControls {
        self.lock().controls.clone()
    }

    /// Handle a trigger and wait for its cycle to finish.
    pub async fn handle(&self, trigger: Trigger) -> CycleOutcome {
        self.dispatch(trigger).await
    }

    /// Apply a trigger, validate, and start a cycle.
    ///
    /// Validation, the sequence number and the switch to Busy all happen
    /// before this returns. The returned future stages the file, invokes the
    /// engine and publishes; dropping it abandons the cycle (the busy
    /// indicator then stays on until a later cycle publishes).
    pub fn dispatch(&self, trigger: Trigger) -> BoxFuture<'static, CycleOutcome> {
        debug!("Trigger: {:?}", trigger);
        let mut session = self.lock();
        let selected = session.apply(trigger);

        let prepared = match session.source.clone() {
            None => Err(SkipReason::NoFile),
            Some(source) => validate::validate(&session.controls).map(|params| (source, params)),
        };

        let (source, params) = match prepared {
            Ok(ready) => ready,
            Err(reason) => {
                drop(session);
                if let Some(name) = selected {
                    self.notify(|o| o.on_file_selected(&name));
                }
                debug!("Cycle skipped: {}", reason);
                self.notify(|o| o.on_skipped(&reason));
                return future::ready(CycleOutcome::Skipped(reason)).boxed();
            }
        };

        session.dispatched += 1;
        let sequence = session.dispatched;
        session.presentation.state = UiState::Busy;
        session.presentation.busy = true;
        drop(session);

        if let Some(name) = selected {
            self.notify(|o| o.on_file_selected(&name));
        }
        info!(
            "Cycle {} started: '{}' width={} spacing={} shape={} grid={} invert={} cut_paths={}",
            sequence,
            source.name(),
            params.output_width(),
            params.spacing(),
            params.shape(),
            params.grid(),
            params.invert(),
            params.cut_paths()
        );
        self.notify(|o| o.on_busy(sequence));

        let this = self.clone();
        async move { this.run_cycle(sequence, source, params).await }.boxed()
    }

    // ── Cycle ────────────────────────────────────────────────────────────

    async fn run_cycle(
        &self,
        sequence: u64,
        source: Arc<dyn FileSource>,
        params: ConversionParameters,
    ) -> CycleOutcome {
        let staged = stage(source.as_ref()).await;

        if self.is_superseded(sequence) {
            return self.supersede(sequence);
        }

        let result = match staged {
            Ok(image) => {
                let request = EngineRequest::new(&image.bytes, &params);
                self.inner
                    .engine
                    .convert(&request)
                    .map(|doc| (doc, image.name.clone()))
                    .map_err(|e| e.to_string())
            }
            Err(e) => {
                warn!("Cycle {}: could not read '{}': {}", sequence, source.name(), e);
                Err(e.to_string())
            }
        };

        match result {
            Ok((doc, name)) => self.publish_document(sequence, doc, &name),
            Err(reason) => self.publish_failure(sequence, reason),
        }
    }

    fn publish_document(&self, sequence: u64, doc: VectorDocument, source_name: &str) -> CycleOutcome {
        let publication = publish::publish(&doc, source_name);
        {
            let mut session = self.lock();
            if self.is_stale(&session, sequence) {
                drop(session);
                return self.supersede(sequence);
            }
            let p = &mut session.presentation;
            p.preview = Some(publication.preview.clone());
            p.download = Some(publication.download.clone());
            p.state = UiState::Published(doc);
            p.busy = false;
        }
        info!(
            "Cycle {} published {} bytes as '{}'",
            sequence,
            publication.preview.len(),
            publication.download.file_name
        );
        self.notify(|o| o.on_published(sequence, &publication));
        CycleOutcome::Published { sequence }
    }

    fn publish_failure(&self, sequence: u64, reason: String) -> CycleOutcome {
        let placeholder = &self.inner.config.failure_placeholder;
        {
            let mut session = self.lock();
            if self.is_stale(&session, sequence) {
                drop(session);
                return self.supersede(sequence);
            }
            let p = &mut session.presentation;
            p.preview = Some(placeholder.clone());
            p.state = UiState::Failed;
            p.busy = false;
        }
        warn!("Cycle {} failed: {}", sequence, reason);
        self.notify(|o| o.on_failed(sequence, placeholder, &reason));
        CycleOutcome::Failed { sequence, reason }
    }

    fn supersede(&self, sequence: u64) -> CycleOutcome {
        warn!("Cycle {} superseded by a newer trigger; discarding", sequence);
        self.notify(|o| o.on_superseded(sequence));
        CycleOutcome::Superseded { sequence }
    }

    fn is_superseded(&self, sequence: u64) -> bool {
        let session = self.lock();
        self.is_stale(&session, sequence)
    }

    fn is_stale(&self, session: &Session, sequence: u64) -> bool {
        match self.inner.config.publish_policy {
            PublishPolicy::LatestTrigger => sequence != session.dispatched,
            PublishPolicy::LastToComplete => false,
        }
    }

    // ── Helpers ──────────────────────────────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.inner
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self, f: impl FnOnce(&dyn ConversionObserver)) {
        if let Some(ref observer) = self.inner.observer {
            f(observer.as_ref());
        }
    }
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.inner.config)
            .field("engine", &"<dyn RenderEngine>")
            .field("observer", &self.inner.observer.as_ref().map(|_| "<dyn ConversionObserver>"))
            .finish()
    }
}

impl Session {
    /// Store the trigger's value. Returns the new file name on selection.
    fn apply(&mut self, trigger: Trigger) -> Option<String> {
        match trigger {
            Trigger::FileSelected(source) => {
                let name = source.name().to_string();
                self.presentation.file_name = Some(name.clone());
                self.source = Some(source);
                return Some(name);
            }
            Trigger::OutputWidth(v) => self.controls.output_width = v,
            Trigger::Spacing(v) => self.controls.spacing = v,
            Trigger::Shape(v) => self.controls.shape = v,
            Trigger::Grid(v) => self.controls.grid = v,
            Trigger::LightBackground(v) => self.controls.light_background = v,
            Trigger::CutPaths(v) => self.controls.cut_paths = v,
            Trigger::Refresh => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::engine_fn;
    use crate::pipeline::stage::MemorySource;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_engine(calls: Arc<AtomicUsize>) -> impl RenderEngine {
        engine_fn(move |_: &EngineRequest<'_>| {
            calls.fetch_add(1, Ordering::SeqCst);
            Some("<svg/>".to_string())
        })
    }

    #[tokio::test]
    async fn parameter_edits_without_file_are_noops() {
        let calls = Arc::new(AtomicUsize::new(0));
        let o = Orchestrator::new(counting_engine(calls.clone()), OrchestratorConfig::default());

        for trigger in [
            Trigger::OutputWidth("50".into()),
            Trigger::Spacing("1".into()),
            Trigger::Shape("hex".into()),
            Trigger::Grid("hex".into()),
            Trigger::LightBackground(true),
            Trigger::CutPaths(true),
            Trigger::Refresh,
        ] {
            assert_eq!(o.handle(trigger).await, CycleOutcome::Skipped(SkipReason::NoFile));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(o.presentation(), Presentation::default());
        // the edits were still recorded
        assert_eq!(o.controls().output_width, "50");
        assert!(o.controls().cut_paths);
    }

    #[tokio::test]
    async fn selection_shows_name_even_when_parameters_are_invalid() {
        let calls = Arc::new(AtomicUsize::new(0));
        let o = Orchestrator::new(counting_engine(calls.clone()), OrchestratorConfig::default());
        o.handle(Trigger::OutputWidth("abc".into())).await;

        let outcome = o.handle(Trigger::file(MemorySource::new("cat.png", vec![1u8]))).await;
        assert!(matches!(outcome, CycleOutcome::Skipped(SkipReason::InvalidParameter { .. })));
        let p = o.presentation();
        assert_eq!(p.file_name.as_deref(), Some("cat.png"));
        assert_eq!(p.state, UiState::Idle);
        assert!(!p.busy);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn dispatch_marks_busy_before_awaiting() {
        let calls = Arc::new(AtomicUsize::new(0));
        let o = Orchestrator::new(counting_engine(calls.clone()), OrchestratorConfig::default());

        let cycle = o.dispatch(Trigger::file(MemorySource::new("a.png", vec![1u8])));
        assert_eq!(o.ui_state(), UiState::Busy);
        assert!(o.presentation().busy);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert_eq!(cycle.await, CycleOutcome::Published { sequence: 1 });
        assert!(!o.presentation().busy);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn every_valid_trigger_reruns() {
        let calls = Arc::new(AtomicUsize::new(0));
        let o = Orchestrator::new(counting_engine(calls.clone()), OrchestratorConfig::default());
        o.handle(Trigger::file(MemorySource::new("a.png", vec![1u8]))).await;
        o.handle(Trigger::Shape("circle".into())).await;
        o.handle(Trigger::Shape("circle".into())).await;
        let last = o.handle(Trigger::CutPaths(false)).await;
        assert_eq!(last.sequence(), Some(4));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }
}
