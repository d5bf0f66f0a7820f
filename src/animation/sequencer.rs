//! Phase orchestration
//!
//! A phase is a group of item animations started with a per-item stagger
//! (`index * per_item_delay_ms` after the phase starts, never after the previous
//! item ends). A [`Sequence`] chains phases; the [`Sequencer`] runs one sequence
//! at a time and rejects new work with [`Error::Busy`] while one is in flight.

use crate::animation::scheduler::AnimationScheduler;
use crate::animation::tween::Delayed;
use crate::traits::{sanitize_delta, Animation};
use crate::{Error, Result};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

/// Named phases of a reading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseKind {
    Entry,
    Flip,
    Reveal,
    ShuffleAppear,
    Orbit,
    CullAndFly,
    Settle,
    Custom(String),
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseKind::Entry => write!(f, "entry"),
            PhaseKind::Flip => write!(f, "flip"),
            PhaseKind::Reveal => write!(f, "reveal"),
            PhaseKind::ShuffleAppear => write!(f, "shuffle-appear"),
            PhaseKind::Orbit => write!(f, "orbit"),
            PhaseKind::CullAndFly => write!(f, "cull-and-fly"),
            PhaseKind::Settle => write!(f, "settle"),
            PhaseKind::Custom(name) => write!(f, "{name}"),
        }
    }
}

/// How a phase or sequence ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseOutcome {
    Completed,
    /// A tween factory returned an error; later phases were not started
    Failed(String),
}

struct SignalState {
    label: String,
    started_at_ms: Option<f64>,
    resolved_at_ms: Option<f64>,
    outcome: Option<PhaseOutcome>,
    waker: Option<Waker>,
    callbacks: Vec<Box<dyn FnOnce(&PhaseOutcome)>>,
}

/// Resolves once every item of a phase (or every phase of a sequence) is done.
///
/// Cheap to clone; all clones observe the same resolution. Can be polled with
/// [`CompletionSignal::is_resolved`], chained with [`CompletionSignal::on_resolve`],
/// or awaited.
#[derive(Clone)]
pub struct CompletionSignal {
    state: Rc<RefCell<SignalState>>,
}

impl CompletionSignal {
    fn new(label: impl Into<String>) -> Self {
        Self {
            state: Rc::new(RefCell::new(SignalState {
                label: label.into(),
                started_at_ms: None,
                resolved_at_ms: None,
                outcome: None,
                waker: None,
                callbacks: Vec::new(),
            })),
        }
    }

    /// A signal that is already resolved, for work that needs no frames
    pub fn resolved(label: impl Into<String>, at_ms: f64) -> Self {
        let signal = Self::new(label);
        signal.mark_started(at_ms);
        signal.resolve(PhaseOutcome::Completed, at_ms);
        signal
    }

    pub fn label(&self) -> String {
        self.state.borrow().label.clone()
    }

    pub fn is_resolved(&self) -> bool {
        self.state.borrow().outcome.is_some()
    }

    pub fn outcome(&self) -> Option<PhaseOutcome> {
        self.state.borrow().outcome.clone()
    }

    /// Sequencer clock when the work started
    pub fn started_at_ms(&self) -> Option<f64> {
        self.state.borrow().started_at_ms
    }

    /// Sequencer clock when the signal resolved
    pub fn resolved_at_ms(&self) -> Option<f64> {
        self.state.borrow().resolved_at_ms
    }

    /// Time between start and resolution
    pub fn elapsed_ms(&self) -> Option<f64> {
        let state = self.state.borrow();
        Some(state.resolved_at_ms? - state.started_at_ms?)
    }

    /// Run `callback` on resolution, or right away if already resolved
    pub fn on_resolve<F>(&self, callback: F)
    where
        F: FnOnce(&PhaseOutcome) + 'static,
    {
        let outcome = self.outcome();
        match outcome {
            Some(outcome) => callback(&outcome),
            None => self.state.borrow_mut().callbacks.push(Box::new(callback)),
        }
    }

    fn mark_started(&self, at_ms: f64) {
        self.state.borrow_mut().started_at_ms = Some(at_ms);
    }

    fn resolve(&self, outcome: PhaseOutcome, at_ms: f64) {
        let (callbacks, waker) = {
            let mut state = self.state.borrow_mut();
            if state.outcome.is_some() {
                return;
            }
            state.outcome = Some(outcome.clone());
            state.resolved_at_ms = Some(at_ms);
            (std::mem::take(&mut state.callbacks), state.waker.take())
        };
        for callback in callbacks {
            callback(&outcome);
        }
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl fmt::Debug for CompletionSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("CompletionSignal")
            .field("label", &state.label)
            .field("outcome", &state.outcome)
            .field("started_at_ms", &state.started_at_ms)
            .field("resolved_at_ms", &state.resolved_at_ms)
            .finish()
    }
}

impl Future for CompletionSignal {
    type Output = PhaseOutcome;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.state.borrow_mut();
        match state.outcome {
            Some(ref outcome) => Poll::Ready(outcome.clone()),
            None => {
                state.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

type PhaseBuilder = Box<dyn FnOnce() -> Result<Vec<Box<dyn Animation>>>>;

/// One step of a sequence. Its items are built when the phase starts, so a
/// phase can depend on what earlier phases left behind.
pub struct PhaseSpec {
    kind: PhaseKind,
    per_item_delay_ms: f64,
    build: PhaseBuilder,
}

impl PhaseSpec {
    /// One animation per item, produced by `factory(index, item)`
    pub fn new<I, F>(kind: PhaseKind, items: Vec<I>, per_item_delay_ms: f64, mut factory: F) -> Self
    where
        I: 'static,
        F: FnMut(usize, I) -> Result<Box<dyn Animation>> + 'static,
    {
        Self {
            kind,
            per_item_delay_ms,
            build: Box::new(move || {
                items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| factory(index, item))
                    .collect()
            }),
        }
    }

    /// Items are computed at phase start by `build`
    pub fn deferred<F>(kind: PhaseKind, per_item_delay_ms: f64, build: F) -> Self
    where
        F: FnOnce() -> Result<Vec<Box<dyn Animation>>> + 'static,
    {
        Self {
            kind,
            per_item_delay_ms,
            build: Box::new(build),
        }
    }

    pub fn kind(&self) -> &PhaseKind {
        &self.kind
    }
}

/// Ordered phases run back to back under one busy period
#[derive(Default)]
pub struct Sequence {
    phases: VecDeque<(PhaseSpec, CompletionSignal)>,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, phase: PhaseSpec) -> Self {
        let signal = CompletionSignal::new(phase.kind.to_string());
        self.phases.push_back((phase, signal));
        self
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Signals for the individual phases, in order
    pub fn phase_signals(&self) -> Vec<CompletionSignal> {
        self.phases.iter().map(|(_, signal)| signal.clone()).collect()
    }

    fn label(&self) -> String {
        self.phases
            .iter()
            .map(|(phase, _)| phase.kind.to_string())
            .collect::<Vec<_>>()
            .join(" > ")
    }
}

struct ActivePhase {
    kind: PhaseKind,
    items: AnimationScheduler,
    signal: CompletionSignal,
}

impl ActivePhase {
    fn start(spec: PhaseSpec, signal: CompletionSignal, now_ms: f64) -> Result<Self> {
        if !spec.per_item_delay_ms.is_finite() || spec.per_item_delay_ms < 0.0 {
            return Err(Error::InvalidTweenInput(format!(
                "per-item delay of phase {} must be finite and non-negative, got {}",
                spec.kind, spec.per_item_delay_ms
            )));
        }
        let animations = (spec.build)()?;
        log::debug!(
            "phase {} started with {} items, {}ms stagger",
            spec.kind,
            animations.len(),
            spec.per_item_delay_ms
        );

        let mut items = AnimationScheduler::new();
        for (index, animation) in animations.into_iter().enumerate() {
            items.add(Box::new(Delayed::new(
                index as f64 * spec.per_item_delay_ms,
                animation,
            )));
        }

        signal.mark_started(now_ms);
        Ok(Self {
            kind: spec.kind,
            items,
            signal,
        })
    }
}

struct ActiveSequence {
    current: Option<ActivePhase>,
    pending: VecDeque<(PhaseSpec, CompletionSignal)>,
    signal: CompletionSignal,
}

/// Runs one sequence of phases at a time.
///
/// Owns the busy state: busy from `run_*` until the last item of the last phase
/// resolved. The sequencer keeps its own clock, advanced only by `advance`.
#[derive(Default)]
pub struct Sequencer {
    clock_ms: f64,
    active: Option<ActiveSequence>,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a phase is in flight
    pub fn is_busy(&self) -> bool {
        self.active.is_some()
    }

    /// Total time this sequencer has been advanced by
    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    /// Kind of the phase currently running
    pub fn current_phase(&self) -> Option<&PhaseKind> {
        self.active
            .as_ref()
            .and_then(|active| active.current.as_ref())
            .map(|phase| &phase.kind)
    }

    /// Start a single phase over `items`
    pub fn run_phase<I, F>(
        &mut self,
        kind: PhaseKind,
        items: Vec<I>,
        per_item_delay_ms: f64,
        tween_factory: F,
    ) -> Result<CompletionSignal>
    where
        I: 'static,
        F: FnMut(usize, I) -> Result<Box<dyn Animation>> + 'static,
    {
        self.run_sequence(Sequence::new().then(PhaseSpec::new(
            kind,
            items,
            per_item_delay_ms,
            tween_factory,
        )))
    }

    /// Start a chain of phases.
    ///
    /// Fails with [`Error::Busy`] while another sequence runs, and with the
    /// factory's error if the first phase cannot be built. Either way nothing
    /// changes. Failures in later phases resolve the signal as
    /// [`PhaseOutcome::Failed`] instead.
    pub fn run_sequence(&mut self, sequence: Sequence) -> Result<CompletionSignal> {
        if self.is_busy() {
            log::warn!("rejecting {} while another phase is active", sequence.label());
            return Err(Error::Busy);
        }

        let signal = CompletionSignal::new(sequence.label());
        let mut pending = sequence.phases;
        let Some((first, first_signal)) = pending.pop_front() else {
            signal.mark_started(self.clock_ms);
            signal.resolve(PhaseOutcome::Completed, self.clock_ms);
            return Ok(signal);
        };

        let current = ActivePhase::start(first, first_signal, self.clock_ms)?;
        signal.mark_started(self.clock_ms);
        self.active = Some(ActiveSequence {
            current: Some(current),
            pending,
            signal: signal.clone(),
        });
        Ok(signal)
    }

    fn finish(&mut self, outcome: PhaseOutcome) {
        if let Some(active) = self.active.take() {
            for (_, signal) in &active.pending {
                signal.resolve(outcome.clone(), self.clock_ms);
            }
            log::debug!("sequence {} finished: {:?}", active.signal.label(), outcome);
            active.signal.resolve(outcome, self.clock_ms);
        }
    }
}

impl Animation for Sequencer {
    /// Advance the running phase. When it resolves, the next phase of the
    /// sequence starts at the end of the same tick.
    fn advance(&mut self, delta_ms: f64) -> bool {
        let delta_ms = sanitize_delta(delta_ms);
        self.clock_ms += delta_ms;

        let Some(active) = self.active.as_mut() else {
            return false;
        };

        let phase_done = match active.current.as_mut() {
            Some(phase) => !phase.items.advance(delta_ms),
            None => true,
        };
        if !phase_done {
            return true;
        }

        if let Some(phase) = active.current.take() {
            log::debug!("phase {} resolved at {:.1}ms", phase.kind, self.clock_ms);
            phase.signal.resolve(PhaseOutcome::Completed, self.clock_ms);
        }

        // Resolution callbacks never reach the sequencer, so `active` is still ours
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        match active.pending.pop_front() {
            None => {
                self.finish(PhaseOutcome::Completed);
                false
            }
            Some((spec, phase_signal)) => {
                let kind = spec.kind.clone();
                match ActivePhase::start(spec, phase_signal.clone(), self.clock_ms) {
                    Ok(mut phase) => {
                        // Zero-length tick: items with no delay left write
                        // their start values now, delayed items are untouched
                        phase.items.advance(0.0);
                        active.current = Some(phase);
                        true
                    }
                    Err(e) => {
                        log::error!("phase {kind} could not start: {e}");
                        let outcome = PhaseOutcome::Failed(e.to_string());
                        phase_signal.resolve(outcome.clone(), self.clock_ms);
                        self.finish(outcome);
                        false
                    }
                }
            }
        }
    }

    fn is_finished(&self) -> bool {
        !self.is_busy()
    }
}
