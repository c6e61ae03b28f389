//! The contrast engine: lifecycle, scheduling and per-element processing.
//!
//! A host wires the engine to its event loop:
//!
//! | Host event | Engine call |
//! |------------|-------------|
//! | script start | [`ContrastEngine::start`] |
//! | `load` | [`ContrastEngine::on_load`] |
//! | mutation observer callback | [`ContrastEngine::on_mutations`] |
//! | timer for [`ContrastEngine::next_deadline`] | [`ContrastEngine::tick`] |
//! | `requestAnimationFrame` while [`ContrastEngine::frame_pending`] | [`ContrastEngine::animation_frame`] |
//!
//! Passes capture the marked elements when scheduled and process them on the
//! next frame, so layout reads are batched.

use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;

use crate::background::{current_text_color, resolve_background, BackgroundSourceKind};
use crate::clock::{Clock, SystemClock};
use crate::config::ContrastConfig;
use crate::decision::{classify_button, decide, ButtonKind, Decision, PropertyWrite};
use crate::dom::{Document, ElementClasses, ElementId};
use crate::error::SkipReason;
use crate::processed::ProcessedMap;
use crate::watcher::{Mutation, MutationWatcher};

/// What happened to one element during a pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// Background string matches the memo; nothing was evaluated.
    Unchanged,
    /// No decision was possible; nothing was written.
    Skipped { reason: SkipReason },
    /// Contrast already meets the threshold; only the memo was updated.
    AlreadyLegible { background: String, ratio: f64 },
    /// On-accent properties were written.
    Overridden {
        background: String,
        source: BackgroundSourceKind,
        button: ButtonKind,
        use_dark_text: bool,
        writes: Vec<PropertyWrite>,
    },
}

/// An element paired with its outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementOutcome {
    pub element: ElementId,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Outcomes of one or more passes, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PassReport {
    pub outcomes: Vec<ElementOutcome>,
}

impl PassReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn overridden(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Overridden { .. }))
    }

    pub fn legible(&self) -> usize {
        self.count(|o| matches!(o, Outcome::AlreadyLegible { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Unchanged))
    }

    /// The last outcome recorded for `element`.
    pub fn outcome_for(&self, element: ElementId) -> Option<&Outcome> {
        self.outcomes
            .iter()
            .rev()
            .find(|o| o.element == element)
            .map(|o| &o.outcome)
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.outcome)).count()
    }
}

/// Keeps text legible on marked elements.
pub struct ContrastEngine<C: Clock = SystemClock> {
    config: ContrastConfig,
    clock: C,
    watcher: MutationWatcher,
    processed: ProcessedMap,
    frames: VecDeque<Vec<ElementId>>,
    load_handled: bool,
}

impl ContrastEngine<SystemClock> {
    pub fn new(config: ContrastConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }
}

impl Default for ContrastEngine<SystemClock> {
    fn default() -> Self {
        Self::new(ContrastConfig::default())
    }
}

impl<C: Clock> ContrastEngine<C> {
    pub fn with_clock(config: ContrastConfig, clock: C) -> Self {
        let watcher = MutationWatcher::new(config.marker_class.clone(), config.debounce_delay());
        Self {
            config,
            clock,
            watcher,
            processed: ProcessedMap::new(),
            frames: VecDeque::new(),
            load_handled: false,
        }
    }

    pub fn config(&self) -> &ContrastConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn watcher(&self) -> &MutationWatcher {
        &self.watcher
    }

    pub fn processed(&self) -> &ProcessedMap {
        &self.processed
    }

    /// Initial scan. Returns whether a frame was requested.
    pub fn start<D: Document + ?Sized>(&mut self, doc: &D) -> bool {
        self.schedule_pass(doc)
    }

    /// Window `load`: one more scan for late-arriving styles. Later calls are ignored.
    pub fn on_load<D: Document + ?Sized>(&mut self, doc: &D) -> bool {
        if self.load_handled {
            return false;
        }
        self.load_handled = true;
        self.schedule_pass(doc)
    }

    /// Mutation observer callback. Returns whether the debounce timer was (re)armed.
    pub fn on_mutations<D: Document + ?Sized>(&mut self, doc: &D, mutations: &[Mutation]) -> bool {
        let now = self.clock.now();
        self.watcher.observe(doc, mutations, now)
    }

    /// Advances the debounce timer; schedules a pass when it fires.
    pub fn tick<D: Document + ?Sized>(&mut self, doc: &D) -> bool {
        let now = self.clock.now();
        if self.watcher.poll(now) {
            tracing::trace!("debounce elapsed, rescanning");
            self.schedule_pass(doc);
            true
        } else {
            false
        }
    }

    /// When the pending debounce timer fires, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.watcher.timer().deadline()
    }

    pub fn frame_pending(&self) -> bool {
        !self.frames.is_empty()
    }

    pub fn has_pending_work(&self) -> bool {
        self.frame_pending() || self.watcher.timer().is_pending()
    }

    /// Processes every pass queued since the last frame.
    pub fn animation_frame<D: Document + ?Sized>(&mut self, doc: &mut D) -> PassReport {
        let mut report = PassReport::default();
        while let Some(batch) = self.frames.pop_front() {
            for element in batch {
                let outcome = self.process_element(doc, element);
                report.outcomes.push(ElementOutcome { element, outcome });
            }
        }
        self.prune_detached(doc);
        tracing::debug!(
            processed = report.len(),
            overridden = report.overridden(),
            legible = report.legible(),
            skipped = report.skipped(),
            "Contrast frame complete"
        );
        report
    }

    /// Scans and processes synchronously, bypassing frame deferral.
    pub fn run_pass<D: Document + ?Sized>(&mut self, doc: &mut D) -> PassReport {
        let elements = doc.query_class(&self.config.marker_class);
        let outcomes = elements
            .into_iter()
            .map(|element| ElementOutcome {
                element,
                outcome: self.process_element(doc, element),
            })
            .collect();
        self.prune_detached(doc);
        PassReport { outcomes }
    }

    /// Evaluates one element and applies the result.
    pub fn process_element<D: Document + ?Sized>(
        &mut self,
        doc: &mut D,
        element: ElementId,
    ) -> Outcome {
        let outcome = self.evaluate(doc, element);
        match &outcome {
            Outcome::Skipped { reason } => {
                tracing::debug!(%element, %reason, "Skipped contrast element")
            }
            Outcome::Overridden {
                background,
                use_dark_text,
                ..
            } => tracing::debug!(%element, %background, use_dark_text, "Applied on-accent colors"),
            Outcome::AlreadyLegible { background, ratio } => {
                tracing::debug!(%element, %background, ratio, "Contrast already sufficient")
            }
            Outcome::Unchanged => {}
        }
        outcome
    }

    fn evaluate<D: Document + ?Sized>(&mut self, doc: &mut D, element: ElementId) -> Outcome {
        if !doc.is_connected(element) {
            self.processed.forget(element);
            return Outcome::Skipped {
                reason: SkipReason::MissingElement,
            };
        }

        let Some(background) = resolve_background(&*doc, element, &self.config) else {
            return Outcome::Skipped {
                reason: SkipReason::NoBackgroundResolvable,
            };
        };

        if self.processed.matches(element, &background.color) {
            return Outcome::Unchanged;
        }

        let button = classify_button(&ElementClasses::new(&*doc, element), &self.config.buttons);
        let text_color = current_text_color(&*doc, element, &self.config);

        match decide(&self.config, &background, &text_color, button) {
            Decision::Skip(reason) => Outcome::Skipped { reason },
            Decision::Legible { ratio } => {
                self.mark_processed(doc, element, &background.color);
                Outcome::AlreadyLegible {
                    background: background.color,
                    ratio,
                }
            }
            Decision::Override(decision) => {
                for write in &decision.writes {
                    doc.set_style_property(element, &write.name, &write.value);
                }
                self.mark_processed(doc, element, &background.color);
                Outcome::Overridden {
                    background: background.color,
                    source: background.source,
                    button,
                    use_dark_text: decision.use_dark_text,
                    writes: decision.writes,
                }
            }
        }
    }

    fn mark_processed<D: Document + ?Sized>(&mut self, doc: &mut D, element: ElementId, color: &str) {
        self.processed.record(element, color);
        if self.config.mirror_processed_attribute {
            doc.set_attribute(element, &self.config.processed_attribute, color);
        }
    }

    /// Drops memo entries for elements no longer in the document.
    fn prune_detached<D: Document + ?Sized>(&mut self, doc: &D) {
        let before = self.processed.len();
        self.processed.retain(|element| doc.is_connected(element));
        let pruned = before - self.processed.len();
        if pruned > 0 {
            tracing::trace!(pruned, "Dropped memo entries for detached elements");
        }
    }

    fn schedule_pass<D: Document + ?Sized>(&mut self, doc: &D) -> bool {
        let elements = doc.query_class(&self.config.marker_class);
        if elements.is_empty() {
            return false;
        }
        tracing::trace!(count = elements.len(), "Queued contrast pass");
        self.frames.push_back(elements);
        true
    }
}
