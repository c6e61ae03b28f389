//! In-process page harness for the contrast engine.
//!
//! [`TestPage`] owns a [`MockDocument`], a [`FakeClock`] and an engine bound
//! to that clock, and plays the role of the browser event loop: it forwards
//! queued mutation records to the engine, fires the debounce timer when the
//! clock passes its deadline and flushes animation frames on request.
//!
//! ```rust
//! use std::time::Duration;
//! use contrast_engine::MockElement;
//! use contrast_test::TestPage;
//!
//! let mut page = TestPage::new();
//! page.load();
//!
//! let container = page.append(MockElement::new().class("c-feed"));
//! let card = page.insert_into(container, MockElement::new().class("js-contrast").background("#000").color("#000"));
//!
//! page.advance(Duration::from_millis(100));
//! page.next_frame();
//! assert!(page.processed_marker(card).is_some());
//! ```

use std::time::Duration;

use contrast_engine::{
    Clock, ContrastConfig, ContrastEngine, Document, ElementId, FakeClock, MockDocument, MockElement,
    PassReport,
};

/// Upper bound on event-loop turns [`TestPage::settle`] will run.
const MAX_SETTLE_TURNS: usize = 64;

/// A simulated page with a contrast engine attached.
pub struct TestPage {
    doc: MockDocument,
    engine: ContrastEngine<FakeClock>,
    clock: FakeClock,
    reports: Vec<PassReport>,
}

impl Default for TestPage {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPage {
    /// An empty page with the default config.
    pub fn new() -> Self {
        Self::with_document(MockDocument::new(), ContrastConfig::default())
    }

    pub fn with_config(config: ContrastConfig) -> Self {
        Self::with_document(MockDocument::new(), config)
    }

    /// Wraps an existing document, e.g. one loaded from a YAML fixture.
    pub fn with_document(doc: MockDocument, config: ContrastConfig) -> Self {
        let clock = FakeClock::new();
        let engine = ContrastEngine::with_clock(config, clock.clone());
        Self {
            doc,
            engine,
            clock,
            reports: Vec::new(),
        }
    }

    pub fn doc(&self) -> &MockDocument {
        &self.doc
    }

    pub fn doc_mut(&mut self) -> &mut MockDocument {
        &mut self.doc
    }

    pub fn engine(&self) -> &ContrastEngine<FakeClock> {
        &self.engine
    }

    pub fn clock(&self) -> &FakeClock {
        &self.clock
    }

    /// Every frame report produced so far.
    pub fn reports(&self) -> &[PassReport] {
        &self.reports
    }

    /// Adds part of the initial page (no mutation records).
    pub fn append(&mut self, element: MockElement) -> ElementId {
        self.doc.append(None, element)
    }

    /// Inserts under the body the way a script would.
    pub fn insert(&mut self, element: MockElement) -> ElementId {
        self.doc.insert(None, element)
    }

    pub fn insert_into(&mut self, parent: ElementId, element: MockElement) -> ElementId {
        self.doc.insert(Some(parent), element)
    }

    /// Script start: initial scan, then one frame.
    pub fn load(&mut self) -> PassReport {
        self.engine.start(&self.doc);
        self.next_frame()
    }

    /// The window `load` event.
    pub fn fire_load_event(&mut self) -> bool {
        self.engine.on_load(&self.doc)
    }

    /// Delivers queued mutation records to the engine.
    pub fn flush_mutations(&mut self) -> bool {
        let mutations = self.doc.take_mutations();
        if mutations.is_empty() {
            return false;
        }
        self.engine.on_mutations(&self.doc, &mutations)
    }

    /// Moves time forward, delivering mutations first and firing the timer if due.
    pub fn advance(&mut self, by: Duration) -> bool {
        self.flush_mutations();
        self.clock.advance(by);
        self.engine.tick(&self.doc)
    }

    /// Runs one animation frame.
    pub fn next_frame(&mut self) -> PassReport {
        let report = self.engine.animation_frame(&mut self.doc);
        if !report.is_empty() {
            self.reports.push(report.clone());
        }
        report
    }

    /// Runs the event loop until nothing is pending: mutations (including the
    /// engine's own style writes), debounce timers and frames.
    ///
    /// Returns the number of turns taken.
    pub fn settle(&mut self) -> usize {
        for turn in 0..MAX_SETTLE_TURNS {
            self.flush_mutations();
            if self.engine.frame_pending() {
                self.next_frame();
                continue;
            }
            match self.engine.next_deadline() {
                Some(deadline) => {
                    let now = self.clock.now();
                    self.clock.advance(deadline.saturating_sub(now));
                    self.engine.tick(&self.doc);
                }
                None => return turn,
            }
        }
        tracing::warn!(turns = MAX_SETTLE_TURNS, "Page did not settle");
        MAX_SETTLE_TURNS
    }

    pub fn style(&self, element: ElementId, name: &str) -> Option<&str> {
        self.doc.style(element, name)
    }

    pub fn processed_marker(&self, element: ElementId) -> Option<String> {
        self.doc
            .attribute(element, &self.engine.config().processed_attribute)
    }

    /// Style and attribute writes logged so far.
    pub fn write_count(&self) -> usize {
        self.doc.writes().len()
    }
}
