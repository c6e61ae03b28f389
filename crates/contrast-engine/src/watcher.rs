//! Mutation filtering and the debounce state machine.
//!
//! ```text
//!            relevant mutation                 relevant mutation
//!   Idle  ───────────────────────▶ Pending ◀──────────────────── (deadline reset)
//!    ▲                               │
//!    └──────── poll(now >= deadline) ┘  → caller runs a full pass
//! ```
//!
//! [`DebounceTimer`] knows nothing about the DOM and can be exercised with
//! plain durations. [`MutationWatcher`] adds the relevance filter on top.

use std::time::Duration;

use crate::dom::{Document, ElementId};

/// Timer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatcherState {
    Idle,
    Pending { deadline: Duration },
}

/// Trailing-edge debounce: every trigger pushes the deadline out to
/// `now + delay`; the timer fires once when `poll` sees the deadline pass.
#[derive(Debug, Clone)]
pub struct DebounceTimer {
    delay: Duration,
    state: WatcherState,
}

impl DebounceTimer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            state: WatcherState::Idle,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn state(&self) -> WatcherState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, WatcherState::Pending { .. })
    }

    pub fn deadline(&self) -> Option<Duration> {
        match self.state {
            WatcherState::Pending { deadline } => Some(deadline),
            WatcherState::Idle => None,
        }
    }

    /// Arms the timer, or resets it when already pending.
    pub fn trigger(&mut self, now: Duration) {
        let deadline = now + self.delay;
        tracing::trace!(?deadline, reset = self.is_pending(), "debounce armed");
        self.state = WatcherState::Pending { deadline };
    }

    /// Returns `true` exactly once per burst, when the deadline has passed.
    pub fn poll(&mut self, now: Duration) -> bool {
        match self.state {
            WatcherState::Pending { deadline } if now >= deadline => {
                self.state = WatcherState::Idle;
                true
            }
            _ => false,
        }
    }
}

/// A node reported in a child-list mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    Element(ElementId),
    /// Text, comment and other non-element nodes.
    Other,
}

/// One mutation record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Attributes {
        target: ElementId,
        name: String,
    },
    ChildList {
        target: ElementId,
        added: Vec<NodeRef>,
        removed: Vec<NodeRef>,
    },
}

impl Mutation {
    pub fn attribute(target: ElementId, name: impl Into<String>) -> Self {
        Mutation::Attributes {
            target,
            name: name.into(),
        }
    }

    pub fn added(target: ElementId, nodes: Vec<NodeRef>) -> Self {
        Mutation::ChildList {
            target,
            added: nodes,
            removed: Vec::new(),
        }
    }
}

/// Observer registration a host binding should use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserveOptions {
    pub subtree: bool,
    pub child_list: bool,
    pub attributes: bool,
    pub attribute_filter: Vec<&'static str>,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            subtree: true,
            child_list: true,
            attributes: true,
            attribute_filter: vec!["style", "class"],
        }
    }
}

/// Decides which mutations matter and debounces them.
#[derive(Debug, Clone)]
pub struct MutationWatcher {
    marker_class: String,
    options: ObserveOptions,
    timer: DebounceTimer,
}

impl MutationWatcher {
    pub fn new(marker_class: impl Into<String>, delay: Duration) -> Self {
        Self {
            marker_class: marker_class.into(),
            options: ObserveOptions::default(),
            timer: DebounceTimer::new(delay),
        }
    }

    pub fn options(&self) -> &ObserveOptions {
        &self.options
    }

    pub fn timer(&self) -> &DebounceTimer {
        &self.timer
    }

    /// A mutation is relevant when it changes a watched attribute on a marked
    /// element, or adds an element that is or contains a marked element.
    pub fn is_relevant<D: Document + ?Sized>(&self, doc: &D, mutation: &Mutation) -> bool {
        match mutation {
            Mutation::Attributes { target, name } => {
                self.options.attribute_filter.iter().any(|a| a == name)
                    && doc.has_class(*target, &self.marker_class)
            }
            Mutation::ChildList { added, .. } => added.iter().any(|node| match node {
                NodeRef::Element(id) => {
                    doc.has_class(*id, &self.marker_class)
                        || doc.has_descendant_with_class(*id, &self.marker_class)
                }
                NodeRef::Other => false,
            }),
        }
    }

    /// Feeds a batch of records; returns `true` when the batch (re)armed the timer.
    pub fn observe<D: Document + ?Sized>(
        &mut self,
        doc: &D,
        mutations: &[Mutation],
        now: Duration,
    ) -> bool {
        if mutations.iter().any(|m| self.is_relevant(doc, m)) {
            self.timer.trigger(now);
            true
        } else {
            false
        }
    }

    pub fn poll(&mut self, now: Duration) -> bool {
        self.timer.poll(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockDocument, MockElement};

    const DELAY: Duration = Duration::from_millis(100);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    // =========================================================================
    // DebounceTimer
    // =========================================================================

    #[test]
    fn test_timer_starts_idle() {
        let mut timer = DebounceTimer::new(DELAY);
        assert_eq!(timer.state(), WatcherState::Idle);
        assert!(!timer.poll(ms(1_000)));
    }

    #[test]
    fn test_timer_fires_after_delay() {
        let mut timer = DebounceTimer::new(DELAY);
        timer.trigger(ms(0));
        assert!(!timer.poll(ms(99)));
        assert!(timer.poll(ms(100)));
        assert_eq!(timer.state(), WatcherState::Idle);
        // Fires once per burst.
        assert!(!timer.poll(ms(500)));
    }

    #[test]
    fn test_retrigger_resets_deadline() {
        let mut timer = DebounceTimer::new(DELAY);
        timer.trigger(ms(0));
        timer.trigger(ms(80));
        assert_eq!(timer.deadline(), Some(ms(180)));
        assert!(!timer.poll(ms(150)));
        assert!(timer.poll(ms(180)));
    }

    // =========================================================================
    // Relevance
    // =========================================================================

    fn page() -> (MockDocument, ElementId, ElementId, ElementId) {
        let mut doc = MockDocument::new();
        let marked = doc.append(None, MockElement::new().class("js-contrast"));
        let plain = doc.append(None, MockElement::new().class("c-card"));
        let wrapper = doc.append(
            None,
            MockElement::new().child(MockElement::new().class("js-contrast")),
        );
        (doc, marked, plain, wrapper)
    }

    #[test]
    fn test_attribute_change_on_marked_element_is_relevant() {
        let (doc, marked, plain, _) = page();
        let watcher = MutationWatcher::new("js-contrast", DELAY);
        assert!(watcher.is_relevant(&doc, &Mutation::attribute(marked, "style")));
        assert!(watcher.is_relevant(&doc, &Mutation::attribute(marked, "class")));
        assert!(!watcher.is_relevant(&doc, &Mutation::attribute(plain, "style")));
    }

    #[test]
    fn test_unwatched_attribute_is_ignored() {
        let (doc, marked, _, _) = page();
        let watcher = MutationWatcher::new("js-contrast", DELAY);
        assert!(!watcher.is_relevant(
            &doc,
            &Mutation::attribute(marked, "data-contrast-processed")
        ));
    }

    #[test]
    fn test_added_nodes() {
        let (doc, marked, plain, wrapper) = page();
        let watcher = MutationWatcher::new("js-contrast", DELAY);
        let root = doc.body();
        assert!(watcher.is_relevant(&doc, &Mutation::added(root, vec![NodeRef::Element(marked)])));
        assert!(watcher.is_relevant(&doc, &Mutation::added(root, vec![NodeRef::Element(wrapper)])));
        assert!(!watcher.is_relevant(&doc, &Mutation::added(root, vec![NodeRef::Element(plain)])));
        assert!(!watcher.is_relevant(&doc, &Mutation::added(root, vec![NodeRef::Other])));
    }

    #[test]
    fn test_observe_arms_only_for_relevant_batches() {
        let (doc, marked, plain, _) = page();
        let mut watcher = MutationWatcher::new("js-contrast", DELAY);
        assert!(!watcher.observe(&doc, &[Mutation::attribute(plain, "style")], ms(0)));
        assert!(!watcher.timer().is_pending());

        let batch = [
            Mutation::attribute(plain, "style"),
            Mutation::attribute(marked, "class"),
        ];
        assert!(watcher.observe(&doc, &batch, ms(10)));
        assert_eq!(watcher.timer().deadline(), Some(ms(110)));
        assert!(watcher.poll(ms(110)));
    }

    #[test]
    fn test_default_observe_options() {
        let options = ObserveOptions::default();
        assert!(options.subtree && options.child_list && options.attributes);
        assert_eq!(options.attribute_filter, vec!["style", "class"]);
    }
}
