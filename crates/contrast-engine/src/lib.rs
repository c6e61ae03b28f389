//! # Contrast Engine - legible text on accent backgrounds
//!
//! Theme elements opt in with a marker class (`js-contrast` by default). For
//! each marked element the engine resolves the effective background, measures
//! the WCAG contrast ratio against the element's current text color and, when
//! the pairing falls below 4.5:1, writes on-accent custom properties that pick
//! black or white text.
//!
//! ## Core Concepts
//!
//! - [`Document`]: the DOM seam a host implements ([`MockDocument`] in tests)
//! - [`ContrastConfig`]: class names, property names and thresholds
//! - [`resolve_background`]: accent variable → computed → inline fallback chain
//! - [`decide`]: pure decision producing [`PropertyWrite`]s
//! - [`MutationWatcher`] / [`DebounceTimer`]: debounced rescans on DOM changes
//! - [`ContrastEngine`]: lifecycle, frame deferral and the processed memo
//!
//! ## Quick Start
//!
//! ```rust
//! use contrast_engine::{ContrastConfig, ContrastEngine, MockDocument, MockElement};
//!
//! let mut doc = MockDocument::new();
//! let button = doc.append(
//!     None,
//!     MockElement::new()
//!         .class("js-contrast")
//!         .class("c-btn")
//!         .property("--color-accent", "#ffe14d")
//!         .color("#ffffff"),
//! );
//!
//! let mut engine = ContrastEngine::new(ContrastConfig::default());
//! engine.start(&doc);
//! let report = engine.animation_frame(&mut doc);
//!
//! assert_eq!(report.overridden(), 1);
//! assert_eq!(doc.style(button, "--color-on-accent"), Some("#000000"));
//! assert_eq!(doc.style(button, "--color-on-accent-btn-border"), Some("rgba(0, 0, 0, 0.15)"));
//! ```
//!
//! ## Output Contract
//!
//! | Property | Written for |
//! |----------|-------------|
//! | `--color-on-accent` | every override |
//! | `--color-on-accent-btn-text` | button-like elements |
//! | `--color-on-accent-btn-border` | button-like elements |
//! | `--btn-accent-color` | elements with the outline modifier |
//!
//! The `data-contrast-processed` attribute records the background string each
//! element was last resolved against.

mod background;
mod clock;
mod config;
mod decision;
mod dom;
mod engine;
mod error;
mod mock;
mod optin;
mod processed;
mod watcher;

pub use background::{current_text_color, resolve_background, BackgroundSourceKind, ResolvedBackground};
pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ButtonClasses, ContrastConfig, OnAccentPalette, PropertyNames};
pub use decision::{classify_button, decide, ButtonKind, Decision, Override, PropertyWrite};
pub use dom::{ClassList, Document, ElementClasses, ElementId};
pub use engine::{ContrastEngine, ElementOutcome, Outcome, PassReport};
pub use error::{ContrastError, Result, SkipReason};
pub use mock::{MockDocument, MockElement, PageFixture, WriteRecord, WriteTarget};
pub use optin::mark_for_contrast;
pub use processed::ProcessedMap;
pub use watcher::{DebounceTimer, Mutation, MutationWatcher, NodeRef, ObserveOptions, WatcherState};
