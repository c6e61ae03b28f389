//! End-to-end scenarios for the contrast engine on a simulated page.
//!
//! Each test drives a `TestPage` the way a browser would: initial scan,
//! mutation records, debounce timer and animation frames.

use std::time::Duration;

use contrast_engine::{mark_for_contrast, ContrastConfig, MockDocument, MockElement, Outcome};
use contrast_test::TestPage;

fn marked() -> MockElement {
    MockElement::new().class("js-contrast")
}

// ============================================================================
// Decisions
// ============================================================================

#[test]
fn black_on_black_gets_light_text() {
    let mut page = TestPage::new();
    let el = page.append(marked().background("#000000").color("#000000"));
    page.load();
    assert_eq!(page.style(el, "--color-on-accent"), Some("#ffffff"));
    assert_eq!(page.processed_marker(el).as_deref(), Some("#000000"));
}

#[test]
fn white_on_white_gets_dark_text() {
    let mut page = TestPage::new();
    let el = page.append(marked().background("#ffffff").color("#ffffff"));
    page.load();
    assert_eq!(page.style(el, "--color-on-accent"), Some("#000000"));
}

#[test]
fn legible_pairing_only_records_marker() {
    let mut page = TestPage::new();
    let el = page.append(marked().background("rgb(0,0,0)").color("rgb(255,255,255)"));
    let report = page.load();
    assert!(matches!(
        report.outcome_for(el),
        Some(Outcome::AlreadyLegible { ratio, .. }) if (*ratio - 21.0).abs() < 1e-9
    ));
    assert_eq!(page.style(el, "--color-on-accent"), None);
    assert_eq!(page.processed_marker(el).as_deref(), Some("rgb(0,0,0)"));
}

#[test]
fn outline_button_without_accent_tracks_background() {
    let mut page = TestPage::new();
    let el = page.append(
        marked()
            .class("c-btn")
            .class("c-btn--outline")
            .background("#336699")
            .color("#336699"),
    );
    page.load();
    assert_eq!(page.style(el, "--btn-accent-color"), Some("#336699"));
    assert_eq!(page.style(el, "--color-on-accent"), Some("#ffffff"));
    assert_eq!(page.style(el, "--color-on-accent-btn-text"), Some("#ffffff"));
    assert_eq!(
        page.style(el, "--color-on-accent-btn-border"),
        Some("rgba(255, 255, 255, 0.3)")
    );
}

#[test]
fn tag_accent_inherited_from_card() {
    let mut page = TestPage::new();
    let card = page.append(
        MockElement::new()
            .class("c-card")
            .property("--color-tag-accent", "#f5f5f5")
            .color("#ffffff"),
    );
    let tag = page
        .doc_mut()
        .append(Some(card), marked().class("c-tag"));
    page.load();
    assert_eq!(page.style(tag, "--color-on-accent"), Some("#000000"));
    assert_eq!(page.processed_marker(tag).as_deref(), Some("#f5f5f5"));
}

#[test]
fn unresolvable_elements_are_left_alone() {
    let mut page = TestPage::new();
    let transparent = page.append(marked().background("transparent"));
    let named = page.append(marked().background("rebeccapurple"));
    let report = page.load();
    assert_eq!(report.skipped(), 2);
    assert_eq!(page.processed_marker(transparent), None);
    assert_eq!(page.processed_marker(named), None);
    assert_eq!(page.write_count(), 0);
}

// ============================================================================
// Scheduling
// ============================================================================

#[test]
fn inserted_node_processed_after_debounce_and_frame() {
    let mut page = TestPage::new();
    page.load();

    let container = page.append(MockElement::new().class("c-post-feed"));
    let card = page.insert_into(
        container,
        MockElement::new()
            .class("c-post-card")
            .child(marked().background("#222222").color("#333333")),
    );
    let inner = page.doc().elements().into_iter().find(|id| *id > card).unwrap();

    assert!(!page.advance(Duration::from_millis(99)));
    assert_eq!(page.processed_marker(inner), None);

    assert!(page.advance(Duration::from_millis(1)));
    assert_eq!(page.processed_marker(inner), None, "work waits for the frame");

    page.next_frame();
    assert_eq!(page.processed_marker(inner).as_deref(), Some("#222222"));
    assert_eq!(page.style(inner, "--color-on-accent"), Some("#ffffff"));
}

#[test]
fn burst_of_mutations_coalesces_into_one_pass() {
    let mut page = TestPage::new();
    page.load();

    for _ in 0..5 {
        page.insert(marked().background("#000").color("#000"));
        assert!(!page.advance(Duration::from_millis(60)));
    }
    // 60ms after the last insertion: still quiet period.
    assert!(page.advance(Duration::from_millis(40)));
    let report = page.next_frame();
    assert_eq!(report.len(), 5);
    assert_eq!(report.overridden(), 5);
    assert_eq!(page.reports().len(), 1);
}

#[test]
fn irrelevant_mutations_do_not_schedule() {
    let mut page = TestPage::new();
    page.load();
    page.insert(MockElement::new().class("c-gallery"));
    assert!(!page.flush_mutations());
    assert!(!page.advance(Duration::from_secs(1)));
    assert!(!page.engine().has_pending_work());
}

#[test]
fn engine_writes_settle_without_further_writes() {
    let mut page = TestPage::new();
    page.append(marked().class("kg-btn").background("#ffffff").color("#eeeeee"));
    page.append(marked().background("#111111").color("#000000"));
    page.load();
    let writes = page.write_count();

    // The engine's own style writes come back as mutation records; the
    // rescan they trigger finds nothing to do.
    page.settle();
    assert_eq!(page.write_count(), writes);
    assert!(!page.engine().has_pending_work());
}

#[test]
fn accent_change_is_picked_up() {
    let mut page = TestPage::new();
    let el = page.append(marked().class("c-btn").property("--color-accent", "#000000"));
    page.load();
    assert_eq!(page.style(el, "--color-on-accent"), Some("#ffffff"));

    page.doc_mut().set_property(el, "--color-accent", "#fafafa");
    page.settle();
    assert_eq!(page.style(el, "--color-on-accent"), Some("#000000"));
    assert_eq!(page.processed_marker(el).as_deref(), Some("#fafafa"));
}

#[test]
fn load_event_rescans_once() {
    let mut page = TestPage::new();
    page.load();
    // Late styles arrive before `load` without any observed mutation.
    let el = page.append(marked().background("#000").color("#000"));
    assert!(page.fire_load_event());
    page.next_frame();
    assert_eq!(page.style(el, "--color-on-accent"), Some("#ffffff"));
    assert!(!page.fire_load_event());
}

// ============================================================================
// Collaborators
// ============================================================================

#[test]
fn banner_signup_hook_opts_buttons_in() {
    let mut page = TestPage::with_document(
        MockDocument::from_yaml(
            r##"
elements:
  - classes: [c-block--banner]
    properties: { "--color-accent": "#ffe14d" }
    color: "#ffffff"
    children:
      - classes: [kg-signup-card-button]
  - classes: [kg-signup-card-button]
"##,
        )
        .unwrap(),
        ContrastConfig::default(),
    );
    page.load();

    let config = ContrastConfig::default();
    let marked = mark_for_contrast(
        page.doc_mut(),
        ".c-block--banner .kg-signup-card-button",
        &config,
    );
    assert_eq!(marked, 1);

    page.settle();
    let buttons: Vec<_> = page
        .doc()
        .elements()
        .into_iter()
        .filter(|id| page.doc().classes(*id).iter().any(|c| c == "kg-signup-card-button"))
        .collect();
    assert_eq!(buttons.len(), 2);
    assert_eq!(page.style(buttons[0], "--color-on-accent-btn-text"), Some("#000000"));
    assert_eq!(page.style(buttons[1], "--color-on-accent"), None);
}

#[test]
fn custom_marker_class_and_threshold() {
    let config = ContrastConfig {
        marker_class: "needs-contrast".into(),
        min_ratio: 3.0,
        ..ContrastConfig::default()
    };
    let mut page = TestPage::with_config(config);
    let ignored = page.append(marked().background("#000").color("#000"));
    let passes = page.append(
        MockElement::new()
            .class("needs-contrast")
            .background("#ffffff")
            .color("#777777"),
    );
    let fails = page.append(
        MockElement::new()
            .class("needs-contrast")
            .background("#ffffff")
            .color("#aaaaaa"),
    );
    page.load();
    assert_eq!(page.processed_marker(ignored), None);
    assert_eq!(page.style(passes, "--color-on-accent"), None);
    assert_eq!(page.style(fails, "--color-on-accent"), Some("#000000"));
}

#[test]
fn frame_reports_serialize_for_inspection() {
    let mut page = TestPage::new();
    page.append(marked().class("c-btn").background("#ffffff").color("#ffffff"));
    page.append(marked().background("transparent"));
    page.load();

    let json = serde_json::to_value(&page.reports()[0]).unwrap();
    let outcomes = json["outcomes"].as_array().unwrap();
    assert_eq!(outcomes[0]["outcome"], "overridden");
    assert_eq!(outcomes[0]["button"], "other_button_like");
    assert_eq!(outcomes[0]["source"], "computed");
    assert_eq!(outcomes[1]["outcome"], "skipped");
    assert_eq!(outcomes[1]["reason"], "no_background_resolvable");
}
