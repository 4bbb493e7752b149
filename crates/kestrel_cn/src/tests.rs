//! End-to-end controller scenarios

use std::sync::{Arc, Mutex};

use kestrel_core::{EventOutcome, HighlightSeed, KeyCode, KeyEvent, OptionDecl};
use kestrel_overlay::{overlay_registry, OverlayRegistry, OverlayRegistryExt, Point, Rect};

use crate::cn;
use crate::controller::{CloseReason, SelectController};

type Controller = SelectController<&'static str>;

/// `[A, B(disabled), C]`
fn abc(overlays: &OverlayRegistry) -> Controller {
    cn::select()
        .option("a", "A")
        .disabled_option("b", "B")
        .option("c", "C")
        .build(overlays)
}

fn highlighted(controller: &Controller) -> Option<&str> {
    controller.highlighted_option().map(|o| o.label())
}

fn key(controller: &mut Controller, key: KeyCode) -> EventOutcome {
    controller.handle_key(KeyEvent::new(key))
}

// =============================================================================
// Navigation
// =============================================================================

#[test]
fn test_next_skips_disabled_and_wraps() {
    let overlays = overlay_registry();
    let mut fruit = abc(&overlays);

    fruit.toggle_open(Some(true), Some(HighlightSeed::First));
    assert_eq!(highlighted(&fruit), Some("A"));

    key(&mut fruit, KeyCode::ArrowDown);
    assert_eq!(highlighted(&fruit), Some("C"));
    key(&mut fruit, KeyCode::ArrowDown);
    assert_eq!(highlighted(&fruit), Some("A"));

    key(&mut fruit, KeyCode::ArrowUp);
    assert_eq!(highlighted(&fruit), Some("C"));
}

#[test]
fn test_open_seeds_past_disabled_first() {
    let overlays = overlay_registry();
    let mut widget = cn::select()
        .disabled_option("a", "A")
        .option("b", "B")
        .build(&overlays);

    assert!(!widget.is_open());
    widget.toggle_open(Some(true), Some(HighlightSeed::First));
    assert!(widget.is_open());
    assert_eq!(highlighted(&widget), Some("B"));
}

#[test]
fn test_arrow_keys_open_with_seed() {
    let overlays = overlay_registry();
    let mut fruit = abc(&overlays);

    assert_eq!(key(&mut fruit, KeyCode::ArrowUp), EventOutcome::Handled);
    assert!(fruit.is_open());
    assert_eq!(highlighted(&fruit), Some("C"));

    fruit.close(CloseReason::Explicit);
    key(&mut fruit, KeyCode::ArrowDown);
    assert_eq!(highlighted(&fruit), Some("A"));
}

#[test]
fn test_seed_prefers_selected() {
    let overlays = overlay_registry();
    let mut fruit = cn::select()
        .option("a", "A")
        .option("b", "B")
        .option("c", "C")
        .default_value("b")
        .build(&overlays);

    key(&mut fruit, KeyCode::ArrowDown);
    assert_eq!(highlighted(&fruit), Some("B"));
}

#[test]
fn test_reopen_with_different_seed() {
    let overlays = overlay_registry();
    let mut fruit = abc(&overlays);

    key(&mut fruit, KeyCode::ArrowDown);
    assert_eq!(highlighted(&fruit), Some("A"));

    fruit.toggle_open(Some(true), Some(HighlightSeed::Last));
    assert!(fruit.is_open());
    assert_eq!(highlighted(&fruit), Some("C"));
    assert_eq!(overlays.open_count(), 1);
}

#[test]
fn test_home_end_and_paging() {
    let overlays = overlay_registry();
    let mut numbers = cn::select()
        .options((0..6).map(|n| OptionDecl::new(n, format!("#{}", n))))
        .page_size(2)
        .build(&overlays);

    // Closed: paging keys do nothing
    assert_eq!(numbers.handle_key(KeyCode::PageDown.into()), EventOutcome::Ignored);

    numbers.toggle_open(Some(true), Some(HighlightSeed::First));
    numbers.handle_key(KeyCode::PageDown.into());
    assert_eq!(numbers.highlighted_option().map(|o| *o.value()), Some(2));

    for _ in 0..5 {
        numbers.handle_key(KeyCode::PageDown.into());
    }
    assert_eq!(numbers.highlighted_option().map(|o| *o.value()), Some(5));

    numbers.handle_key(KeyCode::PageUp.into());
    assert_eq!(numbers.highlighted_option().map(|o| *o.value()), Some(3));

    numbers.handle_key(KeyCode::Home.into());
    assert_eq!(numbers.highlighted_option().map(|o| *o.value()), Some(0));
    numbers.handle_key(KeyCode::End.into());
    assert_eq!(numbers.highlighted_option().map(|o| *o.value()), Some(5));
}

#[test]
fn test_move_highlight_requires_open() {
    let overlays = overlay_registry();
    let mut fruit = abc(&overlays);
    let before = fruit.highlighted_id();
    fruit.move_highlight(1);
    assert_eq!(fruit.highlighted_id(), before);
}

#[test]
fn test_typeahead_highlights_without_opening() {
    let overlays = overlay_registry();
    let mut fruit = cn::select()
        .option("apple", "Apple")
        .option("banana", "Banana")
        .option("blueberry", "Blueberry")
        .build(&overlays);

    assert_eq!(
        fruit.handle_key(KeyEvent::new(KeyCode::Char('b')).at(0)),
        EventOutcome::Handled
    );
    assert!(!fruit.is_open());
    assert_eq!(fruit.highlighted_option().map(|o| o.label()), Some("Banana"));

    fruit.handle_key(KeyEvent::new(KeyCode::Char('l')).at(100));
    assert_eq!(fruit.highlighted_option().map(|o| o.label()), Some("Blueberry"));

    // After a pause the buffer starts over
    fruit.handle_key(KeyEvent::new(KeyCode::Char('a')).at(5_000));
    assert_eq!(fruit.highlighted_option().map(|o| o.label()), Some("Apple"));
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn test_unregistering_highlighted_option_re_resolves() {
    let overlays = overlay_registry();
    let mut fruit = cn::select()
        .option("a", "A")
        .option("b", "B")
        .option("c", "C")
        .default_value("c")
        .build(&overlays);

    fruit.toggle_open(Some(true), None);
    key(&mut fruit, KeyCode::Home);
    assert_eq!(highlighted(&fruit), Some("A"));

    let id = fruit.registry().find_by_value(&"a").unwrap().id();
    assert!(fruit.unregister_option(id));

    // Selected option wins over the first one
    assert_eq!(highlighted(&fruit), Some("C"));
}

#[test]
fn test_disabling_highlighted_option_moves_highlight() {
    let overlays = overlay_registry();
    let mut fruit = abc(&overlays);
    fruit.toggle_open(Some(true), Some(HighlightSeed::First));

    let a = fruit.highlighted_id().unwrap();
    fruit.set_option_disabled(a, true);
    assert_eq!(highlighted(&fruit), Some("C"));
}

#[test]
fn test_registration_handles() {
    let overlays = overlay_registry();
    let mut widget: Controller = cn::select().build(&overlays);

    let reg = widget.register_option(OptionDecl::new("x", "X")).unwrap();
    assert!(widget.register_option(OptionDecl::new("x", "X twice")).is_err());
    assert_eq!(widget.visible_options().len(), 1);

    assert!(widget.unregister(reg));
    assert!(!widget.unregister(reg), "second unregister is stale");
    assert!(widget.visible_options().is_empty());
    assert_eq!(widget.highlighted_id(), None);
}

#[test]
fn test_visible_order_follows_dom_order() {
    let overlays = overlay_registry();
    let mut widget = cn::select()
        .option_decl(OptionDecl::new("c", "C").dom_order(2))
        .option_decl(OptionDecl::new("a", "A").dom_order(0))
        .option_decl(OptionDecl::new("b", "B").dom_order(1))
        .build(&overlays);

    let labels = |w: &Controller| -> Vec<String> {
        w.visible_options().iter().map(|o| o.label().to_string()).collect()
    };
    assert_eq!(labels(&widget), vec!["A", "B", "C"]);

    let a = widget.registry().find_by_value(&"a").unwrap().id();
    widget.set_option_order(a, 9);
    assert_eq!(labels(&widget), vec!["B", "C", "A"]);
}

#[test]
fn test_selection_survives_unmount() {
    let overlays = overlay_registry();
    let mut fruit = cn::select()
        .option("a", "Apple")
        .option("b", "Banana")
        .default_value("b")
        .build(&overlays);

    let b = fruit.registry().find_by_value(&"b").unwrap().id();
    fruit.unregister_option(b);

    assert!(fruit.is_selected(&"b"));
    assert_eq!(fruit.trigger_text(), "Banana");
}

#[test]
fn test_stale_activation_is_ignored() {
    let overlays = overlay_registry();
    let mut fruit = abc(&overlays);
    fruit.toggle_open(Some(true), None);
    assert!(!fruit.handle_option_activate(&"zzz"));
    assert!(!fruit.handle_option_activate(&"b"), "disabled options cannot be chosen");
    assert!(fruit.selected_values().is_empty());
    assert!(fruit.is_open());
}

#[test]
fn test_pointer_activation_requires_open_list() {
    let overlays = overlay_registry();
    let mut fruit = abc(&overlays);

    // Keyboard and pointer agree while closed
    assert!(!fruit.activate_highlighted());
    assert!(!fruit.handle_option_activate(&"a"));
    assert!(fruit.selected_values().is_empty());

    fruit.toggle_open(Some(true), None);
    assert!(fruit.handle_option_activate(&"c"));
    assert!(fruit.is_selected(&"c"));
    assert!(!fruit.is_open());
}

#[test]
fn test_pointer_activation_of_filtered_option_is_ignored() {
    let overlays = overlay_registry();
    let mut country = cn::combobox()
        .option("nz", "New Zealand")
        .option("no", "Norway")
        .build(&overlays);

    country.set_query("nor");
    assert!(country.is_open());
    assert_eq!(country.visible_options().len(), 1);

    // A click that raced the filter update
    assert!(!country.handle_option_activate(&"nz"));
    assert!(country.selected_values().is_empty());
    assert_eq!(country.highlighted_option().map(|o| o.label()), Some("Norway"));

    assert!(country.handle_option_activate(&"no"));
    assert!(country.is_selected(&"no"));
}

// =============================================================================
// Commit and close
// =============================================================================

#[test]
fn test_single_commit_closes_multi_stays_open() {
    let overlays = overlay_registry();
    let mut single = abc(&overlays);
    single.toggle_open(Some(true), Some(HighlightSeed::First));
    key(&mut single, KeyCode::Enter);
    assert!(single.is_selected(&"a"));
    assert!(!single.is_open());
    assert_eq!(overlays.open_count(), 0);

    let mut multi = cn::multi_select()
        .option("a", "A")
        .option("b", "B")
        .build(&overlays);
    multi.toggle_open(Some(true), Some(HighlightSeed::First));
    key(&mut multi, KeyCode::Space);
    assert!(multi.is_open());
    assert!(multi.is_selected(&"a"));
}

#[test]
fn test_multi_toggle_twice_is_identity() {
    let overlays = overlay_registry();
    let mut tags = cn::multi_select()
        .option("a", "A")
        .option("b", "B")
        .option("c", "C")
        .build(&overlays);
    tags.toggle_open(Some(true), None);

    tags.handle_option_activate(&"b");
    assert_eq!(tags.selected_values().len(), 1);
    tags.handle_option_activate(&"b");
    assert!(tags.selected_values().is_empty());

    tags.handle_option_activate(&"a");
    let start = tags.selected_values().clone();
    for value in ["a", "b", "c"] {
        tags.handle_option_activate(&value);
        tags.handle_option_activate(&value);
        assert_eq!(*tags.selected_values(), start);
    }
    assert!(tags.is_open());
}

#[test]
fn test_enter_without_highlight_is_noop() {
    let overlays = overlay_registry();
    let mut widget = cn::select()
        .disabled_option("a", "A")
        .disabled_option("b", "B")
        .build(&overlays);

    key(&mut widget, KeyCode::ArrowDown);
    assert!(widget.is_open());
    assert_eq!(widget.highlighted_id(), None);

    assert_eq!(key(&mut widget, KeyCode::Enter), EventOutcome::Handled);
    assert!(widget.selected_values().is_empty());
    assert!(widget.is_open());
}

#[test]
fn test_close_preserves_highlight() {
    let overlays = overlay_registry();
    let mut fruit = cn::select()
        .option("a", "A")
        .option("b", "B")
        .option("c", "C")
        .build(&overlays);

    key(&mut fruit, KeyCode::ArrowDown);
    key(&mut fruit, KeyCode::ArrowDown);
    assert_eq!(highlighted(&fruit), Some("B"));

    key(&mut fruit, KeyCode::Escape);
    assert!(!fruit.is_open());
    assert!(fruit.selected_values().is_empty());

    fruit.handle_trigger_click();
    assert_eq!(highlighted(&fruit), Some("B"));
}

#[test]
fn test_single_commit_reseeds_from_value_on_next_open() {
    let overlays = overlay_registry();
    let proposals = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&proposals);

    // The owner rejects every proposal and keeps "a"
    let mut fruit = cn::select()
        .option("a", "A")
        .option("b", "B")
        .option("c", "C")
        .value(Some("a"), move |next| sink.lock().unwrap().push(next.copied()))
        .build(&overlays);

    key(&mut fruit, KeyCode::ArrowDown);
    key(&mut fruit, KeyCode::End);
    key(&mut fruit, KeyCode::Enter);
    assert!(!fruit.is_open());
    assert_eq!(*proposals.lock().unwrap(), vec![Some("c")]);
    fruit.sync_value(Some("a"));

    fruit.handle_trigger_click();
    assert_eq!(highlighted(&fruit), Some("A"));
}

#[test]
fn test_close_is_idempotent() {
    let overlays = overlay_registry();
    let mut fruit = abc(&overlays);
    fruit.toggle_open(Some(true), None);
    assert!(fruit.close(CloseReason::Explicit));
    assert!(!fruit.close(CloseReason::Explicit));
    assert!(!fruit.close(CloseReason::Escape));
    assert_eq!(overlays.open_count(), 0);
}

#[test]
fn test_combobox_close_clears_query() {
    let overlays = overlay_registry();
    let mut country = cn::combobox()
        .option("nz", "New Zealand")
        .option("no", "Norway")
        .build(&overlays);

    country.set_query("way");
    assert_eq!(country.visible_options().len(), 1);

    country.handle_pointer_down(Point::new(500.0, 500.0));
    assert!(!country.is_open());
    assert_eq!(country.query(), "");
    assert_eq!(country.visible_options().len(), 2);
}

// =============================================================================
// Overlay stack
// =============================================================================

#[test]
fn test_escape_closes_only_topmost() {
    let overlays = overlay_registry();
    let mut lower = abc(&overlays);
    let mut upper = abc(&overlays);

    lower.toggle_open(Some(true), None);
    upper.toggle_open(Some(true), None);

    assert_eq!(key(&mut lower, KeyCode::Escape), EventOutcome::Ignored);
    assert!(lower.is_open());

    assert_eq!(key(&mut upper, KeyCode::Escape), EventOutcome::Handled);
    assert!(!upper.is_open());

    assert_eq!(key(&mut lower, KeyCode::Escape), EventOutcome::Handled);
    assert!(!lower.is_open());
}

#[test]
fn test_outside_pointer_closes_without_commit() {
    let overlays = overlay_registry();
    let mut fruit = abc(&overlays);
    fruit.set_trigger_bounds(Some(Rect::new(0.0, 0.0, 100.0, 30.0)));
    fruit.set_content_bounds(Some(Rect::new(0.0, 34.0, 100.0, 200.0)));
    fruit.toggle_open(Some(true), Some(HighlightSeed::First));

    assert_eq!(
        fruit.handle_pointer_down(Point::new(50.0, 10.0)),
        EventOutcome::Ignored
    );
    assert_eq!(
        fruit.handle_pointer_down(Point::new(50.0, 100.0)),
        EventOutcome::Ignored
    );
    assert!(fruit.is_open());

    assert_eq!(
        fruit.handle_pointer_down(Point::new(300.0, 300.0)),
        EventOutcome::Handled
    );
    assert!(!fruit.is_open());
    assert!(fruit.selected_values().is_empty());

    // Closed controllers ignore pointer presses
    assert_eq!(
        fruit.handle_pointer_down(Point::new(300.0, 300.0)),
        EventOutcome::Ignored
    );
}

#[test]
fn test_outside_pointer_goes_to_topmost_only() {
    let overlays = overlay_registry();
    let mut lower = abc(&overlays);
    let mut upper = abc(&overlays);
    lower.toggle_open(Some(true), None);
    upper.toggle_open(Some(true), None);

    let far = Point::new(1_000.0, 1_000.0);
    assert_eq!(lower.handle_pointer_down(far), EventOutcome::Ignored);
    assert_eq!(upper.handle_pointer_down(far), EventOutcome::Handled);
    assert_eq!(lower.handle_pointer_down(far), EventOutcome::Handled);
}

#[test]
fn test_drop_releases_overlay() {
    let overlays = overlay_registry();
    {
        let mut fruit = abc(&overlays);
        fruit.toggle_open(Some(true), None);
        assert_eq!(overlays.open_count(), 1);
    }
    assert_eq!(overlays.open_count(), 0);
}

// =============================================================================
// Widget state and display
// =============================================================================

#[test]
fn test_disabled_widget_ignores_input() {
    let overlays = overlay_registry();
    let mut fruit = cn::select()
        .option("a", "A")
        .disabled(true)
        .build(&overlays);

    assert_eq!(key(&mut fruit, KeyCode::ArrowDown), EventOutcome::Ignored);
    assert_eq!(fruit.handle_trigger_click(), EventOutcome::Ignored);
    assert!(!fruit.toggle_open(Some(true), None));
    assert!(fruit.trigger_state().disabled);
}

#[test]
fn test_disabling_open_widget_closes_it() {
    let overlays = overlay_registry();
    let mut fruit = abc(&overlays);
    fruit.toggle_open(Some(true), None);
    fruit.set_disabled(true);
    assert!(!fruit.is_open());
    assert_eq!(overlays.open_count(), 0);
}

#[test]
fn test_controlled_mode_is_fixed() {
    let overlays = overlay_registry();
    let mut fruit = cn::select()
        .option("a", "A")
        .value(Some("a"), |_| {})
        .build(&overlays);

    // Owner stops passing a value: still controlled, value kept
    fruit.sync_value_prop(None);
    assert!(fruit.is_value_controlled());
    assert!(fruit.is_selected(&"a"));
}

#[test]
fn test_render_options_capability_bag() {
    let overlays = overlay_registry();
    let mut fruit = cn::select()
        .option("a", "A")
        .disabled_option("b", "B")
        .option("c", "C")
        .default_value("c")
        .build(&overlays);
    fruit.toggle_open(Some(true), Some(HighlightSeed::First));

    let rendered = fruit.render_options(|option, state| (option.label().to_string(), state));
    assert_eq!(rendered.len(), 3);

    let (_, a) = &rendered[0];
    assert!(!a.disabled && !a.is_selected && !a.is_highlighted);
    let (_, b) = &rendered[1];
    assert!(b.disabled);
    let (_, c) = &rendered[2];
    assert!(c.is_selected && c.is_highlighted);

    let trigger = fruit.trigger_state();
    assert!(trigger.open && trigger.has_value && !trigger.invalid);
}

#[test]
fn test_display_text() {
    let overlays = overlay_registry();
    let mut fruit = abc(&overlays);
    assert_eq!(fruit.trigger_text(), "Select an option");
    assert_eq!(fruit.status_text(), "3 results");

    fruit.toggle_open(Some(true), None);
    fruit.handle_option_activate(&"c");
    assert_eq!(fruit.trigger_text(), "C");

    let mut tags: Controller = cn::multi_select()
        .option("x", "X")
        .placeholder("tags.placeholder")
        .translator(crate::Translator::from_table([("tags.placeholder", "Pick tags")]))
        .build(&overlays);
    assert_eq!(tags.trigger_text(), "Pick tags");
    assert_eq!(tags.status_text(), "select.results_one");
    tags.set_invalid(true);
    assert!(tags.is_invalid());
}
