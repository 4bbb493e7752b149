//! Select controller
//!
//! The composition root behind every select-like widget. It owns the option
//! registry, the search query, the highlight, the selection and the open
//! state, and turns key presses, pointer presses and imperative calls into
//! transitions of those pieces.
//!
//! Derived state (the visible options and the highlight's validity) is
//! recomputed synchronously after every change, so it is always current when
//! the next event arrives.
//!
//! # Example
//!
//! ```rust
//! use kestrel_cn::{SelectConfig, SelectController};
//! use kestrel_core::{HighlightSeed, OptionDecl};
//! use kestrel_overlay::overlay_registry;
//!
//! let overlays = overlay_registry();
//! let mut fruit = SelectController::new(SelectConfig::single(), &overlays);
//! fruit.register_option(OptionDecl::new("apple", "Apple").disabled(true)).unwrap();
//! fruit.register_option(OptionDecl::new("banana", "Banana")).unwrap();
//!
//! fruit.toggle_open(Some(true), Some(HighlightSeed::First));
//! assert_eq!(fruit.highlighted_option().map(|o| o.label()), Some("Banana"));
//!
//! fruit.activate_highlighted();
//! assert!(!fruit.is_open());
//! assert_eq!(fruit.trigger_text(), "Banana");
//! ```

use std::fmt;
use std::sync::Arc;

use kestrel_core::{
    open_events, EventOutcome, HighlightNavigator, HighlightSeed, InstanceKey, KeyCode, KeyEvent,
    OpenState, OptionDecl, OptionId, OptionRegistry, OptionValue, OwnedState, Registration,
    SearchFilter, SelectError, SelectOption, Selection, SelectionMode, SelectionModel,
    StateOwnership, StateTransitions, Typeahead,
};
use kestrel_overlay::{
    compute_floating_position, FloatingPosition, OverlayHandle, OverlayKind, OverlayRegistry,
    OverlayRegistryExt, Point, PositionFn, Rect, Size,
};
use rustc_hash::FxHashMap;

use crate::config::SelectConfig;
use crate::i18n::Translator;
use crate::option_state::{OptionState, TriggerState};

/// Beyond this many selected values the trigger shows a count instead of labels
const MAX_LISTED_LABELS: usize = 3;

/// Why the list closed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CloseReason {
    Explicit,
    Escape,
    OutsidePointer,
    Commit,
}

impl CloseReason {
    fn event(self) -> u32 {
        match self {
            CloseReason::Explicit => open_events::CLOSE,
            CloseReason::Escape => open_events::ESCAPE,
            CloseReason::OutsidePointer => open_events::OUTSIDE_POINTER,
            CloseReason::Commit => open_events::COMMIT,
        }
    }
}

pub struct SelectController<V: OptionValue> {
    key: InstanceKey,
    config: SelectConfig,
    registry: OptionRegistry<V>,
    /// Last known label of every value, so selections outlive their options
    labels: FxHashMap<V, String>,
    filter: SearchFilter,
    navigator: HighlightNavigator,
    selection: SelectionModel<V>,
    query: OwnedState<String>,
    open: OpenState,
    /// Visible option ids in visual order
    visible: Vec<OptionId>,
    /// Set by a single-select commit; the next open re-seeds from the selection
    reseed_on_open: bool,
    disabled: bool,
    invalid: bool,
    overlays: OverlayRegistry,
    overlay: Option<OverlayHandle>,
    trigger_bounds: Option<Rect>,
    content_bounds: Option<Rect>,
    typeahead: Typeahead,
    translator: Translator,
    positioner: PositionFn,
}

/// Resolve visible ids to options
fn lookup<'a, V: OptionValue>(
    registry: &'a OptionRegistry<V>,
    ids: &[OptionId],
) -> Vec<&'a SelectOption<V>> {
    ids.iter().filter_map(|id| registry.get(*id)).collect()
}

impl<V: OptionValue> SelectController<V> {
    /// Create an uncontrolled controller with no options
    #[track_caller]
    pub fn new(config: SelectConfig, overlays: &OverlayRegistry) -> Self {
        let prefix = match (config.searchable, config.mode) {
            (true, _) => "combobox",
            (false, SelectionMode::Multiple) => "multi_select",
            (false, SelectionMode::Single) => "select",
        };
        Self::with_key(InstanceKey::new(prefix), config, overlays)
    }

    pub fn with_key(key: InstanceKey, config: SelectConfig, overlays: &OverlayRegistry) -> Self {
        let selection = SelectionModel::new(config.mode, StateOwnership::internal(Selection::new()));
        let query = OwnedState::new("query", StateOwnership::internal(String::new()));
        let positioner: PositionFn = Arc::new(compute_floating_position);

        Self {
            key,
            filter: SearchFilter::new(config.case_sensitivity()),
            typeahead: Typeahead::new(config.typeahead_timeout_ms),
            config,
            registry: OptionRegistry::new(),
            labels: FxHashMap::default(),
            navigator: HighlightNavigator::new(),
            selection,
            query,
            open: OpenState::Closed,
            visible: Vec::new(),
            reseed_on_open: false,
            disabled: false,
            invalid: false,
            overlays: Arc::clone(overlays),
            overlay: None,
            trigger_bounds: None,
            content_bounds: None,
            translator: Translator::fallback(),
            positioner,
        }
    }

    pub(crate) fn replace_selection(&mut self, selection: SelectionModel<V>) {
        self.selection = selection;
        self.refresh_visible();
    }

    pub(crate) fn replace_query(&mut self, query: OwnedState<String>) {
        self.query = query;
        self.refresh_visible();
    }

    pub fn set_translator(&mut self, translator: Translator) {
        self.translator = translator;
    }

    pub fn set_positioner(&mut self, positioner: PositionFn) {
        self.positioner = positioner;
    }

    // =========================================================================
    // Option registration
    // =========================================================================

    /// Register a mounted option
    ///
    /// The returned handle unregisters it again through [`unregister`](Self::unregister).
    pub fn register_option(&mut self, decl: OptionDecl<V>) -> Result<Registration, SelectError> {
        let value = decl.value.clone();
        let label = decl.label.clone();
        let registration = self.registry.register(decl)?;
        self.labels.insert(value, label);
        self.refresh_visible();
        Ok(registration)
    }

    pub fn unregister(&mut self, registration: Registration) -> bool {
        self.unregister_option(registration.id())
    }

    /// Remove an option; unknown ids are logged and ignored
    pub fn unregister_option(&mut self, id: OptionId) -> bool {
        if self.registry.unregister(id).is_err() {
            return false;
        }
        self.refresh_visible();
        true
    }

    pub fn set_option_disabled(&mut self, id: OptionId, disabled: bool) -> bool {
        if self.registry.set_disabled(id, disabled).is_err() {
            return false;
        }
        self.refresh_visible();
        true
    }

    pub fn set_option_order(&mut self, id: OptionId, dom_order: u32) -> bool {
        if self.registry.set_dom_order(id, dom_order).is_err() {
            return false;
        }
        self.refresh_visible();
        true
    }

    /// Re-derive the visible options and re-validate the highlight
    fn refresh_visible(&mut self) {
        let options = self.registry.list();
        let query = if self.config.searchable {
            self.query.get().as_str()
        } else {
            ""
        };
        let visible = self.filter.filter(query, &options);

        let selection = &self.selection;
        self.navigator
            .resolve_after_visible_set_change(&visible, |o| selection.is_selected(o.value()));

        self.visible = visible.iter().map(|o| o.id()).collect();
        tracing::trace!(
            "{}: {} of {} options visible, highlight {:?}",
            self.key,
            self.visible.len(),
            self.registry.len(),
            self.navigator.highlighted()
        );
    }

    // =========================================================================
    // Open state
    // =========================================================================

    /// Open, close, or flip the list
    ///
    /// `open: None` toggles. When opening, `seed` picks the end the highlight
    /// starts from; selected options are preferred either way.
    pub fn toggle_open(&mut self, open: Option<bool>, seed: Option<HighlightSeed>) -> bool {
        let open = open.unwrap_or(!self.open.is_open());
        if open {
            self.open_with(seed)
        } else {
            self.close(CloseReason::Explicit)
        }
    }

    fn open_with(&mut self, seed: Option<HighlightSeed>) -> bool {
        if self.disabled {
            tracing::debug!("{}: ignoring open while disabled", self.key);
            return false;
        }
        let Some(next) = self.open.on_event(open_events::OPEN) else {
            return false;
        };

        let was_open = self.open.is_open();
        self.open = next;
        if !was_open {
            self.overlay = Some(self.overlays.open(OverlayKind::Dropdown, self.key.get()));
            self.typeahead.reset();
            tracing::debug!("{}: opened", self.key);
        }

        let reseed = std::mem::take(&mut self.reseed_on_open);
        let visible = lookup(&self.registry, &self.visible);
        let selection = &self.selection;
        let preferred = |o: &&SelectOption<V>| selection.is_selected(o.value());
        match seed {
            Some(seed) => {
                self.navigator.seed(&visible, seed, preferred);
            }
            None => {
                if reseed {
                    self.navigator.clear();
                }
                self.navigator
                    .resolve_after_visible_set_change(&visible, preferred);
            }
        }
        true
    }

    /// Close the list; closing a closed list is a no-op
    pub fn close(&mut self, reason: CloseReason) -> bool {
        let Some(next) = self.open.on_event(reason.event()) else {
            return false;
        };
        self.open = next;

        if let Some(handle) = self.overlay.take() {
            self.overlays.close(handle);
        }
        self.typeahead.reset();
        tracing::debug!("{}: closed ({:?})", self.key, reason);

        if self.config.searchable && !self.query.is_controlled() && !self.query.get().is_empty() {
            self.query.propose(String::new());
            self.refresh_visible();
        }
        true
    }

    // =========================================================================
    // Highlight
    // =========================================================================

    /// Move the highlight by `delta` enabled options
    ///
    /// `±1` wraps around; larger steps clamp at the ends. Only applies while open.
    pub fn move_highlight(&mut self, delta: i32) -> Option<OptionId> {
        if !self.open.is_open() {
            return self.navigator.highlighted();
        }
        let visible = lookup(&self.registry, &self.visible);
        self.navigator.move_by(&visible, delta)
    }

    pub fn highlight_first(&mut self) -> Option<OptionId> {
        let visible = lookup(&self.registry, &self.visible);
        self.navigator.first(&visible)
    }

    pub fn highlight_last(&mut self) -> Option<OptionId> {
        let visible = lookup(&self.registry, &self.visible);
        self.navigator.last(&visible)
    }

    /// Highlight a visible, enabled option
    pub fn highlight(&mut self, id: OptionId) -> Result<(), SelectError> {
        let visible = lookup(&self.registry, &self.visible);
        self.navigator.highlight(id, &visible)
    }

    /// Pointer moved over an option
    pub fn handle_option_hover(&mut self, value: &V) {
        let Some(id) = self
            .registry
            .find_by_value(value)
            .filter(|o| !o.is_disabled())
            .map(|o| o.id())
        else {
            return;
        };
        if self.visible.contains(&id) {
            let _ = self.highlight(id);
        }
    }

    fn typeahead_input(&mut self, c: char, now_ms: u64) {
        self.typeahead.push(c, now_ms);
        let visible = lookup(&self.registry, &self.visible);
        let current = self.navigator.highlighted();
        if let Some(id) = self.typeahead.find_match(&visible, current, |o| o.label()) {
            let _ = self.navigator.highlight(id, &visible);
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Commit the highlighted option
    ///
    /// No-op while closed or with nothing highlighted.
    pub fn activate_highlighted(&mut self) -> bool {
        if !self.open.is_open() {
            return false;
        }
        match self.navigator.highlighted() {
            Some(id) => self.commit(id),
            None => false,
        }
    }

    /// Pointer activation of the option holding `value`
    ///
    /// Same rules as the keyboard: the list must be open and the option
    /// visible and enabled. It is highlighted, then committed.
    pub fn handle_option_activate(&mut self, value: &V) -> bool {
        let Some(id) = self.registry.find_by_value(value).map(|o| o.id()) else {
            SelectError::UnknownValue {
                value: format!("{:?}", value),
            }
            .report();
            return false;
        };

        if !self.open.is_open() {
            tracing::debug!("{}: ignoring activation of {:?} while closed", self.key, value);
            return false;
        }
        // Filtered out or disabled: NotNavigable is reported by the navigator
        if self.highlight(id).is_err() {
            return false;
        }
        self.activate_highlighted()
    }

    fn commit(&mut self, id: OptionId) -> bool {
        let value = match self.registry.get(id) {
            Some(option) if option.is_disabled() => {
                tracing::debug!("{}: ignoring activation of disabled option {:?}", self.key, id);
                return false;
            }
            Some(option) => option.value().clone(),
            None => {
                SelectError::StaleOption {
                    id: format!("{:?}", id),
                }
                .report();
                return false;
            }
        };

        self.selection.toggle(value, None);

        if self.selection.mode() == SelectionMode::Single {
            self.reseed_on_open = true;
        }
        if self.config.closes_on_select() {
            self.close(CloseReason::Commit);
        }
        true
    }

    /// Add every visible enabled option to a multiple selection
    pub fn select_all(&mut self) -> bool {
        let visible = lookup(&self.registry, &self.visible);
        matches!(
            self.selection.select_all_enabled(visible.iter().copied()),
            Ok(Some(_))
        )
    }

    pub fn clear_selection(&mut self) -> bool {
        self.selection.clear().is_some()
    }

    pub fn set_values(&mut self, values: impl IntoIterator<Item = V>) -> bool {
        self.selection.set_values(values).is_some()
    }

    /// Feed a controlled value prop back in; `None` means the prop is omitted
    pub fn sync_value_prop(&mut self, prop: Option<Selection<V>>) {
        self.selection.sync_external(prop);
    }

    /// Controlled single value
    pub fn sync_value(&mut self, value: Option<V>) {
        self.sync_value_prop(Some(value.into_iter().collect()));
    }

    /// Controlled multiple values
    pub fn sync_values(&mut self, values: impl IntoIterator<Item = V>) {
        self.sync_value_prop(Some(values.into_iter().collect()));
    }

    // =========================================================================
    // Query
    // =========================================================================

    /// Text typed into a combobox
    ///
    /// Opens the list if it was closed.
    pub fn set_query(&mut self, text: impl Into<String>) {
        if !self.config.searchable {
            tracing::debug!("{}: set_query on a non-searchable select", self.key);
            return;
        }
        if self.disabled {
            return;
        }

        if self.query.propose(text.into()) && !self.query.is_controlled() {
            self.refresh_visible();
        }
        if !self.open.is_open() {
            self.open_with(None);
        }
    }

    /// Feed a controlled query prop back in; `None` means the prop is omitted
    pub fn sync_query_prop(&mut self, prop: Option<String>) {
        self.query.observe(prop);
        self.refresh_visible();
    }

    // =========================================================================
    // Input events
    // =========================================================================

    pub fn handle_key(&mut self, event: KeyEvent) -> EventOutcome {
        if self.disabled || event.modifiers.has_command() {
            return EventOutcome::Ignored;
        }

        let open = self.open.is_open();
        let searchable = self.config.searchable;
        match event.key {
            KeyCode::ArrowDown => {
                if open {
                    self.move_highlight(1);
                } else {
                    self.toggle_open(Some(true), Some(HighlightSeed::First));
                }
                EventOutcome::Handled
            }
            KeyCode::ArrowUp => {
                if open {
                    self.move_highlight(-1);
                } else {
                    self.toggle_open(Some(true), Some(HighlightSeed::Last));
                }
                EventOutcome::Handled
            }
            KeyCode::Home if open => {
                self.highlight_first();
                EventOutcome::Handled
            }
            KeyCode::End if open => {
                self.highlight_last();
                EventOutcome::Handled
            }
            KeyCode::PageDown if open => {
                self.move_highlight(self.config.page_step());
                EventOutcome::Handled
            }
            KeyCode::PageUp if open => {
                self.move_highlight(-self.config.page_step());
                EventOutcome::Handled
            }
            // Space is text in a combobox
            KeyCode::Space if searchable => EventOutcome::Ignored,
            KeyCode::Enter | KeyCode::Space => {
                if open {
                    self.activate_highlighted();
                    EventOutcome::Handled
                } else if searchable {
                    EventOutcome::Ignored
                } else {
                    self.toggle_open(Some(true), None);
                    EventOutcome::Handled
                }
            }
            KeyCode::Escape => {
                if open && self.receives_escape() {
                    self.close(CloseReason::Escape);
                    EventOutcome::Handled
                } else {
                    EventOutcome::Ignored
                }
            }
            KeyCode::Tab => {
                // Focus moves on; the host keeps the default action
                if open {
                    self.close(CloseReason::Explicit);
                }
                EventOutcome::Ignored
            }
            KeyCode::Char(c) if !searchable => {
                self.typeahead_input(c, event.timestamp_ms);
                EventOutcome::Handled
            }
            _ => EventOutcome::Ignored,
        }
    }

    /// Pointer pressed anywhere in the window
    ///
    /// Closes the list when the press lands outside both the trigger and the
    /// content and this controller owns the topmost overlay.
    pub fn handle_pointer_down(&mut self, point: Point) -> EventOutcome {
        let Some(handle) = self.overlay else {
            return EventOutcome::Ignored;
        };
        if !self.open.is_open() || !self.overlays.receives_outside_pointer(handle) {
            return EventOutcome::Ignored;
        }

        let inside = [self.trigger_bounds, self.content_bounds]
            .iter()
            .flatten()
            .any(|bounds| bounds.contains(point));
        if inside {
            return EventOutcome::Ignored;
        }

        self.close(CloseReason::OutsidePointer);
        EventOutcome::Handled
    }

    pub fn handle_trigger_click(&mut self) -> EventOutcome {
        if self.disabled {
            return EventOutcome::Ignored;
        }
        self.toggle_open(None, None);
        EventOutcome::Handled
    }

    fn receives_escape(&self) -> bool {
        self.overlay
            .is_some_and(|handle| self.overlays.receives_escape(handle))
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    pub fn set_trigger_bounds(&mut self, bounds: Option<Rect>) {
        self.trigger_bounds = bounds;
    }

    pub fn set_content_bounds(&mut self, bounds: Option<Rect>) {
        self.content_bounds = bounds;
    }

    /// Where to place content of `content` size, or `None` before the
    /// trigger has been measured
    pub fn content_position(&self, content: Size, window: Rect) -> Option<FloatingPosition> {
        let anchor = self.trigger_bounds?;
        let content = Rect {
            origin: Point::ZERO,
            size: content,
        };
        Some((self.positioner)(anchor, content, window, &self.config.floating))
    }

    // =========================================================================
    // Widget state
    // =========================================================================

    /// Disabling an open widget closes it
    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.close(CloseReason::Explicit);
        }
    }

    pub fn set_invalid(&mut self, invalid: bool) {
        self.invalid = invalid;
    }

    // =========================================================================
    // Display
    // =========================================================================

    /// Label for `value`, remembered even after its option unmounted
    pub fn label_of(&self, value: &V) -> String {
        if let Some(option) = self.registry.find_by_value(value) {
            return option.label().to_string();
        }
        self.labels
            .get(value)
            .cloned()
            .unwrap_or_else(|| format!("{:?}", value))
    }

    pub fn selected_labels(&self) -> Vec<String> {
        self.selection
            .selected()
            .iter()
            .map(|value| self.label_of(value))
            .collect()
    }

    /// Text shown on the trigger: selected labels or the placeholder
    pub fn trigger_text(&self) -> String {
        let selected = self.selection.selected();
        if selected.is_empty() {
            return self.translator.translate(self.config.placeholder_key(), &[]);
        }
        if selected.len() > MAX_LISTED_LABELS {
            return self
                .translator
                .translate("select.selected_count", &[("count", selected.len().into())]);
        }
        self.selected_labels().join(", ")
    }

    /// Result count announcement for the visible list
    pub fn status_text(&self) -> String {
        match self.visible.len() {
            0 => self.translator.translate("select.no_results", &[]),
            1 => self.translator.translate("select.results_one", &[]),
            n => self
                .translator
                .translate("select.results", &[("count", n.into())]),
        }
    }

    pub fn trigger_state(&self) -> TriggerState {
        TriggerState {
            open: self.open.is_open(),
            disabled: self.disabled,
            invalid: self.invalid,
            has_value: !self.selection.selected().is_empty(),
        }
    }

    pub fn option_state(&self, option: &SelectOption<V>) -> OptionState {
        OptionState {
            disabled: option.is_disabled(),
            is_selected: self.selection.is_selected(option.value()),
            is_highlighted: self.navigator.highlighted() == Some(option.id()),
        }
    }

    /// Call `render` for every visible option, in order
    pub fn render_options<R, F>(&self, mut render: F) -> Vec<R>
    where
        F: FnMut(&SelectOption<V>, OptionState) -> R,
    {
        lookup(&self.registry, &self.visible)
            .into_iter()
            .map(|option| render(option, self.option_state(option)))
            .collect()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn key(&self) -> &InstanceKey {
        &self.key
    }

    pub fn config(&self) -> &SelectConfig {
        &self.config
    }

    pub fn mode(&self) -> SelectionMode {
        self.selection.mode()
    }

    pub fn is_open(&self) -> bool {
        self.open.is_open()
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn is_invalid(&self) -> bool {
        self.invalid
    }

    pub fn highlighted_id(&self) -> Option<OptionId> {
        self.navigator.highlighted()
    }

    pub fn highlighted_option(&self) -> Option<&SelectOption<V>> {
        self.navigator.highlighted().and_then(|id| self.registry.get(id))
    }

    pub fn selected_values(&self) -> &Selection<V> {
        self.selection.selected()
    }

    pub fn is_selected(&self, value: &V) -> bool {
        self.selection.is_selected(value)
    }

    pub fn is_value_controlled(&self) -> bool {
        self.selection.is_controlled()
    }

    pub fn query(&self) -> &str {
        self.query.get()
    }

    pub fn is_query_controlled(&self) -> bool {
        self.query.is_controlled()
    }

    pub fn visible_ids(&self) -> &[OptionId] {
        &self.visible
    }

    pub fn visible_options(&self) -> Vec<&SelectOption<V>> {
        lookup(&self.registry, &self.visible)
    }

    pub fn registry(&self) -> &OptionRegistry<V> {
        &self.registry
    }

    pub fn overlay_handle(&self) -> Option<OverlayHandle> {
        self.overlay
    }
}

impl<V: OptionValue> Drop for SelectController<V> {
    fn drop(&mut self) {
        if let Some(handle) = self.overlay.take() {
            self.overlays.close(handle);
        }
    }
}

impl<V: OptionValue> fmt::Debug for SelectController<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectController")
            .field("key", &self.key)
            .field("mode", &self.selection.mode())
            .field("open", &self.open)
            .field("query", self.query.get())
            .field("visible", &self.visible.len())
            .field("highlighted", &self.navigator.highlighted())
            .field("selected", self.selection.selected())
            .finish()
    }
}
