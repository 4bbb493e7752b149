//! Single-value select
//!
//! # Example
//!
//! ```rust
//! use kestrel_cn::cn;
//! use kestrel_core::KeyCode;
//! use kestrel_overlay::overlay_registry;
//!
//! let overlays = overlay_registry();
//! let mut fruit = cn::select()
//!     .option("apple", "Apple")
//!     .option("banana", "Banana")
//!     .disabled_option("cherry", "Cherry")
//!     .default_value("banana")
//!     .build(&overlays);
//!
//! assert_eq!(fruit.trigger_text(), "Banana");
//!
//! fruit.handle_key(KeyCode::ArrowDown.into());
//! assert_eq!(fruit.highlighted_option().map(|o| o.label()), Some("Banana"));
//! ```

use std::sync::Arc;

use kestrel_core::{
    ChangeCallback, InstanceKey, OptionDecl, OptionValue, OwnedState, Selection, SelectionMode,
    SelectionModel, StateOwnership,
};
use kestrel_overlay::{FloatingPosition, FloatingOptions, OverlayRegistry, PositionFn, Rect};

use crate::config::{SelectConfig, WidgetDefinition};
use crate::controller::SelectController;
use crate::i18n::Translator;

/// Builder for select-like controllers
pub struct SelectBuilder<V: OptionValue> {
    key: InstanceKey,
    config: SelectConfig,
    options: Vec<OptionDecl<V>>,
    pub(crate) value: Option<StateOwnership<Selection<V>>>,
    pub(crate) on_value_change: Option<ChangeCallback<Selection<V>>>,
    pub(crate) query: Option<StateOwnership<String>>,
    pub(crate) on_query_change: Option<ChangeCallback<String>>,
    disabled: bool,
    invalid: bool,
    translator: Option<Translator>,
    positioner: Option<PositionFn>,
}

impl<V: OptionValue> SelectBuilder<V> {
    /// Create a builder whose key is derived from the call site
    #[track_caller]
    pub fn new(config: SelectConfig) -> Self {
        let prefix = match (config.searchable, config.mode) {
            (true, _) => "combobox",
            (false, SelectionMode::Multiple) => "multi_select",
            (false, SelectionMode::Single) => "select",
        };
        Self::with_key(InstanceKey::new(prefix), config)
    }

    /// Create a builder with an explicit key
    pub fn with_key(key: InstanceKey, config: SelectConfig) -> Self {
        Self {
            key,
            config,
            options: Vec::new(),
            value: None,
            on_value_change: None,
            query: None,
            on_query_change: None,
            disabled: false,
            invalid: false,
            translator: None,
            positioner: None,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: SelectConfig) -> Self {
        self.config = config;
        self
    }

    pub(crate) fn config_mut(&mut self) -> &mut SelectConfig {
        &mut self.config
    }

    /// Add an option with value and label
    pub fn option(mut self, value: V, label: impl Into<String>) -> Self {
        self.options.push(OptionDecl::new(value, label));
        self
    }

    /// Add a disabled option
    pub fn disabled_option(mut self, value: V, label: impl Into<String>) -> Self {
        self.options
            .push(OptionDecl::new(value, label).disabled(true));
        self
    }

    /// Add a fully specified option
    pub fn option_decl(mut self, decl: OptionDecl<V>) -> Self {
        self.options.push(decl);
        self
    }

    pub fn options(mut self, decls: impl IntoIterator<Item = OptionDecl<V>>) -> Self {
        self.options.extend(decls);
        self
    }

    /// Uncontrolled initial value
    pub fn default_value(mut self, value: V) -> Self {
        self.value = Some(StateOwnership::internal(std::iter::once(value).collect()));
        self
    }

    /// Controlled value
    ///
    /// The widget never changes `current` itself: it calls `on_change` with
    /// the proposed value and waits for
    /// [`sync_value`](SelectController::sync_value).
    pub fn value<F>(mut self, current: Option<V>, on_change: F) -> Self
    where
        F: Fn(Option<&V>) + Send + Sync + 'static,
    {
        self.value = Some(StateOwnership::external(
            current.into_iter().collect(),
            move |next: &Selection<V>| on_change(next.first()),
        ));
        self
    }

    /// Observe changes of an uncontrolled value
    pub fn on_value_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(Option<&V>) + Send + Sync + 'static,
    {
        self.on_value_change = Some(Arc::new(move |next: &Selection<V>| callback(next.first())));
        self
    }

    /// Translation key of the placeholder
    pub fn placeholder(mut self, key: impl Into<String>) -> Self {
        self.config.placeholder = Some(key.into());
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.config.page_size = page_size.max(1);
        self
    }

    pub fn close_on_select(mut self, close: bool) -> Self {
        self.config.close_on_select = Some(close);
        self
    }

    pub fn floating(mut self, options: FloatingOptions) -> Self {
        self.config.floating = options;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn invalid(mut self, invalid: bool) -> Self {
        self.invalid = invalid;
        self
    }

    pub fn translator(mut self, translator: Translator) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Replace the floating position function
    pub fn positioner<F>(mut self, positioner: F) -> Self
    where
        F: Fn(Rect, Rect, Rect, &FloatingOptions) -> FloatingPosition + Send + Sync + 'static,
    {
        self.positioner = Some(Arc::new(positioner));
        self
    }

    /// Build the controller and register the declared options in order
    pub fn build(self, overlays: &OverlayRegistry) -> SelectController<V> {
        let SelectBuilder {
            key,
            config,
            options,
            value,
            on_value_change,
            query,
            on_query_change,
            disabled,
            invalid,
            translator,
            positioner,
        } = self;

        let mode = config.mode;
        let mut controller = SelectController::with_key(key, config, overlays);

        let mut selection = SelectionModel::new(
            mode,
            value.unwrap_or_else(|| StateOwnership::internal(Selection::new())),
        );
        if let Some(observer) = on_value_change {
            selection = selection.with_observer(move |next: &Selection<V>| observer(next));
        }
        controller.replace_selection(selection);

        let mut query_state = OwnedState::new(
            "query",
            query.unwrap_or_else(|| StateOwnership::internal(String::new())),
        );
        if let Some(observer) = on_query_change {
            query_state = query_state.with_observer(move |next: &String| observer(next));
        }
        controller.replace_query(query_state);

        if let Some(translator) = translator {
            controller.set_translator(translator);
        }
        if let Some(positioner) = positioner {
            controller.set_positioner(positioner);
        }
        controller.set_disabled(disabled);
        controller.set_invalid(invalid);

        for decl in options {
            // Rejections are already reported; keep registering the rest
            let _ = controller.register_option(decl);
        }

        tracing::debug!(
            "built {} with {} options",
            controller.key(),
            controller.registry().len()
        );
        controller
    }
}

impl SelectBuilder<String> {
    /// Builder for a widget described in configuration
    #[track_caller]
    pub fn from_definition(definition: &WidgetDefinition) -> Self {
        let mut builder = SelectBuilder::new(definition.select.clone()).options(definition.decls());
        if !definition.value.is_empty() {
            builder.value = Some(StateOwnership::internal(
                definition.value.iter().cloned().collect(),
            ));
        }
        if !definition.query.is_empty() {
            builder.query = Some(StateOwnership::internal(definition.query.clone()));
        }
        builder
    }
}

/// Create a single-value select
#[track_caller]
pub fn select<V: OptionValue>() -> SelectBuilder<V> {
    SelectBuilder::new(SelectConfig::single())
}
