//! Widget configuration
//!
//! Configuration is plain data so it can live in TOML next to the rest of an
//! application's settings:
//!
//! ```toml
//! [select]
//! mode = "multiple"
//! searchable = true
//! page_size = 5
//!
//! [[options]]
//! value = "apple"
//! label = "Apple"
//!
//! [[options]]
//! value = "banana"
//! label = "Banana"
//! disabled = true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use kestrel_core::{CaseSensitivity, OptionDecl, SelectionMode, DEFAULT_TYPEAHEAD_TIMEOUT_MS};
use kestrel_overlay::FloatingOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// SelectConfig
// =============================================================================

/// Behavior of one select-like widget
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectConfig {
    pub mode: SelectionMode,
    /// Whether the widget has a text query (combobox)
    pub searchable: bool,
    /// Close after a commit; unset means close for single, stay open for multiple
    pub close_on_select: Option<bool>,
    /// Options skipped by PageUp/PageDown
    pub page_size: u32,
    pub typeahead_timeout_ms: u64,
    /// Translation key of the placeholder; a mode-specific key when unset
    pub placeholder: Option<String>,
    pub case_sensitive: bool,
    pub floating: FloatingOptions,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            mode: SelectionMode::Single,
            searchable: false,
            close_on_select: None,
            page_size: 10,
            typeahead_timeout_ms: DEFAULT_TYPEAHEAD_TIMEOUT_MS,
            placeholder: None,
            case_sensitive: false,
            floating: FloatingOptions::default(),
        }
    }
}

impl SelectConfig {
    pub fn single() -> Self {
        Self::default()
    }

    pub fn multiple() -> Self {
        Self {
            mode: SelectionMode::Multiple,
            ..Self::default()
        }
    }

    pub fn combobox() -> Self {
        Self {
            searchable: true,
            ..Self::default()
        }
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: SelectConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&read(path.as_ref())?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1".into()));
        }
        Ok(())
    }

    pub fn closes_on_select(&self) -> bool {
        self.close_on_select
            .unwrap_or(self.mode == SelectionMode::Single)
    }

    pub fn placeholder_key(&self) -> &str {
        match (&self.placeholder, self.searchable, self.mode) {
            (Some(key), _, _) => key.as_str(),
            (None, true, _) => "combobox.placeholder",
            (None, false, SelectionMode::Multiple) => "select.placeholder_multiple",
            (None, false, SelectionMode::Single) => "select.placeholder",
        }
    }

    pub fn case_sensitivity(&self) -> CaseSensitivity {
        if self.case_sensitive {
            CaseSensitivity::CaseSensitive
        } else {
            CaseSensitivity::CaseInsensitive
        }
    }

    /// PageUp/PageDown step, as a signed highlight delta
    pub fn page_step(&self) -> i32 {
        i32::try_from(self.page_size.max(1)).unwrap_or(i32::MAX)
    }
}

// =============================================================================
// WidgetDefinition
// =============================================================================

/// A declared option
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    pub value: String,
    /// Shown text; the value when unset
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub search_keys: Vec<String>,
}

impl OptionSpec {
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.value)
    }

    pub fn to_decl(&self, dom_order: u32) -> OptionDecl<String> {
        OptionDecl::new(self.value.clone(), self.label())
            .disabled(self.disabled)
            .search_keys(self.search_keys.iter().cloned())
            .dom_order(dom_order)
    }
}

/// A complete widget: behavior, options and initial state
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetDefinition {
    pub select: SelectConfig,
    pub options: Vec<OptionSpec>,
    /// Initially selected values
    pub value: Vec<String>,
    /// Initial query text (searchable widgets only)
    pub query: String,
}

impl WidgetDefinition {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let definition: WidgetDefinition = toml::from_str(source)?;
        definition.validate()?;
        Ok(definition)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&read(path.as_ref())?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.select.validate()?;

        let mut seen = rustc_hash::FxHashSet::default();
        for option in &self.options {
            if !seen.insert(option.value.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "option value {:?} is declared twice",
                    option.value
                )));
            }
        }

        if self.select.mode == SelectionMode::Single && self.value.len() > 1 {
            return Err(ConfigError::Invalid(format!(
                "single selection cannot start with {} values",
                self.value.len()
            )));
        }
        Ok(())
    }

    /// Option declarations in declared order
    pub fn decls(&self) -> impl Iterator<Item = OptionDecl<String>> + '_ {
        self.options
            .iter()
            .enumerate()
            .map(|(idx, option)| option.to_decl(u32::try_from(idx).unwrap_or(u32::MAX)))
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
