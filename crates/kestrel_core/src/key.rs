//! Stable unique keys for controller instances.
//!
//! Keys identify a controller in logs and in the overlay registry. They are
//! generated once per instance and never change afterwards.
//!
//! # Example
//!
//! ```
//! use kestrel_core::InstanceKey;
//!
//! // Each builder call gets its own key, even inside a loop
//! let key = InstanceKey::new("select");
//! assert!(key.get().starts_with("select:"));
//!
//! // Explicit key for deterministic behavior (tests, scripted hosts)
//! let key = InstanceKey::explicit("country-picker");
//! assert_eq!(key.to_string(), "country-picker");
//! ```

use uuid::Uuid;

/// Mint a fresh identifier
pub fn generate_stable_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Stable key for a component instance.
///
/// Key format: `{prefix}:{file}:{line}:{uuid}`. The source location makes keys
/// readable in logs; the UUID keeps instances created at the same call site apart.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct InstanceKey {
    key: String,
}

impl InstanceKey {
    /// Create a key from the caller's location plus a fresh UUID
    #[track_caller]
    pub fn new(prefix: &str) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            key: format!(
                "{}:{}:{}:{}",
                prefix,
                loc.file(),
                loc.line(),
                generate_stable_id()
            ),
        }
    }

    /// Use a caller-provided key verbatim
    pub fn explicit(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn get(&self) -> &str {
        &self.key
    }
}

impl std::fmt::Debug for InstanceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "InstanceKey({})", self.key)
    }
}

impl std::fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.key)
    }
}
