//! Small per-browser flags: whether the welcome card was seen and which map
//! style the logo last selected.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const KEY_HAS_SEEN_WELCOME: &str = "hasSeenWelcome";
pub const KEY_LOGO_STYLE_INDEX: &str = "logoStyleIndex";
pub const KEY_HAS_INTERACTED_WITH_LOGO: &str = "hasInteractedWithLogo";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrefsError {
    StorageUnavailable,
    Io(String),
}

impl std::fmt::Display for PrefsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrefsError::StorageUnavailable => write!(f, "browser storage unavailable"),
            PrefsError::Io(msg) => write!(f, "preference storage error: {msg}"),
        }
    }
}

impl std::error::Error for PrefsError {}

/// String key/value storage, shaped after the browser's `localStorage`.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError>;
    fn remove(&mut self, key: &str) -> Result<(), PrefsError>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryPreferenceStore {
    values: BTreeMap<String, String>,
}

impl InMemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PreferenceStore for InMemoryPreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PrefsError> {
        self.values.remove(key);
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub has_seen_welcome: bool,
    pub logo_style_index: usize,
    pub has_interacted_with_logo: bool,
}

impl Preferences {
    /// Reads every flag. Missing keys mean a first visit; values that do not
    /// parse are replaced by defaults.
    pub fn load(store: &dyn PreferenceStore) -> Result<Self, PrefsError> {
        let defaults = Preferences::default();
        Ok(Self {
            has_seen_welcome: read(store, KEY_HAS_SEEN_WELCOME)?
                .unwrap_or(defaults.has_seen_welcome),
            logo_style_index: read(store, KEY_LOGO_STYLE_INDEX)?
                .unwrap_or(defaults.logo_style_index),
            has_interacted_with_logo: read(store, KEY_HAS_INTERACTED_WITH_LOGO)?
                .unwrap_or(defaults.has_interacted_with_logo),
        })
    }

    pub fn save(&self, store: &mut dyn PreferenceStore) -> Result<(), PrefsError> {
        store.set(KEY_HAS_SEEN_WELCOME, &self.has_seen_welcome.to_string())?;
        store.set(KEY_LOGO_STYLE_INDEX, &self.logo_style_index.to_string())?;
        store.set(
            KEY_HAS_INTERACTED_WITH_LOGO,
            &self.has_interacted_with_logo.to_string(),
        )?;
        Ok(())
    }

    /// Index into a list of `style_count` map styles.
    pub fn style_index(&self, style_count: usize) -> usize {
        if style_count == 0 {
            0
        } else {
            self.logo_style_index % style_count
        }
    }

    /// Moves to the next map style, wrapping around.
    pub fn cycle_style(&mut self, style_count: usize) -> usize {
        self.has_interacted_with_logo = true;
        self.logo_style_index = if style_count == 0 {
            0
        } else {
            (self.style_index(style_count) + 1) % style_count
        };
        self.logo_style_index
    }
}

fn read<T>(store: &dyn PreferenceStore, key: &str) -> Result<Option<T>, PrefsError>
where
    T: for<'de> Deserialize<'de>,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str::<T>(raw.trim()) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "prefs: unreadable value, using default");
            Ok(None)
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod wasm_storage {
    use super::{PreferenceStore, PrefsError};

    /// `window.localStorage`, looked up on every call.
    #[derive(Debug)]
    pub struct LocalStoragePreferenceStore;

    impl LocalStoragePreferenceStore {
        pub fn new() -> Result<Self, PrefsError> {
            window_local_storage()?;
            Ok(Self)
        }
    }

    impl PreferenceStore for LocalStoragePreferenceStore {
        fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
            window_local_storage()?
                .get_item(key)
                .map_err(|e| PrefsError::Io(format!("get_item({key}) failed: {:?}", e)))
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), PrefsError> {
            window_local_storage()?
                .set_item(key, value)
                .map_err(|e| PrefsError::Io(format!("set_item({key}) failed: {:?}", e)))
        }

        fn remove(&mut self, key: &str) -> Result<(), PrefsError> {
            window_local_storage()?
                .remove_item(key)
                .map_err(|e| PrefsError::Io(format!("remove_item({key}) failed: {:?}", e)))
        }
    }

    fn window_local_storage() -> Result<web_sys::Storage, PrefsError> {
        let win = web_sys::window().ok_or(PrefsError::StorageUnavailable)?;
        win.local_storage()
            .map_err(|e| PrefsError::Io(format!("localStorage error: {:?}", e)))?
            .ok_or(PrefsError::StorageUnavailable)
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_storage::LocalStoragePreferenceStore;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct LocalStoragePreferenceStore;

#[cfg(not(target_arch = "wasm32"))]
impl LocalStoragePreferenceStore {
    pub fn new() -> Result<Self, PrefsError> {
        Err(PrefsError::StorageUnavailable)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl PreferenceStore for LocalStoragePreferenceStore {
    fn get(&self, _key: &str) -> Result<Option<String>, PrefsError> {
        Err(PrefsError::StorageUnavailable)
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), PrefsError> {
        Err(PrefsError::StorageUnavailable)
    }

    fn remove(&mut self, _key: &str) -> Result<(), PrefsError> {
        Err(PrefsError::StorageUnavailable)
    }
}
