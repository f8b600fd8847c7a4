//! Provider visibility and ordering.
//!
//! Every provider gets a preference [`Entry`] the first time it is listed.
//! New entries are enabled unless the provider is listed in
//! `hidden-by-default`, and providers listed in `pinned-providers` are forced
//! enabled whatever the stored value says. Ids are matched case-insensitively.
//!
//! Preferences persist as pretty-printed JSON:
//!
//! ```json
//! {
//!   "entries": {
//!     "docs": { "enabled": true, "order": 2 },
//!     "coreshell": { "enabled": false, "order": 0 }
//!   }
//! }
//! ```

use crate::provider::Provider;
use crate::settings::NavigationSettings;
use anyhow::{Context, Error};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fs;
use std::path::Path;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Entry {
    pub enabled: bool,
    /// Sort key, ascending. Ties are broken by title.
    pub order: i32,
}

impl Default for Entry {
    fn default() -> Self {
        Entry {
            enabled: true,
            order: 0,
        }
    }
}

/// A provider as listed in the navigation pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedProvider {
    pub id: String,
    pub title: String,
    pub entry: Entry,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderPreferences {
    entries: IndexMap<String, Entry>,
    #[serde(skip)]
    pinned: Vec<String>,
    #[serde(skip)]
    hidden_by_default: Vec<String>,
}

impl ProviderPreferences {
    pub fn new(settings: &NavigationSettings) -> Self {
        ProviderPreferences {
            entries: IndexMap::new(),
            pinned: settings.pinned_providers.iter().map(|id| key(id)).collect(),
            hidden_by_default: settings.hidden_by_default.iter().map(|id| key(id)).collect(),
        }
    }

    /// Reads preferences from `path`.
    ///
    /// A missing or unreadable file yields empty preferences; the latter is
    /// logged.
    pub fn load_json<P: AsRef<Path>>(path: P, settings: &NavigationSettings) -> Self {
        let path = path.as_ref();
        let mut preferences = ProviderPreferences::new(settings);
        if !path.exists() {
            return preferences;
        }

        match read_entries(path) {
            Ok(entries) => {
                preferences.entries = entries
                    .into_iter()
                    .map(|(id, entry)| (key(&id), entry))
                    .collect();
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %format!("{e:#}"), "ignoring provider preferences");
            }
        }

        preferences
    }

    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("can't create directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("can't serialize preferences")?;
        fs::write(path, json).with_context(|| format!("can't write file {}", path.display()))?;
        Ok(())
    }

    pub fn is_pinned(&self, id: &str) -> bool {
        self.pinned.contains(&key(id))
    }

    /// Returns the entry for `id`, creating it with defaults when missing.
    pub fn get_or_create(&mut self, id: &str) -> Entry {
        let hidden = self.hidden_by_default.contains(&key(id));
        let pinned = self.is_pinned(id);
        let entry = self.entries.entry(key(id)).or_insert_with(|| Entry {
            enabled: !hidden,
            order: 0,
        });
        if pinned {
            entry.enabled = true;
        }
        *entry
    }

    /// Stores `enabled` and `order` for `id`. Pinned providers stay enabled.
    pub fn set(&mut self, id: &str, enabled: bool, order: i32) {
        let enabled = enabled || self.is_pinned(id);
        self.entries.insert(key(id), Entry { enabled, order });
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.entries.shift_remove(&key(id)).is_some()
    }

    /// Lists `providers` by ascending order, then case-insensitive title.
    pub fn build_ordered_list<'a, I>(&mut self, providers: I) -> Vec<OrderedProvider>
    where
        I: IntoIterator<Item = &'a Rc<Provider>>,
    {
        let mut list: Vec<OrderedProvider> = providers
            .into_iter()
            .map(|provider| OrderedProvider {
                id: provider.id().to_string(),
                title: provider.title().to_string(),
                entry: self.get_or_create(provider.id()),
            })
            .collect();

        list.sort_by(|a, b| match a.entry.order.cmp(&b.entry.order) {
            Ordering::Equal => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            other => other,
        });
        list
    }

    /// Copy of every stored entry, keyed by lowercase id.
    pub fn snapshot(&self) -> IndexMap<String, Entry> {
        self.entries.clone()
    }
}

fn read_entries(path: &Path) -> Result<IndexMap<String, Entry>, Error> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("can't read file {}", path.display()))?;
    let stored: ProviderPreferences = serde_json::from_str(&json)
        .with_context(|| format!("can't parse file {}", path.display()))?;
    Ok(stored.entries)
}

#[inline]
fn key(id: &str) -> String {
    id.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings() -> NavigationSettings {
        NavigationSettings {
            pinned_providers: vec!["SettingsUI".to_string()],
            ..NavigationSettings::default()
        }
    }

    fn providers(list: &[(&str, &str)]) -> Vec<Rc<Provider>> {
        list.iter()
            .map(|(id, title)| Rc::new(Provider::new(*id, *title)))
            .collect()
    }

    #[test]
    fn defaults_hide_builtin_providers() {
        let mut preferences = ProviderPreferences::new(&settings());

        assert!(!preferences.get_or_create("CoreShell").enabled);
        assert!(!preferences.get_or_create("sample").enabled);
        assert!(preferences.get_or_create("Docs").enabled);
    }

    #[test]
    fn pinned_provider_cannot_be_disabled() {
        let mut preferences = ProviderPreferences::new(&settings());

        preferences.set("settingsui", false, 5);
        assert_eq!(
            preferences.get_or_create("SettingsUI"),
            Entry {
                enabled: true,
                order: 5
            }
        );

        preferences.set("Docs", false, 1);
        assert!(!preferences.get_or_create("docs").enabled);
    }

    #[test]
    fn ordered_by_order_then_title() {
        let mut preferences = ProviderPreferences::new(&settings());
        preferences.set("Last", true, 10);
        let providers = providers(&[("Last", "Aardvark"), ("b", "beta"), ("A", "Alpha"), ("c", "Gamma")]);

        let list = preferences.build_ordered_list(&providers);
        let titles: Vec<&str> = list.iter().map(|p| p.title.as_str()).collect();

        assert_eq!(titles, vec!["Alpha", "beta", "Gamma", "Aardvark"]);
        assert_eq!(preferences.snapshot().len(), 4);
    }

    #[test]
    fn json_round_trip() -> Result<(), Error> {
        let dir = TempDir::new()?;
        let path = dir.path().join("prefs").join("providers.json");

        let mut preferences = ProviderPreferences::new(&settings());
        preferences.set("Docs", false, 3);
        preferences.get_or_create("Tools");
        preferences.save_json(&path)?;

        let mut loaded = ProviderPreferences::load_json(&path, &settings());
        assert_eq!(
            loaded.get_or_create("DOCS"),
            Entry {
                enabled: false,
                order: 3
            }
        );
        assert!(loaded.remove("tools"));
        assert!(!loaded.remove("tools"));
        Ok(())
    }

    #[test]
    fn unreadable_file_yields_empty_preferences() -> Result<(), Error> {
        let dir = TempDir::new()?;
        let path = dir.path().join("providers.json");
        fs::write(&path, "{ not json")?;

        let preferences = ProviderPreferences::load_json(&path, &settings());
        assert!(preferences.snapshot().is_empty());
        assert!(preferences.is_pinned("SettingsUI"));
        Ok(())
    }
}
