//! Left-hand navigation pane.
//!
//! Lists enabled providers in preference order. The pane is rebuilt from the
//! registry whenever providers change or the host asks for a refresh.

use super::{Bus, ShellEvent};
use crate::breadcrumb::{logical_id, HOME_ID};
use crate::preferences::ProviderPreferences;
use crate::provider::ROOT_PAGE;
use crate::registry::ProviderRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Default)]
pub struct NavPane {
    entries: Vec<NavEntry>,
}

impl NavPane {
    pub fn new() -> Self {
        NavPane::default()
    }

    pub fn build_from_providers(
        &mut self,
        registry: &ProviderRegistry,
        preferences: &mut ProviderPreferences,
    ) {
        self.entries = preferences
            .build_ordered_list(registry.all())
            .into_iter()
            .filter(|provider| provider.entry.enabled)
            .map(|provider| NavEntry {
                id: provider.id,
                title: provider.title,
            })
            .collect();

        tracing::debug!(entries = self.entries.len(), "navigation pane rebuilt");
    }

    pub fn entries(&self) -> &[NavEntry] {
        &self.entries
    }

    /// Selects entry `index`, requesting its provider's `Root` page.
    pub fn select(&self, index: usize, bus: &mut Bus) -> bool {
        let Some(entry) = self.entries.get(index) else {
            return false;
        };
        bus.push_back(ShellEvent::Navigate(logical_id(&entry.id, ROOT_PAGE)));
        true
    }

    /// Selects by id. Accepts a listed provider id or `HOME`.
    pub fn select_id(&self, id: &str, bus: &mut Bus) -> bool {
        if let Some(index) = self
            .entries
            .iter()
            .position(|entry| entry.id.eq_ignore_ascii_case(id))
        {
            return self.select(index, bus);
        }

        if id == HOME_ID {
            self.select_home(bus);
            return true;
        }

        false
    }

    pub fn select_home(&self, bus: &mut Bus) {
        bus.push_back(ShellEvent::Navigate(HOME_ID.to_string()));
    }
}
