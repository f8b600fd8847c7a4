//! Programmatic entry point for hosts and other providers.
//!
//! A [`SettingsShell`] bundles the registry, the router and the views and
//! drives them from the host's frame loop:
//!
//! ```text
//!  host input ──► views ──► Bus ──┐
//!                                 ▼
//!  host frame ──► SettingsShell::tick ──► refresh nav pane (if providers changed)
//!                                     ├──► drain Bus into the router
//!                                     └──► advance the presenter
//! ```
//!
//! Registry listeners run while the registry is mutably borrowed, so the
//! shell's listener only raises a flag and the navigation pane is rebuilt on
//! the next tick.

use crate::breadcrumb::HOME_ID;
use crate::content::CardRenderer;
use crate::core_shell::{core_shell_provider, CORE_SHELL_ID};
use crate::preferences::ProviderPreferences;
use crate::provider::Provider;
use crate::registry::SharedRegistry;
use crate::router::{GuardDecision, NavOutcome, Router};
use crate::settings::ShellSettings;
use crate::view::{Bus, NavPane, ShellEvent};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

/// Version of the shell's public API.
pub const API_VERSION: &str = "1.0.0";

/// Whether [`API_VERSION`] is at least `min_version`.
///
/// Accepts `"1"`, `"1.0"` and `"1.0.0"`. A pre-release suffix (`"1.0.0-pre"`)
/// is ignored and components that are not numbers count as `0`. A blank
/// requirement is always met.
pub fn is_version_at_least(min_version: &str) -> bool {
    if min_version.trim().is_empty() {
        return true;
    }
    parse_version(API_VERSION) >= parse_version(min_version)
}

fn parse_version(version: &str) -> (u32, u32, u32) {
    let core = version.trim().split('-').next().unwrap_or_default();
    let mut parts = core.split('.').map(|part| part.parse::<u32>().unwrap_or(0));
    (
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
    )
}

pub struct SettingsShell<R: CardRenderer> {
    registry: SharedRegistry,
    router: Router<R>,
    nav_pane: NavPane,
    preferences: ProviderPreferences,
    bus: Bus,
    providers_changed: Rc<Cell<bool>>,
    initialized: bool,
    visible: bool,
}

impl<R: CardRenderer> SettingsShell<R> {
    pub fn new(registry: SharedRegistry, renderer: R, settings: &ShellSettings) -> Self {
        let providers_changed = Rc::new(Cell::new(false));
        {
            let flag = Rc::clone(&providers_changed);
            registry
                .borrow_mut()
                .subscribe(move |_change| flag.set(true));
        }

        SettingsShell {
            router: Router::new(Rc::clone(&registry), renderer, settings),
            registry,
            nav_pane: NavPane::new(),
            preferences: ProviderPreferences::new(&settings.navigation),
            bus: Bus::new(),
            providers_changed,
            initialized: false,
            visible: false,
        }
    }

    /// Replaces the provider preferences, typically with ones loaded from disk.
    pub fn with_preferences(mut self, preferences: ProviderPreferences) -> Self {
        self.preferences = preferences;
        if self.initialized {
            self.refresh_nav();
        }
        self
    }

    /// Registers the built-in providers and builds the navigation pane.
    ///
    /// Safe to call more than once. A Home provider registered by the host
    /// beforehand is kept.
    pub fn ensure_initialized(&mut self) {
        if self.initialized {
            return;
        }
        self.initialized = true;

        let core = core_shell_provider(Rc::downgrade(&self.registry));
        if !self.registry.borrow_mut().register(core, false) {
            tracing::debug!(provider_id = CORE_SHELL_ID, "keeping existing home provider");
        }
        self.refresh_nav();

        tracing::info!(api_version = API_VERSION, "settings shell initialized");
    }

    /// Shows or hides the shell. Showing it navigates to Home.
    pub fn toggle_visibility(&mut self) -> bool {
        self.ensure_initialized();
        self.visible = !self.visible;
        tracing::debug!(visible = self.visible, "visibility toggled");

        if self.visible {
            self.router.navigate_to(HOME_ID);
        }
        self.visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn navigate_to(&mut self, target: &str) -> NavOutcome {
        self.ensure_initialized();
        self.router.navigate_to(target)
    }

    pub fn resolve_guard(&mut self, decision: GuardDecision) -> NavOutcome {
        self.router.resolve_guard(decision)
    }

    /// Registers `provider`, replacing any provider with the same id.
    pub fn register_provider(&mut self, provider: impl Into<Rc<Provider>>) -> bool {
        let registered = self.registry.borrow_mut().register(provider, true);
        self.refresh_if_changed();
        registered
    }

    pub fn unregister_provider(&mut self, id: &str) -> bool {
        let removed = self.registry.borrow_mut().unregister(id);
        self.refresh_if_changed();
        removed
    }

    pub fn provider(&self, id: &str) -> Option<Rc<Provider>> {
        self.registry.borrow().get(id)
    }

    /// Rebuilds the navigation pane from the registry.
    pub fn refresh_nav(&mut self) {
        self.providers_changed.set(false);
        let registry = self.registry.borrow();
        self.nav_pane
            .build_from_providers(&registry, &mut self.preferences);
    }

    fn refresh_if_changed(&mut self) {
        if self.initialized && self.providers_changed.get() {
            self.refresh_nav();
        }
    }

    pub fn select_nav(&mut self, index: usize) -> bool {
        self.nav_pane.select(index, &mut self.bus)
    }

    pub fn select_nav_id(&mut self, id: &str) -> bool {
        self.nav_pane.select_id(id, &mut self.bus)
    }

    pub fn click_breadcrumb(&mut self, index: usize) -> bool {
        self.router.breadcrumb_bar().click(index, &mut self.bus)
    }

    /// Chooses button `index` of the pending prompt, if any.
    pub fn choose_prompt_button(&mut self, index: usize) -> bool {
        match self.router.pending_prompt() {
            Some(prompt) => prompt.choose(index, &mut self.bus),
            None => false,
        }
    }

    /// Handles every queued view event, in order.
    pub fn process_events(&mut self) -> Vec<NavOutcome> {
        let mut outcomes = Vec::with_capacity(self.bus.len());
        while let Some(event) = self.bus.pop_front() {
            let outcome = match event {
                ShellEvent::Navigate(target) => self.navigate_to(&target),
                ShellEvent::GuardDecision(decision) => self.router.resolve_guard(decision),
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Runs one frame. Returns `true` while a transition is running.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.refresh_if_changed();
        self.process_events();
        self.router.tick(dt)
    }

    /// Whether a page transition is playing.
    pub fn is_animating(&self) -> bool {
        self.router.presenter().is_transitioning()
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    pub fn router(&self) -> &Router<R> {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut Router<R> {
        &mut self.router
    }

    pub fn nav_pane(&self) -> &NavPane {
        &self.nav_pane
    }

    pub fn preferences(&self) -> &ProviderPreferences {
        &self.preferences
    }

    pub fn preferences_mut(&mut self) -> &mut ProviderPreferences {
        &mut self.preferences
    }

    pub fn bus_mut(&mut self) -> &mut Bus {
        &mut self.bus
    }
}
