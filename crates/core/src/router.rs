//! Logical page router.
//!
//! The router owns the [`NavigationState`] and turns navigation requests into
//! presenter transitions:
//!
//! ```text
//!  navigate_to(target)
//!        │
//!        ├─ current page dirty? ──yes──► AwaitingGuardDecision ──Cancel──► Idle
//!        │                                     │ Commit / Discard
//!        ▼                                     ▼
//!  resolve(target) ──► (models, chain) ──► presenter.transition ──► Transitioning
//!                                                                        │
//!                                                  wipe finished (tick)  ▼
//!                                                                      Idle
//! ```
//!
//! Resolution is total. Unknown providers, missing capabilities, failing page
//! builders and malformed ids all resolve to a page holding a single notice
//! card, and the navigation state follows the attempted target so the
//! breadcrumb shows where the user tried to go.
//!
//! The navigation state is updated as soon as a transition has started, not
//! when it finishes. A request arriving mid-animation therefore computes its
//! direction against the page being revealed, and the presenter cancels the
//! running wipe before starting the new one.

use crate::breadcrumb::{self, logical_id, BreadcrumbChain, Crumb, HOME_ID};
use crate::content::{CardRenderer, ContentRef, MarkdownCard};
use crate::presenter::{ContentPresenter, TransitionDirection};
use crate::provider::{DirtyState, Provider, PATH_SEPARATOR, ROOT_PAGE};
use crate::registry::SharedRegistry;
use crate::settings::{NavigationSettings, ShellSettings};
use crate::view::{BreadcrumbBar, GuardPrompt};
use std::rc::Rc;
use std::time::Duration;

/// Parsed form of a logical page id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalPageId<'a> {
    Home,
    /// Split on the first separator only, so `page_id` may contain more.
    Page {
        provider_id: &'a str,
        page_id: &'a str,
    },
    /// Not `HOME` and not of the form `provider:page` with both parts set.
    Malformed,
}

impl<'a> LogicalPageId<'a> {
    pub fn parse(id: &'a str) -> Self {
        if id == HOME_ID {
            return LogicalPageId::Home;
        }

        match id.split_once(PATH_SEPARATOR) {
            Some((provider_id, page_id)) if !provider_id.is_empty() && !page_id.is_empty() => {
                LogicalPageId::Page {
                    provider_id,
                    page_id,
                }
            }
            _ => LogicalPageId::Malformed,
        }
    }
}

/// Where the router currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    pub current_page_id: String,
    /// Length of `current_chain`.
    pub current_depth: usize,
    pub current_chain: BreadcrumbChain,
}

impl Default for NavigationState {
    fn default() -> Self {
        let chain = BreadcrumbChain::home();
        NavigationState {
            current_page_id: HOME_ID.to_string(),
            current_depth: chain.depth(),
            current_chain: chain,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouterPhase {
    Idle,
    AwaitingGuardDecision,
    Transitioning,
}

/// Answer to a dirty-state prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Commit pending edits, then continue.
    Commit,
    /// Drop pending edits, then continue.
    Discard,
    /// Stay on the current page.
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    Navigated {
        page_id: String,
        depth: usize,
        direction: TransitionDirection,
    },
    /// Routing is suspended until [`Router::resolve_guard`] is called.
    AwaitingDecision,
    /// The user chose to stay.
    Cancelled,
    /// A guard decision arrived with no prompt pending.
    Ignored,
}

struct Resolution {
    page_id: String,
    models: Vec<ContentRef>,
    chain: BreadcrumbChain,
}

struct PendingNavigation {
    target: String,
    /// Local page id of the page being left.
    page_id: String,
    guard: Rc<dyn DirtyState>,
    prompt: GuardPrompt,
}

pub struct Router<R: CardRenderer> {
    registry: SharedRegistry,
    presenter: ContentPresenter<R>,
    breadcrumb_bar: BreadcrumbBar,
    state: NavigationState,
    pending: Option<PendingNavigation>,
    settings: NavigationSettings,
    has_presented: bool,
}

impl<R: CardRenderer> Router<R> {
    pub fn new(registry: SharedRegistry, renderer: R, settings: &ShellSettings) -> Self {
        let mut breadcrumb_bar = BreadcrumbBar::new();
        let state = NavigationState::default();
        breadcrumb_bar.set_segments(&state.current_chain);

        Router {
            registry,
            presenter: ContentPresenter::new(renderer, &settings.presenter),
            breadcrumb_bar,
            state,
            pending: None,
            settings: settings.navigation.clone(),
            has_presented: false,
        }
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn phase(&self) -> RouterPhase {
        if self.pending.is_some() {
            RouterPhase::AwaitingGuardDecision
        } else if self.presenter.is_transitioning() {
            RouterPhase::Transitioning
        } else {
            RouterPhase::Idle
        }
    }

    pub fn presenter(&self) -> &ContentPresenter<R> {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut ContentPresenter<R> {
        &mut self.presenter
    }

    pub fn breadcrumb_bar(&self) -> &BreadcrumbBar {
        &self.breadcrumb_bar
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// The prompt to display while a navigation waits on a decision.
    pub fn pending_prompt(&self) -> Option<&GuardPrompt> {
        self.pending.as_ref().map(|pending| &pending.prompt)
    }

    /// Advances the presenter. Returns `true` while a transition is running.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.presenter.tick(dt)
    }

    /// Navigates to `target`, asking first if the current page is dirty.
    ///
    /// A bare provider id means its `Root` page. The target is resolved in
    /// full before anything changes, and the state follows it as soon as the
    /// transition has started.
    ///
    /// # Arguments
    ///
    /// * `target` - `HOME`, a provider id, or a `provider:page` logical id
    ///
    /// # Returns
    ///
    /// - `Navigated` with the stored page id, depth and wipe direction
    /// - `AwaitingDecision` when the current page has uncommitted state, or
    ///   when a prompt is already pending (the request is dropped)
    pub fn navigate_to(&mut self, target: &str) -> NavOutcome {
        if let Some(pending) = &self.pending {
            tracing::debug!(
                target_page = target,
                pending = %pending.target,
                "navigation ignored while a guard decision is pending"
            );
            return NavOutcome::AwaitingDecision;
        }

        let target = self.normalize(target);

        if let Some((guard, page_id)) = self.dirty_guard(&target) {
            tracing::info!(
                page_id = %self.state.current_page_id,
                target_page = %target,
                "uncommitted state, waiting for a decision"
            );
            self.pending = Some(PendingNavigation {
                prompt: GuardPrompt::uncommitted_changes(target.clone()),
                target,
                page_id,
                guard,
            });
            return NavOutcome::AwaitingDecision;
        }

        self.navigate_unguarded(&target)
    }

    /// Answers the pending prompt.
    ///
    /// `Commit` flushes and `Discard` rolls back the page being left before
    /// the held navigation proceeds.
    ///
    /// # Arguments
    ///
    /// * `decision` - What the user chose in the prompt
    ///
    /// # Returns
    ///
    /// - `Navigated` for `Commit` and `Discard`
    /// - `Cancelled` for `Cancel`, leaving the current page in place
    /// - `Ignored` when no prompt is pending
    pub fn resolve_guard(&mut self, decision: GuardDecision) -> NavOutcome {
        let Some(pending) = self.pending.take() else {
            return NavOutcome::Ignored;
        };

        tracing::info!(?decision, target_page = %pending.target, "guard decision");

        match decision {
            GuardDecision::Commit => pending.guard.commit_and_flush(&pending.page_id),
            GuardDecision::Discard => pending.guard.rollback(&pending.page_id),
            GuardDecision::Cancel => return NavOutcome::Cancelled,
        }

        self.navigate_unguarded(&pending.target)
    }

    fn navigate_unguarded(&mut self, target: &str) -> NavOutcome {
        let Resolution {
            page_id,
            models,
            chain,
        } = self.resolve(target);

        let depth = chain.depth();
        let direction = TransitionDirection::from_depths(self.state.current_depth, depth);

        if self.has_presented {
            self.presenter.transition(models, direction);
        } else {
            self.presenter.set(models);
            self.has_presented = true;
        }
        self.breadcrumb_bar.set_segments(&chain);

        tracing::info!(page_id = %page_id, depth, ?direction, "navigated");

        self.state = NavigationState {
            current_page_id: page_id.clone(),
            current_depth: depth,
            current_chain: chain,
        };

        NavOutcome::Navigated {
            page_id,
            depth,
            direction,
        }
    }

    /// Rewrites a bare provider id to its `Root` page and spells registered
    /// provider ids the way they were registered, so targets compare equal to
    /// the stored page id.
    fn normalize(&self, target: &str) -> String {
        let (provider_id, page_id) = match LogicalPageId::parse(target) {
            LogicalPageId::Home => return target.to_string(),
            LogicalPageId::Page {
                provider_id,
                page_id,
            } => (provider_id, page_id),
            LogicalPageId::Malformed if !target.contains(PATH_SEPARATOR) => (target, ROOT_PAGE),
            LogicalPageId::Malformed => return target.to_string(),
        };

        match self.registry.borrow().get(provider_id) {
            Some(provider) => logical_id(provider.id(), page_id),
            None => target.to_string(),
        }
    }

    /// Returns the dirty-state owner of the current page if leaving it for
    /// `target` needs a decision.
    fn dirty_guard(&self, target: &str) -> Option<(Rc<dyn DirtyState>, String)> {
        if target == self.state.current_page_id {
            return None;
        }

        let LogicalPageId::Page {
            provider_id,
            page_id,
        } = LogicalPageId::parse(&self.state.current_page_id)
        else {
            return None;
        };

        let provider = self.registry.borrow().get(provider_id)?;
        let guard = provider.dirty_state()?;

        if guard.has_uncommitted_state(page_id) {
            Some((guard, page_id.to_string()))
        } else {
            None
        }
    }

    fn resolve(&self, target: &str) -> Resolution {
        match LogicalPageId::parse(target) {
            LogicalPageId::Home => self.resolve_home(),
            LogicalPageId::Page {
                provider_id,
                page_id,
            } => self.resolve_page(target, provider_id, page_id),
            LogicalPageId::Malformed => {
                tracing::warn!(target_page = target, "malformed page id");
                let mut chain = BreadcrumbChain::home();
                chain.push(Crumb::new(target, target));
                Resolution {
                    page_id: target.to_string(),
                    models: vec![MarkdownCard::error(target, "", "Malformed page id").into_ref()],
                    chain,
                }
            }
        }
    }

    fn resolve_home(&self) -> Resolution {
        let provider_id = self.settings.default_provider.as_str();
        let provider = self.registry.borrow().get(provider_id);

        let models = match provider {
            Some(provider) => self.build(&provider, provider_id, ROOT_PAGE),
            None => {
                tracing::warn!(provider_id, "home provider is not registered");
                vec![MarkdownCard::error(provider_id, ROOT_PAGE, "Home provider missing").into_ref()]
            }
        };

        Resolution {
            page_id: HOME_ID.to_string(),
            models,
            chain: BreadcrumbChain::home(),
        }
    }

    fn resolve_page(&self, target: &str, provider_id: &str, page_id: &str) -> Resolution {
        // Released before calling into the provider, which may read the registry.
        let provider = self.registry.borrow().get(provider_id);

        let Some(provider) = provider else {
            tracing::warn!(provider_id, page_id, "provider not found");
            let mut chain = BreadcrumbChain::home();
            chain.push(Crumb::new(provider_id, provider_id));
            chain.push(Crumb::new(target, page_id));
            return Resolution {
                page_id: target.to_string(),
                models: vec![MarkdownCard::error(provider_id, page_id, "Provider not found").into_ref()],
                chain,
            };
        };

        let models = self.build(&provider, provider_id, page_id);
        let chain = breadcrumb::resolve(
            provider.id(),
            provider.title(),
            page_id,
            provider.breadcrumb(),
            self.settings.max_parent_walk,
        );

        Resolution {
            page_id: logical_id(provider.id(), page_id),
            models,
            chain,
        }
    }

    fn build(&self, provider: &Provider, provider_id: &str, page_id: &str) -> Vec<ContentRef> {
        match provider.build_page_models(page_id) {
            None => vec![MarkdownCard::error(
                provider_id,
                page_id,
                "Provider does not build page models",
            )
            .into_ref()],
            Some(Err(e)) => {
                tracing::warn!(provider_id, page_id, error = %e, "page builder failed");
                vec![MarkdownCard::error(provider_id, page_id, &e.to_string()).into_ref()]
            }
            Some(Ok(Some(models))) if !models.is_empty() => models,
            Some(Ok(_)) => vec![MarkdownCard::empty(provider_id, page_id).into_ref()],
        }
    }
}
