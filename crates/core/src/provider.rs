//! Providers and their capability set.
//!
//! A [`Provider`] is a plugin that contributes pages under a unique id. What a
//! provider can do is described by an explicit [`Capabilities`] value rather
//! than discovered at runtime:
//!
//! - `page_models`: builds the content units of a local page.
//! - `breadcrumb`: maps local pages to breadcrumb segments ([`BreadcrumbSource`]).
//! - `dirty_state`: reports uncommitted edits on a page so the router can ask
//!   the user before leaving it ([`DirtyState`]).
//!
//! Every capability is optional. A provider with none of them still shows up
//! in the navigation pane; navigating to it yields an error page.
//!
//! # Example
//!
//! ```
//! use navshell_core::content::MarkdownCard;
//! use navshell_core::provider::Provider;
//!
//! let docs = Provider::builder("Docs", "Documentation")
//!     .nav_item("About", "About")
//!     .page_models(|page| {
//!         Ok(Some(vec![
//!             MarkdownCard::new(format!("docs.{page}"), page, "# Docs").into_ref(),
//!         ]))
//!     })
//!     .build();
//!
//! assert!(docs.capabilities().has_page_models());
//! assert!(!docs.capabilities().has_breadcrumb());
//! ```

use crate::breadcrumb::Crumb;
use crate::content::ContentRef;
use std::fmt;
use std::rc::Rc;

/// Separates the provider id from the local page id in a logical page id.
pub const PATH_SEPARATOR: char = ':';

/// Local id of the landing page every provider is expected to serve.
pub const ROOT_PAGE: &str = "Root";

/// Failure raised by a provider while building a page.
#[derive(thiserror::Error, Debug)]
pub enum PageError {
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PageError {
    pub fn msg(message: impl Into<String>) -> Self {
        PageError::Message(message.into())
    }
}

/// Result of building a page.
///
/// `Ok(None)` and `Ok(Some(vec![]))` both mean the page has no content, which
/// is not an error.
pub type PageModels = Result<Option<Vec<ContentRef>>, PageError>;

/// Builds the content units of a local page.
pub type PageBuilder = Box<dyn Fn(&str) -> PageModels>;

/// An entry a provider offers for its own pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    /// Page id local to the provider.
    pub page_id: String,
    pub title: String,
}

/// Breadcrumb mapping for a provider's local pages.
///
/// All ids passed in and returned are local to the provider. Every method
/// has a default returning `None`, so implementors override only what they
/// know. `None` also covers pages the provider does not recognise.
pub trait BreadcrumbSource {
    /// Full chain from the top-most page down to `page_id`, excluding `Root`.
    ///
    /// Segment titles may be empty, in which case the segment id is shown.
    fn chain(&self, _page_id: &str) -> Option<Vec<Crumb>> {
        None
    }

    /// Parent of `page_id`. Returning [`ROOT_PAGE`] ends a parent walk.
    fn parent(&self, _page_id: &str) -> Option<String> {
        None
    }

    /// Display title of `page_id`.
    fn title(&self, _page_id: &str) -> Option<String> {
        None
    }
}

/// Uncommitted state owned by a provider page.
///
/// When the current page reports uncommitted state the router suspends a
/// navigation away from it until the user picks commit, discard or cancel.
/// Implementations are called on the UI thread and use interior mutability.
pub trait DirtyState {
    fn has_uncommitted_state(&self, page_id: &str) -> bool;

    /// Commits pending edits and flushes them to their owner.
    fn commit_and_flush(&self, page_id: &str);

    /// Drops pending edits.
    fn rollback(&self, page_id: &str);
}

/// Optional behaviours of a [`Provider`].
#[derive(Default)]
pub struct Capabilities {
    pub page_models: Option<PageBuilder>,
    pub breadcrumb: Option<Rc<dyn BreadcrumbSource>>,
    pub dirty_state: Option<Rc<dyn DirtyState>>,
}

impl Capabilities {
    pub fn has_page_models(&self) -> bool {
        self.page_models.is_some()
    }

    pub fn has_breadcrumb(&self) -> bool {
        self.breadcrumb.is_some()
    }

    pub fn has_dirty_state(&self) -> bool {
        self.dirty_state.is_some()
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("page_models", &self.has_page_models())
            .field("breadcrumb", &self.has_breadcrumb())
            .field("dirty_state", &self.has_dirty_state())
            .finish()
    }
}

/// A plugin contributing pages under a unique id.
#[derive(Debug)]
pub struct Provider {
    id: String,
    title: String,
    nav_items: Vec<NavItem>,
    capabilities: Capabilities,
}

impl Provider {
    /// Creates a provider without any capability.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Provider {
            id: id.into(),
            title: title.into(),
            nav_items: Vec::new(),
            capabilities: Capabilities::default(),
        }
    }

    pub fn builder(id: impl Into<String>, title: impl Into<String>) -> ProviderBuilder {
        ProviderBuilder {
            provider: Provider::new(id, title),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn nav_items(&self) -> &[NavItem] {
        &self.nav_items
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Builds `page_id`, or returns `None` when the provider cannot build pages.
    pub fn build_page_models(&self, page_id: &str) -> Option<PageModels> {
        self.capabilities
            .page_models
            .as_ref()
            .map(|build| build(page_id))
    }

    pub fn breadcrumb(&self) -> Option<&dyn BreadcrumbSource> {
        self.capabilities.breadcrumb.as_deref()
    }

    pub fn dirty_state(&self) -> Option<Rc<dyn DirtyState>> {
        self.capabilities.dirty_state.clone()
    }
}

/// Fluent construction of a [`Provider`] and its capabilities.
pub struct ProviderBuilder {
    provider: Provider,
}

impl ProviderBuilder {
    /// Offers a local page in the provider's navigation items.
    pub fn nav_item(mut self, page_id: impl Into<String>, title: impl Into<String>) -> Self {
        self.provider.nav_items.push(NavItem {
            page_id: page_id.into(),
            title: title.into(),
        });
        self
    }

    pub fn page_models<F>(mut self, build: F) -> Self
    where
        F: Fn(&str) -> PageModels + 'static,
    {
        self.provider.capabilities.page_models = Some(Box::new(build));
        self
    }

    pub fn breadcrumb(mut self, source: impl BreadcrumbSource + 'static) -> Self {
        self.provider.capabilities.breadcrumb = Some(Rc::new(source));
        self
    }

    /// Shares a dirty-state owner with the provider.
    pub fn dirty_state(mut self, state: Rc<dyn DirtyState>) -> Self {
        self.provider.capabilities.dirty_state = Some(state);
        self
    }

    pub fn build(self) -> Provider {
        self.provider
    }
}
