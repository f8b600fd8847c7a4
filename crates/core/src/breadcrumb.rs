//! Breadcrumb chains and their resolution.
//!
//! A chain always starts with the Home segment. For a provider page it then
//! holds the provider segment and, unless the page is the provider's `Root`,
//! one or more page segments produced by [`resolve`].
//!
//! Page segments come from, in order of preference:
//! 1. the provider's full chain for the page ([`BreadcrumbSource::chain`]),
//! 2. a parent walk from the page up to `Root` ([`BreadcrumbSource::parent`]),
//! 3. a single segment titled with the raw page id, when the provider has no
//!    breadcrumb capability at all.

use crate::provider::{BreadcrumbSource, PATH_SEPARATOR, ROOT_PAGE};

/// Logical id of the Home page.
pub const HOME_ID: &str = "HOME";

pub const HOME_TITLE: &str = "Home";

/// Default bound on parent lookups during a parent walk.
pub const DEFAULT_MAX_PARENT_WALK: usize = 20;

/// One breadcrumb segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub id: String,
    pub title: String,
}

impl Crumb {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Crumb {
            id: id.into(),
            title: title.into(),
        }
    }

    pub fn home() -> Self {
        Crumb::new(HOME_ID, HOME_TITLE)
    }
}

/// Ordered path from Home to the current page. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadcrumbChain {
    segments: Vec<Crumb>,
}

impl BreadcrumbChain {
    /// A chain holding only the Home segment.
    pub fn home() -> Self {
        BreadcrumbChain {
            segments: vec![Crumb::home()],
        }
    }

    pub fn push(&mut self, crumb: Crumb) {
        self.segments.push(crumb);
    }

    /// Number of segments, Home included. Home alone has depth 1.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[Crumb] {
        &self.segments
    }

    pub fn last(&self) -> &Crumb {
        // A chain is built from `home()` and only grows.
        &self.segments[self.segments.len() - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Crumb> {
        self.segments.iter()
    }
}

impl Default for BreadcrumbChain {
    fn default() -> Self {
        BreadcrumbChain::home()
    }
}

/// Joins a provider id and a local page id into a logical page id.
pub fn logical_id(provider_id: &str, page_id: &str) -> String {
    format!("{provider_id}{PATH_SEPARATOR}{page_id}")
}

/// Builds the chain for `page_id` of provider `provider_id`.
///
/// The chain always starts with `Home` and the provider's root. A `Root` page
/// stops there. Otherwise the source's explicit chain is used when it has one,
/// then a walk up its parent links, and finally a single raw segment.
///
/// # Arguments
///
/// * `provider_id` - Registered id of the provider, used in segment ids
/// * `provider_title` - Label of the provider segment
/// * `page_id` - Local page id within the provider
/// * `source` - The provider's breadcrumb capability, if it declares one
/// * `max_parent_walk` - Upper bound on parent lookups
///
/// # Returns
///
/// The chain from `Home` down to `page_id`. A provider reporting a parent
/// cycle still yields a chain: the walk stops at the bound and logs a warning.
pub fn resolve(
    provider_id: &str,
    provider_title: &str,
    page_id: &str,
    source: Option<&dyn BreadcrumbSource>,
    max_parent_walk: usize,
) -> BreadcrumbChain {
    let mut chain = BreadcrumbChain::home();
    chain.push(Crumb::new(provider_id, provider_title));

    if page_id == ROOT_PAGE {
        return chain;
    }

    let Some(source) = source else {
        chain.push(Crumb::new(logical_id(provider_id, page_id), page_id));
        return chain;
    };

    if let Some(segments) = source.chain(page_id).filter(|segments| !segments.is_empty()) {
        for segment in segments {
            let title = if segment.title.is_empty() {
                segment.id.clone()
            } else {
                segment.title
            };
            chain.push(Crumb::new(logical_id(provider_id, &segment.id), title));
        }
        return chain;
    }

    for segment in walk_parents(provider_id, page_id, source, max_parent_walk)
        .into_iter()
        .rev()
    {
        chain.push(Crumb::new(logical_id(provider_id, &segment.id), segment.title));
    }

    chain
}

/// Collects `page_id` and its ancestors, leaf first, stopping before `Root`.
fn walk_parents(
    provider_id: &str,
    page_id: &str,
    source: &dyn BreadcrumbSource,
    max_parent_walk: usize,
) -> Vec<Crumb> {
    let mut stack = Vec::new();
    let mut current = page_id.to_string();

    loop {
        if stack.len() >= max_parent_walk {
            tracing::warn!(
                provider_id,
                page_id,
                limit = max_parent_walk,
                "breadcrumb parent walk hit its limit, the provider may report a cycle"
            );
            break;
        }

        let title = source.title(&current).unwrap_or_else(|| current.clone());
        stack.push(Crumb::new(current.clone(), title));

        match source.parent(&current) {
            Some(parent) if parent == ROOT_PAGE || parent.is_empty() => break,
            Some(parent) => current = parent,
            None => break,
        }
    }

    stack
}
