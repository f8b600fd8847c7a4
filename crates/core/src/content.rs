//! Content units and the card renderer contract.
//!
//! The engine never looks inside a content unit: it counts them, hands them to
//! the [`CardRenderer`] and keeps them alive while they are displayed. Hosts
//! recover their concrete model types through downcasting:
//!
//! ```
//! use navshell_core::content::{CardTone, ContentUnit, MarkdownCard};
//!
//! let unit = MarkdownCard::error("Docs", "About", "boom").into_ref();
//! let card = unit.downcast_ref::<MarkdownCard>().unwrap();
//! assert_eq!(card.tone, CardTone::Error);
//! ```

use downcast_rs::{impl_downcast, Downcast};
use std::fmt;
use std::rc::Rc;

/// An opaque, provider-defined piece of displayable content.
pub trait ContentUnit: Downcast + fmt::Debug {
    /// Stable identifier, used by renderers to recognise a unit across rebinds.
    fn id(&self) -> &str;
}
impl_downcast!(ContentUnit);

/// Shared handle to a content unit.
pub type ContentRef = Rc<dyn ContentUnit>;

/// Turns content units into on-screen handles.
///
/// `existing` carries the handle previously produced for the same slot so the
/// renderer can update it in place instead of building a new one.
pub trait CardRenderer {
    type Handle;

    fn render(&mut self, model: &dyn ContentUnit, existing: Option<Self::Handle>) -> Self::Handle;

    /// Vertical size of a rendered handle.
    fn extent(&self, handle: &Self::Handle) -> f32;

    /// Called when a handle leaves the realized range or its surface is cleared.
    fn release(&mut self, handle: Self::Handle) {
        drop(handle);
    }
}

/// Visual intent of a [`MarkdownCard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardTone {
    Info,
    /// A page could not be built.
    Error,
    /// A page was built but has no content.
    Empty,
}

/// A titled block of markdown text.
///
/// This is the only content unit the engine creates itself: for the Home page
/// and for pages that failed to build or came back empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownCard {
    pub id: String,
    pub title: String,
    pub markdown: String,
    pub tone: CardTone,
}

impl MarkdownCard {
    pub fn new(id: impl Into<String>, title: impl Into<String>, markdown: impl Into<String>) -> Self {
        MarkdownCard {
            id: id.into(),
            title: title.into(),
            markdown: markdown.into(),
            tone: CardTone::Info,
        }
    }

    /// Card shown in place of a page that could not be built.
    pub fn error(provider_id: &str, page_id: &str, message: &str) -> Self {
        MarkdownCard {
            id: format!("{provider_id}:{page_id}:error"),
            title: "Error".to_string(),
            markdown: format!(
                "### Page Error\nProvider: `{provider_id}`\n\nPage: `{page_id}`\n\nError: `{message}`\n\n\
                 Check the provider's page builder or the log for details."
            ),
            tone: CardTone::Error,
        }
    }

    /// Card shown in place of a page that has no content.
    pub fn empty(provider_id: &str, page_id: &str) -> Self {
        MarkdownCard {
            id: format!("{provider_id}:{page_id}:empty"),
            title: "Empty".to_string(),
            markdown: format!(
                "### Empty Page\nProvider: `{provider_id}`\n\nPage: `{page_id}`\n\n\
                 No cards were returned. A page builder should return at least one card."
            ),
            tone: CardTone::Empty,
        }
    }

    pub fn into_ref(self) -> ContentRef {
        Rc::new(self)
    }
}

impl ContentUnit for MarkdownCard {
    fn id(&self) -> &str {
        &self.id
    }
}
