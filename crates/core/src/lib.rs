//! Page navigation and transition engine for an embeddable settings shell.
//!
//! Third-party providers contribute pages of content. A navigation pane and a
//! breadcrumb bar let the user move between those pages, and every page change
//! is presented through an animated, double-buffered content surface.
//!
//! ```text
//! SettingsShell (programmatic façade)
//!   ├── ProviderRegistry (id -> Provider, change notifications)
//!   ├── NavPane (one entry per enabled provider)
//!   └── Router (NavController)
//!       ├── BreadcrumbBar (Home › Provider › Page)
//!       └── ContentPresenter (current + next surface, wipe transition)
//! ```
//!
//! Nothing in this crate draws pixels. Content units are opaque to the engine
//! and are turned into on-screen handles by a host supplied
//! [`CardRenderer`](content::CardRenderer).

pub mod breadcrumb;
pub mod content;
pub mod core_shell;
pub mod logging;
pub mod preferences;
pub mod presenter;
pub mod provider;
pub mod registry;
pub mod router;
pub mod settings;
pub mod shell;
pub mod view;

#[cfg(test)]
pub(crate) mod test_utils;

pub use breadcrumb::{BreadcrumbChain, Crumb, HOME_ID};
pub use content::{CardRenderer, ContentRef, ContentUnit, MarkdownCard};
pub use presenter::{ContentPresenter, TransitionDirection};
pub use provider::{Provider, PATH_SEPARATOR, ROOT_PAGE};
pub use registry::{ProviderRegistry, SharedRegistry};
pub use router::{GuardDecision, NavOutcome, NavigationState, Router, RouterPhase};
pub use shell::SettingsShell;
