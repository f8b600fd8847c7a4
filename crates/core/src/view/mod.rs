//! Thin views around the router.
//!
//! Views never navigate by themselves. User input on a view is turned into a
//! [`ShellEvent`] pushed onto a [`Bus`], and the shell drains the bus on the
//! next frame:
//!
//! - [`nav_pane`]: one entry per enabled provider, selecting an entry
//!   navigates to that provider's `Root` page.
//! - [`breadcrumb_bar`]: the current chain, every segment but the last one
//!   navigates to its id.
//! - [`confirm`]: the three-way prompt shown while a navigation waits on a
//!   dirty-state decision.

pub mod breadcrumb_bar;
pub mod confirm;
pub mod nav_pane;

pub use self::breadcrumb_bar::{BreadcrumbBar, BreadcrumbSegment};
pub use self::confirm::{GuardPrompt, PromptButton};
pub use self::nav_pane::{NavEntry, NavPane};

use crate::router::GuardDecision;
use std::collections::VecDeque;

/// Requests emitted by views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// Navigate to a logical page id.
    Navigate(String),
    /// Answer to the pending dirty-state prompt.
    GuardDecision(GuardDecision),
}

pub type Bus = VecDeque<ShellEvent>;
