//! Dirty-state confirmation prompt.
//!
//! When the router suspends a navigation because the current page holds
//! uncommitted state, it builds a [`GuardPrompt`] for the host to display.
//! Each button maps to a [`GuardDecision`] which the host answers with
//! [`Router::resolve_guard`](crate::router::Router::resolve_guard), directly or
//! through a [`ShellEvent::GuardDecision`] on the bus.
//!
//! The prompt has no timeout: it stays pending until one of its buttons is
//! chosen.

use super::{Bus, ShellEvent};
use crate::router::GuardDecision;

/// One prompt button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptButton {
    pub label: String,
    pub decision: GuardDecision,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardPrompt {
    pub title: String,
    pub message: String,
    /// Logical page id the suspended navigation was heading to.
    pub target: String,
    buttons: Vec<PromptButton>,
}

impl GuardPrompt {
    pub fn builder(title: impl Into<String>, target: impl Into<String>) -> GuardPromptBuilder {
        GuardPromptBuilder {
            title: title.into(),
            message: String::new(),
            target: target.into(),
            buttons: Vec::new(),
        }
    }

    /// The prompt shown before leaving a page with uncommitted changes.
    pub fn uncommitted_changes(target: impl Into<String>) -> Self {
        GuardPrompt::builder("Uncommitted Changes", target)
            .message("You have uncommitted changes. What would you like to do?")
            .add_button("Commit", GuardDecision::Commit)
            .add_button("Discard", GuardDecision::Discard)
            .add_button("Cancel", GuardDecision::Cancel)
            .build()
    }

    /// Buttons from left to right.
    pub fn buttons(&self) -> &[PromptButton] {
        &self.buttons
    }

    /// Sends the decision of button `index`. Returns `false` if out of range.
    pub fn choose(&self, index: usize, bus: &mut Bus) -> bool {
        match self.buttons.get(index) {
            Some(button) => {
                bus.push_back(ShellEvent::GuardDecision(button.decision));
                true
            }
            None => false,
        }
    }
}

pub struct GuardPromptBuilder {
    title: String,
    message: String,
    target: String,
    buttons: Vec<PromptButton>,
}

impl GuardPromptBuilder {
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Adds a button. Buttons are displayed in the order they are added.
    ///
    /// # Arguments
    ///
    /// * `label` - The text displayed on the button
    /// * `decision` - The decision sent when the button is chosen
    pub fn add_button(mut self, label: &str, decision: GuardDecision) -> Self {
        self.buttons.push(PromptButton {
            label: label.to_string(),
            decision,
        });
        self
    }

    pub fn build(self) -> GuardPrompt {
        GuardPrompt {
            title: self.title,
            message: self.message,
            target: self.target,
            buttons: self.buttons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncommitted_changes_prompt_offers_three_choices() {
        let prompt = GuardPrompt::uncommitted_changes("Docs:Root");

        assert_eq!(prompt.title, "Uncommitted Changes");
        assert_eq!(prompt.target, "Docs:Root");
        let labels: Vec<&str> = prompt.buttons().iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Commit", "Discard", "Cancel"]);
    }

    #[test]
    fn choosing_a_button_emits_its_decision() {
        let prompt = GuardPrompt::uncommitted_changes("HOME");
        let mut bus = Bus::new();

        assert!(prompt.choose(1, &mut bus));
        assert!(!prompt.choose(3, &mut bus));
        assert_eq!(
            bus.pop_front(),
            Some(ShellEvent::GuardDecision(GuardDecision::Discard))
        );
        assert!(bus.is_empty());
    }
}
