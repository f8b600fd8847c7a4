//! Breadcrumb bar.
//!
//! Shows the current [`BreadcrumbChain`] as `Home › Provider › Page`. Every
//! segment except the last one is clickable and requests navigation to its
//! id. The last segment is the page being shown.

use super::{Bus, ShellEvent};
use crate::breadcrumb::BreadcrumbChain;

pub const SEPARATOR: &str = " › ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadcrumbSegment {
    pub id: String,
    pub title: String,
    pub interactive: bool,
}

#[derive(Debug, Clone, Default)]
pub struct BreadcrumbBar {
    segments: Vec<BreadcrumbSegment>,
}

impl BreadcrumbBar {
    pub fn new() -> Self {
        BreadcrumbBar::default()
    }

    pub fn set_segments(&mut self, chain: &BreadcrumbChain) {
        let last = chain.depth().saturating_sub(1);
        self.segments = chain
            .iter()
            .enumerate()
            .map(|(index, crumb)| BreadcrumbSegment {
                id: crumb.id.clone(),
                title: crumb.title.clone(),
                interactive: index < last,
            })
            .collect();
    }

    pub fn segments(&self) -> &[BreadcrumbSegment] {
        &self.segments
    }

    /// Handles a click on segment `index`.
    ///
    /// Returns `false` when the segment does not exist or is not interactive.
    pub fn click(&self, index: usize, bus: &mut Bus) -> bool {
        match self.segments.get(index) {
            Some(segment) if segment.interactive => {
                bus.push_back(ShellEvent::Navigate(segment.id.clone()));
                true
            }
            _ => false,
        }
    }

    /// Segment titles joined by [`SEPARATOR`].
    pub fn label(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.title.as_str())
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breadcrumb::Crumb;

    fn chain() -> BreadcrumbChain {
        let mut chain = BreadcrumbChain::home();
        chain.push(Crumb::new("Docs", "Documentation"));
        chain.push(Crumb::new("Docs:About", "About"));
        chain
    }

    #[test]
    fn last_segment_is_not_interactive() {
        let mut bar = BreadcrumbBar::new();
        bar.set_segments(&chain());

        let interactive: Vec<bool> = bar.segments().iter().map(|s| s.interactive).collect();
        assert_eq!(interactive, vec![true, true, false]);
        assert_eq!(bar.label(), "Home › Documentation › About");
    }

    #[test]
    fn clicks_emit_navigation_requests() {
        let mut bar = BreadcrumbBar::new();
        bar.set_segments(&chain());
        let mut bus = Bus::new();

        assert!(bar.click(0, &mut bus));
        assert!(bar.click(1, &mut bus));
        assert!(!bar.click(2, &mut bus));
        assert!(!bar.click(7, &mut bus));

        assert_eq!(
            bus.into_iter().collect::<Vec<_>>(),
            vec![
                ShellEvent::Navigate("HOME".to_string()),
                ShellEvent::Navigate("Docs".to_string()),
            ]
        );
    }

    #[test]
    fn home_alone_is_not_clickable() {
        let mut bar = BreadcrumbBar::new();
        bar.set_segments(&BreadcrumbChain::home());

        assert_eq!(bar.label(), "Home");
        assert!(!bar.click(0, &mut Bus::new()));
    }
}
