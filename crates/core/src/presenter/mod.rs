//! Double-buffered content surface with an animated wipe between pages.
//!
//! The presenter owns two [`VirtualStack`] surfaces. The *current* surface is
//! what the user sees and scrolls. During a transition the incoming page is
//! laid out on the *next* surface and revealed by a mask that grows from one
//! edge of the viewport while a cover of the same width hides the outgoing
//! page underneath it:
//!
//! ```text
//!   Forward (mask grows from the left)   Backward (mask grows from the right)
//!   ┌──────────┬────────────────┐        ┌────────────────┬──────────┐
//!   │ next     │ current        │        │ current        │ next     │
//!   │ width ──►│                │        │                │◄── width │
//!   └──────────┴────────────────┘        └────────────────┴──────────┘
//! ```
//!
//! The wipe is a [`WipeTransition`] advanced by [`ContentPresenter::tick`].
//! When it completes, the surfaces are swapped, the new current surface is
//! scrolled to the top and input is handed back to it. Starting a transition
//! while another one runs cancels the running one first, so the presenter is
//! never left with a half-applied animation.

mod list;
mod transition;

pub use self::list::VirtualStack;
pub use self::transition::{smoothstep, Edge, TransitionDirection, WipeStep, WipeTransition};

use crate::content::{CardRenderer, ContentRef};
use crate::settings::PresenterSettings;
use std::time::Duration;

/// A horizontal strip of the viewport anchored at one edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RevealMask {
    pub origin: Edge,
    pub width: f32,
}

impl RevealMask {
    fn reset(&mut self) {
        self.width = 0.0;
    }
}

pub struct ContentPresenter<R: CardRenderer> {
    renderer: R,
    current: VirtualStack<R::Handle>,
    next: VirtualStack<R::Handle>,
    /// Visible part of the next surface.
    reveal: RevealMask,
    /// Hidden part of the current surface.
    cover: RevealMask,
    wipe: Option<WipeTransition>,
    viewport_width: f32,
    duration: Duration,
    input_enabled: bool,
}

impl<R: CardRenderer> ContentPresenter<R> {
    pub fn new(renderer: R, settings: &PresenterSettings) -> Self {
        let stack = || {
            VirtualStack::new(
                settings.item_spacing,
                settings.overscan,
                settings.estimated_item_extent,
            )
        };

        ContentPresenter {
            renderer,
            current: stack(),
            next: stack(),
            reveal: RevealMask::default(),
            cover: RevealMask::default(),
            wipe: None,
            viewport_width: 0.0,
            duration: settings.transition_duration(),
            input_enabled: true,
        }
    }

    /// Resizes both surfaces. Layout happens on the next tick.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.viewport_width = width.max(0.0);
        self.current.set_viewport_extent(height);
        self.next.set_viewport_extent(height);
    }

    /// Replaces the current page without animation.
    pub fn set(&mut self, models: Vec<ContentRef>) {
        self.cancel_transition();
        self.current.set_items(models, &mut self.renderer);
        self.current.scroll_to_top();
        self.current.layout(&mut self.renderer);
        tracing::trace!(count = self.current.len(), "content set");
    }

    /// Starts revealing `models` over the current page.
    ///
    /// The next surface is laid out on the following tick, before the first
    /// frame of the wipe is computed.
    pub fn transition(&mut self, models: Vec<ContentRef>, direction: TransitionDirection) {
        if self.cancel_transition() {
            tracing::debug!("transition restarted before the previous one finished");
        }

        self.next.set_items(models, &mut self.renderer);
        self.next.scroll_to_top();

        let origin = direction.origin();
        self.reveal = RevealMask { origin, width: 0.0 };
        self.cover = RevealMask { origin, width: 0.0 };
        self.input_enabled = false;
        self.wipe = Some(WipeTransition::new(
            direction,
            self.viewport_width,
            self.duration,
        ));

        tracing::debug!(
            ?direction,
            count = self.next.len(),
            duration_ms = self.duration.as_millis() as u64,
            "transition started"
        );
    }

    /// Advances the frame. Returns `true` while a transition is running.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.current.layout_if_dirty(&mut self.renderer);
        self.next.layout_if_dirty(&mut self.renderer);

        let Some(wipe) = self.wipe.as_mut() else {
            return false;
        };

        match wipe.tick(dt) {
            WipeStep::Running { width } => {
                self.reveal.width = width;
                self.cover.width = width;
                true
            }
            WipeStep::Finished => {
                self.finish_transition();
                false
            }
        }
    }

    /// Stops a running transition and restores the resting state.
    ///
    /// The current surface keeps showing the page it showed before the
    /// transition started. Returns `false` if nothing was running.
    pub fn cancel_transition(&mut self) -> bool {
        if self.wipe.take().is_none() {
            return false;
        }

        self.next.clear(&mut self.renderer);
        self.reveal.reset();
        self.cover.reset();
        self.input_enabled = true;
        true
    }

    fn finish_transition(&mut self) {
        self.wipe = None;
        std::mem::swap(&mut self.current, &mut self.next);
        self.next.clear(&mut self.renderer);
        self.current.scroll_to_top();
        self.current.layout_if_dirty(&mut self.renderer);
        self.reveal.reset();
        self.cover.reset();
        self.input_enabled = true;
        tracing::debug!(count = self.current.len(), "transition finished");
    }

    /// Renders the realized units again in place, keeping the scroll offset.
    pub fn force_rebind(&mut self) {
        self.current.rebind(&mut self.renderer);
        if self.wipe.is_some() {
            self.next.rebind(&mut self.renderer);
        }
    }

    /// Units of the page at rest, or of the outgoing page mid-transition.
    pub fn models(&self) -> &[ContentRef] {
        self.current.items()
    }

    /// Units being revealed. Empty when no transition is running.
    pub fn incoming_models(&self) -> &[ContentRef] {
        self.next.items()
    }

    pub fn is_transitioning(&self) -> bool {
        self.wipe.is_some()
    }

    pub fn direction(&self) -> Option<TransitionDirection> {
        self.wipe.as_ref().map(WipeTransition::direction)
    }

    pub fn reveal(&self) -> RevealMask {
        self.reveal
    }

    pub fn cover(&self) -> RevealMask {
        self.cover
    }

    /// Whether the current surface accepts scrolling.
    pub fn input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn current_surface(&self) -> &VirtualStack<R::Handle> {
        &self.current
    }

    pub fn next_surface(&self) -> &VirtualStack<R::Handle> {
        &self.next
    }

    /// Scrolls the current surface. Ignored while input is disabled.
    pub fn scroll_by(&mut self, delta: f32) {
        if self.input_enabled {
            self.current.scroll_by(delta);
        }
    }

    /// Scroll position of the current surface, `1.0` being the top.
    pub fn normalized_scroll(&self) -> f32 {
        self.current.normalized_position()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{cards, ids, RecordingRenderer, FRAME};

    fn presenter() -> ContentPresenter<RecordingRenderer> {
        let settings = PresenterSettings {
            transition_duration_ms: 220,
            item_spacing: 8.0,
            overscan: 0.0,
            estimated_item_extent: 40.0,
        };
        let mut presenter = ContentPresenter::new(RecordingRenderer::with_extent(40.0), &settings);
        presenter.set_viewport(400.0, 100.0);
        presenter
    }

    fn run_to_rest(presenter: &mut ContentPresenter<RecordingRenderer>) -> usize {
        let mut frames = 0;
        while presenter.tick(FRAME) {
            frames += 1;
            assert!(frames < 1000, "transition never finished");
        }
        frames
    }

    #[test]
    fn set_is_synchronous_and_not_animated() {
        let mut presenter = presenter();
        presenter.set(cards("home", 2));

        assert!(!presenter.is_transitioning());
        assert_eq!(ids(presenter.models()), vec!["home.0", "home.1"]);
        assert_eq!(presenter.current_surface().realized_range(), 0..2);
        assert_eq!(presenter.normalized_scroll(), 1.0);
    }

    #[test]
    fn transition_swaps_surfaces_on_completion() {
        let mut presenter = presenter();
        presenter.set(cards("a", 2));
        presenter.transition(cards("b", 3), TransitionDirection::Forward);

        assert!(presenter.is_transitioning());
        assert!(!presenter.input_enabled());
        assert_eq!(presenter.reveal(), RevealMask { origin: Edge::Left, width: 0.0 });
        assert_eq!(ids(presenter.models()), vec!["a.0", "a.1"]);
        assert_eq!(ids(presenter.incoming_models()), vec!["b.0", "b.1", "b.2"]);

        assert!(presenter.tick(FRAME));
        let first = presenter.reveal().width;
        assert!(first > 0.0 && first < 400.0);
        assert_eq!(presenter.cover().width, first);

        run_to_rest(&mut presenter);

        assert_eq!(ids(presenter.models()), vec!["b.0", "b.1", "b.2"]);
        assert!(presenter.incoming_models().is_empty());
        assert_eq!(presenter.reveal().width, 0.0);
        assert_eq!(presenter.cover().width, 0.0);
        assert!(presenter.input_enabled());
        assert_eq!(presenter.direction(), None);
    }

    #[test]
    fn restarted_transition_lands_on_the_latest_models() {
        let mut presenter = presenter();
        presenter.set(cards("a", 1));

        presenter.transition(cards("b", 2), TransitionDirection::Forward);
        presenter.tick(FRAME);
        presenter.tick(FRAME);
        assert!(presenter.reveal().width > 0.0);

        presenter.transition(cards("c", 1), TransitionDirection::Backward);
        assert_eq!(presenter.reveal(), RevealMask { origin: Edge::Right, width: 0.0 });
        assert_eq!(ids(presenter.models()), vec!["a.0"]);
        assert_eq!(ids(presenter.incoming_models()), vec!["c.0"]);

        // The full duration again, not the remainder of the first wipe.
        assert_eq!(run_to_rest(&mut presenter), 13);
        assert_eq!(ids(presenter.models()), vec!["c.0"]);
        assert!(presenter.next_surface().is_empty());
    }

    #[test]
    fn cancel_restores_resting_state() {
        let mut presenter = presenter();
        presenter.set(cards("a", 1));
        assert!(!presenter.cancel_transition());

        presenter.transition(cards("b", 1), TransitionDirection::Forward);
        presenter.tick(FRAME);
        assert!(presenter.cancel_transition());

        assert!(!presenter.is_transitioning());
        assert!(presenter.input_enabled());
        assert_eq!(presenter.reveal().width, 0.0);
        assert_eq!(ids(presenter.models()), vec!["a.0"]);
        assert!(presenter.incoming_models().is_empty());
        assert!(!presenter.tick(FRAME));
    }

    #[test]
    fn rebind_keeps_scroll_and_transition_resets_it() {
        let mut presenter = presenter();
        presenter.set(cards("long", 10));

        presenter.scroll_by(100.0);
        presenter.tick(FRAME);
        let offset = presenter.current_surface().scroll_offset();
        assert_eq!(offset, 100.0);

        presenter.force_rebind();
        presenter.tick(FRAME);
        assert_eq!(presenter.current_surface().scroll_offset(), offset);
        assert!(presenter.renderer().reused > 0);

        presenter.transition(cards("other", 10), TransitionDirection::Backward);
        presenter.scroll_by(50.0);
        run_to_rest(&mut presenter);

        assert_eq!(presenter.current_surface().scroll_offset(), 0.0);
        assert_eq!(presenter.normalized_scroll(), 1.0);
    }

    #[test]
    fn mutations_within_a_frame_share_one_layout() {
        let mut presenter = presenter();
        presenter.set(cards("a", 1));
        presenter.renderer_mut().rendered.clear();

        presenter.transition(cards("b", 1), TransitionDirection::Forward);
        presenter.transition(cards("c", 1), TransitionDirection::Forward);
        assert!(presenter.renderer().rendered.is_empty());

        presenter.tick(FRAME);
        assert_eq!(presenter.renderer().rendered, vec!["c.0"]);
    }
}
