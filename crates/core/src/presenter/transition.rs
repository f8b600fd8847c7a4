//! Timed wipe task driving a page transition.
//!
//! A [`WipeTransition`] is a small state machine advanced by the frame loop.
//! Each [`tick`](WipeTransition::tick) adds the elapsed frame time and yields the
//! width the reveal mask should have, eased with a smoothstep curve, until the
//! configured duration has elapsed.

use std::time::Duration;

/// Direction of a page change.
///
/// Always derived from a depth comparison: moving to a deeper breadcrumb is
/// `Forward`, anything else (shallower or the same depth) is `Backward`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDirection {
    Forward,
    Backward,
}

impl TransitionDirection {
    /// Equal depths count as `Backward`: a lateral move is not a drill-in.
    pub fn from_depths(current_depth: usize, new_depth: usize) -> Self {
        if new_depth > current_depth {
            TransitionDirection::Forward
        } else {
            TransitionDirection::Backward
        }
    }

    /// Edge of the viewport the reveal mask grows from. A forward wipe
    /// sweeps left to right, a backward one right to left.
    pub fn origin(self) -> Edge {
        match self {
            TransitionDirection::Forward => Edge::Left,
            TransitionDirection::Backward => Edge::Right,
        }
    }
}

/// Horizontal viewport edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Edge {
    #[default]
    Left,
    Right,
}

/// Smoothstep easing, `p² (3 - 2p)` over `p` clamped to `[0, 1]`.
#[inline]
pub fn smoothstep(p: f32) -> f32 {
    let p = p.clamp(0.0, 1.0);
    p * p * (3.0 - 2.0 * p)
}

/// Outcome of advancing a wipe by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WipeStep {
    /// Still animating. `width` is the eased reveal width for this frame.
    Running { width: f32 },
    /// The duration has elapsed. The reveal now covers the full width.
    Finished,
}

#[derive(Debug, Clone)]
pub struct WipeTransition {
    direction: TransitionDirection,
    width: f32,
    duration: Duration,
    elapsed: Duration,
}

impl WipeTransition {
    /// Creates a wipe revealing `width` units over `duration`.
    pub fn new(direction: TransitionDirection, width: f32, duration: Duration) -> Self {
        WipeTransition {
            direction,
            width: width.max(0.0),
            duration,
            elapsed: Duration::ZERO,
        }
    }

    pub fn direction(&self) -> TransitionDirection {
        self.direction
    }

    pub fn origin(&self) -> Edge {
        self.direction.origin()
    }

    /// Linear progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Eased reveal width for the current progress.
    pub fn revealed_width(&self) -> f32 {
        self.width * smoothstep(self.progress())
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn tick(&mut self, dt: Duration) -> WipeStep {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);

        if self.is_finished() {
            WipeStep::Finished
        } else {
            WipeStep::Running {
                width: self.revealed_width(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_tie_break_is_backward() {
        assert_eq!(TransitionDirection::from_depths(1, 2), TransitionDirection::Forward);
        assert_eq!(TransitionDirection::from_depths(3, 3), TransitionDirection::Backward);
        assert_eq!(TransitionDirection::from_depths(3, 2), TransitionDirection::Backward);
    }

    #[test]
    fn smoothstep_is_clamped_and_symmetric() {
        assert_eq!(smoothstep(-1.0), 0.0);
        assert_eq!(smoothstep(0.0), 0.0);
        assert_eq!(smoothstep(0.5), 0.5);
        assert_eq!(smoothstep(1.0), 1.0);
        assert_eq!(smoothstep(2.0), 1.0);
        assert!((smoothstep(0.25) + smoothstep(0.75) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn wipe_grows_monotonically_until_finished() {
        let mut wipe = WipeTransition::new(
            TransitionDirection::Forward,
            400.0,
            Duration::from_millis(220),
        );
        let frame = Duration::from_millis(16);

        let mut last = 0.0;
        let mut frames = 0;
        loop {
            frames += 1;
            match wipe.tick(frame) {
                WipeStep::Running { width } => {
                    assert!(width >= last);
                    assert!(width < 400.0);
                    last = width;
                }
                WipeStep::Finished => break,
            }
        }

        assert_eq!(frames, 14);
        assert_eq!(wipe.revealed_width(), 400.0);
        assert_eq!(wipe.origin(), Edge::Left);
    }

    #[test]
    fn zero_duration_finishes_on_first_tick() {
        let mut wipe = WipeTransition::new(TransitionDirection::Backward, 100.0, Duration::ZERO);

        assert_eq!(wipe.progress(), 1.0);
        assert_eq!(wipe.tick(Duration::ZERO), WipeStep::Finished);
        assert_eq!(wipe.origin(), Edge::Right);
    }
}
