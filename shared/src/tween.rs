//! Scalar tweens used to animate door hinges.
//!
//! `DoorTweens` is the in-game tween service: doors ask it to start an eased animation
//! toward a yaw, keep the returned handle so they can cancel it, and the
//! `advance_door_tweens` system ticks it once per frame.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Easing curves (named after the usual tweening-library conventions).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ease {
    Linear,
    InSine,
    OutSine,
    InOutSine,
    InQuad,
    OutQuad,
    #[default]
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
}

impl Ease {
    /// Map linear progress `t` in [0, 1] onto the curve. Endpoints are exact.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::InSine => 1.0 - (t * PI * 0.5).cos(),
            Ease::OutSine => (t * PI * 0.5).sin(),
            Ease::InOutSine => -((PI * t).cos() - 1.0) * 0.5,
            Ease::InQuad => t * t,
            Ease::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) * 0.5
                }
            }
            Ease::InCubic => t * t * t,
            Ease::OutCubic => 1.0 - (1.0 - t).powi(3),
            Ease::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) * 0.5
                }
            }
        }
    }
}

/// Opaque handle to a running tween.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TweenHandle(u64);

/// Capability interface for starting and cancelling tweens.
pub trait TweenService {
    /// Start animating `target` from `from` to `to` over `duration` seconds.
    fn start(&mut self, target: Entity, from: f32, to: f32, duration: f32, ease: Ease) -> TweenHandle;

    /// Kill a tween. Returns `false` if it had already finished or was cancelled.
    fn cancel(&mut self, handle: TweenHandle) -> bool;

    fn is_active(&self, handle: TweenHandle) -> bool;
}

#[derive(Clone, Debug)]
struct ActiveTween {
    handle: TweenHandle,
    target: Entity,
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    ease: Ease,
}

impl ActiveTween {
    fn value(&self) -> f32 {
        let progress = if self.duration <= 0.0 {
            1.0
        } else {
            self.elapsed / self.duration
        };
        self.from + (self.to - self.from) * self.ease.apply(progress)
    }

    fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// One tween's output for a frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TweenStep {
    pub handle: TweenHandle,
    pub target: Entity,
    pub value: f32,
    /// Set on the frame the tween reaches its end value. The tween is gone afterwards.
    pub finished: bool,
}

/// The tween service resource.
#[derive(Resource, Default, Debug)]
pub struct DoorTweens {
    next_id: u64,
    active: Vec<ActiveTween>,
}

impl DoorTweens {
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Advance every running tween by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> Vec<TweenStep> {
        let dt = dt.max(0.0);
        let mut steps = Vec::with_capacity(self.active.len());
        for tween in &mut self.active {
            tween.elapsed = (tween.elapsed + dt).min(tween.duration.max(0.0));
            steps.push(TweenStep {
                handle: tween.handle,
                target: tween.target,
                value: tween.value(),
                finished: tween.finished(),
            });
        }
        self.active.retain(|t| !t.finished());
        steps
    }
}

impl TweenService for DoorTweens {
    fn start(&mut self, target: Entity, from: f32, to: f32, duration: f32, ease: Ease) -> TweenHandle {
        let handle = TweenHandle(self.next_id);
        self.next_id += 1;
        self.active.push(ActiveTween {
            handle,
            target,
            from,
            to,
            duration,
            elapsed: 0.0,
            ease,
        });
        handle
    }

    fn cancel(&mut self, handle: TweenHandle) -> bool {
        let before = self.active.len();
        self.active.retain(|t| t.handle != handle);
        self.active.len() != before
    }

    fn is_active(&self, handle: TweenHandle) -> bool {
        self.active.iter().any(|t| t.handle == handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_EASES: [Ease; 10] = [
        Ease::Linear,
        Ease::InSine,
        Ease::OutSine,
        Ease::InOutSine,
        Ease::InQuad,
        Ease::OutQuad,
        Ease::InOutQuad,
        Ease::InCubic,
        Ease::OutCubic,
        Ease::InOutCubic,
    ];

    #[test]
    fn test_ease_endpoints() {
        for ease in ALL_EASES {
            assert!(ease.apply(0.0).abs() < 1e-6, "{ease:?} at 0");
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-6, "{ease:?} at 1");
            // Out-of-range progress is clamped.
            assert!((ease.apply(3.0) - 1.0).abs() < 1e-6);
        }
        assert!((Ease::InOutQuad.apply(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_tween_runs_to_completion() {
        let mut world = World::new();
        let door = world.spawn_empty().id();

        let mut tweens = DoorTweens::default();
        let handle = tweens.start(door, 0.0, 90.0, 1.0, Ease::Linear);
        assert!(tweens.is_active(handle));

        let steps = tweens.tick(0.25);
        assert_eq!(steps.len(), 1);
        assert!((steps[0].value - 22.5).abs() < 1e-4);
        assert!(!steps[0].finished);

        let steps = tweens.tick(5.0);
        assert_eq!(steps[0].value, 90.0);
        assert!(steps[0].finished);
        assert!(!tweens.is_active(handle));
        assert!(tweens.is_empty());
    }

    #[test]
    fn test_cancel_removes_tween() {
        let mut world = World::new();
        let door = world.spawn_empty().id();

        let mut tweens = DoorTweens::default();
        let first = tweens.start(door, 0.0, 90.0, 1.0, Ease::InOutQuad);
        let second = tweens.start(door, 0.0, -90.0, 1.0, Ease::InOutQuad);
        assert_ne!(first, second);

        assert!(tweens.cancel(first));
        assert!(!tweens.cancel(first));
        assert_eq!(tweens.len(), 1);

        let steps = tweens.tick(0.1);
        assert!(steps.iter().all(|s| s.handle == second));
    }

    #[test]
    fn test_zero_duration_finishes_on_first_tick() {
        let mut world = World::new();
        let door = world.spawn_empty().id();

        let mut tweens = DoorTweens::default();
        tweens.start(door, 10.0, 100.0, 0.0, Ease::OutCubic);
        let steps = tweens.tick(0.0);
        assert_eq!(steps[0].value, 100.0);
        assert!(steps[0].finished);
    }
}
