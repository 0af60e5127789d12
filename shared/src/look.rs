//! First-person look: device sensitivity, smoothing and pitch clamping.
//!
//! Samples use +x = right, +y = up. The output is in the same convention: a positive
//! yaw delta turns right and a positive pitch looks down. Callers map that onto their
//! own coordinate system.

use bevy::prelude::*;

use crate::config::LookSettings;

/// Where a look sample came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookDevice {
    /// Mouse or trackpad delta for this frame.
    Pointer,
    /// Right stick deflection.
    Gamepad,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LookSample {
    pub delta: Vec2,
    pub device: LookDevice,
}

/// Rotation to apply this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LookOutput {
    /// Degrees to turn the body this frame.
    pub yaw_delta: f32,
    /// Absolute pitch in degrees for the camera.
    pub pitch: f32,
}

#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct LookState {
    pub pitch: f32,
    /// Smoothed look rate (degrees/second).
    pub current: Vec2,
    /// Raw look rate the filter is chasing.
    pub target: Vec2,
    smooth_velocity: Vec2,
}

impl LookState {
    /// Scale a raw sample by its device sensitivity and make it the new target.
    pub fn push_sample(&mut self, settings: &LookSettings, sample: LookSample) {
        let sensitivity = match sample.device {
            LookDevice::Pointer => settings.pointer_sensitivity,
            LookDevice::Gamepad => settings.gamepad_sensitivity,
        };
        self.target = sample.delta * sensitivity;
    }

    /// Input stopped (no motion, stick released).
    pub fn release(&mut self) {
        self.target = Vec2::ZERO;
    }

    pub fn update(&mut self, settings: &LookSettings, dt: f32) -> LookOutput {
        let previous = self.current;
        let mut next = Vec2::new(
            smooth_damp(
                self.current.x,
                self.target.x,
                &mut self.smooth_velocity.x,
                settings.smooth_time,
                dt,
            ),
            smooth_damp(
                self.current.y,
                self.target.y,
                &mut self.smooth_velocity.y,
                settings.smooth_time,
                dt,
            ),
        );

        if let Some(max_delta) = settings.max_delta {
            let change = next - previous;
            if change.length() > max_delta {
                next = previous + change.normalize_or_zero() * max_delta;
            }
        }
        self.current = next;

        let clamp = settings.vertical_clamp.abs();
        self.pitch = (self.pitch - self.current.y * dt).clamp(-clamp, clamp);

        LookOutput {
            yaw_delta: self.current.x * dt,
            pitch: self.pitch,
        }
    }
}

/// Critically damped approach of `current` toward `target` (game-engine SmoothDamp).
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    if smooth_time <= 0.0 || dt <= 0.0 {
        if smooth_time <= 0.0 {
            *velocity = 0.0;
            return target;
        }
        return current;
    }

    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);
    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // No overshoot past the target.
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = (output - target) / dt;
    }
    output
}
