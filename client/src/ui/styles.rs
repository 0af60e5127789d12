//! Shared UI styles

use bevy::prelude::*;

/// Button colors
pub const BUTTON_NORMAL: Color = Color::srgb(0.12, 0.12, 0.14);
pub const BUTTON_HOVERED: Color = Color::srgb(0.20, 0.18, 0.16);
pub const BUTTON_PRESSED: Color = Color::srgb(0.45, 0.28, 0.12);

/// Button border
pub const BUTTON_BORDER: Color = Color::srgb(0.35, 0.25, 0.15);

/// Accent color - warm door-wood orange
pub const ACCENT_COLOR: Color = Color::srgb(0.85, 0.55, 0.25);

/// Text colors
pub const TEXT_COLOR: Color = Color::srgb(0.92, 0.90, 0.86);
pub const TEXT_MUTED: Color = Color::srgb(0.55, 0.52, 0.48);

/// Standard button style
pub fn button_style() -> Node {
    Node {
        width: Val::Px(240.0),
        height: Val::Px(50.0),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        margin: UiRect::all(Val::Px(8.0)),
        border: UiRect::all(Val::Px(2.0)),
        ..default()
    }
}

pub fn button_text_style() -> TextFont {
    TextFont {
        font_size: 22.0,
        ..default()
    }
}

pub fn title_text_style() -> TextFont {
    TextFont {
        font_size: 56.0,
        ..default()
    }
}
