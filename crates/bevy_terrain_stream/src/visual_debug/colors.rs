//! Color palette for visual debugging.

use bevy::prelude::Color;

/// Coral #FF6F61
pub const CORAL: Color = Color::srgb(1.0, 0.435, 0.380);

/// Purple #6B5B93
pub const PURPLE: Color = Color::srgb(0.420, 0.357, 0.576);

/// Green #88B04B
pub const GREEN: Color = Color::srgb(0.533, 0.690, 0.294);

/// Gold #FFD700
pub const GOLD: Color = Color::srgb(1.0, 0.843, 0.0);

/// Mint #B8E0D2
pub const MINT: Color = Color::srgb(0.722, 0.878, 0.824);
