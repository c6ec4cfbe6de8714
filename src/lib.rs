//! Neon Snake - an arcade Snake with lives, levels and power-ups
//!
//! This library provides:
//! - A headless, tick-driven game engine (game module)
//! - Keyboard input mapping (input module)
//! - Session statistics (metrics module)
//! - TUI rendering (render module)
//! - The interactive terminal mode (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
