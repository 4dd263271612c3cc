// ABOUTME: Shared types and configuration for gridpane.
// ABOUTME: Defines pixel geometry and config file handling.

pub mod config;
pub mod geometry;

pub use config::{Config, ConfigError, LayoutSettings, SurfaceSettings};
pub use geometry::{Rect, Size};
