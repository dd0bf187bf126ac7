#![deny(unsafe_code)]

/// Application shell and shared services.
pub mod app;
/// Chat list, conversation view and composer input.
pub mod chat;
/// Bridges the core palette to gpui colors and widget themes.
pub mod theme;
