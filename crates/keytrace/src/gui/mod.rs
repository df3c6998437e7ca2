pub mod app;
pub mod keyboard;
pub mod theme;
pub mod trace;
