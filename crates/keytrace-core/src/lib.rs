pub mod error;
pub mod export;
pub mod fade;
pub mod geometry;
pub mod keys;
pub mod sequence;
pub mod session;
pub mod settings;
pub mod trace;
