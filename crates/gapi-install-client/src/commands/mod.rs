//! Command handlers, one per bootstrap phase.

pub mod authorize;
pub mod save_token;
