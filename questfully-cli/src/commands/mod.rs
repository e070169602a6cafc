//! CLI Commands

pub mod content;
pub mod favorites;
pub mod quota;
