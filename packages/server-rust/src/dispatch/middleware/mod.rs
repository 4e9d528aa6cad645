//! Cross-cutting handlers composed into behavior chains.

pub mod instrument;
pub mod validation;
