//! Shared helpers: input limits and identifier suggestions.

pub mod validation;
