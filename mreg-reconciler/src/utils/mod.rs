//! Pure helpers shared by the reconcilers.

pub mod identity;
pub mod json_path;
pub(crate) mod log_sanitizer;
