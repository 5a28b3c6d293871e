//! Build the job descriptor consumed by the platform CLI
//!
//! A descriptor starts from a fixed base template, picks up the filtered local environment, and
//! is then overridden field by field with the script's directives. Nothing here is shared
//! between submissions: every call builds its own descriptor from scratch.

/// Descriptor schema and the base template
pub mod descriptor;
/// Local environment variables forwarded to the job
pub mod env;
/// Apply directives and resolve priority
pub mod merge;
