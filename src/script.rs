//! Read annotated shell scripts and render the script that runs on the platform

/// `# VBATCH` directives are split from script commands and collected into a config
pub mod directive;

/// Render the run script with a working directory change after the header line
pub mod render;
