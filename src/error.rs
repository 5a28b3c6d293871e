use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a submission before or while talking to the platform
#[derive(Debug, Error)]
pub enum VbatchError {
    #[error("can't read script {path}: {source}")]
    ScriptRead { path: PathBuf, source: io::Error },

    #[error("script {0} has no commands to run")]
    EmptyScript(PathBuf),

    #[error("priority must be 2, 4, or 6, got {0}")]
    InvalidPriority(String),

    #[error("--vepfs-id {0} needs both --vepfs-path and --vepfs-mount-path")]
    IncompleteVolume(String),

    #[error("workspace error: {0}")]
    Workspace(#[from] io::Error),

    #[error("can't serialise job descriptor: {0}")]
    Serialise(#[from] serde_yaml::Error),

    #[error("can't render run script: {0}")]
    Template(#[from] tinytemplate::error::Error),

    #[error("submission command failed: {0}")]
    Launch(String),
}

pub type Result<T> = std::result::Result<T, VbatchError>;
