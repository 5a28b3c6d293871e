//! Assemble a job from an annotated script and hand it to the platform
//!
//! The flow is linear: parse directives, build the descriptor, render `run.sh`, write both into
//! a scratch workspace and run the submission command, retrying once on failure. The workspace
//! is removed however the flow ends.

use std::env;
use std::path::Path;

use log::{error, info};

use crate::error::{Result, VbatchError};
use crate::job::descriptor::JobDescriptor;
use crate::job::{env as job_env, merge};
use crate::script::directive;
use crate::submit::volc::{launch_with_retry, Launch};
use crate::submit::workspace::Workspace;

/// Scratch directory for `run.sh` and `job.yaml`
pub mod workspace;
/// Run the volc CLI, with one retry
pub mod volc;

/// Submit a script if it exists
///
/// A missing script is reported and nothing is submitted, but it isn't treated as an error.
pub fn run(input: &Path, priority: Option<i64>, launcher: &impl Launch) -> Result<()> {
    if !input.exists() {
        error!("File {} does not exist.", input.display());
        return Ok(());
    }
    submit_job(input, priority, launcher)
}

pub fn submit_job(script_path: &Path, priority: Option<i64>, launcher: &impl Launch) -> Result<()> {
    let envs = job_env::snapshot();
    info!("Forwarding {} environment variables", envs.len());

    let script = directive::parse(script_path)?;
    let cwd = env::current_dir()?;
    let log_path = merge::log_path(script_path, &cwd);
    let mut job = JobDescriptor::build(&script.config, envs, priority, &log_path)?;
    info!("Job output will be written to {}", log_path.display());

    let run_script = script
        .render(&cwd)
        .ok_or_else(|| VbatchError::EmptyScript(script_path.to_path_buf()))??;

    let workspace = Workspace::create()?;
    workspace.write_run_script(&run_script, &mut job)?;
    let conf = workspace.write_descriptor(&job)?;

    launch_with_retry(launcher, &conf)?;
    info!("Submitted {} as {}", script_path.display(), job.task_name);
    Ok(())
}
