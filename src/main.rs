use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use crate::submit::volc::{DryRun, VolcCli};

mod error;
mod job;
mod script;
mod submit;

/// Job submit tool for volc ML platform.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bash script file you want to submit
    input: PathBuf,

    /// Priority of the job. Default is 4 (only 2, 4, 6 are supported)
    #[arg(long)]
    priority: Option<i64>,

    /// Render the job descriptor and run script without submitting
    #[arg(long)]
    dry_run: bool,

    /// volc CLI used to submit the job
    #[arg(long, env = "VBATCH_VOLC", default_value = "volc")]
    volc: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();
    info!("Submitting {}", args.input.display());

    let result = match args.dry_run {
        true => submit::run(&args.input, args.priority, &DryRun),
        false => submit::run(&args.input, args.priority, &VolcCli { program: args.volc }),
    };
    result.with_context(|| format!("Submitting {} failed", args.input.display()))
}
