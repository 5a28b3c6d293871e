use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::thread;
use std::time::Duration;

use log::{info, warn};

use crate::error::{Result, VbatchError};

/// Pause before the single retry
pub const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Something that can hand a job descriptor to the platform
pub trait Launch {
    fn launch(&self, conf: &Path) -> Result<()>;
}

/// The volc CLI: `volc ml_task submit --conf <job.yaml>`
pub struct VolcCli {
    pub program: PathBuf,
}

impl Launch for VolcCli {
    fn launch(&self, conf: &Path) -> Result<()> {
        let mut volc = Command::new(&self.program);
        let cmd = volc.args(["ml_task", "submit", "--conf"]).arg(conf);
        info!("Running volc process");
        info!("{:?}", &cmd);
        let status = cmd
            .status()
            .map_err(|err| VbatchError::Launch(format!("can't run {}: {}", self.program.display(), err)))?;

        match status.success() {
            true => Ok(()),
            false => Err(VbatchError::Launch(format!("{} exited with {}", self.program.display(), status))),
        }
    }
}

/// Print what would be submitted instead of submitting it
pub struct DryRun;

impl Launch for DryRun {
    fn launch(&self, conf: &Path) -> Result<()> {
        info!("--dry-run set, not submitting {}", conf.display());
        let descriptor = fs::read_to_string(conf)?;
        println!("{descriptor}");
        if let Some(dir) = conf.parent() {
            println!("---\n{}", fs::read_to_string(dir.join("run.sh"))?);
        }
        Ok(())
    }
}

/// Launch once, and once more after [`RETRY_DELAY`] if that fails
pub fn launch_with_retry(launcher: &impl Launch, conf: &Path) -> Result<()> {
    match launcher.launch(conf) {
        Ok(()) => Ok(()),
        Err(err) => {
            warn!("Submission failed ({err}), retrying in {}s", RETRY_DELAY.as_secs());
            thread::sleep(RETRY_DELAY);
            launcher.launch(conf)
        }
    }
}
