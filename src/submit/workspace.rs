use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use tempfile::TempDir;

use crate::error::Result;
use crate::job::descriptor::JobDescriptor;

/// A scratch directory holding `run.sh` and `job.yaml` for one submission
///
/// The directory and everything in it is deleted when the workspace is dropped.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn create() -> Result<Workspace> {
        let dir = tempfile::Builder::new().prefix("vbatch-").tempdir()?;
        info!("Created workspace {}", dir.path().display());
        Ok(Workspace { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write the run script and point the descriptor's user code path at it
    pub fn write_run_script(&self, text: &str, job: &mut JobDescriptor) -> Result<PathBuf> {
        let out_path = self.path().join("run.sh");
        info!("Writing run script to {}", out_path.display());
        fs::write(&out_path, text)?;
        job.user_code_path = Some(out_path.display().to_string());
        Ok(out_path)
    }

    pub fn write_descriptor(&self, job: &JobDescriptor) -> Result<PathBuf> {
        let out_path = self.path().join("job.yaml");
        info!("Writing job descriptor to {}", out_path.display());
        fs::write(&out_path, job.to_yaml()?)?;
        Ok(out_path)
    }
}
