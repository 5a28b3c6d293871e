use std::path::Path;

use log::info;
use serde::Serialize;
use tinytemplate::TinyTemplate;

use crate::error::Result;
use crate::script::directive::VScript;

/// Rendering context for the run script
#[derive(Serialize)]
struct RunContext {
    header: String,
    cwd: String,
    body: String,
}

impl VScript {
    /// Render the script the platform runs
    ///
    /// The first command (usually a shebang) is kept verbatim, followed by a `cd` into the
    /// directory vbatch was invoked from, so relative paths in the script resolve the same way
    /// remotely as they do locally. Remaining commands are right-trimmed.
    ///
    /// Returns `None` if the script has no commands.
    pub fn render(&self, cwd: &Path) -> Option<Result<String>> {
        let (header, rest) = self.lines.split_first()?;
        Some(render_run_script(header, rest, cwd))
    }
}

fn render_run_script(header: &str, rest: &[String], cwd: &Path) -> Result<String> {
    /// included run script template
    static RUN: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/data/templates/run.txt"));
    let mut tt = TinyTemplate::new();
    tt.set_default_formatter(&tinytemplate::format_unescaped);
    tt.add_template("run", RUN)?;

    let body: Vec<&str> = rest.iter().map(|line| line.trim_end()).collect();
    let context = RunContext {
        header: header.to_string(),
        cwd: cwd.display().to_string(),
        body: body.join("\n"),
    };
    info!("Rendering run script with working directory {}", cwd.display());
    Ok(tt.render("run", &context)?)
}
