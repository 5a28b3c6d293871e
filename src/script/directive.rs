use std::fs;
use std::path::Path;

use log::{debug, info};

use crate::error::{Result, VbatchError};

/// Every directive line starts with this marker
pub static MARKER: &str = "# VBATCH";

/// Submission settings collected from `# VBATCH` directives
///
/// Fields stay `None` unless the matching directive appears in the script, so a missing
/// directive means "keep the template default". Values are raw strings, priority is only
/// coerced to an integer when the job descriptor is built.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScriptConfig {
    pub image_url: Option<String>,
    pub resource_queue_id: Option<String>,
    pub flavor: Option<String>,
    pub vepfs_id: Option<String>,
    pub sub_path: Option<String>,
    pub mount_path: Option<String>,
    pub tags: Option<Vec<String>>,
    pub task_name: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub preemptible: Option<bool>,
    pub active_deadline_seconds: Option<String>,
    pub delay_exit_time_seconds: Option<String>,
    pub access_type: Option<String>,
}

/// A parsed script: commands in their original order and the directive config
#[derive(Debug)]
pub struct VScript {
    pub lines: Vec<String>,
    pub config: ScriptConfig,
}

type Setter = fn(&mut ScriptConfig, &str);

/// Directive prefixes (after the marker) and how each one is stored
///
/// Matching is by prefix in table order, first match wins.
static DIRECTIVES: &[(&str, Setter)] = &[
    ("--image", |c, v| c.image_url = Some(v.to_string())),
    ("--partition", |c, v| c.resource_queue_id = Some(v.to_string())),
    ("--flavor", |c, v| c.flavor = Some(v.to_string())),
    ("--vepfs-id", |c, v| c.vepfs_id = Some(v.to_string())),
    ("--vepfs-path", |c, v| c.sub_path = Some(v.to_string())),
    ("--vepfs-mount-path", |c, v| c.mount_path = Some(v.to_string())),
    ("--tags", |c, v| c.tags = Some(v.trim().split(',').map(String::from).collect())),
    ("--task-name", |c, v| c.task_name = Some(v.to_string())),
    ("--description", |c, v| c.description = Some(v.to_string())),
    ("--priority", |c, v| c.priority = Some(v.to_string())),
    ("--preemptible", |c, v| c.preemptible = Some(v.eq_ignore_ascii_case("true"))),
    ("--activedeadlineseconds", |c, v| c.active_deadline_seconds = Some(v.to_string())),
    ("--delayexittimeseconds", |c, v| c.delay_exit_time_seconds = Some(v.to_string())),
    ("--accesstype", |c, v| c.access_type = Some(v.to_string())),
];

/// Read a script from disk and split it into commands and directives
pub fn parse(path: &Path) -> Result<VScript> {
    info!("Reading script {}", path.display());
    let text = fs::read_to_string(path).map_err(|source| VbatchError::ScriptRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_str(&text))
}

/// Split script text into commands and directives
///
/// Blank lines are dropped. A directive's value is the last whitespace separated token on its
/// line, so values can't contain spaces. Unknown directives are ignored.
pub fn parse_str(text: &str) -> VScript {
    let mut lines: Vec<String> = Vec::new();
    let mut config = ScriptConfig::default();
    let mut directives = 0;

    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        match line.strip_prefix(MARKER) {
            Some(rest) => {
                directives += 1;
                apply(&mut config, rest.trim_start(), line);
            }
            None => lines.push(line.to_string()),
        }
    }

    info!("Parsed {} directives and {} script lines", directives, lines.len());
    VScript { lines, config }
}

fn apply(config: &mut ScriptConfig, directive: &str, line: &str) {
    // the marker itself is a token, so there is always a last one
    let value = line.split_whitespace().last().unwrap_or_default();
    match DIRECTIVES.iter().find(|(prefix, _)| directive.starts_with(prefix)) {
        Some((prefix, set)) => {
            debug!("Directive {prefix} = {value}");
            set(config, value);
        }
        None => debug!("Ignoring unknown directive: {}", line.trim_end()),
    }
}
