use std::path::{Path, PathBuf};

use log::info;

use crate::error::{Result, VbatchError};
use crate::job::descriptor::{EnvVar, JobDescriptor, Storage, ALLOWED_PRIORITIES, DEFAULT_PRIORITY, REMOTE_CODE_PATH};
use crate::script::directive::ScriptConfig;

impl JobDescriptor {
    /// Build a descriptor from the base template, forwarded environment and script directives
    ///
    /// Directives only replace template values when present. `priority` from the command line
    /// beats the script's `--priority`, which beats the template default.
    pub fn build(
        config: &ScriptConfig,
        envs: Vec<EnvVar>,
        priority: Option<i64>,
        log_path: &Path,
    ) -> Result<JobDescriptor> {
        let mut job = JobDescriptor::base();
        job.envs = envs;

        if let Some(image) = &config.image_url {
            job.image_url = Some(image.clone());
        }
        if let Some(queue) = &config.resource_queue_id {
            job.resource_queue_id = Some(queue.clone());
        }
        if let Some(flavor) = &config.flavor {
            job.task_role_specs[0].flavor = flavor.clone();
        }
        if let Some(storage) = vepfs_storage(config)? {
            job.storages.push(storage);
        }
        if let Some(tags) = &config.tags {
            job.tags = Some(tags.clone());
        }
        if let Some(name) = &config.task_name {
            job.task_name = name.clone();
        }
        if let Some(description) = &config.description {
            job.description = description.clone();
        }
        job.priority = resolve_priority(config.priority.as_deref(), priority)?;
        if let Some(preemptible) = config.preemptible {
            job.preemptible = preemptible;
        }
        if let Some(deadline) = &config.active_deadline_seconds {
            job.active_deadline_seconds = deadline.clone();
        }
        if let Some(delay) = &config.delay_exit_time_seconds {
            job.delay_exit_time_seconds = delay.clone();
        }
        if let Some(access) = &config.access_type {
            job.access_type = access.clone();
        }

        job.entrypoint = Some(entrypoint(log_path));
        Ok(job)
    }
}

/// Resolve and validate the final priority
pub fn resolve_priority(directive: Option<&str>, priority: Option<i64>) -> Result<i64> {
    let resolved = match (priority, directive) {
        (Some(p), _) => p,
        (None, Some(raw)) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| VbatchError::InvalidPriority(raw.to_string()))?,
        (None, None) => DEFAULT_PRIORITY,
    };

    if !ALLOWED_PRIORITIES.contains(&resolved) {
        return Err(VbatchError::InvalidPriority(resolved.to_string()));
    }
    info!("Job priority: {resolved}");
    Ok(resolved)
}

/// A vePFS mount needs the id, sub path and mount path together
fn vepfs_storage(config: &ScriptConfig) -> Result<Option<Storage>> {
    let Some(id) = &config.vepfs_id else {
        return Ok(None);
    };
    match (&config.sub_path, &config.mount_path) {
        (Some(sub_path), Some(mount_path)) => {
            info!("Mounting vePFS {id}:{sub_path} at {mount_path}");
            Ok(Some(Storage::vepfs(id, sub_path, mount_path)))
        }
        _ => Err(VbatchError::IncompleteVolume(id.clone())),
    }
}

/// Log file next to the script: same name, `.log` extension, absolute
pub fn log_path(script: &Path, cwd: &Path) -> PathBuf {
    cwd.join(script).with_extension("log")
}

fn entrypoint(log_path: &Path) -> String {
    format!("cd {} && bash run.sh >& \"{}\"", REMOTE_CODE_PATH, log_path.display())
}

#[cfg(test)]
mod tests {
    use crate::script::directive::parse_str;

    use super::*;

    fn build(script: &str, priority: Option<i64>) -> Result<JobDescriptor> {
        let config = parse_str(script).config;
        JobDescriptor::build(&config, Vec::new(), priority, Path::new("/work/job.log"))
    }

    #[test]
    fn no_directives_keeps_template() {
        let job = build("#!/bin/bash\necho hi\n", None).unwrap();
        let mut expected = JobDescriptor::base();
        expected.entrypoint = Some("cd /root/code && bash run.sh >& \"/work/job.log\"".to_string());
        assert_eq!(job, expected);
        assert_eq!(job.priority, 4);
    }

    #[test]
    fn directives_override_template() {
        let job = build(
            "# VBATCH --image img:1\n\
             # VBATCH --partition q-9\n\
             # VBATCH --flavor ml.big\n\
             # VBATCH --tags a,b\n\
             # VBATCH --task-name exp\n\
             # VBATCH --description ablation\n\
             # VBATCH --preemptible true\n\
             # VBATCH --activedeadlineseconds 3h\n\
             # VBATCH --delayexittimeseconds 1h\n\
             # VBATCH --accesstype Private\n",
            None,
        )
        .unwrap();
        assert_eq!(job.image_url.as_deref(), Some("img:1"));
        assert_eq!(job.resource_queue_id.as_deref(), Some("q-9"));
        assert_eq!(job.task_role_specs[0].flavor, "ml.big");
        assert_eq!(job.task_role_specs[0].role_replicas, 1);
        assert_eq!(job.tags, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(job.task_name, "exp");
        assert_eq!(job.description, "ablation");
        assert!(job.preemptible);
        assert_eq!(job.active_deadline_seconds, "3h");
        assert_eq!(job.delay_exit_time_seconds, "1h");
        assert_eq!(job.access_type, "Private");
        assert!(job.storages.is_empty());
    }

    #[test]
    fn directive_priority_is_used() {
        for p in [2, 4, 6] {
            let job = build(&format!("# VBATCH --priority {p}\n"), None).unwrap();
            assert_eq!(job.priority, p);
        }
    }

    #[test]
    fn override_always_wins() {
        for directive in ["2", "4", "6", "9", "high"] {
            let job = build(&format!("# VBATCH --priority {directive}\n"), Some(6)).unwrap();
            assert_eq!(job.priority, 6);
        }
        assert_eq!(build("echo\n", Some(2)).unwrap().priority, 2);
    }

    #[test]
    fn invalid_priority_is_fatal() {
        assert!(matches!(build("# VBATCH --priority 5\n", None), Err(VbatchError::InvalidPriority(_))));
        assert!(matches!(build("# VBATCH --priority 4\n", Some(1)), Err(VbatchError::InvalidPriority(_))));
        assert!(matches!(build("# VBATCH --priority x\n", None), Err(VbatchError::InvalidPriority(_))));
    }

    #[test]
    fn vepfs_mount_added_when_id_given() {
        let job = build(
            "# VBATCH --vepfs-id vepfs-1\n\
             # VBATCH --vepfs-path /team/a\n\
             # VBATCH --vepfs-mount-path /data\n",
            None,
        )
        .unwrap();
        assert_eq!(job.storages, vec![Storage::vepfs("vepfs-1", "/team/a", "/data")]);
    }

    #[test]
    fn vepfs_paths_without_id_are_ignored() {
        let job = build("# VBATCH --vepfs-path /team/a\n# VBATCH --vepfs-mount-path /data\n", None).unwrap();
        assert!(job.storages.is_empty());
    }

    #[test]
    fn partial_vepfs_is_rejected() {
        let err = build("# VBATCH --vepfs-id vepfs-1\n# VBATCH --vepfs-path /team/a\n", None).unwrap_err();
        assert!(matches!(err, VbatchError::IncompleteVolume(id) if id == "vepfs-1"));
    }

    #[test]
    fn repeated_builds_do_not_share_state() {
        let script = "# VBATCH --vepfs-id v\n# VBATCH --vepfs-path /s\n# VBATCH --vepfs-mount-path /m\n";
        let envs = vec![EnvVar { name: "A".to_string(), value: "1".to_string(), is_private: true }];
        let config = parse_str(script).config;
        let log = Path::new("/w/a.log");

        let first = JobDescriptor::build(&config, envs.clone(), None, log).unwrap();
        let second = JobDescriptor::build(&config, envs, None, log).unwrap();
        assert_eq!(second.storages.len(), 1);
        assert_eq!(second.envs.len(), 1);
        assert_eq!(first, second);

        let plain = build("echo\n", None).unwrap();
        assert!(plain.storages.is_empty());
    }

    #[test]
    fn log_path_replaces_extension() {
        assert_eq!(log_path(Path::new("jobs/train.sh"), Path::new("/home/me")), PathBuf::from("/home/me/jobs/train.log"));
        assert_eq!(log_path(Path::new("/abs/run"), Path::new("/home/me")), PathBuf::from("/abs/run.log"));
    }
}
