use log::debug;

use crate::job::descriptor::EnvVar;

/// Editor, IDE and dev-instance variables that must not leak into the remote job
///
/// Names are upper case, variables are compared case-insensitively.
pub static EXCLUDED_ENVS: &[&str] = &[
    "NVIDIA_VISIBLE_DEVICES",
    "SUPERVISOR_GROUP_NAME",
    "COLORTERM",
    "TERM_PROGRAM_VERSION",
    "SUPERVISOR_SERVER_URL",
    "VSCODE_PROXY_URI",
    "MLP_CODE_SERVER_PATH",
    "NVIDIA_DRIVER_CAPABILITIES",
    "MLP_CONSOLE_HOST",
    "VSCODE_GIT_ASKPASS_EXTRA_ARGS",
    "VSCODE_GIT_IPC_HANDLE",
    "NODE_EXEC_PATH",
    "VSCODE_GIT_ASKPASS_NODE",
    "MLP_INNER_CONTAINER",
    "MLP_INNER_JWT_PUBLIC_KEY_BASE64",
    "GIT_ASKPASS",
    "PROMPT_COMMAND",
    "MLP_DEVINSTANCE_ID",
    "MLP_IS_CANARY",
    "MLP_TRACKING_ENDPOINT",
    "MLP_ACCOUNT_ID",
    "VSCODE_GIT_ASKPASS_MAIN",
    "BROWSER",
    "MLP_TLS_INSECURE_SKIP_VERIFY",
    "MLP_IS_STRESS",
    "MLP_REGION",
    "VSCODE_IPC_HOOK_CLI",
];

fn is_excluded(name: &str) -> bool {
    let upper = name.to_uppercase();
    EXCLUDED_ENVS.contains(&upper.as_str())
}

/// Turn environment variables into private descriptor entries, skipping excluded names
pub fn forwarded_envs<I>(vars: I) -> Vec<EnvVar>
where
    I: IntoIterator<Item = (String, String)>,
{
    vars.into_iter()
        .filter(|(name, _)| {
            let excluded = is_excluded(name);
            if excluded {
                debug!("Not forwarding {name}");
            }
            !excluded
        })
        .map(|(name, value)| EnvVar { name, value, is_private: true })
        .collect()
}

/// Snapshot the current process environment
///
/// Variables whose name or value isn't valid unicode can't be written to the descriptor and
/// are skipped.
pub fn snapshot() -> Vec<EnvVar> {
    let vars = std::env::vars_os()
        .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)));
    forwarded_envs(vars)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(name: &str, value: &str) -> (String, String) {
        (name.to_string(), value.to_string())
    }

    #[test]
    fn excluded_names_are_dropped() {
        let envs = forwarded_envs(vec![
            pair("HOME", "/root"),
            pair("VSCODE_IPC_HOOK_CLI", "/tmp/sock"),
            pair("browser", "firefox"),
            pair("Mlp_Region", "cn-beijing"),
            pair("WANDB_API_KEY", "secret"),
        ]);
        let names: Vec<&str> = envs.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["HOME", "WANDB_API_KEY"]);
    }

    #[test]
    fn forwarded_entries_are_private() {
        let envs = forwarded_envs(vec![pair("PATH", "/usr/bin"), pair("LANG", "C.UTF-8")]);
        assert_eq!(envs.len(), 2);
        assert!(envs.iter().all(|e| e.is_private));
        assert_eq!(envs[0].value, "/usr/bin");
    }

    #[test]
    fn snapshot_never_contains_excluded_names() {
        let envs = snapshot();
        assert!(envs.iter().all(|e| !is_excluded(&e.name)));
    }
}
