use serde::{Deserialize, Serialize};

/// Priority used when neither the script nor the command line sets one
pub const DEFAULT_PRIORITY: i64 = 4;

/// The only priorities the platform accepts
pub const ALLOWED_PRIORITIES: [i64; 3] = [2, 4, 6];

/// Where the platform mounts the user code inside the job container
pub const REMOTE_CODE_PATH: &str = "/root/code";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct JobDescriptor {
    pub task_name: String,
    pub description: String,
    pub framework: String,
    pub task_role_specs: Vec<TaskRoleSpec>,
    pub storages: Vec<Storage>,
    pub envs: Vec<EnvVar>,
    pub remote_mount_code_path: String,
    pub priority: i64,
    pub preemptible: bool,
    pub active_deadline_seconds: String,
    pub delay_exit_time_seconds: String,
    pub access_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(rename = "ResourceQueueID", skip_serializing_if = "Option::is_none")]
    pub resource_queue_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_code_path: Option<String>,
}

/// One class of worker in the job
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskRoleSpec {
    pub role_name: String,
    pub role_replicas: u32,
    pub flavor: String,
}

/// A vePFS volume mounted into the job
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Storage {
    pub mount_path: String,
    pub read_only: bool,
    pub sub_path: String,
    #[serde(rename = "Type")]
    pub kind: String,
    pub vepfs_id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EnvVar {
    pub name: String,
    pub value: String,
    pub is_private: bool,
}

impl JobDescriptor {
    /// A fresh copy of the base template
    pub fn base() -> JobDescriptor {
        JobDescriptor {
            task_name: "vbatch-submit".to_string(),
            description: String::new(),
            framework: "Custom".to_string(),
            task_role_specs: vec![TaskRoleSpec {
                role_name: "worker".to_string(),
                role_replicas: 1,
                flavor: "ml.xni3cl.28xlarge".to_string(),
            }],
            storages: Vec::new(),
            envs: Vec::new(),
            remote_mount_code_path: REMOTE_CODE_PATH.to_string(),
            priority: DEFAULT_PRIORITY,
            preemptible: false,
            active_deadline_seconds: "1h".to_string(),
            delay_exit_time_seconds: "0h".to_string(),
            access_type: "Public".to_string(),
            image_url: None,
            resource_queue_id: None,
            tags: None,
            entrypoint: None,
            user_code_path: None,
        }
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

impl Storage {
    pub fn vepfs(vepfs_id: &str, sub_path: &str, mount_path: &str) -> Storage {
        Storage {
            mount_path: mount_path.to_string(),
            read_only: false,
            sub_path: sub_path.to_string(),
            kind: "Vepfs".to_string(),
            vepfs_id: vepfs_id.to_string(),
        }
    }
}
