use serde::{Deserialize, Serialize};

/// OCF device record as supplied by a simulator at registration time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub name: String,
    pub core_spec_version: String,
    pub data_models: Vec<String>,
}
