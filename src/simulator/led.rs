use crate::domain::{DeviceInfo, DeviceProfile, PlatformInfo, ResourceDescription};
use crate::simulator::handler::{ResourceHandler, UpdateError};
use crate::simulator::observers::NotifyStyle;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Value, json};
use std::time::Duration;
use tokio::sync::RwLock;

pub const RESOURCE_PATH: &str = "/a/led";
pub const RESOURCE_TYPE: &str = "oic.r.led";
const NOTIFY_DELAY: Duration = Duration::from_millis(200);

/// A virtual LED: a single writable boolean.
pub struct LedResource {
    value: RwLock<bool>,
}

impl LedResource {
    pub fn new() -> LedResource {
        LedResource { value: RwLock::new(false) }
    }
}

impl Default for LedResource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceHandler for LedResource {
    async fn retrieve(&self) -> Value {
        json!({ "rt": RESOURCE_TYPE, "id": "led", "value": *self.value.read().await })
    }

    async fn update(&self, payload: Value) -> Result<Value, UpdateError> {
        let value = payload
            .get("value")
            .and_then(Value::as_bool)
            .ok_or_else(|| UpdateError::InvalidPayload {
                reason: "'value' must be a boolean".to_string(),
            })?;

        *self.value.write().await = value;
        Ok(self.retrieve().await)
    }
}

pub fn notify_style() -> NotifyStyle {
    NotifyStyle::OneShot { delay: NOTIFY_DELAY }
}

pub fn profile() -> DeviceProfile {
    DeviceProfile {
        device: DeviceInfo {
            name: "Smart Home LED".to_string(),
            core_spec_version: "core.1.1.0".to_string(),
            data_models: vec!["res.1.1.0".to_string()],
        },
        platform: PlatformInfo {
            manufacturer_name: "Intel".to_string(),
            manufacture_date: NaiveDate::from_ymd_opt(2015, 10, 30).expect("valid date literal"),
            platform_version: "1.1.0".to_string(),
            firmware_version: "0.0.1".to_string(),
        },
        resource: ResourceDescription {
            resource_path: RESOURCE_PATH.to_string(),
            resource_types: vec![RESOURCE_TYPE.to_string()],
            interfaces: vec!["oic.if.baseline".to_string()],
            discoverable: true,
            observable: true,
        },
    }
}
