use crate::domain::{DeviceInfo, DeviceProfile, PlatformInfo, ResourceDescription};
use crate::simulator::handler::ResourceHandler;
use crate::simulator::observers::NotifyStyle;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{Value, json};
use std::time::Duration;
use tokio::sync::RwLock;

pub const RESOURCE_PATH: &str = "/a/gas";
pub const RESOURCE_TYPE: &str = "oic.r.sensor.carbondioxide";
const NOTIFY_DELAY: Duration = Duration::from_millis(200);
const NOTIFY_PERIOD: Duration = Duration::from_millis(2000);

/// A virtual gas sensor. There is no real hardware behind it, so every
/// sample flips the detection flag to make consecutive readings visibly
/// different.
pub struct GasResource {
    detected: RwLock<bool>,
}

impl GasResource {
    pub fn new() -> GasResource {
        GasResource { detected: RwLock::new(false) }
    }
}

impl Default for GasResource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceHandler for GasResource {
    async fn retrieve(&self) -> Value {
        let mut detected = self.detected.write().await;
        *detected = !*detected;
        json!({ "rt": RESOURCE_TYPE, "id": "gasSensor", "value": *detected })
    }
}

pub fn notify_style() -> NotifyStyle {
    NotifyStyle::Periodic {
        delay: NOTIFY_DELAY,
        period: NOTIFY_PERIOD,
    }
}

pub fn profile() -> DeviceProfile {
    DeviceProfile {
        device: DeviceInfo {
            name: "Smart Home Gas Sensor".to_string(),
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
