use crate::domain::{DeviceInfo, PlatformInfo};
use serde::{Deserialize, Serialize};

/// Static description of the single resource a simulator process serves.
/// The live property set is not part of the description; it is sampled from
/// the resource handler whenever a representation is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDescription {
    pub resource_path: String,
    pub resource_types: Vec<String>,
    pub interfaces: Vec<String>,
    pub discoverable: bool,
    pub observable: bool,
}

impl ResourceDescription {
    /// The first resource type, which discovery links expose as the `rt`
    /// field.
    pub fn primary_type(&self) -> &str {
        self.resource_types.first().map(String::as_str).unwrap_or_default()
    }
}

/// Everything a simulator announces about itself: one device, one platform,
/// one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    pub device: DeviceInfo,
    pub platform: PlatformInfo,
    pub resource: ResourceDescription,
}
