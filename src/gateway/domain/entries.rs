use crate::gateway::domain::Registration;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One element of the `/api/oic/d` response, using the OCF short field
/// names the REST surface is queried by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceEntry {
    #[serde(rename = "n")]
    pub name: String,
    pub di: Uuid,
    #[serde(rename = "icv")]
    pub core_spec_version: String,
    #[serde(rename = "dmv")]
    pub data_models: Vec<String>,
}

/// One element of the `/api/oic/p` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformEntry {
    pub pi: Uuid,
    #[serde(rename = "mnmn")]
    pub manufacturer_name: String,
    #[serde(rename = "mndt")]
    pub manufacture_date: NaiveDate,
    #[serde(rename = "mnpv")]
    pub platform_version: String,
    #[serde(rename = "mnfv")]
    pub firmware_version: String,
}

/// One element of the `/api/oic/res` response: a device and its single
/// resource link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceEntry {
    pub di: Uuid,
    pub links: Vec<ResourceLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLink {
    pub href: String,
    /// Primary resource type. Serialized flat as a string, the way the
    /// original REST server reported it.
    pub rt: String,
    #[serde(rename = "if")]
    pub interfaces: Vec<String>,
    #[serde(rename = "p")]
    pub policy: LinkPolicy,
}

/// OCF link policy bitmask: bit 0 discoverable, bit 1 observable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkPolicy {
    pub bm: u8,
}

impl LinkPolicy {
    pub fn new(discoverable: bool, observable: bool) -> Self {
        LinkPolicy {
            bm: u8::from(discoverable) | u8::from(observable) << 1,
        }
    }
}

impl From<&Registration> for DeviceEntry {
    fn from(registration: &Registration) -> Self {
        DeviceEntry {
            name: registration.profile.device.name.clone(),
            di: registration.di,
            core_spec_version: registration.profile.device.core_spec_version.clone(),
            data_models: registration.profile.device.data_models.clone(),
        }
    }
}

impl From<&Registration> for PlatformEntry {
    fn from(registration: &Registration) -> Self {
        PlatformEntry {
            pi: registration.pi,
            manufacturer_name: registration.profile.platform.manufacturer_name.clone(),
            manufacture_date: registration.profile.platform.manufacture_date,
            platform_version: registration.profile.platform.platform_version.clone(),
            firmware_version: registration.profile.platform.firmware_version.clone(),
        }
    }
}

impl From<&Registration> for ResourceEntry {
    fn from(registration: &Registration) -> Self {
        let resource = &registration.profile.resource;
        ResourceEntry {
            di: registration.di,
            links: vec![ResourceLink {
                href: resource.resource_path.clone(),
                rt: resource.primary_type().to_string(),
                interfaces: resource.interfaces.clone(),
                policy: LinkPolicy::new(resource.discoverable, resource.observable),
            }],
        }
    }
}
