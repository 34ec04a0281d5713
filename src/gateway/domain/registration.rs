use crate::domain::DeviceProfile;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Body of `POST /api/registry` and the record the gateway keeps for one
/// live simulator process. The initial property set is sampled by the
/// simulator right before registering, so for the gas sensor it already
/// reflects one toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    pub di: Uuid,
    pub pi: Uuid,
    #[serde(flatten)]
    pub profile: DeviceProfile,
    pub properties: Value,
    pub endpoint: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationReply {
    pub di: Uuid,
}
