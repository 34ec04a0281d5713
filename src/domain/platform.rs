use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// OCF platform record as supplied by a simulator at registration time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub manufacturer_name: String,
    pub manufacture_date: NaiveDate,
    pub platform_version: String,
    pub firmware_version: String,
}
