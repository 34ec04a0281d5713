mod entries;
mod registration;

pub use entries::{DeviceEntry, LinkPolicy, PlatformEntry, ResourceEntry, ResourceLink};
pub use registration::{Registration, RegistrationReply};
