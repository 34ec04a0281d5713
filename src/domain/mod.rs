pub mod device;
pub mod platform;
pub mod resource;

pub use device::DeviceInfo;
pub use platform::PlatformInfo;
pub use resource::{DeviceProfile, ResourceDescription};
