pub mod domain;
mod registry;
mod server;

pub use registry::{LookupError, Registry, RegistryError};
pub use server::{GatewayError, GatewayState, router, serve};
