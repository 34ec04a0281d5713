mod client;
mod device_server;
pub mod gas;
mod handler;
pub mod led;
mod observers;

pub use client::{GatewayClient, GatewayClientError};
pub use device_server::{SimulatorError, run};
pub use handler::{ResourceHandler, UpdateError};
pub use observers::{NotifyStyle, ObserverHub};
