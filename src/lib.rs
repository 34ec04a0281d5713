pub mod app_config;
pub mod domain;
pub mod gateway;
pub mod readiness;
pub mod shutdown;
pub mod simulator;
