pub mod config;
pub mod ecp_client;
pub mod error;
pub mod http_client;
pub mod report;
pub mod services;

pub use config::{Cli, Credential, Package, SideloadConfig, Target, Timeouts};
pub use ecp_client::{DeviceEcpClient, EcpClient};
pub use error::{Phase, SideloadError};
pub use services::sideload::{SideloadReport, SideloadService};
