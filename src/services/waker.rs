//! Wake service
//!
//! Sends a `Home` keypress which turns the attached TV on when HDMI-CEC is
//! enabled. Best effort only.

use crate::ecp_client::EcpClient;
use log::{info, warn};
use reqwest::StatusCode;

const WAKE_KEY: &str = "Home";

#[derive(Debug, PartialEq, Eq)]
pub enum WakeSignal {
    Delivered,
    Unexpected(StatusCode),
    Failed,
}

/// Service for the wake keypress
pub struct WakeService;

impl WakeService {
    /// Send a single wake keypress, never failing the run
    pub async fn wake<Client: EcpClient>(client: &Client) -> WakeSignal {
        match client.keypress(WAKE_KEY).await {
            Ok(res) if res.status == StatusCode::OK => {
                info!("sent '{WAKE_KEY}' keypress to wake TV");
                WakeSignal::Delivered
            }
            Ok(res) => {
                warn!(
                    "unexpected response when trying to wake TV: HTTP {}",
                    res.status
                );
                WakeSignal::Unexpected(res.status)
            }
            Err(e) => {
                warn!("failed to send '{WAKE_KEY}' keypress: {e:#}");
                WakeSignal::Failed
            }
        }
    }
}
