//! Install poll service
//!
//! Waits for the device to answer the installed apps query after an upload.
//! A 200 means the device is healthy again, not that a specific channel was
//! confirmed.

use crate::{
    ecp_client::EcpClient,
    error::{Phase, SideloadError},
};
use log::{debug, info};
use reqwest::StatusCode;
use std::time::Duration;
use tokio::time::{Instant, sleep};

const POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, PartialEq, Eq)]
pub struct InstallConfirmation {
    /// Body of the apps query, an XML listing
    pub apps: String,
    pub attempts: u32,
}

/// Service polling the device after upload
pub struct PollService;

impl PollService {
    /// Poll until the first 200, a 401 or the deadline
    ///
    /// The deadline is fixed at entry; slow attempts shorten the remaining
    /// window instead of extending it. Each attempt may only use what is
    /// left of the window.
    pub async fn poll<Client: EcpClient>(
        client: &Client,
        wait: Duration,
        credential_supplied: bool,
    ) -> Result<InstallConfirmation, SideloadError> {
        let deadline = Instant::now() + wait;
        let mut attempts = 0;

        while Instant::now() < deadline {
            attempts += 1;
            let remaining = deadline.saturating_duration_since(Instant::now());

            match client.apps(remaining).await {
                Ok(res) if res.status == StatusCode::OK => {
                    info!("device responsive after {attempts} attempt(s)");
                    return Ok(InstallConfirmation {
                        apps: res.body,
                        attempts,
                    });
                }
                Ok(res) if res.status == StatusCode::UNAUTHORIZED => {
                    return Err(SideloadError::unauthorized(Phase::Poll, credential_supplied));
                }
                Ok(res) => debug!("apps query attempt {attempts} returned HTTP {}", res.status),
                Err(e) => debug!("apps query attempt {attempts} failed: {e:#}"),
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            sleep(POLL_INTERVAL.min(remaining)).await;
        }

        Err(SideloadError::Timeout(wait))
    }
}
