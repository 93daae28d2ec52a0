//! Reachability service
//!
//! Confirms the device answers control requests and whether the developer
//! web server wants credentials.

use crate::{
    ecp_client::EcpClient,
    error::{Phase, SideloadError},
};
use log::{info, warn};
use reqwest::StatusCode;

/// State of the device after the probe
#[derive(Debug, PartialEq, Eq)]
pub enum Reachability {
    /// Answered 200, supplied credential (if any) accepted
    Ready,
    /// Answered 401 although a credential was supplied
    AuthRequired,
    /// Answered with some other status
    Degraded(StatusCode),
}

/// Service for the reachability probe
pub struct ProbeService;

impl ProbeService {
    /// Query device info once and classify the answer
    ///
    /// # Arguments
    /// * `client` - Control API client carrying the session and credential
    /// * `credential_supplied` - Whether the client sends basic auth
    ///
    /// # Returns
    /// The reachability state, or `Unreachable` on transport failure and
    /// `Unauthorized` on a 401 without credential
    pub async fn probe<Client: EcpClient>(
        client: &Client,
        credential_supplied: bool,
    ) -> Result<Reachability, SideloadError> {
        let res = client
            .device_info()
            .await
            .map_err(SideloadError::Unreachable)?;

        match res.status {
            StatusCode::OK => {
                info!("device responded, proceeding to upload");
                Ok(Reachability::Ready)
            }
            StatusCode::UNAUTHORIZED if credential_supplied => {
                warn!(
                    "device responded with 401 Unauthorized, trying supplied credentials on upload"
                );
                Ok(Reachability::AuthRequired)
            }
            StatusCode::UNAUTHORIZED => Err(SideloadError::unauthorized(Phase::Probe, false)),
            status => {
                warn!("device responded with HTTP {status}, continuing but upload may fail");
                Ok(Reachability::Degraded(status))
            }
        }
    }
}
