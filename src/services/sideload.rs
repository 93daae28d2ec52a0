//! Sideload service
//!
//! Drives the four phases strictly in order: wake, probe, upload, poll.

use crate::{
    config::SideloadConfig,
    ecp_client::EcpClient,
    error::SideloadError,
    report,
    services::{
        poller::{InstallConfirmation, PollService},
        prober::{ProbeService, Reachability},
        uploader::{UploadReceipt, UploadService},
        waker::{WakeService, WakeSignal},
    },
};
use log::info;

/// Observations of a successful run
#[derive(Debug)]
pub struct SideloadReport {
    pub wake: WakeSignal,
    pub reachability: Reachability,
    pub upload: UploadReceipt,
    pub confirmation: InstallConfirmation,
}

/// Service running a complete sideload against one device
pub struct SideloadService;

impl SideloadService {
    /// Run every phase once, stopping at the first fatal condition
    ///
    /// # Arguments
    /// * `client` - Control API client, shared by every phase of the run
    /// * `config` - Target, credential and package of the run
    pub async fn run<Client: EcpClient>(
        client: &Client,
        config: &SideloadConfig,
    ) -> Result<SideloadReport, SideloadError> {
        let credential_supplied = config.credential.is_some();

        let wake = WakeService::wake(client).await;

        info!("checking device at {} ...", config.target.base_url());
        let reachability = ProbeService::probe(client, credential_supplied).await?;

        let upload = UploadService::upload(client, &config.package, credential_supplied).await?;
        // logged before polling, a failed poll returns early
        for line in report::upload_lines(&upload) {
            info!("{line}");
        }

        info!(
            "waiting up to {} seconds for the device to process the install ...",
            config.target.wait.as_secs()
        );
        let confirmation =
            PollService::poll(client, config.target.wait, credential_supplied).await?;

        Ok(SideloadReport {
            wake,
            reachability,
            upload,
            confirmation,
        })
    }
}
