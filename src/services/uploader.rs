//! Upload service
//!
//! Pushes the channel package to the developer web server's install form.

use crate::{
    config::Package,
    ecp_client::EcpClient,
    error::{Phase, SideloadError},
};
use anyhow::{Context, Result};
use log::info;
use reqwest::StatusCode;
use tokio::{
    fs::File,
    io::{AsyncRead, AsyncReadExt},
};

/// Open package content owned by exactly one upload
///
/// The handle is released when the archive is consumed or dropped, which
/// happens exactly once on every path through [`UploadService::upload`].
pub struct PackageArchive {
    file_name: String,
    reader: Box<dyn AsyncRead + Send + Unpin>,
}

impl PackageArchive {
    pub async fn open(package: &Package) -> Result<Self> {
        let file = File::open(package.path())
            .await
            .with_context(|| format!("failed to open package {}", package.path().display()))?;

        Ok(Self::from_reader(package.file_name(), file))
    }

    pub fn from_reader(
        file_name: impl Into<String>,
        reader: impl AsyncRead + Send + Unpin + 'static,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            reader: Box::new(reader),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Read the whole archive and release the handle
    pub async fn into_bytes(mut self) -> Result<Vec<u8>> {
        let mut content = Vec::new();
        self.reader
            .read_to_end(&mut content)
            .await
            .with_context(|| format!("failed to read package {}", self.file_name))?;

        Ok(content)
    }
}

/// Completed install request, success is left to the poller
#[derive(Debug, PartialEq, Eq)]
pub struct UploadReceipt {
    pub status: StatusCode,
    pub snippet: String,
}

/// Service for uploading the channel package
pub struct UploadService;

impl UploadService {
    /// Upload the package and report the device's answer
    ///
    /// Only a 401 is judged. The install page is HTML without a structured
    /// result, so any other completed exchange is returned as a receipt.
    pub async fn upload<Client: EcpClient>(
        client: &Client,
        package: &Package,
        credential_supplied: bool,
    ) -> Result<UploadReceipt, SideloadError> {
        let archive = PackageArchive::open(package)
            .await
            .map_err(SideloadError::UploadRejected)?;

        info!("uploading {} ...", package.path().display());
        Self::upload_archive(client, archive, credential_supplied).await
    }

    /// Upload an already opened archive, consuming it
    pub async fn upload_archive<Client: EcpClient>(
        client: &Client,
        archive: PackageArchive,
        credential_supplied: bool,
    ) -> Result<UploadReceipt, SideloadError> {
        let res = client
            .install(archive)
            .await
            .map_err(SideloadError::UploadRejected)?;

        if res.status == StatusCode::UNAUTHORIZED {
            return Err(SideloadError::unauthorized(
                Phase::Upload,
                credential_supplied,
            ));
        }

        Ok(UploadReceipt {
            status: res.status,
            snippet: res.snippet(),
        })
    }
}
