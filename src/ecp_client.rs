use crate::{
    config::{Credential, Target, Timeouts},
    http_client::{EcpResponse, capture_response},
    services::uploader::PackageArchive,
};
use anyhow::{Context, Result};
use log::debug;
#[cfg(any(test, feature = "mock"))]
use mockall::automock;
use reqwest::{
    Client, RequestBuilder,
    header::ACCEPT,
    multipart::{Form, Part},
};
use std::time::Duration;
use trait_variant::make;

/// Requests against the device's local control API
///
/// Implementations report any completed HTTP exchange as `Ok`, whatever the
/// status. `Err` is reserved for transport failures (refused connection,
/// timeout, DNS, unreadable package).
#[make(Send)]
#[cfg_attr(any(test, feature = "mock"), automock)]
pub trait EcpClient {
    async fn keypress(&self, key: &str) -> Result<EcpResponse>;
    async fn device_info(&self) -> Result<EcpResponse>;
    async fn install(&self, archive: PackageArchive) -> Result<EcpResponse>;
    /// Query installed apps, waiting at most `timeout` for the answer
    async fn apps(&self, timeout: Duration) -> Result<EcpResponse>;
}

#[derive(Clone)]
pub struct DeviceEcpClient {
    client: Client,
    base_url: String,
    credential: Option<Credential>,
    timeouts: Timeouts,
}

impl DeviceEcpClient {
    // API endpoint constants
    const KEYPRESS_ENDPOINT: &str = "/keypress/";
    const DEVICE_INFO_ENDPOINT: &str = "/query/device-info";
    const INSTALL_ENDPOINT: &str = "/plugin_install";
    const APPS_ENDPOINT: &str = "/query/apps";

    // the developer web form posts these along with the archive
    const INSTALL_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
    const INSTALL_SUBMIT: (&str, &str) = ("mysubmit", "Install");
    const ARCHIVE_FIELD: &str = "archive";
    const ARCHIVE_MIME: &str = "application/zip";

    pub fn new(
        client: Client,
        target: &Target,
        credential: Option<Credential>,
        timeouts: Timeouts,
    ) -> Self {
        Self {
            client,
            base_url: target.base_url(),
            credential,
            timeouts,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        // Normalize path to always start with a single "/"
        let normalized_path = path.trim_start_matches('/');
        format!("{}/{normalized_path}", self.base_url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.credential {
            Some(credential) => {
                request.basic_auth(&credential.username, Some(&credential.password))
            }
            None => request,
        }
    }

    /// GET request to the control API
    async fn get(&self, path: &str, timeout: Duration) -> Result<EcpResponse> {
        let url = self.build_url(path);
        debug!("GET {url}");

        let res = self
            .authorize(self.client.get(&url))
            .timeout(timeout)
            .send()
            .await
            .with_context(|| format!("failed to send GET request to {url}"))?;

        capture_response(res, &format!("GET {url}")).await
    }

    /// POST request to the control API (empty body)
    async fn post(&self, path: &str, timeout: Duration) -> Result<EcpResponse> {
        let url = self.build_url(path);
        debug!("POST {url}");

        let res = self
            .authorize(self.client.post(&url))
            .timeout(timeout)
            .send()
            .await
            .with_context(|| format!("failed to send POST request to {url}"))?;

        capture_response(res, &format!("POST {url}")).await
    }
}

impl EcpClient for DeviceEcpClient {
    async fn keypress(&self, key: &str) -> Result<EcpResponse> {
        self.post(&format!("{}{key}", Self::KEYPRESS_ENDPOINT), self.timeouts.wake)
            .await
    }

    async fn device_info(&self) -> Result<EcpResponse> {
        self.get(Self::DEVICE_INFO_ENDPOINT, self.timeouts.probe)
            .await
    }

    async fn install(&self, archive: PackageArchive) -> Result<EcpResponse> {
        let url = self.build_url(Self::INSTALL_ENDPOINT);
        let file_name = archive.file_name().to_string();

        // consumes the archive, its handle is released before the request goes out
        let content = archive.into_bytes().await?;
        debug!("POST {url} with {file_name} ({} bytes)", content.len());

        let part = Part::bytes(content)
            .file_name(file_name)
            .mime_str(Self::ARCHIVE_MIME)
            .context("failed to build archive form part")?;
        let (submit_name, submit_value) = Self::INSTALL_SUBMIT;
        let form = Form::new()
            .part(Self::ARCHIVE_FIELD, part)
            .text(submit_name, submit_value);

        let res = self
            .authorize(self.client.post(&url))
            .header(ACCEPT, Self::INSTALL_ACCEPT)
            .multipart(form)
            .timeout(self.timeouts.upload)
            .send()
            .await
            .with_context(|| format!("failed to send POST request to {url}"))?;

        capture_response(res, &format!("POST {url}")).await
    }

    async fn apps(&self, timeout: Duration) -> Result<EcpResponse> {
        // never longer than a probe, however much of the caller's window is left
        self.get(Self::APPS_ENDPOINT, timeout.min(self.timeouts.probe))
            .await
    }
}
