use crate::error::SideloadError;
use clap::Parser;
use log::warn;
use std::{
    net::IpAddr,
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_PORT: u16 = 8060;
pub const DEFAULT_WAIT_SECS: u64 = 20;
pub const DEFAULT_USERNAME: &str = "rokudev";

/// Sideload a channel package onto an ECP media player
#[derive(Debug, Parser)]
#[command(name = "ecp-sideload", version, about)]
pub struct Cli {
    /// Device IP address
    pub ip: IpAddr,

    /// Path to the channel package (zip)
    pub package: PathBuf,

    /// Developer username, commonly 'rokudev'
    #[arg(short, long, env = "ROKU_DEV_USERNAME")]
    pub username: Option<String>,

    /// Developer password, set when enabling developer mode
    #[arg(short, long, env = "ROKU_DEV_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// ECP control port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Seconds to poll the device after upload
    #[arg(long, default_value_t = DEFAULT_WAIT_SECS)]
    pub wait: u64,
}

/// Sideload run configuration, immutable once built
#[derive(Clone, Debug)]
pub struct SideloadConfig {
    pub target: Target,
    pub credential: Option<Credential>,
    pub package: Package,
    pub timeouts: Timeouts,
}

/// Device addressed by this run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub host: IpAddr,
    pub port: u16,
    pub wait: Duration,
}

/// HTTP basic credential for the developer web server
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

/// Local package verified to exist
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Package {
    path: PathBuf,
}

/// Per request timeouts
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Timeouts {
    pub wake: Duration,
    pub probe: Duration,
    pub upload: Duration,
}

impl SideloadConfig {
    /// Build the run configuration from parsed arguments
    ///
    /// Fails with [`SideloadError::PackageNotFound`] before anything touches
    /// the network.
    pub fn from_cli(cli: Cli) -> Result<Self, SideloadError> {
        let package = Package::locate(cli.package)?;
        if !package.has_zip_extension() {
            warn!(
                "file does not end with .zip, ensure {} is a channel package zip",
                package.path().display()
            );
        }

        Ok(Self {
            target: Target::new(cli.ip, cli.port, Duration::from_secs(cli.wait)),
            credential: Credential::from_parts(cli.username, cli.password),
            package,
            timeouts: Timeouts::default(),
        })
    }
}

impl Target {
    pub fn new(host: IpAddr, port: u16, wait: Duration) -> Self {
        Self { host, port, wait }
    }

    pub fn base_url(&self) -> String {
        match self.host {
            IpAddr::V4(addr) => format!("http://{addr}:{}", self.port),
            IpAddr::V6(addr) => format!("http://[{addr}]:{}", self.port),
        }
    }
}

impl Credential {
    /// Authenticated mode is active as soon as either part is given
    pub fn from_parts(username: Option<String>, password: Option<String>) -> Option<Self> {
        if username.is_none() && password.is_none() {
            return None;
        }

        Some(Self {
            username: username.unwrap_or_else(|| DEFAULT_USERNAME.to_string()),
            password: password.unwrap_or_default(),
        })
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl Package {
    pub fn locate(path: impl Into<PathBuf>) -> Result<Self, SideloadError> {
        let path = path.into();

        if !path.is_file() {
            return Err(SideloadError::PackageNotFound(path));
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "package.zip".to_string())
    }

    pub fn has_zip_extension(&self) -> bool {
        self.path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            wake: Duration::from_secs(5),
            probe: Duration::from_secs(10),
            upload: Duration::from_secs(120),
        }
    }
}
