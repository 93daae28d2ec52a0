//! Sideload phases
//!
//! Each phase issues its requests through an [`EcpClient`] and returns a small
//! result type describing the transition it observed. The phases only
//! interpret statuses; transport concerns stay in the client.
//!
//! [`EcpClient`]: crate::ecp_client::EcpClient

pub mod poller;
pub mod prober;
pub mod sideload;
pub mod uploader;
pub mod waker;
