//! Console report
//!
//! Turns the outcome of a run into the lines shown to the user and the
//! process exit code.

use crate::{
    error::SideloadError,
    http_client::{SNIPPET_CHARS, head},
    services::{
        prober::Reachability, sideload::SideloadReport, uploader::UploadReceipt,
        waker::WakeSignal,
    },
};

/// Exit code of a successful run
pub const EXIT_SUCCESS: u8 = 0;

/// Lines describing the install exchange, shown whether or not polling succeeds
pub fn upload_lines(receipt: &UploadReceipt) -> Vec<String> {
    vec![
        format!("upload finished with HTTP {}", receipt.status),
        format!("device response snippet: {}", receipt.snippet),
    ]
}

/// Closing lines of a successful run
///
/// The apps listing is only repeated when it looks like markup.
pub fn success_lines(report: &SideloadReport, base_url: &str) -> Vec<String> {
    let mut lines = Vec::new();

    match report.wake {
        WakeSignal::Delivered => {}
        WakeSignal::Unexpected(status) => lines.push(format!(
            "note: wake keypress answered HTTP {status}, the screen may have stayed off"
        )),
        WakeSignal::Failed => lines.push(
            "note: wake keypress was not delivered, the screen may have stayed off".to_string(),
        ),
    }

    match report.reachability {
        Reachability::Ready => {}
        Reachability::AuthRequired => lines.push(
            "note: device info query required credentials, the supplied ones were accepted for the install"
                .to_string(),
        ),
        Reachability::Degraded(status) => lines.push(format!(
            "note: device info query answered HTTP {status} before the upload"
        )),
    }

    lines.push(
        "device is responsive after upload, installation may have completed or is in progress"
            .to_string(),
    );

    let apps = &report.confirmation.apps;
    if apps.trim_start().starts_with('<') {
        lines.push("current installed apps (XML snippet):".to_string());
        lines.push(head(apps, SNIPPET_CHARS).to_string());
    }

    lines.push(
        "done, if the channel does not appear on the device check its home screen and channel list"
            .to_string(),
    );
    lines.push(format!(
        "the developer web interface at {base_url}/ shows install state and console output"
    ));

    lines
}

/// Process exit code of a finished run
pub fn exit_code(outcome: &Result<SideloadReport, SideloadError>) -> u8 {
    match outcome {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => e.exit_code(),
    }
}
