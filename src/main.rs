use clap::Parser;
use ecp_sideload::{
    Cli, DeviceEcpClient, SideloadConfig, SideloadService, http_client::session_client, report,
};
use env_logger::{Builder, Env, Target};
use log::{error, info};
use std::{io::Write, process::ExitCode};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    log_panics::init();

    let mut builder = if cfg!(debug_assertions) {
        Builder::from_env(Env::default().default_filter_or("debug"))
    } else {
        Builder::from_env(Env::default().default_filter_or("info"))
    };

    builder.format(|f, record| match record.level() {
        log::Level::Error | log::Level::Warn => {
            eprintln!("{}", record.args());
            Ok(())
        }
        _ => {
            writeln!(f, "{}", record.args())
        }
    });

    builder.target(Target::Stdout).init();

    let cli = Cli::parse();

    let config = match SideloadConfig::from_cli(cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::from(e.exit_code());
        }
    };

    let session = match session_client() {
        Ok(session) => session,
        Err(e) => {
            error!("{e:#}");
            return ExitCode::FAILURE;
        }
    };

    let client = DeviceEcpClient::new(
        session,
        &config.target,
        config.credential.clone(),
        config.timeouts.clone(),
    );

    let outcome = SideloadService::run(&client, &config).await;
    match &outcome {
        Ok(summary) => {
            for line in report::success_lines(summary, client.base_url()) {
                info!("{line}");
            }
        }
        Err(e) => error!("{e}"),
    }

    ExitCode::from(report::exit_code(&outcome))
}
