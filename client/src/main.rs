//! `auth-client` entry-point: wires settings, the HTTP transport and the
//! session file into the command-line screens.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use client::config::ClientSettings;
use client::domain::SessionStore;
use client::domain::ports::{AuthTransport, FixtureAuthTransport};
use client::inbound::cli::{Cli, run};
use client::outbound::http::HttpAuthTransport;
use client::outbound::session_file::FileSessionPersistence;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let settings = ClientSettings::load_from_iter([OsString::from("auth-client")])
        .map_err(|err| eyre!("load client settings: {err}"))?;
    let session_file = settings.session_file();
    let transport = build_transport(&settings)?;
    let persistence = FileSessionPersistence::open(&session_file)
        .wrap_err_with(|| format!("open session file {session_file}"))?;
    let session = SessionStore::restore(Arc::new(persistence));

    let mut stdout = io::stdout().lock();
    let status = run(cli.command, transport, session, &mut stdout)
        .await
        .wrap_err("write to stdout")?;
    Ok(status.into())
}

/// Select the auth transport:
/// - `FixtureAuthTransport` when offline mode is configured.
/// - `HttpAuthTransport` against the configured API otherwise.
fn build_transport(settings: &ClientSettings) -> Result<Arc<dyn AuthTransport>> {
    if settings.is_offline() {
        info!(session_file = %settings.session_file(), "starting auth client offline");
        return Ok(Arc::new(FixtureAuthTransport));
    }
    let base_url = settings.api_base_url()?;
    let timeout = settings.request_timeout()?;
    info!(
        api_base_url = %base_url,
        session_file = %settings.session_file(),
        "starting auth client"
    );
    let transport =
        HttpAuthTransport::new(base_url, timeout).wrap_err("build HTTP auth transport")?;
    Ok(Arc::new(transport))
}
