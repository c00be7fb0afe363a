//! Heckle CLI entrypoint: batch changeset commenting and changeset listing.

use std::fs;
use std::process::ExitCode;

use camino::Utf8PathBuf;
use heckle::osm::{ids_newest_first, list_all_changesets};
use heckle::{
    AccessToken, Authenticator, CredentialStore, FileQueueSink, HeckleConfig, HeckleError,
    HttpGateway, JobQueue, JsonFileStore, NullQueueSink, OperationMode, OsmGateway, Processor,
    QueueSink, QueueSource, RetryPolicy, StdinPrompt,
};
use ortho_config::OrthoConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::from(error.exit_code())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run() -> Result<(), HeckleError> {
    let config = load_config()?;
    match config.operation_mode() {
        OperationMode::ListChangesets(user) => run_listing(&config, user).await,
        OperationMode::CommentRun => run_comments(&config).await,
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`HeckleError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<HeckleConfig, HeckleError> {
    HeckleConfig::load().map_err(|error| HeckleError::Configuration {
        message: error.to_string(),
    })
}

/// Runs the comment batch: validate inputs first, authenticate, process.
///
/// Input validation happens before any network traffic so usage errors exit
/// immediately with their distinct codes.
async fn run_comments(config: &HeckleConfig) -> Result<(), HeckleError> {
    let comment = config.resolve_comment()?;
    let (mut queue, sink): (JobQueue, Box<dyn QueueSink>) = match config.queue_source()? {
        QueueSource::Inline(queue) => (queue, Box::new(NullQueueSink)),
        QueueSource::File(path) => (
            JobQueue::load(&path)?,
            Box::new(FileQueueSink::new(path)),
        ),
    };

    let gateway = authenticated_gateway(config).await?;
    let processor = Processor::new(&gateway)
        .with_policy(RetryPolicy::new(config.error_sleep()))
        .with_request_interval(config.request_interval());
    processor.process(&mut queue, &comment, sink.as_ref()).await?;
    Ok(())
}

/// Lists every changeset of a user and writes `<user>.json` in the working
/// directory, newest (by close time) first, ready for use as a queue file.
async fn run_listing(config: &HeckleConfig, user: u64) -> Result<(), HeckleError> {
    let gateway = authenticated_gateway(config).await?;
    let changesets = list_all_changesets(&gateway, user).await?;

    let ids = ids_newest_first(changesets);
    let path = Utf8PathBuf::from(format!("{user}.json"));
    let json = serde_json::to_string(&ids).map_err(|error| HeckleError::Io {
        message: error.to_string(),
    })?;
    fs::write(&path, json).map_err(|error| HeckleError::Io {
        message: format!("could not write {path}: {error}"),
    })?;

    info!("Saved {} changesets to: {path}", ids.len());
    Ok(())
}

/// Builds a gateway holding a valid bearer token, logging in when the store
/// has none, and records the authenticated user id.
async fn authenticated_gateway(config: &HeckleConfig) -> Result<HttpGateway, HeckleError> {
    let store = JsonFileStore::open_default()?;
    let mut credentials = store.load()?;

    let token = match &credentials.token {
        Some(stored) => AccessToken::new(stored)?,
        None => {
            let client_credentials = config.client_credentials()?;
            let prompt = StdinPrompt;
            let authenticator = Authenticator::new(
                config.instance().auth_base(),
                client_credentials,
                &prompt,
            )?;
            let issued = authenticator.login().await?;
            credentials.token = Some(issued.value().to_owned());
            store.save(&credentials)?;
            issued
        }
    };

    let gateway = HttpGateway::new(config.instance().api_base(), Some(token))?;
    let user = gateway.user_details().await?;
    credentials.uid = Some(user.id);
    store.save(&credentials)?;
    info!("Logged in as \"{}\" ({})", user.display_name, user.id);
    Ok(gateway)
}
