//! Micropost feed CLI
//!
//! Terminal client for the micropost timeline. It authenticates with the
//! token from the environment and keeps the feed in sync:
//! - Loading the latest page on start
//! - Refreshing and paging older items on command
//! - Posting, which resyncs the head of the feed

mod console;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use feed_sync::adapters::{MicropostApiClient, TokenSession};
use feed_sync::{AppError, Config, FeedSyncService, FetchErrorHandler, MicropostService};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

use console::{Command, ConsoleNavigator};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging to stderr (stdout is used for the feed)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting micropost feed");

    let config = Config::from_env().context("Failed to load configuration")?;

    let session = Arc::new(TokenSession::new(config.auth_token.clone()));
    let client = Arc::new(MicropostApiClient::new(
        &config.api_url,
        session.clone(),
        config.page_size,
    ));

    let feed = match FeedSyncService::launch(
        client.clone(),
        session.as_ref(),
        &ConsoleNavigator,
        config.engine(),
    ) {
        Ok(feed) => feed,
        Err(AppError::Unauthenticated) => bail!("Not signed in"),
        Err(e) => return Err(e).context("Failed to start feed"),
    };

    let composer = MicropostService::new(client.clone(), feed.clone());
    let errors = FetchErrorHandler::new(session.clone());
    let mut changes = feed.subscribe();
    let mut failures = feed.failures();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", console::help_text());
    print!("{}", console::render(&feed.view()));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                match Command::parse(&line) {
                    Ok(Command::Refresh) => feed.refresh()?,
                    Ok(Command::More) => feed.scrolled_to_bottom()?,
                    Ok(Command::Post(text)) => match composer.post(&text).await {
                        Ok(post) => println!("Posted #{}", post.id),
                        Err(AppError::Fetch(e)) => {
                            if let Some(message) = errors.handle(&e) {
                                println!("! {}", message);
                            }
                        }
                        Err(e) => println!("! {}", e),
                    },
                    Ok(Command::Help) => println!("{}", console::help_text()),
                    Ok(Command::Quit) => break,
                    Err(message) if message.is_empty() => {}
                    Err(message) => println!("{}", message),
                }
            }
            Some(failure) = failures.recv() => {
                tracing::debug!(direction = %failure.direction, "Fetch failed: {}", failure.error);
                if let Some(message) = errors.handle(&failure.error) {
                    println!("! {}", message);
                }
            }
            change = changes.recv() => match change {
                Ok(view) => print!("{}", console::render(&view)),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Renderer fell behind, redrawing");
                    print!("{}", console::render(&feed.view()));
                }
                Err(RecvError::Closed) => break,
            },
        }
    }

    feed.shutdown().ok();
    tracing::info!("Bye");

    Ok(())
}
