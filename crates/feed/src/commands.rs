// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command implementations for the `andaria-feed` binary.

use std::io::Write;
use std::sync::Arc;

use andaria_core::NotificationRecord;
use serde::Serialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::alert::{request_alert_permission, AlertSink, NoAlerts, TerminalAlerts};
use crate::api::HttpNotificationsApi;
use crate::channel::{ChannelEvent, ChannelManager};
use crate::cli::{Cli, Command, OutputFormat};
use crate::config::{default_config_path, Config, TOKEN_ENV};
use crate::display::{format_record_detail, format_record_line, format_unread_summary};
use crate::error::{Error, Result};
use crate::session::Session;
use crate::store::FeedStore;
use crate::transport::TransportError;

/// Everything a command needs: resolved config, session and feed.
pub struct Context {
    pub config: Config,
    pub session: Session,
    pub store: FeedStore,
}

impl Context {
    /// Build a context for `config`, signed in with `token`.
    pub fn new(config: Config, token: impl Into<String>) -> Self {
        let session = Session::with_token(token);
        let api = HttpNotificationsApi::new(config.api_base.clone());
        let store = FeedStore::new(Arc::new(api), Arc::new(session.clone()));
        Context {
            config,
            session,
            store,
        }
    }

    /// Resolve config and token from the command line, environment and file.
    pub fn from_cli(cli: &Cli, env_token: Option<String>) -> Result<Self> {
        let mut config = match cli.config.clone().or_else(default_config_path) {
            Some(path) => {
                debug!("config file: {}", path.display());
                Config::load_or_default(&path)?
            }
            None => Config::default(),
        };
        if let Some(ref api_base) = cli.api_base {
            config.api_base = api_base.clone();
        }
        if let Some(ref ws_base) = cli.ws_base {
            config.ws_base = ws_base.clone();
        }
        config.validate()?;

        let token = config
            .resolve_token(cli.token.clone(), env_token)
            .ok_or(Error::MissingToken)?;
        Ok(Self::new(config, token))
    }
}

/// JSON output structure for the list command.
#[derive(Serialize)]
struct ListOutputJson<'a> {
    notifications: Vec<&'a NotificationRecord>,
    unread: u64,
    page: u32,
}

/// Run the command line.
pub async fn run(cli: Cli) -> Result<()> {
    let ctx = Context::from_cli(&cli, std::env::var(TOKEN_ENV).ok())?;
    let mut stdout = std::io::stdout();
    execute(&ctx, cli.command, &mut stdout).await
}

/// Execute one command, writing its output to `out`.
pub async fn execute(ctx: &Context, command: Command, out: &mut impl Write) -> Result<()> {
    match command {
        Command::List {
            page,
            limit,
            unread,
            output,
        } => list(ctx, page, limit, unread, output, out).await,
        Command::Count => {
            ctx.store.refresh_unread_count().await?;
            writeln!(out, "{}", ctx.store.unread_count())?;
            Ok(())
        }
        Command::Read { id } => {
            ctx.store.mark_read(id).await?;
            writeln!(out, "Marked {} read", id)?;
            Ok(())
        }
        Command::ReadAll => {
            ctx.store.mark_all_read().await?;
            writeln!(out, "Marked all notifications read")?;
            Ok(())
        }
        Command::Delete { id } => {
            ctx.store.remove(id).await?;
            writeln!(out, "Deleted {}", id)?;
            Ok(())
        }
        Command::Watch { alerts } => watch(ctx, alerts, out).await,
    }
}

async fn list(
    ctx: &Context,
    page: u32,
    limit: Option<u32>,
    unread_only: bool,
    output: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let limit = limit.unwrap_or(ctx.config.page_size);
    ctx.store.fetch_page(page, limit).await?;
    let state = ctx.store.snapshot();

    let records: Vec<&NotificationRecord> = if unread_only {
        state.unread()
    } else {
        state.records().iter().collect()
    };

    match output {
        OutputFormat::Text => {
            if records.is_empty() {
                writeln!(out, "No notifications")?;
            }
            for record in &records {
                writeln!(out, "{}", format_record_detail(record))?;
            }
            writeln!(out, "{}", format_unread_summary(&state))?;
        }
        OutputFormat::Json => {
            let json = ListOutputJson {
                notifications: records,
                unread: state.unread_count(),
                page,
            };
            let text = serde_json::to_string_pretty(&json).map_err(std::io::Error::from)?;
            writeln!(out, "{}", text)?;
        }
    }
    Ok(())
}

async fn watch(ctx: &Context, want_alerts: bool, out: &mut impl Write) -> Result<()> {
    let alerts: Arc<dyn AlertSink> = if want_alerts {
        let terminal = TerminalAlerts::new();
        if let Some(permission) = request_alert_permission(&terminal) {
            info!("terminal alerts: {}", permission);
        }
        Arc::new(terminal)
    } else {
        Arc::new(NoAlerts)
    };

    if let Err(e) = ctx.store.fetch_page(1, ctx.config.page_size).await {
        warn!("starting without the first page: {}", e);
    }
    let state = ctx.store.snapshot();
    for record in state.recent().iter().rev() {
        writeln!(out, "{}", format_record_line(record))?;
    }
    writeln!(out, "{}", format_unread_summary(&state))?;

    let channel = ChannelManager::new(
        ctx.config.channel(),
        ctx.store.clone(),
        Arc::new(ctx.session.clone()),
        alerts,
    );
    let mut events = channel.subscribe();
    channel.connect();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let event = tokio::select! {
            _ = &mut ctrl_c => {
                channel.disconnect();
                return Ok(());
            }
            event = events.recv() => event,
        };

        match event {
            Ok(ChannelEvent::Delivered { id }) => {
                if let Some(record) = ctx.store.snapshot().get(id) {
                    writeln!(out, "{}", format_record_line(record))?;
                    out.flush()?;
                }
            }
            Ok(ChannelEvent::GaveUp { attempts }) => {
                return Err(Error::Transport(TransportError::ConnectionFailed(format!(
                    "gave up after {} reconnect attempts",
                    attempts
                ))));
            }
            Ok(ChannelEvent::SessionEnded) => return Err(Error::MissingToken),
            Ok(event) => debug!("channel event: {:?}", event),
            Err(RecvError::Lagged(skipped)) => warn!("missed {} channel events", skipped),
            Err(RecvError::Closed) => return Ok(()),
        }
    }
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
