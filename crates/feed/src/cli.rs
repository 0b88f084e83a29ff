// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

const QUICKSTART_HELP: &str = "\
Get started:
  export ANDARIA_TOKEN=<jwt>
  andaria-feed list             Show the first page
  andaria-feed read <id>        Mark a notification read
  andaria-feed watch --alerts   Follow new notifications live";

#[derive(Parser, Debug)]
#[command(name = "andaria-feed")]
#[command(version, about = "Notification feed client for the Andaria tourism platform")]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    /// Config file (default: $XDG_CONFIG_HOME/andaria/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Bearer token (overrides ANDARIA_TOKEN and the config file)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// REST API base URL, e.g. https://api.example.com/api/v1
    #[arg(long, global = true)]
    pub api_base: Option<String>,

    /// WebSocket base URL, e.g. wss://api.example.com
    #[arg(long, global = true)]
    pub ws_base: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// List notifications, newest first
    List {
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Notifications per page (default: page_size from config)
        #[arg(long)]
        limit: Option<u32>,

        /// Only show unread notifications
        #[arg(long)]
        unread: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Show the unread counter
    Count,

    /// Mark a notification read
    Read {
        /// Notification id
        id: u64,
    },

    /// Mark every notification read
    ReadAll,

    /// Delete a notification
    Delete {
        /// Notification id
        id: u64,
    },

    /// Follow new notifications over the live channel until interrupted
    Watch {
        /// Ask to show a terminal alert for each new notification
        #[arg(long)]
        alerts: bool,
    },
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
