use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use todolist_core::{Backend, ClientConfig};

#[derive(Parser, Debug)]
#[command(name = "todo", version, about = "A to-do list backed by a REST server or a local file")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    /// Config file (default: <config dir>/todolist/config.toml if present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Where the list lives
    #[arg(long, global = true, value_parser = parse_backend)]
    pub backend: Option<Backend>,

    /// REST server base URL
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Storage file for the local backend
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Per-request timeout in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Attempts per retry-safe request, including the first
    #[arg(long, global = true, value_name = "N")]
    pub retries: Option<u32>,
}

impl GlobalArgs {
    /// Command-line flags win over file and environment settings.
    pub fn apply(&self, config: &mut ClientConfig) {
        if let Some(backend) = self.backend {
            config.backend = backend;
        }
        if let Some(base_url) = &self.base_url {
            config.remote.base_url = base_url.clone();
        }
        if let Some(store) = &self.store {
            config.local.path = Some(store.clone());
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.remote.timeout_ms = timeout_ms;
        }
        if let Some(retries) = self.retries {
            config.retry.max_attempts = retries;
        }
    }
}

fn parse_backend(s: &str) -> Result<Backend, String> {
    s.parse().map_err(|e: todolist_core::ConfigError| e.to_string())
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the list (default)
    List,

    /// Add a todo
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Mark a todo complete, or undo that
    Toggle {
        /// Position in the list (1-based) or id prefix
        #[arg(value_name = "REF")]
        reference: String,
    },

    /// Replace the text of a todo
    Edit {
        #[arg(value_name = "REF")]
        reference: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Delete a todo
    Delete {
        #[arg(value_name = "REF")]
        reference: String,
    },

    /// Interactive session
    Shell,
}
