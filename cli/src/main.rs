use std::env;
use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use todolist_core::{ClientConfig, Intent, SyncAdapter, TodoStore};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod reference;
mod render;
mod shell;

use cli::{Cli, Command};

fn init_tracing() {
    let filter = EnvFilter::try_from_env("TODOLIST_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let format = env::var("TODOLIST_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(io::stderr))
                .init();
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = ClientConfig::load(cli.global.config.as_deref()).context("loading configuration")?;
    cli.global.apply(&mut config);
    tracing::debug!(backend = ?config.backend, "starting");

    let mut store = TodoStore::new(config.adapter());
    run(&mut store, cli.command.unwrap_or(Command::List))
}

fn run<A: SyncAdapter>(store: &mut TodoStore<A>, command: Command) -> Result<()> {
    // The shell survives a failed first load; one-shot commands do not.
    if let Command::Shell = command {
        return shell::start(store, io::stdin().lock(), io::stdout().lock());
    }
    store.dispatch(Intent::Load).context("loading todo list")?;

    match command {
        Command::List | Command::Shell => {}
        Command::Add { text } => {
            store.dispatch(Intent::SetInput(text.join(" ")))?;
            store.dispatch(Intent::Submit).context("adding todo")?;
        }
        Command::Toggle { reference } => {
            let id = reference::resolve(store.todos(), &reference)?;
            store.dispatch(Intent::Toggle(id)).context("toggling todo")?;
        }
        Command::Edit { reference, text } => {
            let id = reference::resolve(store.todos(), &reference)?;
            store.dispatch(Intent::StartEdit(id))?;
            store.dispatch(Intent::SetInput(text.join(" ")))?;
            store.dispatch(Intent::Submit).context("updating todo")?;
        }
        Command::Delete { reference } => {
            let id = reference::resolve(store.todos(), &reference)?;
            store.dispatch(Intent::Delete(id)).context("deleting todo")?;
        }
    }
    print!("{}", render::list(store.state()));
    Ok(())
}
