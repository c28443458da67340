//! Interactive session: one command per line, the screen is redrawn after
//! each one. Failed commands print a notice and leave the list as it was.

use std::io::{BufRead, Write};

use anyhow::{bail, Result};
use todolist_core::{Intent, SyncAdapter, TodoStore};
use tracing::debug;

use crate::reference;
use crate::render;

const HELP: &str = "\
commands:
  add TEXT | submit [TEXT]  set the input (if given) and press the Add/Update button
  input TEXT                replace the input text
  edit REF                  start editing a todo (copies its text into the input)
  cancel                    stop editing
  toggle REF                Complete / Undo a todo
  delete REF                delete a todo
  reload                    fetch the list again
  help                      show this help
  quit                      leave
REF is a position from the list or an id prefix.
";

enum Flow {
    Continue,
    Quit,
}

/// Load the list and run the session. A failed load is reported like any
/// other command error and the session starts with an empty list.
pub fn start<A: SyncAdapter>(
    store: &mut TodoStore<A>,
    input: impl BufRead,
    mut out: impl Write,
) -> Result<()> {
    if let Err(err) = store.dispatch(Intent::Load) {
        writeln!(out, "error: {:#}", anyhow::Error::new(err).context("loading todo list"))?;
    }
    run(store, input, out)
}

pub fn run<A: SyncAdapter>(
    store: &mut TodoStore<A>,
    input: impl BufRead,
    mut out: impl Write,
) -> Result<()> {
    write!(out, "{}", render::screen(store.state()))?;
    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match execute(store, line) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(err) => writeln!(out, "error: {err:#}")?,
        }
        if line == "help" {
            write!(out, "{HELP}")?;
        }
        write!(out, "{}", render::screen(store.state()))?;
        out.flush()?;
    }
    Ok(())
}

fn execute<A: SyncAdapter>(store: &mut TodoStore<A>, line: &str) -> Result<Flow> {
    let (command, arg) = match line.split_once(char::is_whitespace) {
        Some((command, arg)) => (command, arg.trim()),
        None => (line, ""),
    };
    debug!(command, arg, "shell command");

    match command {
        "add" | "submit" => {
            if !arg.is_empty() || command == "add" {
                store.dispatch(Intent::SetInput(arg.to_string()))?;
            }
            store.dispatch(Intent::Submit)?;
        }
        "input" => store.dispatch(Intent::SetInput(arg.to_string()))?,
        "edit" => {
            let id = reference::resolve(store.todos(), arg)?;
            store.dispatch(Intent::StartEdit(id))?;
        }
        "cancel" => store.dispatch(Intent::CancelEdit)?,
        "toggle" => {
            let id = reference::resolve(store.todos(), arg)?;
            store.dispatch(Intent::Toggle(id))?;
        }
        "delete" | "rm" => {
            let id = reference::resolve(store.todos(), arg)?;
            store.dispatch(Intent::Delete(id))?;
        }
        "reload" => store.dispatch(Intent::Load)?,
        "help" | "list" => {}
        "quit" | "exit" => return Ok(Flow::Quit),
        other => bail!("unknown command {other:?}, try `help`"),
    }
    Ok(Flow::Continue)
}
