//! Shell completion generation

use clap::{Command, CommandFactory};
use clap_complete::{Generator, Shell, generate};
use std::io::Write;

use super::cli::Cli;

/// Write completions for `app` to `out`
pub fn write_completions<G: Generator>(generator: G, app: &mut Command, out: &mut dyn Write) {
    let name = app.get_name().to_string();
    generate(generator, app, name, out);
}

/// Print gridprobe completions for `shell` to stdout
pub fn print_completions(shell: Shell) {
    let mut app = Cli::command();
    write_completions(shell, &mut app, &mut std::io::stdout());
}
