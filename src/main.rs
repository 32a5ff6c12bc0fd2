//! memdb shell
//!
//! Usage:
//!   memdb                      # interactive, reads stdin
//!   memdb --file script.sql    # runs every statement of the file
//!
//! Set `RUST_LOG=debug` to see parsed statements and scan counts.

use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::process::ExitCode;

use clap::Parser;
use log::{debug, info};

use memdb::Database;
use memdb::config::ShellConfig;
use memdb::printer::Printer;
use memdb::reader::StatementReader;

fn main() -> ExitCode {
    env_logger::init();

    let config = ShellConfig::parse();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &ShellConfig) -> memdb::Result<()> {
    let mut printer = Printer::new(io::stdout().lock(), io::stderr().lock());
    if !config.quiet {
        printer.print_help(env!("CARGO_PKG_NAME"))?;
    }

    match &config.input {
        Some(path) => {
            info!("reading statements from {}", path.display());
            let reader = StatementReader::new(BufReader::new(File::open(path)?));
            repl(reader, &config.prompt, &mut printer)
        }
        None => {
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            let reader = StatementReader::new(stdin.lock()).with_interactive(interactive);
            repl(reader, &config.prompt, &mut printer)
        }
    }
}

/// Executes statements until the input ends. A failing statement is reported
/// and the loop moves on to the next one.
fn repl<R, W, E>(
    mut reader: StatementReader<R>,
    prompt: &str,
    printer: &mut Printer<W, E>,
) -> memdb::Result<()>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let mut db = Database::new();

    loop {
        if reader.is_interactive() && reader.at_statement_start() {
            printer.print_prompt(prompt)?;
        }
        let Some(sql) = reader.next_statement()? else {
            break;
        };

        match db.execute(&sql) {
            Ok(outcome) => printer.print_outcome(&outcome)?,
            Err(e) => {
                debug!("statement failed ({:?}): {sql}", e.kind());
                printer.print_error(&e)?;
            }
        }
    }

    printer.flush()
}
