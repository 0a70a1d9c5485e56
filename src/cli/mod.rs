//! Terminal front end: one-shot commands and an interactive interpreter over the
//! same [`Shell`].

pub mod args;
pub mod command;
pub mod outputformatter;
pub mod shell;

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::config::ClientConfig;

pub use args::CliArgs;
pub use command::Command;
pub use outputformatter::print_value;
pub use shell::{Reply, Shell};

/// Entry point used by the `bookpal` binary. Returns the process exit code.
pub fn run(argv: Vec<String>) -> Result<i32> {
    let mut argv = argv;
    let program = if argv.is_empty() { "bookpal".to_string() } else { argv.remove(0) };
    let args = match CliArgs::parse(&argv) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{}\n\n{}", e, args::usage(&program));
            return Ok(2);
        }
    };
    if args.help {
        println!("{}", args::usage(&program));
        return Ok(0);
    }

    let config = args.apply(ClientConfig::from_env());
    tracing::debug!(target: "bookpal::cli", "base_url={} timeout_ms={} session={:?}", config.base_url, config.timeout_ms(), config.session_file);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build tokio runtime")?;
    let shell = Shell::open(&config)?;

    if !args.interactive() {
        let cmd = match Command::parse(&args.command) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("error: {}", e);
                return Ok(2);
            }
        };
        return Ok(match rt.block_on(shell.execute(cmd)) {
            Ok(reply) => { show(&reply, shell.json_output()); 0 }
            Err(e) => { eprintln!("error: {}", e); 1 }
        });
    }

    run_repl(&rt, &shell, &config)?;
    Ok(0)
}

fn show(reply: &Reply, json_output: bool) {
    match reply {
        Reply::Value(v) => print_value(v, json_output),
        Reply::Text(t) => println!("{}", t),
        Reply::Quit => {}
    }
}

fn run_repl(rt: &tokio::runtime::Runtime, shell: &Shell, config: &ClientConfig) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    println!("bookpal interpreter against {}. Type 'help' for commands.", config.base_url);
    loop {
        match rl.readline("bookpal> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() { continue; }
                let _ = rl.add_history_entry(trimmed);
                let cmd = match Command::parse_line(trimmed) {
                    Ok(c) => c,
                    Err(e) => { eprintln!("error: {}", e); continue; }
                };
                match rt.block_on(shell.execute(cmd)) {
                    Ok(Reply::Quit) => break,
                    Ok(reply) => show(&reply, shell.json_output()),
                    Err(e) => eprintln!("error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C detected. Type 'quit' to exit.");
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("readline error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
