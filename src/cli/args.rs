use std::path::PathBuf;
use std::time::Duration;

use crate::config::ClientConfig;

/// Flags accepted before the command words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliArgs {
    pub base_url: Option<String>,
    pub session: Option<String>,
    pub timeout_ms: Option<u64>,
    pub json_output: bool,
    pub repl: bool,
    pub help: bool,
    pub command: Vec<String>,
}

pub fn usage(program: &str) -> String {
    format!(
        "Usage:\n  {program} [--base-url URL] [--session FILE|memory] [--timeout-ms N] [--json-output] <command...>\n  {program} [flags] --repl\n\nFlags:\n  --base-url <url>      backend base URL (env BOOKPAL_BASE_URL, default {base})\n  --session <file>      session file, or 'memory' for none (env BOOKPAL_SESSION_FILE)\n  --timeout-ms <n>      per-call deadline in milliseconds (env BOOKPAL_TIMEOUT_MS)\n  --json-output         print raw JSON instead of tables (env BOOKPAL_OUTPUT=json)\n  --repl                start the interactive interpreter (default when no command is given)\n  -h, --help            show this help\n\n{cmds}",
        program = program,
        base = crate::config::DEFAULT_BASE_URL,
        cmds = super::command::COMMAND_HELP,
    )
}

impl CliArgs {
    /// Flags are only recognised before the first command word; everything after it
    /// belongs to the command (so `call x --json '{..}'` is left intact).
    pub fn parse(args: &[String]) -> Result<CliArgs, String> {
        let mut out = CliArgs::default();
        let mut i = 0;
        while i < args.len() {
            let a = args[i].as_str();
            match a {
                "--base-url" | "--session" | "--timeout-ms" => {
                    let v = args.get(i + 1).ok_or_else(|| format!("{} requires a value", a))?.clone();
                    match a {
                        "--base-url" => out.base_url = Some(v),
                        "--session" => out.session = Some(v),
                        _ => {
                            let ms = v.parse::<u64>().ok().filter(|ms| *ms > 0)
                                .ok_or_else(|| format!("--timeout-ms expects a positive integer, got '{}'", v))?;
                            out.timeout_ms = Some(ms);
                        }
                    }
                    i += 2;
                }
                "--json-output" => { out.json_output = true; i += 1; }
                "--repl" => { out.repl = true; i += 1; }
                "-h" | "--help" => { out.help = true; i += 1; }
                flag if flag.starts_with("--") => return Err(format!("unrecognized flag: {}", flag)),
                _ => {
                    out.command = args[i..].to_vec();
                    break;
                }
            }
        }
        Ok(out)
    }

    /// Apply the flags on top of an environment-derived config.
    pub fn apply(&self, mut cfg: ClientConfig) -> ClientConfig {
        if let Some(b) = &self.base_url {
            cfg.base_url = b.clone();
        }
        if let Some(s) = &self.session {
            cfg.session_file = if s.eq_ignore_ascii_case("memory") { None } else { Some(PathBuf::from(s)) };
        }
        if let Some(ms) = self.timeout_ms {
            cfg.timeout = Duration::from_millis(ms);
        }
        if self.json_output {
            cfg.json_output = true;
        }
        cfg
    }

    pub fn interactive(&self) -> bool { self.repl || self.command.is_empty() }
}
