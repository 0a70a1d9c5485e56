use tracing_subscriber::{fmt, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so table/JSON output on stdout stays clean
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))?;
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let code = bookpal::cli::run(std::env::args().collect())?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
