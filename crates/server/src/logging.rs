use tracing_subscriber::{EnvFilter, prelude::*};

/// Directive string for `RUST_LOG`-style levels: our crates at `level`,
/// everything else at warn.
pub fn filter_directives(level: &str) -> String {
    format!(
        "warn,server={level},tools={level},config={level}",
        level = level
    )
}

/// Logs go to stderr; stdout carries the MCP protocol.
pub fn init() -> anyhow::Result<()> {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = EnvFilter::try_new(filter_directives(&log_level))?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_filter(env_filter),
        )
        .try_init()?;
    Ok(())
}
