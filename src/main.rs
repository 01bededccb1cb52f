//! Pyrite compiler CLI entry point

fn main() {
    // Diagnostics go to stdout; logs stay on stderr and default to warnings only
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    pyrite::cli::run();
}
