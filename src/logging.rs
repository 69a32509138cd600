use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Compact logs on stderr, `info` unless `RUST_LOG` says otherwise.
pub fn init() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
