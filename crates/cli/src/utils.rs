use tracing_subscriber::{EnvFilter, filter::LevelFilter, prelude::*};

/// Initializes a tracing subscriber writing to stderr.
///
/// The filter is read from `RUST_LOG` and defaults to `warn`.
pub fn subscriber() {
    tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init()
}

fn env_filter() -> EnvFilter {
    EnvFilter::builder().with_default_directive(LevelFilter::WARN.into()).from_env_lossy()
}

/// Enables colored output if the terminal supports it.
pub fn enable_paint() {
    let enable = yansi::Condition::os_support() && yansi::Condition::tty_and_color_live();
    yansi::whenever(yansi::Condition::cached(enable));
}
