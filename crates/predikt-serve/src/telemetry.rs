use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `default_directive` (e.g. `"info"` or
/// `"predikt_flight=debug,tower_http=info"`). Calling it twice is harmless;
/// the second call keeps the first subscriber.
pub fn init_tracing(default_directive: &str, json_output: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let result = if json_output {
        let fmt_layer = fmt::layer()
            .json()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_thread_names(true);
        Registry::default().with(env_filter).with(fmt_layer).try_init()
    } else {
        let fmt_layer = fmt::layer().with_target(true).with_thread_names(true);
        Registry::default().with(env_filter).with(fmt_layer).try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
