use once_cell::sync::OnceCell;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static INITIALIZED: OnceCell<bool> = OnceCell::new();

/// Installs a compact stderr subscriber when `RUST_LOG` is set and
/// non-empty. Later calls are no-ops. Returns whether logging is on.
pub fn init_logging() -> bool {
    *INITIALIZED.get_or_init(|| {
        let rust_log = match std::env::var("RUST_LOG") {
            Ok(value) if !value.is_empty() => value,
            _ => return false,
        };

        let env_filter = match EnvFilter::try_new(&rust_log) {
            Ok(filter) => filter,
            Err(err) => {
                eprintln!("Ignoring invalid RUST_LOG '{}': {}", rust_log, err);
                return false;
            }
        };

        let layer = tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .without_time()
            .with_filter(env_filter);

        tracing_subscriber::registry().with(layer).try_init().is_ok()
    })
}
