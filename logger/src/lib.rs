//! Process-wide logging setup.
//!
//! Library crates in this workspace only talk to the [`log`] facade. Binaries
//! and tests pick a backend by calling one of the `setup*` functions below,
//! which install an `env_logger` instance.

use {env_logger::Env, std::io::Write};

/// Filter used by [`setup_with_default_filter`].
pub const DEFAULT_FILTER: &str = "dbft=info";

fn builder(env: Env<'_>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::from_env(env);
    builder.format(|buf, record| {
        writeln!(
            buf,
            "[{} {:<5} {}] {}",
            buf.timestamp_micros(),
            record.level(),
            record.target(),
            record.args()
        )
    });
    builder
}

/// Install a logger that uses `filter` unless `RUST_LOG` is set.
///
/// Only the first successful call in a process installs a logger; later calls
/// are no-ops, which keeps it safe to call from every test.
pub fn setup_with_default(filter: &str) {
    let _ = builder(Env::new().default_filter_or(filter)).try_init();
}

/// Install a logger that uses `filter`, overridable only through `_RUST_LOG`.
pub fn setup_with(filter: &str) {
    let _ = builder(Env::new().filter_or("_RUST_LOG", filter)).try_init();
}

/// Install a logger that only reports errors unless `RUST_LOG` says otherwise.
pub fn setup() {
    setup_with_default("error");
}

/// Install a logger using [`DEFAULT_FILTER`].
pub fn setup_with_default_filter() {
    setup_with_default(DEFAULT_FILTER);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_is_idempotent() {
        setup();
        setup();
        setup_with_default_filter();
        log::info!("logger installed");
    }
}
