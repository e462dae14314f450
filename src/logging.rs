use env_logger::{Builder, Env};

/// Initialize the process-wide logger. `RUST_LOG` takes precedence over the
/// `--debug` flag so operators can still raise the level per module.
pub fn init(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_level)).init();
}
