//! Tracing setup.
//!
//! `RUST_LOG` controls the filter. `LOG_FORMAT=json` switches to structured
//! JSON lines; anything else gives the human-readable format.

use tracing_subscriber::EnvFilter;

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stenoclass_server=debug,tower_http=info,sqlx=warn"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => builder.json().init(),
        _ => builder.init(),
    }
}
