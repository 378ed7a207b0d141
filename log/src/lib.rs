use std::{fmt::Display, str::FromStr};

use anyhow::{Error, Result};
use backtrace::Backtrace;
use tracing::{debug, error, info, level_filters::LevelFilter, trace, warn};

pub fn init(display_level: &bool, level_filter: &str) -> Result<()> {
    let level_filter = LevelFilter::from_str(level_filter)
        .map_err(|err| Error::msg(format!("Invalid log level filter '{level_filter}': {err}")))?;

    tracing_subscriber::fmt()
        .with_level(*display_level)
        .with_max_level(level_filter)
        .try_init()
        .map_err(|err| Error::msg(err.to_string()))
}

pub fn trace<T: Display>(prefix: Option<&str>, msg: T) {
    match prefix {
        Some(prefix) => trace!("{prefix} {msg}"),
        None => trace!("🔎 {msg}"),
    }
}

pub fn debug<T: Display>(prefix: Option<&str>, msg: T) {
    match prefix {
        Some(prefix) => debug!("{prefix} {msg}"),
        None => debug!("🐞 {msg}"),
    };
}

pub fn info<T: Display>(prefix: Option<&str>, msg: T) {
    match prefix {
        Some(prefix) => info!("{prefix} {msg}"),
        None => info!("📢 {msg}"),
    };
}

pub fn warn<T: Display>(prefix: Option<&str>, msg: T) {
    match prefix {
        Some(prefix) => warn!("{prefix} {msg}"),
        None => warn!("⚠️ {msg}"),
    };
}

/// Reports usage of an input shape that is still accepted but will go away.
pub fn deprecated<T: Display>(msg: T) {
    warn!("🕰️ [deprecated] {msg}");
}

pub fn error<T: Display>(prefix: Option<&str>, msg: T) {
    let show_backtrace = matches!(std::env::var("RUST_BACKTRACE").as_deref(), Ok("1"));
    match (show_backtrace, prefix) {
        (true, Some(prefix)) => error!("{prefix} {msg}\n{:?}", Backtrace::new()),
        (true, None) => error!("🚨 {msg}\n{:?}", Backtrace::new()),
        (false, Some(prefix)) => error!("{prefix} {msg}"),
        (false, None) => error!("🚨 {msg}"),
    };
}

/// Logs the statement about to be sent to the store together with its
/// bound parameters.
pub fn sql<S: Display, P: Display>(sql: S, params: &[P]) {
    if params.is_empty() {
        trace!("🗄️ {sql}");
    } else {
        let params = params
            .iter()
            .map(|param| param.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        trace!("🗄️ {sql} [{params}]");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_rejects_unknown_level() {
        assert!(init(&true, "chatty").is_err());
    }
}
