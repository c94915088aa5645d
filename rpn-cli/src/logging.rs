//! Log output setup
//!
//! All logs go to stderr so they never mix with results on stdout. Each
//! `rpn::*` target can be filtered on its own through [`LogConfig`].

use crate::config::LogConfig;
use serde::Deserialize;
use std::io;
use tracing_subscriber::{
    Layer, Registry, filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Multi-line, coloured
    Pretty,
    /// One line per event
    Compact,
    /// One JSON object per event
    Json,
}

pub fn targets(log_config: &LogConfig) -> Targets {
    Targets::new()
        .with_default(log_config.global)
        .with_target("rpn::machine", log_config.level_for("rpn::machine"))
        .with_target("rpn::eval", log_config.level_for("rpn::eval"))
        .with_target("rpn::batch", log_config.level_for("rpn::batch"))
        .with_target("rpn::cli", log_config.level_for("rpn::cli"))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(log_config: &LogConfig, format: LogFormat) {
    let layer = create_format_layer(format, io::stderr).with_filter(targets(log_config));
    let _ = tracing_subscriber::registry().with(layer).try_init();
}

fn create_format_layer<W, F>(format: LogFormat, make_writer: F) -> impl Layer<Registry>
where
    W: io::Write + Send + Sync + 'static,
    F: Fn() -> W + Send + Sync + 'static,
{
    match format {
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .without_time()
            .with_writer(make_writer)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_timer(fmt::time::time())
            .with_writer(make_writer)
            .boxed(),
    }
}
