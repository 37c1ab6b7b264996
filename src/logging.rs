// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use tracing::Level;
use tracing_subscriber::{
    filter::Targets,
    fmt::{
        self,
        format::{Format, Full},
        time::SystemTime,
    },
    prelude::*,
};

fn base_format() -> Format<Full, SystemTime> {
    fmt::format()
        .with_level(true)
        .with_ansi(false)
        .with_target(true)
}

fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Logs go to stderr so command output on stdout stays pipeable.
/// With `log_dir` set, a daily-rolling file gets everything at debug and above.
pub fn setup_logging(verbosity: u8, log_dir: Option<&str>) {
    let stderr_layer = fmt::layer()
        .event_format(base_format())
        .with_writer(std::io::stderr)
        .with_filter(
            Targets::new()
                .with_target("reqwest", Level::WARN)
                .with_default(level_for(verbosity)),
        );

    let subscriber = tracing_subscriber::registry().with(stderr_layer);

    match log_dir.filter(|d| !d.is_empty()) {
        Some(dir) => {
            let file_layer = fmt::layer()
                .event_format(base_format())
                .with_writer(tracing_appender::rolling::daily(dir, "finclip.log"))
                .with_filter(
                    Targets::new()
                        .with_target("reqwest", Level::INFO)
                        .with_default(Level::DEBUG),
                );
            subscriber.with(file_layer).init();
        }
        None => subscriber.init(),
    }
}
