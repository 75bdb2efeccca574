// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Terminal dashboard for the Tor node collector service.
//!
//! Polls the collector's status API, renders counters, job histories and the
//! node table, and lets the operator force backend jobs and manage the weekly
//! email report.

mod actions;
mod app;
mod banner;
mod domain;
mod email;
mod error;
mod event;
mod http_client;
mod infrastructure;
mod nodes;
mod polling;
mod terminal;
#[cfg(test)]
mod test_utils;
mod ui;

use std::path::PathBuf;

use app::App;
use clap::Parser;
use color_eyre::Result;
use error::TuiError;
use event::EventHandler;
use infrastructure::{Settings, APP_NAME};
use terminal::TuiWrapper;

pub type TuiResult<OK> = std::result::Result<OK, TuiError>;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Base URL of the collector service, e.g. http://localhost:8000
    #[arg(short, long)]
    url: Option<String>,

    /// Additional configuration file (YAML or TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset, e.g. "debug" or "tornode_tui=trace"
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let mut config = Settings::new(args.config.as_deref())?;
    if let Some(url) = args.url {
        config = config.with_server_url(url);
    }
    if let Some(level) = args.log_level {
        config = config.with_log_level(level);
    }

    infrastructure::init_file_logger(APP_NAME, &config.logging.level)?;
    tracing::info!("Starting {APP_NAME} against {}", config.server.url);

    let stats_interval = config.polling.stats_interval();
    let mut events = EventHandler::new(config.ui.tick_rate());
    let mut app = App::new(config)?;
    let mut tui_wrapper = TuiWrapper::new()?;

    let (app_tx, mut app_rx) = tokio::sync::mpsc::unbounded_channel();
    app.set_event_tx(app_tx.clone());
    let poller = polling::spawn_stats_poller(app_tx, stats_interval);

    loop {
        tui_wrapper.draw(&app)?;

        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(event) => app.handle_event(event),
                    None => break,
                }
            }
            Some(app_event) = app_rx.recv() => app.handle_event(app_event),
        }

        if app.should_quit {
            tracing::info!("Stopping {APP_NAME}");
            break;
        }
    }

    poller.abort();
    app.shutdown();
    Ok(())
}
