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

use std::{path::Path, time::Duration};

use config::{
    builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File,
    FileFormat,
};
use serde::Deserialize;

pub const APP_NAME: &str = "tornode-tui";

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    /// Base URL of the collector service, without the `/api` suffix
    pub url: String,
}

/// All values in millis
#[derive(Debug, Deserialize, Clone)]
pub struct HttpSettings {
    /// Timeout for reads (`/api/stats`, `/api/nodes`)
    pub timeout: u64,
    /// Timeout for forced jobs, which run synchronously on the backend
    pub action_timeout: u64,
    /// Timeout for starting an OpenCTI import
    pub import_timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingSettings {
    pub stats_interval: u64,
    pub progress_interval: u64,
    pub progress_max_polls: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiSettings {
    pub tick_rate: u64,
    pub banner_ttl: u64,
    pub import_restore_delay: u64,
    pub table_build_delay: u64,
    pub page_size: usize,
    pub history_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub http: HttpSettings,
    pub polling: PollingSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

const DEFAULT_CONFIG: &str = r#"
server:
  url: http://localhost:8000

http:
  timeout: 10000
  action_timeout: 300000
  import_timeout: 10000

polling:
  stats_interval: 30000
  progress_interval: 30000
  progress_max_polls: 30

ui:
  tick_rate: 250
  banner_ttl: 5000
  import_restore_delay: 2000
  table_build_delay: 100
  page_size: 50
  history_limit: 20

logging:
  level: info
"#;

impl Settings {
    pub(crate) fn new(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Self::defaults_builder();

        // Add in user's config file
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(APP_NAME).join("config");
            builder = builder.add_source(
                File::with_name(&user_config.display().to_string()).required(false),
            );
        }

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        // Add in settings from the environment (with a prefix of TORNODE_TUI_)
        // E.g. `TORNODE_TUI_SERVER__URL=http://collector:8000 ./target/app`
        // would set the server url key
        let builder = builder.add_source(
            Environment::with_prefix("TORNODE_TUI")
                .prefix_separator("_")
                .separator("__"),
        );

        Self::load(builder)
    }

    /// Built-in defaults only. Ignores user files and the environment.
    #[cfg(test)]
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::load(Self::defaults_builder())
    }

    fn load(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let settings: Self = builder.build()?.try_deserialize()?;
        settings.validate()
    }

    /// Timer periods must be positive; a zero period would stop the event loop.
    fn validate(self) -> Result<Self, ConfigError> {
        let periods = [
            ("polling.stats_interval", self.polling.stats_interval),
            ("polling.progress_interval", self.polling.progress_interval),
            ("ui.tick_rate", self.ui.tick_rate),
        ];
        match periods.iter().find(|(_, millis)| *millis == 0) {
            Some((key, _)) => Err(ConfigError::Message(format!(
                "{key} must be greater than zero"
            ))),
            None => Ok(self),
        }
    }

    fn defaults_builder() -> ConfigBuilder<DefaultState> {
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Yaml))
    }

    pub fn with_server_url(mut self, url: impl Into<String>) -> Self {
        self.server.url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.level = level.into();
        self
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    pub fn action_timeout(&self) -> Duration {
        Duration::from_millis(self.action_timeout)
    }

    pub fn import_timeout(&self) -> Duration {
        Duration::from_millis(self.import_timeout)
    }
}

impl PollingSettings {
    pub fn stats_interval(&self) -> Duration {
        Duration::from_millis(self.stats_interval)
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval)
    }
}

impl UiSettings {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate)
    }

    pub fn banner_ttl(&self) -> Duration {
        Duration::from_millis(self.banner_ttl)
    }

    pub fn import_restore_delay(&self) -> Duration {
        Duration::from_millis(self.import_restore_delay)
    }

    pub fn table_build_delay(&self) -> Duration {
        Duration::from_millis(self.table_build_delay)
    }
}
