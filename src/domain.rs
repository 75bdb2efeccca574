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

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Aggregate node counters of the last successful scrape.
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeStats {
    #[serde(default)]
    pub total_nodes: Option<u64>,
    #[serde(default)]
    pub exit_nodes: Option<u64>,
    #[serde(default)]
    pub added_nodes: Option<u64>,
    #[serde(default)]
    pub removed_nodes: Option<u64>,
}

impl NodeStats {
    pub fn total(&self) -> u64 {
        self.total_nodes.unwrap_or(0)
    }

    pub fn exit(&self) -> u64 {
        self.exit_nodes.unwrap_or(0)
    }

    pub fn added(&self) -> u64 {
        self.added_nodes.unwrap_or(0)
    }

    pub fn removed(&self) -> u64 {
        self.removed_nodes.unwrap_or(0)
    }
}

/// The `/api/stats` payload. Replaces the previous snapshot wholesale.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct StatsSnapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub node_stats: NodeStats,
    #[serde(default, deserialize_with = "null_as_default")]
    pub scrape_history: Vec<HistoryItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub github_history: Vec<HistoryItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub opencti_history: Vec<HistoryItem>,
    #[serde(default)]
    pub config: Option<ConfigStatus>,
}

impl StatsSnapshot {
    pub fn history(&self, kind: HistoryKind) -> &[HistoryItem] {
        match kind {
            HistoryKind::Scrape => &self.scrape_history,
            HistoryKind::Github => &self.github_history,
            HistoryKind::Opencti => &self.opencti_history,
        }
    }

    /// Timestamp of the newest scrape run, shown as "Last update".
    pub fn last_update(&self) -> Option<String> {
        self.scrape_history
            .first()
            .and_then(|item| item.timestamp.as_deref())
            .map(format_timestamp)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HistoryKind {
    Scrape,
    Github,
    Opencti,
}

impl HistoryKind {
    pub fn title(&self) -> &'static str {
        match self {
            HistoryKind::Scrape => "Scrape History",
            HistoryKind::Github => "GitHub Upload History",
            HistoryKind::Opencti => "OpenCTI Import History",
        }
    }
}

/// One past run of a backend job.
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,
    #[serde(default)]
    pub forced: Option<bool>,
    #[serde(default)]
    pub nodes_total: Option<u64>,
    #[serde(default)]
    pub nodes_exit: Option<u64>,
    #[serde(default)]
    pub nodes_added: Option<u64>,
    #[serde(default)]
    pub nodes_removed: Option<u64>,
    #[serde(default)]
    pub imported: Option<u64>,
}

impl HistoryItem {
    pub fn status(&self) -> &str {
        self.status.as_deref().unwrap_or("unknown")
    }

    pub fn is_success(&self) -> bool {
        self.status() == "success"
    }

    pub fn is_forced(&self) -> bool {
        self.forced.unwrap_or(false)
            || self
                .message
                .as_deref()
                .is_some_and(|message| message.contains("[FORCED]"))
    }

    /// Identity of a run, used to notice that a newer run has been recorded.
    pub fn key(&self) -> (Option<&str>, Option<&str>) {
        (self.timestamp.as_deref(), self.message.as_deref())
    }
}

/// The `config` object of the stats payload.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct ConfigStatus {
    #[serde(default)]
    pub scrape_enabled: bool,
    #[serde(default)]
    pub scrape_frequency_hours: Option<u64>,
    #[serde(default)]
    pub github_upload_enabled: bool,
    #[serde(default)]
    pub github_upload_frequency_hours: Option<u64>,
    #[serde(default)]
    pub opencti_upload_enabled: bool,
    #[serde(default)]
    pub opencti_upload_frequency_hours: Option<u64>,
    #[serde(default)]
    pub email_enabled: bool,
    #[serde(default)]
    pub email_settings: Option<EmailSettings>,
    #[serde(default)]
    pub email_config: Option<EmailConfig>,
}

impl ConfigStatus {
    pub fn scrape_frequency(&self) -> u64 {
        non_zero_or(self.scrape_frequency_hours, 1)
    }

    pub fn github_frequency(&self) -> u64 {
        non_zero_or(self.github_upload_frequency_hours, 1)
    }

    pub fn opencti_frequency(&self) -> u64 {
        non_zero_or(self.opencti_upload_frequency_hours, 24)
    }
}

fn non_zero_or(value: Option<u64>, default: u64) -> u64 {
    value.filter(|v| *v > 0).unwrap_or(default)
}

/// SMTP settings as reported by the backend. The password is never sent.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct EmailConfig {
    #[serde(default, deserialize_with = "lenient_string")]
    pub smtp_server: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub smtp_port: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub from_email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub to_email: Option<String>,
}

pub const NOT_CONFIGURED: &str = "(not configured)";

impl EmailConfig {
    /// Rows of the email configuration panel.
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let password = if configured(&self.username).is_some() {
            "(configured)"
        } else {
            NOT_CONFIGURED
        };
        vec![
            ("SMTP server", display_or_unset(&self.smtp_server)),
            ("SMTP port", display_or_unset(&self.smtp_port)),
            ("Username", display_or_unset(&self.username)),
            ("Password", password.to_string()),
            ("From", display_or_unset(&self.from_email)),
            ("To", display_or_unset(&self.to_email)),
        ]
    }
}

fn configured(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn display_or_unset(value: &Option<String>) -> String {
    configured(value).unwrap_or(NOT_CONFIGURED).to_string()
}

/// Email notification preferences, camelCase on the wire.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailSettings {
    pub enabled: bool,
    pub include_node_stats: bool,
    pub include_scrape_history: bool,
    pub include_github_history: bool,
    pub include_opencti_history: bool,
    pub include_errors: bool,
    pub include_system_health: bool,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            include_node_stats: true,
            include_scrape_history: true,
            include_github_history: false,
            include_opencti_history: false,
            include_errors: true,
            include_system_health: false,
        }
    }
}

#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TestEmailKind {
    Simple,
    Summary,
}

#[derive(Serialize, Debug)]
pub struct TestEmailRequest {
    #[serde(rename = "type")]
    pub kind: TestEmailKind,
}

/// A row of the `/api/nodes` listing. Values may be strings, numbers or null.
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeRecord {
    #[serde(rename = "IP", default, deserialize_with = "lenient_string")]
    pub ip: Option<String>,
    #[serde(rename = "IsExit", default, deserialize_with = "lenient_string")]
    pub is_exit: Option<String>,
    #[serde(rename = "Name", default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(rename = "Flags", default, deserialize_with = "lenient_string")]
    pub flags: Option<String>,
    #[serde(rename = "Uptime", default, deserialize_with = "lenient_string")]
    pub uptime: Option<String>,
    #[serde(rename = "Version", default, deserialize_with = "lenient_string")]
    pub version: Option<String>,
    #[serde(rename = "CollectionDate", default, deserialize_with = "lenient_string")]
    pub collection_date: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Exit,
    Relay,
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Exit => "Exit",
            NodeKind::Relay => "Relay",
        }
    }
}

impl NodeRecord {
    pub fn kind(&self) -> NodeKind {
        match self.is_exit.as_deref() {
            Some("ExitNode") => NodeKind::Exit,
            _ => NodeKind::Relay,
        }
    }
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct NodesResponse {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<NodeRecord>,
}

/// Body of every POST action endpoint. Extra fields are ignored.
#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,
    #[serde(default)]
    pub estimated_time_minutes: Option<serde_json::Number>,
}

impl ActionResponse {
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or_default()
    }

    /// The completion estimate, when the backend sent a non-zero one.
    pub fn estimate(&self) -> Option<&serde_json::Number> {
        self.estimated_time_minutes
            .as_ref()
            .filter(|n| n.as_f64().is_some_and(|v| v != 0.0))
    }
}

/// Error body of a failed request. Anything unparseable reads as empty.
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorBody {
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,
}

impl ErrorBody {
    pub fn parse(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default)]
pub struct DashboardData {
    pub snapshot: Option<StatsSnapshot>,
    pub last_error: Option<String>,
}

impl DashboardData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(mut self, snapshot: StatsSnapshot) -> Self {
        self.snapshot = Some(snapshot);
        self.last_error = None;
        self
    }

    pub fn with_error(mut self, error: String) -> Self {
        self.last_error = Some(error);
        self
    }

    pub fn node_stats(&self) -> NodeStats {
        self.snapshot
            .as_ref()
            .map(|s| s.node_stats.clone())
            .unwrap_or_default()
    }

    pub fn config(&self) -> Option<&ConfigStatus> {
        self.snapshot.as_ref().and_then(|s| s.config.as_ref())
    }

    pub fn is_backend_up(&self) -> bool {
        self.last_error.is_none() && self.snapshot.is_some()
    }
}

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders a backend timestamp in local time, or verbatim when unrecognised.
pub fn format_timestamp(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format(DISPLAY_FORMAT).to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return dt.with_timezone(&Local).format(DISPLAY_FORMAT).to_string();
    }
    // naive timestamps are already in the backend's local time
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return naive.format(DISPLAY_FORMAT).to_string();
        }
    }
    raw.to_string()
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
