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

//! The six key-bound buttons that trigger one-shot backend requests.

use std::{
    collections::HashMap,
    time::{Duration, Instant},
};

use crate::{
    app::Views,
    banner::Tone,
    domain::{ActionResponse, EmailSettings, TestEmailKind},
    http_client::HttpClient,
    infrastructure::Settings,
    TuiResult,
};

const RATE_LIMIT_MARKER: &str = "RATE_LIMITED";
const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    ForceScrape,
    ForceGithubUpload,
    ForceOpenctiImport,
    SaveEmailSettings,
    TestEmail,
    TestSummaryEmail,
}

impl Action {
    pub fn label(&self) -> &'static str {
        match self {
            Action::ForceScrape => "Force Scrape",
            Action::ForceGithubUpload => "Force GitHub Upload",
            Action::ForceOpenctiImport => "Force OpenCTI Import",
            Action::SaveEmailSettings => "Save Settings",
            Action::TestEmail => "Send Test Email",
            Action::TestSummaryEmail => "Send Test Summary",
        }
    }

    pub fn busy_label(&self) -> &'static str {
        match self {
            Action::ForceScrape => "Scraping...",
            Action::ForceGithubUpload => "Uploading...",
            Action::ForceOpenctiImport => "Starting Import...",
            Action::SaveEmailSettings => "Saving...",
            Action::TestEmail | Action::TestSummaryEmail => "Sending...",
        }
    }

    pub fn key_hint(&self) -> &'static str {
        match self {
            Action::ForceScrape | Action::ForceGithubUpload | Action::ForceOpenctiImport => {
                "f"
            }
            Action::SaveEmailSettings => "w",
            Action::TestEmail => "t",
            Action::TestSummaryEmail => "T",
        }
    }

    /// The view whose content area receives this action's banners.
    pub fn view(&self) -> Views {
        match self {
            Action::ForceScrape => Views::Scrape,
            Action::ForceGithubUpload => Views::Github,
            Action::ForceOpenctiImport => Views::Opencti,
            Action::SaveEmailSettings | Action::TestEmail | Action::TestSummaryEmail => {
                Views::Email
            }
        }
    }

    pub fn refreshes_stats(&self) -> bool {
        !matches!(self, Action::TestEmail | Action::TestSummaryEmail)
    }

    pub fn reloads_nodes(&self) -> bool {
        matches!(self, Action::ForceScrape)
    }

    pub fn starts_progress_poll(&self) -> bool {
        matches!(self, Action::ForceOpenctiImport)
    }

    /// How long the button stays disabled after the request completes.
    pub fn restore_delay(&self, config: &Settings) -> Option<Duration> {
        match self {
            Action::ForceOpenctiImport => Some(config.ui.import_restore_delay()),
            _ => None,
        }
    }

    pub async fn perform(
        self,
        client: &HttpClient,
        email: EmailSettings,
    ) -> TuiResult<ActionResponse> {
        match self {
            Action::ForceScrape => client.force_scrape().await,
            Action::ForceGithubUpload => client.force_upload_github().await,
            Action::ForceOpenctiImport => client.force_upload_opencti().await,
            Action::SaveEmailSettings => client.save_email_settings(&email).await,
            Action::TestEmail => client.send_test_email(TestEmailKind::Simple).await,
            Action::TestSummaryEmail => {
                client.send_test_email(TestEmailKind::Summary).await
            }
        }
    }

    /// Tone and text of the banner reporting `outcome`.
    pub fn banner(&self, outcome: &ActionOutcome) -> (Tone, String) {
        match outcome {
            ActionOutcome::Succeeded(response) => self.success_banner(response),
            ActionOutcome::Rejected(response) => self.rejection_banner(response.message()),
            ActionOutcome::Failed { status, message } => {
                self.failure_banner(*status, message.as_deref().unwrap_or(UNKNOWN_ERROR))
            }
        }
    }

    fn success_banner(&self, response: &ActionResponse) -> (Tone, String) {
        match self {
            Action::ForceScrape => (
                Tone::Success,
                "Force scrape completed successfully!".to_string(),
            ),
            Action::ForceGithubUpload => (
                Tone::Success,
                format!("GitHub upload completed successfully! {}", response.message()),
            ),
            Action::ForceOpenctiImport => match response.estimate() {
                Some(minutes) => (
                    Tone::Info,
                    format!(
                        "{} Estimated completion: {minutes} minutes.",
                        response.message()
                    ),
                ),
                None => (Tone::Success, response.message().to_string()),
            },
            Action::SaveEmailSettings => (
                Tone::Success,
                "Email settings saved successfully!".to_string(),
            ),
            Action::TestEmail => (Tone::Success, "Test email sent successfully!".to_string()),
            Action::TestSummaryEmail => (
                Tone::Success,
                "Test summary email sent! Check your inbox to see how your weekly report will look."
                    .to_string(),
            ),
        }
    }

    fn rejection_banner(&self, message: &str) -> (Tone, String) {
        match self {
            Action::ForceScrape if message.contains(RATE_LIMIT_MARKER) => (
                Tone::Warning,
                format!(
                    "Rate Limited: {}",
                    message.replacen(&format!("{RATE_LIMIT_MARKER}: "), "", 1)
                ),
            ),
            Action::ForceScrape => (Tone::Danger, format!("Force scrape failed: {message}")),
            Action::ForceGithubUpload => {
                (Tone::Danger, format!("GitHub upload failed: {message}"))
            }
            Action::ForceOpenctiImport => {
                (Tone::Danger, format!("OpenCTI import failed: {message}"))
            }
            Action::SaveEmailSettings => (
                Tone::Danger,
                format!("Failed to save email settings: {message}"),
            ),
            Action::TestEmail => {
                (Tone::Danger, format!("Failed to send test email: {message}"))
            }
            Action::TestSummaryEmail => {
                (Tone::Danger, format!("Failed to send test summary: {message}"))
            }
        }
    }

    fn failure_banner(&self, status: Option<u16>, message: &str) -> (Tone, String) {
        let text = match self {
            Action::ForceScrape => format!("Force scrape error: {message}"),
            Action::ForceGithubUpload => format!("GitHub upload error: {message}"),
            Action::ForceOpenctiImport if status.is_none() => {
                return (
                    Tone::Warning,
                    "OpenCTI import request failed: Connection timeout. The import may still be running in the background."
                        .to_string(),
                );
            }
            Action::ForceOpenctiImport => format!("OpenCTI import error: {message}"),
            Action::SaveEmailSettings => format!("Error saving email settings: {message}"),
            Action::TestEmail => format!("Error sending test email: {message}"),
            Action::TestSummaryEmail => format!("Error sending test summary: {message}"),
        };
        (Tone::Danger, text)
    }
}

/// Classified result of an action request.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    /// 2xx with `success: true`
    Succeeded(ActionResponse),
    /// 2xx with `success: false`
    Rejected(ActionResponse),
    /// Non-2xx, timeout, connection failure or undecodable body.
    /// `status` is `None` when the backend never answered.
    Failed {
        status: Option<u16>,
        message: Option<String>,
    },
}

impl ActionOutcome {
    pub fn from_result(result: TuiResult<ActionResponse>) -> Self {
        match result {
            Ok(response) if response.success => ActionOutcome::Succeeded(response),
            Ok(response) => ActionOutcome::Rejected(response),
            Err(err) => ActionOutcome::Failed {
                status: err.status().map(|s| s.as_u16()),
                message: err.server_message().map(ToString::to_string),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Succeeded(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonState {
    Idle,
    Busy,
    /// Completed, waiting to be re-enabled at the given instant
    Cooldown(Instant),
}

/// Enabled/busy state of every action button.
#[derive(Debug, Default)]
pub struct Buttons {
    states: HashMap<Action, ButtonState>,
}

impl Buttons {
    pub fn state(&self, action: Action) -> ButtonState {
        self.states
            .get(&action)
            .copied()
            .unwrap_or(ButtonState::Idle)
    }

    pub fn is_enabled(&self, action: Action) -> bool {
        self.state(action) == ButtonState::Idle
    }

    pub fn label(&self, action: Action) -> &'static str {
        if self.is_enabled(action) {
            action.label()
        } else {
            action.busy_label()
        }
    }

    /// Disables the button. Returns false if it was already disabled.
    pub fn begin(&mut self, action: Action) -> bool {
        if !self.is_enabled(action) {
            return false;
        }
        self.states.insert(action, ButtonState::Busy);
        true
    }

    pub fn complete(&mut self, action: Action, delay: Option<Duration>, now: Instant) {
        let state = match delay {
            Some(delay) => ButtonState::Cooldown(now + delay),
            None => ButtonState::Idle,
        };
        self.states.insert(action, state);
    }

    /// Re-enables buttons whose cooldown has elapsed.
    pub fn restore_due(&mut self, now: Instant) {
        for state in self.states.values_mut() {
            if matches!(state, ButtonState::Cooldown(until) if *until <= now) {
                *state = ButtonState::Idle;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::ErrorBody, error::TuiError};
    use reqwest::StatusCode;

    fn response(success: bool, message: &str) -> ActionResponse {
        ActionResponse {
            success,
            message: Some(message.to_string()),
            estimated_time_minutes: None,
        }
    }

    #[test]
    fn rate_limited_scrape_is_a_warning_without_prefix() {
        let outcome = ActionOutcome::from_result(Ok(response(
            false,
            "RATE_LIMITED: quota exceeded",
        )));
        assert_eq!(
            Action::ForceScrape.banner(&outcome),
            (Tone::Warning, "Rate Limited: quota exceeded".to_string())
        );
    }

    #[test]
    fn rate_limit_marker_only_matters_for_scrape() {
        let outcome = ActionOutcome::from_result(Ok(response(
            false,
            "RATE_LIMITED: quota exceeded",
        )));
        assert_eq!(
            Action::ForceGithubUpload.banner(&outcome),
            (
                Tone::Danger,
                "GitHub upload failed: RATE_LIMITED: quota exceeded".to_string()
            )
        );
    }

    #[test]
    fn plain_scrape_failure_is_danger() {
        let outcome = ActionOutcome::from_result(Ok(response(false, "site unreachable")));
        assert_eq!(
            Action::ForceScrape.banner(&outcome),
            (Tone::Danger, "Force scrape failed: site unreachable".to_string())
        );
    }

    #[test]
    fn transport_failure_uses_error_body_or_unknown() {
        let with_body = ActionOutcome::from_result(Err(TuiError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ErrorBody {
                message: Some("disk full".to_string()),
            },
        }));
        assert_eq!(
            Action::SaveEmailSettings.banner(&with_body),
            (Tone::Danger, "Error saving email settings: disk full".to_string())
        );

        let without_body = ActionOutcome::Failed {
            status: Some(502),
            message: None,
        };
        assert_eq!(
            Action::ForceScrape.banner(&without_body),
            (Tone::Danger, "Force scrape error: Unknown error".to_string())
        );
    }

    #[test]
    fn import_timeout_is_a_warning() {
        let outcome = ActionOutcome::Failed {
            status: None,
            message: None,
        };
        let (tone, text) = Action::ForceOpenctiImport.banner(&outcome);
        assert_eq!(tone, Tone::Warning);
        assert!(text.starts_with("OpenCTI import request failed: Connection timeout."));

        let answered = ActionOutcome::Failed {
            status: Some(400),
            message: Some("OpenCTI import is not enabled".to_string()),
        };
        assert_eq!(
            Action::ForceOpenctiImport.banner(&answered),
            (
                Tone::Danger,
                "OpenCTI import error: OpenCTI import is not enabled".to_string()
            )
        );
    }

    #[test]
    fn import_with_unreadable_answer_is_an_error_not_a_timeout() {
        let err = TuiError::Decode {
            status: StatusCode::OK,
            source: serde_json::from_str::<ActionResponse>("<html>").unwrap_err(),
        };
        let outcome = ActionOutcome::from_result(Err(err));
        assert_eq!(
            outcome,
            ActionOutcome::Failed {
                status: Some(200),
                message: None,
            }
        );
        assert_eq!(
            Action::ForceOpenctiImport.banner(&outcome),
            (Tone::Danger, "OpenCTI import error: Unknown error".to_string())
        );
    }

    #[test]
    fn import_success_mentions_estimate() {
        let mut started = response(true, "Import job started for 7000 nodes.");
        started.estimated_time_minutes = Some(12.into());
        assert_eq!(
            Action::ForceOpenctiImport.banner(&ActionOutcome::Succeeded(started)),
            (
                Tone::Info,
                "Import job started for 7000 nodes. Estimated completion: 12 minutes."
                    .to_string()
            )
        );

        let plain = response(true, "OpenCTI API test passed!");
        assert_eq!(
            Action::ForceOpenctiImport.banner(&ActionOutcome::Succeeded(plain)),
            (Tone::Success, "OpenCTI API test passed!".to_string())
        );
    }

    #[test]
    fn github_success_appends_server_message() {
        let outcome = ActionOutcome::Succeeded(response(true, "Pushed tor_nodes.csv"));
        assert_eq!(
            Action::ForceGithubUpload.banner(&outcome),
            (
                Tone::Success,
                "GitHub upload completed successfully! Pushed tor_nodes.csv".to_string()
            )
        );
    }

    #[test]
    fn button_lifecycle() {
        let now = Instant::now();
        let mut buttons = Buttons::default();
        assert_eq!(buttons.label(Action::ForceScrape), "Force Scrape");

        assert!(buttons.begin(Action::ForceScrape));
        assert!(!buttons.is_enabled(Action::ForceScrape));
        assert_eq!(buttons.label(Action::ForceScrape), "Scraping...");
        assert!(!buttons.begin(Action::ForceScrape));
        assert!(buttons.is_enabled(Action::TestEmail));

        buttons.complete(Action::ForceScrape, None, now);
        assert!(buttons.is_enabled(Action::ForceScrape));
        assert_eq!(buttons.label(Action::ForceScrape), "Force Scrape");
    }

    #[test]
    fn cooldown_keeps_button_disabled_until_due() {
        let now = Instant::now();
        let mut buttons = Buttons::default();
        buttons.begin(Action::ForceOpenctiImport);
        buttons.complete(
            Action::ForceOpenctiImport,
            Some(Duration::from_secs(2)),
            now,
        );
        assert_eq!(
            buttons.label(Action::ForceOpenctiImport),
            "Starting Import..."
        );

        buttons.restore_due(now + Duration::from_secs(1));
        assert!(!buttons.is_enabled(Action::ForceOpenctiImport));

        buttons.restore_due(now + Duration::from_secs(2));
        assert!(buttons.is_enabled(Action::ForceOpenctiImport));
        assert_eq!(
            buttons.label(Action::ForceOpenctiImport),
            "Force OpenCTI Import"
        );
    }

    #[test]
    fn only_email_tests_skip_the_refresh() {
        assert!(Action::ForceScrape.refreshes_stats());
        assert!(Action::SaveEmailSettings.refreshes_stats());
        assert!(!Action::TestEmail.refreshes_stats());
        assert!(!Action::TestSummaryEmail.refreshes_stats());
    }
}
