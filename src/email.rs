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

use crate::domain::{ConfigStatus, EmailSettings};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmailField {
    Enabled,
    NodeStats,
    ScrapeHistory,
    GithubHistory,
    OpenctiHistory,
    Errors,
    SystemHealth,
}

impl EmailField {
    pub const ALL: [EmailField; 7] = [
        EmailField::Enabled,
        EmailField::NodeStats,
        EmailField::ScrapeHistory,
        EmailField::GithubHistory,
        EmailField::OpenctiHistory,
        EmailField::Errors,
        EmailField::SystemHealth,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            EmailField::Enabled => "Enable weekly email reports",
            EmailField::NodeStats => "Include node statistics",
            EmailField::ScrapeHistory => "Include scrape history",
            EmailField::GithubHistory => "Include GitHub upload history",
            EmailField::OpenctiHistory => "Include OpenCTI import history",
            EmailField::Errors => "Include errors",
            EmailField::SystemHealth => "Include system health",
        }
    }

    fn value_mut<'a>(&self, settings: &'a mut EmailSettings) -> &'a mut bool {
        match self {
            EmailField::Enabled => &mut settings.enabled,
            EmailField::NodeStats => &mut settings.include_node_stats,
            EmailField::ScrapeHistory => &mut settings.include_scrape_history,
            EmailField::GithubHistory => &mut settings.include_github_history,
            EmailField::OpenctiHistory => &mut settings.include_opencti_history,
            EmailField::Errors => &mut settings.include_errors,
            EmailField::SystemHealth => &mut settings.include_system_health,
        }
    }

    pub fn value(&self, settings: &EmailSettings) -> bool {
        let mut copy = *settings;
        *self.value_mut(&mut copy)
    }
}

/// The email settings form. Follows the backend until the user edits it.
#[derive(Debug, Default)]
pub struct EmailForm {
    settings: EmailSettings,
    cursor: usize,
    dirty: bool,
}

impl EmailForm {
    pub fn settings(&self) -> EmailSettings {
        self.settings
    }

    pub fn cursor(&self) -> EmailField {
        EmailField::ALL[self.cursor]
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        self.cursor = (self.cursor + 1).min(EmailField::ALL.len() - 1);
    }

    pub fn toggle(&mut self) {
        let value = self.cursor().value_mut(&mut self.settings);
        *value = !*value;
        self.dirty = true;
    }

    /// Takes the backend's settings unless there are unsaved edits.
    pub fn sync(&mut self, config: &ConfigStatus) {
        if self.dirty {
            return;
        }
        let mut settings = config.email_settings.unwrap_or_default();
        settings.enabled = config.email_enabled;
        self.settings = settings;
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(enabled: bool, settings: Option<EmailSettings>) -> ConfigStatus {
        ConfigStatus {
            email_enabled: enabled,
            email_settings: settings,
            ..ConfigStatus::default()
        }
    }

    #[test]
    fn sync_takes_enabled_from_config() {
        let mut form = EmailForm::default();
        let remote = EmailSettings {
            include_errors: false,
            ..EmailSettings::default()
        };
        form.sync(&config(true, Some(remote)));

        let settings = form.settings();
        assert!(settings.enabled);
        assert!(!settings.include_errors);
        assert!(settings.include_node_stats);
    }

    #[test]
    fn edits_survive_refreshes_until_saved() {
        let mut form = EmailForm::default();
        form.move_down();
        form.move_down();
        form.move_down();
        assert_eq!(form.cursor(), EmailField::GithubHistory);
        form.toggle();
        assert!(form.is_dirty());

        form.sync(&config(false, None));
        assert!(form.settings().include_github_history);

        form.mark_saved();
        form.sync(&config(false, None));
        assert!(!form.settings().include_github_history);
    }

    #[test]
    fn cursor_stays_in_range() {
        let mut form = EmailForm::default();
        form.move_up();
        assert_eq!(form.cursor(), EmailField::Enabled);
        for _ in 0..10 {
            form.move_down();
        }
        assert_eq!(form.cursor(), EmailField::SystemHealth);
        assert!(EmailField::SystemHealth.value(&EmailSettings {
            include_system_health: true,
            ..EmailSettings::default()
        }));
    }
}
