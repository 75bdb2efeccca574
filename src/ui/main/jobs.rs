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

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::history::render_history;
use crate::{
    actions::Action,
    app::App,
    domain::{ConfigStatus, HistoryKind},
    ui::{button, frequency_text, status_badge},
};

struct JobPanel {
    title: &'static str,
    action: Action,
    enabled: bool,
    frequency: u64,
}

impl JobPanel {
    fn new(kind: HistoryKind, config: &ConfigStatus) -> Self {
        match kind {
            HistoryKind::Scrape => Self {
                title: " Scraping ",
                action: Action::ForceScrape,
                enabled: config.scrape_enabled,
                frequency: config.scrape_frequency(),
            },
            HistoryKind::Github => Self {
                title: " GitHub Upload ",
                action: Action::ForceGithubUpload,
                enabled: config.github_upload_enabled,
                frequency: config.github_frequency(),
            },
            HistoryKind::Opencti => Self {
                title: " OpenCTI Import ",
                action: Action::ForceOpenctiImport,
                enabled: config.opencti_upload_enabled,
                frequency: config.opencti_frequency(),
            },
        }
    }
}

pub fn render_job_view(f: &mut Frame, area: Rect, app: &App, kind: HistoryKind) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Status & controls
            Constraint::Min(0),    // History
        ])
        .split(area);

    render_controls(f, chunks[0], app, kind);

    let items = app
        .dashboard_data
        .snapshot
        .as_ref()
        .map(|snapshot| snapshot.history(kind))
        .unwrap_or_default();
    render_history(f, chunks[1], items, kind, app.settings.ui.history_limit);
}

fn render_controls(f: &mut Frame, area: Rect, app: &App, kind: HistoryKind) {
    let config = app.dashboard_data.config().cloned().unwrap_or_default();
    let panel = JobPanel::new(kind, &config);
    let (badge, tone) = status_badge(panel.enabled);

    let mut status = vec![
        Span::raw("Status: "),
        Span::styled(badge, Style::default().fg(Color::Black).bg(tone.color())),
        Span::raw(format!("   Frequency: {}", frequency_text(panel.frequency))),
    ];
    if kind == HistoryKind::Opencti && app.is_progress_polling() {
        status.push(Span::styled(
            "   Import running, refreshing progress",
            Style::default().fg(Color::Cyan),
        ));
    }

    let lines = vec![
        Line::from(status),
        Line::from(""),
        Line::from(button(app, panel.action)),
    ];

    let block = Block::default().borders(Borders::ALL).title(panel.title);
    f.render_widget(Paragraph::new(lines).block(block), area);
}
