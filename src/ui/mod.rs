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

mod banners;
mod footer;
mod header;
mod main;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    actions::Action,
    app::{App, Views},
    banner::Tone,
};
use footer::render_footer;
use header::render_header;
use main::render_main_view;

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Header
            Constraint::Min(0),    // Main view
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);
    render_main_view(f, chunks[1], app);
    render_footer(f, chunks[2], app);

    // Overlay help if active
    if app.show_help {
        render_help_overlay(f);
    }
}

/// Badge text and colour of a service flag.
pub(crate) fn status_badge(enabled: bool) -> (&'static str, Tone) {
    if enabled {
        ("Enabled", Tone::Success)
    } else {
        ("Disabled", Tone::Danger)
    }
}

pub(crate) fn frequency_text(hours: u64) -> String {
    if hours == 1 {
        "every 1 hour".to_string()
    } else {
        format!("every {hours} hours")
    }
}

/// Key hint plus label of an action button, greyed out while disabled.
pub(crate) fn button<'a>(app: &App, action: Action) -> Vec<Span<'a>> {
    let enabled = app.buttons.is_enabled(action);
    let style = if enabled {
        Style::default()
            .fg(Color::Black)
            .bg(action.view().accent())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray).bg(Color::Gray)
    };
    vec![
        Span::styled(
            format!("[{}]", action.key_hint()),
            Style::default().fg(Color::Yellow),
        ),
        Span::raw(" "),
        Span::styled(format!(" {} ", app.buttons.label(action)), style),
    ]
}

fn render_help_overlay(f: &mut Frame) {
    let area = centered_rect(50, 80, f.area());

    f.render_widget(Clear, area);

    let section = |title: &'static str| {
        Line::from(Span::styled(title, Style::default().fg(Color::Yellow)))
    };

    let help_text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "KEYBOARD SHORTCUTS",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section("  Views"),
        Line::from("  s / n / g / o / e   Scrape, Nodes, GitHub, OpenCTI, Email"),
        Line::from("  Tab / Shift+Tab     Next / previous view"),
        Line::from(""),
        section("  Actions"),
        Line::from("  f         Force the job of the current view"),
        Line::from("  w         Save email settings"),
        Line::from("  t / T     Send test email / test summary"),
        Line::from("  r         Refresh statistics now"),
        Line::from("  x         Dismiss the newest message"),
        Line::from(""),
        section("  Nodes & Email"),
        Line::from("  ↑↓ / j k  Move selection"),
        Line::from("  ←→        Previous / next page"),
        Line::from("  [ ]       Sort by previous / next column"),
        Line::from("  i         Invert sort order"),
        Line::from("  /         Filter nodes"),
        Line::from("  Space     Toggle email option"),
        Line::from(""),
        section("  General"),
        Line::from("  ?/h       Show this help"),
        Line::from("  q/Esc     Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let para = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(para, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

impl Views {
    /// Colour of the view's buttons.
    pub(crate) fn accent(&self) -> Color {
        match self {
            Views::Scrape | Views::Nodes => Color::LightBlue,
            Views::Github => Color::LightMagenta,
            Views::Opencti => Color::LightCyan,
            Views::Email => Color::LightGreen,
        }
    }
}
