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
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::{
    actions::Action,
    app::App,
    email::EmailField,
    ui::{button, status_badge},
};

pub fn render_email(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_form(f, chunks[0], app);
    render_configuration(f, chunks[1], app);
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let form = &app.email_form;
    let settings = form.settings();

    let mut lines: Vec<Line> = EmailField::ALL
        .iter()
        .map(|field| {
            let checked = if field.value(&settings) { "[x]" } else { "[ ]" };
            let text = format!(" {checked} {}", field.label());
            if *field == form.cursor() {
                Line::from(Span::styled(
                    format!(">{text}"),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(format!(" {text}"))
            }
        })
        .collect();

    lines.push(Line::from(""));
    if form.is_dirty() {
        lines.push(Line::from(Span::styled(
            "Unsaved changes",
            Style::default().fg(Color::Yellow),
        )));
    }
    lines.push(Line::from(button(app, Action::SaveEmailSettings)));
    lines.push(Line::from(""));
    lines.push(Line::from(button(app, Action::TestEmail)));
    lines.push(Line::from(button(app, Action::TestSummaryEmail)));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Weekly Email Report ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_configuration(f: &mut Frame, area: Rect, app: &App) {
    let config = app.dashboard_data.config();
    let enabled = config.is_some_and(|c| c.email_enabled);
    let rows = config
        .and_then(|c| c.email_config.clone())
        .unwrap_or_default()
        .rows();

    let (badge, tone) = status_badge(enabled);

    let label = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Status: ", label),
            Span::styled(badge, Style::default().fg(Color::Black).bg(tone.color())),
        ]),
        Line::from(""),
    ];
    lines.extend(rows.into_iter().map(|(name, value)| {
        Line::from(vec![
            Span::styled(format!("{name}: "), label),
            Span::raw(value),
        ])
    }));

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" SMTP Configuration ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}
