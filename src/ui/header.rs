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
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, Views};

const MENU_CONSTRAINTS: [Constraint; Views::ALL.len()] =
    [Constraint::Ratio(1, Views::ALL.len() as u32); Views::ALL.len()];

pub(super) fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(3)])
        .split(area);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Min(0)])
        .split(rows[0]);

    render_backend(f, top[0], app);
    render_menu(f, top[1], app);
    render_counters(f, rows[1], app);
}

fn render_backend(f: &mut Frame, area: Rect, app: &App) {
    let data = &app.dashboard_data;
    let state = if data.is_backend_up() {
        Span::styled("(up)", Style::default().fg(Color::Green))
    } else if data.last_error.is_some() {
        Span::styled("(unreachable)", Style::default().fg(Color::Red))
    } else {
        Span::styled("(connecting)", Style::default().fg(Color::Yellow))
    };

    let mut lines = vec![
        Line::from(Span::raw("Tor Node Collector").bold()),
        Line::from(vec![
            Span::raw(format!("Backend: {} ", app.http_client.server_url())),
            state,
        ]),
    ];
    match (&data.last_error, data.snapshot.as_ref().and_then(|s| s.last_update())) {
        (Some(error), _) => lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        ))),
        (None, Some(last_update)) => {
            lines.push(Line::from(format!("Last update: {last_update}")))
        }
        (None, None) => {}
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn render_menu(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(MENU_CONSTRAINTS)
        .split(area);

    for (index, view) in Views::ALL.iter().enumerate() {
        let title = view.title();
        let (hotkey, rest) = title.split_at(1);
        let line = Line::from(vec![Span::raw(hotkey).underlined(), Span::raw(rest)]);

        let style = if *view == app.current_view {
            Style::default().white()
        } else {
            Style::default().dark_gray()
        };
        let block = Block::default().borders(Borders::ALL).border_style(style);
        let paragraph = Paragraph::new(Text::from(line))
            .style(style)
            .block(block)
            .alignment(Alignment::Center);

        f.render_widget(paragraph, chunks[index]);
    }
}

fn render_counters(f: &mut Frame, area: Rect, app: &App) {
    let stats = app.dashboard_data.node_stats();
    let counters = [
        (" Total Nodes ", stats.total(), Color::LightBlue),
        (" Exit Nodes ", stats.exit(), Color::Magenta),
        (" New Nodes ", stats.added(), Color::Green),
        (" Removed Nodes ", stats.removed(), Color::Red),
    ];

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    for (index, (title, value, color)) in counters.into_iter().enumerate() {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(Style::new().fg(color));
        f.render_widget(
            Paragraph::new(value.to_string()).bold().block(block).centered(),
            chunks[index],
        );
    }
}
