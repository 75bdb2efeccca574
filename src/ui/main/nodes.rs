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
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::{
    app::App,
    domain::NodeKind,
    nodes::{NodeColumn, NodeTable, NodeTableState},
};

const WIDTHS: [Constraint; 7] = [
    Constraint::Length(28), // IP
    Constraint::Length(7),  // Type
    Constraint::Min(16),    // Name
    Constraint::Length(14), // Flags
    Constraint::Length(10), // Uptime
    Constraint::Length(10), // Version
    Constraint::Length(20), // Collected
];

pub fn render_nodes(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" Tor Nodes ");

    match &app.nodes {
        NodeTableState::NotLoaded | NodeTableState::Loading => {
            let paragraph = Paragraph::new("Loading node data...")
                .style(Style::default().fg(Color::DarkGray))
                .block(block)
                .centered();
            f.render_widget(paragraph, area);
        }
        NodeTableState::Failed(reason) => {
            let lines = vec![
                Line::from("Failed to load node data."),
                Line::from(Span::styled(
                    reason.as_str(),
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            let paragraph = Paragraph::new(lines)
                .style(Style::default().fg(Color::Red))
                .block(block)
                .centered();
            f.render_widget(paragraph, area);
        }
        NodeTableState::Ready(table) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(1)])
                .split(area);
            render_table(f, chunks[0], table, block);
            render_status_line(f, chunks[1], table, app);
        }
    }
}

fn render_table(f: &mut Frame, area: Rect, table: &NodeTable, block: Block) {
    let header = Row::new(NodeColumn::ALL.map(|column| {
        let title = if column == table.sort_column() {
            format!("{} {}", column.title(), table.sort_order().arrow())
        } else {
            column.title().to_string()
        };
        Cell::from(title)
    }))
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows = table.page_rows().into_iter().map(|row| {
        Row::new(NodeColumn::ALL.map(|column| {
            let cell = Cell::from(row.cell(column).to_string());
            match column {
                NodeColumn::Type => cell.style(kind_style(row.kind)),
                _ => cell,
            }
        }))
    });

    let widget = Table::new(rows, WIDTHS)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = TableState::default().with_selected(Some(table.selected()));
    f.render_stateful_widget(widget, area, &mut state);
}

fn kind_style(kind: NodeKind) -> Style {
    match kind {
        NodeKind::Exit => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        NodeKind::Relay => Style::default().fg(Color::Green),
    }
}

fn render_status_line(f: &mut Frame, area: Rect, table: &NodeTable, app: &App) {
    let mut spans = vec![Span::raw(format!(
        " showing {} of {} nodes | page {}/{}",
        table.visible_len(),
        table.total(),
        table.page() + 1,
        table.page_count(),
    ))];
    if app.search_mode {
        spans.push(Span::styled(
            format!(" | filter: {}_", app.search_query),
            Style::default().fg(Color::Yellow),
        ));
    } else if !table.filter().is_empty() {
        spans.push(Span::raw(format!(" | filter: {}", table.filter())));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
