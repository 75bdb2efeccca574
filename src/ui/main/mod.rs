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

mod email;
mod history;
mod jobs;
mod nodes;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::Clear,
    Frame,
};

use super::banners::{banners_height, render_banners};
use crate::{
    app::{App, Views},
    domain::HistoryKind,
};
use email::render_email;
use jobs::render_job_view;
use nodes::render_nodes;

pub(super) fn render_main_view(f: &mut Frame, area: Rect, app: &App) {
    f.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(banners_height(app)), // Banners
            Constraint::Min(0),                      // View content
        ])
        .split(area);

    render_banners(f, chunks[0], app);

    match app.current_view {
        Views::Scrape => render_job_view(f, chunks[1], app, HistoryKind::Scrape),
        Views::Nodes => render_nodes(f, chunks[1], app),
        Views::Github => render_job_view(f, chunks[1], app, HistoryKind::Github),
        Views::Opencti => render_job_view(f, chunks[1], app, HistoryKind::Opencti),
        Views::Email => render_email(f, chunks[1], app),
    }
}
