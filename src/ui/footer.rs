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

use ratatui::{layout::Rect, prelude::Style, style::Stylize, widgets::Paragraph, Frame};

use crate::app::{App, Views};

const GLOBAL_KEYS: &str = "[s/n/g/o/e] views, [r] refresh, [x] dismiss, [?/h] help, [q/Esc] quit";

pub(super) fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let view_keys = match app.current_view {
        Views::Scrape | Views::Github | Views::Opencti => "[f] force",
        Views::Nodes if app.search_mode => "[Enter] apply filter, [Esc] clear filter",
        Views::Nodes => "[↑↓] select, [←→] page, [[ ]] sort, [i] invert, [/] filter",
        Views::Email => "[↑↓] move, [Space] toggle, [w] save, [t/T] test",
    };
    let paragraph = Paragraph::new(format!("{view_keys} | {GLOBAL_KEYS}"))
        .style(Style::default().bold())
        .centered();
    f.render_widget(paragraph, area);
}
