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
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;

/// Height needed for the banners of the current view.
pub(super) fn banners_height(app: &App) -> u16 {
    if app.banners.is_empty() {
        return 0;
    }
    app.banners.for_view(app.current_view).count().min(u16::MAX as usize) as u16
}

pub(super) fn render_banners(f: &mut Frame, area: Rect, app: &App) {
    let lines: Vec<Line> = app
        .banners
        .for_view(app.current_view)
        .map(|banner| {
            let style = Style::default().fg(banner.tone.color());
            Line::from(vec![
                Span::styled("▌ ", style),
                Span::styled(banner.message.clone(), style.add_modifier(Modifier::BOLD)),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), area);
}
