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
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::{
    banner::Tone,
    domain::{format_timestamp, HistoryItem, HistoryKind},
};

const NO_HISTORY: &str = "No history available";

/// A history item formatted for display.
#[derive(Debug, PartialEq, Eq)]
pub(super) struct HistoryEntry {
    pub heading: String,
    pub lines: Vec<String>,
    pub tone: Tone,
}

impl HistoryEntry {
    pub fn from_item(item: &HistoryItem, kind: HistoryKind) -> Self {
        let timestamp = item
            .timestamp
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_else(|| "Unknown time".to_string());
        let forced = if item.is_forced() { " (FORCED)" } else { "" };
        let heading = format!("{timestamp} - {}{forced}", item.status().to_uppercase());

        let message = item.message.as_deref().filter(|m| !m.is_empty());
        let mut lines = Vec::new();
        match kind {
            HistoryKind::Scrape => {
                if let Some(message) = message {
                    lines.push(message.replacen("RATE_LIMITED: ", "⚠ RATE LIMITED: ", 1));
                }
                if item.is_success() {
                    lines.push(format!(
                        "Total: {} | Exit: {} | Added: {} | Removed: {}",
                        item.nodes_total.unwrap_or(0),
                        item.nodes_exit.unwrap_or(0),
                        item.nodes_added.unwrap_or(0),
                        item.nodes_removed.unwrap_or(0),
                    ));
                }
            }
            HistoryKind::Github => lines.push(message.unwrap_or_default().to_string()),
            HistoryKind::Opencti => {
                if let Some(message) = message {
                    lines.push(message.to_string());
                }
                if let Some(imported) = item.imported {
                    lines.push(format!("Imported: {imported} nodes"));
                }
            }
        }

        let tone = match item.status() {
            "success" => Tone::Success,
            "error" => Tone::Danger,
            _ => Tone::Warning,
        };

        Self {
            heading,
            lines,
            tone,
        }
    }
}

/// The newest `limit` items, in the order the backend sent them.
pub(super) fn recent(items: &[HistoryItem], limit: usize) -> &[HistoryItem] {
    &items[..items.len().min(limit)]
}

pub(super) fn render_history(
    f: &mut Frame,
    area: Rect,
    items: &[HistoryItem],
    kind: HistoryKind,
    limit: usize,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", kind.title()));

    let items = recent(items, limit);
    if items.is_empty() {
        let paragraph = Paragraph::new(NO_HISTORY)
            .block(block.border_style(Style::new().gray()))
            .centered();
        f.render_widget(paragraph, area);
        return;
    }

    let mut text = Vec::new();
    for entry in items.iter().map(|item| HistoryEntry::from_item(item, kind)) {
        let style = Style::default().fg(entry.tone.color());
        text.push(Line::from(Span::styled(
            entry.heading,
            style.add_modifier(Modifier::BOLD),
        )));
        text.extend(
            entry
                .lines
                .into_iter()
                .map(|line| Line::from(Span::raw(format!("  {line}")))),
        );
        text.push(Line::from(""));
    }

    f.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(status: &str, message: Option<&str>) -> HistoryItem {
        HistoryItem {
            timestamp: Some("2026-10-18T10:00:00".to_string()),
            status: Some(status.to_string()),
            message: message.map(ToString::to_string),
            ..HistoryItem::default()
        }
    }

    #[test]
    fn caps_to_the_first_entries_in_input_order() {
        let items: Vec<_> = (0..25)
            .map(|i| item("success", Some(&format!("run {i}"))))
            .collect();
        let shown = recent(&items, 20);
        assert_eq!(shown.len(), 20);
        assert_eq!(shown[0].message.as_deref(), Some("run 0"));
        assert_eq!(shown[19].message.as_deref(), Some("run 19"));

        assert_eq!(recent(&items[..3], 20).len(), 3);
    }

    #[test]
    fn scrape_entry_marks_rate_limit_and_counts() {
        let limited = HistoryEntry::from_item(
            &item("error", Some("RATE_LIMITED: quota exceeded")),
            HistoryKind::Scrape,
        );
        assert_eq!(limited.heading, "2026-10-18 10:00:00 - ERROR");
        assert_eq!(limited.lines, vec!["⚠ RATE LIMITED: quota exceeded"]);
        assert_eq!(limited.tone, Tone::Danger);

        let mut ok = item("success", None);
        ok.nodes_total = Some(7012);
        ok.nodes_exit = Some(1290);
        let ok = HistoryEntry::from_item(&ok, HistoryKind::Scrape);
        assert_eq!(
            ok.lines,
            vec!["Total: 7012 | Exit: 1290 | Added: 0 | Removed: 0"]
        );
        assert_eq!(ok.tone, Tone::Success);
    }

    #[test]
    fn forced_runs_are_labelled() {
        let mut forced = item("success", Some("uploaded"));
        forced.forced = Some(true);
        let entry = HistoryEntry::from_item(&forced, HistoryKind::Github);
        assert_eq!(entry.heading, "2026-10-18 10:00:00 - SUCCESS (FORCED)");
        assert_eq!(entry.lines, vec!["uploaded"]);
    }

    #[test]
    fn github_and_opencti_entries() {
        let github = HistoryEntry::from_item(&item("skipped", None), HistoryKind::Github);
        assert_eq!(github.lines, vec![""]);
        assert_eq!(github.tone, Tone::Warning);

        let mut import = item("success", Some("Import complete"));
        import.imported = Some(7000);
        let opencti = HistoryEntry::from_item(&import, HistoryKind::Opencti);
        assert_eq!(opencti.lines, vec!["Import complete", "Imported: 7000 nodes"]);

        let missing = HistoryEntry::from_item(&HistoryItem::default(), HistoryKind::Opencti);
        assert_eq!(missing.heading, "Unknown time - UNKNOWN");
        assert!(missing.lines.is_empty());
    }
}
