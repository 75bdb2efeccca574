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

//! Client side state of the sortable, filterable, paginated node table.

use std::{cmp::Ordering, net::IpAddr};

use crate::domain::{NodeKind, NodeRecord, NodesResponse};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeColumn {
    Ip,
    Type,
    Name,
    Flags,
    Uptime,
    Version,
    Collected,
}

impl NodeColumn {
    pub const ALL: [NodeColumn; 7] = [
        NodeColumn::Ip,
        NodeColumn::Type,
        NodeColumn::Name,
        NodeColumn::Flags,
        NodeColumn::Uptime,
        NodeColumn::Version,
        NodeColumn::Collected,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            NodeColumn::Ip => "IP",
            NodeColumn::Type => "Type",
            NodeColumn::Name => "Name",
            NodeColumn::Flags => "Flags",
            NodeColumn::Uptime => "Uptime",
            NodeColumn::Version => "Version",
            NodeColumn::Collected => "Collected",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }

    fn next(&self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    fn previous(&self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn arrow(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "▲",
            SortOrder::Descending => "▼",
        }
    }

    fn toggled(&self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeRow {
    cells: [String; 7],
    pub kind: NodeKind,
}

impl NodeRow {
    pub fn cell(&self, column: NodeColumn) -> &str {
        &self.cells[column.index()]
    }

    fn matches(&self, needle: &str) -> bool {
        self.cells
            .iter()
            .any(|cell| cell.to_lowercase().contains(needle))
    }
}

impl From<&NodeRecord> for NodeRow {
    fn from(record: &NodeRecord) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        let kind = record.kind();
        Self {
            cells: [
                text(&record.ip),
                kind.label().to_string(),
                text(&record.name),
                text(&record.flags),
                text(&record.uptime),
                text(&record.version),
                text(&record.collection_date),
            ],
            kind,
        }
    }
}

/// Sort key of a single cell. Addresses sort before numbers, numbers before
/// text, so cells of mixed kinds still form a total order.
#[derive(Debug)]
enum CellKey {
    Address(IpAddr),
    Number(f64),
    Text(String),
}

impl CellKey {
    fn parse(cell: &str) -> Self {
        if let Ok(address) = cell.parse::<IpAddr>() {
            CellKey::Address(address)
        } else if let Ok(number) = cell.parse::<f64>() {
            CellKey::Number(number)
        } else {
            CellKey::Text(cell.to_lowercase())
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellKey::Address(_) => 0,
            CellKey::Number(_) => 1,
            CellKey::Text(_) => 2,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (CellKey::Address(a), CellKey::Address(b)) => a.cmp(b),
            (CellKey::Number(a), CellKey::Number(b)) => a.total_cmp(b),
            (CellKey::Text(a), CellKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

fn compare_cells(a: &str, b: &str) -> Ordering {
    CellKey::parse(a).compare(&CellKey::parse(b))
}

#[derive(Debug)]
pub struct NodeTable {
    rows: Vec<NodeRow>,
    /// Indices into `rows` that pass the filter
    visible: Vec<usize>,
    total: Option<u64>,
    sort_column: NodeColumn,
    sort_order: SortOrder,
    filter: String,
    page: usize,
    page_size: usize,
    selected: usize,
}

impl NodeTable {
    pub fn new(response: &NodesResponse, page_size: usize) -> Self {
        let mut table = Self {
            rows: response.nodes.iter().map(NodeRow::from).collect(),
            visible: Vec::new(),
            total: response.total,
            sort_column: NodeColumn::Ip,
            sort_order: SortOrder::Ascending,
            filter: String::new(),
            page: 0,
            page_size: page_size.max(1),
            selected: 0,
        };
        table.rebuild();
        table
    }

    /// Sorts by `column`; picking the current column again flips the order.
    pub fn sort_by(&mut self, column: NodeColumn) {
        if self.sort_column == column {
            self.sort_order = self.sort_order.toggled();
        } else {
            self.sort_column = column;
            self.sort_order = SortOrder::Ascending;
        }
        self.rebuild();
    }

    pub fn sort_next_column(&mut self) {
        self.sort_by(self.sort_column.next());
    }

    pub fn sort_previous_column(&mut self) {
        self.sort_by(self.sort_column.previous());
    }

    pub fn toggle_order(&mut self) {
        self.sort_by(self.sort_column);
    }

    pub fn sort_column(&self) -> NodeColumn {
        self.sort_column
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub fn set_filter(&mut self, query: &str) {
        self.filter = query.trim().to_lowercase();
        self.rebuild();
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    fn rebuild(&mut self) {
        let column = self.sort_column;
        let order = self.sort_order;
        self.rows.sort_by(|a, b| {
            let ordering = compare_cells(a.cell(column), b.cell(column));
            match order {
                SortOrder::Ascending => ordering,
                SortOrder::Descending => ordering.reverse(),
            }
        });
        self.visible = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| self.filter.is_empty() || row.matches(&self.filter))
            .map(|(index, _)| index)
            .collect();
        self.page = 0;
        self.selected = 0;
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Node count reported by the backend, or the number of rows received.
    pub fn total(&self) -> u64 {
        self.total.unwrap_or(self.rows.len() as u64)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_count(&self) -> usize {
        self.visible.len().div_ceil(self.page_size).max(1)
    }

    pub fn page_rows(&self) -> Vec<&NodeRow> {
        self.visible
            .iter()
            .skip(self.page * self.page_size)
            .take(self.page_size)
            .map(|index| &self.rows[*index])
            .collect()
    }

    pub fn next_page(&mut self) {
        if self.page + 1 < self.page_count() {
            self.page += 1;
            self.selected = 0;
        }
    }

    pub fn previous_page(&mut self) {
        if self.page > 0 {
            self.page -= 1;
            self.selected = 0;
        }
    }

    /// Selected row within the current page.
    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        let rows = self.page_rows().len();
        if self.selected + 1 < rows {
            self.selected += 1;
        } else if self.page + 1 < self.page_count() {
            self.next_page();
        }
    }

    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else if self.page > 0 {
            self.previous_page();
            self.selected = self.page_rows().len().saturating_sub(1);
        }
    }

    /// Clamps page and selection to the current data.
    pub fn adjust(&mut self) {
        self.page = self.page.min(self.page_count() - 1);
        self.selected = self
            .selected
            .min(self.page_rows().len().saturating_sub(1));
    }
}

#[derive(Debug, Default)]
pub enum NodeTableState {
    /// The Nodes view was never shown
    #[default]
    NotLoaded,
    Loading,
    Ready(NodeTable),
    Failed(String),
}

impl NodeTableState {
    pub fn is_requested(&self) -> bool {
        !matches!(self, NodeTableState::NotLoaded)
    }

    pub fn table_mut(&mut self) -> Option<&mut NodeTable> {
        match self {
            NodeTableState::Ready(table) => Some(table),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ip: &str, exit: &str, name: &str, uptime: &str) -> NodeRecord {
        NodeRecord {
            ip: Some(ip.to_string()),
            is_exit: Some(exit.to_string()),
            name: Some(name.to_string()),
            uptime: Some(uptime.to_string()),
            ..NodeRecord::default()
        }
    }

    fn response() -> NodesResponse {
        NodesResponse {
            total: None,
            nodes: vec![
                record("10.0.0.2", "ExitNode", "gamma", "300"),
                record("9.1.1.1", "", "Alpha", "20"),
                record("10.0.0.10", "ExitNode", "beta", "100"),
                record("2001:db8::1", "", "delta", "5"),
            ],
        }
    }

    fn ips(table: &NodeTable) -> Vec<&str> {
        table
            .page_rows()
            .iter()
            .map(|row| row.cell(NodeColumn::Ip))
            .collect()
    }

    #[test]
    fn defaults_to_ip_ascending() {
        let table = NodeTable::new(&response(), 50);
        assert_eq!(table.sort_column(), NodeColumn::Ip);
        assert_eq!(table.sort_order(), SortOrder::Ascending);
        assert_eq!(
            ips(&table),
            vec!["9.1.1.1", "10.0.0.2", "10.0.0.10", "2001:db8::1"]
        );
        assert_eq!(table.total(), 4);
    }

    #[test]
    fn missing_fields_render_empty_and_type_badges() {
        let table = NodeTable::new(
            &NodesResponse {
                total: Some(7000),
                nodes: vec![NodeRecord {
                    ip: Some("1.2.3.4".to_string()),
                    ..NodeRecord::default()
                }],
            },
            50,
        );
        let rows = table.page_rows();
        assert_eq!(rows[0].cell(NodeColumn::Name), "");
        assert_eq!(rows[0].cell(NodeColumn::Type), "Relay");
        assert_eq!(rows[0].kind, NodeKind::Relay);
        assert_eq!(table.total(), 7000);

        let full = NodeTable::new(&response(), 50);
        assert_eq!(full.page_rows()[1].cell(NodeColumn::Type), "Exit");
    }

    #[test]
    fn sorting_toggles_and_compares_numbers() {
        let mut table = NodeTable::new(&response(), 50);
        table.toggle_order();
        assert_eq!(ips(&table)[0], "2001:db8::1");

        table.sort_by(NodeColumn::Uptime);
        assert_eq!(table.sort_order(), SortOrder::Ascending);
        let uptimes: Vec<_> = table
            .page_rows()
            .iter()
            .map(|row| row.cell(NodeColumn::Uptime))
            .collect();
        assert_eq!(uptimes, vec!["5", "20", "100", "300"]);

        table.sort_by(NodeColumn::Name);
        let names: Vec<_> = table
            .page_rows()
            .iter()
            .map(|row| row.cell(NodeColumn::Name))
            .collect();
        assert_eq!(names, vec!["Alpha", "beta", "delta", "gamma"]);
    }

    #[test]
    fn mixed_cells_order_by_kind_first() {
        assert_eq!(compare_cells("3", "20"), Ordering::Less);
        assert_eq!(compare_cells("20", "2a"), Ordering::Less);
        assert_eq!(compare_cells("3", "2a"), Ordering::Less);
        assert_eq!(compare_cells("2a", "3"), Ordering::Greater);
        assert_eq!(compare_cells("10.0.0.1", "1"), Ordering::Less);
        assert_eq!(compare_cells("Relay", "relay"), Ordering::Equal);
        assert_eq!(compare_cells("", "a"), Ordering::Less);
    }

    #[test]
    fn sorting_mixed_names_keeps_a_total_order() {
        let nodes = (0..2000)
            .map(|i| {
                let name = match i % 4 {
                    0 => format!("{}", i * 7 % 1000),
                    1 => format!("{}a", i % 97),
                    2 => format!("relay{i}"),
                    _ => format!("10.{}.0.{}", i % 200, i % 250),
                };
                record(&format!("10.0.{}.{}", i / 250, i % 250), "", &name, "")
            })
            .collect();
        let mut table = NodeTable::new(&NodesResponse { total: None, nodes }, 5000);
        table.sort_by(NodeColumn::Name);

        let keys: Vec<_> = table
            .page_rows()
            .iter()
            .map(|row| CellKey::parse(row.cell(NodeColumn::Name)))
            .collect();
        assert_eq!(keys.len(), 2000);
        assert!(keys
            .windows(2)
            .all(|pair| pair[0].compare(&pair[1]) != Ordering::Greater));
        assert!(matches!(keys[0], CellKey::Address(_)));
        assert!(matches!(keys[1999], CellKey::Text(_)));

        table.toggle_order();
        assert!(table.page_rows()[0].cell(NodeColumn::Name).starts_with("relay"));
    }

    #[test]
    fn column_cycling_wraps() {
        let mut table = NodeTable::new(&response(), 50);
        table.sort_previous_column();
        assert_eq!(table.sort_column(), NodeColumn::Collected);
        table.sort_next_column();
        assert_eq!(table.sort_column(), NodeColumn::Ip);
    }

    #[test]
    fn filter_is_case_insensitive_across_columns() {
        let mut table = NodeTable::new(&response(), 50);
        table.set_filter("EXIT");
        assert_eq!(table.visible_len(), 2);
        table.set_filter("alpha");
        assert_eq!(ips(&table), vec!["9.1.1.1"]);
        table.set_filter("");
        assert_eq!(table.visible_len(), 4);
    }

    #[test]
    fn pagination_and_selection() {
        let mut table = NodeTable::new(&response(), 3);
        assert_eq!(table.page_count(), 2);
        assert_eq!(table.page_rows().len(), 3);

        table.select_next();
        table.select_next();
        assert_eq!(table.selected(), 2);
        table.select_next();
        assert_eq!(table.page(), 1);
        assert_eq!(ips(&table), vec!["2001:db8::1"]);

        table.next_page();
        assert_eq!(table.page(), 1);

        table.select_previous();
        assert_eq!(table.page(), 0);
        assert_eq!(table.selected(), 2);
    }

    #[test]
    fn adjust_clamps_to_data() {
        let mut table = NodeTable::new(&response(), 2);
        table.next_page();
        table.select_next();
        table.filter = "exit".to_string();
        table.visible = vec![0];
        table.adjust();
        assert_eq!(table.page(), 0);
        assert_eq!(table.selected(), 0);
    }

    #[test]
    fn state_tracks_first_request() {
        let mut state = NodeTableState::default();
        assert!(!state.is_requested());
        assert!(state.table_mut().is_none());
        state = NodeTableState::Loading;
        assert!(state.is_requested());
        state = NodeTableState::Ready(NodeTable::new(&response(), 50));
        assert!(state.table_mut().is_some());
    }
}
