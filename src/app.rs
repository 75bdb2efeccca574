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

use std::{future::Future, sync::Arc, time::Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use tokio::sync::mpsc::UnboundedSender;

use crate::{
    actions::{Action, ActionOutcome, Buttons},
    banner::Banners,
    domain::{DashboardData, NodesResponse, StatsSnapshot},
    email::EmailForm,
    event::{Event, UiData},
    http_client::HttpClient,
    infrastructure::Settings,
    nodes::{NodeTable, NodeTableState},
    polling::{ProgressPoll, RequestSequence},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Views {
    Scrape,
    Nodes,
    Github,
    Opencti,
    Email,
}

impl Views {
    pub const ALL: [Views; 5] = [
        Views::Scrape,
        Views::Nodes,
        Views::Github,
        Views::Opencti,
        Views::Email,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Views::Scrape => "Scrape",
            Views::Nodes => "Nodes",
            Views::Github => "GitHub",
            Views::Opencti => "OpenCTI",
            Views::Email => "Email",
        }
    }

    pub fn hotkey(&self) -> char {
        match self {
            Views::Scrape => 's',
            Views::Nodes => 'n',
            Views::Github => 'g',
            Views::Opencti => 'o',
            Views::Email => 'e',
        }
    }

    fn from_hotkey(key: char) -> Option<Self> {
        Self::ALL.into_iter().find(|view| view.hotkey() == key)
    }

    fn position(&self) -> usize {
        Self::ALL
            .iter()
            .position(|view| view == self)
            .unwrap_or_default()
    }

    fn next(&self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    fn previous(&self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// The force action offered by a job view.
    pub fn force_action(&self) -> Option<Action> {
        match self {
            Views::Scrape => Some(Action::ForceScrape),
            Views::Github => Some(Action::ForceGithubUpload),
            Views::Opencti => Some(Action::ForceOpenctiImport),
            Views::Nodes | Views::Email => None,
        }
    }
}

pub struct App {
    pub should_quit: bool,
    pub event_tx: Option<UnboundedSender<Event>>,
    pub current_view: Views,

    pub dashboard_data: DashboardData,
    pub nodes: NodeTableState,
    pub buttons: Buttons,
    pub banners: Banners,
    pub email_form: EmailForm,

    // Help panel
    pub show_help: bool,

    // Node filter input
    pub search_mode: bool,
    pub search_query: String,

    pub http_client: Arc<HttpClient>,
    pub settings: Settings,

    stats_seq: RequestSequence,
    progress_poll: Option<ProgressPoll>,
}

impl App {
    pub fn new(config: Settings) -> Result<Self> {
        Ok(Self {
            current_view: Views::Scrape,
            should_quit: false,
            event_tx: None,
            dashboard_data: DashboardData::new(),
            nodes: NodeTableState::default(),
            buttons: Buttons::default(),
            banners: Banners::new(config.ui.banner_ttl()),
            email_form: EmailForm::default(),
            show_help: false,
            search_mode: false,
            search_query: String::new(),
            http_client: Arc::new(HttpClient::new(&config)?),
            settings: config,
            stats_seq: RequestSequence::default(),
            progress_poll: None,
        })
    }

    pub fn set_event_tx(&mut self, tx: UnboundedSender<Event>) {
        self.event_tx = Some(tx);
    }

    pub fn is_progress_polling(&self) -> bool {
        self.progress_poll.is_some()
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.on_key(key),
            Event::Tick => self.on_tick(),
            Event::Resize(_, _) => self.on_resize(),
            Event::PollStats => self.refresh_stats(),
            Event::ProgressPoll { remaining } => {
                tracing::debug!("OpenCTI progress poll, {remaining} left");
                self.refresh_stats();
                if remaining == 0 {
                    tracing::info!("OpenCTI progress poll exhausted");
                }
            }
            Event::DataLoaded { data } => self.on_data_loaded(data),
        }
    }

    pub fn on_tick(&mut self) {
        self.on_tick_at(Instant::now());
    }

    pub fn on_tick_at(&mut self, now: Instant) {
        self.buttons.restore_due(now);
        self.banners.expire(now);
        if self.progress_poll.as_ref().is_some_and(ProgressPoll::is_finished) {
            self.progress_poll = None;
        }
    }

    pub fn on_resize(&mut self) {
        if let Some(table) = self.nodes.table_mut() {
            table.adjust();
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        // Help panel takes priority
        if self.show_help {
            self.show_help = false;
            return;
        }

        if self.search_mode {
            self.on_search_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('?') | KeyCode::Char('h') => {
                self.show_help = true;
            }
            KeyCode::Tab => self.show_view(self.current_view.next()),
            KeyCode::BackTab => self.show_view(self.current_view.previous()),
            KeyCode::Char('r') => self.refresh_stats(),
            KeyCode::Char('x') => {
                self.banners.dismiss_latest(self.current_view);
            }
            KeyCode::Char(c) if Views::from_hotkey(c).is_some() => {
                if let Some(view) = Views::from_hotkey(c) {
                    self.show_view(view);
                }
            }
            _ => match self.current_view {
                Views::Scrape | Views::Github | Views::Opencti => self.on_job_key(key),
                Views::Nodes => self.on_nodes_key(key),
                Views::Email => self.on_email_key(key),
            },
        }
    }

    fn on_job_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('f') {
            if let Some(action) = self.current_view.force_action() {
                self.trigger(action);
            }
        }
    }

    fn on_email_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.email_form.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.email_form.move_down(),
            KeyCode::Char(' ') | KeyCode::Enter => self.email_form.toggle(),
            KeyCode::Char('w') => self.trigger(Action::SaveEmailSettings),
            KeyCode::Char('t') => self.trigger(Action::TestEmail),
            KeyCode::Char('T') => self.trigger(Action::TestSummaryEmail),
            _ => {}
        }
    }

    fn on_nodes_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('/') {
            self.search_mode = true;
            return;
        }
        let Some(table) = self.nodes.table_mut() else {
            return;
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => table.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => table.select_next(),
            KeyCode::Left | KeyCode::PageUp => table.previous_page(),
            KeyCode::Right | KeyCode::PageDown => table.next_page(),
            KeyCode::Char('[') => table.sort_previous_column(),
            KeyCode::Char(']') => table.sort_next_column(),
            KeyCode::Char('i') => table.toggle_order(),
            _ => {}
        }
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.search_mode = false,
            KeyCode::Esc => {
                self.search_mode = false;
                self.search_query.clear();
            }
            KeyCode::Backspace => {
                self.search_query.pop();
            }
            KeyCode::Char(c) => self.search_query.push(c),
            _ => return,
        }
        if let Some(table) = self.nodes.table_mut() {
            table.set_filter(&self.search_query);
        }
    }

    pub fn show_view(&mut self, view: Views) {
        self.current_view = view;
        if view != Views::Nodes {
            return;
        }
        match &mut self.nodes {
            NodeTableState::NotLoaded => self.load_nodes(),
            NodeTableState::Ready(table) => table.adjust(),
            NodeTableState::Loading | NodeTableState::Failed(_) => {}
        }
    }

    /// Dispatches a stats request. Its response is applied only if no newer
    /// response has been applied in the meantime.
    pub fn refresh_stats(&mut self) {
        let seq = self.stats_seq.next();
        let client = Arc::clone(&self.http_client);
        tracing::trace!("Requesting stats #{seq}");
        self.spawn_request(async move {
            let result = client.get_stats().await.map_err(|e| e.to_string());
            UiData::Stats { seq, result }
        });
    }

    pub fn load_nodes(&mut self) {
        let client = Arc::clone(&self.http_client);
        let delay = self.settings.ui.table_build_delay();
        let started = self.spawn_request(async move {
            let result = client.get_nodes().await.map_err(|e| e.to_string());
            if result.is_ok() && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            UiData::Nodes(result)
        });
        if started {
            tracing::info!("Loading node data");
            self.nodes = NodeTableState::Loading;
        }
    }

    /// Presses a button. Does nothing while the button is disabled.
    pub fn trigger(&mut self, action: Action) {
        if !self.buttons.begin(action) {
            tracing::debug!("{action:?} is already running");
            return;
        }
        tracing::info!("Triggering {action:?}");
        let client = Arc::clone(&self.http_client);
        let email = self.email_form.settings();
        let started = self.spawn_request(async move {
            let outcome = ActionOutcome::from_result(action.perform(&client, email).await);
            UiData::Action { action, outcome }
        });
        if !started {
            self.buttons.complete(action, None, Instant::now());
        }
    }

    fn spawn_request<F>(&self, request: F) -> bool
    where
        F: Future<Output = UiData> + Send + 'static,
    {
        let Some(tx) = self.event_tx.clone() else {
            tracing::warn!("Cannot dispatch a request, event_tx is not set");
            return false;
        };
        tokio::spawn(async move {
            let data = request.await;
            if let Err(e) = tx.send(Event::DataLoaded { data }) {
                tracing::error!("Failed to deliver loaded data: {e:?}");
            }
        });
        true
    }

    fn on_data_loaded(&mut self, data: UiData) {
        match data {
            UiData::Stats { seq, result } => self.on_stats(seq, result),
            UiData::Nodes(result) => self.on_nodes(result),
            UiData::Action { action, outcome } => {
                self.on_action_completed(action, outcome, Instant::now())
            }
        }
    }

    fn on_stats(&mut self, seq: u64, result: Result<StatsSnapshot, String>) {
        if !self.stats_seq.accept(seq) {
            tracing::debug!("Dropping stale stats response #{seq}");
            return;
        }
        let data = std::mem::take(&mut self.dashboard_data);
        match result {
            Ok(snapshot) => {
                if let Some(config) = &snapshot.config {
                    self.email_form.sync(config);
                }
                let finished = self
                    .progress_poll
                    .as_mut()
                    .is_some_and(|poll| poll.observe(seq, &snapshot));
                if finished {
                    tracing::info!("OpenCTI import finished, stopping the progress poll");
                    self.stop_progress_poll();
                }
                self.dashboard_data = data.with_snapshot(snapshot);
            }
            Err(e) => {
                tracing::error!("Failed to load the stats: {e}");
                self.dashboard_data = data.with_error(e);
            }
        }
    }

    fn on_nodes(&mut self, result: Result<NodesResponse, String>) {
        self.nodes = match result {
            Ok(response) => {
                tracing::info!("Loaded {} nodes", response.nodes.len());
                let mut table = NodeTable::new(&response, self.settings.ui.page_size);
                if !self.search_query.is_empty() {
                    table.set_filter(&self.search_query);
                }
                NodeTableState::Ready(table)
            }
            Err(e) => {
                tracing::error!("Failed to load the node data: {e}");
                NodeTableState::Failed(e)
            }
        };
    }

    pub fn on_action_completed(&mut self, action: Action, outcome: ActionOutcome, now: Instant) {
        self.buttons
            .complete(action, action.restore_delay(&self.settings), now);

        let (tone, message) = action.banner(&outcome);
        self.banners.push(action.view(), tone, message, now);

        if !outcome.is_success() {
            return;
        }
        if action == Action::SaveEmailSettings {
            self.email_form.mark_saved();
        }
        if action.starts_progress_poll() {
            self.start_progress_poll();
        }
        if action.refreshes_stats() {
            self.refresh_stats();
        }
        // only a table that has been shown is reloaded
        if action.reloads_nodes()
            && self.nodes.is_requested()
            && !matches!(self.nodes, NodeTableState::Loading)
        {
            self.load_nodes();
        }
    }

    fn start_progress_poll(&mut self) {
        self.stop_progress_poll();
        let Some(tx) = self.event_tx.clone() else {
            return;
        };
        tracing::info!("Starting the OpenCTI progress poll");
        self.progress_poll = Some(ProgressPoll::start(
            tx,
            self.settings.polling.progress_interval(),
            self.settings.polling.progress_max_polls,
            self.stats_seq.upcoming(),
        ));
    }

    fn stop_progress_poll(&mut self) {
        if let Some(poll) = self.progress_poll.take() {
            poll.cancel();
        }
    }

    pub fn shutdown(&mut self) {
        self.stop_progress_poll();
    }
}
