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

//! In-process stand-in for the collector service's REST API.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};

use ratatui::{backend::TestBackend, Terminal};

use crate::{app::App, infrastructure::Settings, ui};

/// Defaults with zero delays so tests never wait on UI timers.
pub fn test_settings(url: &str) -> Settings {
    let mut settings = Settings::defaults()
        .expect("built-in defaults should parse")
        .with_server_url(url);
    settings.ui.table_build_delay = 0;
    settings
}

/// Draws one frame and returns the screen as text, one line per row.
pub fn render_to_string(app: &App, width: u16, height: u16) -> String {
    let mut terminal =
        Terminal::new(TestBackend::new(width, height)).expect("test terminal");
    terminal
        .draw(|f| ui::render(f, app))
        .expect("draw a frame");
    let buffer = terminal.backend().buffer();
    (0..height)
        .map(|y| {
            (0..width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub body: String,
}

#[derive(Clone)]
struct MockResponse {
    status: StatusCode,
    body: String,
    delay: Duration,
}

#[derive(Default)]
struct MockState {
    routes: HashMap<(String, String), MockResponse>,
    requests: HashMap<String, Vec<RecordedRequest>>,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    state: Arc<Mutex<MockState>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, method: &str, path: &str, status: u16, body: serde_json::Value) {
        self.register(method, path, status, body.to_string(), Duration::ZERO);
    }

    pub fn on_raw(&self, method: &str, path: &str, status: u16, body: &str) {
        self.register(method, path, status, body.to_string(), Duration::ZERO);
    }

    pub fn on_delayed(
        &self,
        method: &str,
        path: &str,
        status: u16,
        body: serde_json::Value,
        delay: Duration,
    ) {
        self.register(method, path, status, body.to_string(), delay);
    }

    fn register(&self, method: &str, path: &str, status: u16, body: String, delay: Duration) {
        let response = MockResponse {
            status: StatusCode::from_u16(status).expect("valid status code"),
            body,
            delay,
        };
        self.state
            .lock()
            .expect("mock state lock")
            .routes
            .insert((method.to_string(), path.to_string()), response);
    }

    pub fn requests(&self, path: &str) -> Vec<RecordedRequest> {
        self.state
            .lock()
            .expect("mock state lock")
            .requests
            .get(path)
            .cloned()
            .unwrap_or_default()
    }

    /// Binds an ephemeral port and returns the base URL.
    pub async fn start(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock backend");
        let addr = listener.local_addr().expect("mock backend address");
        let router = Router::new().fallback(handle).with_state(self.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{addr}")
    }
}

async fn handle(
    State(backend): State<MockBackend>,
    method: Method,
    uri: Uri,
    body: String,
) -> Response {
    let path = uri.path().to_string();
    let response = {
        let mut state = backend.state.lock().expect("mock state lock");
        state
            .requests
            .entry(path.clone())
            .or_default()
            .push(RecordedRequest {
                method: method.to_string(),
                body,
            });
        state.routes.get(&(method.to_string(), path)).cloned()
    };

    match response {
        Some(response) => {
            if !response.delay.is_zero() {
                tokio::time::sleep(response.delay).await;
            }
            (
                response.status,
                [(CONTENT_TYPE, "application/json")],
                response.body,
            )
                .into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
