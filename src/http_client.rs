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

use std::time::Duration;

use color_eyre::eyre::Result;
use reqwest::{Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    domain::{
        ActionResponse, EmailSettings, ErrorBody, NodesResponse, StatsSnapshot,
        TestEmailKind, TestEmailRequest,
    },
    error::TuiError,
    infrastructure::Settings,
    TuiResult,
};

pub struct HttpClient {
    server_url: String,
    client: reqwest::Client,
    action_timeout: Duration,
    import_timeout: Duration,
}

impl HttpClient {
    pub fn new(config: &Settings) -> Result<Self> {
        Ok(Self {
            server_url: config.server.url.trim_end_matches('/').to_string(),
            client: Client::builder().timeout(config.http.timeout()).build()?,
            action_timeout: config.http.action_timeout(),
            import_timeout: config.http.import_timeout(),
        })
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub async fn get_stats(&self) -> TuiResult<StatsSnapshot> {
        let url = self.url("stats");
        self.json::<StatsSnapshot>(self.client.get(&url)).await
    }

    pub async fn get_nodes(&self) -> TuiResult<NodesResponse> {
        let url = self.url("nodes");
        self.json::<NodesResponse>(self.client.get(&url)).await
    }

    pub async fn force_scrape(&self) -> TuiResult<ActionResponse> {
        self.post::<()>("force-scrape", None, self.action_timeout)
            .await
    }

    pub async fn force_upload_github(&self) -> TuiResult<ActionResponse> {
        self.post::<()>("force-upload-github", None, self.action_timeout)
            .await
    }

    /// Only starts the import; the backend runs it in the background.
    pub async fn force_upload_opencti(&self) -> TuiResult<ActionResponse> {
        self.post::<()>("force-upload-opencti", None, self.import_timeout)
            .await
    }

    pub async fn save_email_settings(
        &self,
        settings: &EmailSettings,
    ) -> TuiResult<ActionResponse> {
        self.post("email-settings", Some(settings), self.action_timeout)
            .await
    }

    pub async fn send_test_email(&self, kind: TestEmailKind) -> TuiResult<ActionResponse> {
        let body = TestEmailRequest { kind };
        self.post("test-email", Some(&body), self.action_timeout)
            .await
    }

    async fn post<B>(
        &self,
        path: &str,
        body: Option<&B>,
        timeout: Duration,
    ) -> TuiResult<ActionResponse>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        let mut request = self.client.post(&url).timeout(timeout);
        if let Some(body) = body {
            request = request.json(body);
        }
        self.json::<ActionResponse>(request).await
    }

    async fn json<R>(&self, request: RequestBuilder) -> TuiResult<R>
    where
        R: std::fmt::Debug + DeserializeOwned,
    {
        let response = self.send(request).await?;
        let status = response.status();
        if !status.is_success() {
            let bytes = response.bytes().await.unwrap_or_default();
            let body = ErrorBody::parse(&bytes);
            tracing::error!("HTTP error status: {status}, body: {body:?}");
            return Err(TuiError::Status { status, body });
        }

        let bytes = response.bytes().await.map_err(TuiError::Reqwest)?;
        serde_json::from_slice::<R>(&bytes)
            .map_err(|source| TuiError::Decode { status, source })
            .inspect(|data| tracing::trace!("Loaded: {data:?}"))
            .inspect_err(|err| tracing::error!("The HTTP request failed: {err:?}"))
    }

    async fn send(&self, request: RequestBuilder) -> TuiResult<Response> {
        let request = request.build().map_err(TuiError::Reqwest)?;
        tracing::trace!("Going to make a {} request to {}", request.method(), request.url());
        self.client
            .execute(request)
            .await
            .inspect(|data| tracing::trace!("Got: {data:?}"))
            .inspect_err(|err| tracing::error!("The HTTP request failed: {err:?}"))
            .map_err(TuiError::Reqwest)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.server_url, path)
    }
}
