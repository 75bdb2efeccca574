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

use reqwest::StatusCode;
use tokio::sync::mpsc::error::SendError;

use crate::{domain::ErrorBody, event::Event};

#[derive(Debug)]
pub enum TuiError {
    Reqwest(reqwest::Error),
    /// The backend answered with a non-2xx status.
    Status {
        status: StatusCode,
        body: ErrorBody,
    },
    /// A 2xx response whose body did not decode.
    Decode {
        status: StatusCode,
        source: serde_json::Error,
    },
    SendError(SendError<Event>),
}

impl TuiError {
    /// The HTTP status of the failed exchange, if the backend answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            TuiError::Status { status, .. } | TuiError::Decode { status, .. } => Some(*status),
            TuiError::Reqwest(err) => err.status(),
            _ => None,
        }
    }

    /// The server supplied message of an error body, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            TuiError::Status { body, .. } => body.message.as_deref(),
            _ => None,
        }
    }
}

impl std::fmt::Display for TuiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TuiError::Reqwest(err) => write!(f, "Reqwest error: {}", err),
            TuiError::Status { status, body } => match &body.message {
                Some(message) => write!(f, "HTTP {}: {}", status, message),
                None => write!(f, "HTTP {}", status),
            },
            TuiError::Decode { status, source } => {
                write!(f, "Invalid response body (HTTP {}): {}", status, source)
            }
            TuiError::SendError(err) => write!(f, "Send error: {}", err),
        }
    }
}

impl std::error::Error for TuiError {}

impl From<reqwest::Error> for TuiError {
    fn from(err: reqwest::Error) -> Self {
        TuiError::Reqwest(err)
    }
}

impl From<SendError<Event>> for TuiError {
    fn from(err: SendError<Event>) -> Self {
        TuiError::SendError(err)
    }
}
