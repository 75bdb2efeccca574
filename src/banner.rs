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

use std::time::{Duration, Instant};

use ratatui::style::Color;

use crate::app::Views;

/// Colour family shared by banners, status badges and history entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Success,
    Warning,
    Danger,
    Info,
}

impl Tone {
    pub fn color(&self) -> Color {
        match self {
            Tone::Success => Color::Green,
            Tone::Warning => Color::Yellow,
            Tone::Danger => Color::Red,
            Tone::Info => Color::Cyan,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Banner {
    pub view: Views,
    pub tone: Tone,
    pub message: String,
    inserted: Instant,
}

/// Transient messages shown at the top of a view.
///
/// Every banner arms a fade timer when inserted; when any timer fires, all
/// banners visible at that moment disappear together.
#[derive(Debug)]
pub struct Banners {
    items: Vec<Banner>,
    ttl: Duration,
}

impl Banners {
    pub fn new(ttl: Duration) -> Self {
        Self {
            items: Vec::new(),
            ttl,
        }
    }

    pub fn push(&mut self, view: Views, tone: Tone, message: String, now: Instant) {
        tracing::debug!("Banner on {view:?} ({tone:?}): {message}");
        self.items.push(Banner {
            view,
            tone,
            message,
            inserted: now,
        });
    }

    /// Banners of `view`, newest first.
    pub fn for_view(&self, view: Views) -> impl Iterator<Item = &Banner> {
        self.items.iter().rev().filter(move |b| b.view == view)
    }

    /// Manual dismissal of the newest banner of `view`.
    pub fn dismiss_latest(&mut self, view: Views) -> bool {
        match self.items.iter().rposition(|b| b.view == view) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns true when banners were faded.
    pub fn expire(&mut self, now: Instant) -> bool {
        let fired = self
            .items
            .iter()
            .any(|b| now.saturating_duration_since(b.inserted) >= self.ttl);
        if fired {
            self.items.clear();
        }
        fired
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(5);

    #[test]
    fn newest_banner_is_shown_first() {
        let now = Instant::now();
        let mut banners = Banners::new(TTL);
        banners.push(Views::Scrape, Tone::Success, "first".to_string(), now);
        banners.push(Views::Github, Tone::Danger, "other view".to_string(), now);
        banners.push(Views::Scrape, Tone::Warning, "second".to_string(), now);

        let messages: Vec<_> = banners
            .for_view(Views::Scrape)
            .map(|b| b.message.as_str())
            .collect();
        assert_eq!(messages, vec!["second", "first"]);
    }

    #[test]
    fn all_visible_banners_fade_when_the_first_timer_fires() {
        let start = Instant::now();
        let mut banners = Banners::new(TTL);
        banners.push(Views::Scrape, Tone::Success, "old".to_string(), start);
        banners.push(
            Views::Email,
            Tone::Info,
            "recent".to_string(),
            start + Duration::from_secs(4),
        );

        assert!(!banners.expire(start + Duration::from_millis(4999)));
        assert_eq!(banners.for_view(Views::Email).count(), 1);

        assert!(banners.expire(start + TTL));
        assert!(banners.is_empty());
    }

    #[test]
    fn banners_are_not_deduplicated() {
        let now = Instant::now();
        let mut banners = Banners::new(TTL);
        for _ in 0..3 {
            banners.push(Views::Opencti, Tone::Danger, "same".to_string(), now);
        }
        assert_eq!(banners.for_view(Views::Opencti).count(), 3);
    }

    #[test]
    fn dismiss_removes_newest_of_the_view() {
        let now = Instant::now();
        let mut banners = Banners::new(TTL);
        banners.push(Views::Scrape, Tone::Success, "a".to_string(), now);
        banners.push(Views::Scrape, Tone::Danger, "b".to_string(), now);

        assert!(banners.dismiss_latest(Views::Scrape));
        let left: Vec<_> = banners
            .for_view(Views::Scrape)
            .map(|b| b.message.as_str())
            .collect();
        assert_eq!(left, vec!["a"]);
        assert!(!banners.dismiss_latest(Views::Nodes));
    }
}
