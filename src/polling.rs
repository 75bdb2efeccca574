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

//! Timers feeding stats refreshes into the event loop.

use std::time::Duration;

use tokio::{sync::mpsc::UnboundedSender, task::JoinHandle};

use crate::{domain::StatsSnapshot, event::Event};

/// Orders stats responses so that a slow reply never overwrites a newer one.
#[derive(Debug, Default)]
pub struct RequestSequence {
    dispatched: u64,
    applied: u64,
}

impl RequestSequence {
    pub fn next(&mut self) -> u64 {
        self.dispatched += 1;
        self.dispatched
    }

    /// The sequence number the next dispatched request will get.
    pub fn upcoming(&self) -> u64 {
        self.dispatched + 1
    }

    /// Returns true if the response of request `seq` should be applied.
    pub fn accept(&mut self, seq: u64) -> bool {
        if seq <= self.applied {
            return false;
        }
        self.applied = seq;
        true
    }
}

/// Emits `PollStats` right away and then once per `interval`.
pub fn spawn_stats_poller(tx: UnboundedSender<Event>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(interval);
        loop {
            interval.tick().await;
            if tx.send(Event::PollStats).is_err() {
                break;
            }
        }
    })
}

type RunKey = (Option<String>, Option<String>);

#[derive(Debug, PartialEq)]
enum Baseline {
    Unset,
    Newest(Option<RunKey>),
}

/// Bounded follow-up refresh while an OpenCTI import runs in the background.
#[derive(Debug)]
pub struct ProgressPoll {
    handle: JoinHandle<()>,
    first_seq: u64,
    baseline: Baseline,
}

impl ProgressPoll {
    /// Only snapshots of requests numbered `first_seq` or later are observed.
    pub fn start(
        tx: UnboundedSender<Event>,
        interval: Duration,
        max_polls: u32,
        first_seq: u64,
    ) -> Self {
        let handle = tokio::spawn(async move {
            for remaining in (0..max_polls).rev() {
                tokio::time::sleep(interval).await;
                if tx.send(Event::ProgressPoll { remaining }).is_err() {
                    break;
                }
            }
        });
        Self {
            handle,
            first_seq,
            baseline: Baseline::Unset,
        }
    }

    /// Feeds an applied snapshot. Returns true once the newest import run
    /// differs from the one seen right after the import started.
    pub fn observe(&mut self, seq: u64, snapshot: &StatsSnapshot) -> bool {
        if seq < self.first_seq {
            return false;
        }
        let newest = snapshot
            .opencti_history
            .first()
            .map(|item| {
                let (timestamp, message) = item.key();
                (timestamp.map(str::to_string), message.map(str::to_string))
            });
        match &self.baseline {
            Baseline::Unset => {
                self.baseline = Baseline::Newest(newest);
                false
            }
            Baseline::Newest(previous) => *previous != newest,
        }
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ProgressPoll {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::HistoryItem;
    use tokio::sync::mpsc;

    fn snapshot_with_import(timestamp: &str, message: &str) -> StatsSnapshot {
        StatsSnapshot {
            opencti_history: vec![HistoryItem {
                timestamp: Some(timestamp.to_string()),
                status: Some("success".to_string()),
                message: Some(message.to_string()),
                ..HistoryItem::default()
            }],
            ..StatsSnapshot::default()
        }
    }

    #[test]
    fn stale_responses_are_rejected() {
        let mut seq = RequestSequence::default();
        let first = seq.next();
        let second = seq.next();
        assert_eq!(seq.upcoming(), 3);

        assert!(seq.accept(second));
        assert!(!seq.accept(first));
        assert!(!seq.accept(second));
        let third = seq.next();
        assert!(seq.accept(third));
    }

    #[tokio::test]
    async fn stats_poller_fires_immediately() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_stats_poller(tx, Duration::from_secs(3600));

        let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert!(matches!(event, Some(Event::PollStats)));
        handle.abort();
    }

    #[tokio::test]
    async fn progress_poll_is_bounded() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let poll = ProgressPoll::start(tx, Duration::from_millis(5), 3, 1);

        let mut remaining = Vec::new();
        while let Some(event) = rx.recv().await {
            if let Event::ProgressPoll { remaining: left } = event {
                remaining.push(left);
            }
        }
        assert_eq!(remaining, vec![2, 1, 0]);
        tokio::time::timeout(Duration::from_secs(1), async {
            while !poll.is_finished() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn cancelled_progress_poll_stops_emitting() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let poll = ProgressPoll::start(tx, Duration::from_millis(50), 30, 1);
        poll.cancel();

        // the sender is dropped with the aborted task
        let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert!(event.is_none());
    }

    #[tokio::test]
    async fn completion_is_a_change_of_the_newest_import_run() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut poll = ProgressPoll::start(tx, Duration::from_secs(3600), 30, 5);

        let before = snapshot_with_import("2026-10-18T08:00:00", "Imported 6900 nodes");
        let after = snapshot_with_import("2026-10-18T10:15:00", "Imported 7012 nodes");

        assert!(!poll.observe(4, &after), "older requests are ignored");
        assert!(!poll.observe(5, &before));
        assert!(!poll.observe(6, &before));
        assert!(poll.observe(7, &after));
    }

    #[tokio::test]
    async fn first_import_run_counts_as_completion() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut poll = ProgressPoll::start(tx, Duration::from_secs(3600), 30, 1);

        assert!(!poll.observe(1, &StatsSnapshot::default()));
        assert!(poll.observe(
            2,
            &snapshot_with_import("2026-10-18T10:15:00", "Imported 7012 nodes")
        ));
    }
}
