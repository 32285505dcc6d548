// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Outbox
//!
//! The bounded, timeout-aware FIFO queue between two adjacent stages.
//! Backed by a `tokio::sync::mpsc::channel`, which already gives strict
//! per-producer FIFO ordering and backpressure; `Outbox` adds the
//! timed `put`/`get` and close-then-drain semantics spec §4.2 requires.
//!
//! Single producer, single consumer per instance, as the spec mandates —
//! the sender and receiver halves are each behind their own
//! `tokio::sync::Mutex` purely so `close()` can take the sender out from
//! under a `&self` reference; neither mutex is ever contended, since only
//! one task ever calls `put` and only one ever calls `get`.

use graphflow_domain::error::PipelineError;
use graphflow_domain::stage::Envelope;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

/// The three things `Outbox::get` can yield: an item, upstream-closed
/// (`End`), or nothing arrived before the timeout (`Empty`) — not a
/// failure, just a cue for the caller to re-run its precheck and retry.
#[derive(Debug)]
pub enum Poll<T> {
    Delivered(Envelope<T>),
    End,
    Empty,
}

/// The bounded FIFO between two adjacent `StageExecutor`s.
pub struct Outbox<T> {
    sender: Mutex<Option<mpsc::Sender<Envelope<T>>>>,
    receiver: Mutex<mpsc::Receiver<Envelope<T>>>,
}

impl<T: Send + 'static> Outbox<T> {
    /// Creates a new outbox with room for `capacity` items (`capacity >=
    /// 1`, per spec §4.2).
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        Self {
            sender: Mutex::new(Some(sender)),
            receiver: Mutex::new(receiver),
        }
    }

    /// Enqueues `item`, waiting up to `timeout` for room.
    ///
    /// - `Err(OutboxTimeout)` — capacity stayed exhausted for the whole
    ///   timeout.
    /// - `Err(OutboxClosed)` — `close()` has already been called.
    pub async fn put(&self, item: Envelope<T>, timeout: Duration) -> Result<(), PipelineError> {
        let guard = self.sender.lock().await;
        let Some(sender) = guard.as_ref() else {
            return Err(PipelineError::OutboxClosed);
        };

        match tokio::time::timeout(timeout, sender.send(item)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(PipelineError::OutboxClosed),
            Err(_elapsed) => Err(PipelineError::OutboxTimeout),
        }
    }

    /// Waits up to `timeout` for the next item.
    ///
    /// Returns `Poll::Empty` (not an error) on timeout, so callers can
    /// re-check the failure-observer precheck and retry; `Poll::End` once
    /// the sender has closed and every buffered item has drained.
    pub async fn get(&self, timeout: Duration) -> Poll<T> {
        let mut guard = self.receiver.lock().await;
        match tokio::time::timeout(timeout, guard.recv()).await {
            Ok(Some(item)) => Poll::Delivered(item),
            Ok(None) => Poll::End,
            Err(_elapsed) => Poll::Empty,
        }
    }

    /// Closes the producer side. Buffered items already in the channel
    /// still drain via `get`; once drained, `get` returns `Poll::End`.
    /// Further `put` calls fail with `OutboxClosed`. Idempotent.
    pub async fn close(&self) {
        self.sender.lock().await.take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(n: i32) -> Envelope<i32> {
        Envelope::Item(n)
    }

    #[tokio::test]
    async fn strict_fifo_within_one_producer() {
        let outbox = Outbox::new(4);
        outbox.put(item(1), Duration::from_millis(50)).await.unwrap();
        outbox.put(item(2), Duration::from_millis(50)).await.unwrap();
        outbox.put(Envelope::Flush, Duration::from_millis(50)).await.unwrap();
        outbox.put(item(3), Duration::from_millis(50)).await.unwrap();

        for expected in [item(1).is_flush(), item(2).is_flush(), true, item(3).is_flush()] {
            match outbox.get(Duration::from_millis(50)).await {
                Poll::Delivered(got) => assert_eq!(got.is_flush(), expected),
                other => panic!("expected a delivered item, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn put_times_out_when_full_and_uncollected() {
        let outbox: Outbox<i32> = Outbox::new(1);
        outbox.put(item(1), Duration::from_millis(50)).await.unwrap();
        let result = outbox.put(item(2), Duration::from_millis(50)).await;
        assert!(matches!(result, Err(PipelineError::OutboxTimeout)));
    }

    #[tokio::test]
    async fn get_returns_empty_on_timeout_not_an_error() {
        let outbox: Outbox<i32> = Outbox::new(1);
        assert!(matches!(outbox.get(Duration::from_millis(20)).await, Poll::Empty));
    }

    #[tokio::test]
    async fn close_drains_then_ends() {
        let outbox = Outbox::new(4);
        outbox.put(item(1), Duration::from_millis(50)).await.unwrap();
        outbox.close().await;

        assert!(matches!(outbox.get(Duration::from_millis(50)).await, Poll::Delivered(_)));
        assert!(matches!(outbox.get(Duration::from_millis(50)).await, Poll::End));
    }

    #[tokio::test]
    async fn put_after_close_fails() {
        let outbox: Outbox<i32> = Outbox::new(4);
        outbox.close().await;
        let result = outbox.put(item(1), Duration::from_millis(50)).await;
        assert!(matches!(result, Err(PipelineError::OutboxClosed)));
    }
}

#[cfg(test)]
mod outbox_properties {
    use super::*;
    use proptest::prelude::*;

    /// Spec §4.2's "strict FIFO per producer", generalized over any run of
    /// puts: draining an `Outbox` after an arbitrary sequence of items (of
    /// any capacity large enough to hold them all without blocking) always
    /// yields them back in the same order they were put.
    proptest! {
        #[test]
        fn get_returns_items_in_put_order(values in prop::collection::vec(any::<i32>(), 0..64)) {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            runtime.block_on(async {
                let outbox = Outbox::new(values.len().max(1));
                for &v in &values {
                    outbox.put(Envelope::Item(v), Duration::from_millis(200)).await.unwrap();
                }
                outbox.close().await;

                let mut drained = Vec::new();
                loop {
                    match outbox.get(Duration::from_millis(200)).await {
                        Poll::Delivered(Envelope::Item(v)) => drained.push(v),
                        Poll::Delivered(Envelope::Flush) => unreachable!("no flush was ever put"),
                        Poll::End => break,
                        Poll::Empty => panic!("get timed out on an already-closed, fully-buffered outbox"),
                    }
                }

                prop_assert_eq!(drained, values);
                Ok(())
            })?;
        }
    }
}
