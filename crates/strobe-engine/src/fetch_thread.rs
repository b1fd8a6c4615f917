//! Background refills on a dedicated thread.
//!
//! ```text
//!   session thread                      strobe-fetch thread
//!     |                                   |
//!     |--ticket via req_tx [bounded(4)]-->| req_rx.recv()
//!     |                                   | source.fetch(request)
//!     |<--reply via reply_rx [bounded(4)]-| reply_tx.send(reply)
//!     | poll(): try_recv                  |
//! ```
//!
//! The fetch thread owns the [`FrameSource`] exclusively. It exits when
//! either channel closes. [`FetchThread`] closes both and joins the
//! thread on [`shutdown`](FetchThread::shutdown) or drop, so a worker
//! blocked on a full reply channel is released.

use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};
use strobe_core::{FetchError, FrameSource};

use crate::refill::{RefillPort, RefillReply, RefillTicket};

/// Depth of both channels. The session keeps at most one refill in
/// flight, so this only absorbs bursts from callers driving the port
/// directly.
const CHANNEL_DEPTH: usize = 4;

/// A [`RefillPort`] that runs its frame source on a background thread.
pub struct FetchThread {
    req_tx: Option<Sender<RefillTicket>>,
    reply_rx: Receiver<RefillReply>,
    handle: Option<JoinHandle<()>>,
    input_len: Option<u64>,
}

impl FetchThread {
    /// Move `source` onto a new `strobe-fetch` thread.
    pub fn spawn<S>(source: S) -> Result<Self, FetchError>
    where
        S: FrameSource + Send + 'static,
    {
        let input_len = source.input_len();
        let (req_tx, req_rx) = crossbeam_channel::bounded::<RefillTicket>(CHANNEL_DEPTH);
        let (reply_tx, reply_rx) = crossbeam_channel::bounded(CHANNEL_DEPTH);

        let handle = thread::Builder::new()
            .name("strobe-fetch".into())
            .spawn(move || fetch_loop(source, req_rx, reply_tx))
            .map_err(|e| FetchError::Unavailable {
                reason: format!("failed to spawn fetch thread: {e}"),
            })?;

        Ok(Self {
            req_tx: Some(req_tx),
            reply_rx,
            handle: Some(handle),
            input_len,
        })
    }

    /// Block up to `timeout` for the next reply.
    pub fn wait(&mut self, timeout: Duration) -> Option<RefillReply> {
        match self.reply_rx.recv_timeout(timeout) {
            Ok(reply) => Some(reply),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Whether the fetch thread is still running.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Close both channels and join the thread. Idempotent.
    ///
    /// A fetch already in progress runs to completion first. Its reply
    /// and any replies not yet polled are discarded.
    pub fn shutdown(&mut self) {
        self.req_tx = None;
        drop(std::mem::replace(&mut self.reply_rx, crossbeam_channel::never()));
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("fetch thread panicked");
            }
        }
    }
}

impl RefillPort for FetchThread {
    fn request(&mut self, ticket: RefillTicket) -> Result<(), FetchError> {
        let tx = self.req_tx.as_ref().ok_or(FetchError::Disconnected)?;
        match tx.try_send(ticket) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(FetchError::Unavailable {
                reason: "fetch queue full".into(),
            }),
            Err(TrySendError::Disconnected(_)) => Err(FetchError::Disconnected),
        }
    }

    fn poll(&mut self) -> Option<RefillReply> {
        self.reply_rx.try_recv().ok()
    }

    fn input_len(&self) -> Option<u64> {
        self.input_len
    }
}

impl Drop for FetchThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for FetchThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchThread")
            .field("running", &self.is_running())
            .field("input_len", &self.input_len)
            .finish()
    }
}

fn fetch_loop<S: FrameSource>(
    mut source: S,
    req_rx: Receiver<RefillTicket>,
    reply_tx: Sender<RefillReply>,
) {
    while let Ok(ticket) = req_rx.recv() {
        tracing::debug!(
            start = ticket.request.start.0,
            len = ticket.request.len,
            "fetching batch"
        );
        let result = source.fetch(ticket.request);
        if reply_tx.send(RefillReply { ticket, result }).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;
    use strobe_core::{BatchRequest, CycleId, Frame, FrameBatch};

    struct Echo;

    impl FrameSource for Echo {
        fn fetch(&mut self, request: BatchRequest) -> Result<FrameBatch, FetchError> {
            let frames = (0..request.len).map(|_| Arc::new(Frame::new(b'e'))).collect();
            FrameBatch::starting_at(request.start, frames).ok_or(FetchError::Disconnected)
        }

        fn input_len(&self) -> Option<u64> {
            Some(1_000)
        }
    }

    fn ticket(generation: u64, start: u64) -> RefillTicket {
        RefillTicket {
            generation,
            request: BatchRequest {
                start: CycleId(start),
                len: 3,
            },
        }
    }

    #[test]
    fn reply_comes_back_from_worker() {
        let mut port = FetchThread::spawn(Echo).unwrap();
        assert_eq!(port.input_len(), Some(1_000));
        port.request(ticket(2, 40)).unwrap();
        let reply = port.wait(Duration::from_secs(5)).unwrap();
        assert_eq!(reply.ticket.generation, 2);
        assert_eq!(reply.result.unwrap().high_water_mark, CycleId(42));
    }

    #[test]
    fn replies_preserve_request_order() {
        let mut port = FetchThread::spawn(Echo).unwrap();
        for start in [0, 10, 20] {
            port.request(ticket(0, start)).unwrap();
        }
        let starts: Vec<u64> = (0..3)
            .filter_map(|_| port.wait(Duration::from_secs(5)))
            .map(|r| r.ticket.request.start.0)
            .collect();
        assert_eq!(starts, [0, 10, 20]);
    }

    #[test]
    fn drop_does_not_block_on_unpolled_replies() {
        let mut port = FetchThread::spawn(Echo).unwrap();
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut accepted = 0;
        while accepted < 2 * CHANNEL_DEPTH + 1 {
            match port.request(ticket(0, accepted as u64)) {
                Ok(()) => accepted += 1,
                Err(FetchError::Unavailable { .. }) => {
                    assert!(Instant::now() < deadline, "worker stopped draining requests");
                    thread::sleep(Duration::from_millis(1));
                }
                Err(e) => panic!("unexpected {e:?}"),
            }
        }

        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        thread::spawn(move || {
            drop(port);
            let _ = done_tx.send(());
        });
        assert!(done_rx.recv_timeout(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn shutdown_joins_and_rejects_requests() {
        let mut port = FetchThread::spawn(Echo).unwrap();
        port.shutdown();
        assert!(!port.is_running());
        assert_eq!(port.request(ticket(0, 0)), Err(FetchError::Disconnected));
        port.shutdown();
    }
}
