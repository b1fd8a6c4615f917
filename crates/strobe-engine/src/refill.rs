//! Refill ports: how a session asks for the next batch of frames.
//!
//! The session never calls a [`FrameSource`] directly. It hands a
//! [`RefillTicket`] to a [`RefillPort`] and later collects the
//! [`RefillReply`] with [`poll`](RefillPort::poll), between steps. This
//! keeps window replacement on the session's own thread no matter where
//! the fetch actually runs.
//!
//! Tickets carry the session's generation, bumped on every reset, so a
//! batch fetched for a previous input is recognised and dropped.

use std::collections::VecDeque;

use strobe_core::{BatchRequest, FetchError, FrameBatch, FrameSource};

/// A refill request tagged with the session generation that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefillTicket {
    /// Session generation at request time.
    pub generation: u64,
    /// The batch wanted.
    pub request: BatchRequest,
}

/// The outcome of one refill.
#[derive(Clone, Debug, PartialEq)]
pub struct RefillReply {
    /// The ticket this answers.
    pub ticket: RefillTicket,
    /// The batch, or why there is none.
    pub result: Result<FrameBatch, FetchError>,
}

/// Asynchronous channel to a frame provider.
pub trait RefillPort {
    /// Start fetching `ticket.request`.
    ///
    /// An error means the request was not accepted and no reply will
    /// follow for it.
    fn request(&mut self, ticket: RefillTicket) -> Result<(), FetchError>;

    /// Collect one finished refill, if any. Never blocks.
    fn poll(&mut self) -> Option<RefillReply>;

    /// Total number of cycles in the input, if the provider knows it.
    fn input_len(&self) -> Option<u64> {
        None
    }
}

impl<P: RefillPort + ?Sized> RefillPort for Box<P> {
    fn request(&mut self, ticket: RefillTicket) -> Result<(), FetchError> {
        (**self).request(ticket)
    }

    fn poll(&mut self) -> Option<RefillReply> {
        (**self).poll()
    }

    fn input_len(&self) -> Option<u64> {
        (**self).input_len()
    }
}

// ── InlineRefill ───────────────────────────────────────────────────

/// Fetches synchronously inside [`request`](RefillPort::request); the
/// reply is handed back on the next [`poll`](RefillPort::poll).
///
/// Suited to in-memory sources and to deterministic tests.
#[derive(Debug)]
pub struct InlineRefill<S> {
    source: S,
    ready: VecDeque<RefillReply>,
}

impl<S: FrameSource> InlineRefill<S> {
    /// Wrap a frame source.
    pub fn new(source: S) -> Self {
        Self {
            source,
            ready: VecDeque::new(),
        }
    }

    /// The wrapped source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Unwrap the source, dropping any uncollected replies.
    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: FrameSource> RefillPort for InlineRefill<S> {
    fn request(&mut self, ticket: RefillTicket) -> Result<(), FetchError> {
        let result = self.source.fetch(ticket.request);
        self.ready.push_back(RefillReply { ticket, result });
        Ok(())
    }

    fn poll(&mut self) -> Option<RefillReply> {
        self.ready.pop_front()
    }

    fn input_len(&self) -> Option<u64> {
        self.source.input_len()
    }
}
