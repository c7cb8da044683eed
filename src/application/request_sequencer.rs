use derive_more::Display;
use futures::future::{AbortHandle, Abortable};
use std::future::Future;

/// Identifies one data search. Only the most recent ticket may render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "request#{}", _0)]
pub struct RequestTicket(u64);

/// Orders overlapping searches so that the latest one wins.
///
/// Starting a request aborts the one before it; its future resolves to
/// `Err(Aborted)` instead of a result.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
    in_flight: Option<AbortHandle>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for `fetch` and supersede any request still running.
    pub fn begin<F: Future>(&mut self, fetch: F) -> (RequestTicket, Abortable<F>) {
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }
        self.latest += 1;
        let (handle, registration) = AbortHandle::new_pair();
        self.in_flight = Some(handle);
        (RequestTicket(self.latest), Abortable::new(fetch, registration))
    }

    pub fn is_latest(&self, ticket: RequestTicket) -> bool {
        ticket.0 == self.latest
    }

    /// Mark `ticket` as completed. Returns whether it is still the latest.
    pub fn finish(&mut self, ticket: RequestTicket) -> bool {
        let latest = self.is_latest(ticket);
        if latest {
            self.in_flight = None;
        }
        latest
    }

    pub fn has_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }
}
