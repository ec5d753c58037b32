use std::collections::{HashMap, HashSet, VecDeque};
use uuid::Uuid;

use super::types::{BridgeRequest, BridgeResponse};

/// Requests waiting for the page, requests the page is working on, and their responses.
#[derive(Debug, Default)]
pub(crate) struct RequestQueue {
    pending: VecDeque<BridgeRequest>,
    in_flight: HashSet<Uuid>,
    responses: HashMap<Uuid, BridgeResponse>,
}

impl RequestQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a request for the page.
    pub fn add_request(&mut self, request: BridgeRequest) {
        self.pending.push_back(request);
    }

    /// Hands the oldest pending request to the page.
    pub fn take_request(&mut self) -> Option<BridgeRequest> {
        let request = self.pending.pop_front()?;
        self.in_flight.insert(request.id);
        Some(request)
    }

    /// Returns `true` if the request is pending or in flight.
    pub fn has_request(&self, id: &Uuid) -> bool {
        self.in_flight.contains(id) || self.pending.iter().any(|request| request.id == *id)
    }

    /// Drops a request and any response to it.
    pub fn remove_request(&mut self, id: &Uuid) {
        self.pending.retain(|request| request.id != *id);
        self.in_flight.remove(id);
        self.responses.remove(id);
    }

    /// Stores the page's response and retires the request.
    ///
    /// Returns `false` if the id does not belong to a known request.
    pub fn add_response(&mut self, response: BridgeResponse) -> bool {
        let id = response.id;
        if !self.has_request(&id) {
            return false;
        }
        self.pending.retain(|request| request.id != id);
        self.in_flight.remove(&id);
        self.responses.insert(id, response);
        true
    }

    /// Takes the response to `id`, if it arrived.
    pub fn take_response(&mut self, id: &Uuid) -> Option<BridgeResponse> {
        self.responses.remove(id)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.in_flight.is_empty()
    }
}
