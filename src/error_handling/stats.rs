//! Gateway statistics tracking.
//!
//! This module provides thread-safe counters for the events in a request's
//! lifecycle: submission, cancellation, dispatch, cache traffic, failures and
//! completion.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use strum::IntoEnumIterator;
use strum_macros::EnumIter as EnumIterMacro;

/// Events counted by [`GatewayStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum GatewayEvent {
    Submitted,
    Cancelled,
    Dispatched,
    CacheHit,
    CacheMiss,
    CacheStore,
    TransportError,
    ProtocolViolation,
    ProcessorError,
    Completed,
    /// A request issued by another gateway was handed to this one
    ForeignRequest,
}

impl std::fmt::Display for GatewayEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl GatewayEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayEvent::Submitted => "Submitted",
            GatewayEvent::Cancelled => "Cancelled",
            GatewayEvent::Dispatched => "Dispatched",
            GatewayEvent::CacheHit => "Cache hit",
            GatewayEvent::CacheMiss => "Cache miss",
            GatewayEvent::CacheStore => "Cache store",
            GatewayEvent::TransportError => "Transport error",
            GatewayEvent::ProtocolViolation => "Protocol violation",
            GatewayEvent::ProcessorError => "Processor error",
            GatewayEvent::Completed => "Completed",
            GatewayEvent::ForeignRequest => "Foreign request",
        }
    }
}

/// Thread-safe gateway statistics tracker.
///
/// Every event type is initialized to zero on creation, so counters can be
/// bumped from any task through a shared reference.
pub struct GatewayStats {
    events: HashMap<GatewayEvent, AtomicUsize>,
}

impl Default for GatewayStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GatewayStats {
    pub fn new() -> Self {
        let mut events = HashMap::new();
        for event in GatewayEvent::iter() {
            events.insert(event, AtomicUsize::new(0));
        }
        GatewayStats { events }
    }

    /// Increment an event counter.
    pub fn increment(&self, event: GatewayEvent) {
        if let Some(counter) = self.events.get(&event) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment counter for {:?} which is not in the map. \
                 This indicates a bug in GatewayStats initialization.",
                event
            );
        }
    }

    /// Get the count for an event type.
    pub fn get(&self, event: GatewayEvent) -> usize {
        self.events
            .get(&event)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Snapshot of all non-zero counters, in declaration order.
    pub fn summary(&self) -> Vec<(GatewayEvent, usize)> {
        GatewayEvent::iter()
            .map(|event| (event, self.get(event)))
            .filter(|(_, count)| *count > 0)
            .collect()
    }
}

impl std::fmt::Debug for GatewayStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for event in GatewayEvent::iter() {
            map.entry(&event, &self.get(event));
        }
        map.finish()
    }
}
