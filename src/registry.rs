//! Named-instance registries for routers and event buses (spec.md
//! §4.Registries): `setup(name, opts)` creates and registers; `get(name)`
//! returns the existing instance or lazily constructs one with defaults.
//! `name = "default"` is the implicit convention callers reach for first.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::event_bus::{EventBus, EventBusOptions};
use crate::router::{MessageRouter, RouterOptions};

/// The implicit instance name most callers use.
pub const DEFAULT_NAME: &str = "default";

/// A process-wide (or, here, an explicitly injectable) mapping of router and
/// event-bus instances by name. Cloning is cheap — it shares both tables.
#[derive(Clone, Default)]
pub struct Registry {
    routers: Arc<DashMap<String, MessageRouter>>,
    event_buses: Arc<DashMap<String, EventBus>>,
}

impl Registry {
    /// An empty registry with nothing yet constructed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates and registers a router under `name`, replacing any existing
    /// registration.
    pub fn setup_router(&self, name: impl Into<String>, options: RouterOptions) -> MessageRouter {
        let name = name.into();
        let router = MessageRouter::with_options(name.clone(), options);
        self.routers.insert(name, router.clone());
        router
    }

    /// Returns the router registered under `name`, lazily constructing one
    /// with default options on first access. Concurrent first access is
    /// race-free: `DashMap::entry` guarantees at most one construction per
    /// name.
    pub fn get_router(&self, name: &str) -> MessageRouter {
        self.routers
            .entry(name.to_string())
            .or_insert_with(|| MessageRouter::new(name))
            .clone()
    }

    /// Creates and registers an event bus under `name`, replacing any
    /// existing registration.
    pub fn setup_event_bus(&self, name: impl Into<String>, options: EventBusOptions) -> EventBus {
        let name = name.into();
        let bus = EventBus::with_options(name.clone(), options);
        self.event_buses.insert(name, bus.clone());
        bus
    }

    /// Returns the event bus registered under `name`, lazily constructing
    /// one with default options on first access.
    pub fn get_event_bus(&self, name: &str) -> EventBus {
        self.event_buses
            .entry(name.to_string())
            .or_insert_with(|| EventBus::new(name))
            .clone()
    }
}

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

/// The process-wide registry singleton, for the common case where callers
/// don't need an isolated `Registry` of their own (e.g. in tests).
#[must_use]
pub fn global() -> &'static Registry {
    &GLOBAL
}
