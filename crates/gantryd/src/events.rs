//! Lifecycle event bus.
//!
//! A context-owned publish/subscribe dispatcher rather than an ambient
//! global: the orchestrator creates the bus, collaborators subscribe during
//! wiring, and the bus is cleared during teardown so no further events are
//! observed once shutdown has begun. Callbacks run synchronously in
//! registration order; the bus never awaits or observes their outcome, so a
//! failing subscriber cannot disturb the publisher.

use std::collections::HashMap;

use strum::Display;

use gantry_config::Config;

const EVENT_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::events");

/// Named lifecycle signals broadcast by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Event {
    /// Before anything else happens.
    BeforeStart,
    /// Before parsing the command-line arguments.
    BeforeParseArguments,
    /// After parsing the command-line arguments.
    AfterParseArguments,
    /// Before resolving the configuration.
    BeforeParseConfiguration,
    /// After resolving the configuration; carries the configuration.
    AfterParseConfiguration,
    /// After the logging system is ready.
    AfterLoggingInitialized,
    /// Before starting the actors; carries their names.
    BeforeStartRunnables,
    /// After every actor has started.
    AfterStartRunnables,
    /// Before shutting down the actors.
    BeforeShutdownRunnables,
    /// After every actor has shut down.
    AfterShutdownRunnables,
    /// Before the event system itself is torn down.
    BeforeShutdownEventSystem,
}

/// Event-specific arguments delivered alongside an [`Event`].
#[derive(Debug)]
pub enum Payload<'a> {
    /// No arguments.
    None,
    /// The raw argument list being parsed.
    Arguments(&'a [String]),
    /// The freshly resolved configuration.
    Configuration(&'a Config),
    /// The names of the actors about to start, in start order.
    Runnables(&'a [&'static str]),
}

type Callback = Box<dyn FnMut(&Payload<'_>)>;

/// Synchronous publish/subscribe channel for lifecycle events.
#[derive(Default)]
pub struct EventBus {
    listeners: HashMap<Event, Vec<Callback>>,
}

impl EventBus {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a callback for one event name.
    ///
    /// Callbacks for the same event are invoked in registration order.
    pub fn subscribe<F>(&mut self, event: Event, callback: F)
    where
        F: FnMut(&Payload<'_>) + 'static,
    {
        self.listeners
            .entry(event)
            .or_default()
            .push(Box::new(callback));
    }

    /// Publishes an event, invoking every registered callback synchronously.
    ///
    /// Fire-and-forget: callback outcomes are not observed and events with
    /// no listeners are silently dropped.
    pub fn publish(&mut self, event: Event, payload: &Payload<'_>) {
        tracing::trace!(target: EVENT_TARGET, event = %event, "publishing lifecycle event");
        if let Some(callbacks) = self.listeners.get_mut(&event) {
            for callback in callbacks.iter_mut() {
                callback(payload);
            }
        }
    }

    /// Removes every subscriber; no further events will be observed.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Number of callbacks registered for an event, used by wiring checks.
    #[must_use]
    pub fn subscriber_count(&self, event: Event) -> usize {
        self.listeners
            .get(&event)
            .map_or(0, std::vec::Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn callbacks_run_in_registration_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        for label in ["first", "second", "third"] {
            let seen = Rc::clone(&seen);
            bus.subscribe(Event::BeforeStart, move |_| {
                seen.borrow_mut().push(label);
            });
        }
        bus.publish(Event::BeforeStart, &Payload::None);
        assert_eq!(*seen.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn publishing_without_listeners_is_a_no_op() {
        let mut bus = EventBus::new();
        bus.publish(Event::AfterStartRunnables, &Payload::None);
    }

    #[test]
    fn clear_removes_every_subscriber() {
        let seen = Rc::new(RefCell::new(0_u32));
        let mut bus = EventBus::new();
        let counter = Rc::clone(&seen);
        bus.subscribe(Event::BeforeShutdownRunnables, move |_| {
            *counter.borrow_mut() += 1;
        });
        bus.publish(Event::BeforeShutdownRunnables, &Payload::None);
        bus.clear();
        bus.publish(Event::BeforeShutdownRunnables, &Payload::None);
        assert_eq!(*seen.borrow(), 1);
        assert_eq!(bus.subscriber_count(Event::BeforeShutdownRunnables), 0);
    }

    #[test]
    fn events_display_their_variant_names() {
        assert_eq!(Event::BeforeStart.to_string(), "BeforeStart");
        assert_eq!(
            Event::BeforeShutdownEventSystem.to_string(),
            "BeforeShutdownEventSystem"
        );
    }
}
