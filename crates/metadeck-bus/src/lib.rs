// SPDX-FileCopyrightText: 2026 MetaDeck Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Synchronous publish/subscribe hub keyed by event name.
//!
//! Handlers for one event name are delivered in subscription order. Each
//! `publish` works on a snapshot of the subscriber list, so handlers may
//! subscribe, unsubscribe or publish again while being delivered to without
//! disturbing the current delivery pass. A failing or panicking handler is
//! logged and skipped; it never reaches the publisher or sibling handlers.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{trace, warn};

/// Error type returned by event handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

type Handler<P> = Arc<dyn Fn(&P) -> Result<(), HandlerError> + Send + Sync>;

/// Payloads that know their own event name, so they can be [`EventBus::emit`]ted.
pub trait BusEvent {
    /// The event name subscribers register against.
    fn name(&self) -> &'static str;
}

struct Topics<P> {
    next_id: u64,
    handlers: HashMap<String, Vec<(u64, Handler<P>)>>,
}

/// Publish/subscribe hub for payloads of type `P`.
///
/// Cloning the bus yields another handle to the same subscriber table.
pub struct EventBus<P> {
    topics: Arc<Mutex<Topics<P>>>,
}

impl<P> Clone for EventBus<P> {
    fn clone(&self) -> Self {
        Self {
            topics: Arc::clone(&self.topics),
        }
    }
}

impl<P: 'static> EventBus<P> {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self {
            topics: Arc::new(Mutex::new(Topics {
                next_id: 0,
                handlers: HashMap::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Topics<P>> {
        // Handlers never run while the table is locked, so a poisoned lock
        // still guards a consistent table.
        self.topics.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Subscribe `handler` to `event`.
    ///
    /// The returned [`Subscription`] removes the handler when
    /// [`Subscription::unsubscribe`] is called. Dropping it keeps the handler
    /// subscribed.
    pub fn subscribe<F>(&self, event: impl Into<String>, handler: F) -> Subscription
    where
        F: Fn(&P) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        let event = event.into();
        let id = {
            let mut topics = self.lock();
            let id = topics.next_id;
            topics.next_id += 1;
            topics
                .handlers
                .entry(event.clone())
                .or_default()
                .push((id, Arc::new(handler)));
            id
        };
        trace!(event = %event, id, "handler subscribed");

        let topics = Arc::downgrade(&self.topics);
        Subscription {
            detach: Mutex::new(Some(Box::new(move || {
                let Some(topics) = topics.upgrade() else {
                    return;
                };
                let mut topics = topics.lock().unwrap_or_else(PoisonError::into_inner);
                if let Some(list) = topics.handlers.get_mut(&event) {
                    list.retain(|(existing, _)| *existing != id);
                    if list.is_empty() {
                        topics.handlers.remove(&event);
                    }
                }
            }))),
        }
    }

    /// Deliver `payload` to every handler subscribed to `event` right now.
    ///
    /// Returns the number of handlers the payload was offered to, including
    /// handlers that failed.
    pub fn publish(&self, event: &str, payload: &P) -> usize {
        let snapshot: Vec<Handler<P>> = self
            .lock()
            .handlers
            .get(event)
            .map(|list| list.iter().map(|(_, handler)| Arc::clone(handler)).collect())
            .unwrap_or_default();

        for (index, handler) in snapshot.iter().enumerate() {
            match catch_unwind(AssertUnwindSafe(|| handler(payload))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(event, index, error = %e, "event handler failed");
                }
                Err(_) => {
                    warn!(event, index, "event handler panicked");
                }
            }
        }

        snapshot.len()
    }

    /// Number of handlers currently subscribed to `event`.
    pub fn subscriber_count(&self, event: &str) -> usize {
        self.lock().handlers.get(event).map_or(0, Vec::len)
    }
}

impl<P: BusEvent + 'static> EventBus<P> {
    /// Publish `event` under its own name.
    pub fn emit(&self, event: &P) -> usize {
        self.publish(event.name(), event)
    }
}

impl<P: 'static> Default for EventBus<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned by [`EventBus::subscribe`].
pub struct Subscription {
    detach: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Subscription {
    /// Remove the handler from the bus. Calling this more than once has no
    /// further effect.
    pub fn unsubscribe(&self) {
        let detach = self
            .detach
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(detach) = detach {
            detach();
        }
    }

    /// Whether [`Subscription::unsubscribe`] has already run.
    pub fn is_active(&self) -> bool {
        self.detach
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str, &str) + Clone) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let push = move |who: &str, payload: &str| {
            sink.lock().unwrap().push(format!("{who}:{payload}"));
        };
        (log, push)
    }

    #[test]
    fn delivers_in_subscription_order() {
        let bus: EventBus<String> = EventBus::new();
        let (log, push) = recorder();

        for who in ["a", "b", "c"] {
            let push = push.clone();
            let _ = bus.subscribe("x", move |p: &String| {
                push(who, p);
                Ok(())
            });
        }

        assert_eq!(bus.publish("x", &"P".to_string()), 3);
        assert_eq!(*log.lock().unwrap(), vec!["a:P", "b:P", "c:P"]);
    }

    #[test]
    #[traced_test]
    fn failing_handler_does_not_stop_delivery() {
        let bus: EventBus<String> = EventBus::new();
        let (log, push) = recorder();

        let first = push.clone();
        let _a = bus.subscribe("x", move |p: &String| {
            first("a", p);
            Ok(())
        });
        let _b = bus.subscribe("x", |_: &String| Err("boom".into()));
        let last = push.clone();
        let _c = bus.subscribe("x", move |p: &String| {
            last("c", p);
            Ok(())
        });

        bus.publish("x", &"P".to_string());
        assert_eq!(*log.lock().unwrap(), vec!["a:P", "c:P"]);
        assert!(logs_contain("event handler failed"));
    }

    #[test]
    fn panicking_handler_is_isolated() {
        let bus: EventBus<u32> = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let _p = bus.subscribe("tick", |_: &u32| panic!("handler bug"));
        let sink = Arc::clone(&seen);
        let _ok = bus.subscribe("tick", move |n: &u32| {
            sink.lock().unwrap().push(*n);
            Ok(())
        });

        bus.publish("tick", &7);
        bus.publish("tick", &8);
        assert_eq!(*seen.lock().unwrap(), vec![7, 8]);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let bus: EventBus<()> = EventBus::new();
        let sub = bus.subscribe("x", |_: &()| Ok(()));
        let _other = bus.subscribe("x", |_: &()| Ok(()));
        assert_eq!(bus.subscriber_count("x"), 2);

        sub.unsubscribe();
        assert!(!sub.is_active());
        assert_eq!(bus.subscriber_count("x"), 1);

        sub.unsubscribe();
        assert_eq!(bus.subscriber_count("x"), 1);
    }

    #[test]
    fn subscribing_during_delivery_waits_for_next_publish() {
        let bus: EventBus<()> = EventBus::new();
        let calls = Arc::new(Mutex::new(0u32));

        let inner_bus = bus.clone();
        let inner_calls = Arc::clone(&calls);
        let _outer = bus.subscribe("x", move |_: &()| {
            let counted = Arc::clone(&inner_calls);
            let _late = inner_bus.subscribe("x", move |_: &()| {
                *counted.lock().unwrap() += 1;
                Ok(())
            });
            Ok(())
        });

        assert_eq!(bus.publish("x", &()), 1);
        assert_eq!(*calls.lock().unwrap(), 0);

        assert_eq!(bus.publish("x", &()), 2);
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn unsubscribing_during_delivery_keeps_current_pass() {
        let bus: EventBus<()> = EventBus::new();
        let calls = Arc::new(Mutex::new(0u32));

        let victim_calls = Arc::clone(&calls);
        let victim = Arc::new(Mutex::new(None::<Subscription>));
        let slot = Arc::clone(&victim);
        let _first = bus.subscribe("x", move |_: &()| {
            if let Some(sub) = slot.lock().unwrap().as_ref() {
                sub.unsubscribe();
            }
            Ok(())
        });
        *victim.lock().unwrap() = Some(bus.subscribe("x", move |_: &()| {
            *victim_calls.lock().unwrap() += 1;
            Ok(())
        }));

        bus.publish("x", &());
        assert_eq!(*calls.lock().unwrap(), 1);
        bus.publish("x", &());
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn reentrant_publish_of_same_event() {
        let bus: EventBus<u32> = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let again = bus.clone();
        let sink = Arc::clone(&seen);
        let _h = bus.subscribe("count", move |n: &u32| {
            sink.lock().unwrap().push(*n);
            if *n < 3 {
                again.publish("count", &(n + 1));
            }
            Ok(())
        });

        bus.publish("count", &1);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn emit_uses_event_name() {
        struct Ping;
        impl BusEvent for Ping {
            fn name(&self) -> &'static str {
                "ping"
            }
        }

        let bus: EventBus<Ping> = EventBus::new();
        let _s = bus.subscribe("ping", |_: &Ping| Ok(()));
        assert_eq!(bus.emit(&Ping), 1);
        assert_eq!(bus.publish("pong", &Ping), 0);
    }
}
