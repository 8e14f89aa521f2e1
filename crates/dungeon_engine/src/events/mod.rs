//! Event queue
//!
//! A simpler sibling of the render queue: producers push events carrying an
//! ordered list of string actions, one processing routine drains them in FIFO
//! order. No turn locks and no payload typing beyond the action strings.
//!
//! Handlers follow chain of responsibility: `on_event` returns `true` when the
//! event was consumed, which stops it being forwarded to later handlers.

use crate::render::{QueueError, WorkQueue};
use crate::sim::TurnNumber;

/// Event with its ordered actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Actions in the order they were added
    pub actions: Vec<String>,
    /// Turn the event was raised in
    pub turn: TurnNumber,
}

impl Event {
    /// Create an event with no actions
    pub const fn new(turn: TurnNumber) -> Self {
        Self {
            actions: Vec::new(),
            turn,
        }
    }

    /// Add an action (builder pattern)
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    /// First action, if any
    pub fn first_action(&self) -> Option<&str> {
        self.actions.first().map(String::as_str)
    }
}

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait EventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &Event) -> bool;
}

/// Counts from one processing pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventPass {
    /// Events taken off the queue
    pub processed: usize,
    /// Events some handler consumed
    pub consumed: usize,
}

/// Explicitly constructed event queue shared between producer threads
#[derive(Debug, Default)]
pub struct EventManager {
    queue: WorkQueue<Event>,
}

impl EventManager {
    /// Create an empty, unbounded event queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event
    pub fn push(&self, event: Event) -> Result<(), QueueError> {
        self.queue.push(event, None).map(|_| ())
    }

    /// Events waiting to be processed
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether no events are waiting
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Stop accepting events
    pub fn close(&self) {
        self.queue.close();
    }

    /// Drain pending events in FIFO order through one handler
    pub fn process(&self, handler: &mut impl EventHandler) -> EventPass {
        let events = self.queue.drain();
        let mut pass = EventPass::default();

        for event in &events {
            pass.processed += 1;
            if handler.on_event(event) {
                pass.consumed += 1;
            }
        }

        self.queue.complete(events.len());
        log_pass(pass);
        pass
    }

    /// Drain pending events, forwarding each along `handlers` until one consumes it
    pub fn process_chain(&self, handlers: &mut [Box<dyn EventHandler + Send>]) -> EventPass {
        let events = self.queue.drain();
        let mut pass = EventPass::default();

        for event in &events {
            pass.processed += 1;
            if handlers.iter_mut().any(|handler| handler.on_event(event)) {
                pass.consumed += 1;
            } else {
                log::debug!("Event from turn {} not consumed: {:?}", event.turn, event.actions);
            }
        }

        self.queue.complete(events.len());
        log_pass(pass);
        pass
    }
}

fn log_pass(pass: EventPass) {
    if pass.processed > 0 {
        log::debug!("Processed {} events ({} consumed)", pass.processed, pass.consumed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    struct TestHandler {
        received: Vec<Vec<String>>,
        consume: bool,
    }

    impl TestHandler {
        fn new(consume: bool) -> Self {
            Self {
                received: Vec::new(),
                consume,
            }
        }
    }

    impl EventHandler for TestHandler {
        fn on_event(&mut self, event: &Event) -> bool {
            self.received.push(event.actions.clone());
            self.consume
        }
    }

    struct Counter(Arc<parking_lot::Mutex<usize>>, bool);

    impl EventHandler for Counter {
        fn on_event(&mut self, _event: &Event) -> bool {
            *self.0.lock() += 1;
            self.1
        }
    }

    #[test]
    fn test_events_processed_in_fifo_order() {
        let manager = EventManager::new();
        manager.push(Event::new(1).with_action("dig").with_action("claim")).unwrap();
        manager.push(Event::new(1).with_action("build")).unwrap();
        assert_eq!(manager.len(), 2);

        let mut handler = TestHandler::new(true);
        let pass = manager.process(&mut handler);

        assert_eq!(pass, EventPass { processed: 2, consumed: 2 });
        assert_eq!(
            handler.received,
            vec![vec!["dig".to_string(), "claim".to_string()], vec!["build".to_string()]]
        );
        assert!(manager.is_empty());
    }

    #[test]
    fn test_event_consumption_stops_forwarding() {
        let manager = EventManager::new();
        manager.push(Event::new(0).with_action("ping")).unwrap();

        let first = Arc::new(parking_lot::Mutex::new(0));
        let second = Arc::new(parking_lot::Mutex::new(0));
        let mut handlers: Vec<Box<dyn EventHandler + Send>> = vec![
            Box::new(Counter(Arc::clone(&first), true)),
            Box::new(Counter(Arc::clone(&second), false)),
        ];

        let pass = manager.process_chain(&mut handlers);
        assert_eq!(pass.consumed, 1);
        assert_eq!(*first.lock(), 1);
        assert_eq!(*second.lock(), 0);
    }

    #[test]
    fn test_unconsumed_events_reach_every_handler() {
        let manager = EventManager::new();
        manager.push(Event::new(0)).unwrap();

        let seen = Arc::new(parking_lot::Mutex::new(0));
        let mut handlers: Vec<Box<dyn EventHandler + Send>> = vec![
            Box::new(Counter(Arc::clone(&seen), false)),
            Box::new(Counter(Arc::clone(&seen), false)),
        ];

        let pass = manager.process_chain(&mut handlers);
        assert_eq!(pass, EventPass { processed: 1, consumed: 0 });
        assert_eq!(*seen.lock(), 2);
    }

    #[test]
    fn test_concurrent_producers() {
        let manager = Arc::new(EventManager::new());
        let producers: Vec<_> = (0..4)
            .map(|id| {
                let manager = Arc::clone(&manager);
                thread::spawn(move || {
                    for i in 0..25 {
                        manager.push(Event::new(i).with_action(format!("p{id}"))).unwrap();
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().unwrap();
        }

        let mut handler = TestHandler::new(false);
        let pass = manager.process(&mut handler);
        assert_eq!(pass.processed, 100);
        assert_eq!(pass.consumed, 0);

        for id in 0..4 {
            let name = format!("p{id}");
            let count = handler.received.iter().filter(|actions| actions[0] == name).count();
            assert_eq!(count, 25);
        }
    }

    #[test]
    fn test_push_after_close_fails() {
        let manager = EventManager::new();
        manager.close();
        assert_eq!(manager.push(Event::new(0)), Err(QueueError::Closed));
    }
}
