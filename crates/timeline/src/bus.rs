//! Explicit message passing between timeline collaborators.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineEvent {
    InitialLoadComplete { message_count: usize },
    OlderMessagesAvailable { total: usize },
    /// The message source was swapped, e.g. a different session.
    SourceReplaced,
    /// The host swapped the element that scrolls the timeline.
    ContainerChanged,
    ShowCommitDiff { hash: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler<E> = Box<dyn FnMut(&E)>;

/// Single-threaded observer list. Handlers run in subscription order.
pub struct EventBus<E> {
    handlers: Vec<(SubscriptionId, Handler<E>)>,
    next_id: u64,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            handlers: Vec::new(),
            next_id: 0,
        }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&E) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers.push((id, Box::new(handler)));
        id
    }

    /// Returns false when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.handlers.len();
        self.handlers.retain(|(existing, _)| *existing != id);
        self.handlers.len() != before
    }

    /// Deliver `event` to every handler. Returns how many received it.
    pub fn publish(&mut self, event: &E) -> usize {
        for (_, handler) in &mut self.handlers {
            handler(event);
        }
        self.handlers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }
}
