use std::sync::Arc;

use crate::session::client::SessionInner;

pub(crate) type TopicCallback = Arc<dyn Fn(&str) + Send + Sync + 'static>;

/// A registered topic callback held in the session's subscription table.
pub(crate) struct SubscriptionEntry {
    pub(crate) destination: String,
    pub(crate) callback: TopicCallback,
}

/// Handle to an active topic subscription.
///
/// Dropping the handle keeps the subscription alive; removal is explicit
/// via [`Subscription::unsubscribe`] or implicit when the session loses its
/// connection. A delivery already dispatched when `unsubscribe` is called
/// may still invoke the callback once.
pub struct Subscription {
    pub(crate) inner: Arc<SessionInner>,
    pub(crate) id: String,
}

impl Subscription {
    /// The broker-facing subscription identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Removes the callback from dispatch and tells the broker to stop
    /// delivering the topic.
    pub fn unsubscribe(self) {
        self.inner.unsubscribe(&self.id);
    }
}
