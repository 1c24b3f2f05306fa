use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use super::DrawMode;

/// Push-based mode observable. A new subscriber first receives the current mode, then
/// every published mode in publish order. Dropped subscriptions are pruned on the next
/// publish.
#[derive(Debug)]
pub struct ModePublisher {
    current: DrawMode,
    subscribers: Vec<Sender<DrawMode>>,
}

impl ModePublisher {
    pub const fn new(initial: DrawMode) -> Self {
        Self {
            current: initial,
            subscribers: Vec::new(),
        }
    }

    pub const fn current(&self) -> DrawMode {
        self.current
    }

    pub fn subscribe(&mut self) -> ModeSubscription {
        let (sender, receiver) = mpsc::channel();
        // The receiver is alive here, so the replay cannot fail.
        let _ = sender.send(self.current);
        self.subscribers.push(sender);
        ModeSubscription { receiver }
    }

    pub fn publish(&mut self, mode: DrawMode) {
        self.current = mode;
        self.subscribers
            .retain(|subscriber| subscriber.send(mode).is_ok());
        tracing::debug!(%mode, subscribers = self.subscribers.len(), "mode published");
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[derive(Debug)]
pub struct ModeSubscription {
    receiver: Receiver<DrawMode>,
}

impl ModeSubscription {
    /// Next pending notification, if any, without blocking.
    pub fn try_next(&self) -> Option<DrawMode> {
        match self.receiver.try_recv() {
            Ok(mode) => Some(mode),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Every pending notification, oldest first.
    pub fn drain(&self) -> Vec<DrawMode> {
        self.receiver.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_subscriber_receives_current_mode_first() {
        let mut publisher = ModePublisher::new(DrawMode::LineString);
        publisher.publish(DrawMode::Polygon);

        let subscription = publisher.subscribe();
        assert_eq!(subscription.drain(), vec![DrawMode::Polygon]);
        assert_eq!(subscription.try_next(), None);
    }

    #[test]
    fn every_publish_is_delivered_in_order() {
        let mut publisher = ModePublisher::new(DrawMode::LineString);
        let subscription = publisher.subscribe();
        publisher.publish(DrawMode::Edit);
        publisher.publish(DrawMode::Edit);
        publisher.publish(DrawMode::Delete);

        assert_eq!(
            subscription.drain(),
            vec![
                DrawMode::LineString,
                DrawMode::Edit,
                DrawMode::Edit,
                DrawMode::Delete
            ]
        );
    }

    #[test]
    fn dropped_subscriptions_are_pruned() {
        let mut publisher = ModePublisher::new(DrawMode::LineString);
        let kept = publisher.subscribe();
        drop(publisher.subscribe());
        assert_eq!(publisher.subscriber_count(), 2);

        publisher.publish(DrawMode::Point);
        assert_eq!(publisher.subscriber_count(), 1);
        assert_eq!(kept.drain(), vec![DrawMode::LineString, DrawMode::Point]);
    }
}
