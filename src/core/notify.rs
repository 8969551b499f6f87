//! Destinations for proximity notifications.

use log::info;

use super::proximity::model::ProximityNotification;

pub trait NotificationSink {
    fn deliver(&mut self, notification: &ProximityNotification);
}

/// Writes notifications to the application log.
#[derive(Debug, Default)]
pub struct LogSink {
    delivered: usize,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delivered(&self) -> usize {
        self.delivered
    }
}

impl NotificationSink for LogSink {
    fn deliver(&mut self, notification: &ProximityNotification) {
        self.delivered += 1;
        info!(
            "[{}] {}: {}",
            notification.identifier, notification.title, notification.body
        );
    }
}

/// Collects notifications in memory.
impl NotificationSink for Vec<ProximityNotification> {
    fn deliver(&mut self, notification: &ProximityNotification) {
        self.push(notification.clone());
    }
}
