use crate::simulator::handler::ResourceHandler;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, Receiver, Sender};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 16;

/// How a resource notifies its observers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NotifyStyle {
    /// One notification, `delay` after an observer arrives or the state
    /// changes. Triggers landing while one is pending coalesce into it; the
    /// representation is sampled when the notification fires.
    OneShot { delay: Duration },
    /// A repeating cycle: first notification after `delay`, then one per
    /// `period` for as long as observers remain.
    Periodic { delay: Duration, period: Duration },
}

/// Fans resource notifications out to observers. The broadcast channel's
/// receiver count is the only observer bookkeeping: subscribing adds a
/// receiver, disconnecting drops it, and a notification that finds no
/// receivers ends the cycle.
pub struct ObserverHub {
    handler: Arc<dyn ResourceHandler>,
    style: NotifyStyle,
    sender: Sender<Value>,
    notifier: Mutex<Option<JoinHandle<()>>>,
}

impl ObserverHub {
    pub fn new(handler: Arc<dyn ResourceHandler>, style: NotifyStyle) -> ObserverHub {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        ObserverHub {
            handler,
            style,
            sender,
            notifier: Mutex::new(None),
        }
    }

    /// Registers a new observer and makes sure a notify cycle is running.
    pub async fn subscribe(&self) -> Receiver<Value> {
        let receiver = self.sender.subscribe();
        debug!("👀 Observer joined, {} now watching", self.observer_count());
        self.kick().await;
        receiver
    }

    /// Schedules a notification for a state change, unless nobody observes
    /// the resource. A notification that is already pending covers the
    /// change.
    pub async fn on_update(&self) {
        if self.observer_count() == 0 {
            debug!("💤 No observers, skipping the update notification");
            return;
        }
        self.kick().await;
    }

    pub fn observer_count(&self) -> usize {
        self.sender.receiver_count()
    }

    async fn kick(&self) {
        let mut notifier = self.notifier.lock().await;
        // A pending notification already covers this trigger.
        if notifier.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        let handler = Arc::clone(&self.handler);
        let sender = self.sender.clone();
        let style = self.style;
        *notifier = Some(tokio::spawn(notify_loop(handler, style, sender)));
    }
}

async fn notify_loop(handler: Arc<dyn ResourceHandler>, style: NotifyStyle, sender: Sender<Value>) {
    match style {
        NotifyStyle::OneShot { delay } => {
            tokio::time::sleep(delay).await;
            let representation = handler.retrieve().await;
            if sender.send(representation).is_err() {
                debug!("💤 No observers remain, dropping the notification");
            }
        }
        NotifyStyle::Periodic { delay, period } => {
            tokio::time::sleep(delay).await;
            loop {
                let representation = handler.retrieve().await;
                if sender.send(representation).is_err() {
                    debug!("💤 Last observer left, stopping the notify cycle");
                    return;
                }
                tokio::time::sleep(period).await;
            }
        }
    }
}
