//! Account-change subscription handle.

use ethers::types::Address;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Live account-change feed. Dropping it stops the feed.
#[derive(Debug)]
pub struct AccountSubscription {
    events: mpsc::UnboundedReceiver<Vec<Address>>,
    watcher: Option<JoinHandle<()>>,
}

impl AccountSubscription {
    /// Wraps a channel fed by `watcher`, which is aborted on drop.
    pub fn new(events: mpsc::UnboundedReceiver<Vec<Address>>, watcher: Option<JoinHandle<()>>) -> Self {
        Self { events, watcher }
    }

    /// Next account list, or `None` once the feed has ended.
    pub async fn next(&mut self) -> Option<Vec<Address>> {
        self.events.recv().await
    }

    /// Non-blocking variant of [`next`](Self::next).
    pub fn try_next(&mut self) -> Option<Vec<Address>> {
        self.events.try_recv().ok()
    }
}

impl Drop for AccountSubscription {
    fn drop(&mut self) {
        self.events.close();
        if let Some(watcher) = self.watcher.take() {
            watcher.abort();
        }
    }
}
