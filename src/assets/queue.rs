// Owning-thread task queue
//
// Only the thread that owns the AssetStore may mutate it. Other threads submit closures
// here and the owner runs them when it drains the queue.

use super::AssetStore;
use crossbeam_channel::{unbounded, Receiver, Sender};

/// Work to run against the store on its owning thread
pub type OwnerTask = Box<dyn FnOnce(&mut AssetStore) + Send>;

/// Receiving end, held by the owning thread
pub struct OwnerQueue {
    sender: Sender<OwnerTask>,
    receiver: Receiver<OwnerTask>,
}

/// Cloneable submitting end for other threads
#[derive(Clone)]
pub struct OwnerQueueSubmitter {
    sender: Sender<OwnerTask>,
}

impl OwnerQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    pub fn submitter(&self) -> OwnerQueueSubmitter {
        OwnerQueueSubmitter {
            sender: self.sender.clone(),
        }
    }

    /// Run every queued task in submission order, returning how many ran
    pub fn drain(&self, store: &mut AssetStore) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.receiver.try_recv() {
            task(store);
            ran += 1;
        }
        if ran > 0 {
            log::debug!("Ran {} queued asset task(s)", ran);
        }
        ran
    }

    pub fn pending(&self) -> usize {
        self.receiver.len()
    }
}

impl Default for OwnerQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl OwnerQueueSubmitter {
    /// Queue a task; returns false if the owning queue has been dropped
    pub fn submit<F>(&self, task: F) -> bool
    where
        F: FnOnce(&mut AssetStore) + Send + 'static,
    {
        self.sender.send(Box::new(task)).is_ok()
    }
}
