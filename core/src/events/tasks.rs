//! Work deferred until the current event pass has finished.

use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};

use crate::host::FormId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    /// Take restricted ammo off an actor that just equipped a launcher
    UnequipAmmo { actor: FormId, ammo: FormId },
}

/// FIFO handoff between event callbacks and the host's next idle pass.
#[derive(Debug)]
pub struct TaskQueue {
    tx: UnboundedSender<DeferredTask>,
    rx: Mutex<UnboundedReceiver<DeferredTask>>,
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx: Mutex::new(rx) }
    }

    pub fn push(&self, task: DeferredTask) {
        // The receiver lives as long as the queue, so this only fails mid-drop
        if self.tx.send(task).is_err() {
            tracing::warn!(?task, "Task queue closed, dropping task");
        }
    }

    /// Everything queued so far, in push order.
    pub fn drain(&self) -> Vec<DeferredTask> {
        let mut rx = self.rx.lock().unwrap_or_else(PoisonError::into_inner);
        let mut tasks = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(task) => tasks.push(task),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        tasks
    }

    pub fn is_empty(&self) -> bool {
        self.rx.lock().unwrap_or_else(PoisonError::into_inner).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_order_and_empties() {
        let queue = TaskQueue::new();
        assert!(queue.drain().is_empty());

        let first = DeferredTask::UnequipAmmo { actor: FormId(0x14), ammo: FormId(1) };
        let second = DeferredTask::UnequipAmmo { actor: FormId(0x14), ammo: FormId(2) };
        queue.push(first);
        queue.push(second);
        assert!(!queue.is_empty());

        assert_eq!(queue.drain(), vec![first, second]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_push_from_other_thread() {
        let queue = std::sync::Arc::new(TaskQueue::new());
        let producer = std::sync::Arc::clone(&queue);
        std::thread::spawn(move || {
            producer.push(DeferredTask::UnequipAmmo { actor: FormId(1), ammo: FormId(2) });
        })
        .join()
        .unwrap();
        assert_eq!(queue.drain().len(), 1);
    }
}
