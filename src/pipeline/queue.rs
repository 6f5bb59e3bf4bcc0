//! Work queue: FIFO populated once, then drained concurrently.
//!
//! Backed by a crossbeam channel. The emptiness check and the removal are the same `try_recv`,
//! so two workers can never both take the head item.

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::WorkItem;

/// Item with its enqueue position.
pub type Indexed<I, O> = (usize, WorkItem<I, O>);

/// Open queue during population. [`QueueFiller::close`] seals it and hands out the drain side.
pub struct QueueFiller<I, O> {
    tx: Sender<Indexed<I, O>>,
    rx: Receiver<Indexed<I, O>>,
    next_index: usize,
}

impl<I, O> QueueFiller<I, O> {
    pub fn enqueue(&mut self, item: WorkItem<I, O>) {
        // Receiver is held by self, so send cannot fail.
        let _ = self.tx.send((self.next_index, item));
        self.next_index += 1;
    }

    /// Stop accepting items. Dropping the only sender closes the channel.
    pub fn close(self) -> WorkQueue<I, O> {
        let QueueFiller { tx, rx, next_index } = self;
        drop(tx);
        WorkQueue {
            rx,
            enqueued: next_index,
        }
    }
}

/// Closed queue handle. Clones share the same underlying items.
pub struct WorkQueue<I, O> {
    rx: Receiver<Indexed<I, O>>,
    enqueued: usize,
}

impl<I, O> Clone for WorkQueue<I, O> {
    fn clone(&self) -> Self {
        Self {
            rx: self.rx.clone(),
            enqueued: self.enqueued,
        }
    }
}

impl<I, O> WorkQueue<I, O> {
    pub fn open() -> QueueFiller<I, O> {
        let (tx, rx) = unbounded();
        QueueFiller {
            tx,
            rx,
            next_index: 0,
        }
    }

    /// Enqueue every item in order, then close.
    pub fn populate(items: impl IntoIterator<Item = WorkItem<I, O>>) -> Self {
        let mut filler = Self::open();
        for item in items {
            filler.enqueue(item);
        }
        filler.close()
    }

    /// Atomically take the head item, or `None` when the queue is drained.
    pub fn try_dequeue(&self) -> Option<Indexed<I, O>> {
        self.rx.try_recv().ok()
    }

    /// Items not yet taken.
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Total items enqueued during population.
    pub fn enqueued(&self) -> usize {
        self.enqueued
    }
}
