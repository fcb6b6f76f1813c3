use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use thiserror::Error;
use tokio::sync::{Mutex, Notify, mpsc};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueueError {
  #[error("queue closed")]
  Closed,
}

/// Bounded FIFO with task accounting.
///
/// * `put` waits while `capacity` items are queued.
/// * `get` waits while the queue is empty. Consumers share the receiver.
/// * Every `put` raises the pending count; `task_done` lowers it, and `join`
///   waits until it reaches zero.
///
/// Clones are handles to the same queue.
#[derive(Debug)]
pub struct WorkQueue<T> {
  tx: mpsc::Sender<T>,
  rx: Arc<Mutex<mpsc::Receiver<T>>>,
  pending: Arc<AtomicUsize>,
  drained: Arc<Notify>,
}

impl<T> Clone for WorkQueue<T> {
  fn clone(&self) -> Self {
    Self {
      tx: self.tx.clone(),
      rx: Arc::clone(&self.rx),
      pending: Arc::clone(&self.pending),
      drained: Arc::clone(&self.drained),
    }
  }
}

impl<T: Send> WorkQueue<T> {
  /// `capacity` is clamped to at least 1.
  pub fn bounded(capacity: usize) -> Self {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    Self {
      tx,
      rx: Arc::new(Mutex::new(rx)),
      pending: Arc::new(AtomicUsize::new(0)),
      drained: Arc::new(Notify::new()),
    }
  }

  pub async fn put(&self, item: T) -> Result<(), QueueError> {
    // Counted before the send so a concurrent `join` cannot slip through
    // between the item landing in the channel and the increment.
    self.pending.fetch_add(1, Ordering::SeqCst);

    if self.tx.send(item).await.is_err() {
      self.task_done();
      return Err(QueueError::Closed);
    }

    Ok(())
  }

  /// Next item, or `None` once every sender is gone and the queue is empty.
  pub async fn get(&self) -> Option<T> {
    let mut rx = self.rx.lock().await;
    rx.recv().await
  }

  /// Marks one item obtained through `get` as fully processed.
  pub fn task_done(&self) {
    let prev = self.pending.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));

    if prev == Ok(1) {
      self.drained.notify_waiters();
    }
  }

  /// Waits until every item put so far has been marked done.
  pub async fn join(&self) {
    loop {
      let notified = self.drained.notified();
      tokio::pin!(notified);
      // Register before reading the counter so a wake-up in between is not lost.
      notified.as_mut().enable();

      if self.pending.load(Ordering::SeqCst) == 0 {
        return;
      }

      notified.await;
    }
  }

  /// Items put but not yet marked done (queued plus in flight).
  pub fn pending(&self) -> usize {
    self.pending.load(Ordering::SeqCst)
  }

  /// Items currently sitting in the queue.
  pub fn len(&self) -> usize {
    self.tx.max_capacity() - self.tx.capacity()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn capacity(&self) -> usize {
    self.tx.max_capacity()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;
  use tokio::time::timeout;

  #[tokio::test]
  async fn put_waits_when_full() {
    let queue = WorkQueue::bounded(2);
    queue.put(1).await.unwrap();
    queue.put(2).await.unwrap();

    assert_eq!(queue.len(), 2);
    assert!(timeout(Duration::from_millis(50), queue.put(3)).await.is_err());

    assert_eq!(queue.get().await, Some(1));
    timeout(Duration::from_millis(500), queue.put(3)).await.unwrap().unwrap();
    assert_eq!(queue.len(), 2);
  }

  #[tokio::test]
  async fn fifo_order() {
    let queue = WorkQueue::bounded(4);
    for i in 0..4 {
      queue.put(i).await.unwrap();
    }

    let mut seen = Vec::new();
    for _ in 0..4 {
      seen.push(queue.get().await.unwrap());
    }

    assert_eq!(seen, vec![0, 1, 2, 3]);
  }

  #[tokio::test]
  async fn join_returns_immediately_when_nothing_was_put() {
    let queue: WorkQueue<u8> = WorkQueue::bounded(1);
    timeout(Duration::from_millis(100), queue.join()).await.unwrap();
  }

  #[tokio::test]
  async fn join_waits_for_task_done_not_for_get() {
    let queue = WorkQueue::bounded(4);
    queue.put("a").await.unwrap();
    queue.put("b").await.unwrap();

    queue.get().await.unwrap();
    queue.get().await.unwrap();
    assert!(queue.is_empty());
    assert_eq!(queue.pending(), 2);
    assert!(timeout(Duration::from_millis(50), queue.join()).await.is_err());

    queue.task_done();
    assert!(timeout(Duration::from_millis(50), queue.join()).await.is_err());

    queue.task_done();
    timeout(Duration::from_millis(100), queue.join()).await.unwrap();
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
  async fn join_wakes_when_consumer_finishes() {
    let queue = WorkQueue::bounded(2);
    let consumer = queue.clone();

    let handle = tokio::spawn(async move {
      for _ in 0..5 {
        consumer.get().await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        consumer.task_done();
      }
    });

    for i in 0..5 {
      queue.put(i).await.unwrap();
    }
    timeout(Duration::from_secs(2), queue.join()).await.unwrap();

    assert_eq!(queue.pending(), 0);
    handle.await.unwrap();
  }

  #[test]
  fn extra_task_done_does_not_underflow() {
    let queue: WorkQueue<u8> = WorkQueue::bounded(1);
    queue.task_done();
    assert_eq!(queue.pending(), 0);
  }
}
