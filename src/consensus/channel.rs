//! Bounded-wait handoff between a commander and one subordinate
//!
//! Every (node, subordinate) pair owns its own [`Handoff`], so an
//! equivocating commander's per-target value always reaches the intended
//! subordinate. A handoff carries exactly one order for exactly one run.

use super::types::{Order, DEFAULT_ORDER};
use parking_lot::Mutex;
use std::time::Duration;
use tokio::sync::oneshot;

pub struct Handoff {
    tx: Mutex<Option<oneshot::Sender<Order>>>,
    rx: Mutex<Option<oneshot::Receiver<Order>>>,
}

impl Default for Handoff {
    fn default() -> Self {
        Self::new()
    }
}

impl Handoff {
    pub fn new() -> Self {
        let (tx, rx) = oneshot::channel();
        Self {
            tx: Mutex::new(Some(tx)),
            rx: Mutex::new(Some(rx)),
        }
    }

    /// Places `order` in the slot. Never waits: the slot always has room for
    /// its single value. Returns false if the value was dropped because the
    /// slot was already used or the receiver stopped waiting.
    pub fn send(&self, order: Order) -> bool {
        let tx = self.tx.lock().take();
        match tx {
            Some(tx) => tx.send(order).is_ok(),
            None => false,
        }
    }

    /// Closes the slot without a value. A pending or later receive resolves
    /// to the default order immediately.
    pub fn close(&self) {
        self.tx.lock().take();
    }

    /// Waits for the commander's value. With a bound, gives up after it
    /// elapses. A missing value of any kind resolves to [`DEFAULT_ORDER`].
    pub async fn receive(&self, bound: Option<Duration>) -> Order {
        let rx = self.rx.lock().take();
        let Some(rx) = rx else {
            tracing::warn!("handoff already drained, using default order");
            return DEFAULT_ORDER;
        };

        let received = match bound {
            Some(limit) => match tokio::time::timeout(limit, rx).await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!(timeout = ?limit, "no order before timeout");
                    return DEFAULT_ORDER;
                }
            },
            None => rx.await,
        };

        received.unwrap_or_else(|_| {
            tracing::debug!("slot closed without an order");
            DEFAULT_ORDER
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Instant;

    #[tokio::test]
    async fn test_send_then_receive() {
        let handoff = Handoff::new();
        assert!(handoff.send(Order::Attack));
        assert_eq!(handoff.receive(None).await, Order::Attack);
    }

    #[tokio::test]
    async fn test_receive_waits_for_late_sender() {
        let handoff = Arc::new(Handoff::new());
        let sender = handoff.clone();

        let task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            sender.send(Order::Attack)
        });

        let order = handoff.receive(Some(Duration::from_secs(5))).await;
        assert_eq!(order, Order::Attack);
        assert!(task.await.unwrap());
    }

    #[tokio::test]
    async fn test_receive_times_out_to_default() {
        let handoff = Handoff::new();
        let start = Instant::now();

        let order = handoff.receive(Some(Duration::from_millis(50))).await;

        assert_eq!(order, DEFAULT_ORDER);
        assert!(start.elapsed() >= Duration::from_millis(50));
        // The receiver is gone, so a late commander's value is dropped.
        assert!(!handoff.send(Order::Attack));
    }

    #[tokio::test]
    async fn test_closed_slot_resolves_immediately() {
        let handoff = Handoff::new();
        handoff.close();

        let start = Instant::now();
        assert_eq!(handoff.receive(None).await, DEFAULT_ORDER);
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(!handoff.send(Order::Attack));
    }

    #[tokio::test]
    async fn test_slot_is_single_use() {
        let handoff = Handoff::new();
        assert!(handoff.send(Order::Attack));
        assert!(!handoff.send(Order::Retreat));

        assert_eq!(handoff.receive(None).await, Order::Attack);
        assert_eq!(handoff.receive(None).await, DEFAULT_ORDER);
    }
}
