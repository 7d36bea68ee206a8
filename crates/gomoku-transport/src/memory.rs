//! In-process channel built on Tokio mpsc queues.

use tokio::sync::{mpsc, Mutex};

use crate::{Connection, ConnectionId, TransportError};

/// One end of an in-memory channel.
///
/// Created in connected pairs with [`MemoryConnection::pair`]. Whatever
/// one end sends, the other receives, in order. Closing (or dropping) one
/// end makes the other's `recv` return `Ok(None)`.
#[derive(Debug)]
pub struct MemoryConnection {
    id: ConnectionId,
    // `None` once this end has been closed.
    tx: Mutex<Option<mpsc::UnboundedSender<Vec<u8>>>>,
    rx: Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
}

impl MemoryConnection {
    /// Creates two connected ends.
    pub fn pair() -> (Self, Self) {
        let (a_tx, b_rx) = mpsc::unbounded_channel();
        let (b_tx, a_rx) = mpsc::unbounded_channel();
        let a = Self {
            id: ConnectionId::next(),
            tx: Mutex::new(Some(a_tx)),
            rx: Mutex::new(a_rx),
        };
        let b = Self {
            id: ConnectionId::next(),
            tx: Mutex::new(Some(b_tx)),
            rx: Mutex::new(b_rx),
        };
        (a, b)
    }
}

impl Connection for MemoryConnection {
    async fn send(&self, data: &[u8]) -> Result<(), TransportError> {
        let guard = self.tx.lock().await;
        let tx = guard.as_ref().ok_or_else(|| {
            TransportError::ConnectionClosed("closed locally".into())
        })?;
        tx.send(data.to_vec()).map_err(|_| {
            TransportError::ConnectionClosed("peer end dropped".into())
        })
    }

    async fn recv(&self) -> Result<Option<Vec<u8>>, TransportError> {
        Ok(self.rx.lock().await.recv().await)
    }

    async fn close(&self) -> Result<(), TransportError> {
        // Dropping the sender is what the other end observes as close.
        self.tx.lock().await.take();
        Ok(())
    }

    fn id(&self) -> ConnectionId {
        self.id
    }
}
