use tokio::sync::mpsc;
use tracing::debug;

/// Outbound queue of an aggregator.
///
/// A consumer that drops its receiver only stops receiving; the aggregator
/// keeps draining its input so producers are never stalled.
pub(crate) struct Output<T> {
    tx: mpsc::Sender<T>,
    name: &'static str,
    open: bool,
}

impl<T> Output<T> {
    pub(crate) const fn new(tx: mpsc::Sender<T>, name: &'static str) -> Self {
        Self {
            tx,
            name,
            open: true,
        }
    }

    pub(crate) async fn emit(&mut self, value: T) {
        if self.open && self.tx.send(value).await.is_err() {
            debug!("{} receiver dropped; discarding further values.", self.name);
            self.open = false;
        }
    }

    pub(crate) fn into_sender(self) -> mpsc::Sender<T> {
        self.tx
    }
}
