//! Frame transport between the bus hardware and the protocol stack.
//!
//! Two fixed-capacity `heapless::spsc` queues, one per direction, each with
//! exactly one producer and one consumer:
//!
//! ```text
//!              hw_received()            try_dequeue_rx()
//!  interrupt ─────────────────▶ RX queue ────────────────▶ polling task
//!  / driver  ◀───────────────── TX queue ◀──────────────── (ProtocolStack)
//!              hw_next_tx()             enqueue_tx()
//! ```
//!
//! [`FrameTransport::split`] hands out a [`BusSide`] and a [`StackSide`]. Each
//! handle owns the producer end of one queue and the consumer end of the other,
//! so no lock is required. The queue publishes a slot only after it is written
//! and frees it only after it is read.
//!
//! A queue of capacity `N` holds at most `N - 1` frames. A failed enqueue leaves
//! the queue untouched and hands the frame back as [`QueueFull`].
use crate::error::QueueFull;
use crate::protocol::transport::can_frame::CanFrame;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use heapless::spsc::{Consumer, Producer, Queue};

//==================================================================================FRAME_TRANSPORT
/// Transmit and receive queues plus the wake-up signals of their consumers.
pub struct FrameTransport<const TX: usize, const RX: usize> {
    tx: Queue<CanFrame, TX>,
    rx: Queue<CanFrame, RX>,
    /// Raised on every successful TX enqueue; awaited by the bus driver.
    tx_ready: Signal<CriticalSectionRawMutex, ()>,
    /// Raised on every successful RX push; awaited by the polling task.
    rx_ready: Signal<CriticalSectionRawMutex, ()>,
}

impl<const TX: usize, const RX: usize> Default for FrameTransport<TX, RX> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const TX: usize, const RX: usize> FrameTransport<TX, RX> {
    pub const fn new() -> Self {
        Self {
            tx: Queue::new(),
            rx: Queue::new(),
            tx_ready: Signal::new(),
            rx_ready: Signal::new(),
        }
    }

    /// Split into the hardware-facing and stack-facing handles.
    ///
    /// The exclusive borrow guarantees a single pair of handles exists at a time.
    pub fn split(&mut self) -> (BusSide<'_, TX, RX>, StackSide<'_, TX, RX>) {
        let (tx_producer, tx_consumer) = self.tx.split();
        let (rx_producer, rx_consumer) = self.rx.split();
        (
            BusSide {
                rx: rx_producer,
                tx: tx_consumer,
                tx_ready: &self.tx_ready,
                rx_ready: &self.rx_ready,
            },
            StackSide {
                tx: tx_producer,
                rx: rx_consumer,
                tx_ready: &self.tx_ready,
                rx_ready: &self.rx_ready,
            },
        )
    }
}

//==================================================================================BUS_SIDE
/// Hardware-facing handle: RX producer and TX consumer.
///
/// Used from the receive interrupt / bus driver.
pub struct BusSide<'a, const TX: usize, const RX: usize> {
    rx: Producer<'a, CanFrame, RX>,
    tx: Consumer<'a, CanFrame, TX>,
    tx_ready: &'a Signal<CriticalSectionRawMutex, ()>,
    rx_ready: &'a Signal<CriticalSectionRawMutex, ()>,
}

impl<'a, const TX: usize, const RX: usize> BusSide<'a, TX, RX> {
    /// Deliver a received frame to the stack. On a full queue the frame is dropped.
    pub fn hw_received(&mut self, frame: CanFrame) -> Result<(), QueueFull> {
        self.rx.enqueue(frame).map_err(|_| QueueFull)?;
        self.rx_ready.signal(());
        Ok(())
    }

    /// Next frame the hardware should transmit.
    pub fn hw_next_tx(&mut self) -> Option<CanFrame> {
        self.tx.dequeue()
    }

    /// Wait until the stack queued at least one frame since the last wake-up.
    pub async fn wait_tx_ready(&self) {
        self.tx_ready.wait().await
    }

    pub fn is_tx_empty(&self) -> bool {
        !self.tx.ready()
    }

    pub fn is_rx_full(&self) -> bool {
        !self.rx.ready()
    }
}

//==================================================================================STACK_SIDE
/// Stack-facing handle: TX producer and RX consumer, owned by the polling task.
pub struct StackSide<'a, const TX: usize, const RX: usize> {
    tx: Producer<'a, CanFrame, TX>,
    rx: Consumer<'a, CanFrame, RX>,
    tx_ready: &'a Signal<CriticalSectionRawMutex, ()>,
    rx_ready: &'a Signal<CriticalSectionRawMutex, ()>,
}

impl<'a, const TX: usize, const RX: usize> StackSide<'a, TX, RX> {
    /// Queue a frame for transmission and wake the bus driver.
    ///
    /// Never blocks; on a full queue the frame is dropped and not retried.
    pub fn enqueue_tx(&mut self, frame: CanFrame) -> Result<(), QueueFull> {
        self.tx.enqueue(frame).map_err(|_| QueueFull)?;
        self.tx_ready.signal(());
        Ok(())
    }

    /// Next received frame, in arrival order.
    pub fn try_dequeue_rx(&mut self) -> Option<CanFrame> {
        self.rx.dequeue()
    }

    /// Wait until the hardware delivered at least one frame since the last wake-up.
    pub async fn wait_rx_ready(&self) {
        self.rx_ready.wait().await
    }

    pub fn is_tx_full(&self) -> bool {
        !self.tx.ready()
    }

    pub fn is_tx_empty(&self) -> bool {
        self.tx.len() == 0
    }

    pub fn is_rx_full(&self) -> bool {
        self.rx.len() == self.rx.capacity()
    }

    pub fn is_rx_empty(&self) -> bool {
        !self.rx.ready()
    }

    /// Frames waiting for the hardware.
    pub fn tx_len(&self) -> usize {
        self.tx.len()
    }

    /// Frames waiting for the stack.
    pub fn rx_len(&self) -> usize {
        self.rx.len()
    }
}
