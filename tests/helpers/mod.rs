//! Test doubles to simulate the CAN bus during integration tests.
use rvc_stack::config::{CanBaud, StackConfig};
use rvc_stack::protocol::fields::{FieldDescriptor, RvcDevice};
use rvc_stack::protocol::managment::ca_name::CaName;
use rvc_stack::protocol::transport::{can_frame::CanFrame, traits::can_bus::CanBus};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

#[derive(Clone)]
#[allow(dead_code)]
/// In-memory CAN bus reproducing the `CanBus` trait behavior.
pub struct MockCanBus {
    tx: mpsc::UnboundedSender<CanFrame>,
    rx: Arc<Mutex<mpsc::UnboundedReceiver<CanFrame>>>,
}

#[allow(dead_code)]
impl MockCanBus {
    /// Construct a pair of interconnected buses (DUT ↔ host).
    pub fn create_pair() -> (Self, Self) {
        let (dut_tx, host_rx) = mpsc::unbounded_channel();
        let (host_tx, dut_rx) = mpsc::unbounded_channel();

        let dut_bus = Self {
            tx: dut_tx,
            rx: Arc::new(Mutex::new(dut_rx)),
        };

        let host_bus = Self {
            tx: host_tx,
            rx: Arc::new(Mutex::new(host_rx)),
        };

        (dut_bus, host_bus)
    }
}

impl CanBus for MockCanBus {
    type Error = ();

    async fn send<'a>(&'a mut self, frame: &'a CanFrame) -> Result<(), Self::Error> {
        self.tx.send(*frame).map_err(|_| ())?;
        Ok(())
    }

    async fn recv(&mut self) -> Result<CanFrame, Self::Error> {
        let mut rx = self.rx.lock().await;
        rx.recv().await.ok_or(())
    }
}

/// Device exposing no fields and accepting no commands.
#[allow(dead_code)]
pub struct IdleDevice;

impl RvcDevice for IdleDevice {
    const FIELDS: &'static [FieldDescriptor<Self>] = &[];
}

#[allow(dead_code)]
/// Node configuration shared by the scenarios.
pub fn node_config(name: u64, address: u8) -> StackConfig {
    StackConfig::new(CaName::from_raw(name))
        .with_preferred_address(address)
        .with_instance(1)
        .with_baud(CanBaud::Baud250k)
        .with_product_id("Sensata*PC-3000*0042*1*")
        .with_software_id("FW 2.4.1")
}
