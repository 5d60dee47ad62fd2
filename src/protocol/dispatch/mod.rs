//! The protocol stack: one owned context through which every inbound frame
//! is routed and every outbound frame is built.
//!
//! Inbound frames are classified by PDU format in a fixed order:
//!
//! 1. transport connection management (commanded address sessions),
//! 2. transport data transfer,
//! 3. request for DGN,
//! 4. address claimed,
//! 5. the application tables in [`routes`].
//!
//! Peer-to-peer (PDU1) frames must be addressed to us or to the global
//! address; anything else is `NotHandled`.
use crate::config::StackConfig;
use crate::core::FieldKind;
use crate::error::{ClaimError, FieldError, QueueFull, SegmentError};
use crate::protocol::dgn::{self, *};
use crate::protocol::fields::numbers::FieldRange;
use crate::protocol::fields::system::SYSTEM_FIELDS;
use crate::protocol::fields::{
    self, FieldResponse, GetFieldCommand, RvcDevice, SetFieldCommand,
};
use crate::protocol::managment::address_claiming::{AddressClaimer, ClaimState};
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::can_id::CanId;
use crate::protocol::transport::multipacket::{ConnectionAnnounce, MultiPacketBuilder};
use crate::protocol::transport::queue::StackSide;
use crate::protocol::transport::traits::receive_filter::ReceiveFilter;
use crate::protocol::transport::{DEFAULT_PRIORITY, MAX_FRAME_PAYLOAD};
use embassy_time::Duration;

pub mod routes;

use routes::Route;

const PF_CONNECTION_MANAGEMENT: u8 = dgn::pdu_format(TRANSPORT_CONNECTION_MANAGEMENT);
const PF_DATA_TRANSFER: u8 = dgn::pdu_format(TRANSPORT_DATA_TRANSFER);
const PF_REQUEST: u8 = dgn::pdu_format(REQUEST);
const PF_ADDRESS_CLAIMED: u8 = dgn::pdu_format(ADDRESS_CLAIMED);

/// Result of routing one inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dispatch {
    Handled,
    /// Unroutable, not addressed to us, or malformed. The caller drops it.
    NotHandled,
}

/// Configuration and claim state of this node; the owner of the system fields.
#[derive(Debug, Clone)]
pub struct NodeState {
    pub config: StackConfig,
    pub claimer: AddressClaimer,
}

impl NodeState {
    pub const fn new(config: StackConfig) -> Self {
        Self {
            claimer: AddressClaimer::new(config.name),
            config,
        }
    }
}

//==================================================================================PROTOCOL_STACK
/// Owned protocol context of one node.
pub struct ProtocolStack<'a, F, const TX: usize, const RX: usize>
where
    F: ReceiveFilter,
{
    transport: StackSide<'a, TX, RX>,
    node: NodeState,
    filter: F,
}

impl<'a, F, const TX: usize, const RX: usize> ProtocolStack<'a, F, TX, RX>
where
    F: ReceiveFilter,
{
    pub fn new(transport: StackSide<'a, TX, RX>, config: StackConfig, filter: F) -> Self {
        Self {
            transport,
            node: NodeState::new(config),
            filter,
        }
    }

    #[inline]
    pub fn config(&self) -> &StackConfig {
        &self.node.config
    }

    #[inline]
    pub fn claimer(&self) -> &AddressClaimer {
        &self.node.claimer
    }

    #[inline]
    pub fn node(&self) -> &NodeState {
        &self.node
    }

    /// Source address stamped on outbound frames.
    #[inline]
    pub fn address(&self) -> u8 {
        self.node.claimer.address()
    }

    #[inline]
    pub fn claim_state(&self) -> ClaimState {
        self.node.claimer.state()
    }

    #[inline]
    pub fn transport(&self) -> &StackSide<'a, TX, RX> {
        &self.transport
    }

    #[inline]
    pub fn filter(&self) -> &F {
        &self.filter
    }

    //==============================================================================ADDRESSING
    /// Claim the configured preferred address.
    pub fn start(&mut self) -> Result<(), ClaimError> {
        self.claim_address(self.node.config.preferred_address)
    }

    pub fn claim_address(&mut self, desired: u8) -> Result<(), ClaimError> {
        self.node
            .claimer
            .start_claim(desired, &mut self.transport, &mut self.filter)
    }

    /// Advance the contention timer by the time elapsed since the last call.
    pub fn poll(&mut self, elapsed: Duration) {
        self.node
            .claimer
            .poll(elapsed, &mut self.transport, &mut self.filter);
    }

    //==============================================================================OUTBOUND
    /// Single frame from our current address. The payload is truncated to eight bytes.
    pub fn build(&self, dgn: u32, priority: u8, payload: &[u8]) -> CanFrame {
        let id = CanId::builder(dgn, self.address())
            .with_priority(priority)
            .build();
        CanFrame::extended(id, payload)
    }

    pub fn send(&mut self, dgn: u32, priority: u8, payload: &[u8]) -> Result<(), QueueFull> {
        let frame = self.build(dgn, priority, payload);
        let result = self.transport.enqueue_tx(frame);
        if result.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("TX queue full, DGN {=u32:#x} dropped", dgn);
        }
        result
    }

    /// Broadcast `payload` as announce plus data frames, whatever its size.
    ///
    /// Every frame is offered to the TX queue even after one was dropped; the
    /// number of dropped frames is reported.
    pub fn send_multipacket(&mut self, dgn: u32, payload: &[u8]) -> Result<(), SegmentError> {
        let builder = MultiPacketBuilder::new(dgn, self.address(), payload)?;
        self.enqueue_segments(dgn, builder)
    }

    /// Single frame when `payload` fits, multi-packet otherwise. Both paths
    /// carry `priority`.
    pub fn send_payload(&mut self, dgn: u32, priority: u8, payload: &[u8]) -> Result<(), SegmentError> {
        if payload.len() <= MAX_FRAME_PAYLOAD {
            self.send(dgn, priority, payload)?;
            Ok(())
        } else {
            let builder = MultiPacketBuilder::new(dgn, self.address(), payload)?.with_priority(priority);
            self.enqueue_segments(dgn, builder)
        }
    }

    #[cfg_attr(not(feature = "defmt"), allow(unused_variables))]
    fn enqueue_segments(&mut self, dgn: u32, builder: MultiPacketBuilder<'_>) -> Result<(), SegmentError> {
        let mut dropped = 0;
        for frame in builder.build() {
            if self.transport.enqueue_tx(frame).is_err() {
                dropped += 1;
            }
        }
        if dropped > 0 {
            #[cfg(feature = "defmt")]
            defmt::warn!("Multi-packet DGN {=u32:#x} lost {=usize} frame(s)", dgn, dropped);
            return Err(SegmentError::QueueFull { dropped });
        }
        Ok(())
    }

    //==============================================================================FIELDS
    /// Serialize field `field` into `response`.
    ///
    /// An unknown field still leaves the four-byte "none" response behind;
    /// a command for another instance leaves `response` empty.
    pub fn get_field<D: RvcDevice>(
        &self,
        instance: u8,
        field: u16,
        device: &D,
        response: &mut FieldResponse,
    ) -> Result<FieldKind, FieldError> {
        *response = FieldResponse::new();
        if !self.node.config.is_rvc_cmd_for_me(instance) {
            return Err(FieldError::NotForMe);
        }
        let value = match FieldRange::of(field) {
            FieldRange::System => fields::read(SYSTEM_FIELDS, &self.node, field),
            _ => fields::read(D::FIELDS, device, field),
        };
        match value {
            Ok(value) => {
                *response = FieldResponse::from_value(instance, field, &value);
                Ok(value.kind())
            }
            Err(error) => {
                *response = FieldResponse::none(instance, field);
                Err(error)
            }
        }
    }

    /// Write four raw bytes into field `field`.
    pub fn set_field<D: RvcDevice>(
        &mut self,
        instance: u8,
        field: u16,
        raw: [u8; 4],
        device: &mut D,
    ) -> Result<(), FieldError> {
        if !self.node.config.is_rvc_cmd_for_me(instance) {
            return Err(FieldError::NotForMe);
        }
        match FieldRange::of(field) {
            FieldRange::System => fields::write(SYSTEM_FIELDS, &mut self.node, field, raw),
            _ => fields::write(D::FIELDS, device, field, raw),
        }
    }

    //==============================================================================INBOUND
    /// Drain the RX queue through [`dispatch`](Self::dispatch). Returns the number of frames seen.
    pub fn process_rx<D: RvcDevice>(&mut self, device: &mut D) -> usize {
        let mut processed = 0;
        while let Some(frame) = self.transport.try_dequeue_rx() {
            if self.dispatch(&frame, device) == Dispatch::NotHandled {
                #[cfg(feature = "defmt")]
                defmt::trace!("Dropped frame {=u32:#x}", frame.raw_id());
            }
            processed += 1;
        }
        processed
    }

    /// Route one inbound frame.
    pub fn dispatch<D: RvcDevice>(&mut self, frame: &CanFrame, device: &mut D) -> Dispatch {
        if frame.is_remote_request() {
            return Dispatch::NotHandled;
        }
        let Some(id) = frame.can_id() else {
            return Dispatch::NotHandled;
        };
        let payload = frame.payload();

        match id.pdu_format() {
            PF_CONNECTION_MANAGEMENT => self.on_connection_management(id, payload),
            PF_DATA_TRANSFER => self.on_data_transfer(id, payload),
            PF_REQUEST => self.on_request(id, payload),
            PF_ADDRESS_CLAIMED => self.on_address_claimed(id, payload),
            _ => self.on_application(id, payload, device),
        }
    }

    /// Global, or peer-to-peer to the address we currently hold.
    fn is_for_us(&self, id: CanId) -> bool {
        match id.destination() {
            None | Some(GLOBAL_ADDRESS) => true,
            Some(destination) => {
                destination != NULL_ADDRESS && destination == self.node.claimer.address()
            }
        }
    }

    fn on_connection_management(&mut self, id: CanId, payload: &[u8]) -> Dispatch {
        if !self.is_for_us(id) {
            return Dispatch::NotHandled;
        }
        match ConnectionAnnounce::parse(payload) {
            Some(announce) if dgn::route_key(announce.dgn) == COMMANDED_ADDRESS => {
                self.node.claimer.begin_commanded_address(id.source_address());
                Dispatch::Handled
            }
            _ => {
                #[cfg(feature = "defmt")]
                defmt::trace!("Segmented transfer from {=u8} not reassembled", id.source_address());
                Dispatch::NotHandled
            }
        }
    }

    fn on_data_transfer(&mut self, id: CanId, payload: &[u8]) -> Dispatch {
        let source = id.source_address();
        if !self.is_for_us(id) || self.node.claimer.commanded_session().requester() != Some(source) {
            return Dispatch::NotHandled;
        }
        if let Some(address) =
            self.node
                .claimer
                .on_commanded_data(source, payload, &mut self.transport, &mut self.filter)
        {
            self.node.config.preferred_address = address;
        }
        Dispatch::Handled
    }

    fn on_request(&mut self, id: CanId, payload: &[u8]) -> Dispatch {
        let [b0, b1, b2, ..] = payload else {
            return Dispatch::NotHandled;
        };
        if !self.is_for_us(id) {
            return Dispatch::NotHandled;
        }
        let requested = u32::from_le_bytes([*b0, *b1, *b2 & 0x01, 0]);
        let requester = id.source_address();
        let targeted = id.destination() != Some(GLOBAL_ADDRESS);

        if dgn::route_key(requested) == ADDRESS_CLAIMED {
            if self.node.claimer.respond_to_request(&mut self.transport).is_err() {
                #[cfg(feature = "defmt")]
                defmt::warn!("Address claim response to {=u8} dropped", requester);
            }
            return Dispatch::Handled;
        }
        // Only the claim may be sent from the null address.
        if self.address() == NULL_ADDRESS {
            return Dispatch::NotHandled;
        }

        let result = match requested {
            PRODUCT_IDENTIFICATION => {
                let product_id: &'static str = self.node.config.product_id;
                self.send_payload(PRODUCT_IDENTIFICATION, DEFAULT_PRIORITY, product_id.as_bytes())
            }
            SOFTWARE_IDENTIFICATION => {
                let software_id: &'static str = self.node.config.software_id;
                self.send_payload(SOFTWARE_IDENTIFICATION, DEFAULT_PRIORITY, software_id.as_bytes())
            }
            SENSATA_FIELD_STATUS => Ok(()),
            _ if targeted => self.send_nack(requester, requested).map_err(SegmentError::from),
            _ => return Dispatch::NotHandled,
        };
        if result.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Response to request for {=u32:#x} dropped", requested);
        }
        Dispatch::Handled
    }

    /// Negative acknowledgment of a request for `requested`.
    fn send_nack(&mut self, requester: u8, requested: u32) -> Result<(), QueueFull> {
        let dgn_bytes = requested.to_le_bytes();
        let payload = [
            ACK_CONTROL_NACK,
            0xFF,
            0xFF,
            0xFF,
            requester,
            dgn_bytes[0],
            dgn_bytes[1],
            dgn_bytes[2],
        ];
        self.send(
            dgn::to_destination(ACKNOWLEDGMENT, requester),
            DEFAULT_PRIORITY,
            &payload,
        )
    }

    fn on_address_claimed(&mut self, id: CanId, payload: &[u8]) -> Dispatch {
        let result = self.node.claimer.on_address_claimed(
            id.source_address(),
            payload,
            &mut self.transport,
            &mut self.filter,
        );
        if result.is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("Address claim lost to node {=u8}", id.source_address());
        }
        Dispatch::Handled
    }

    fn on_application<D: RvcDevice>(&mut self, id: CanId, payload: &[u8], device: &mut D) -> Dispatch {
        if !self.is_for_us(id) {
            return Dispatch::NotHandled;
        }
        let Some(route) = routes::find_route(id.dgn()) else {
            #[cfg(feature = "defmt")]
            defmt::trace!("Unroutable DGN {=u32:#x}", id.dgn());
            return Dispatch::NotHandled;
        };

        match route {
            Route::FieldGet => self.on_field_get(payload, device),
            Route::FieldSet => self.on_field_set(payload, device),
            Route::InstanceCommand => match payload.first() {
                Some(&instance) if self.node.config.is_rvc_cmd_for_me(instance) => {
                    handled(device.handle_command(dgn::route_key(id.dgn()), payload))
                }
                _ => Dispatch::NotHandled,
            },
            Route::NodeCommand => handled(device.handle_command(dgn::route_key(id.dgn()), payload)),
        }
    }

    fn on_field_get<D: RvcDevice>(&mut self, payload: &[u8], device: &mut D) -> Dispatch {
        let Some(command) = GetFieldCommand::parse(payload) else {
            return Dispatch::NotHandled;
        };
        let mut response = FieldResponse::new();
        if let Err(FieldError::NotForMe) =
            self.get_field(command.instance, command.field, device, &mut response)
        {
            return Dispatch::NotHandled;
        }
        self.send_field_status(&response);
        Dispatch::Handled
    }

    /// A successful set is answered with the new value, a failed one with "none".
    fn on_field_set<D: RvcDevice>(&mut self, payload: &[u8], device: &mut D) -> Dispatch {
        let Some(command) = SetFieldCommand::parse(payload) else {
            return Dispatch::NotHandled;
        };
        let mut response = FieldResponse::none(command.instance, command.field);
        match self.set_field(command.instance, command.field, command.raw, device) {
            Err(FieldError::NotForMe) => return Dispatch::NotHandled,
            Err(_error) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("Field set rejected: {}", _error);
            }
            Ok(()) => {
                let _ = self.get_field(command.instance, command.field, device, &mut response);
            }
        }
        self.send_field_status(&response);
        Dispatch::Handled
    }

    fn send_field_status(&mut self, response: &FieldResponse) {
        if self
            .send_payload(SENSATA_FIELD_STATUS, DEFAULT_PRIORITY, response.as_bytes())
            .is_err()
        {
            #[cfg(feature = "defmt")]
            defmt::warn!("Field status dropped");
        }
    }
}

#[inline]
fn handled(acted: bool) -> Dispatch {
    if acted {
        Dispatch::Handled
    } else {
        Dispatch::NotHandled
    }
}
