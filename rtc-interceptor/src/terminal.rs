//! Terminal stage - the innermost link of every interceptor chain.

use crate::{Attributes, Carrier, RtcpPackets, Stage};
use shared::error::Result;

/// The innermost [`Stage`] of a chain, bridging it to the driver's [`Carrier`].
///
/// - `read_rtp`/`read_rtcp` return the packets the driver placed in the carrier,
///   with a fresh empty [`Attributes`] for RTP.
/// - `write_rtp`/`write_rtcp` hand the final packets to the sink the driver placed
///   in the carrier.
///
/// A carrier without the expected payload means the stage was driven outside
/// [`Chain`](crate::Chain), which is reported as a carrier error.
///
/// `close` is a no-op: the transport below the chain is owned and closed elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct Terminal;

impl Terminal {
    /// Create a new Terminal.
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Terminal {
    fn read_rtp(&self, carrier: &mut Carrier<'_>) -> Result<(rtp::packet::Packet, Attributes)> {
        let pkt = carrier.take_rtp()?;
        Ok((pkt, Attributes::new()))
    }

    fn write_rtp(
        &self,
        carrier: &mut Carrier<'_>,
        pkt: rtp::packet::Packet,
        _attributes: &mut Attributes,
    ) -> Result<()> {
        carrier.deliver_rtp(pkt)
    }

    fn read_rtcp(&self, carrier: &mut Carrier<'_>) -> Result<RtcpPackets> {
        carrier.take_rtcp()
    }

    fn write_rtcp(&self, carrier: &mut Carrier<'_>, pkts: RtcpPackets) -> Result<()> {
        carrier.deliver_rtcp(pkts)
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }
}
