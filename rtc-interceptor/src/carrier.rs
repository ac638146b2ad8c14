use crate::RtcpPackets;
use shared::error::{Error, Result};
use std::fmt;

/// Which of the four call kinds a [`Carrier`] was built for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CarrierKind {
    /// Holds the RTP packet handed to `Chain::read_rtp`
    ReadRtp,
    /// Holds the RTCP packets handed to `Chain::read_rtcp`
    ReadRtcp,
    /// Holds the sink that captures the RTP packet for `Chain::write_rtp`
    WriteRtp,
    /// Holds the sink that captures the RTCP packets for `Chain::write_rtcp`
    WriteRtcp,
}

impl fmt::Display for CarrierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CarrierKind::ReadRtp => "read-rtp",
            CarrierKind::ReadRtcp => "read-rtcp",
            CarrierKind::WriteRtp => "write-rtp",
            CarrierKind::WriteRtcp => "write-rtcp",
        };
        write!(f, "{s}")
    }
}

enum Payload<'a> {
    Empty,
    ReadRtp(Option<rtp::packet::Packet>),
    ReadRtcp(Option<RtcpPackets>),
    WriteRtp(&'a mut dyn FnMut(rtp::packet::Packet)),
    WriteRtcp(&'a mut dyn FnMut(RtcpPackets)),
}

/// Call-scoped value passed through every [`Stage`](crate::Stage) of one call.
///
/// Only the [`Chain`](crate::Chain) driver fills a carrier and only the terminal
/// stage reads it: on read it holds the packet the transport received, on write it
/// holds a sink borrowed from the driver's stack frame that captures the final
/// packet. Every other stage hands the carrier to its next stage untouched.
///
/// [`Carrier::default`] is an empty carrier; any stage operation driven with it
/// fails with the matching "not found in carrier" error.
pub struct Carrier<'a> {
    payload: Payload<'a>,
}

impl Default for Carrier<'_> {
    fn default() -> Self {
        Self {
            payload: Payload::Empty,
        }
    }
}

impl<'a> Carrier<'a> {
    pub(crate) fn read_rtp(pkt: rtp::packet::Packet) -> Self {
        Self {
            payload: Payload::ReadRtp(Some(pkt)),
        }
    }

    pub(crate) fn read_rtcp(pkts: RtcpPackets) -> Self {
        Self {
            payload: Payload::ReadRtcp(Some(pkts)),
        }
    }

    pub(crate) fn write_rtp(sink: &'a mut dyn FnMut(rtp::packet::Packet)) -> Self {
        Self {
            payload: Payload::WriteRtp(sink),
        }
    }

    pub(crate) fn write_rtcp(sink: &'a mut dyn FnMut(RtcpPackets)) -> Self {
        Self {
            payload: Payload::WriteRtcp(sink),
        }
    }

    /// The call kind this carrier was built for, `None` for an empty carrier.
    pub fn kind(&self) -> Option<CarrierKind> {
        match self.payload {
            Payload::Empty => None,
            Payload::ReadRtp(_) => Some(CarrierKind::ReadRtp),
            Payload::ReadRtcp(_) => Some(CarrierKind::ReadRtcp),
            Payload::WriteRtp(_) => Some(CarrierKind::WriteRtp),
            Payload::WriteRtcp(_) => Some(CarrierKind::WriteRtcp),
        }
    }

    /// Take the RTP packet out of a read carrier. Succeeds at most once per call.
    pub(crate) fn take_rtp(&mut self) -> Result<rtp::packet::Packet> {
        match &mut self.payload {
            Payload::ReadRtp(pkt) => pkt.take().ok_or(Error::ErrRtpPacketNotFound),
            _ => Err(Error::ErrRtpPacketNotFound),
        }
    }

    /// Take the RTCP packets out of a read carrier. Succeeds at most once per call.
    pub(crate) fn take_rtcp(&mut self) -> Result<RtcpPackets> {
        match &mut self.payload {
            Payload::ReadRtcp(pkts) => pkts.take().ok_or(Error::ErrRtcpPacketsNotFound),
            _ => Err(Error::ErrRtcpPacketsNotFound),
        }
    }

    /// Hand the final RTP packet to the driver's sink.
    pub(crate) fn deliver_rtp(&mut self, pkt: rtp::packet::Packet) -> Result<()> {
        match &mut self.payload {
            Payload::WriteRtp(sink) => {
                (*sink)(pkt);
                Ok(())
            }
            _ => Err(Error::ErrRtpWriterNotFound),
        }
    }

    /// Hand the final RTCP packets to the driver's sink.
    pub(crate) fn deliver_rtcp(&mut self, pkts: RtcpPackets) -> Result<()> {
        match &mut self.payload {
            Payload::WriteRtcp(sink) => {
                (*sink)(pkts);
                Ok(())
            }
            _ => Err(Error::ErrRtcpWriterNotFound),
        }
    }
}

impl fmt::Debug for Carrier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Carrier")
            .field("kind", &self.kind())
            .finish()
    }
}
