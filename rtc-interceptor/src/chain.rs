//! Interceptor Chain - the driver of a built interceptor pipeline.

use crate::carrier::Carrier;
use crate::{Attributes, RtcpPackets, Stage};
use log::{debug, trace, warn};
use shared::error::{Error, Result};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

/// A fully nested interceptor pipeline for one connection.
///
/// `Chain` is the only entry point the transport side uses: each operation builds
/// a fresh [`Carrier`] for the call, runs it through the outermost stage and hands
/// back a plain value. The nesting is fixed at [`Registry::build`](crate::Registry::build)
/// time, so a `Chain` can be shared between a reader and a writer thread.
///
/// On any stage error the call returns that error unchanged and no packet.
pub struct Chain {
    stage: Box<dyn Stage>,
    closed: AtomicBool,
}

impl Chain {
    pub(crate) fn new(stage: Box<dyn Stage>) -> Self {
        Self {
            stage,
            closed: AtomicBool::new(false),
        }
    }

    /// Run a freshly received RTP packet through the chain, innermost stage first.
    ///
    /// Returns the packet the application receives.
    pub fn read_rtp(&self, pkt: rtp::packet::Packet) -> Result<rtp::packet::Packet> {
        self.check_open()?;
        trace!(
            "interceptor chain read rtp ssrc={} seq={}",
            pkt.header.ssrc, pkt.header.sequence_number
        );

        let mut carrier = Carrier::read_rtp(pkt);
        let (pkt, _attributes) = self.stage.read_rtp(&mut carrier)?;
        Ok(pkt)
    }

    /// Run an outgoing RTP packet through the chain, outermost stage first.
    ///
    /// Returns the packet the transport should send, or `None` if a stage dropped
    /// it. If a stage forwards more than one packet in a single call, the last one
    /// delivered to the terminal is returned.
    pub fn write_rtp(&self, pkt: rtp::packet::Packet) -> Result<Option<rtp::packet::Packet>> {
        self.check_open()?;
        trace!(
            "interceptor chain write rtp ssrc={} seq={}",
            pkt.header.ssrc, pkt.header.sequence_number
        );

        let mut written = None;
        let mut sink = |pkt: rtp::packet::Packet| written = Some(pkt);
        let mut carrier = Carrier::write_rtp(&mut sink);
        let mut attributes = Attributes::new();
        self.stage.write_rtp(&mut carrier, pkt, &mut attributes)?;

        if written.is_none() {
            warn!("interceptor chain write rtp: packet dropped before reaching transport");
        }
        Ok(written)
    }

    /// Run a received RTCP packet list through the chain, innermost stage first.
    pub fn read_rtcp(&self, pkts: RtcpPackets) -> Result<RtcpPackets> {
        self.check_open()?;
        trace!("interceptor chain read {} rtcp packets", pkts.len());

        let mut carrier = Carrier::read_rtcp(pkts);
        self.stage.read_rtcp(&mut carrier)
    }

    /// Run an outgoing RTCP packet list through the chain, outermost stage first.
    ///
    /// Same `None`/last-wins rules as [`Chain::write_rtp`].
    pub fn write_rtcp(&self, pkts: RtcpPackets) -> Result<Option<RtcpPackets>> {
        self.check_open()?;
        trace!("interceptor chain write {} rtcp packets", pkts.len());

        let mut written = None;
        let mut sink = |pkts: RtcpPackets| written = Some(pkts);
        let mut carrier = Carrier::write_rtcp(&mut sink);
        self.stage.write_rtcp(&mut carrier, pkts)?;

        if written.is_none() {
            warn!("interceptor chain write rtcp: packets dropped before reaching transport");
        }
        Ok(written)
    }

    /// Close every stage of the chain, outermost first.
    ///
    /// Only the first call cascades; later calls return `Ok(())`.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        debug!("closing interceptor chain");
        let result = self.stage.close();
        if let Err(err) = &result {
            warn!("interceptor chain close: {err}");
        }
        result
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn check_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(Error::ErrInterceptorChainClosed)
        } else {
            Ok(())
        }
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("closed", &self.is_closed())
            .finish()
    }
}
