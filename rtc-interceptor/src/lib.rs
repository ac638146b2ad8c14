//! RTC Interceptor - composable RTP/RTCP interceptor chain.
//!
//! An interceptor chain is an ordered pipeline of packet-transforming stages that
//! sits between the media transport and the application. Every inbound and outbound
//! RTP packet and RTCP packet list passes through the chain exactly once per
//! direction, so independently written interceptors (loss detection, retransmission,
//! statistics, congestion feedback, ...) can observe or rewrite packets without
//! knowing about each other.
//!
//! # Building Blocks
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Stage`] | One link of the pipeline: read/write RTP, read/write RTCP, close |
//! | [`Interceptor`] | Factory wrapping the next [`Stage`] into a new one, once per connection |
//! | [`Registry`] | Ordered list of interceptors, builds one [`Chain`] per connection |
//! | [`Chain`] | Driver turning plain read/write calls into calls through the nested stages |
//! | [`Carrier`] | Call-scoped value bridging the driver and the innermost stage |
//! | [`Attributes`] | Call-scoped metadata bag shared by the stages of one call |
//!
//! # Ordering
//!
//! [`Registry::build`] starts from the terminal stage and wraps it with each
//! interceptor in registration order. The **first** registered interceptor ends up
//! innermost (next to the transport) and the **last** one outermost (next to the
//! application):
//!
//! ```text
//! Registry::new().with(A).with(B)  =>  B( A( terminal ) )
//!
//! read:   Network → terminal → A → B → Application
//! write:  Application → B → A → terminal → Network
//! ```
//!
//! Read and write are mirror images around the same nesting: the stage nearest the
//! transport touches a packet first on the way in and last on the way out.
//!
//! # Writing a Stage
//!
//! A stage owns its next stage and either delegates unchanged, transforms the
//! result of a read, or transforms the input of a write. Operations a stage does
//! not care about can be generated with [`macro@passthrough`]:
//!
//! ```ignore
//! use rtc_interceptor::{Attributes, Carrier, Registry, Result, Stage, passthrough};
//!
//! struct SsrcRewriter {
//!     next: Box<dyn Stage>,
//!     ssrc: u32,
//! }
//!
//! #[passthrough(next = next)]
//! impl Stage for SsrcRewriter {
//!     fn write_rtp(
//!         &self,
//!         carrier: &mut Carrier<'_>,
//!         mut pkt: rtp::packet::Packet,
//!         attributes: &mut Attributes,
//!     ) -> Result<()> {
//!         pkt.header.ssrc = self.ssrc;
//!         self.next.write_rtp(carrier, pkt, attributes)
//!     }
//! }
//!
//! let registry = Registry::new()
//!     .with_fn(|_conn: &str, next| Box::new(SsrcRewriter { next, ssrc: 0x1234 }));
//!
//! let chain = registry.build("pc-1");
//! let written = chain.write_rtp(rtp::packet::Packet::default())?;
//! assert_eq!(written.map(|p| p.header.ssrc), Some(0x1234));
//! ```

#![warn(rust_2018_idioms)]

mod attributes;
mod carrier;
mod chain;
mod registry;
mod terminal;

pub use attributes::{AttributeKey, Attributes};
pub use carrier::{Carrier, CarrierKind};
pub use chain::Chain;
pub use interceptor_derive::passthrough;
pub use registry::Registry;
pub use shared::error::{Error, Result, flatten_errs};
pub use terminal::Terminal;

pub use rtcp;
pub use rtp;

/// An ordered list of RTCP packets, read or written as a whole.
pub type RtcpPackets = Vec<Box<dyn rtcp::packet::Packet + Send + Sync>>;

/// One link of an interceptor chain.
///
/// Every operation receives the call-scoped [`Carrier`], which a non-terminal stage
/// must pass on to its next stage untouched. For each operation a stage either:
/// - delegates unchanged and returns the next stage's result verbatim,
/// - delegates and then transforms the successful result (read direction), or
/// - transforms its input and then delegates (write direction).
///
/// Errors from the next stage are never suppressed. `close` must close the next
/// stage and report its error, see [`flatten_errs`].
///
/// Stages take `&self`: a chain may be driven from several threads at once, so
/// per-connection state lives behind interior mutability inside the stage.
pub trait Stage: Send + Sync {
    /// Read an inbound RTP packet together with the metadata attached so far.
    fn read_rtp(&self, carrier: &mut Carrier<'_>) -> Result<(rtp::packet::Packet, Attributes)>;

    /// Write an outbound RTP packet.
    fn write_rtp(
        &self,
        carrier: &mut Carrier<'_>,
        pkt: rtp::packet::Packet,
        attributes: &mut Attributes,
    ) -> Result<()>;

    /// Read an inbound RTCP packet list.
    fn read_rtcp(&self, carrier: &mut Carrier<'_>) -> Result<RtcpPackets>;

    /// Write an outbound RTCP packet list.
    fn write_rtcp(&self, carrier: &mut Carrier<'_>, pkts: RtcpPackets) -> Result<()>;

    /// Release the stage's resources and close the next stage.
    fn close(&self) -> Result<()>;
}

impl<S: Stage + ?Sized> Stage for Box<S> {
    fn read_rtp(&self, carrier: &mut Carrier<'_>) -> Result<(rtp::packet::Packet, Attributes)> {
        (**self).read_rtp(carrier)
    }

    fn write_rtp(
        &self,
        carrier: &mut Carrier<'_>,
        pkt: rtp::packet::Packet,
        attributes: &mut Attributes,
    ) -> Result<()> {
        (**self).write_rtp(carrier, pkt, attributes)
    }

    fn read_rtcp(&self, carrier: &mut Carrier<'_>) -> Result<RtcpPackets> {
        (**self).read_rtcp(carrier)
    }

    fn write_rtcp(&self, carrier: &mut Carrier<'_>, pkts: RtcpPackets) -> Result<()> {
        (**self).write_rtcp(carrier, pkts)
    }

    fn close(&self) -> Result<()> {
        (**self).close()
    }
}

/// Factory that wraps a [`Stage`] with a new one.
///
/// `intercept` is called exactly once per connection while [`Registry::build`]
/// assembles that connection's chain. The returned stage must own `next` and be
/// the only caller of it; dropping or replacing `next` severs the rest of the
/// chain. State private to one connection (e.g. a retransmission buffer) belongs
/// in the returned stage.
///
/// `C` is the connection handle. The chain never looks inside it, it is passed to
/// each interceptor as identity/context only.
///
/// Closures `Fn(&C, Box<dyn Stage>) -> Box<dyn Stage>` are interceptors too.
pub trait Interceptor<C: ?Sized = str>: Send + Sync {
    fn intercept(&self, conn: &C, next: Box<dyn Stage>) -> Box<dyn Stage>;
}

impl<C, F> Interceptor<C> for F
where
    C: ?Sized,
    F: Fn(&C, Box<dyn Stage>) -> Box<dyn Stage> + Send + Sync,
{
    fn intercept(&self, conn: &C, next: Box<dyn Stage>) -> Box<dyn Stage> {
        self(conn, next)
    }
}
