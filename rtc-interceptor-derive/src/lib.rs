//! Procedural macros for `rtc-interceptor`.
//!
//! [`macro@passthrough`] fills in the `Stage` operations an interceptor does not
//! override, so a stage implementation only has to spell out the directions it
//! actually touches.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{Ident, ImplItem, ItemImpl, LitStr, Path, parse_macro_input, parse_quote};

const STAGE_OPS: [&str; 5] = ["read_rtp", "write_rtp", "read_rtcp", "write_rtcp", "close"];

/// Generate pass-through `Stage` operations.
///
/// Apply to an `impl Stage for T` block. Every operation missing from the block is
/// generated as a verbatim delegation to the field named by `next` (default: `next`).
/// The field may be a `Box<dyn Stage>` or any type implementing `Stage`.
///
/// `krate = "path"` overrides the path of the interceptor crate, for dependents that
/// import `rtc-interceptor` under another name.
///
/// # Example
///
/// ```ignore
/// use rtc_interceptor::{Attributes, Carrier, Result, Stage, passthrough};
///
/// struct SsrcRewriter {
///     next: Box<dyn Stage>,
///     ssrc: u32,
/// }
///
/// #[passthrough(next = next)]
/// impl Stage for SsrcRewriter {
///     fn write_rtp(
///         &self,
///         carrier: &mut Carrier<'_>,
///         mut pkt: rtp::packet::Packet,
///         attributes: &mut Attributes,
///     ) -> Result<()> {
///         pkt.header.ssrc = self.ssrc;
///         self.next.write_rtp(carrier, pkt, attributes)
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn passthrough(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut next = Ident::new("next", Span::call_site());
    let mut krate: Path = parse_quote!(::rtc_interceptor);

    let attr_parser = syn::meta::parser(|meta| {
        if meta.path.is_ident("next") {
            next = meta.value()?.parse()?;
            Ok(())
        } else if meta.path.is_ident("krate") {
            let lit: LitStr = meta.value()?.parse()?;
            krate = lit.parse()?;
            Ok(())
        } else {
            Err(meta.error("unsupported passthrough attribute, expected `next` or `krate`"))
        }
    });
    parse_macro_input!(attr with attr_parser);

    let mut item_impl = parse_macro_input!(item as ItemImpl);
    if item_impl.trait_.is_none() {
        return syn::Error::new_spanned(
            &item_impl.self_ty,
            "#[passthrough] must be applied to an `impl Stage for ..` block",
        )
        .to_compile_error()
        .into();
    }

    let defined: Vec<String> = item_impl
        .items
        .iter()
        .filter_map(|item| match item {
            ImplItem::Fn(f) => Some(f.sig.ident.to_string()),
            _ => None,
        })
        .collect();

    for op in STAGE_OPS {
        if defined.iter().any(|name| name == op) {
            continue;
        }
        item_impl.items.push(delegate(op, &krate, &next));
    }

    quote!(#item_impl).into()
}

fn delegate(op: &str, krate: &Path, next: &Ident) -> ImplItem {
    match op {
        "read_rtp" => parse_quote! {
            fn read_rtp(
                &self,
                carrier: &mut #krate::Carrier<'_>,
            ) -> #krate::Result<(#krate::rtp::packet::Packet, #krate::Attributes)> {
                #krate::Stage::read_rtp(&self.#next, carrier)
            }
        },
        "write_rtp" => parse_quote! {
            fn write_rtp(
                &self,
                carrier: &mut #krate::Carrier<'_>,
                pkt: #krate::rtp::packet::Packet,
                attributes: &mut #krate::Attributes,
            ) -> #krate::Result<()> {
                #krate::Stage::write_rtp(&self.#next, carrier, pkt, attributes)
            }
        },
        "read_rtcp" => parse_quote! {
            fn read_rtcp(
                &self,
                carrier: &mut #krate::Carrier<'_>,
            ) -> #krate::Result<#krate::RtcpPackets> {
                #krate::Stage::read_rtcp(&self.#next, carrier)
            }
        },
        "write_rtcp" => parse_quote! {
            fn write_rtcp(
                &self,
                carrier: &mut #krate::Carrier<'_>,
                pkts: #krate::RtcpPackets,
            ) -> #krate::Result<()> {
                #krate::Stage::write_rtcp(&self.#next, carrier, pkts)
            }
        },
        _ => parse_quote! {
            fn close(&self) -> #krate::Result<()> {
                #krate::Stage::close(&self.#next)
            }
        },
    }
}
