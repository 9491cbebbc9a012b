#![forbid(unsafe_code)]

//! WASM frontend for Folio portfolio pages.
//!
//! On `wasm32` this crate exports `PortfolioWeb` through `wasm-bindgen`: it
//! scans the live document, wires DOM listeners with `gloo`, and pushes
//! runtime patches to the page with `web-sys`. Host-side chrome decisions
//! that need no DOM live in [`chrome`] and are tested natively.

pub mod chrome;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::PortfolioWeb;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct PortfolioWeb;

#[cfg(not(target_arch = "wasm32"))]
impl PortfolioWeb {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
