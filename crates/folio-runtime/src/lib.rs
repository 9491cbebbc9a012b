#![forbid(unsafe_code)]

//! Runtime for Folio portfolio pages.
//!
//! [`program::PortfolioPage`] owns page state and turns events into a
//! desired [`render::PageView`] plus [`program::Effect`]s.
//! [`runtime::PageRuntime`] diffs successive views and pushes the patches
//! to a [`surface::PageSurface`]. [`simulator::PageSimulator`] drives the
//! whole loop against an in-memory surface for tests.

pub mod log_capture;
pub mod program;
pub mod render;
pub mod runtime;
pub mod simulator;
pub mod surface;

pub use log_capture::{LogCaptureHandle, LogCaptureLayer};
pub use program::{Effect, PageSnapshot, PortfolioPage};
pub use render::{ClassRole, DomPatch, FormMessage, MessageTone, PageView, Target, ViewDiff};
pub use runtime::{DispatchReport, PageRuntime};
pub use simulator::PageSimulator;
pub use surface::{MemorySurface, PageSurface, SurfaceError};
