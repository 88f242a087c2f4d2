//! GPU state cache.
//!
//! [`Gls`] wraps a [`GlDriver`] and drops every stateful call whose value
//! equals the one already applied. It is the single writer of driver state
//! for its context.

pub mod consts;
pub mod context;
pub mod driver;
pub mod headless;
pub mod state;
pub mod stats;

pub use consts::ClearFlags;
pub use context::{Gls, GlsSettings, ProgramId};
pub use driver::GlDriver;
pub use headless::{CallLog, DriverCall, ErrorQueue, HeadlessDriver};
pub use state::{CachedState, CapState, Viewport};
pub use stats::GlsStats;
