//! Test harness for flowkit components.
//!
//! A [`Fixture`] mounts components into a [`TestDom`], exposes locators for the
//! flow's viewport and transformation pane, and re-runs assertions against
//! asynchronously rendered output with [`try_assertion`].
//!
//! ```no_run
//! # async fn demo() -> Result<(), flowkit_harness::HarnessError> {
//! use flowkit_harness::Fixture;
//!
//! let fixture = Fixture::new();
//! fixture.flow(None, None)?;
//! let pane = fixture.wait_for(".flowkit__transformationpane", None).await?;
//! assert_eq!(pane.style.get("transform"), Some("translate(0px, 0px) scale(1)"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dom;
pub mod error;
pub mod fixture;
pub mod mount;
pub mod registry;
pub mod retry;

pub use config::{CONFIG_ENV_VAR, FlowMountSettings, HarnessConfig, RetrySettings};
pub use dom::{ComponentRef, ElementHandle, MemoryDom, MountedComponent, Selector, TestDom};
pub use error::{HarnessError, Result};
pub use fixture::Fixture;
pub use mount::{Attrs, MountOptions, default_flow_attrs, default_flow_props, flow_mount_options};
pub use registry::{CommandName, CommandRegistry};
pub use retry::{
    RetryOptions, RetryOutcome, RetryState, spawn_try_assertion, try_assertion,
    try_assertion_with_outcome,
};
