//! # Tubemark Host
//!
//! Native-messaging host that answers video store commands from the
//! browser extension over stdio.
//!
//! - [`native`]: length-prefixed JSON framing and the serve loop
//! - [`bootstrap`]: logging and storage wiring from a loaded [`Config`]
//! - [`track`]: a line-oriented [`PlaybackSource`](tubemark_core::PlaybackSource)
//!
//! [`Config`]: tubemark_config::Config

pub mod bootstrap;
pub mod native;
pub mod track;
