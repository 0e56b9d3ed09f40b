//! Device detection and download recommendation
//!
//! This module infers the visitor's operating system and CPU architecture
//! from an environment signature (user agent, platform string, renderer and
//! screen size) and picks the single best download for that device.
//!
//! Detection is best-effort and may be wrong, so callers should always let
//! users override the detected OS and architecture.

mod detection;
mod picker;

pub use detection::{DeviceProfile, Environment, Screen, detect_device};
pub use picker::{DefaultDownloadPicker, DownloadPicker, is_compatible, recommend};
