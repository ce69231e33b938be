// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) that define the interfaces
//! for various components of the settings store. These traits are implemented
//! by adapters in the adapters layer.

pub mod codec;

// Re-export commonly used types
pub use codec::DocumentCodec;
