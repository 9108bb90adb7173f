//! Shared types for the trapbench workspace.
//!
//! Holds the error taxonomy and the processor capability description used by
//! both the benchmark core and its hosts.

#![no_std]

extern crate alloc;

pub mod capability;
pub mod error;

pub use capability::{ArchFamily, CpuFeatures, CpuInfo, CpuVendor};
pub use error::{Errno, Outcome, SelectError, Unsupported};
