//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the physics core:
//! - Math types and operations
//! - Arena handles for world storage
//! - Logging utilities

pub mod math;
pub mod collections;
pub mod logging;
