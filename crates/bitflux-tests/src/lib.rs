//! Integration tests for bitflux crates.
//!
//! These tests exercise the engine end to end: rule conformance across the
//! whole combinatorial dispatch surface, channel isolation, fan-through
//! ordering, and readback consistency around buffer replacement.
