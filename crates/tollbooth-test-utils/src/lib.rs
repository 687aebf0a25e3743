// SPDX-FileCopyrightText: 2026 Tollbooth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for the Tollbooth workspace.
//!
//! Provides [`MockBackend`] for deterministic backend behavior and
//! [`TestStack`] for assembling the full dispatch pipeline in tests.

pub mod harness;
pub mod mock_backend;

pub use harness::{TestStack, TestStackBuilder};
pub use mock_backend::{MockBackend, MockReply};
