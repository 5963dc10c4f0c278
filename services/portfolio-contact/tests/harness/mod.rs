// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for driving the contact relay in-process.
//!
//! Builds the full router against a manual clock and a recording mailer so
//! submissions can be replayed without touching the network.

#![allow(dead_code)]

pub mod app;
pub mod generators;
pub mod metrics;
