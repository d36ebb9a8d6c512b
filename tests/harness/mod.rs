// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for driving the hook against a local stand-in tracker.

#![allow(dead_code)]

pub mod fixtures;
pub mod tracker;
