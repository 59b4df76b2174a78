// Copyright 2026 the Strand Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `strand_runtime`.
//!
//! Run with `cargo bench -p strand_wind_tunnel`. Scenarios live in `benches/`.
