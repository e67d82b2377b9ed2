// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod wells;
pub mod cases;
pub mod forecast;
pub mod exporter;
pub mod config;
pub mod doctor;
