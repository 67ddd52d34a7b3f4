// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Module

mod platform_resolution;
mod port_allocation;
