// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Port Allocation
//!
//! For any set of occupied ports, allocation returns the lowest free port in
//! the range, or fails closed when every port is occupied.

use docker_provision::provision::{allocate_port, FIRST_PORT, LAST_PORT};
use docker_provision::ProvisionError;
use proptest::prelude::*;
use std::collections::BTreeSet;

use crate::fixtures::{listing_with_ports, ScriptedExecutor};

/// Any subset of the range, plus ports outside it
fn occupied_ports() -> impl Strategy<Value = BTreeSet<u16>> {
    prop::collection::btree_set(2200u16..2250, 0..30)
}

proptest! {
    #[test]
    fn prop_allocates_lowest_free_port(occupied in occupied_ports()) {
        let executor = ScriptedExecutor::new()
            .respond("container ls -a", listing_with_ports(occupied.iter().copied()));

        let result = tokio_test::block_on(allocate_port(&executor, "docker"));
        let lowest_free = (FIRST_PORT..=LAST_PORT).find(|p| !occupied.contains(p));

        match (result, lowest_free) {
            (Ok(port), Some(expected)) => {
                prop_assert_eq!(port, expected);
                prop_assert_eq!(executor.commands().len(), usize::from(port - FIRST_PORT) + 1);
            }
            (Err(ProvisionError::PortRangeExhausted { .. }), None) => {
                prop_assert_eq!(executor.commands().len(), 9);
            }
            (other, expected) => {
                prop_assert!(false, "got {:?}, expected {:?}", other, expected);
            }
        }
    }
}
