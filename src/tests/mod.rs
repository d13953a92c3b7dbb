//! Crate-level integration tests and shared test fixtures.

pub(crate) mod mock_broker;

mod integration_test;
