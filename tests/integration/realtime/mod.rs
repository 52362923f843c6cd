//! Real-time push integration tests

mod socket_test;
