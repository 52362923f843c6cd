//! Storage adapter integration tests

mod remote_test;
