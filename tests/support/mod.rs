pub mod raw_http;
#[path = "../../src/test_support/socket_guard.rs"]
pub mod socket_guard;
