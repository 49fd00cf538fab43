//! Integration tests wiring the full client over in-memory backends.

mod helpers;

mod realtime_test;
mod service_test;
mod session_test;
