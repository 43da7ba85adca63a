//! Deal compliance workflows for a NIL platform serving student-athletes,
//! compliance officers, and the schools that onboard them.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
