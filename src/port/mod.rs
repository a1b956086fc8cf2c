//! Port abstraction layer for serial console communication.
//!
//! Provides the endpoint trait, the real `serialport`-backed implementation,
//! a scripted mock for tests, and candidate enumeration.

pub mod enumerate;
pub mod error;
pub mod mock;
pub mod sync_port;
pub mod traits;

pub use enumerate::PortEnumerator;
pub use error::PortError;
pub use mock::{MockPortOpener, MockSerialPort};
pub use sync_port::*;
pub use traits::*;
