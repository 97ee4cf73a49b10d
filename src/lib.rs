//! Driver for the CCS811 indoor air quality sensor attached to a Linux i2c
//! bus (`/dev/i2c-<n>`).
//!
//! The CCS811 runs a small firmware application that samples its metal oxide
//! gas sensor about once per second and publishes an estimated CO2 equivalent
//! (ppm) and a total volatile organic compound figure (ppb). This crate
//! brings the device out of boot mode, feeds it ambient temperature and
//! humidity for compensation, and decodes the measurement registers with
//! validity checks.
//!
//! ```no_run
//! use ccs811_linux::{Ccs811, DEFAULT_ADDRESS};
//! use std::thread::sleep;
//! use std::time::Duration;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut sensor = Ccs811::new();
//!     sensor.init(1, DEFAULT_ADDRESS)?;
//!     sensor.set_calibration(22.5, 45.0)?;
//!     loop {
//!         match sensor.read_values() {
//!             Ok(m) => println!("eCO2 = {} ppm, TVOC = {} ppb", m.eco2, m.etvoc),
//!             Err(e) if e.is_transient() => println!("data not ready"),
//!             Err(e) => return Err(e.into()),
//!         }
//!         sleep(Duration::from_secs(5));
//!     }
//! }
//! ```

mod bus;
mod error;
mod protocol;
mod sensor;


pub use bus::Bus;
pub use error::*;
pub use protocol::DEFAULT_ADDRESS;
pub use sensor::*;
pub use i2cdev;
