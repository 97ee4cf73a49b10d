//! Polls a CCS811 air quality sensor every 5 seconds for 30 minutes and
//! prints the readings.
//!
//! ```
//! $ cargo run --example airmon
//! CCS811 device successfully opened.
//! Allow 48 hours initial burn-in and 20 minutes to warm up (each use)
//! eCO2 = 412 ppm, TVOC = 9 ppb
//! 00:00 min:sec have passed
//! ```

use std::thread::sleep;
use std::time::Duration;

use ccs811_linux::{Ccs811, DEFAULT_ADDRESS};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

// Raspberry Pis expose the header i2c pins as bus 1; many other ARM boards
// use bus 0.
const I2C_BUS: u32 = 1;

const POLL_INTERVAL: Duration = Duration::from_secs(5);
const POLL_COUNT: u32 = 360; // 30 minutes

pub fn main() -> Result<()> {
    env_logger::init();

    let mut sensor = Ccs811::new();
    sensor.init(I2C_BUS, DEFAULT_ADDRESS)?;
    println!("CCS811 device successfully opened.");
    println!("Allow 48 hours initial burn-in and 20 minutes to warm up (each use)");
    sleep(Duration::from_secs(1)); // wait for data to settle for the first read

    for i in 0..POLL_COUNT {
        match sensor.read_values() {
            Ok(m) => println!("eCO2 = {} ppm, TVOC = {} ppb", m.eco2, m.etvoc),
            Err(e) if e.is_transient() => println!("data not ready"),
            Err(e) => {
                sensor.shutdown();
                return Err(e.into());
            }
        }
        let elapsed = i * 5;
        println!("{:02}:{:02} min:sec have passed", elapsed / 60, elapsed % 60);
        sleep(POLL_INTERVAL);
    }

    sensor.shutdown();
    Ok(())
}
