use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError};

use crate::error::{Error, Result};
use crate::{protocol, Bus};

/// One decoded sample from the sensor's gas algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    /// Estimated CO2 equivalent, ppm.
    pub eco2: u16,
    /// Total volatile organic compounds, ppb.
    pub etvoc: u16,
}

/// Driver for a single CCS811 sensor on a Linux i2c bus.
///
/// The driver owns the bus handle for exactly one device: [`Ccs811::init`]
/// opens and validates it, [`Ccs811::shutdown`] idles the sensor and releases
/// it. Several drivers can coexist in one process, one per device. All calls
/// block; the driver carries no internal synchronization, so a multi-threaded
/// caller must serialize access itself.
pub struct Ccs811<B: Bus = LinuxI2CDevice> {
    bus: Option<B>,
}

impl<B: Bus> Ccs811<B> {
    /// Creates a driver with no bus attached. Every operation except `init`
    /// and `shutdown` reports [`Error::NotInitialized`] until `init`
    /// succeeds.
    pub fn new() -> Self {
        Self { bus: None }
    }

    fn startup(&mut self, mut bus: B) -> Result<()> {
        protocol::check_hardware_id(&mut bus)?;
        protocol::start_application(&mut bus)?;
        self.bus = Some(bus);
        Ok(())
    }

    /// Feeds ambient temperature (Celsius) and relative humidity (percent,
    /// 50.0 = 50%) into the sensor's compensation algorithm. The values are
    /// not retained on the host; the device applies them until overwritten.
    pub fn set_calibration(&mut self, temperature: f32, humidity: f32) -> Result<()> {
        let bus = self.bus.as_mut().ok_or(Error::NotInitialized)?;
        protocol::write_environment(bus, temperature, humidity)
    }

    /// Reads the latest eCO2/TVOC sample. [`Error::DataNotReady`] and
    /// [`Error::OutOfRange`] are expected while the sensor's roughly one
    /// second sampling cycle has not produced a usable value; poll again
    /// later.
    pub fn read_values(&mut self) -> Result<Measurement> {
        let bus = self.bus.as_mut().ok_or(Error::NotInitialized)?;
        protocol::read_algorithm_results(bus)
    }

    /// Idles the sensor (best effort) and releases the bus handle. Safe to
    /// call repeatedly; once closed, later calls do nothing.
    pub fn shutdown(&mut self) {
        if let Some(mut bus) = self.bus.take() {
            protocol::stop_measurements(&mut bus);
        }
    }
}

impl<B: Bus> Default for Ccs811<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl Ccs811 {
    /// Opens `/dev/i2c-<bus>`, claims `address`, verifies the hardware id
    /// and starts continuous measurement. On any failure the driver stays
    /// closed and the device node is released.
    ///
    /// The sensor samples internally about once per second from here on,
    /// whether or not anyone reads the results.
    pub fn init(&mut self, bus: u32, address: u16) -> Result<()> {
        let path = format!("/dev/i2c-{bus}");
        let dev = LinuxI2CDevice::new(&path, address).map_err(|source| match source {
            LinuxI2CError::Io(_) => Error::BusOpen { path, source },
            LinuxI2CError::Errno(_) => Error::BusClaim {
                path,
                address,
                source,
            },
        })?;
        self.startup(dev)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::mock::{MockBus, WriteLog};

    fn bring_up(mut bus: MockBus) -> (Ccs811<MockBus>, WriteLog) {
        let log = bus.write_log();
        bus.schedule_read(&[0x81]); // hardware id
        let mut sensor = Ccs811::new();
        sensor.startup(bus).unwrap();
        log.borrow_mut().clear();
        (sensor, log)
    }

    #[test]
    fn test_read_before_init() {
        let mut sensor: Ccs811<MockBus> = Ccs811::new();
        assert!(matches!(sensor.read_values(), Err(Error::NotInitialized)));
    }

    #[test]
    fn test_calibration_before_init() {
        let mut sensor: Ccs811<MockBus> = Ccs811::new();
        assert!(matches!(
            sensor.set_calibration(22.5, 45.0),
            Err(Error::NotInitialized)
        ));
    }

    #[test]
    fn test_identity_mismatch_leaves_driver_closed() {
        let mut bus = MockBus::new();
        bus.schedule_read(&[0x55]);
        let mut sensor = Ccs811::new();
        assert!(matches!(
            sensor.startup(bus),
            Err(Error::IdentityMismatch { found: 0x55 })
        ));
        assert!(matches!(sensor.read_values(), Err(Error::NotInitialized)));
        sensor.shutdown(); // still a safe no-op
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let (mut sensor, log) = bring_up(MockBus::new());

        sensor.shutdown();
        assert_eq!(*log.borrow(), vec![vec![0x01, 0x00]]);

        sensor.shutdown();
        assert_eq!(log.borrow().len(), 1, "second shutdown must not touch the bus");
    }

    #[test]
    fn test_full_session() {
        let mut bus = MockBus::new();
        bus.schedule_read(&[0x81]);
        bus.schedule_read(&[0x02, 0x58, 0x00, 0x50, 0x98]); // eco2 600, etvoc 80

        let log = bus.write_log();
        let mut sensor = Ccs811::new();
        sensor.startup(bus).unwrap();
        assert_eq!(
            *log.borrow(),
            vec![vec![0x20], vec![0xf4], vec![0x01, 0x10]]
        );
        log.borrow_mut().clear();

        sensor.set_calibration(22.5, 45.0).unwrap();
        assert_eq!(*log.borrow(), vec![vec![0x05, 0x5a, 0x00, 0xfb, 0x00]]);
        log.borrow_mut().clear();

        assert_eq!(
            sensor.read_values().unwrap(),
            Measurement {
                eco2: 600,
                etvoc: 80
            }
        );
        assert_eq!(*log.borrow(), vec![vec![0x02]]);
        log.borrow_mut().clear();

        sensor.shutdown();
        assert_eq!(*log.borrow(), vec![vec![0x01, 0x00]]);
        assert!(matches!(sensor.read_values(), Err(Error::NotInitialized)));
    }
}
