use std::io;

use i2cdev::linux::LinuxI2CError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("cannot open i2c bus device {path}")]
    BusOpen {
        path: String,
        #[source]
        source: LinuxI2CError,
    },

    #[error("cannot claim address {address:#04x} on {path}")]
    BusClaim {
        path: String,
        address: u16,
        #[source]
        source: LinuxI2CError,
    },

    #[error("hardware id {found:#04x} is not 0x81; wrong device on the bus?")]
    IdentityMismatch { found: u8 },

    #[error("driver is not initialized")]
    NotInitialized,

    #[error("i2c transaction on register {register:#04x} failed")]
    Protocol {
        register: u8,
        #[source]
        source: io::Error,
    },

    #[error("sensor reported internal fault {code:#04x} ({})", crate::protocol::describe_fault(*.code))]
    SensorFault { code: u8 },

    #[error("measurement not ready")]
    DataNotReady,

    #[error("implausible reading rejected (eco2 {eco2} ppm, etvoc {etvoc} ppb)")]
    OutOfRange { eco2: u16, etvoc: u16 },
}

impl Error {
    /// True for conditions that clear on their own once the sensor finishes a
    /// sampling cycle. Callers polling periodically can treat a transient
    /// error as "no sample this time" and read again later; everything else
    /// needs attention.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::DataNotReady | Error::OutOfRange { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
