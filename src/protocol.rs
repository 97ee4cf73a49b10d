use std::io;

use log::warn;

use crate::error::{Error, Result};
use crate::sensor::Measurement;
use crate::Bus;

/// Factory-default 7-bit address of the CCS811 (ADDR pin high). With the pin
/// low the device answers on 0x5a instead.
pub const DEFAULT_ADDRESS: u16 = 0x5b;

// Register mailboxes, CCS811 datasheet figure 14
mod registers {
    pub const MEAS_MODE: u8 = 0x01;
    pub const ALG_RESULT_DATA: u8 = 0x02; // 2 bytes eCO2, 2 bytes TVOC, status
    pub const ENV_DATA: u8 = 0x05; // 4 bytes
    pub const HW_ID: u8 = 0x20;
    pub const ERROR_ID: u8 = 0xe0;
    pub const APP_START: u8 = 0xf4; // command only, no payload
}
use registers::*;

const HW_ID_CODE: u8 = 0x81;

const MEAS_MODE_CONTINUOUS: u8 = 0x10; // constant power, 1s samples, no interrupts
const MEAS_MODE_IDLE: u8 = 0x00;

const STATUS_ERROR: u8 = 0x01;
const STATUS_VALID_MASK: u8 = 0x99;
const STATUS_VALID: u8 = 0x98; // app firmware valid + data ready

// Readings above these are sensor noise, not air.
const ECO2_MAX_PPM: u16 = 2000;
const ETVOC_MAX_PPB: u16 = 1200;

// ERROR_ID bits, CCS811 datasheet figure 25
const FAULT_BITS: [(u8, &str); 6] = [
    (0x01, "WRITE_REG_INVALID"),
    (0x02, "READ_REG_INVALID"),
    (0x04, "MEASMODE_INVALID"),
    (0x08, "MAX_RESISTANCE"),
    (0x10, "HEATER_FAULT"),
    (0x20, "HEATER_SUPPLY"),
];

pub(crate) fn describe_fault(code: u8) -> String {
    let names: Vec<&str> = FAULT_BITS
        .iter()
        .filter(|&&(bit, _)| code & bit != 0)
        .map(|&(_, name)| name)
        .collect();
    if names.is_empty() {
        "no fault bits set".to_string()
    } else {
        names.join(", ")
    }
}

/// Writes a register selector plus optional payload, turning short transfers
/// into protocol errors.
fn write_register(bus: &mut impl Bus, buf: &[u8]) -> Result<()> {
    let register = buf[0];
    let n = bus
        .write_bytes(buf)
        .map_err(|source| Error::Protocol { register, source })?;
    if n != buf.len() {
        return Err(Error::Protocol {
            register,
            source: io::ErrorKind::WriteZero.into(),
        });
    }
    Ok(())
}

/// Selects a register with a one-byte write, then reads back exactly
/// `buf.len()` bytes from it.
fn read_register(bus: &mut impl Bus, register: u8, buf: &mut [u8]) -> Result<()> {
    write_register(bus, &[register])?;
    let n = bus
        .read_bytes(buf)
        .map_err(|source| Error::Protocol { register, source })?;
    if n != buf.len() {
        return Err(Error::Protocol {
            register,
            source: io::ErrorKind::UnexpectedEof.into(),
        });
    }
    Ok(())
}

/// Reads HW_ID and verifies the device on the bus really is a CCS811.
pub(crate) fn check_hardware_id(bus: &mut impl Bus) -> Result<()> {
    let mut id = [0u8; 1];
    read_register(bus, HW_ID, &mut id)?;
    if id[0] != HW_ID_CODE {
        return Err(Error::IdentityMismatch { found: id[0] });
    }
    Ok(())
}

/// Moves the sensor firmware from boot mode into its measurement application
/// and requests continuous 1 s sampling. A failed APP_START aborts; a refused
/// measurement-mode write is only logged, so the sensor may still be running
/// unconfigured.
pub(crate) fn start_application(bus: &mut impl Bus) -> Result<()> {
    write_register(bus, &[APP_START])?;
    if let Err(e) = write_register(bus, &[MEAS_MODE, MEAS_MODE_CONTINUOUS]) {
        warn!("measurement mode not configured: {e}");
    }
    Ok(())
}

/// Encodes ambient temperature and relative humidity into the ENV_DATA
/// payload: 1/512-unit fixed point, big endian, temperature as a signed
/// offset from 25.0 C.
fn encode_environment(temperature: f32, humidity: f32) -> [u8; 5] {
    let humidity = (humidity * 512.0).round() as u16;
    let offset = ((temperature - 25.0) * 512.0).round() as i16;
    let [rh_hi, rh_lo] = humidity.to_be_bytes();
    let [t_hi, t_lo] = offset.to_be_bytes();
    [ENV_DATA, rh_hi, rh_lo, t_hi, t_lo]
}

pub(crate) fn write_environment(bus: &mut impl Bus, temperature: f32, humidity: f32) -> Result<()> {
    write_register(bus, &encode_environment(temperature, humidity))
}

/// Fetches ALG_RESULT_DATA and decodes it into a measurement. The status
/// byte rides along in the same transfer: an error flag triggers a follow-up
/// ERROR_ID read so the fault code reaches the caller, anything short of
/// "app valid + data ready" is reported as not ready, and a reading beyond
/// the plausible range is rejected instead of returned.
pub(crate) fn read_algorithm_results(bus: &mut impl Bus) -> Result<Measurement> {
    let mut data = [0u8; 5];
    read_register(bus, ALG_RESULT_DATA, &mut data)?;

    let status = data[4];
    if status & STATUS_ERROR != 0 {
        let mut code = [0u8; 1];
        read_register(bus, ERROR_ID, &mut code)?;
        return Err(Error::SensorFault { code: code[0] });
    }
    if status & STATUS_VALID_MASK != STATUS_VALID {
        return Err(Error::DataNotReady);
    }

    let eco2 = u16::from_be_bytes([data[0], data[1]]);
    let etvoc = u16::from_be_bytes([data[2], data[3]]);
    if eco2 > ECO2_MAX_PPM || etvoc > ETVOC_MAX_PPB {
        return Err(Error::OutOfRange { eco2, etvoc });
    }
    Ok(Measurement { eco2, etvoc })
}

/// Best-effort return to idle. Shutdown releases the bus regardless of the
/// outcome, so a failure here is only logged.
pub(crate) fn stop_measurements(bus: &mut impl Bus) {
    if let Err(e) = write_register(bus, &[MEAS_MODE, MEAS_MODE_IDLE]) {
        warn!("sensor left in measurement mode: {e}");
    }
}
