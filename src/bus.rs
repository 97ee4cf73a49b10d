use std::io;

use i2cdev::core::I2CDevice;
use i2cdev::linux::{LinuxI2CDevice, LinuxI2CError};

/// Byte-oriented transport to one device on one i2c bus, as exposed by the
/// Linux i2c character device: a write sends bytes to the claimed address, a
/// read clocks bytes back from it. Both return the transfer count so callers
/// can detect short transactions. Implemented for `LinuxI2CDevice`; replaced
/// with `MockBus` for testing.
pub trait Bus {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<usize>;

    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

fn to_io_error(e: LinuxI2CError) -> io::Error {
    match e {
        LinuxI2CError::Io(e) => e,
        e @ LinuxI2CError::Errno(_) => io::Error::new(io::ErrorKind::Other, e),
    }
}

impl Bus for LinuxI2CDevice {
    // i2c-dev transfers are all-or-nothing at the kernel level, so a
    // successful call means the whole buffer moved.
    #[inline]
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<usize> {
        I2CDevice::write(self, buf).map_err(to_io_error)?;
        Ok(buf.len())
    }

    #[inline]
    fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        I2CDevice::read(self, buf).map_err(to_io_error)?;
        Ok(buf.len())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    /// Log of the raw buffers written to a [`MockBus`], shared so tests can
    /// still inspect traffic after the driver dropped its bus handle.
    pub type WriteLog = Rc<RefCell<Vec<Vec<u8>>>>;

    pub struct MockBus {
        writes: WriteLog,
        reads: VecDeque<Vec<u8>>,
    }

    impl Bus for MockBus {
        fn write_bytes(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes.borrow_mut().push(buf.to_vec());
            Ok(buf.len())
        }

        fn read_bytes(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let data = match self.reads.pop_front() {
                None => return Err(io::ErrorKind::UnexpectedEof.into()),
                Some(x) => x,
            };
            let n = data.len().min(buf.len());
            buf[..n].copy_from_slice(&data[..n]);
            Ok(n)
        }
    }

    impl MockBus {
        pub fn new() -> Self {
            Self {
                writes: WriteLog::default(),
                reads: VecDeque::new(),
            }
        }

        /// Queues the payload the next read will return. Scheduling fewer
        /// bytes than the driver asks for simulates a short read.
        pub fn schedule_read(&mut self, data: &[u8]) {
            self.reads.push_back(data.to_vec());
        }

        pub fn write_log(&self) -> WriteLog {
            Rc::clone(&self.writes)
        }
    }
}
