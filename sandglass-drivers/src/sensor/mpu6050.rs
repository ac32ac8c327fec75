//! MPU-6050 accelerometer as an orientation source
//!
//! Only the accelerometer is used. The gravity angle is the direction of the
//! acceleration vector in the sensor's X/Y plane, which is the plane of the
//! two matrices.

use embedded_hal::i2c::I2c;
use libm::atan2f;

use sandglass_core::config::OrientationCalibration;
use sandglass_core::traits::OrientationSource;

/// Default I2C address (AD0 low)
pub const DEFAULT_ADDRESS: u8 = 0x68;

/// Value of WHO_AM_I on a genuine MPU-6050
pub const WHO_AM_I_VALUE: u8 = 0x68;

/// MPU-6050 register addresses
pub mod reg {
    pub const ACCEL_XOUT_H: u8 = 0x3B;
    pub const PWR_MGMT_1: u8 = 0x6B;
    pub const WHO_AM_I: u8 = 0x75;
}

/// MPU-6050 errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mpu6050Error {
    /// I2C transaction failed
    Bus,
    /// WHO_AM_I returned something other than an MPU-6050
    WrongDevice(u8),
}

/// Gravity angle in degrees from raw X/Y acceleration
///
/// `atan2(y, x)` mapped to `0..360` and truncated to whole degrees.
pub fn angle_from_accel(x: i16, y: i16) -> u16 {
    let mut degrees = atan2f(f32::from(y), f32::from(x)).to_degrees();
    if degrees < 0.0 {
        degrees += 360.0;
    }
    // Absorb f32 error so readings on an axis land on the whole degree
    ((degrees + 1.0e-3) as u16) % 360
}

/// MPU-6050 on an I2C bus
pub struct Mpu6050<I2C> {
    i2c: I2C,
    address: u8,
    calibration: OrientationCalibration,
    last_angle: u16,
    last_error: Option<Mpu6050Error>,
    error_count: u32,
}

impl<I2C: I2c> Mpu6050<I2C> {
    pub fn new(i2c: I2C, calibration: OrientationCalibration) -> Self {
        Self::with_address(i2c, DEFAULT_ADDRESS, calibration)
    }

    pub fn with_address(i2c: I2C, address: u8, calibration: OrientationCalibration) -> Self {
        Self {
            i2c,
            address,
            calibration,
            last_angle: 0,
            last_error: None,
            error_count: 0,
        }
    }

    /// Wake the sensor and check its identity
    pub fn init(&mut self) -> Result<(), Mpu6050Error> {
        self.i2c
            .write(self.address, &[reg::PWR_MGMT_1, 0x00])
            .map_err(|_| Mpu6050Error::Bus)?;

        let mut id = [0u8; 1];
        self.i2c
            .write_read(self.address, &[reg::WHO_AM_I], &mut id)
            .map_err(|_| Mpu6050Error::Bus)?;

        if id[0] != WHO_AM_I_VALUE {
            return Err(Mpu6050Error::WrongDevice(id[0]));
        }
        Ok(())
    }

    /// Raw acceleration on X, Y and Z
    pub fn read_accel(&mut self) -> Result<(i16, i16, i16), Mpu6050Error> {
        let mut buf = [0u8; 6];
        self.i2c
            .write_read(self.address, &[reg::ACCEL_XOUT_H], &mut buf)
            .map_err(|_| Mpu6050Error::Bus)?;

        Ok((
            i16::from_be_bytes([buf[0], buf[1]]),
            i16::from_be_bytes([buf[2], buf[3]]),
            i16::from_be_bytes([buf[4], buf[5]]),
        ))
    }

    /// Read and calibrate the gravity angle
    pub fn read_angle(&mut self) -> Result<u16, Mpu6050Error> {
        let (x, y, _) = self.read_accel()?;
        Ok(self.calibration.apply(angle_from_accel(x, y)))
    }

    pub fn calibration(&self) -> &OrientationCalibration {
        &self.calibration
    }

    pub fn set_calibration(&mut self, calibration: OrientationCalibration) {
        self.calibration = calibration;
    }

    /// Most recent bus fault, cleared by the next good reading
    pub fn last_error(&self) -> Option<Mpu6050Error> {
        self.last_error
    }

    /// Failed readings since power-on
    pub fn error_count(&self) -> u32 {
        self.error_count
    }

    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C: I2c> OrientationSource for Mpu6050<I2C> {
    /// Calibrated angle, or the last good one if the read fails
    fn angle_degrees(&mut self) -> u16 {
        match self.read_angle() {
            Ok(angle) => {
                self.last_angle = angle;
                self.last_error = None;
            }
            Err(e) => {
                self.last_error = Some(e);
                self.error_count = self.error_count.saturating_add(1);
            }
        }
        self.last_angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    /// Register-file fake: writes set the register pointer, reads return
    /// bytes from `regs` starting at the pointer
    struct FakeI2c {
        regs: [u8; 128],
        pointer: usize,
        fail: bool,
        written: heapless::Vec<(u8, u8), 8>,
    }

    impl FakeI2c {
        fn new() -> Self {
            let mut regs = [0u8; 128];
            regs[reg::WHO_AM_I as usize] = WHO_AM_I_VALUE;
            Self {
                regs,
                pointer: 0,
                fail: false,
                written: heapless::Vec::new(),
            }
        }

        fn set_accel(&mut self, x: i16, y: i16) {
            let base = reg::ACCEL_XOUT_H as usize;
            self.regs[base..base + 2].copy_from_slice(&x.to_be_bytes());
            self.regs[base + 2..base + 4].copy_from_slice(&y.to_be_bytes());
        }
    }

    #[derive(Debug)]
    struct FakeI2cError;

    impl embedded_hal::i2c::Error for FakeI2cError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::Other
        }
    }

    impl ErrorType for FakeI2c {
        type Error = FakeI2cError;
    }

    impl I2c for FakeI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail || address != DEFAULT_ADDRESS {
                return Err(FakeI2cError);
            }
            for op in operations {
                match op {
                    Operation::Write(bytes) => {
                        self.pointer = bytes[0] as usize;
                        if bytes.len() > 1 {
                            self.regs[self.pointer] = bytes[1];
                            let _ = self.written.push((bytes[0], bytes[1]));
                        }
                    }
                    Operation::Read(buf) => {
                        let end = self.pointer + buf.len();
                        buf.copy_from_slice(&self.regs[self.pointer..end]);
                    }
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_angle_from_accel() {
        assert_eq!(angle_from_accel(16384, 0), 0);
        assert_eq!(angle_from_accel(0, 16384), 90);
        assert_eq!(angle_from_accel(-16384, 0), 180);
        assert_eq!(angle_from_accel(0, -16384), 270);
        assert_eq!(angle_from_accel(0, 0), 0);
        // Just below the axis truncates to 359
        assert_eq!(angle_from_accel(16384, -10), 359);
    }

    #[test]
    fn test_init_wakes_and_checks_id() {
        let mut sensor = Mpu6050::new(FakeI2c::new(), OrientationCalibration::default());
        sensor.init().unwrap();
        let i2c = sensor.release();
        assert_eq!(i2c.written[0], (reg::PWR_MGMT_1, 0x00));
    }

    #[test]
    fn test_init_rejects_other_device() {
        let mut i2c = FakeI2c::new();
        i2c.regs[reg::WHO_AM_I as usize] = 0x98;
        let mut sensor = Mpu6050::new(i2c, OrientationCalibration::default());
        assert_eq!(sensor.init(), Err(Mpu6050Error::WrongDevice(0x98)));
    }

    #[test]
    fn test_calibrated_angle() {
        let mut i2c = FakeI2c::new();
        i2c.set_accel(0, 16384);
        let calibration = OrientationCalibration {
            offset_degrees: 90,
            ..Default::default()
        };
        let mut sensor = Mpu6050::new(i2c, calibration);
        assert_eq!(sensor.angle_degrees(), 180);
    }

    #[test]
    fn test_bus_error_keeps_last_angle() {
        let mut i2c = FakeI2c::new();
        i2c.set_accel(-16384, 0);
        let mut sensor = Mpu6050::new(i2c, OrientationCalibration::default());

        assert_eq!(sensor.angle_degrees(), 180);
        assert_eq!(sensor.last_error(), None);

        sensor.i2c.fail = true;
        assert_eq!(sensor.angle_degrees(), 180);
        assert_eq!(sensor.last_error(), Some(Mpu6050Error::Bus));
        assert_eq!(sensor.error_count(), 1);

        sensor.i2c.fail = false;
        sensor.i2c.set_accel(16384, 0);
        assert_eq!(sensor.angle_degrees(), 0);
        assert_eq!(sensor.last_error(), None);
        assert_eq!(sensor.error_count(), 1);
    }

    #[test]
    fn test_first_read_failing_reports_zero() {
        let mut i2c = FakeI2c::new();
        i2c.fail = true;
        let mut sensor = Mpu6050::new(i2c, OrientationCalibration::default());
        assert_eq!(sensor.angle_degrees(), 0);
    }
}
