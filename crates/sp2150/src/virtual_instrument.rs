use crate::{Monochromator, Sp2150Error};

pub const HOME_FILTER_POSITION: u32 = 1;

/// A [VirtualSp2150] answers every operation from memory, for running without hardware.
#[derive(Clone, Debug, PartialEq)]
pub struct VirtualSp2150 {
    scan_speed: f64,
    wavelength: f64,
    grating: u32,
    turret: u32,
    grating_info: String,
    turret_info: String,
    filter: u32,
}

impl Default for VirtualSp2150 {
    fn default() -> Self {
        Self {
            scan_speed: 1000.0,
            wavelength: 0.0,
            grating: 1,
            turret: 1,
            grating_info: "dummy info".to_string(),
            turret_info: "dummy info".to_string(),
            filter: HOME_FILTER_POSITION,
        }
    }
}

impl VirtualSp2150 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts any resource name; there is nothing to open.
    pub fn connect(resource_name: &str) -> Self {
        log::debug!("Virtual SP2150 standing in for {}", resource_name);
        Self::default()
    }

    pub fn disconnect(&mut self) {}
}

impl Monochromator for VirtualSp2150 {
    fn scan_speed(&mut self) -> Result<f64, Sp2150Error> {
        Ok(self.scan_speed)
    }

    fn set_scan_speed(&mut self, nm_per_min: f64) -> Result<(), Sp2150Error> {
        self.scan_speed = nm_per_min;
        Ok(())
    }

    fn scan_to_wavelength(&mut self, nm: f64) -> Result<(), Sp2150Error> {
        self.wavelength = nm;
        Ok(())
    }

    fn wavelength(&mut self) -> Result<f64, Sp2150Error> {
        Ok(self.wavelength)
    }

    fn set_wavelength(&mut self, nm: f64) -> Result<(), Sp2150Error> {
        self.wavelength = nm;
        Ok(())
    }

    fn grating(&mut self) -> Result<u32, Sp2150Error> {
        Ok(self.grating)
    }

    fn set_grating(&mut self, grating: u32) -> Result<(), Sp2150Error> {
        self.grating = grating;
        Ok(())
    }

    fn turret(&mut self) -> Result<u32, Sp2150Error> {
        Ok(self.turret)
    }

    fn set_turret(&mut self, turret: u32) -> Result<(), Sp2150Error> {
        self.turret = turret;
        Ok(())
    }

    fn grating_info(&mut self) -> Result<String, Sp2150Error> {
        Ok(self.grating_info.clone())
    }

    fn turret_info(&mut self) -> Result<String, Sp2150Error> {
        Ok(self.turret_info.clone())
    }

    fn filter(&mut self) -> Result<u32, Sp2150Error> {
        Ok(self.filter)
    }

    fn set_filter(&mut self, position: u32) -> Result<(), Sp2150Error> {
        self.filter = position;
        Ok(())
    }

    fn home_filter(&mut self) -> Result<(), Sp2150Error> {
        self.filter = HOME_FILTER_POSITION;
        Ok(())
    }
}
