/*
    acton_sp2150 Copyright 2020-2026 James Ball
    https://github.com/jmball/acton_sp2150

    Permission is hereby granted, free of charge, to any person obtaining a
    copy of this software and associated documentation files (the “Software”),
    to deal in the Software without restriction, including without limitation
    the rights to use, copy, modify, merge, publish, distribute, sublicense,
    and/or sell copies of the Software, and to permit persons to whom the
    Software is furnished to do so, subject to the following conditions:

    The above copyright notice and this permission notice shall be included in
    all copies or substantial portions of the Software.

    THE SOFTWARE IS PROVIDED “AS IS”, WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
    IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
    FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
    AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
    LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
    FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER
    DEALINGS IN THE SOFTWARE.
*/

//! Control library for the Princeton Instruments Acton SP2150 monochromator.
//!
//! [Sp2150] talks to the instrument over a serial link; [VirtualSp2150] keeps the same
//! state in memory. Both implement [Monochromator].

pub mod command;
mod error;
mod instrument;
mod virtual_instrument;

// Re-export the client crate for convenience
pub use sp2150_client;

pub use command::{coerce_float, coerce_index};
pub use error::Sp2150Error;
pub use instrument::Sp2150;
pub use sp2150_client::SerialOptions;
pub use virtual_instrument::{VirtualSp2150, HOME_FILTER_POSITION};

/// The operations shared by the real and the virtual monochromator.
///
/// Wavelengths are in nm and scan speeds in nm/min. Gratings, turrets and filter
/// positions are counted from 1, as on the instrument's front panel.
pub trait Monochromator {
    fn scan_speed(&mut self) -> Result<f64, Sp2150Error>;
    fn set_scan_speed(&mut self, nm_per_min: f64) -> Result<(), Sp2150Error>;

    /// Scan to `nm` at the current scan speed.
    fn scan_to_wavelength(&mut self, nm: f64) -> Result<(), Sp2150Error>;

    fn wavelength(&mut self) -> Result<f64, Sp2150Error>;
    /// Move to `nm` at maximum motor speed.
    fn set_wavelength(&mut self, nm: f64) -> Result<(), Sp2150Error>;

    fn grating(&mut self) -> Result<u32, Sp2150Error>;
    fn set_grating(&mut self, grating: u32) -> Result<(), Sp2150Error>;

    fn turret(&mut self) -> Result<u32, Sp2150Error>;
    fn set_turret(&mut self, turret: u32) -> Result<(), Sp2150Error>;

    /// Groove density and blaze wavelength of each installed grating.
    fn grating_info(&mut self) -> Result<String, Sp2150Error>;
    /// Groove density of each grating on each turret.
    fn turret_info(&mut self) -> Result<String, Sp2150Error>;

    fn filter(&mut self) -> Result<u32, Sp2150Error>;
    fn set_filter(&mut self, position: u32) -> Result<(), Sp2150Error>;
    fn home_filter(&mut self) -> Result<(), Sp2150Error>;
}
