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
use sp2150::*;

// Step the grating from 400 nm to 700 nm, reading the position back at each stop.
// Usage: wavelength_sweep <resource name>
fn main() {
    env_logger::init();

    let resource_name = std::env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: wavelength_sweep <resource name, e.g. ASRL2::INSTR>");
        std::process::exit(1);
    });

    let result = Sp2150::with(&resource_name, &SerialOptions::default(), |mono| {
        println!("Gratings: {}", mono.grating_info()?);
        for step in 0..=6 {
            let target = 400.0 + 50.0 * step as f64;
            mono.set_wavelength(target)?;
            println!("{:.1} nm -> {:.1} nm", target, mono.wavelength()?);
        }
        Ok(())
    });

    if let Err(e) = result {
        eprintln!("Sweep failed: {e}");
        std::process::exit(1);
    }
}
