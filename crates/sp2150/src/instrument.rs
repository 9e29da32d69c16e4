use sp2150_client::{SerialOptions, SerialTransport, Transport, DEFAULT_READ_TERMINATOR};

use crate::command::{is_ok_reply, parse_reply, strip_reply, Command, OK_SUFFIX};
use crate::{Monochromator, Sp2150Error};

/// An [Sp2150] is an open session with a physical monochromator.
///
/// The session holds no copy of the instrument's state; every getter goes to the hardware.
/// The transport is closed by [Sp2150::disconnect] or when the session is dropped.
pub struct Sp2150<T: Transport = SerialTransport> {
    transport: T,
    closed: bool,
}

impl Sp2150<SerialTransport> {
    /// Open a session to the instrument at `resource_name`, e.g. `ASRL2::INSTR` or `/dev/ttyUSB0`.
    ///
    /// `options.read_terminator` must stay `\n`: success is judged by the `ok\r\n` ending.
    pub fn connect(resource_name: &str, options: &SerialOptions) -> Result<Self, Sp2150Error> {
        if options.read_terminator != DEFAULT_READ_TERMINATOR {
            return Err(Sp2150Error::BadParameter {
                parameter: format!("read terminator {:?}", options.read_terminator as char),
                expected: "'\\n', since SP2150 replies end in \"ok\\r\\n\"",
            });
        }
        let transport = sp2150_client::open(resource_name, options)?;
        log::debug!("Connected to SP2150 at {}", resource_name);
        Ok(Self::new(transport))
    }

    /// Connect, run `f`, and disconnect again whether or not `f` succeeded.
    pub fn with<R, F>(resource_name: &str, options: &SerialOptions, f: F) -> Result<R, Sp2150Error>
    where
        F: FnOnce(&mut Self) -> Result<R, Sp2150Error>,
    {
        let mono = Self::connect(resource_name, options)?;
        Self::with_session(mono, f)
    }
}

impl<T: Transport> Sp2150<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            closed: false,
        }
    }

    /// Run `f` against an already open session, then close it.
    /// An error from `f` takes precedence over an error from closing.
    pub fn with_session<R, F>(mut mono: Self, f: F) -> Result<R, Sp2150Error>
    where
        F: FnOnce(&mut Self) -> Result<R, Sp2150Error>,
    {
        let result = f(&mut mono);
        let closed = mono.disconnect();
        let value = result?;
        closed?;
        Ok(value)
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn is_connected(&self) -> bool {
        !self.closed
    }

    /// Close the transport. Later calls, and the drop, don't close it again.
    pub fn disconnect(&mut self) -> Result<(), Sp2150Error> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.transport.close()?;
        Ok(())
    }

    /// Send one command and return the raw reply.
    /// Setter replies must end in `ok\r\n`; getter replies are passed through for parsing.
    fn send(&mut self, cmd: Command) -> Result<String, Sp2150Error> {
        let command = cmd.to_string();
        let response = if cmd.spans_lines() {
            self.transport.query_until(&command, OK_SUFFIX)?
        } else {
            self.transport.query(&command)?
        };

        if cmd.is_setter() && !is_ok_reply(&response) {
            log::warn!("'{}' was rejected: {:?}", command, response);
            return Err(Sp2150Error::CommandFailed { command, response });
        }
        Ok(response)
    }

    fn setter_query(&mut self, cmd: Command) -> Result<(), Sp2150Error> {
        self.send(cmd).map(|_| ())
    }
}

impl<T: Transport> Monochromator for Sp2150<T> {
    fn scan_speed(&mut self) -> Result<f64, Sp2150Error> {
        let reply = self.send(Command::QueryScanSpeed)?;
        parse_reply(&reply, "a scan speed in nm/min")
    }

    fn set_scan_speed(&mut self, nm_per_min: f64) -> Result<(), Sp2150Error> {
        self.setter_query(Command::SetScanSpeed(nm_per_min))
    }

    fn scan_to_wavelength(&mut self, nm: f64) -> Result<(), Sp2150Error> {
        self.setter_query(Command::ScanToWavelength(nm))
    }

    fn wavelength(&mut self) -> Result<f64, Sp2150Error> {
        let reply = self.send(Command::QueryWavelength)?;
        parse_reply(&reply, "a wavelength in nm")
    }

    fn set_wavelength(&mut self, nm: f64) -> Result<(), Sp2150Error> {
        self.setter_query(Command::GotoWavelength(nm))
    }

    fn grating(&mut self) -> Result<u32, Sp2150Error> {
        let reply = self.send(Command::QueryGrating)?;
        parse_reply(&reply, "a grating number")
    }

    fn set_grating(&mut self, grating: u32) -> Result<(), Sp2150Error> {
        self.setter_query(Command::SetGrating(grating))
    }

    fn turret(&mut self) -> Result<u32, Sp2150Error> {
        let reply = self.send(Command::QueryTurret)?;
        parse_reply(&reply, "a turret number")
    }

    fn set_turret(&mut self, turret: u32) -> Result<(), Sp2150Error> {
        self.setter_query(Command::SetTurret(turret))
    }

    fn grating_info(&mut self) -> Result<String, Sp2150Error> {
        let reply = self.send(Command::QueryGratings)?;
        Ok(strip_reply(&reply).to_string())
    }

    fn turret_info(&mut self) -> Result<String, Sp2150Error> {
        let reply = self.send(Command::QueryTurrets)?;
        Ok(strip_reply(&reply).to_string())
    }

    fn filter(&mut self) -> Result<u32, Sp2150Error> {
        let reply = self.send(Command::QueryFilter)?;
        parse_reply(&reply, "a filter position")
    }

    fn set_filter(&mut self, position: u32) -> Result<(), Sp2150Error> {
        self.setter_query(Command::SetFilter(position))
    }

    fn home_filter(&mut self) -> Result<(), Sp2150Error> {
        // The reply to FHOME carries nothing worth checking.
        self.send(Command::HomeFilter)?;
        Ok(())
    }
}

impl<T: Transport> Drop for Sp2150<T> {
    fn drop(&mut self) {
        if let Err(e) = self.disconnect() {
            log::warn!("Error closing SP2150 session: {}", e);
        }
    }
}
