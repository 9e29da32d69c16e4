use std::io::{self, Read, Write};
use std::{error::Error, fmt::Display, time::Duration};

use log;
use serialport::{ClearBuffer, SerialPort};

mod resource;

pub use resource::ResourceName;

/// Factory default baud rate of the SP2150 RS-232 port.
pub const SP2150_BAUD: u32 = 9600;
/// Grating moves block the reply until the motor stops, so this is generous.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_WRITE_TERMINATION: &str = "\r";
pub const DEFAULT_READ_TERMINATOR: u8 = b'\n';

/// [ClientError] represents the errors that can occur when talking to the instrument.
#[derive(Clone, Debug, PartialEq)]
pub enum ClientError {
    BadResourceName(String),
    UnsupportedInterface(String),
    OpenFailure { port: String, reason: String },
    WriteFailure,
    ReadFailure,
    ReadTimeout,
    NotConnected,
}

impl Error for ClientError {}
impl Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::BadResourceName(name) => {
                write!(f, "Invalid resource name: '{}'.", name)
            }
            ClientError::UnsupportedInterface(resource) => {
                write!(f, "No transport available for {}.", resource)
            }
            ClientError::OpenFailure { port, reason } => {
                write!(f, "Failed to open {}: {}", port, reason)
            }
            ClientError::WriteFailure => {
                write!(f, "Failed to write to serial port.")
            }
            ClientError::ReadFailure => {
                write!(f, "Failed to read from serial port.")
            }
            ClientError::ReadTimeout => {
                write!(f, "Response timeout.")
            }
            ClientError::NotConnected => {
                write!(f, "Session is closed.")
            }
        }
    }
}

/// Connection settings applied when a session is opened.
#[derive(Clone, Debug)]
pub struct SerialOptions {
    pub baud_rate: u32,
    pub timeout: Duration,
    pub write_termination: String,
    /// Ends one line of a reply. The SP2150 ends every line with `\r\n`, so sessions
    /// that check for its `ok\r\n` marker need this left at `\n`.
    pub read_terminator: u8,
}

impl Default for SerialOptions {
    fn default() -> Self {
        Self {
            baud_rate: SP2150_BAUD,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            write_termination: DEFAULT_WRITE_TERMINATION.to_string(),
            read_terminator: DEFAULT_READ_TERMINATOR,
        }
    }
}

/// A request/response session with an instrument.
pub trait Transport {
    /// Send `command` and block until the terminated reply has been read.
    /// The reply is returned with its termination intact.
    fn query(&mut self, command: &str) -> Result<String, ClientError>;

    /// Send `command` and keep reading terminated lines until the reply ends with
    /// `end_marker`, for replies that span several lines.
    fn query_until(&mut self, command: &str, end_marker: &str) -> Result<String, ClientError>;

    /// Release the underlying connection. Closing a closed session is a no-op.
    fn close(&mut self) -> Result<(), ClientError>;
}

/// A byte stream a [StreamTransport] can run over.
pub trait LinePort: Read + Write {
    /// Drop any stale input before a new command goes out.
    fn discard_input(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl LinePort for Box<dyn SerialPort> {
    fn discard_input(&mut self) -> io::Result<()> {
        self.clear(ClearBuffer::Input)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e))
    }
}

/// A [StreamTransport] speaks the SP2150's line-oriented command language over any [LinePort].
pub struct StreamTransport<P: LinePort> {
    port: Option<P>,
    write_termination: String,
    read_terminator: u8,
}

pub type SerialTransport = StreamTransport<Box<dyn SerialPort>>;

impl<P: LinePort> StreamTransport<P> {
    pub fn new(port: P, options: &SerialOptions) -> Self {
        Self {
            port: Some(port),
            write_termination: options.write_termination.clone(),
            read_terminator: options.read_terminator,
        }
    }

    pub fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn send_command(port: &mut P, cmd: &[u8]) -> Result<(), ClientError> {
        if let Err(e) = port.discard_input() {
            log::warn!("send_command: couldn't clear input buffer: {}", e);
        }
        match port.write_all(cmd) {
            Ok(_) => {}
            Err(e) => {
                log::error!("send_command: write operation failed: {}", e);
                return Err(ClientError::WriteFailure);
            }
        }
        port.flush().map_err(|e| {
            log::error!("send_command: flush failed: {}", e);
            ClientError::WriteFailure
        })
    }

    /// Read one byte at a time until the terminator so nothing past the reply is consumed.
    fn recv_reply(port: &mut P, terminator: u8) -> Result<Vec<u8>, ClientError> {
        let mut reply = Vec::with_capacity(32);
        let mut buf: [u8; 1] = [0; 1];

        loop {
            match port.read(&mut buf) {
                Ok(0) => {
                    log::error!(
                        "recv_reply: stream ended after {} bytes without terminator",
                        reply.len()
                    );
                    return Err(ClientError::ReadFailure);
                }
                Ok(_) => {
                    reply.push(buf[0]);
                    if buf[0] == terminator {
                        return Ok(reply);
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => {
                    log::error!("recv_reply: timed out, partial reply: {:?}", reply);
                    return Err(ClientError::ReadTimeout);
                }
                Err(e) => {
                    log::error!("recv_reply: read operation failed: {}", e);
                    return Err(ClientError::ReadFailure);
                }
            }
        }
    }
}

impl<P: LinePort> Transport for StreamTransport<P> {
    fn query(&mut self, command: &str) -> Result<String, ClientError> {
        let port = self.port.as_mut().ok_or(ClientError::NotConnected)?;

        let mut cmd = String::with_capacity(command.len() + self.write_termination.len());
        cmd.push_str(command);
        cmd.push_str(&self.write_termination);

        log::trace!("> {:?}", cmd);
        Self::send_command(port, cmd.as_bytes())?;
        let reply = Self::recv_reply(port, self.read_terminator)?;
        let reply = String::from_utf8_lossy(&reply).into_owned();
        log::trace!("< {:?}", reply);

        Ok(reply)
    }

    fn query_until(&mut self, command: &str, end_marker: &str) -> Result<String, ClientError> {
        let port = self.port.as_mut().ok_or(ClientError::NotConnected)?;

        let mut cmd = String::with_capacity(command.len() + self.write_termination.len());
        cmd.push_str(command);
        cmd.push_str(&self.write_termination);

        log::trace!("> {:?}", cmd);
        Self::send_command(port, cmd.as_bytes())?;

        // Each line is read up to the terminator; the marker only shows up on the last one.
        let mut reply = Vec::with_capacity(128);
        while !reply.ends_with(end_marker.as_bytes()) {
            let line = Self::recv_reply(port, self.read_terminator)?;
            log::trace!("< {:?}", String::from_utf8_lossy(&line));
            reply.extend_from_slice(&line);
        }

        Ok(String::from_utf8_lossy(&reply).into_owned())
    }

    fn close(&mut self) -> Result<(), ClientError> {
        if let Some(mut port) = self.port.take() {
            _ = port.flush();
            log::debug!("Closed instrument session.");
        }
        Ok(())
    }
}

/// Open a serial session to the instrument named by `resource_name`.
pub fn open(resource_name: &str, options: &SerialOptions) -> Result<SerialTransport, ClientError> {
    let port_name = match ResourceName::parse(resource_name)? {
        ResourceName::Serial { port } => port,
        unsupported => {
            log::warn!("Can't open {}", unsupported);
            return Err(ClientError::UnsupportedInterface(unsupported.to_string()));
        }
    };

    let port = serialport::new(port_name.clone(), options.baud_rate)
        .timeout(options.timeout)
        .stop_bits(serialport::StopBits::One)
        .data_bits(serialport::DataBits::Eight)
        .parity(serialport::Parity::None)
        .flow_control(serialport::FlowControl::None)
        .open()
        .map_err(|e| {
            log::error!("open: Error opening host port {}: {}", port_name, e);
            ClientError::OpenFailure {
                port: port_name.clone(),
                reason: e.to_string(),
            }
        })?;

    log::debug!(
        "Opened {} ({}) at {} baud",
        resource_name,
        port_name,
        options.baud_rate
    );
    Ok(StreamTransport::new(port, options))
}
