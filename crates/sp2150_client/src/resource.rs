use std::fmt::Display;

use crate::ClientError;

/// Interface prefixes we recognise but have no transport for.
const FOREIGN_INTERFACES: [&str; 5] = ["GPIB", "USB", "TCPIP", "VXI", "PXI"];

/// [ResourceName] is a parsed VISA-style resource identifier.
#[derive(Clone, Debug, PartialEq)]
pub enum ResourceName {
    /// A serial port, already resolved to the name the OS uses for it.
    Serial { port: String },
    /// A well-formed VISA name for an interface we can't open (GPIB, USB, ...).
    Unsupported { interface: String, raw: String },
}

impl ResourceName {
    /// Parse a resource name such as `ASRL2::INSTR`, `ASRL/dev/ttyUSB0::INSTR`,
    /// `GPIB0::14::INSTR`, or a bare port name like `/dev/ttyUSB0` or `COM3`.
    pub fn parse(name: &str) -> Result<ResourceName, ClientError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ClientError::BadResourceName(name.to_string()));
        }

        let segments: Vec<&str> = name.split("::").collect();
        let head = segments[0];
        let head_upper = head.to_ascii_uppercase();

        if head_upper.starts_with("ASRL") {
            // ASRL resources are ASRL<board>[::INSTR]
            let tail_ok = match segments.len() {
                1 => true,
                2 => segments[1].eq_ignore_ascii_case("INSTR"),
                _ => false,
            };
            let board = &head[4..];
            if !tail_ok || board.is_empty() {
                return Err(ClientError::BadResourceName(name.to_string()));
            }
            return Ok(ResourceName::Serial {
                port: serial_port_for_board(board)
                    .ok_or_else(|| ClientError::BadResourceName(name.to_string()))?,
            });
        }

        if let Some(interface) = FOREIGN_INTERFACES
            .iter()
            .find(|prefix| head_upper.starts_with(*prefix))
        {
            return Ok(ResourceName::Unsupported {
                interface: interface.to_string(),
                raw: name.to_string(),
            });
        }

        if segments.len() == 1 {
            // Not VISA syntax at all; treat it as the OS port name.
            return Ok(ResourceName::Serial {
                port: name.to_string(),
            });
        }

        Err(ClientError::BadResourceName(name.to_string()))
    }
}

/// Resolve the board part of an `ASRL` name to an OS port name.
/// Numeric boards count from 1, as COM ports do.
fn serial_port_for_board(board: &str) -> Option<String> {
    if board.chars().all(|c| c.is_ascii_digit()) {
        let number: u32 = board.parse().ok()?;
        if number == 0 {
            return None;
        }
        if cfg!(windows) {
            Some(format!("COM{}", number))
        } else {
            Some(format!("/dev/ttyS{}", number - 1))
        }
    } else {
        Some(board.to_string())
    }
}

impl Display for ResourceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceName::Serial { port } => write!(f, "serial port {}", port),
            ResourceName::Unsupported { interface, raw } => {
                write!(f, "{} resource {}", interface, raw)
            }
        }
    }
}
