use std::{error::Error, fmt::Display};

use sp2150_client::ClientError;

/// [Sp2150Error] represents the errors an SP2150 operation can produce.
#[derive(Clone, Debug, PartialEq)]
pub enum Sp2150Error {
    /// The transport failed before a reply was read.
    Client(ClientError),
    /// A command's reply did not end in `ok\r\n`.
    CommandFailed { command: String, response: String },
    /// A reply couldn't be converted to the expected type.
    Format { reply: String, expected: &'static str },
    /// A caller-supplied value couldn't be used, before anything was sent.
    BadParameter { parameter: String, expected: &'static str },
    /// An operation that takes a value was called without one.
    MissingParameter(&'static str),
}

impl Error for Sp2150Error {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Sp2150Error::Client(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for Sp2150Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sp2150Error::Client(e) => write!(f, "{}", e),
            Sp2150Error::CommandFailed { command, response } => write!(
                f,
                "Command '{}' failed. Check parameter and try again. Instrument response message: {:?}",
                command, response
            ),
            Sp2150Error::Format { reply, expected } => {
                write!(f, "Could not parse instrument reply {:?} as {}.", reply, expected)
            }
            Sp2150Error::BadParameter {
                parameter,
                expected,
            } => write!(f, "Invalid parameter {:?}: expected {}.", parameter, expected),
            Sp2150Error::MissingParameter(what) => {
                write!(f, "A parameter is required: {}.", what)
            }
        }
    }
}

impl From<ClientError> for Sp2150Error {
    fn from(e: ClientError) -> Self {
        Sp2150Error::Client(e)
    }
}
