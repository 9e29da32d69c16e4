use std::{fmt::Display, str::FromStr};

use crate::Sp2150Error;

/// Every reply to a successful command ends with this.
pub const OK_SUFFIX: &str = "ok\r\n";

/// Characters trimmed from both ends of a reply before it is parsed.
const REPLY_TRIM: &[char] = &[' ', 'o', 'k', '\r', '\n'];

/// [Command] is one line of the SP2150 command language.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    QueryScanSpeed,
    SetScanSpeed(f64),
    ScanToWavelength(f64),
    QueryWavelength,
    GotoWavelength(f64),
    QueryGrating,
    SetGrating(u32),
    QueryTurret,
    SetTurret(u32),
    QueryGratings,
    QueryTurrets,
    QueryFilter,
    SetFilter(u32),
    HomeFilter,
}

impl Command {
    /// Whether the reply must end in [OK_SUFFIX] for the command to count as done.
    pub fn is_setter(&self) -> bool {
        matches!(
            self,
            Command::SetScanSpeed(_)
                | Command::ScanToWavelength(_)
                | Command::GotoWavelength(_)
                | Command::SetGrating(_)
                | Command::SetTurret(_)
                | Command::SetFilter(_)
        )
    }

    /// Whether the reply runs over several lines, with [OK_SUFFIX] only on the last.
    pub fn spans_lines(&self) -> bool {
        matches!(self, Command::QueryGratings | Command::QueryTurrets)
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Command::QueryScanSpeed => write!(f, "?NM/MIN"),
            Command::SetScanSpeed(speed) => write!(f, "{:.1} NM/MIN", speed),
            Command::ScanToWavelength(nm) => write!(f, "{:.1} NM", nm),
            Command::QueryWavelength => write!(f, "?NM"),
            Command::GotoWavelength(nm) => write!(f, "{:.1} GOTO", nm),
            Command::QueryGrating => write!(f, "?GRATING"),
            Command::SetGrating(n) => write!(f, "{} GRATING", n),
            Command::QueryTurret => write!(f, "?TURRET"),
            Command::SetTurret(n) => write!(f, "{} TURRET", n),
            Command::QueryGratings => write!(f, "?GRATINGS"),
            Command::QueryTurrets => write!(f, "?TURRETS"),
            Command::QueryFilter => write!(f, "?FILTER"),
            Command::SetFilter(n) => write!(f, "{} FILTER", n),
            Command::HomeFilter => write!(f, "FHOME"),
        }
    }
}

pub fn is_ok_reply(reply: &str) -> bool {
    reply.ends_with(OK_SUFFIX)
}

/// Trim the `ok` marker, line ending and padding from a reply.
pub fn strip_reply(reply: &str) -> &str {
    reply.trim_matches(REPLY_TRIM)
}

/// Strip a reply and parse what is left.
pub fn parse_reply<T: FromStr>(reply: &str, expected: &'static str) -> Result<T, Sp2150Error> {
    strip_reply(reply)
        .parse::<T>()
        .map_err(|_| Sp2150Error::Format {
            reply: reply.to_string(),
            expected,
        })
}

/// Coerce a textual parameter to a wavelength or speed.
pub fn coerce_float(parameter: Option<&str>) -> Result<f64, Sp2150Error> {
    let text = parameter.ok_or(Sp2150Error::MissingParameter("a number, e.g. 500.0"))?;
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(Sp2150Error::BadParameter {
            parameter: text.to_string(),
            expected: "a number",
        }),
    }
}

/// Coerce a textual parameter to a grating, turret or filter position.
pub fn coerce_index(parameter: Option<&str>) -> Result<u32, Sp2150Error> {
    let text = parameter.ok_or(Sp2150Error::MissingParameter("a position number, e.g. 1"))?;
    text.trim().parse::<u32>().map_err(|_| Sp2150Error::BadParameter {
        parameter: text.to_string(),
        expected: "a position number",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_go_out_with_one_decimal() {
        assert_eq!(Command::SetScanSpeed(1000.0).to_string(), "1000.0 NM/MIN");
        assert_eq!(Command::ScanToWavelength(532.26).to_string(), "532.3 NM");
        assert_eq!(Command::GotoWavelength(500.0).to_string(), "500.0 GOTO");
        assert_eq!(Command::GotoWavelength(499.96).to_string(), "500.0 GOTO");
    }

    #[test]
    fn indices_go_out_without_decimal_point() {
        assert_eq!(Command::SetGrating(2).to_string(), "2 GRATING");
        assert_eq!(Command::SetTurret(1).to_string(), "1 TURRET");
        assert_eq!(Command::SetFilter(6).to_string(), "6 FILTER");
    }

    #[test]
    fn only_info_queries_span_lines() {
        assert!(Command::QueryGratings.spans_lines());
        assert!(Command::QueryTurrets.spans_lines());
        assert!(!Command::QueryGrating.spans_lines());
        assert!(!Command::SetTurret(1).spans_lines());
    }

    #[test]
    fn strip_trims_marker_and_padding() {
        assert_eq!(strip_reply("1000.0 ok\r\n"), "1000.0");
        assert_eq!(strip_reply("  2  ok\r\n"), "2");
        assert_eq!(strip_reply(" ok\r\n"), "");
    }

    #[test]
    fn parse_reports_raw_reply() {
        let err = parse_reply::<u32>("?? ok\r\n", "an integer").unwrap_err();
        assert_eq!(
            err,
            Sp2150Error::Format {
                reply: "?? ok\r\n".to_string(),
                expected: "an integer"
            }
        );
    }

    #[test]
    fn coercion() {
        assert_eq!(coerce_float(Some("500")).unwrap(), 500.0);
        assert_eq!(coerce_float(Some(" 632.8 ")).unwrap(), 632.8);
        assert_eq!(
            coerce_float(Some("inf")),
            Err(Sp2150Error::BadParameter {
                parameter: "inf".to_string(),
                expected: "a number"
            })
        );
        assert!(matches!(coerce_float(None), Err(Sp2150Error::MissingParameter(_))));
        assert_eq!(coerce_index(Some("3")).unwrap(), 3);
        assert!(matches!(coerce_index(Some("1.5")), Err(Sp2150Error::BadParameter { .. })));
        assert!(matches!(coerce_index(Some("-1")), Err(Sp2150Error::BadParameter { .. })));
    }
}
