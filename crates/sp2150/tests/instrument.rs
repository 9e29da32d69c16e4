use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use sp2150::sp2150_client::{ClientError, Transport};
use sp2150::*;

/// What the scripted instrument saw.
#[derive(Default)]
struct Log {
    sent: Vec<String>,
    // Commands sent as multi-line queries.
    multiline: Vec<String>,
    closes: usize,
}

/// Replies to each query with the next canned reply, in order.
struct ScriptedTransport {
    replies: VecDeque<&'static str>,
    log: Rc<RefCell<Log>>,
}

impl Transport for ScriptedTransport {
    fn query(&mut self, command: &str) -> Result<String, ClientError> {
        self.log.borrow_mut().sent.push(command.to_string());
        self.replies
            .pop_front()
            .map(str::to_string)
            .ok_or(ClientError::ReadTimeout)
    }

    fn query_until(&mut self, command: &str, end_marker: &str) -> Result<String, ClientError> {
        self.log.borrow_mut().multiline.push(command.to_string());
        let reply = self.query(command)?;
        if reply.ends_with(end_marker) {
            Ok(reply)
        } else {
            Err(ClientError::ReadTimeout)
        }
    }

    fn close(&mut self) -> Result<(), ClientError> {
        self.log.borrow_mut().closes += 1;
        Ok(())
    }
}

fn scripted(replies: &[&'static str]) -> (Sp2150<ScriptedTransport>, Rc<RefCell<Log>>) {
    let log = Rc::new(RefCell::new(Log::default()));
    let transport = ScriptedTransport {
        replies: replies.iter().copied().collect(),
        log: log.clone(),
    };
    (Sp2150::new(transport), log)
}

#[test]
fn test_scan_speed_round_trip() {
    let (mut mono, log) = scripted(&["1000.0 ok\r\n", " ok\r\n"]);

    assert_eq!(mono.scan_speed().unwrap(), 1000.0);
    mono.set_scan_speed(250.0).unwrap();

    assert_eq!(log.borrow().sent, vec!["?NM/MIN", "250.0 NM/MIN"]);
    assert!(log.borrow().multiline.is_empty());
}

#[test]
fn test_wavelength_commands() {
    let (mut mono, log) = scripted(&[" ok\r\n", " ok\r\n", "  532.3  ok\r\n"]);

    mono.scan_to_wavelength(532.26).unwrap();
    mono.set_wavelength(500.0).unwrap();
    assert_eq!(mono.wavelength().unwrap(), 532.3);

    assert_eq!(log.borrow().sent, vec!["532.3 NM", "500.0 GOTO", "?NM"]);
}

#[test]
fn test_index_commands() {
    let (mut mono, log) = scripted(&[
        " ok\r\n", "2 ok\r\n", " ok\r\n", "1 ok\r\n", " ok\r\n", "3 ok\r\n", " ok\r\n",
    ]);

    mono.set_grating(2).unwrap();
    assert_eq!(mono.grating().unwrap(), 2);
    mono.set_turret(1).unwrap();
    assert_eq!(mono.turret().unwrap(), 1);
    mono.set_filter(3).unwrap();
    assert_eq!(mono.filter().unwrap(), 3);
    mono.home_filter().unwrap();

    assert_eq!(
        log.borrow().sent,
        vec![
            "2 GRATING", "?GRATING", "1 TURRET", "?TURRET", "3 FILTER", "?FILTER", "FHOME"
        ]
    );
}

#[test]
fn test_info_queries_return_stripped_text() {
    let (mut mono, log) = scripted(&[
        " 1  1200 g/mm BLZ=  500NM \r\n 2  600 g/mm BLZ=  1.0UM  ok\r\n",
        " 1 1200 600 ok\r\n",
    ]);

    assert_eq!(
        mono.grating_info().unwrap(),
        "1  1200 g/mm BLZ=  500NM \r\n 2  600 g/mm BLZ=  1.0UM"
    );
    assert_eq!(mono.turret_info().unwrap(), "1 1200 600");
    assert_eq!(log.borrow().sent, vec!["?GRATINGS", "?TURRETS"]);
    assert_eq!(log.borrow().multiline, vec!["?GRATINGS", "?TURRETS"]);
}

#[test]
fn test_rejected_setter_carries_reply() {
    let (mut mono, _log) = scripted(&["9 GRATING ?\r\n"]);

    let err = mono.set_grating(9).unwrap_err();
    assert_eq!(
        err,
        Sp2150Error::CommandFailed {
            command: "9 GRATING".to_string(),
            response: "9 GRATING ?\r\n".to_string(),
        }
    );
    assert!(err.to_string().contains("9 GRATING ?"));
}

#[test]
fn test_every_setter_validates_ok_suffix() {
    let (mut mono, _log) = scripted(&["?\r\n"; 6]);

    let results = [
        mono.set_scan_speed(100.0),
        mono.scan_to_wavelength(400.0),
        mono.set_wavelength(400.0),
        mono.set_grating(1),
        mono.set_turret(1),
        mono.set_filter(1),
    ];
    for result in results {
        match result {
            Err(Sp2150Error::CommandFailed { response, .. }) => assert_eq!(response, "?\r\n"),
            other => panic!("expected a rejected command, got {:?}", other),
        }
    }
}

#[test]
fn test_getters_do_not_validate_suffix() {
    let (mut mono, _log) = scripted(&["4\r\n"]);
    assert_eq!(mono.filter().unwrap(), 4);
}

#[test]
fn test_malformed_getter_reply_is_format_error() {
    let (mut mono, _log) = scripted(&["E? ok\r\n"]);

    match mono.wavelength() {
        Err(Sp2150Error::Format { reply, .. }) => assert_eq!(reply, "E? ok\r\n"),
        other => panic!("expected a format error, got {:?}", other),
    }
}

#[test]
fn test_transport_errors_propagate() {
    let (mut mono, _log) = scripted(&[]);

    let err = mono.grating().unwrap_err();
    assert_eq!(err, Sp2150Error::Client(ClientError::ReadTimeout));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_drop_closes_transport() {
    let (mono, log) = scripted(&[]);
    drop(mono);
    assert_eq!(log.borrow().closes, 1);
}

#[test]
fn test_disconnect_then_drop_closes_once() {
    let (mut mono, log) = scripted(&[]);

    assert!(mono.is_connected());
    mono.disconnect().unwrap();
    mono.disconnect().unwrap();
    assert!(!mono.is_connected());
    drop(mono);

    assert_eq!(log.borrow().closes, 1);
}

#[test]
fn test_connect_rejects_other_read_terminators() {
    let options = SerialOptions {
        read_terminator: b'\r',
        ..SerialOptions::default()
    };

    match Sp2150::connect("ASRL1::INSTR", &options) {
        Err(Sp2150Error::BadParameter { parameter, .. }) => {
            assert!(parameter.contains("read terminator"))
        }
        Err(e) => panic!("unexpected error {e}"),
        Ok(_) => panic!("connect should refuse a non-newline terminator"),
    }
}

#[test]
fn test_with_session_closes_on_error() {
    let (mono, log) = scripted(&["bad\r\n"]);

    let result = Sp2150::with_session(mono, |mono| mono.set_filter(2));

    assert!(matches!(result, Err(Sp2150Error::CommandFailed { .. })));
    assert_eq!(log.borrow().closes, 1);
    assert_eq!(log.borrow().sent, vec!["2 FILTER"]);
}

#[test]
fn test_with_session_returns_value() {
    let (mono, _log) = scripted(&["600.0 ok\r\n"]);
    let speed = Sp2150::with_session(mono, |mono| mono.scan_speed()).unwrap();
    assert_eq!(speed, 600.0);
}
