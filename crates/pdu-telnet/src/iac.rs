//! Telnet option negotiation filter (RFC 854)
//!
//! Strips IAC command sequences from the incoming byte stream and produces
//! the replies the client must send back. The client accepts the server
//! echoing and suppressing go-ahead, and refuses everything else.

use bytes::{BufMut, BytesMut};

pub const IAC: u8 = 255;
pub const DONT: u8 = 254;
pub const DO: u8 = 253;
pub const WONT: u8 = 252;
pub const WILL: u8 = 251;
pub const SB: u8 = 250;
pub const SE: u8 = 240;

pub const OPT_ECHO: u8 = 1;
pub const OPT_SUPPRESS_GO_AHEAD: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Data,
    Command,
    Option(u8),
    Subnegotiation,
    SubnegotiationIac,
}

/// Incremental filter; sequences may be split across reads
#[derive(Debug)]
pub struct IacFilter {
    state: State,
}

impl Default for IacFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl IacFilter {
    pub fn new() -> Self {
        Self { state: State::Data }
    }

    /// Feed raw bytes. Payload goes to `data`, negotiation replies to `replies`.
    pub fn feed(&mut self, input: &[u8], data: &mut BytesMut, replies: &mut Vec<u8>) {
        for &byte in input {
            self.state = match self.state {
                State::Data if byte == IAC => State::Command,
                State::Data => {
                    data.put_u8(byte);
                    State::Data
                }
                State::Command => match byte {
                    IAC => {
                        data.put_u8(IAC);
                        State::Data
                    }
                    WILL | WONT | DO | DONT => State::Option(byte),
                    SB => State::Subnegotiation,
                    // NOP, GA, DM and friends carry no payload
                    _ => State::Data,
                },
                State::Option(verb) => {
                    if let Some(reply) = negotiate(verb, byte) {
                        replies.extend_from_slice(&[IAC, reply, byte]);
                    }
                    State::Data
                }
                State::Subnegotiation if byte == IAC => State::SubnegotiationIac,
                State::Subnegotiation => State::Subnegotiation,
                State::SubnegotiationIac if byte == SE => State::Data,
                State::SubnegotiationIac => State::Subnegotiation,
            };
        }
    }
}

/// Reply verb for a server request, `None` when no answer is due
fn negotiate(verb: u8, option: u8) -> Option<u8> {
    match verb {
        WILL if option == OPT_ECHO || option == OPT_SUPPRESS_GO_AHEAD => Some(DO),
        WILL => Some(DONT),
        DO => Some(WONT),
        // WONT / DONT only confirm the option stays off
        _ => None,
    }
}

/// Escape literal 0xFF bytes in outgoing payload
pub fn escape(payload: &[u8], out: &mut BytesMut) {
    for &byte in payload {
        if byte == IAC {
            out.put_u8(IAC);
        }
        out.put_u8(byte);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(filter: &mut IacFilter, input: &[u8]) -> (Vec<u8>, Vec<u8>) {
        let mut data = BytesMut::new();
        let mut replies = Vec::new();
        filter.feed(input, &mut data, &mut replies);
        (data.to_vec(), replies)
    }

    #[test]
    fn test_plain_text_passes_through() {
        let mut filter = IacFilter::new();
        let (data, replies) = run(&mut filter, b"Login Name: ");
        assert_eq!(data, b"Login Name: ".to_vec());
        assert!(replies.is_empty());
    }

    #[test]
    fn test_accepts_echo_and_sga() {
        let mut filter = IacFilter::new();
        let (data, replies) = run(
            &mut filter,
            &[IAC, WILL, OPT_ECHO, IAC, WILL, OPT_SUPPRESS_GO_AHEAD, b'>'],
        );
        assert_eq!(data, b">".to_vec());
        assert_eq!(
            replies,
            vec![IAC, DO, OPT_ECHO, IAC, DO, OPT_SUPPRESS_GO_AHEAD]
        );
    }

    #[test]
    fn test_refuses_other_options() {
        let mut filter = IacFilter::new();
        // WILL NAWS (31), DO TERMINAL-TYPE (24), WONT ECHO
        let (data, replies) = run(&mut filter, &[IAC, WILL, 31, IAC, DO, 24, IAC, WONT, 1]);
        assert!(data.is_empty());
        assert_eq!(replies, vec![IAC, DONT, 31, IAC, WONT, 24]);
    }

    #[test]
    fn test_sequence_split_across_reads() {
        let mut filter = IacFilter::new();
        let (first, _) = run(&mut filter, &[b'a', IAC]);
        let (second, replies) = run(&mut filter, &[WILL, OPT_ECHO, b'b']);
        assert_eq!(first, b"a".to_vec());
        assert_eq!(second, b"b".to_vec());
        assert_eq!(replies, vec![IAC, DO, OPT_ECHO]);
    }

    #[test]
    fn test_subnegotiation_skipped() {
        let mut filter = IacFilter::new();
        let (data, replies) = run(&mut filter, &[b'x', IAC, SB, 24, 1, IAC, IAC, IAC, SE, b'y']);
        assert_eq!(data, b"xy".to_vec());
        assert!(replies.is_empty());
    }

    #[test]
    fn test_escaped_iac_is_data() {
        let mut filter = IacFilter::new();
        let (data, _) = run(&mut filter, &[IAC, IAC, b'z']);
        assert_eq!(data, vec![0xFF, b'z']);
    }

    #[test]
    fn test_escape_outgoing() {
        let mut out = BytesMut::new();
        escape(&[b'a', 0xFF, b'b'], &mut out);
        assert_eq!(out.to_vec(), vec![b'a', 0xFF, 0xFF, b'b']);
    }
}
