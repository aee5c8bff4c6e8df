//! ANSI escape sequence filter
//!
//! Recognizes 7-bit escape sequences in a codepoint stream so they can be
//! passed through with zero width. Only the framing of sequences is tracked;
//! their meaning is ignored.
//!
//! States:
//! - Normal: ordinary text
//! - EscSeen: after ESC, remembering any sequence that was already open
//! - InSequence: inside a sequence opened by any C1 introducer
//!
//! CSI sequences end on a final byte in `0x40..=0x7E` and are abandoned on
//! any byte outside `0x20..=0x7E`. OSC sequences end on `0x09` or on
//! `ESC \`. Every other introducer, including `ESC D` and the rest of the
//! single-character escapes, holds until `ESC \`.

const ESC: u32 = 0x1B;
/// C1 string terminator, `ESC \` in 7-bit form
const ST: u32 = 0x9C;

/// Kind of escape sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sequence {
    /// Control sequence (`ESC [`)
    Csi,
    /// Operating system command (`ESC ]`)
    Osc,
    /// Device control string (`ESC P`)
    Dcs,
    /// Start of string (`ESC X`)
    Sos,
    /// Privacy message (`ESC ^`)
    Pm,
    /// Application program command (`ESC _`)
    Apc,
    /// Any other introducer in `ESC @` to `ESC _`
    Other,
}

impl Sequence {
    fn from_c1(c1: u32) -> Option<Self> {
        match c1 {
            0x9B => Some(Sequence::Csi),
            0x9D => Some(Sequence::Osc),
            0x90 => Some(Sequence::Dcs),
            0x98 => Some(Sequence::Sos),
            0x9E => Some(Sequence::Pm),
            0x9F => Some(Sequence::Apc),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    EscSeen { open: Option<Sequence> },
    InSequence(Sequence),
}

/// What the filter decided about a codepoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filtered {
    /// Part of an escape sequence; zero width
    Consumed,
    /// Ordinary text to be measured
    Text,
}

/// Escape sequence filter for one stream
#[derive(Debug, Clone)]
pub struct AnsiFilter {
    skip: bool,
    state: State,
}

impl AnsiFilter {
    /// With `skip` off, ESC is an ordinary control character and nothing is
    /// ever consumed
    pub fn new(skip: bool) -> Self {
        Self {
            skip,
            state: State::Normal,
        }
    }

    pub fn reset(&mut self) {
        self.state = State::Normal;
    }

    /// Whether the filter is between an ESC and the end of its sequence
    pub fn in_escape(&self) -> bool {
        self.state != State::Normal
    }

    /// Feed one codepoint
    pub fn process(&mut self, codepoint: u32) -> Filtered {
        if codepoint == ESC && self.skip {
            let open = match self.state {
                State::Normal => None,
                State::EscSeen { open } => open,
                State::InSequence(sequence) => Some(sequence),
            };
            self.state = State::EscSeen { open };
            return Filtered::Consumed;
        }

        if let State::EscSeen { open } = self.state {
            if (0x40..=0x5F).contains(&codepoint) {
                let c1 = codepoint + 0x40;
                self.state = match open {
                    _ if c1 == ST => State::Normal,
                    Some(sequence) => State::InSequence(sequence),
                    None => State::InSequence(Sequence::from_c1(c1).unwrap_or(Sequence::Other)),
                };
                return Filtered::Consumed;
            }
            // Not an escape after all; the byte is handled by the prior state
            self.state = open.map_or(State::Normal, State::InSequence);
        }

        match self.state {
            State::Normal | State::EscSeen { .. } => Filtered::Text,
            State::InSequence(Sequence::Csi) => {
                if !(0x20..=0x7E).contains(&codepoint) {
                    self.state = State::Normal;
                    return Filtered::Text;
                }
                if codepoint >= 0x40 {
                    self.state = State::Normal;
                }
                Filtered::Consumed
            },
            State::InSequence(Sequence::Osc) => {
                if codepoint == 0x09 {
                    self.state = State::Normal;
                }
                Filtered::Consumed
            },
            State::InSequence(_) => Filtered::Consumed,
        }
    }
}
