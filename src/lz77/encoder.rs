//! Encoder state machine, turns a byte source into triples one at a time.

use std::io::Read;
use crate::tools::stream::ByteSource;
use crate::Error;
use super::window::Windows;
use super::{Options,Symbol,Triple};

enum Phase {
    Init,
    Stepping(Windows),
    Done
}

pub struct Encoder<R: Read> {
    src: ByteSource<R>,
    lookahead: usize,
    window: usize,
    phase: Phase
}

impl <R: Read> Encoder<R> {
    pub fn new(reader: R,opt: &Options) -> Self {
        Self {
            src: ByteSource::new(reader),
            lookahead: opt.lookahead,
            window: opt.window,
            phase: Phase::Init
        }
    }
    /// Produce the next triple, or `None` once the input is fully encoded.
    /// The first triple is a literal of the first byte, which also seeds the whole dictionary.
    /// If the input is empty the first and only triple carries the end marker.
    pub fn next_token(&mut self) -> Result<Option<Triple>,Error> {
        // any error leaves the encoder in the done state
        match std::mem::replace(&mut self.phase,Phase::Done) {
            Phase::Init => {
                let first = self.src.read_next()?;
                let Symbol::Byte(seed) = first else {
                    log::debug!("empty input");
                    return Ok(Some(Triple::literal(Symbol::EndOfStream)));
                };
                let windows = Windows::seed(seed,self.lookahead,self.window,&mut self.src)?;
                if !windows.head().is_end() {
                    self.phase = Phase::Stepping(windows);
                }
                Ok(Some(Triple::literal(first)))
            },
            Phase::Stepping(mut windows) => {
                let token = windows.find_match();
                windows.shift(token.length + 1,&mut self.src)?;
                if !windows.head().is_end() {
                    self.phase = Phase::Stepping(windows);
                }
                Ok(Some(token))
            },
            Phase::Done => Ok(None)
        }
    }
    /// number of input bytes consumed so far
    pub fn bytes_read(&self) -> u64 {
        self.src.bytes_read()
    }
}

#[test]
fn token_sequence() {
    let opt = Options { lookahead: 4, window: 4, ..super::STD_OPTIONS };
    let mut encoder = Encoder::new(&b"abcabc"[..],&opt);
    let mut tokens = Vec::new();
    while let Some(token) = encoder.next_token().expect("encoding failed") {
        tokens.push(token);
    }
    assert_eq!(tokens,vec![
        Triple::literal(Symbol::Byte(b'a')),
        Triple::literal(Symbol::Byte(b'b')),
        Triple::literal(Symbol::Byte(b'c')),
        Triple { offset: 1, length: 2, next: Symbol::Byte(b'c') }
    ]);
    assert_eq!(encoder.bytes_read(),6);
    assert_eq!(encoder.next_token().expect("encoding failed"),None);
}

#[test]
fn empty_input() {
    let mut encoder = Encoder::new(&b""[..],&super::STD_OPTIONS);
    assert_eq!(encoder.next_token().expect("encoding failed"),Some(Triple::literal(Symbol::EndOfStream)));
    assert_eq!(encoder.next_token().expect("encoding failed"),None);
}
