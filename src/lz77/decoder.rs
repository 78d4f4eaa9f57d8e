//! Decoder state machine.
//!
//! The decoder keeps its own dictionary, built only from what it has already
//! emitted, and replays each triple against it.  Because the encoder seeds its
//! dictionary with the first byte and slides by `length+1` after every triple,
//! the two dictionaries stay identical step for step.

use std::io::Read;
use crate::tools::ring_buffer::RingBuffer;
use crate::Error;
use super::{Symbol,Triple};

/// Dictionary side of decoding
pub struct Reconstructor {
    dictionary: RingBuffer<u8>
}

impl Reconstructor {
    /// Create the dictionary with every slot set to `seed`, `window` must not be 0
    pub fn seed(seed: u8,window: usize) -> Self {
        Self {
            dictionary: RingBuffer::create(seed,window)
        }
    }
    /// Return the `length+1` bytes that `token` stands for, and slide the dictionary over them.
    pub fn replay(&mut self,token: &Triple) -> Result<Vec<u8>,Error> {
        if token.offset + token.length > self.dictionary.len() {
            log::error!("triple reaches past dictionary: {:?}",token);
            return Err(Error::TokenOutOfRange);
        }
        let Symbol::Byte(next) = token.next else {
            log::error!("end marker after the first triple");
            return Err(Error::TokenOutOfRange);
        };
        let mut ans = self.dictionary.copy_out(token.offset,token.length);
        ans.push(next);
        for b in &ans {
            self.dictionary.push(*b);
        }
        Ok(ans)
    }
}

enum Phase {
    Init,
    Stepping(Reconstructor),
    Done
}

pub struct Decoder<R: Read> {
    reader: R,
    window: usize,
    triples: u64,
    phase: Phase
}

impl <R: Read> Decoder<R> {
    pub fn new(reader: R,window: usize) -> Self {
        Self {
            reader,
            window,
            triples: 0,
            phase: Phase::Init
        }
    }
    fn read_triple(&mut self) -> Result<Option<Triple>,Error> {
        let ans = Triple::read(&mut self.reader)?;
        if ans.is_some() {
            self.triples += 1;
        }
        Ok(ans)
    }
    /// number of compressed bytes consumed so far
    pub fn bytes_read(&self) -> u64 {
        self.triples * Triple::SERIALIZED_SIZE as u64
    }
    /// Get the bytes of the next triple, or `None` when the triple stream is exhausted.
    pub fn next_chunk(&mut self) -> Result<Option<Vec<u8>>,Error> {
        match std::mem::replace(&mut self.phase,Phase::Done) {
            Phase::Init => {
                if self.window==0 {
                    return Err(Error::BadWindowSize);
                }
                match self.read_triple()? {
                    Some(Triple { next: Symbol::Byte(seed), .. }) => {
                        self.phase = Phase::Stepping(Reconstructor::seed(seed,self.window));
                        Ok(Some(vec![seed]))
                    },
                    Some(_) => {
                        // an end marker seed means empty input, nothing may follow it
                        if self.read_triple()?.is_some() {
                            log::error!("triples follow the end of input");
                            return Err(Error::TokenOutOfRange);
                        }
                        log::debug!("stream encodes empty input");
                        Ok(None)
                    },
                    None => Ok(None)
                }
            },
            Phase::Stepping(mut recon) => {
                match self.read_triple()? {
                    Some(token) => {
                        log::trace!("replay {:?}",token);
                        let ans = recon.replay(&token)?;
                        self.phase = Phase::Stepping(recon);
                        Ok(Some(ans))
                    },
                    None => Ok(None)
                }
            },
            Phase::Done => Ok(None)
        }
    }
}

#[test]
fn replay_slides_dictionary() {
    let mut recon = Reconstructor::seed(b'a',4);
    assert_eq!(recon.replay(&Triple::literal(Symbol::Byte(b'b'))).expect("replay failed"),b"b".to_vec());
    assert_eq!(recon.replay(&Triple::literal(Symbol::Byte(b'c'))).expect("replay failed"),b"c".to_vec());
    let token = Triple { offset: 1, length: 2, next: Symbol::Byte(b'c') };
    assert_eq!(recon.replay(&token).expect("replay failed"),b"abc".to_vec());
    assert_eq!(recon.dictionary.copy_out(0,4),b"cabc".to_vec());
}

#[test]
fn replay_rejects_bad_triples() {
    let mut recon = Reconstructor::seed(b'a',4);
    let token = Triple { offset: 3, length: 2, next: Symbol::Byte(b'c') };
    assert!(matches!(recon.replay(&token),Err(Error::TokenOutOfRange)));
    let token = Triple { offset: 0, length: 1, next: Symbol::EndOfStream };
    assert!(matches!(recon.replay(&token),Err(Error::TokenOutOfRange)));
}

#[test]
fn nothing_after_empty_seed() {
    let mut bytes = hex::decode("00000000FFFF").unwrap();
    let mut decoder = Decoder::new(&bytes[..],8);
    assert_eq!(decoder.next_chunk().expect("decoding failed"),None);
    bytes.append(&mut hex::decode("000000004100").unwrap());
    let mut decoder = Decoder::new(&bytes[..],8);
    assert!(matches!(decoder.next_chunk(),Err(Error::TokenOutOfRange)));
}
