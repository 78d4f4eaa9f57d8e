//! Sliding windows of the encoder.
//!
//! The lookahead buffer holds the next `N` symbols not yet encoded, the dictionary
//! holds the `M` symbols most recently encoded.  Together they are a view of
//! `N+M` consecutive positions of the stream, and every step slides both by the
//! number of symbols a triple consumed.

use std::io::Read;
use crate::tools::ring_buffer::RingBuffer;
use crate::tools::stream::ByteSource;
use crate::Error;
use super::{Symbol,Triple};

pub struct Windows {
    lookahead: RingBuffer<Symbol>,
    dictionary: RingBuffer<u8>
}

impl Windows {
    /// Fill the whole dictionary with `seed`, then fill the lookahead buffer from `src`.
    pub fn seed<R: Read>(seed: u8,lookahead: usize,window: usize,src: &mut ByteSource<R>) -> Result<Self,Error> {
        if lookahead==0 || window==0 {
            return Err(Error::BadWindowSize);
        }
        let mut ans = Self {
            lookahead: RingBuffer::create(Symbol::EndOfStream,lookahead),
            dictionary: RingBuffer::create(seed,window)
        };
        for i in 0..lookahead {
            ans.lookahead.set(i,src.read_next()?);
        }
        Ok(ans)
    }
    /// Build windows with given contents, oldest first.
    #[cfg(test)]
    pub fn from_parts(dictionary: &[u8],lookahead: &[Symbol]) -> Result<Self,Error> {
        if lookahead.is_empty() || dictionary.is_empty() {
            return Err(Error::BadWindowSize);
        }
        let mut ans = Self {
            lookahead: RingBuffer::create(Symbol::EndOfStream,lookahead.len()),
            dictionary: RingBuffer::create(0,dictionary.len())
        };
        for (i,sym) in lookahead.iter().enumerate() {
            ans.lookahead.set(i,*sym);
        }
        for (i,b) in dictionary.iter().enumerate() {
            ans.dictionary.set(i,*b);
        }
        Ok(ans)
    }
    /// first symbol of the lookahead buffer
    pub fn head(&self) -> Symbol {
        self.lookahead.get(0)
    }
    #[cfg(test)]
    pub fn dictionary(&self) -> Vec<u8> {
        self.dictionary.copy_out(0,self.dictionary.len())
    }
    #[cfg(test)]
    pub fn lookahead(&self) -> Vec<Symbol> {
        self.lookahead.copy_out(0,self.lookahead.len())
    }
    /// Find the longest prefix of the lookahead buffer that appears in the dictionary.
    /// The scan is brute force, from low offsets to high, and only a strictly longer match
    /// replaces the best one, so ties go to the smallest offset.  The match never extends
    /// past the end of the dictionary, and never takes the last lookahead slot, so there
    /// is always a next symbol to send.
    pub fn find_match(&self) -> Triple {
        let n = self.lookahead.len();
        let m = self.dictionary.len();
        if self.head().is_end() {
            // no real data left, only reachable for an empty stream
            return Triple::literal(Symbol::EndOfStream);
        }
        let mut best_len = 0;
        let mut best_offset = 0;
        let mut i = 0;
        while i + best_len < m {
            let mut t = 0;
            while t + 1 < n && i + t < m && self.lookahead.get(t)==Symbol::Byte(self.dictionary.get(i+t)) {
                t += 1;
            }
            if t > best_len {
                best_len = t;
                best_offset = i;
            }
            i += 1;
        }
        if self.lookahead.get(best_len).is_end() {
            // The match ran into the end of the stream.  Since the head is real, best_len > 0,
            // give back the last matched symbol and send it as the next symbol instead.
            let length = best_len - 1;
            return Triple {
                offset: if length==0 { 0 } else { best_offset },
                length,
                next: self.lookahead.get(length)
            };
        }
        Triple {
            offset: best_offset,
            length: best_len,
            next: self.lookahead.get(best_len)
        }
    }
    /// Slide both windows by `consumed` symbols: the head of the lookahead buffer moves
    /// to the tail of the dictionary, and the tail of the lookahead buffer is refilled from `src`.
    /// Only real symbols can be consumed, asking for more than remain is an error.
    pub fn shift<R: Read>(&mut self,consumed: usize,src: &mut ByteSource<R>) -> Result<(),Error> {
        for _i in 0..consumed {
            if self.head().is_end() {
                log::error!("cannot shift an end marker into the dictionary");
                return Err(Error::ShiftPastEnd);
            }
            let next = src.read_next()?;
            if let Symbol::Byte(b) = self.lookahead.push(next) {
                self.dictionary.push(b);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
fn syms(s: &[u8]) -> Vec<Symbol> {
    s.iter().map(|b| Symbol::Byte(*b)).collect()
}

#[test]
fn literal_when_nothing_matches() {
    let win = Windows::from_parts(b"xyzw",&syms(b"abcd")).expect("bad windows");
    assert_eq!(win.find_match(),Triple::literal(Symbol::Byte(b'a')));
}

#[test]
fn longest_match_wins() {
    let win = Windows::from_parts(b"abxabcq",&syms(b"abcde")).expect("bad windows");
    assert_eq!(win.find_match(),Triple { offset: 3, length: 3, next: Symbol::Byte(b'd') });
}

#[test]
fn ties_keep_smallest_offset() {
    let win = Windows::from_parts(b"abxabx",&syms(b"abqr")).expect("bad windows");
    assert_eq!(win.find_match(),Triple { offset: 0, length: 2, next: Symbol::Byte(b'q') });
}

#[test]
fn match_stops_at_dictionary_end() {
    // "ab" at offset 4 could continue into the lookahead, but must not
    let win = Windows::from_parts(b"qqqqab",&syms(b"abab")).expect("bad windows");
    assert_eq!(win.find_match(),Triple { offset: 4, length: 2, next: Symbol::Byte(b'a') });
}

#[test]
fn last_slot_is_reserved() {
    let win = Windows::from_parts(b"aaaaaaaa",&syms(b"aaaa")).expect("bad windows");
    assert_eq!(win.find_match(),Triple { offset: 0, length: 3, next: Symbol::Byte(b'a') });
}

#[test]
fn end_of_stream_correction() {
    let mut look = syms(b"bc");
    look.push(Symbol::EndOfStream);
    look.push(Symbol::EndOfStream);
    let win = Windows::from_parts(b"xbcx",&look).expect("bad windows");
    assert_eq!(win.find_match(),Triple { offset: 1, length: 1, next: Symbol::Byte(b'c') });
    // correction down to length 0 resets the offset
    let look = vec![Symbol::Byte(b'c'),Symbol::EndOfStream];
    let win = Windows::from_parts(b"xbcx",&look).expect("bad windows");
    assert_eq!(win.find_match(),Triple::literal(Symbol::Byte(b'c')));
    // nothing real left
    let look = vec![Symbol::EndOfStream;4];
    let win = Windows::from_parts(b"xbcx",&look).expect("bad windows");
    assert_eq!(win.find_match(),Triple::literal(Symbol::EndOfStream));
}

#[test]
fn shift_moves_both_windows() {
    let mut src = ByteSource::new(std::io::Cursor::new(b"ef".to_vec()));
    let mut win = Windows::seed(b'a',4,6,&mut src).expect("bad windows");
    assert_eq!(win.dictionary(),b"aaaaaa".to_vec());
    let mut expected = syms(b"ef");
    expected.append(&mut vec![Symbol::EndOfStream;2]);
    assert_eq!(win.lookahead(),expected);
    win.shift(2,&mut src).expect("shift failed");
    assert_eq!(win.dictionary(),b"aaaaef".to_vec());
    assert_eq!(win.lookahead(),vec![Symbol::EndOfStream;4]);
    assert!(win.head().is_end());
}

#[test]
fn shift_stops_at_end_of_data() {
    let mut src = ByteSource::new(std::io::Cursor::new(b"ef".to_vec()));
    let mut win = Windows::seed(b'a',4,6,&mut src).expect("bad windows");
    assert!(matches!(win.shift(3,&mut src),Err(Error::ShiftPastEnd)));
    // the two real symbols made it into the dictionary before the error
    assert_eq!(win.dictionary(),b"aaaaef".to_vec());
}

#[test]
fn tokens_match_their_dictionary() {
    // pseudo-random text over a small alphabet so that matches are plentiful
    let mut state: u32 = 12345;
    let mut data = Vec::new();
    for _i in 0..2000 {
        state = state.wrapping_mul(1103515245).wrapping_add(12345);
        data.push(b"abcd"[(state >> 16) as usize % 4]);
    }
    let mut src = ByteSource::new(std::io::Cursor::new(data[1..].to_vec()));
    let mut win = Windows::seed(data[0],8,32,&mut src).expect("bad windows");
    let mut pos = 1;
    while !win.head().is_end() {
        let token = win.find_match();
        let dict = win.dictionary();
        assert!(token.length < 8);
        assert!(token.offset + token.length <= dict.len());
        assert_eq!(dict[token.offset..token.offset+token.length],data[pos..pos+token.length]);
        assert_eq!(token.next,Symbol::Byte(data[pos+token.length]));
        if token.length==0 {
            assert_eq!(token.offset,0);
        }
        pos += token.length + 1;
        win.shift(token.length+1,&mut src).expect("shift failed");
    }
    assert_eq!(pos,data.len());
}
