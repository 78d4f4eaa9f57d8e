//! Token of the LZ77 stream and its fixed width binary form.
//!
//! A triple is always 6 bytes: offset, length, and next symbol, each a little
//! endian `i16`.  The symbol field is wider than a byte so that the end marker
//! (-1) can be written alongside the 256 byte values.

use std::io::{Read,ErrorKind};
use crate::Error;

/// serialized value of `Symbol::EndOfStream`
const END_MARKER: i16 = -1;

/// One byte of input, or the marker that the input is exhausted.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum Symbol {
    Byte(u8),
    EndOfStream
}

impl Symbol {
    pub fn is_end(&self) -> bool {
        *self == Symbol::EndOfStream
    }
    fn to_field(&self) -> i16 {
        match self {
            Symbol::Byte(b) => *b as i16,
            Symbol::EndOfStream => END_MARKER
        }
    }
    fn from_field(field: i16) -> Result<Self,Error> {
        match field {
            END_MARKER => Ok(Symbol::EndOfStream),
            0..=255 => Ok(Symbol::Byte(field as u8)),
            _ => Err(Error::TokenOutOfRange)
        }
    }
}

/// Encoded unit: copy `length` symbols from the dictionary starting at `offset`, then emit `next`.
/// A literal has `offset` and `length` both 0.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub struct Triple {
    pub offset: usize,
    pub length: usize,
    pub next: Symbol
}

impl Triple {
    /// Size of a serialized triple in bytes
    pub const SERIALIZED_SIZE: usize = 6;

    pub fn literal(next: Symbol) -> Self {
        Self {
            offset: 0,
            length: 0,
            next
        }
    }
    pub fn to_bytes(&self) -> Result<[u8;Self::SERIALIZED_SIZE],Error> {
        let offset = i16::try_from(self.offset).map_err(|_| Error::TokenOutOfRange)?;
        let length = i16::try_from(self.length).map_err(|_| Error::TokenOutOfRange)?;
        let mut ans = [0;Self::SERIALIZED_SIZE];
        ans[0..2].copy_from_slice(&offset.to_le_bytes());
        ans[2..4].copy_from_slice(&length.to_le_bytes());
        ans[4..6].copy_from_slice(&self.next.to_field().to_le_bytes());
        Ok(ans)
    }
    pub fn from_bytes(buf: &[u8;Self::SERIALIZED_SIZE]) -> Result<Self,Error> {
        let offset = i16::from_le_bytes([buf[0],buf[1]]);
        let length = i16::from_le_bytes([buf[2],buf[3]]);
        let next = Symbol::from_field(i16::from_le_bytes([buf[4],buf[5]]))?;
        if offset < 0 || length < 0 {
            return Err(Error::TokenOutOfRange);
        }
        Ok(Self {
            offset: offset as usize,
            length: length as usize,
            next
        })
    }
    /// Read the next triple.  Returns `None` if the stream ends exactly on a triple
    /// boundary, or `Error::DecodeTruncatedStream` if it ends anywhere else.
    pub fn read<R: Read>(reader: &mut R) -> Result<Option<Self>,Error> {
        let mut buf = [0;Self::SERIALIZED_SIZE];
        let mut count = 0;
        while count < Self::SERIALIZED_SIZE {
            match reader.read(&mut buf[count..]) {
                Ok(0) => break,
                Ok(n) => count += n,
                Err(e) if e.kind()==ErrorKind::Interrupted => {},
                Err(e) => return Err(Error::StreamRead(e))
            }
        }
        match count {
            0 => Ok(None),
            Self::SERIALIZED_SIZE => Ok(Some(Self::from_bytes(&buf)?)),
            _ => Err(Error::DecodeTruncatedStream)
        }
    }
}

#[test]
fn field_layout() {
    let token = Triple { offset: 0x123, length: 7, next: Symbol::Byte(b'z') };
    assert_eq!(token.to_bytes().expect("encode failed").to_vec(),hex::decode("230107007A00").unwrap());
    let token = Triple::literal(Symbol::EndOfStream);
    assert_eq!(token.to_bytes().expect("encode failed").to_vec(),hex::decode("00000000FFFF").unwrap());
    let token = Triple { offset: 40000, length: 0, next: Symbol::Byte(0) };
    assert!(matches!(token.to_bytes(),Err(Error::TokenOutOfRange)));
}

#[test]
fn bad_fields() {
    // symbol 0x100 is neither a byte nor the end marker
    let buf: [u8;6] = [0,0,0,0,0,1];
    assert!(matches!(Triple::from_bytes(&buf),Err(Error::TokenOutOfRange)));
    // negative length
    let buf: [u8;6] = [0,0,0xff,0xff,0x41,0];
    assert!(matches!(Triple::from_bytes(&buf),Err(Error::TokenOutOfRange)));
}

#[test]
fn read_boundaries() {
    let bytes = hex::decode("0100020063000000").unwrap();
    let mut src = std::io::Cursor::new(bytes);
    let token = Triple::read(&mut src).expect("read failed");
    assert_eq!(token,Some(Triple { offset: 1, length: 2, next: Symbol::Byte(b'c') }));
    assert!(matches!(Triple::read(&mut src),Err(Error::DecodeTruncatedStream)));
    let mut empty = std::io::Cursor::new(Vec::<u8>::new());
    assert_eq!(Triple::read(&mut empty).expect("read failed"),None);
}
