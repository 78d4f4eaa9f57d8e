//! Byte level source and sink for the LZ77 stages.
//!
//! The source never blocks past the end of its stream; it keeps answering
//! with the end marker instead.

use std::io::{Read,Write,BufReader,BufWriter,ErrorKind};
use crate::lz77::Symbol;
use crate::Error;

pub struct ByteSource<R: Read> {
    reader: BufReader<R>,
    count: u64,
    exhausted: bool
}

impl <R: Read> ByteSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            count: 0,
            exhausted: false
        }
    }
    /// Get the next symbol, `Symbol::EndOfStream` once the stream is exhausted.
    pub fn read_next(&mut self) -> Result<Symbol,Error> {
        if self.exhausted {
            return Ok(Symbol::EndOfStream);
        }
        let mut by: [u8;1] = [0];
        match self.reader.read_exact(&mut by) {
            Ok(()) => {
                self.count += 1;
                Ok(Symbol::Byte(by[0]))
            },
            Err(e) if e.kind()==ErrorKind::UnexpectedEof => {
                log::debug!("end of input after {} bytes",self.count);
                self.exhausted = true;
                Ok(Symbol::EndOfStream)
            },
            Err(e) => Err(Error::StreamRead(e))
        }
    }
    /// number of real bytes read so far
    pub fn bytes_read(&self) -> u64 {
        self.count
    }
}

pub struct ByteSink<W: Write> {
    writer: BufWriter<W>,
    count: u64
}

impl <W: Write> ByteSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
            count: 0
        }
    }
    pub fn append(&mut self,bytes: &[u8]) -> Result<(),Error> {
        self.writer.write_all(bytes).map_err(Error::StreamWrite)?;
        self.count += bytes.len() as u64;
        Ok(())
    }
    pub fn flush(&mut self) -> Result<(),Error> {
        self.writer.flush().map_err(Error::StreamWrite)
    }
    /// number of bytes appended so far
    pub fn bytes_written(&self) -> u64 {
        self.count
    }
}

#[test]
fn source_sticks_at_end() {
    let mut src = ByteSource::new(std::io::Cursor::new(b"AB".to_vec()));
    assert_eq!(src.read_next().expect("read failed"),Symbol::Byte(b'A'));
    assert_eq!(src.read_next().expect("read failed"),Symbol::Byte(b'B'));
    for _i in 0..3 {
        assert_eq!(src.read_next().expect("read failed"),Symbol::EndOfStream);
    }
    assert_eq!(src.bytes_read(),2);
}

#[test]
fn sink_counts() {
    let mut out: Vec<u8> = Vec::new();
    {
        let mut sink = ByteSink::new(&mut out);
        sink.append(&[1,2,3]).expect("append failed");
        sink.append(&[4]).expect("append failed");
        sink.flush().expect("flush failed");
        assert_eq!(sink.bytes_written(),4);
    }
    assert_eq!(out,vec![1,2,3,4]);
}

#[test]
fn read_error_is_not_end_of_stream() {
    struct BadSector;
    impl Read for BadSector {
        fn read(&mut self,_buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(ErrorKind::Other,"bad sector"))
        }
    }
    let mut src = ByteSource::new(BadSector);
    assert!(matches!(src.read_next(),Err(Error::StreamRead(_))));
    assert_eq!(src.bytes_read(),0);
}
