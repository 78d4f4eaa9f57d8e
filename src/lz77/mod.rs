//! LZ77 Compression
//!
//! Classic sliding window LZ77.  The encoder keeps a lookahead buffer of `N`
//! symbols and a dictionary of the `M` symbols before it, and for every step
//! emits the longest dictionary match as a triple `(offset,length,next)`.
//! Match finding is a brute force scan, there is no hash chain or tree index.
//!
//! * Every triple is 6 bytes, there is no header, so both sides must agree on `M`
//! * The first triple is a literal whose symbol also seeds the whole dictionary
//! * Compression ratio is modest, the point is simplicity and determinism

use std::io::{Cursor,Read,Write,Seek,SeekFrom};
use crate::tools::stream::ByteSink;
use crate::Error;

mod triple;
mod window;
mod encoder;
mod decoder;

pub use triple::{Symbol,Triple};
pub use encoder::Encoder;
pub use decoder::{Decoder,Reconstructor};

/// Options controlling compression
#[derive(Clone,Debug)]
pub struct Options {
    /// size of the lookahead buffer `N`, the longest match is `N-1`
    pub lookahead: usize,
    /// size of the dictionary `M`, must be the same for compress and expand
    pub window: usize,
    /// starting position in the input file
    pub in_offset: u64,
    /// starting position in the output file
    pub out_offset: u64
}

pub const STD_OPTIONS: Options = Options {
    lookahead: 250,
    window: 5000,
    in_offset: 0,
    out_offset: 0
};

impl Options {
    /// Make sure every triple these windows can produce fits the `i16` fields.
    pub fn verify(&self) -> Result<(),Error> {
        let max = i16::MAX as usize;
        if self.lookahead < 1 || self.window < 1 || self.lookahead - 1 > max || self.window > max {
            log::error!("unsupported window sizes N={} M={}",self.lookahead,self.window);
            return Err(Error::BadWindowSize);
        }
        Ok(())
    }
}

/// Main compression function.
/// `expanded_in` is an object with `Read` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<&[u8]>`.
/// `compressed_out` is an object with `Write` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<Vec<u8>>`.
/// Returns (in_size,out_size) or error.
pub fn compress<R,W>(expanded_in: &mut R, compressed_out: &mut W, opt: &Options) -> Result<(u64,u64),Error>
where R: Read + Seek, W: Write + Seek {
    opt.verify()?;
    expanded_in.seek(SeekFrom::Start(opt.in_offset)).map_err(Error::StreamRead)?;
    compressed_out.seek(SeekFrom::Start(opt.out_offset)).map_err(Error::StreamWrite)?;
    let mut encoder = Encoder::new(expanded_in,opt);
    let mut sink = ByteSink::new(compressed_out);
    let mut count: usize = 0;
    log::debug!("entering loop over triples");
    while let Some(token) = encoder.next_token()? {
        log::trace!("triple: {:?}",token);
        sink.append(&token.to_bytes()?)?;
        count += 1;
    }
    sink.flush()?;
    log::debug!("wrote {} triples",count);
    Ok((encoder.bytes_read(),sink.bytes_written()))
}

/// Main decompression function.
/// `compressed_in` is an object with `Read` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<&[u8]>`.
/// `expanded_out` is an object with `Write` and `Seek` traits, usually `std::fs::File`, or `std::io::Cursor<Vec<u8>>`.
/// Returns (in_size,out_size) or error.  A stream that stops partway through a triple is an error.
pub fn expand<R,W>(compressed_in: &mut R, expanded_out: &mut W, opt: &Options) -> Result<(u64,u64),Error>
where R: Read + Seek, W: Write + Seek {
    opt.verify()?;
    compressed_in.seek(SeekFrom::Start(opt.in_offset)).map_err(Error::StreamRead)?;
    expanded_out.seek(SeekFrom::Start(opt.out_offset)).map_err(Error::StreamWrite)?;
    let mut decoder = Decoder::new(std::io::BufReader::new(compressed_in),opt.window);
    let mut sink = ByteSink::new(expanded_out);
    log::debug!("entering loop over triples");
    while let Some(chunk) = decoder.next_chunk()? {
        sink.append(&chunk)?;
    }
    sink.flush()?;
    log::debug!("read {} bytes of triples",decoder.bytes_read());
    Ok((decoder.bytes_read(),sink.bytes_written()))
}

/// Convenience function, calls `compress` with a slice returning a Vec
pub fn compress_slice(slice: &[u8],opt: &Options) -> Result<Vec<u8>,Error> {
    let mut src = Cursor::new(slice);
    let mut ans: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    compress(&mut src,&mut ans,opt)?;
    Ok(ans.into_inner())
}

/// Convenience function, calls `expand` with a slice returning a Vec
pub fn expand_slice(slice: &[u8],opt: &Options) -> Result<Vec<u8>,Error> {
    let mut src = Cursor::new(slice);
    let mut ans: Cursor<Vec<u8>> = Cursor::new(Vec::new());
    expand(&mut src,&mut ans,opt)?;
    Ok(ans.into_inner())
}

// *************** TESTS *****************

#[test]
fn compression_works() {
    let opt = Options { lookahead: 4, window: 4, ..STD_OPTIONS };
    let test_data = "abcabc".as_bytes();
    let lz_str = "0000 0000 6100 0000 0000 6200 0000 0000 6300 0100 0200 6300";
    let compressed = compress_slice(test_data,&opt).expect("compression failed");
    assert_eq!(compressed,hex::decode(lz_str.replace(" ","")).unwrap());

    let test_data = "aaaa".as_bytes();
    let lz_str = "0000 0000 6100 0000 0200 6100";
    let compressed = compress_slice(test_data,&opt).expect("compression failed");
    assert_eq!(compressed,hex::decode(lz_str.replace(" ","")).unwrap());
}

#[test]
fn empty_and_single() {
    let compressed = compress_slice(&[],&STD_OPTIONS).expect("compression failed");
    assert_eq!(compressed,hex::decode("00000000FFFF").unwrap());
    let expanded = expand_slice(&compressed,&STD_OPTIONS).expect("expansion failed");
    assert!(expanded.is_empty());

    let compressed = compress_slice(b"A",&STD_OPTIONS).expect("compression failed");
    assert_eq!(compressed,hex::decode("000000004100").unwrap());
    let expanded = expand_slice(&compressed,&STD_OPTIONS).expect("expansion failed");
    assert_eq!(expanded,b"A".to_vec());
}

#[test]
fn literals_only() {
    // no byte repeats, so every triple is a literal
    let opt = Options { lookahead: 4, window: 8, ..STD_OPTIONS };
    let compressed = compress_slice(b"abcdefgh",&opt).expect("compression failed");
    assert_eq!(compressed.len(),8*Triple::SERIALIZED_SIZE);
    for chunk in compressed.chunks(Triple::SERIALIZED_SIZE) {
        assert_eq!(chunk[0..4],[0u8;4]);
    }
}

#[test]
fn long_runs_use_full_length() {
    let opt = Options { lookahead: 4, window: 8, ..STD_OPTIONS };
    let test_data = vec![b'z';40];
    let compressed = compress_slice(&test_data,&opt).expect("compression failed");
    let mut saw_full = false;
    for chunk in compressed.chunks(Triple::SERIALIZED_SIZE) {
        let buf: [u8;6] = chunk.try_into().unwrap();
        let token = Triple::from_bytes(&buf).expect("bad triple");
        assert!(token.length <= opt.lookahead - 1);
        assert_eq!(token.next,Symbol::Byte(b'z'));
        saw_full |= token.length == opt.lookahead - 1;
    }
    assert!(saw_full);
    let expanded = expand_slice(&compressed,&opt).expect("expansion failed");
    assert_eq!(expanded,test_data);
}

#[test]
fn invertibility() {
    let test_data = "I am Sam. Sam I am. I do not like this Sam I am.\n".as_bytes();
    let compressed = compress_slice(test_data,&STD_OPTIONS).expect("compression failed");
    let expanded = expand_slice(&compressed,&STD_OPTIONS).expect("expansion failed");
    assert_eq!(test_data.to_vec(),expanded);
}

#[test]
fn invertibility_small_windows() {
    let mut test_data = Vec::new();
    for i in 0..3000u32 {
        test_data.push((i * 7 % 13) as u8);
        if i % 5 == 0 {
            test_data.push((i % 251) as u8);
        }
    }
    for (n,m) in [(1,1),(2,3),(5,16),(16,5),(64,300)] {
        let opt = Options { lookahead: n, window: m, ..STD_OPTIONS };
        let compressed = compress_slice(&test_data,&opt).expect("compression failed");
        let expanded = expand_slice(&compressed,&opt).expect("expansion failed");
        assert_eq!(test_data,expanded);
    }
}

#[test]
fn deterministic() {
    let test_data = "It was the best of times, it was the worst of times.".as_bytes();
    let first = compress_slice(test_data,&STD_OPTIONS).expect("compression failed");
    let second = compress_slice(test_data,&STD_OPTIONS).expect("compression failed");
    assert_eq!(first,second);
}

#[test]
fn truncated_stream() {
    let compressed = compress_slice(b"hello hello",&STD_OPTIONS).expect("compression failed");
    let result = expand_slice(&compressed[0..compressed.len()-1],&STD_OPTIONS);
    assert!(matches!(result,Err(Error::DecodeTruncatedStream)));
}

#[test]
fn bad_options() {
    let opt = Options { lookahead: 0, ..STD_OPTIONS };
    assert!(matches!(compress_slice(b"abc",&opt),Err(Error::BadWindowSize)));
    let opt = Options { window: 40000, ..STD_OPTIONS };
    assert!(matches!(expand_slice(&[],&opt),Err(Error::BadWindowSize)));
}

#[test]
fn offsets() {
    let opt = Options { in_offset: 3, out_offset: 2, ..STD_OPTIONS };
    let compressed = compress_slice(b"xyzA",&opt).expect("compression failed");
    assert_eq!(compressed,hex::decode("0000000000004100").unwrap());
    let opt = Options { in_offset: 2, out_offset: 0, ..STD_OPTIONS };
    let expanded = expand_slice(&compressed,&opt).expect("expansion failed");
    assert_eq!(expanded,b"A".to_vec());
}

#[cfg(test)]
struct BrokenStream;

#[cfg(test)]
impl Read for BrokenStream {
    fn read(&mut self,_buf: &mut [u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::Other,"bad sector"))
    }
}

#[cfg(test)]
impl Write for BrokenStream {
    fn write(&mut self,_buf: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(std::io::ErrorKind::Other,"disk full"))
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
impl Seek for BrokenStream {
    fn seek(&mut self,_pos: SeekFrom) -> std::io::Result<u64> {
        Ok(0)
    }
}

#[test]
fn write_errors_surface() {
    let mut src = Cursor::new(b"abcabcabc".to_vec());
    let result = compress(&mut src,&mut BrokenStream,&STD_OPTIONS);
    assert!(matches!(result,Err(Error::StreamWrite(_))));
    let compressed = compress_slice(b"abcabcabc",&STD_OPTIONS).expect("compression failed");
    let mut src = Cursor::new(compressed);
    let result = expand(&mut src,&mut BrokenStream,&STD_OPTIONS);
    assert!(matches!(result,Err(Error::StreamWrite(_))));
}

#[test]
fn read_errors_surface() {
    let mut ans = Cursor::new(Vec::new());
    let result = compress(&mut BrokenStream,&mut ans,&STD_OPTIONS);
    assert!(matches!(result,Err(Error::StreamRead(_))));
    let mut ans = Cursor::new(Vec::new());
    let result = expand(&mut BrokenStream,&mut ans,&STD_OPTIONS);
    assert!(matches!(result,Err(Error::StreamRead(_))));
}
