//! Ring buffer for LZ type compression windows
//!
//! The cursor always sits on the oldest element.  Pushing overwrites the oldest
//! element and advances, so a window of fixed size slides by one in constant time.

pub struct RingBuffer<T: Copy> {
    buf: Vec<T>,
    pos: usize,
    n: usize
}

impl <T: Copy> RingBuffer<T> {
    /// Create a buffer of size `n` with every slot set to `fill`, `n` must not be 0
    pub fn create(fill: T,n: usize) -> Self {
        Self {
            buf: vec![fill;n],
            pos: 0,
            n
        }
    }
    /// fixed number of elements
    pub fn len(&self) -> usize {
        self.n
    }
    /// get absolute position of cursor + offset
    pub fn get_pos(&self,offset: usize) -> usize {
        (self.pos + offset) % self.n
    }
    /// get value at cursor + offset, offset 0 is the oldest
    pub fn get(&self,offset: usize) -> T {
        self.buf[self.get_pos(offset)]
    }
    /// set value at cursor + offset
    pub fn set(&mut self,offset: usize,val: T) {
        let abs = self.get_pos(offset);
        self.buf[abs] = val;
    }
    /// advance cursor by 1
    pub fn advance(&mut self) {
        self.pos = (self.pos + 1) % self.n;
    }
    /// Drop the oldest value and append `val` as the newest, returns the value dropped.
    pub fn push(&mut self,val: T) -> T {
        let old = self.buf[self.pos];
        self.buf[self.pos] = val;
        self.advance();
        old
    }
    /// Copy `count` values starting at cursor + offset, oldest first.
    pub fn copy_out(&self,offset: usize,count: usize) -> Vec<T> {
        (offset..offset+count).map(|i| self.get(i)).collect()
    }
}

#[test]
fn offset() {
    let mut ring: RingBuffer<u8> = RingBuffer::create(0,4);
    for _i in 0..5 {
        ring.advance();
    }
    assert_eq!(ring.get_pos(0),1);
    assert_eq!(ring.get_pos(4),1);
    assert_eq!(ring.get_pos(3),0);
}

#[test]
fn push_slides() {
    // four positions 0 1 2 3
    // after 6 pushes the cursor has wrapped once and sits on slot 2
    let mut ring: RingBuffer<u8> = RingBuffer::create(0,4);
    for val in 1..=6 {
        ring.push(val);
    }
    assert_eq!(ring.get_pos(0),2);
    assert_eq!(ring.copy_out(0,4),vec![3,4,5,6]);
    assert_eq!(ring.push(7),3);
    assert_eq!(ring.get(0),4);
    assert_eq!(ring.get(3),7);
}
