use std::cmp::min;
use std::io::{Read, Write};

/// A reader that yields the given chunks of data one read call at a time.
pub struct MockReader {
    pub data: Vec<Vec<u8>>,
}

impl MockReader {
    pub fn from_strs(data: Vec<&str>) -> MockReader {
        MockReader { data: data.into_iter().map(|s| s.as_bytes().to_vec()).collect() }
    }
}

impl Read for MockReader {
    fn read(&mut self, mut buf: &mut [u8]) -> std::io::Result<usize> {
        if self.data.is_empty() {
            return Ok(0);
        }

        let next = self.data.first_mut().unwrap();

        let amount = min(buf.len(), next.len());
        let to_read: Vec<u8> = next.drain(0..amount).collect();
        buf.write(&to_read).unwrap();

        if next.is_empty() {
            self.data.remove(0);
        }

        Ok(amount)
    }
}
