use std::io::{self, Read};

/// Where detection pulls its bytes from.
///
/// The detector never opens or closes a source; it reads a short probe for
/// the BOM and then everything that remains.
pub trait ByteSource {
    /// Read up to `n` bytes. Fewer are returned only at end of input.
    fn read_up_to(&mut self, n: usize) -> io::Result<Vec<u8>>;

    /// Append all remaining bytes to `buf`, returning how many were read.
    fn read_remaining(&mut self, buf: &mut Vec<u8>) -> io::Result<usize>;
}

impl<R: Read> ByteSource for R {
    fn read_up_to(&mut self, n: usize) -> io::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(n);
        // take() keeps reading through short reads until n bytes or EOF
        self.by_ref().take(n as u64).read_to_end(&mut buf)?;
        Ok(buf)
    }

    fn read_remaining(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        self.read_to_end(buf)
    }
}
