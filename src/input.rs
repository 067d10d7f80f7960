use std::io::{self, BufRead, BufReader, Read};

use anyhow::{Context, Result};

/// A line-oriented reader that keeps each line's terminator.
pub struct LineReader<R> {
    rdr: R,
    buf: Vec<u8>,
}

impl LineReader<BufReader<io::Stdin>> {
    /// Read from the process's standard input.
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()))
    }
}

impl<R: BufRead> LineReader<R> {
    pub fn new(rdr: R) -> Self {
        Self {
            rdr,
            buf: Vec::with_capacity(1024),
        }
    }

    /// Call `f` with every line, terminator included when present.
    ///
    /// The final line may lack a terminator. A read error stops the loop
    /// after any bytes read before it have been passed to `f`.
    pub fn for_byte_line<F>(&mut self, mut f: F) -> Result<()>
    where
        F: FnMut(&[u8]) -> Result<()>,
    {
        loop {
            self.buf.clear();
            let read = self.rdr.read_until(b'\n', &mut self.buf);
            if !self.buf.is_empty() {
                f(&self.buf)?;
            }
            match read {
                Ok(0) => break,
                Ok(_) => continue,
                Err(err) => return Err(err).context("failed to read line"),
            }
        }
        Ok(())
    }
}

impl<R: Read> LineReader<BufReader<R>> {
    /// Wrap an unbuffered reader.
    pub fn from_reader(rdr: R) -> Self {
        Self::new(BufReader::new(rdr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(input: &[u8]) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        LineReader::new(input)
            .for_byte_line(|line| {
                out.push(line.to_vec());
                Ok(())
            })
            .unwrap();
        out
    }

    #[test]
    fn keeps_terminators() {
        assert_eq!(
            lines(b"a\nb\r\nc"),
            vec![b"a\n".to_vec(), b"b\r\n".to_vec(), b"c".to_vec()]
        );
    }

    #[test]
    fn empty_input_has_no_lines() {
        assert!(lines(b"").is_empty());
    }

    #[test]
    fn blank_lines_are_kept() {
        assert_eq!(lines(b"\n\n"), vec![b"\n".to_vec(), b"\n".to_vec()]);
    }

    struct FailAfter<'a> {
        data: &'a [u8],
    }

    impl Read for FailAfter<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.data.is_empty() {
                return Err(io::Error::other("boom"));
            }
            self.data.read(buf)
        }
    }

    #[test]
    fn read_error_after_partial_line() {
        let mut seen = Vec::new();
        let err = LineReader::from_reader(FailAfter { data: b"ok\npart" })
            .for_byte_line(|line| {
                seen.push(line.to_vec());
                Ok(())
            })
            .unwrap_err();
        assert_eq!(seen, vec![b"ok\n".to_vec(), b"part".to_vec()]);
        assert!(format!("{err:#}").contains("boom"));
    }

    #[test]
    fn callback_error_stops_reading() {
        let mut count = 0;
        let result = LineReader::new(&b"a\nb\nc\n"[..]).for_byte_line(|_| {
            count += 1;
            anyhow::bail!("stop")
        });
        assert!(result.is_err());
        assert_eq!(count, 1);
    }
}
