use crate::errors::{ErrorInner, Result};
use crate::input::{InputData, InputStream};
use crate::output::OutputStream;
use std::cmp;
use std::io;
use std::io::{Read, Seek, SeekFrom, Write};

/// Adapts any [`io::Read`] into an [`InputStream`].
///
/// `ErrorKind::Interrupted` is retried. Any other error surfaces as a
/// zero-length read, which this boundary cannot distinguish from
/// end-of-data.
pub struct ReadStream<R> {
    inner: R,
}

impl<R> ReadStream<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> InputStream for ReadStream<R> {
    fn read(&mut self, dest: &mut [u8]) -> usize {
        loop {
            match self.inner.read(dest) {
                Ok(n) => return n,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => return 0,
            }
        }
    }
}

/// Adapts any [`io::Write`] into an [`OutputStream`].
///
/// Same error mapping as [`ReadStream`]: `Interrupted` is retried, anything
/// else is a zero-length write.
pub struct WriteStream<W> {
    inner: W,
}

impl<W> WriteStream<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> OutputStream for WriteStream<W> {
    fn write(&mut self, src: &[u8]) -> usize {
        loop {
            match self.inner.write(src) {
                Ok(n) => return n,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => return 0,
            }
        }
    }
}

/// Adapts an [`io::Read`] + [`io::Seek`] into an [`InputData`].
///
/// The total length is probed once, at construction. The read position is
/// tracked here and only pushed down to the underlying reader right before
/// a read, so `seek`/`tell` keep their contract even if the underlying
/// seek later fails.
pub struct SeekSource<R> {
    inner: R,
    len: u64,
    pos: u64,
    synced: bool,
}

impl<R: Read + Seek> SeekSource<R> {
    pub fn new(mut inner: R) -> Result<Self> {
        let len = inner
            .seek(SeekFrom::End(0))
            .map_err(|source| ErrorInner::Length { source })?;
        Ok(Self {
            inner,
            len,
            pos: 0,
            synced: false,
        })
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// The caller may move the underlying cursor through this reference;
    /// the next read re-seeks.
    pub fn get_mut(&mut self) -> &mut R {
        self.synced = false;
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Seek> InputStream for SeekSource<R> {
    fn read(&mut self, dest: &mut [u8]) -> usize {
        if !self.synced {
            if self.inner.seek(SeekFrom::Start(self.pos)).is_err() {
                return 0;
            }
            self.synced = true;
        }
        loop {
            match self.inner.read(dest) {
                Ok(n) => {
                    self.pos += n as u64;
                    return n;
                }
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(_) => return 0,
            }
        }
    }
}

impl<R: Read + Seek> InputData for SeekSource<R> {
    fn len(&self) -> u64 {
        self.len
    }

    fn seek(&mut self, offset: u64) {
        self.pos = cmp::min(offset, self.len);
        self.synced = false;
    }

    fn tell(&self) -> u64 {
        self.pos
    }
}

/// Adapts an [`InputStream`] into an [`io::Read`].
///
/// When the stream is an [`InputData`], [`io::Seek`] is available too.
/// Seeking past the end clamps to the end (and the returned position says
/// so), seeking before the start is `InvalidInput`.
pub struct StreamReader<S> {
    inner: S,
}

impl<S> StreamReader<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: InputStream> Read for StreamReader<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.inner.read(buf))
    }
}

impl<S: InputData> Seek for StreamReader<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => offset as i128,
            SeekFrom::End(delta) => self.inner.len() as i128 + delta as i128,
            SeekFrom::Current(delta) => self.inner.tell() as i128 + delta as i128,
        };
        if target < 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek before the start of the input",
            ));
        }
        let target = cmp::min(target, u64::MAX as i128) as u64;
        self.inner.seek(target);
        Ok(self.inner.tell())
    }
}

/// Adapts an [`OutputStream`] into an [`io::Write`].
///
/// `flush` is a no-op: the boundary has no flush operation. A stream that
/// stops making progress shows up as `Ok(0)`, which `write_all` turns into
/// `WriteZero`.
pub struct StreamWriter<S> {
    inner: S,
}

impl<S> StreamWriter<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: OutputStream> Write for StreamWriter<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.inner.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mem::SliceInput;

    struct InterruptedOnce {
        data: &'static [u8],
        hiccuped: bool,
    }

    impl Read for InterruptedOnce {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if !self.hiccuped {
                self.hiccuped = true;
                return Err(io::Error::new(io::ErrorKind::Interrupted, "try again"));
            }
            Read::read(&mut self.data, buf)
        }
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "boom"))
        }
    }

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "boom"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn read_stream_retries_interrupted() {
        let mut stream = ReadStream::new(InterruptedOnce {
            data: b"abc",
            hiccuped: false,
        });
        let mut buf = [0; 8];
        assert_eq!(stream.read(&mut buf), 3);
        assert_eq!(&buf[..3], b"abc");
    }

    #[test]
    fn read_stream_errors_become_zero() {
        let mut stream = ReadStream::new(Broken);
        let mut buf = [0; 8];
        assert_eq!(stream.read(&mut buf), 0);
    }

    #[test]
    fn write_stream_round_trip() {
        let mut stream = WriteStream::new(Vec::new());
        assert_eq!(stream.write(b"hello"), 5);
        assert_eq!(stream.into_inner(), b"hello");
    }

    #[test]
    fn write_stream_errors_become_zero() {
        let mut stream = WriteStream::new(Broken);
        assert_eq!(stream.write(b"hello"), 0);
    }

    #[test]
    fn seek_source_contract() {
        let mut source = SeekSource::new(io::Cursor::new(b"0123456789".to_vec())).unwrap();
        assert_eq!(source.len(), 10);
        assert_eq!(source.tell(), 0);

        source.seek(4);
        assert_eq!(source.tell(), 4);
        let mut buf = [0; 3];
        assert_eq!(source.read(&mut buf), 3);
        assert_eq!(&buf, b"456");
        assert_eq!(source.tell(), 7);

        source.seek(99);
        assert_eq!(source.tell(), 10);
        assert_eq!(source.read(&mut buf), 0);

        source.seek(0);
        assert_eq!(source.read(&mut buf), 3);
        assert_eq!(&buf, b"012");
    }

    #[test]
    fn stream_reader_reads_and_seeks() {
        let mut reader = StreamReader::new(SliceInput::new(&b"hello world"[..]));

        let mut all = Vec::new();
        reader.read_to_end(&mut all).unwrap();
        assert_eq!(all, b"hello world");

        assert_eq!(reader.seek(SeekFrom::Start(6)).unwrap(), 6);
        let mut buf = [0; 5];
        reader.read_exact(&mut buf).unwrap();
        assert_eq!(&buf, b"world");

        assert_eq!(reader.seek(SeekFrom::Current(-5)).unwrap(), 6);
        assert_eq!(reader.seek(SeekFrom::End(-1)).unwrap(), 10);

        // Past the end clamps rather than erroring
        assert_eq!(reader.seek(SeekFrom::Start(500)).unwrap(), 11);

        let err = reader.seek(SeekFrom::Current(-100)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn stream_writer_write_all() {
        let mut writer = StreamWriter::new(Vec::new());
        writer.write_all(b"through the seam").unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.into_inner(), b"through the seam");
    }

    #[test]
    fn stream_writer_reports_write_zero() {
        let mut full = [0u8; 4];
        let mut writer = StreamWriter::new(&mut full[..]);
        let err = writer.write_all(b"too much data").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WriteZero);
    }
}
