use crate::errors::{ErrorInner, Result};
use crate::input::{InputData, InputStream};
use crate::output::OutputStream;
use positioned_io::{RandomAccessFile, ReadAt};
use slog::{Drain, Logger};
use std::cmp;
use std::fs::File;
use std::io;
use std::io::Write;
use std::path::Path;

fn default_logger() -> Logger {
    slog::Logger::root(slog_stdlog::StdLog.fuse(), slog::o!())
}

/// Random-access input backed by a file on disk.
///
/// The length is captured when the input is constructed; the read position
/// lives in this struct, so the underlying OS file offset is never touched.
#[derive(Debug)]
pub struct FileInput {
    file: RandomAccessFile,
    len: u64,
    pos: u64,
    logger: Logger,
}

impl FileInput {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_logger(path, default_logger())
    }

    pub fn open_with_logger<P: AsRef<Path>>(path: P, logger: Logger) -> Result<Self> {
        Self::_open_with_logger(path.as_ref(), logger)
    }

    fn _open_with_logger(path: &Path, logger: Logger) -> Result<Self> {
        let path_str = path.display().to_string();
        let logger = logger.new(slog::o!("file" => path_str));
        let file = File::open(path).map_err(|source| ErrorInner::UnableToOpen {
            path: path.into(),
            source,
        })?;
        Self::with_logger(file, logger)
    }

    pub fn from_file(file: File) -> Result<Self> {
        Self::with_logger(file, default_logger())
    }

    pub fn with_logger(file: File, logger: Logger) -> Result<Self> {
        let len = file
            .metadata()
            .map_err(|source| ErrorInner::Length { source })?
            .len();
        let file = RandomAccessFile::try_new(file)?;
        Ok(Self {
            file,
            len,
            pos: 0,
            logger,
        })
    }
}

impl InputStream for FileInput {
    fn read(&mut self, dest: &mut [u8]) -> usize {
        match self.file.read_at(self.pos, dest) {
            Ok(n) => {
                self.pos += n as u64;
                n
            }
            Err(e) => {
                slog::warn!(self.logger, "read failed at offset {}: {}", self.pos, e);
                0
            }
        }
    }
}

impl InputData for FileInput {
    fn len(&self) -> u64 {
        self.len
    }

    fn seek(&mut self, offset: u64) {
        self.pos = cmp::min(offset, self.len);
    }

    fn tell(&self) -> u64 {
        self.pos
    }
}

/// Forward-only output backed by a file on disk.
///
/// There is no flush operation at this boundary; the file is closed when
/// the output is dropped.
pub struct FileOutput {
    file: File,
    logger: Logger,
}

impl FileOutput {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::create_with_logger(path, default_logger())
    }

    pub fn create_with_logger<P: AsRef<Path>>(path: P, logger: Logger) -> Result<Self> {
        Self::_create_with_logger(path.as_ref(), logger)
    }

    fn _create_with_logger(path: &Path, logger: Logger) -> Result<Self> {
        let path_str = path.display().to_string();
        let logger = logger.new(slog::o!("file" => path_str));
        let file = File::create(path).map_err(|source| ErrorInner::UnableToCreate {
            path: path.into(),
            source,
        })?;
        Ok(Self::with_logger(file, logger))
    }

    pub fn from_file(file: File) -> Self {
        Self::with_logger(file, default_logger())
    }

    pub fn with_logger(file: File, logger: Logger) -> Self {
        Self { file, logger }
    }

    pub fn into_inner(self) -> File {
        self.file
    }
}

impl OutputStream for FileOutput {
    fn write(&mut self, src: &[u8]) -> usize {
        loop {
            match self.file.write(src) {
                Ok(n) => return n,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    slog::warn!(self.logger, "write failed: {}", e);
                    return 0;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputStreamExt;
    use std::io::{Seek, SeekFrom};

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");

        let mut out = FileOutput::create(&path).unwrap();
        assert_eq!(out.write_full(b"hello world"), 11);
        drop(out);

        let mut input = FileInput::open(&path).unwrap();
        assert_eq!(input.len(), 11);
        assert_eq!(input.tell(), 0);

        let mut buf = [0; 5];
        assert_eq!(input.read(&mut buf), 5);
        assert_eq!(&buf, b"hello");
        assert_eq!(input.tell(), 5);
    }

    #[test]
    fn file_input_seek_and_clamp() {
        let mut std = tempfile::tempfile().unwrap();
        std.write_all(b"0123456789").unwrap();
        std.seek(SeekFrom::Start(0)).unwrap();

        let mut input = FileInput::from_file(std).unwrap();
        input.seek(6);
        assert_eq!(input.tell(), 6);
        let mut buf = [0; 8];
        assert_eq!(input.read(&mut buf), 4);
        assert_eq!(&buf[..4], b"6789");

        input.seek(1 << 40);
        assert_eq!(input.tell(), input.len());
        assert_eq!(input.read(&mut buf), 0);
    }

    #[test]
    fn file_output_appends_from_handle() {
        let std = tempfile::tempfile().unwrap();
        let mut readback = std.try_clone().unwrap();

        let mut out = FileOutput::from_file(std);
        assert_eq!(out.write_full(b"abc"), 3);
        assert_eq!(out.write_full(b"def"), 3);

        let mut contents = Vec::new();
        readback.seek(SeekFrom::Start(0)).unwrap();
        io::Read::read_to_end(&mut readback, &mut contents).unwrap();
        assert_eq!(contents, b"abcdef");
    }

    #[test]
    fn open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileInput::open(dir.path().join("nope")).unwrap_err();
        assert!(err.to_string().contains("unable to open"));
    }
}
