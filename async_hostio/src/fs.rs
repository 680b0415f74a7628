use crate::{AsyncInputStream, AsyncOutputStream};
use std::fs::File as StdFile;
use std::future::Future;
use std::mem;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::{cmp, io};
use tokio::task::JoinHandle;

/// File-backed stream that runs its blocking reads and writes on the tokio
/// blocking pool.
///
/// The stream offset lives in this struct and only advances by the bytes
/// actually delivered; the OS file offset is never used.
pub struct File {
    std: Arc<StdFile>,
    pos: u64,
    state: State,
}

impl File {
    pub fn new(f: StdFile) -> Self {
        Self::with_offset(f, 0)
    }

    pub fn with_offset(f: StdFile, pos: u64) -> Self {
        Self {
            std: Arc::new(f),
            pos,
            state: State::Idle(Vec::new()),
        }
    }

    /// Current offset, in bytes from the start of the file.
    pub fn offset(&self) -> u64 {
        self.pos
    }
}

enum State {
    Idle(Vec<u8>),
    Busy(JoinHandle<(Operation, Vec<u8>)>),
}

enum Operation {
    Read(usize),
    Write(usize),
}

impl AsyncInputStream for File {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, dest: &mut [u8]) -> Poll<usize> {
        let me = self.get_mut();

        loop {
            match me.state {
                State::Idle(ref mut buf) => {
                    let mut buf = mem::take(buf);
                    buf.clear();
                    buf.resize(dest.len(), 0);
                    let std = Arc::clone(&me.std);
                    let pos = me.pos;

                    me.state = State::Busy(tokio::task::spawn_blocking(move || {
                        let n = file_read_at(&std, &mut buf, pos).unwrap_or(0);
                        buf.truncate(n);
                        (Operation::Read(n), buf)
                    }));
                }
                State::Busy(ref mut handle) => {
                    let (op, buf) = match Pin::new(handle).poll(cx) {
                        Poll::Ready(Ok(done)) => done,
                        Poll::Ready(Err(_)) => {
                            me.state = State::Idle(Vec::new());
                            return Poll::Ready(0);
                        }
                        Poll::Pending => return Poll::Pending,
                    };

                    match op {
                        Operation::Read(n) => {
                            let n = cmp::min(n, dest.len());
                            dest[..n].copy_from_slice(&buf[..n]);
                            me.pos += n as u64;
                            me.state = State::Idle(buf);
                            return Poll::Ready(n);
                        }
                        Operation::Write(n) => {
                            // A write left over from an abandoned future
                            me.pos += n as u64;
                            me.state = State::Idle(buf);
                        }
                    }
                }
            }
        }
    }
}

impl AsyncOutputStream for File {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, src: &[u8]) -> Poll<usize> {
        let me = self.get_mut();

        loop {
            match me.state {
                State::Idle(ref mut buf) => {
                    let mut buf = mem::take(buf);
                    buf.clear();
                    buf.extend_from_slice(src);
                    let std = Arc::clone(&me.std);
                    let pos = me.pos;

                    me.state = State::Busy(tokio::task::spawn_blocking(move || {
                        let n = file_write_at(&std, &buf, pos).unwrap_or(0);
                        (Operation::Write(n), buf)
                    }));
                }
                State::Busy(ref mut handle) => {
                    let (op, buf) = match Pin::new(handle).poll(cx) {
                        Poll::Ready(Ok(done)) => done,
                        Poll::Ready(Err(_)) => {
                            me.state = State::Idle(Vec::new());
                            return Poll::Ready(0);
                        }
                        Poll::Pending => return Poll::Pending,
                    };

                    match op {
                        Operation::Write(n) => {
                            me.pos += n as u64;
                            me.state = State::Idle(buf);
                            return Poll::Ready(n);
                        }
                        Operation::Read(_) => {
                            // An abandoned read never advanced the offset;
                            // its bytes can be dropped
                            me.state = State::Idle(buf);
                        }
                    }
                }
            }
        }
    }
}

fn file_read_at(f: &StdFile, buf: &mut [u8], pos: u64) -> io::Result<usize> {
    #[cfg(unix)]
    return std::os::unix::fs::FileExt::read_at(f, buf, pos);
    #[cfg(windows)]
    return std::os::windows::fs::FileExt::seek_read(f, buf, pos);
}

fn file_write_at(f: &StdFile, buf: &[u8], pos: u64) -> io::Result<usize> {
    #[cfg(unix)]
    return std::os::unix::fs::FileExt::write_at(f, buf, pos);
    #[cfg(windows)]
    return std::os::windows::fs::FileExt::seek_write(f, buf, pos);
}
