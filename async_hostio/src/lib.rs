pub mod fs;

use std::future::Future;
use std::ops::DerefMut;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Asynchronous version of the host-supplied readable stream.
///
/// Same contract as the synchronous trait: the resolved count is in
/// `0..=dest.len()`, short reads are legal, and there is no separate
/// end-of-stream or error signal.
pub trait AsyncInputStream {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, dest: &mut [u8]) -> Poll<usize>;
}

/// Asynchronous version of the host-supplied writable stream.
pub trait AsyncOutputStream {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, src: &[u8]) -> Poll<usize>;
}

pub trait AsyncInputStreamExt: AsyncInputStream {
    fn read<'a>(&'a mut self, dest: &'a mut [u8]) -> Read<'a, Self>
    where
        Self: Unpin,
    {
        Read::new(self, dest)
    }
}

impl<S: ?Sized + AsyncInputStream> AsyncInputStreamExt for S {}

pub trait AsyncOutputStreamExt: AsyncOutputStream {
    fn write<'a>(&'a mut self, src: &'a [u8]) -> Write<'a, Self>
    where
        Self: Unpin,
    {
        Write::new(self, src)
    }
}

impl<S: ?Sized + AsyncOutputStream> AsyncOutputStreamExt for S {}

/// Future for the [`read`](AsyncInputStreamExt::read) method.
#[derive(Debug)]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Read<'a, S: ?Sized> {
    stream: &'a mut S,
    dest: &'a mut [u8],
}

impl<S: ?Sized + Unpin> Unpin for Read<'_, S> {}

impl<'a, S: AsyncInputStream + ?Sized + Unpin> Read<'a, S> {
    fn new(stream: &'a mut S, dest: &'a mut [u8]) -> Self {
        Self { stream, dest }
    }
}

impl<S: AsyncInputStream + ?Sized + Unpin> Future for Read<'_, S> {
    type Output = usize;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        Pin::new(&mut this.stream).poll_read(cx, this.dest)
    }
}

/// Future for the [`write`](AsyncOutputStreamExt::write) method.
#[derive(Debug)]
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Write<'a, S: ?Sized> {
    stream: &'a mut S,
    src: &'a [u8],
}

impl<S: ?Sized + Unpin> Unpin for Write<'_, S> {}

impl<'a, S: AsyncOutputStream + ?Sized + Unpin> Write<'a, S> {
    fn new(stream: &'a mut S, src: &'a [u8]) -> Self {
        Self { stream, src }
    }
}

impl<S: AsyncOutputStream + ?Sized + Unpin> Future for Write<'_, S> {
    type Output = usize;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        Pin::new(&mut this.stream).poll_write(cx, this.src)
    }
}

macro_rules! deref_async_read {
    () => {
        fn poll_read(
            mut self: Pin<&mut Self>,
            cx: &mut Context<'_>,
            dest: &mut [u8],
        ) -> Poll<usize> {
            Pin::new(&mut **self).poll_read(cx, dest)
        }
    };
}

impl<T: ?Sized + AsyncInputStream + Unpin> AsyncInputStream for Box<T> {
    deref_async_read!();
}

impl<T: ?Sized + AsyncInputStream + Unpin> AsyncInputStream for &mut T {
    deref_async_read!();
}

impl<P> AsyncInputStream for Pin<P>
where
    P: DerefMut + Unpin,
    P::Target: AsyncInputStream,
{
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, dest: &mut [u8]) -> Poll<usize> {
        self.get_mut().as_mut().poll_read(cx, dest)
    }
}

macro_rules! deref_async_write {
    () => {
        fn poll_write(mut self: Pin<&mut Self>, cx: &mut Context<'_>, src: &[u8]) -> Poll<usize> {
            Pin::new(&mut **self).poll_write(cx, src)
        }
    };
}

impl<T: ?Sized + AsyncOutputStream + Unpin> AsyncOutputStream for Box<T> {
    deref_async_write!();
}

impl<T: ?Sized + AsyncOutputStream + Unpin> AsyncOutputStream for &mut T {
    deref_async_write!();
}

impl<P> AsyncOutputStream for Pin<P>
where
    P: DerefMut + Unpin,
    P::Target: AsyncOutputStream,
{
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, src: &[u8]) -> Poll<usize> {
        self.get_mut().as_mut().poll_write(cx, src)
    }
}
