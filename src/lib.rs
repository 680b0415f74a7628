//! Host-supplied I/O boundaries.
//!
//! A host application hands the SDK implementations of three small traits
//! ([`InputStream`], [`InputData`], [`OutputStream`]) and the SDK does all
//! of its I/O through them. Backends for files and memory buffers ship
//! here, along with adapters to and from `std::io`.

pub mod adapt;
pub mod errors;
pub mod fs;
pub mod input;
pub mod mem;
pub mod output;

pub use crate::errors::Error;
pub use crate::input::{InputData, InputStream, InputStreamExt};
pub use crate::mem::SliceInput;
pub use crate::output::{OutputStream, OutputStreamExt};
