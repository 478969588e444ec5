//! Fixed- and variable-length strings.
//!
//! Fixed-length strings are read into one contiguous buffer of `size` bytes per point and cut at
//! the first NUL. Variable-length strings are read as pointers to buffers allocated by the HDF5
//! library, copied, and handed back to the library with `H5free_memory`.
use std::ffi::CStr;

use hdf5::types::TypeDescriptor;
use hdf5_sys::h5::H5free_memory;
use libc::{c_char, c_void};

use super::{memtype, Source};

pub fn read_fixed(
    src: &Source,
    desc: &TypeDescriptor,
    size: usize,
    member: Option<&str>,
) -> Result<Vec<String>, anyhow::Error> {
    ensure!(size > 0, "zero-sized string type");

    let buf = src.read_as::<u8>(&memtype(desc, member)?)?;

    Ok(buf
        .chunks_exact(size)
        .map(|s| {
            let end = s.iter().position(|b| *b == 0).unwrap_or(s.len());
            String::from_utf8_lossy(&s[..end]).into_owned()
        })
        .collect())
}

pub fn read_varlen(
    src: &Source,
    desc: &TypeDescriptor,
    member: Option<&str>,
) -> Result<Vec<String>, anyhow::Error> {
    let ptrs = src.read_as::<*mut c_char>(&memtype(desc, member)?)?;

    let strs = ptrs
        .iter()
        .map(|p| {
            if p.is_null() {
                String::new()
            } else {
                unsafe { CStr::from_ptr(*p) }.to_string_lossy().into_owned()
            }
        })
        .collect();

    hdf5::sync::sync(|| {
        for p in ptrs.iter().filter(|p| !p.is_null()) {
            unsafe { H5free_memory(*p as *mut c_void) };
        }
    });

    Ok(strs)
}
