//! Wrappers for using qhdf5 from kdb+/q.
//!
//! Load the shared library into q with `2:`, e.g.:
//!
//! ```q
//! readDataset:`libqhdf5 2:(`hdf5readDataset;2)
//! readDataset["data.h5";"trades"]
//! ```
//!
//! The kdb+ C API is provided by the q executable itself. The few functions used here are looked
//! up in the running process on first use, see [`api`].
#![allow(non_camel_case_types)]
use std::ffi::CStr;
use std::ptr::addr_of_mut;
use std::slice;

use libc::c_char;

pub mod api;
pub mod convert;
pub mod exports;
#[cfg(test)]
mod stub;

pub use api::Api;

/// Header of a kdb+ object, as laid out in `k.h`.
///
/// The 8 bytes following `r` hold the value of an atom, or the length of a vector whose elements
/// follow directly after.
#[repr(C)]
pub struct k0 {
    pub m: i8,
    pub a: i8,
    pub t: i8,
    pub u: u8,
    pub r: i32,
    pub n: i64,
    g0: [u8; 0],
}

pub type K = *mut k0;

/// Pointer to the first element of vector `x`.
pub unsafe fn data<T>(x: K) -> *mut T {
    addr_of_mut!((*x).g0) as *mut T
}

/// Pointer to the value of atom `x`.
pub unsafe fn atom<T>(x: K) -> *mut T {
    addr_of_mut!((*x).n) as *mut T
}

/// Decode a name passed from q as a char vector, a char atom or a symbol.
pub unsafe fn string_arg(x: K) -> Result<String, anyhow::Error> {
    ensure!(!x.is_null(), "type");

    match (*x).t {
        10 => {
            let s = slice::from_raw_parts(data::<u8>(x), (*x).n as usize);
            Ok(String::from_utf8_lossy(s).into_owned())
        }
        -10 => Ok(String::from_utf8_lossy(&[*atom::<u8>(x)]).into_owned()),
        -11 => {
            let s = *atom::<*const c_char>(x);
            ensure!(!s.is_null(), "type");
            Ok(CStr::from_ptr(s).to_string_lossy().into_owned())
        }
        _ => Err(anyhow!("type")),
    }
}
