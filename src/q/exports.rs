//! Functions exported to q.
//!
//! ```q
//! .hdf5.readData:`libqhdf5 2:(`hdf5readDataset;2)
//! .hdf5.readAttrData:`libqhdf5 2:(`hdf5readAttrDataset;3)
//! .hdf5.getDataShape:`libqhdf5 2:(`hdf5getDataShape;2)
//! .hdf5.getAttrShape:`libqhdf5 2:(`hdf5getAttrShape;3)
//! .hdf5.datasetType:`libqhdf5 2:(`hdf5datasetType;2)
//! .hdf5.isObject:`libqhdf5 2:(`hdf5isObject;2)
//! ```
#![allow(non_snake_case)]
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use libc::c_int;

use super::convert::{simple, to_k};
use super::{api, string_arg, Api, K};
use crate::reader;
use crate::types::QType;

/// Run `f` with the API of the host, returning errors and panics as q errors.
fn call<F>(name: &str, f: F) -> K
where
    F: FnOnce(&Api) -> Result<K, anyhow::Error>,
{
    match api::api() {
        Ok(api) => guard(api, name, f),
        Err(e) => {
            error!("{}: {}", name, e);
            ptr::null_mut()
        }
    }
}

fn guard<F>(api: &Api, name: &str, f: F) -> K
where
    F: FnOnce(&Api) -> Result<K, anyhow::Error>,
{
    match panic::catch_unwind(AssertUnwindSafe(|| f(api))) {
        Ok(Ok(x)) => x,
        Ok(Err(e)) => {
            warn!("{}: {:#}", name, e);
            unsafe { api.error(&e.to_string()) }
        }
        Err(_) => {
            error!("{}: panicked", name);
            unsafe { api.error("panic") }
        }
    }
}

unsafe fn shape(api: &Api, shape: &[usize]) -> K {
    let shape: Vec<i64> = shape.iter().map(|d| *d as i64).collect();
    simple(api, QType::Long, &shape)
}

unsafe fn read_dataset(api: &Api, fname: K, dname: K) -> Result<K, anyhow::Error> {
    let v = reader::read_dataset(string_arg(fname)?, &string_arg(dname)?)?;
    Ok(to_k(api, &v))
}

unsafe fn read_attribute(api: &Api, fname: K, oname: K, aname: K) -> Result<K, anyhow::Error> {
    let v = reader::read_attribute(
        string_arg(fname)?,
        &string_arg(oname)?,
        &string_arg(aname)?,
    )?;
    Ok(to_k(api, &v))
}

/// Read a dataset: `hdf5readDataset[file; dataset]`.
#[no_mangle]
pub unsafe extern "C" fn hdf5readDataset(fname: K, dname: K) -> K {
    call("hdf5readDataset", |api| read_dataset(api, fname, dname))
}

/// Read an attribute of a dataset or group: `hdf5readAttrDataset[file; object; attribute]`.
#[no_mangle]
pub unsafe extern "C" fn hdf5readAttrDataset(fname: K, oname: K, aname: K) -> K {
    call("hdf5readAttrDataset", |api| {
        read_attribute(api, fname, oname, aname)
    })
}

#[no_mangle]
pub unsafe extern "C" fn hdf5getDataShape(fname: K, dname: K) -> K {
    call("hdf5getDataShape", |api| {
        let s = reader::dataset_shape(string_arg(fname)?, &string_arg(dname)?)?;
        Ok(shape(api, &s))
    })
}

#[no_mangle]
pub unsafe extern "C" fn hdf5getAttrShape(fname: K, oname: K, aname: K) -> K {
    call("hdf5getAttrShape", |api| {
        let s = reader::attribute_shape(
            string_arg(fname)?,
            &string_arg(oname)?,
            &string_arg(aname)?,
        )?;
        Ok(shape(api, &s))
    })
}

/// Name of the q type `hdf5readDataset` returns, as a symbol.
#[no_mangle]
pub unsafe extern "C" fn hdf5datasetType(fname: K, dname: K) -> K {
    call("hdf5datasetType", |api| {
        let t = reader::dataset_qtype(string_arg(fname)?, &string_arg(dname)?)?;
        Ok((api.ks)(api.sym(t.name())))
    })
}

#[no_mangle]
pub unsafe extern "C" fn hdf5isObject(fname: K, oname: K) -> K {
    call("hdf5isObject", |api| {
        let e = reader::is_object(string_arg(fname)?, &string_arg(oname)?)?;
        Ok((api.kb)(e as c_int))
    })
}
