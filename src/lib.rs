//! # QHDF5
//!
//! Read HDF5 datasets and attributes into kdb+/q.
//!
//! The datatype of a dataset or attribute decides what it is read as: numeric, boolean, enum and
//! string types become a single [column](value::Column), compound types become a table with one
//! column per member. Strings may be of fixed or variable length.
//!
//! The library is meant to be loaded into q as a shared object (see [`q`]), but the reading
//! itself does not depend on q:
//!
//! ```no_run
//! use qhdf5::prelude::*;
//!
//! let v = read_dataset("tests/data/trades.h5", "trades").unwrap();
//! if let Value::Table(cols) = v {
//!     for (name, col) in cols {
//!         println!("{}: {} values", name, col.len());
//!     }
//! }
//! ```

#[macro_use]
extern crate anyhow;

#[macro_use]
extern crate log;

pub mod reader;
pub mod types;
pub mod value;

#[cfg(feature = "q")]
pub mod q;

pub mod prelude {
    pub use super::reader::{
        attribute_shape, dataset_qtype, dataset_shape, is_object, read_attribute, read_dataset,
    };
    pub use super::types::QType;
    pub use super::value::{Column, Value};
}
