//! Conversion of [`Value`]s into q objects.
//!
//! Arrays of rank 0 become atoms, rank 1 simple vectors and higher ranks nested general lists
//! whose innermost level is a simple vector. Strings become char vectors. Tables become a flipped
//! dictionary of member names to columns.
use std::ops::Range;
use std::ptr;

use libc::{c_char, c_int};

use super::{atom, data, Api, K};
use crate::types::QType;
use crate::value::{Column, Value};

pub unsafe fn to_k(api: &Api, v: &Value) -> K {
    match v {
        Value::Array { shape, column } => array(api, column, shape, 0),
        Value::Table(cols) => table(api, cols),
    }
}

unsafe fn array(api: &Api, col: &Column, shape: &[usize], offset: usize) -> K {
    match shape {
        // scalar dataspace, or null dataspace without any value
        [] if offset < col.len() => scalar(api, col, offset),
        [] => vector(api, col, 0..0),
        [n] => vector(api, col, offset..offset + n),
        [n, inner @ ..] => {
            let stride: usize = inner.iter().product();
            let mut l = (api.ktn)(QType::Mixed.code() as c_int, 0);

            for i in 0..*n {
                (api.jk)(&mut l, array(api, col, inner, offset + i * stride));
            }

            l
        }
    }
}

pub unsafe fn simple<T: Copy>(api: &Api, t: QType, v: &[T]) -> K {
    let x = (api.ktn)(t.code() as c_int, v.len() as i64);
    ptr::copy_nonoverlapping(v.as_ptr(), data::<T>(x), v.len());
    x
}

unsafe fn new_atom<T: Copy>(api: &Api, t: QType, v: T) -> K {
    let x = (api.ka)(-(t.code() as c_int));
    ptr::write(atom::<T>(x), v);
    x
}

unsafe fn chars(api: &Api, s: &str) -> K {
    (api.kpn)(s.as_ptr() as *const c_char, s.len() as i64)
}

unsafe fn scalar(api: &Api, col: &Column, i: usize) -> K {
    use Column::*;

    match col {
        Boolean(v) => (api.kb)(v[i] as c_int),
        Byte(v) => new_atom(api, QType::Byte, v[i]),
        Short(v) => new_atom(api, QType::Short, v[i]),
        Int(v) => new_atom(api, QType::Int, v[i]),
        Long(v) => new_atom(api, QType::Long, v[i]),
        Real(v) => new_atom(api, QType::Real, v[i]),
        Float(v) => new_atom(api, QType::Float, v[i]),
        Symbol(v) => (api.ks)(api.sym(&v[i])),
        Text(v) => chars(api, &v[i]),
    }
}

pub unsafe fn vector(api: &Api, col: &Column, r: Range<usize>) -> K {
    use Column::*;

    match col {
        Boolean(v) => simple(api, QType::Boolean, &v[r]),
        Byte(v) => simple(api, QType::Byte, &v[r]),
        Short(v) => simple(api, QType::Short, &v[r]),
        Int(v) => simple(api, QType::Int, &v[r]),
        Long(v) => simple(api, QType::Long, &v[r]),
        Real(v) => simple(api, QType::Real, &v[r]),
        Float(v) => simple(api, QType::Float, &v[r]),
        Symbol(v) => {
            let mut x = (api.ktn)(QType::Symbol.code() as c_int, 0);
            for s in &v[r] {
                (api.js)(&mut x, api.sym(s));
            }
            x
        }
        Text(v) => {
            let mut x = (api.ktn)(QType::Mixed.code() as c_int, 0);
            for s in &v[r] {
                (api.jk)(&mut x, chars(api, s));
            }
            x
        }
    }
}

unsafe fn table(api: &Api, cols: &[(String, Column)]) -> K {
    let mut keys = (api.ktn)(QType::Symbol.code() as c_int, 0);
    let mut vals = (api.ktn)(QType::Mixed.code() as c_int, 0);

    for (name, col) in cols {
        (api.js)(&mut keys, api.sym(name));
        (api.jk)(&mut vals, vector(api, col, 0..col.len()));
    }

    (api.xT)((api.xD)(keys, vals))
}
