//! A minimal stand-in for the kdb+ C API, for testing without a q process.
//!
//! Objects are allocated with `calloc` and never freed.
use std::ffi::{CStr, CString};
use std::mem::size_of;
use std::ptr;
use std::slice;

use libc::{c_char, c_int, c_void};

use super::{atom, data, k0, Api, K};

fn elem_size(t: i8) -> usize {
    match t {
        1 | 4 | 10 => 1,
        5 => 2,
        6 | 8 => 4,
        _ => 8,
    }
}

unsafe extern "C" fn ktn(t: c_int, n: i64) -> K {
    let sz = size_of::<k0>() + elem_size(t as i8) * n.max(1) as usize;
    let x = libc::calloc(1, sz) as K;
    (*x).t = t as i8;
    (*x).n = n;
    x
}

unsafe extern "C" fn ka(t: c_int) -> K {
    let x = libc::calloc(1, size_of::<k0>()) as K;
    (*x).t = t as i8;
    x
}

unsafe extern "C" fn kb(b: c_int) -> K {
    let x = ka(-1);
    *atom::<u8>(x) = b as u8;
    x
}

unsafe extern "C" fn ks(s: *const c_char) -> K {
    let x = ka(-11);
    *atom::<*const c_char>(x) = s;
    x
}

unsafe extern "C" fn kpn(s: *const c_char, n: i64) -> K {
    let x = ktn(10, n);
    ptr::copy_nonoverlapping(s as *const u8, data::<u8>(x), n as usize);
    x
}

unsafe fn append<T>(x: *mut K, v: T) -> K {
    let n = (**x).n as usize;
    let sz = size_of::<k0>() + (n + 1) * size_of::<T>();
    *x = libc::realloc(*x as *mut c_void, sz) as K;
    ptr::write(data::<T>(*x).add(n), v);
    (**x).n += 1;
    *x
}

unsafe extern "C" fn jk(x: *mut K, y: K) -> K {
    append(x, y)
}

unsafe extern "C" fn js(x: *mut K, s: *const c_char) -> K {
    append(x, s)
}

unsafe extern "C" fn ss(s: *const c_char) -> *const c_char {
    CStr::from_ptr(s).to_owned().into_raw()
}

unsafe extern "C" fn krr(s: *const c_char) -> K {
    let x = ka(-128);
    *atom::<*const c_char>(x) = s;
    x
}

unsafe extern "C" fn x_d(k: K, v: K) -> K {
    let mut d = ktn(0, 0);
    jk(&mut d, k);
    jk(&mut d, v);
    (*d).t = 99;
    d
}

unsafe extern "C" fn x_t(d: K) -> K {
    let x = ka(98);
    *atom::<K>(x) = d;
    x
}

static API: Api = Api {
    ktn,
    kpn,
    ka,
    kb,
    ks,
    jk,
    js,
    ss,
    krr,
    xD: x_d,
    xT: x_t,
};

pub fn api() -> &'static Api {
    &API
}

/// A decoded q object.
#[derive(Debug, PartialEq)]
pub enum Q {
    /// Atom type and value (floats as their bits).
    Atom(i8, i64),
    Sym(String),
    Chars(String),
    Bool(Vec<bool>),
    Byte(Vec<u8>),
    Short(Vec<i16>),
    Int(Vec<i32>),
    Long(Vec<i64>),
    Real(Vec<f32>),
    Float(Vec<f64>),
    Syms(Vec<String>),
    List(Vec<Q>),
    Table(Vec<String>, Vec<Q>),
    Error(String),
}

unsafe fn items<T: Copy>(x: K) -> Vec<T> {
    slice::from_raw_parts(data::<T>(x), (*x).n as usize).to_vec()
}

unsafe fn cstr(s: *const c_char) -> String {
    CStr::from_ptr(s).to_string_lossy().into_owned()
}

pub unsafe fn decode(x: K) -> Q {
    assert!(!x.is_null());

    match (*x).t {
        -128 => Q::Error(cstr(*atom::<*const c_char>(x))),
        -11 => Q::Sym(cstr(*atom::<*const c_char>(x))),
        -1 | -4 => Q::Atom((*x).t, *atom::<u8>(x) as i64),
        -5 => Q::Atom(-5, *atom::<i16>(x) as i64),
        -6 => Q::Atom(-6, *atom::<i32>(x) as i64),
        -8 => Q::Atom(-8, (*atom::<f32>(x)).to_bits() as i64),
        -9 => Q::Atom(-9, (*atom::<f64>(x)).to_bits() as i64),
        t if t < 0 => Q::Atom(t, *atom::<i64>(x)),
        0 => Q::List(items::<K>(x).into_iter().map(|y| decode(y)).collect()),
        1 => Q::Bool(items::<u8>(x).into_iter().map(|b| b != 0).collect()),
        4 => Q::Byte(items(x)),
        5 => Q::Short(items(x)),
        6 => Q::Int(items(x)),
        7 => Q::Long(items(x)),
        8 => Q::Real(items(x)),
        9 => Q::Float(items(x)),
        10 => Q::Chars(String::from_utf8_lossy(&items::<u8>(x)).into_owned()),
        11 => Q::Syms(items::<*const c_char>(x).into_iter().map(|s| cstr(s)).collect()),
        98 => {
            let d = *atom::<K>(x);
            let kv = items::<K>(d);
            let keys = match decode(kv[0]) {
                Q::Syms(s) => s,
                q => panic!("table keys: {:?}", q),
            };
            let vals = match decode(kv[1]) {
                Q::List(l) => l,
                q => panic!("table columns: {:?}", q),
            };
            Q::Table(keys, vals)
        }
        t => panic!("unexpected type: {}", t),
    }
}

/// A char vector holding `s`, as q would pass it in.
pub fn chars(s: &str) -> K {
    unsafe { kpn(s.as_ptr() as *const c_char, s.len() as i64) }
}

/// A symbol atom, as q would pass it in.
pub fn symbol(s: &str) -> K {
    let c = CString::new(s).unwrap();
    unsafe { ks(ss(c.as_ptr())) }
}
