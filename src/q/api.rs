//! The subset of the kdb+ C API used by the exports.
#![allow(non_snake_case)]
use std::ffi::CString;
use std::sync::OnceLock;

use libc::{c_char, c_int, c_void};

use super::K;

/// Function pointers into the kdb+ C API.
pub struct Api {
    pub ktn: unsafe extern "C" fn(c_int, i64) -> K,
    pub kpn: unsafe extern "C" fn(*const c_char, i64) -> K,
    pub ka: unsafe extern "C" fn(c_int) -> K,
    pub kb: unsafe extern "C" fn(c_int) -> K,
    pub ks: unsafe extern "C" fn(*const c_char) -> K,
    pub jk: unsafe extern "C" fn(*mut K, K) -> K,
    pub js: unsafe extern "C" fn(*mut K, *const c_char) -> K,
    pub ss: unsafe extern "C" fn(*const c_char) -> *const c_char,
    pub krr: unsafe extern "C" fn(*const c_char) -> K,
    pub xD: unsafe extern "C" fn(K, K) -> K,
    pub xT: unsafe extern "C" fn(K) -> K,
}

static API: OnceLock<Result<Api, String>> = OnceLock::new();

macro_rules! sym {
    ($name:ident) => {{
        let p = libc::dlsym(
            libc::RTLD_DEFAULT,
            concat!(stringify!($name), "\0").as_ptr() as *const c_char,
        );
        if p.is_null() {
            return Err(format!("missing kdb+ symbol: {}", stringify!($name)));
        }
        std::mem::transmute::<*mut c_void, _>(p)
    }};
}

impl Api {
    /// Look up the API in the running process.
    unsafe fn load() -> Result<Api, String> {
        Ok(Api {
            ktn: sym!(ktn),
            kpn: sym!(kpn),
            ka: sym!(ka),
            kb: sym!(kb),
            ks: sym!(ks),
            jk: sym!(jk),
            js: sym!(js),
            ss: sym!(ss),
            krr: sym!(krr),
            xD: sym!(xD),
            xT: sym!(xT),
        })
    }

    /// Intern `s` as a symbol. Interior NULs are dropped.
    pub unsafe fn sym(&self, s: &str) -> *const c_char {
        let c = CString::new(s.replace('\0', "")).unwrap_or_default();
        (self.ss)(c.as_ptr())
    }

    /// A q error object signalling `msg`.
    pub unsafe fn error(&self, msg: &str) -> K {
        (self.krr)(self.sym(msg))
    }
}

/// The kdb+ API of the hosting q process, resolved on first use.
pub fn api() -> Result<&'static Api, anyhow::Error> {
    API.get_or_init(|| unsafe { Api::load() })
        .as_ref()
        .map_err(|e| anyhow!("{}", e))
}
