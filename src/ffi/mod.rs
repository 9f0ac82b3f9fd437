//! C ABI used by the mobile host.
//!
//! Every call takes and returns UTF-8 JSON or plain C strings. A handle owns
//! one [`Ledger`] plus the [`Config`] used to render amounts; the host must not
//! call into the same handle from two threads at once. Failures return a
//! non-zero status and leave details in a thread-local slot readable through
//! [`ffi_last_error_message`].

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::ptr;
use std::sync::OnceLock;

use thiserror::Error;

use crate::config::Config;
use crate::core::services::SummaryService;
use crate::currency;
use crate::domain::CategoryId;
use crate::errors::ValidationError;
use crate::ledger::{Ledger, LedgerEvent, LedgerQuery};
use crate::source::Snapshot;

/// Semantic version of the Rust core (mirrors `Cargo.toml`).
pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");
/// Semantic version of the FFI surface. Bumps when ABI/contract changes.
pub const FFI_VERSION: &str = "1.0.0";

/// Status codes returned by every fallible entry point.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiStatus {
    Ok = 0,
    Validation = 1,
    Serialization = 2,
    InvalidArgument = 3,
    Internal = 5,
}

impl From<FfiStatus> for i32 {
    fn from(value: FfiStatus) -> Self {
        value as i32
    }
}

#[derive(Debug, Error)]
enum FfiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("invalid JSON: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("invalid argument: {0}")]
    Argument(&'static str),
}

impl FfiError {
    fn status(&self) -> FfiStatus {
        match self {
            FfiError::Validation(_) => FfiStatus::Validation,
            FfiError::Serde(_) => FfiStatus::Serialization,
            FfiError::Argument(_) => FfiStatus::InvalidArgument,
        }
    }
}

/// Opaque ledger handle handed to the host.
pub struct LedgerHandle {
    ledger: Ledger,
    config: Config,
}

thread_local! {
    static LAST_ERROR: RefCell<Option<(FfiStatus, String)>> = const { RefCell::new(None) };
}

fn set_last_error(status: FfiStatus, message: String) {
    tracing::warn!(status = ?status, %message, "ffi call failed");
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some((status, message)));
}

fn clear_last_error() {
    LAST_ERROR.with(|slot| *slot.borrow_mut() = None);
}

fn guard<F>(body: F) -> i32
where
    F: FnOnce() -> Result<(), FfiError>,
{
    clear_last_error();
    match catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(())) => FfiStatus::Ok.into(),
        Ok(Err(err)) => {
            let status = err.status();
            set_last_error(status, err.to_string());
            status.into()
        }
        Err(_) => {
            set_last_error(FfiStatus::Internal, "panic inside ledger core".into());
            FfiStatus::Internal.into()
        }
    }
}

unsafe fn read_str<'a>(ptr: *const c_char, what: &'static str) -> Result<&'a str, FfiError> {
    if ptr.is_null() {
        return Err(FfiError::Argument(what));
    }
    CStr::from_ptr(ptr).to_str().map_err(|_| FfiError::Argument(what))
}

unsafe fn read_optional_str<'a>(
    ptr: *const c_char,
    what: &'static str,
) -> Result<Option<&'a str>, FfiError> {
    if ptr.is_null() {
        Ok(None)
    } else {
        read_str(ptr, what).map(Some)
    }
}

unsafe fn handle_mut<'a>(handle: *mut LedgerHandle) -> Result<&'a mut LedgerHandle, FfiError> {
    handle.as_mut().ok_or(FfiError::Argument("handle"))
}

unsafe fn write_out(out: *mut *mut c_char, text: String) -> Result<(), FfiError> {
    if out.is_null() {
        return Err(FfiError::Argument("output pointer"));
    }
    let c_text = CString::new(text).map_err(|_| FfiError::Argument("interior NUL in output"))?;
    *out = c_text.into_raw();
    Ok(())
}

/// Returns the core (Rust) semantic version as a C string.
#[no_mangle]
pub extern "C" fn ffi_core_version() -> *const c_char {
    static CORE: OnceLock<CString> = OnceLock::new();
    CORE.get_or_init(|| CString::new(CORE_VERSION).expect("static core version"))
        .as_ptr()
}

/// Returns the FFI interface semantic version as a C string.
#[no_mangle]
pub extern "C" fn ffi_version() -> *const c_char {
    static FFI: OnceLock<CString> = OnceLock::new();
    FFI.get_or_init(|| CString::new(FFI_VERSION).expect("static ffi version"))
        .as_ptr()
}

/// Creates an empty ledger. `config_json` may be null to use defaults.
///
/// # Safety
/// `config_json` must be null or a valid NUL-terminated string and
/// `out_handle` must be writable.
#[no_mangle]
pub unsafe extern "C" fn ffi_ledger_new(
    config_json: *const c_char,
    out_handle: *mut *mut LedgerHandle,
) -> i32 {
    guard(|| {
        if out_handle.is_null() {
            return Err(FfiError::Argument("output handle"));
        }
        let config: Config = match read_optional_str(config_json, "config")? {
            Some(json) => serde_json::from_str(json)?,
            None => Config::default(),
        };
        let handle = Box::new(LedgerHandle {
            ledger: config.new_ledger(),
            config,
        });
        *out_handle = Box::into_raw(handle);
        Ok(())
    })
}

/// Releases a handle created by [`ffi_ledger_new`]. Null is ignored.
///
/// # Safety
/// `handle` must come from [`ffi_ledger_new`] and must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn ffi_ledger_free(handle: *mut LedgerHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// Replaces the ledger with `{"categories": [...], "transactions": [...]}`.
///
/// # Safety
/// `handle` must be live and `snapshot_json` a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn ffi_ledger_load(
    handle: *mut LedgerHandle,
    snapshot_json: *const c_char,
) -> i32 {
    guard(|| {
        let handle = handle_mut(handle)?;
        let snapshot: Snapshot = serde_json::from_str(read_str(snapshot_json, "snapshot")?)?;
        handle
            .ledger
            .load_records(snapshot.transactions, snapshot.categories)?;
        Ok(())
    })
}

/// Applies one change event (see [`LedgerEvent`] for the JSON shape).
///
/// # Safety
/// `handle` must be live and `event_json` a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn ffi_ledger_apply(
    handle: *mut LedgerHandle,
    event_json: *const c_char,
) -> i32 {
    guard(|| {
        let handle = handle_mut(handle)?;
        let event: LedgerEvent = serde_json::from_str(read_str(event_json, "event")?)?;
        handle.ledger.apply(event)?;
        Ok(())
    })
}

/// Writes the formatted total (e.g. `R$100,00`). Free with [`ffi_string_free`].
///
/// # Safety
/// `handle` must be live and `out_text` writable.
#[no_mangle]
pub unsafe extern "C" fn ffi_ledger_total(
    handle: *mut LedgerHandle,
    out_text: *mut *mut c_char,
) -> i32 {
    guard(|| {
        let handle = handle_mut(handle)?;
        let text = currency::format_amount(handle.ledger.total(), &handle.config.currency);
        write_out(out_text, text)
    })
}

/// Writes the formatted subtotal of one category; unknown ids yield zero.
///
/// # Safety
/// `handle` must be live, `category_id` a valid NUL-terminated string and
/// `out_text` writable.
#[no_mangle]
pub unsafe extern "C" fn ffi_ledger_category_total(
    handle: *mut LedgerHandle,
    category_id: *const c_char,
    out_text: *mut *mut c_char,
) -> i32 {
    guard(|| {
        let handle = handle_mut(handle)?;
        let id = CategoryId::from(read_str(category_id, "category id")?);
        let text = currency::format_amount(
            handle.ledger.category_total(&id),
            &handle.config.currency,
        );
        write_out(out_text, text)
    })
}

/// Runs a query and writes the matching statement lines as a JSON array.
/// A null `query_json` uses the configured default ordering.
///
/// # Safety
/// `handle` must be live, `query_json` null or a valid NUL-terminated string,
/// and `out_json` writable.
#[no_mangle]
pub unsafe extern "C" fn ffi_ledger_query(
    handle: *mut LedgerHandle,
    query_json: *const c_char,
    out_json: *mut *mut c_char,
) -> i32 {
    guard(|| {
        let handle = handle_mut(handle)?;
        let query: LedgerQuery = match read_optional_str(query_json, "query")? {
            Some(json) => serde_json::from_str(json)?,
            None => handle.config.default_query(),
        };
        let lines = SummaryService::statement_lines(&handle.ledger, &query, &handle.config);
        write_out(out_json, serde_json::to_string(&lines)?)
    })
}

/// Writes the per-category chart slices as a JSON array.
///
/// # Safety
/// `handle` must be live and `out_json` writable.
#[no_mangle]
pub unsafe extern "C" fn ffi_ledger_breakdown(
    handle: *mut LedgerHandle,
    out_json: *mut *mut c_char,
) -> i32 {
    guard(|| {
        let handle = handle_mut(handle)?;
        let slices = SummaryService::category_breakdown(&handle.ledger);
        write_out(out_json, serde_json::to_string(&slices)?)
    })
}

/// Frees a string produced by this library. Null is ignored.
///
/// # Safety
/// `ptr` must come from this library and must not be used afterwards.
#[no_mangle]
pub unsafe extern "C" fn ffi_string_free(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Status of the last failed call on this thread, `0` when none.
#[no_mangle]
pub extern "C" fn ffi_last_error_category() -> i32 {
    LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_ref()
            .map(|(status, _)| i32::from(*status))
            .unwrap_or(0)
    })
}

/// Copies the last error message into `buffer` (truncated, NUL-terminated)
/// and returns the buffer size needed for the full message, or `0` when no
/// error is recorded.
///
/// # Safety
/// `buffer` must be null or point to at least `length` writable bytes.
#[no_mangle]
pub unsafe extern "C" fn ffi_last_error_message(buffer: *mut c_char, length: usize) -> i32 {
    LAST_ERROR.with(|slot| {
        let slot = slot.borrow();
        let Some((_, message)) = slot.as_ref() else {
            return 0;
        };
        let bytes = message.as_bytes();
        if !buffer.is_null() && length > 0 {
            let copied = bytes.len().min(length - 1);
            ptr::copy_nonoverlapping(bytes.as_ptr(), buffer as *mut u8, copied);
            *buffer.add(copied) = 0;
        }
        i32::try_from(bytes.len() + 1).unwrap_or(i32::MAX)
    })
}
