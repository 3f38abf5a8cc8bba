//! C-ABI host surface for unnote.
//!
//! Exposes open/page count/page size/render/close to C hosts. Rendered
//! pages are returned as JSON draw lists.

use std::ffi::{c_char, CStr, CString};
use std::path::Path;
use std::ptr;

use crate::parser::NoteDocument;
use crate::render::{to_json, JsonFormat, RenderOptions};

/// Opaque handle to an open note.
pub struct UnnoteDocument {
    inner: NoteDocument,
}

/// Result type for FFI functions.
#[repr(C)]
pub struct UnnoteResult {
    /// Success flag
    pub success: bool,
    /// Result data (null-terminated string, must be freed with unnote_free_result)
    pub data: *mut c_char,
    /// Error message (null-terminated string, must be freed with unnote_free_result)
    pub error: *mut c_char,
}

impl UnnoteResult {
    fn success(data: String) -> Self {
        Self {
            success: true,
            data: CString::new(data).unwrap_or_default().into_raw(),
            error: ptr::null_mut(),
        }
    }

    fn error(msg: String) -> Self {
        Self {
            success: false,
            data: ptr::null_mut(),
            error: CString::new(msg).unwrap_or_default().into_raw(),
        }
    }
}

/// Open a note file.
///
/// # Safety
///
/// The `path` must be a valid null-terminated UTF-8 string.
/// Returns null on failure. A non-null handle must be released with
/// `unnote_close`.
#[no_mangle]
pub unsafe extern "C" fn unnote_open(path: *const c_char) -> *mut UnnoteDocument {
    if path.is_null() {
        return ptr::null_mut();
    }

    let path_str = match CStr::from_ptr(path).to_str() {
        Ok(s) => s,
        Err(_) => return ptr::null_mut(),
    };

    match open_internal(Path::new(path_str)) {
        Ok(doc) => Box::into_raw(Box::new(doc)),
        Err(e) => {
            log::warn!("unnote_open failed for {}: {}", path_str, e);
            ptr::null_mut()
        }
    }
}

fn open_internal(path: &Path) -> crate::Result<UnnoteDocument> {
    Ok(UnnoteDocument {
        inner: NoteDocument::open(path)?,
    })
}

/// Get the number of pages of an open note.
///
/// # Safety
///
/// The `doc` must be null or a handle returned by `unnote_open`.
/// Returns -1 on error.
#[no_mangle]
pub unsafe extern "C" fn unnote_page_count(doc: *const UnnoteDocument) -> i32 {
    match doc.as_ref() {
        Some(doc) => i32::try_from(doc.inner.page_count()).unwrap_or(i32::MAX),
        None => -1,
    }
}

/// Get the size of a page.
///
/// # Safety
///
/// The `doc` must be null or a handle returned by `unnote_open`.
/// `width` and `height` must be null or valid for writes.
/// Returns 0 on success, -1 on error.
#[no_mangle]
pub unsafe extern "C" fn unnote_page_size(
    doc: *const UnnoteDocument,
    page_index: u32,
    width: *mut f64,
    height: *mut f64,
) -> i32 {
    let Some(doc) = doc.as_ref() else {
        return -1;
    };
    if width.is_null() || height.is_null() {
        return -1;
    }

    match doc.inner.page_size(page_index) {
        Ok((w, h)) => {
            *width = w;
            *height = h;
            0
        }
        Err(_) => -1,
    }
}

/// Render a page to a JSON draw list.
///
/// # Safety
///
/// The `doc` must be null or a handle returned by `unnote_open`.
/// The returned result must be freed with `unnote_free_result`.
#[no_mangle]
pub unsafe extern "C" fn unnote_render_page_json(
    doc: *const UnnoteDocument,
    page_index: u32,
    printing: bool,
) -> UnnoteResult {
    let Some(doc) = doc.as_ref() else {
        return UnnoteResult::error("Document cannot be null".to_string());
    };

    match render_page_json_internal(&doc.inner, page_index, printing) {
        Ok(json) => UnnoteResult::success(json),
        Err(e) => UnnoteResult::error(e.to_string()),
    }
}

fn render_page_json_internal(
    doc: &NoteDocument,
    page_index: u32,
    printing: bool,
) -> crate::Result<String> {
    let options = RenderOptions::new().with_printing(printing);
    let list = doc.render_page(page_index, &options)?;
    to_json(&list, JsonFormat::Compact)
}

/// Close a note and release its resources.
///
/// # Safety
///
/// The `doc` must be null or a handle returned by `unnote_open`.
/// This function should only be called once per handle.
#[no_mangle]
pub unsafe extern "C" fn unnote_close(doc: *mut UnnoteDocument) {
    if !doc.is_null() {
        Box::from_raw(doc).inner.close();
    }
}

/// Free a result returned by any unnote function.
///
/// # Safety
///
/// The `result` must have been returned by an unnote function.
/// This function should only be called once per result.
#[no_mangle]
pub unsafe extern "C" fn unnote_free_result(result: UnnoteResult) {
    if !result.data.is_null() {
        drop(CString::from_raw(result.data));
    }
    if !result.error.is_null() {
        drop(CString::from_raw(result.error));
    }
}

/// Get the version of the unnote library.
///
/// The returned string is statically allocated and should not be freed.
#[no_mangle]
pub extern "C" fn unnote_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
