//! C-ABI FFI bindings for cross-language integration.
//!
//! Every entry point works on file paths. Results carrying data return a
//! JSON string that must be released with `pdfops_free_result`.

use std::ffi::{c_char, c_int, CStr, CString};
use std::path::{Path, PathBuf};
use std::ptr;

use crate::ingest::SourceFile;
use crate::model::Document;
use crate::options::{CompressionLevel, CompressionOptions, SplitOptions};

/// Result structure returned by FFI functions.
#[repr(C)]
pub struct PdfopsResult {
    /// Whether the operation succeeded.
    pub success: bool,
    /// The result data (null if failed). Must be freed with `pdfops_free_string`.
    pub data: *mut c_char,
    /// Error message (null if succeeded). Must be freed with `pdfops_free_string`.
    pub error: *mut c_char,
}

impl PdfopsResult {
    fn success(data: String) -> Self {
        Self {
            success: true,
            data: CString::new(data).unwrap_or_default().into_raw(),
            error: ptr::null_mut(),
        }
    }

    fn error(message: String) -> Self {
        Self {
            success: false,
            data: ptr::null_mut(),
            error: CString::new(message).unwrap_or_default().into_raw(),
        }
    }
}

impl From<crate::Result<String>> for PdfopsResult {
    fn from(result: crate::Result<String>) -> Self {
        match result {
            Ok(data) => Self::success(data),
            Err(e) => Self::error(e.to_string()),
        }
    }
}

unsafe fn path_arg<'a>(ptr: *const c_char, what: &str) -> Result<&'a str, String> {
    if ptr.is_null() {
        return Err(format!("{} cannot be null", what));
    }
    CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| format!("Invalid UTF-8 {}", what.to_lowercase()))
}

fn level_arg(level: c_int) -> crate::Result<CompressionLevel> {
    match level {
        0 => Ok(CompressionLevel::Light),
        1 => Ok(CompressionLevel::Balanced),
        2 => Ok(CompressionLevel::Aggressive),
        other => Err(crate::Error::InvalidOptions(format!(
            "unknown compression level {}",
            other
        ))),
    }
}

/// Compress `input` into `output`.
///
/// `level` is 0 (light), 1 (balanced) or 2 (aggressive). On success `data`
/// holds a JSON summary with the input and output sizes.
///
/// # Safety
///
/// `input` and `output` must be valid null-terminated UTF-8 strings.
/// The returned result must be freed with `pdfops_free_result`.
#[no_mangle]
pub unsafe extern "C" fn pdfops_compress_file(
    input: *const c_char,
    output: *const c_char,
    level: c_int,
    quality: u8,
) -> PdfopsResult {
    let input = match path_arg(input, "Input path") {
        Ok(s) => s,
        Err(e) => return PdfopsResult::error(e),
    };
    let output = match path_arg(output, "Output path") {
        Ok(s) => s,
        Err(e) => return PdfopsResult::error(e),
    };

    compress_internal(Path::new(input), Path::new(output), level, quality).into()
}

fn compress_internal(input: &Path, output: &Path, level: c_int, quality: u8) -> crate::Result<String> {
    let options = CompressionOptions::new()
        .with_level(level_arg(level)?)
        .with_quality(quality);
    let source = SourceFile::from_path(input)?;
    let result = crate::compress(&source.data, &options)?;
    std::fs::write(output, &result.data)?;

    let summary = serde_json::json!({
        "original_size": result.original_size,
        "compressed_size": result.compressed_size,
        "pages_scaled": result.pages_scaled,
        "pages_skipped": result.pages_skipped,
        "kept_original": result.kept_original,
    });
    Ok(summary.to_string())
}

/// Merge `count` files, in order, into `output`.
///
/// # Safety
///
/// `paths` must point to `count` valid null-terminated UTF-8 strings and
/// `output` must be a valid null-terminated UTF-8 string.
/// The returned result must be freed with `pdfops_free_result`.
#[no_mangle]
pub unsafe extern "C" fn pdfops_merge_files(
    paths: *const *const c_char,
    count: usize,
    output: *const c_char,
) -> PdfopsResult {
    if paths.is_null() {
        return PdfopsResult::error("Paths cannot be null".to_string());
    }
    let output = match path_arg(output, "Output path") {
        Ok(s) => s,
        Err(e) => return PdfopsResult::error(e),
    };

    let mut inputs = Vec::with_capacity(count);
    for i in 0..count {
        match path_arg(*paths.add(i), "Input path") {
            Ok(s) => inputs.push(PathBuf::from(s)),
            Err(e) => return PdfopsResult::error(e),
        }
    }

    merge_internal(&inputs, Path::new(output)).into()
}

fn merge_internal(inputs: &[PathBuf], output: &Path) -> crate::Result<String> {
    let blob = crate::merge_files(inputs)?;
    std::fs::write(output, &blob.data)?;
    Ok(serde_json::json!({ "size": blob.len() }).to_string())
}

/// Split `input` into one file per page inside `output_dir`.
///
/// On success `data` holds a JSON array of the written paths.
///
/// # Safety
///
/// `input` and `output_dir` must be valid null-terminated UTF-8 strings.
/// The returned result must be freed with `pdfops_free_result`.
#[no_mangle]
pub unsafe extern "C" fn pdfops_split_file(
    input: *const c_char,
    output_dir: *const c_char,
) -> PdfopsResult {
    let input = match path_arg(input, "Input path") {
        Ok(s) => s,
        Err(e) => return PdfopsResult::error(e),
    };
    let output_dir = match path_arg(output_dir, "Output directory") {
        Ok(s) => s,
        Err(e) => return PdfopsResult::error(e),
    };

    split_internal(Path::new(input), Path::new(output_dir)).into()
}

fn split_internal(input: &Path, output_dir: &Path) -> crate::Result<String> {
    let blobs = crate::split_file(input, &SplitOptions::default())?;
    let written = blobs
        .iter()
        .map(|blob| blob.write_to_dir(output_dir).map(|p| p.to_string_lossy().into_owned()))
        .collect::<crate::Result<Vec<_>>>()?;
    Ok(serde_json::to_string(&written).unwrap_or_else(|_| "[]".to_string()))
}

/// Estimated compressed size. Unknown levels fall back to balanced.
#[no_mangle]
pub extern "C" fn pdfops_estimate_size(original: u64, level: c_int, quality: u8) -> u64 {
    let level = level_arg(level).unwrap_or_default();
    crate::estimate_size(original, level, quality)
}

/// Get document information as JSON.
///
/// # Safety
///
/// The `path` must be a valid null-terminated UTF-8 string.
/// The returned result must be freed with `pdfops_free_result`.
#[no_mangle]
pub unsafe extern "C" fn pdfops_get_info(path: *const c_char) -> PdfopsResult {
    let path = match path_arg(path, "Path") {
        Ok(s) => s,
        Err(e) => return PdfopsResult::error(e),
    };

    get_info_internal(Path::new(path)).into()
}

fn get_info_internal(path: &Path) -> crate::Result<String> {
    let source = SourceFile::from_path(path)?;
    let doc = Document::load(&source.data)?;
    serde_json::to_string_pretty(&doc.metadata()).map_err(|e| crate::Error::Other(e.to_string()))
}

/// Get the page count of a PDF file.
///
/// # Safety
///
/// The `path` must be a valid null-terminated UTF-8 string.
/// Returns -1 on error.
#[no_mangle]
pub unsafe extern "C" fn pdfops_get_page_count(path: *const c_char) -> i32 {
    let Ok(path) = path_arg(path, "Path") else {
        return -1;
    };

    match SourceFile::from_path(path).and_then(|source| Document::load(&source.data)) {
        Ok(doc) => doc.page_count() as i32,
        Err(_) => -1,
    }
}

/// Check if a file is a valid PDF.
///
/// # Safety
///
/// The `path` must be a valid null-terminated UTF-8 string.
#[no_mangle]
pub unsafe extern "C" fn pdfops_is_pdf(path: *const c_char) -> bool {
    match path_arg(path, "Path") {
        Ok(path) => crate::detect::is_pdf(path),
        Err(_) => false,
    }
}

/// Free a result returned by any pdfops function.
///
/// # Safety
///
/// The `result` must have been returned by a pdfops function.
/// This function should only be called once per result.
#[no_mangle]
pub unsafe extern "C" fn pdfops_free_result(result: PdfopsResult) {
    if !result.data.is_null() {
        drop(CString::from_raw(result.data));
    }
    if !result.error.is_null() {
        drop(CString::from_raw(result.error));
    }
}

/// Free a string allocated by pdfops.
///
/// # Safety
///
/// The `ptr` must have been allocated by pdfops.
/// This function should only be called once per pointer.
#[no_mangle]
pub unsafe extern "C" fn pdfops_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// Get the version of the pdfops library.
///
/// The returned string is statically allocated and should not be freed.
#[no_mangle]
pub extern "C" fn pdfops_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
