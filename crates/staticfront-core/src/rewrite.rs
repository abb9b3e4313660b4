//! Directory-style request path rewriting.
//!
//! Browsers ask for `/docs` or `/docs/`; the origin stores
//! `/docs/index.html`. [`rewrite_path`] bridges the two. It runs once per
//! origin-bound request, after the cache lookup and before the origin
//! fetch, so cache keys always carry the path the client actually sent.
//!
//! The rewrite is purely syntactic. It never consults the origin to ask
//! whether the index document exists; a wrong guess simply produces a miss
//! that the fallback stage turns into a 404.

/// Name of the index document appended to directory-style paths.
pub const INDEX_DOCUMENT: &str = "index.html";

/// Rewrite a directory-style request path to its index document.
///
/// Three cases, checked in order:
///
/// 1. Path ends with `/`: append [`INDEX_DOCUMENT`].
/// 2. Final segment contains no `.`: treat it as a directory and append
///    `/` plus [`INDEX_DOCUMENT`].
/// 3. Otherwise the path already names a file; return it unchanged.
///
/// Deterministic on the path alone. Callers guarantee the leading `/`
/// (enforced by [`EdgeRequest::new`](crate::request::EdgeRequest::new)).
#[must_use]
pub fn rewrite_path(path: &str) -> String {
    if path.ends_with('/') {
        return format!("{path}{INDEX_DOCUMENT}");
    }
    let final_segment = path.rsplit('/').next().unwrap_or(path);
    if final_segment.contains('.') {
        path.to_owned()
    } else {
        format!("{path}/{INDEX_DOCUMENT}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
