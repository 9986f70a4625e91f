/*
 *  imon/error.rs
 *
 *  imonctl - iMON display control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Unified error type for the display binding
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::path::PathBuf;
use thiserror::Error;

use super::codes::CodeSetError;

/// Unified error type for all display-binding operations.
///
/// `NativeCallFailure` and `NotConnected` are recoverable per call; the
/// host decides whether to log and continue or escalate. Library loading
/// errors end the session before it starts.
#[derive(Debug, Error)]
pub enum ImonError {
    /// Code table definition or lookup failed.
    #[error("code table error: {0}")]
    Codes(#[from] CodeSetError),

    /// The vendor library could not be loaded.
    #[error("failed to load vendor library {}: {source}", .path.display())]
    LibraryLoad {
        path: PathBuf,
        #[source]
        source: libloading::Error,
    },

    /// No vendor library in any search location.
    #[error("vendor display library not found (set IMONCTL_DISPLAY_LIB or configure library_path)")]
    LibraryNotFound,

    /// The loaded library does not export a required entry point.
    #[error("vendor library is missing symbol {symbol}: {source}")]
    MissingSymbol {
        symbol: String,
        #[source]
        source: libloading::Error,
    },

    /// Text cannot cross the C boundary (interior NUL byte).
    #[error("display text contains an interior NUL byte")]
    InvalidText(#[from] std::ffi::NulError),

    /// The native library reported non-success for an issued command.
    /// Always carries the symbolic code name, never a bare integer.
    #[error("{call} failed with {code}")]
    NativeCallFailure { call: &'static str, code: String },

    /// An operation requiring an active session was issued while idle.
    #[error("display session is not connected")]
    NotConnected,
}
