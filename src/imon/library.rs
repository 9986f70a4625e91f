/*
 *  imon/library.rs
 *
 *  imonctl - iMON display control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Vendor library loader - locates and binds iMONDisplay.dll
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

//! Loader for the vendor display library.
//!
//! The DLL handle is an explicit object owned by the session, not a
//! process-wide global bound at import time: construction resolves every
//! entry point up front and fails with the offending symbol name, teardown
//! happens when the owning session drops.

use std::ffi::CStr;
use std::path::{Path, PathBuf};

use libloading::Library;
use log::{debug, info};

use super::error::ImonError;
use super::ffi::{self, DspEqData, Hwnd, ImonApiTable};
use super::traits::DisplayPort;

/// Filename the vendor ships the display API under.
pub const LIBRARY_FILENAME: &str = "iMONDisplay.dll";

/// Environment variable overriding the library search.
pub const LIBRARY_PATH_ENV: &str = "IMONCTL_DISPLAY_LIB";

/// The loaded vendor library plus its resolved entry points.
#[derive(Debug)]
pub struct VendorLibrary {
    /// Keeps the mapped library alive for as long as the table is in use.
    _library: Library,

    api: ImonApiTable,
}

impl VendorLibrary {
    /// Search locations in priority order.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. Environment variable override (full path to the DLL)
        if let Ok(path) = std::env::var(LIBRARY_PATH_ENV) {
            paths.push(PathBuf::from(path));
        }

        // 2. Working directory
        paths.push(PathBuf::from(LIBRARY_FILENAME));

        // 3. Next to the executable (the vendor installer drops the DLL
        //    beside the consuming application)
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                paths.push(dir.join(LIBRARY_FILENAME));
            }
        }

        paths
    }

    /// Find the vendor library, if any search location has it.
    pub fn find() -> Option<PathBuf> {
        for candidate in Self::search_paths() {
            if candidate.exists() {
                debug!("Found vendor library at: {}", candidate.display());
                return Some(candidate);
            }
        }

        debug!("Vendor library not found in any search location");
        None
    }

    /// Load the library from a specific path and resolve all 17 entry
    /// points. A missing export fails here, by name, rather than at the
    /// first call.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ImonError> {
        let path = path.as_ref();
        info!("Loading vendor display library: {}", path.display());

        let library = unsafe {
            Library::new(path).map_err(|source| ImonError::LibraryLoad {
                path: path.to_path_buf(),
                source,
            })?
        };

        let api = ImonApiTable {
            init: resolve(&library, ffi::SYM_INIT)?,
            uninit: resolve(&library, ffi::SYM_UNINIT)?,
            is_inited: resolve(&library, ffi::SYM_IS_INITED)?,
            is_plugin_mode_enabled: resolve(&library, ffi::SYM_IS_PLUGIN_MODE_ENABLED)?,
            set_vfd_text: resolve(&library, ffi::SYM_SET_VFD_TEXT)?,
            set_vfd_eq_data: resolve(&library, ffi::SYM_SET_VFD_EQDATA)?,
            set_lcd_text: resolve(&library, ffi::SYM_SET_LCD_TEXT)?,
            set_lcd_all_icons: resolve(&library, ffi::SYM_SET_LCD_ALL_ICONS)?,
            set_lcd_orange_icon: resolve(&library, ffi::SYM_SET_LCD_ORANGE_ICON)?,
            set_lcd_media_type_icon: resolve(&library, ffi::SYM_SET_LCD_MEDIA_TYPE_ICON)?,
            set_lcd_speaker_icon: resolve(&library, ffi::SYM_SET_LCD_SPEAKER_ICON)?,
            set_lcd_video_codec_icon: resolve(&library, ffi::SYM_SET_LCD_VIDEO_CODEC_ICON)?,
            set_lcd_audio_codec_icon: resolve(&library, ffi::SYM_SET_LCD_AUDIO_CODEC_ICON)?,
            set_lcd_aspect_ratio_icon: resolve(&library, ffi::SYM_SET_LCD_ASPECT_RATIO_ICON)?,
            set_lcd_etc_icon: resolve(&library, ffi::SYM_SET_LCD_ETC_ICON)?,
            set_lcd_progress: resolve(&library, ffi::SYM_SET_LCD_PROGRESS)?,
            set_lcd_eq_data: resolve(&library, ffi::SYM_SET_LCD_EQDATA)?,
        };

        info!("Vendor display library bound, all entry points resolved");

        Ok(Self {
            _library: library,
            api,
        })
    }

    /// Locate the library in the search paths and load it.
    pub fn load_default() -> Result<Self, ImonError> {
        let path = Self::find().ok_or(ImonError::LibraryNotFound)?;
        Self::load(path)
    }
}

/// Resolve one exported symbol to a bare function pointer.
///
/// The pointer is copied out of the `Symbol` guard; validity is tied to
/// the `Library` the caller keeps alive alongside it.
fn resolve<T: Copy>(library: &Library, symbol: &'static [u8]) -> Result<T, ImonError> {
    let name = String::from_utf8_lossy(&symbol[..symbol.len().saturating_sub(1)]).into_owned();
    unsafe {
        library
            .get::<T>(symbol)
            .map(|sym| *sym)
            .map_err(|source| ImonError::MissingSymbol {
                symbol: name,
                source,
            })
    }
}

impl DisplayPort for VendorLibrary {
    fn init(&self, hwnd: Hwnd, msg: u32) -> i32 {
        unsafe { (self.api.init)(hwnd, msg) }
    }

    fn uninit(&self) -> i32 {
        unsafe { (self.api.uninit)() }
    }

    fn is_inited(&self) -> i32 {
        unsafe { (self.api.is_inited)() }
    }

    fn is_plugin_mode_enabled(&self) -> i32 {
        unsafe { (self.api.is_plugin_mode_enabled)() }
    }

    fn set_vfd_text(&self, line1: &CStr, line2: &CStr) -> i32 {
        unsafe { (self.api.set_vfd_text)(line1.as_ptr(), line2.as_ptr()) }
    }

    fn set_vfd_eq_data(&self, data: &DspEqData) -> i32 {
        unsafe { (self.api.set_vfd_eq_data)(data) }
    }

    fn set_lcd_text(&self, line: &CStr) -> i32 {
        unsafe { (self.api.set_lcd_text)(line.as_ptr()) }
    }

    fn set_lcd_all_icons(&self, on: bool) -> i32 {
        unsafe { (self.api.set_lcd_all_icons)(on as i32) }
    }

    fn set_lcd_orange_icon(&self, slices: u8, peel: u8) -> i32 {
        unsafe { (self.api.set_lcd_orange_icon)(slices, peel) }
    }

    fn set_lcd_media_type_icon(&self, icons: u8) -> i32 {
        unsafe { (self.api.set_lcd_media_type_icon)(icons) }
    }

    fn set_lcd_speaker_icon(&self, first: u8, second: u8) -> i32 {
        unsafe { (self.api.set_lcd_speaker_icon)(first, second) }
    }

    fn set_lcd_video_codec_icon(&self, icons: u8) -> i32 {
        unsafe { (self.api.set_lcd_video_codec_icon)(icons) }
    }

    fn set_lcd_audio_codec_icon(&self, icons: u8) -> i32 {
        unsafe { (self.api.set_lcd_audio_codec_icon)(icons) }
    }

    fn set_lcd_aspect_ratio_icon(&self, icons: u8) -> i32 {
        unsafe { (self.api.set_lcd_aspect_ratio_icon)(icons) }
    }

    fn set_lcd_etc_icon(&self, icons: u8) -> i32 {
        unsafe { (self.api.set_lcd_etc_icon)(icons) }
    }

    fn set_lcd_progress(&self, progress: i32, total: i32) -> i32 {
        unsafe { (self.api.set_lcd_progress)(progress, total) }
    }

    fn set_lcd_eq_data(&self, left: &DspEqData, right: &DspEqData) -> i32 {
        unsafe { (self.api.set_lcd_eq_data)(left, right) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_paths_include_cwd() {
        let paths = VendorLibrary::search_paths();
        assert!(!paths.is_empty());
        assert!(
            paths
                .iter()
                .any(|p| p.file_name().is_some_and(|n| n == LIBRARY_FILENAME))
        );
    }

    #[test]
    fn test_load_missing_library_reports_path() {
        let err = VendorLibrary::load("/nonexistent/iMONDisplay.dll").unwrap_err();
        match err {
            ImonError::LibraryLoad { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/iMONDisplay.dll"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
