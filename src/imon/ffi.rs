/*
 *  imon/ffi.rs
 *
 *  imonctl - iMON display control
 *  (c) 2020-26 Stuart Hunter
 *
 *  C ABI types for the vendor display library
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

//! FFI types for `iMONDisplay.dll`.
//!
//! The vendor library exposes a flat C ABI: every entry point returns a
//! 32-bit status code, text goes across as narrow (8-bit) string pointers,
//! icon state as byte bitfields and equalizer data as a 16-element array
//! passed by reference. Calling convention is stdcall (`extern "system"`).

use std::os::raw::{c_char, c_int, c_uint};

use super::bands::{BAND_COUNT, BandLevels};

/// Window handle the library posts notification messages to.
/// Pointer-sized on every Windows target.
pub type Hwnd = usize;

/// Equalizer payload for one channel, passed by pointer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DspEqData {
    pub band_data: [c_int; BAND_COUNT],
}

impl From<&BandLevels> for DspEqData {
    fn from(levels: &BandLevels) -> Self {
        Self {
            band_data: levels.to_wire(),
        }
    }
}

pub type InitFn = unsafe extern "system" fn(hwnd: Hwnd, msg: c_uint) -> c_int;
pub type StatusFn = unsafe extern "system" fn() -> c_int;
pub type SetVfdTextFn =
    unsafe extern "system" fn(line1: *const c_char, line2: *const c_char) -> c_int;
pub type SetVfdEqDataFn = unsafe extern "system" fn(data: *const DspEqData) -> c_int;
pub type SetLcdTextFn = unsafe extern "system" fn(line: *const c_char) -> c_int;
pub type SetLcdAllIconsFn = unsafe extern "system" fn(on: c_int) -> c_int;
pub type SetIconByteFn = unsafe extern "system" fn(byte: u8) -> c_int;
pub type SetIconBytePairFn = unsafe extern "system" fn(first: u8, second: u8) -> c_int;
pub type SetLcdProgressFn = unsafe extern "system" fn(progress: c_int, total: c_int) -> c_int;
pub type SetLcdEqDataFn =
    unsafe extern "system" fn(left: *const DspEqData, right: *const DspEqData) -> c_int;

/// Resolved entry points, copied out of the loaded library.
///
/// Plain function pointers are `Copy`; they stay valid for as long as the
/// owning [`libloading::Library`] is alive, which the loader guarantees by
/// keeping the library alongside this table.
#[derive(Debug, Clone, Copy)]
pub struct ImonApiTable {
    pub init: InitFn,
    pub uninit: StatusFn,
    pub is_inited: StatusFn,
    pub is_plugin_mode_enabled: StatusFn,
    pub set_vfd_text: SetVfdTextFn,
    pub set_vfd_eq_data: SetVfdEqDataFn,
    pub set_lcd_text: SetLcdTextFn,
    pub set_lcd_all_icons: SetLcdAllIconsFn,
    pub set_lcd_orange_icon: SetIconBytePairFn,
    pub set_lcd_media_type_icon: SetIconByteFn,
    pub set_lcd_speaker_icon: SetIconBytePairFn,
    pub set_lcd_video_codec_icon: SetIconByteFn,
    pub set_lcd_audio_codec_icon: SetIconByteFn,
    pub set_lcd_aspect_ratio_icon: SetIconByteFn,
    pub set_lcd_etc_icon: SetIconByteFn,
    pub set_lcd_progress: SetLcdProgressFn,
    pub set_lcd_eq_data: SetLcdEqDataFn,
}

// Exported symbol names, null-terminated for symbol resolution.
pub const SYM_INIT: &[u8] = b"IMON_Display_Init\0";
pub const SYM_UNINIT: &[u8] = b"IMON_Display_Uninit\0";
pub const SYM_IS_INITED: &[u8] = b"IMON_Display_IsInited\0";
pub const SYM_IS_PLUGIN_MODE_ENABLED: &[u8] = b"IMON_Display_IsPluginModeEnabled\0";
pub const SYM_SET_VFD_TEXT: &[u8] = b"IMON_Display_SetVfdText\0";
pub const SYM_SET_VFD_EQDATA: &[u8] = b"IMON_Display_SetVfdEqData\0";
pub const SYM_SET_LCD_TEXT: &[u8] = b"IMON_Display_SetLcdText\0";
pub const SYM_SET_LCD_ALL_ICONS: &[u8] = b"IMON_Display_SetLcdAllIcons\0";
pub const SYM_SET_LCD_ORANGE_ICON: &[u8] = b"IMON_Display_SetLcdOrangeIcon\0";
pub const SYM_SET_LCD_MEDIA_TYPE_ICON: &[u8] = b"IMON_Display_SetLcdMediaTypeIcon\0";
pub const SYM_SET_LCD_SPEAKER_ICON: &[u8] = b"IMON_Display_SetLcdSpeakerIcon\0";
pub const SYM_SET_LCD_VIDEO_CODEC_ICON: &[u8] = b"IMON_Display_SetLcdVideoCodecIcon\0";
pub const SYM_SET_LCD_AUDIO_CODEC_ICON: &[u8] = b"IMON_Display_SetLcdAudioCodecIcon\0";
pub const SYM_SET_LCD_ASPECT_RATIO_ICON: &[u8] = b"IMON_Display_SetLcdAspectRatioIcon\0";
pub const SYM_SET_LCD_ETC_ICON: &[u8] = b"IMON_Display_SetLcdEtcIcon\0";
pub const SYM_SET_LCD_PROGRESS: &[u8] = b"IMON_Display_SetLcdProgress\0";
pub const SYM_SET_LCD_EQDATA: &[u8] = b"IMON_Display_SetLcdEqData\0";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_data_layout() {
        // Struct-by-pointer contract: one 16-slot c_int array, nothing else.
        assert_eq!(
            std::mem::size_of::<DspEqData>(),
            BAND_COUNT * std::mem::size_of::<c_int>()
        );
    }

    #[test]
    fn test_eq_data_from_band_levels() {
        let levels = BandLevels::new().set(1, 21).set(16, 7);
        let data = DspEqData::from(&levels);
        assert_eq!(data.band_data[0], 21);
        assert_eq!(data.band_data[15], 7);
        assert_eq!(data.band_data[1..15], [0i32; 14]);
    }

    #[test]
    fn test_symbol_names_are_null_terminated() {
        for sym in [
            SYM_INIT,
            SYM_UNINIT,
            SYM_IS_INITED,
            SYM_IS_PLUGIN_MODE_ENABLED,
            SYM_SET_VFD_TEXT,
            SYM_SET_VFD_EQDATA,
            SYM_SET_LCD_TEXT,
            SYM_SET_LCD_ALL_ICONS,
            SYM_SET_LCD_ORANGE_ICON,
            SYM_SET_LCD_MEDIA_TYPE_ICON,
            SYM_SET_LCD_SPEAKER_ICON,
            SYM_SET_LCD_VIDEO_CODEC_ICON,
            SYM_SET_LCD_AUDIO_CODEC_ICON,
            SYM_SET_LCD_ASPECT_RATIO_ICON,
            SYM_SET_LCD_ETC_ICON,
            SYM_SET_LCD_PROGRESS,
            SYM_SET_LCD_EQDATA,
        ] {
            assert_eq!(sym.last(), Some(&0u8));
        }
    }
}
