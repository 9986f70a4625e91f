/*
 *  imon/traits.rs
 *
 *  imonctl - iMON display control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Raw call surface shared by the vendor library and the mock port
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

use std::ffi::CStr;

use super::ffi::{DspEqData, Hwnd};

/// One method per vendor entry point, raw status codes in, raw status
/// codes out. Marshaling, status interpretation and session gating live
/// one layer up in [`super::api::ImonDisplay`]; everything below this
/// trait is a straight pass-through to the C ABI.
///
/// Implemented by [`super::library::VendorLibrary`] for the real hardware
/// and by [`super::mock::MockPort`] for tests.
pub trait DisplayPort: Send {
    fn init(&self, hwnd: Hwnd, msg: u32) -> i32;
    fn uninit(&self) -> i32;
    fn is_inited(&self) -> i32;
    fn is_plugin_mode_enabled(&self) -> i32;

    fn set_vfd_text(&self, line1: &CStr, line2: &CStr) -> i32;
    fn set_vfd_eq_data(&self, data: &DspEqData) -> i32;

    fn set_lcd_text(&self, line: &CStr) -> i32;
    fn set_lcd_all_icons(&self, on: bool) -> i32;
    fn set_lcd_orange_icon(&self, slices: u8, peel: u8) -> i32;
    fn set_lcd_media_type_icon(&self, icons: u8) -> i32;
    fn set_lcd_speaker_icon(&self, first: u8, second: u8) -> i32;
    fn set_lcd_video_codec_icon(&self, icons: u8) -> i32;
    fn set_lcd_audio_codec_icon(&self, icons: u8) -> i32;
    fn set_lcd_aspect_ratio_icon(&self, icons: u8) -> i32;
    fn set_lcd_etc_icon(&self, icons: u8) -> i32;
    fn set_lcd_progress(&self, progress: i32, total: i32) -> i32;
    fn set_lcd_eq_data(&self, left: &DspEqData, right: &DspEqData) -> i32;
}
