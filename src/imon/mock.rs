/*
 *  imon/mock.rs
 *
 *  imonctl - iMON display control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock display port for testing without hardware
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
use std::sync::{Arc, Mutex, PoisonError};

use super::codes;
use super::ffi::{DspEqData, Hwnd};
use super::traits::DisplayPort;

/// Recorded call state, shared for inspection in tests.
#[derive(Debug, Default)]
pub struct MockPortState {
    /// Entry-point names in call order.
    pub calls: Vec<&'static str>,

    pub init_count: usize,
    pub uninit_count: usize,

    pub last_init: Option<(Hwnd, u32)>,
    pub last_vfd_text: Option<(String, String)>,
    pub last_lcd_text: Option<String>,
    pub last_vfd_eq: Option<[i32; 16]>,
    pub last_lcd_eq: Option<([i32; 16], [i32; 16])>,
    pub last_all_icons: Option<bool>,
    pub last_orange: Option<(u8, u8)>,
    pub last_media_type: Option<u8>,
    pub last_speaker: Option<(u8, u8)>,
    pub last_video_codec: Option<u8>,
    pub last_audio_codec: Option<u8>,
    pub last_aspect_ratio: Option<u8>,
    pub last_etc: Option<u8>,
    pub last_progress: Option<(i32, i32)>,
}

/// A [`DisplayPort`] that records every call and answers with scripted
/// status codes. Defaults to a fully healthy device: init/uninit/set
/// calls succeed, the status queries report inited and in plugin mode.
pub struct MockPort {
    state: Arc<Mutex<MockPortState>>,
    init_status: i32,
    uninit_status: i32,
    is_inited_status: i32,
    plugin_mode_status: i32,
    call_status: i32,
}

impl MockPort {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockPortState::default())),
            init_status: codes::DSP_SUCCEEDED,
            uninit_status: codes::DSP_SUCCEEDED,
            is_inited_status: codes::DSP_S_INITED,
            plugin_mode_status: codes::DSP_S_IN_PLUGIN_MODE,
            call_status: codes::DSP_SUCCEEDED,
        }
    }

    /// Shared handle to the recorded state.
    pub fn state(&self) -> Arc<Mutex<MockPortState>> {
        Arc::clone(&self.state)
    }

    pub fn with_init_status(mut self, status: i32) -> Self {
        self.init_status = status;
        self
    }

    pub fn with_uninit_status(mut self, status: i32) -> Self {
        self.uninit_status = status;
        self
    }

    pub fn with_query_statuses(mut self, is_inited: i32, plugin_mode: i32) -> Self {
        self.is_inited_status = is_inited;
        self.plugin_mode_status = plugin_mode;
        self
    }

    pub fn with_call_status(mut self, status: i32) -> Self {
        self.call_status = status;
        self
    }

    fn record(&self, call: &'static str) -> std::sync::MutexGuard<'_, MockPortState> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.calls.push(call);
        state
    }
}

impl Default for MockPort {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayPort for MockPort {
    fn init(&self, hwnd: Hwnd, msg: u32) -> i32 {
        let mut state = self.record("init");
        state.init_count += 1;
        state.last_init = Some((hwnd, msg));
        self.init_status
    }

    fn uninit(&self) -> i32 {
        self.record("uninit").uninit_count += 1;
        self.uninit_status
    }

    fn is_inited(&self) -> i32 {
        self.record("is_inited");
        self.is_inited_status
    }

    fn is_plugin_mode_enabled(&self) -> i32 {
        self.record("is_plugin_mode_enabled");
        self.plugin_mode_status
    }

    fn set_vfd_text(&self, line1: &CStr, line2: &CStr) -> i32 {
        self.record("set_vfd_text").last_vfd_text = Some((
            line1.to_string_lossy().into_owned(),
            line2.to_string_lossy().into_owned(),
        ));
        self.call_status
    }

    fn set_vfd_eq_data(&self, data: &DspEqData) -> i32 {
        self.record("set_vfd_eq_data").last_vfd_eq = Some(data.band_data);
        self.call_status
    }

    fn set_lcd_text(&self, line: &CStr) -> i32 {
        self.record("set_lcd_text").last_lcd_text = Some(line.to_string_lossy().into_owned());
        self.call_status
    }

    fn set_lcd_all_icons(&self, on: bool) -> i32 {
        self.record("set_lcd_all_icons").last_all_icons = Some(on);
        self.call_status
    }

    fn set_lcd_orange_icon(&self, slices: u8, peel: u8) -> i32 {
        self.record("set_lcd_orange_icon").last_orange = Some((slices, peel));
        self.call_status
    }

    fn set_lcd_media_type_icon(&self, icons: u8) -> i32 {
        self.record("set_lcd_media_type_icon").last_media_type = Some(icons);
        self.call_status
    }

    fn set_lcd_speaker_icon(&self, first: u8, second: u8) -> i32 {
        self.record("set_lcd_speaker_icon").last_speaker = Some((first, second));
        self.call_status
    }

    fn set_lcd_video_codec_icon(&self, icons: u8) -> i32 {
        self.record("set_lcd_video_codec_icon").last_video_codec = Some(icons);
        self.call_status
    }

    fn set_lcd_audio_codec_icon(&self, icons: u8) -> i32 {
        self.record("set_lcd_audio_codec_icon").last_audio_codec = Some(icons);
        self.call_status
    }

    fn set_lcd_aspect_ratio_icon(&self, icons: u8) -> i32 {
        self.record("set_lcd_aspect_ratio_icon").last_aspect_ratio = Some(icons);
        self.call_status
    }

    fn set_lcd_etc_icon(&self, icons: u8) -> i32 {
        self.record("set_lcd_etc_icon").last_etc = Some(icons);
        self.call_status
    }

    fn set_lcd_progress(&self, progress: i32, total: i32) -> i32 {
        self.record("set_lcd_progress").last_progress = Some((progress, total));
        self.call_status
    }

    fn set_lcd_eq_data(&self, left: &DspEqData, right: &DspEqData) -> i32 {
        self.record("set_lcd_eq_data").last_lcd_eq = Some((left.band_data, right.band_data));
        self.call_status
    }
}
