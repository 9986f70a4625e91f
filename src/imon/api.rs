/*
 *  imon/api.rs
 *
 *  imonctl - iMON display control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Typed session over the vendor display API
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

//! The typed session layer over the raw [`DisplayPort`].
//!
//! One logical session per process: uninitialized → initialized →
//! uninitialized, mutated only by [`ImonDisplay::initialize`] and
//! [`ImonDisplay::uninitialize`]. Every outbound call serializes through
//! a single mutex; the vendor library is not assumed to tolerate
//! concurrent entry. Failure policy is uniform: any non-`DSP_SUCCEEDED`
//! status surfaces as [`ImonError::NativeCallFailure`] carrying the
//! symbolic code name, and no operation retries internally.

use std::ffi::CString;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;

use super::bands::BandLevels;
use super::codes;
use super::error::ImonError;
use super::ffi::{DspEqData, Hwnd};
use super::icons::{
    AspectRatioIcons, AudioCodecIcons, EtcIcons, MediaTypeIcons, OrangeIcons, SpeakerIcons,
    VideoCodecIcons,
};
use super::traits::DisplayPort;

struct Session {
    port: Box<dyn DisplayPort>,

    /// Set by a successful initialize, cleared by uninitialize. Gates
    /// every display command so an idle session never touches the port.
    initialized: bool,
}

/// The display session. Cheap to share behind an `Arc`; all methods take
/// `&self` and serialize internally.
pub struct ImonDisplay {
    session: Mutex<Session>,
}

/// Map a raw status to success or a typed failure naming the code.
fn check(call: &'static str, status: i32) -> Result<(), ImonError> {
    if status == codes::DSP_SUCCEEDED {
        Ok(())
    } else {
        Err(ImonError::NativeCallFailure {
            call,
            code: codes::dsp_result().name_or_hex(status),
        })
    }
}

impl ImonDisplay {
    pub fn new(port: Box<dyn DisplayPort>) -> Self {
        Self {
            session: Mutex::new(Session {
                port,
                initialized: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the session for a display command; fails `NotConnected`
    /// before the port is touched when no session is open.
    fn lock_connected(&self) -> Result<MutexGuard<'_, Session>, ImonError> {
        let session = self.lock();
        if !session.initialized {
            return Err(ImonError::NotConnected);
        }
        Ok(session)
    }

    /// Request display plug-in mode. The library will post the
    /// asynchronous negotiation outcome to `hwnd` with message id `msg`;
    /// a success here only means the request was accepted.
    pub fn initialize(&self, hwnd: Hwnd, msg: u32) -> Result<(), ImonError> {
        let mut session = self.lock();
        let status = session.port.init(hwnd, msg);
        check("IMON_Display_Init", status)?;
        session.initialized = true;
        debug!("Display session opened (hwnd {hwnd:#x}, msg {msg:#x})");
        Ok(())
    }

    /// Release display control. The session flag clears whether or not
    /// the library reports success; a failure is reported, not retried.
    pub fn uninitialize(&self) -> Result<(), ImonError> {
        let mut session = self.lock();
        session.initialized = false;
        let status = session.port.uninit();
        check("IMON_Display_Uninit", status)?;
        debug!("Display session released");
        Ok(())
    }

    /// True iff the library reports the API initialized.
    pub fn is_initialized(&self) -> bool {
        self.lock().port.is_inited() == codes::DSP_S_INITED
    }

    /// True iff the library reports display plug-in mode granted.
    pub fn is_plugin_mode_enabled(&self) -> bool {
        self.lock().port.is_plugin_mode_enabled() == codes::DSP_S_IN_PLUGIN_MODE
    }

    /// Two lines of VFD text. The native side truncates each line to 16
    /// characters and does not understand multi-byte characters.
    pub fn set_vfd_text(&self, line1: &str, line2: &str) -> Result<(), ImonError> {
        let session = self.lock_connected()?;
        let line1 = CString::new(line1)?;
        let line2 = CString::new(line2)?;
        check(
            "IMON_Display_SetVfdText",
            session.port.set_vfd_text(&line1, &line2),
        )
    }

    pub fn set_vfd_eq_data(&self, levels: &BandLevels) -> Result<(), ImonError> {
        let session = self.lock_connected()?;
        let data = DspEqData::from(levels);
        check(
            "IMON_Display_SetVfdEqData",
            session.port.set_vfd_eq_data(&data),
        )
    }

    /// One line of LCD text, multi-byte safe. Text longer than the
    /// display area scrolls; the library posts
    /// `DSPNM_LCD_TEXT_SCROLL_DONE` when the scroll completes.
    pub fn set_lcd_text(&self, line: &str) -> Result<(), ImonError> {
        let session = self.lock_connected()?;
        let line = CString::new(line)?;
        check("IMON_Display_SetLcdText", session.port.set_lcd_text(&line))
    }

    pub fn set_lcd_all_icons(&self, on: bool) -> Result<(), ImonError> {
        let session = self.lock_connected()?;
        check(
            "IMON_Display_SetLcdAllIcons",
            session.port.set_lcd_all_icons(on),
        )
    }

    pub fn set_lcd_orange_icon(&self, icons: &OrangeIcons) -> Result<(), ImonError> {
        let session = self.lock_connected()?;
        let (slices, peel) = icons.pack();
        check(
            "IMON_Display_SetLcdOrangeIcon",
            session.port.set_lcd_orange_icon(slices, peel),
        )
    }

    pub fn set_lcd_media_type_icon(&self, icons: &MediaTypeIcons) -> Result<(), ImonError> {
        let session = self.lock_connected()?;
        check(
            "IMON_Display_SetLcdMediaTypeIcon",
            session.port.set_lcd_media_type_icon(icons.pack()),
        )
    }

    pub fn set_lcd_speaker_icon(&self, icons: &SpeakerIcons) -> Result<(), ImonError> {
        let session = self.lock_connected()?;
        let (first, second) = icons.pack();
        check(
            "IMON_Display_SetLcdSpeakerIcon",
            session.port.set_lcd_speaker_icon(first, second),
        )
    }

    pub fn set_lcd_video_codec_icon(&self, icons: &VideoCodecIcons) -> Result<(), ImonError> {
        let session = self.lock_connected()?;
        check(
            "IMON_Display_SetLcdVideoCodecIcon",
            session.port.set_lcd_video_codec_icon(icons.pack()),
        )
    }

    pub fn set_lcd_audio_codec_icon(&self, icons: &AudioCodecIcons) -> Result<(), ImonError> {
        let session = self.lock_connected()?;
        check(
            "IMON_Display_SetLcdAudioCodecIcon",
            session.port.set_lcd_audio_codec_icon(icons.pack()),
        )
    }

    pub fn set_lcd_aspect_ratio_icon(&self, icons: &AspectRatioIcons) -> Result<(), ImonError> {
        let session = self.lock_connected()?;
        check(
            "IMON_Display_SetLcdAspectRatioIcon",
            session.port.set_lcd_aspect_ratio_icon(icons.pack()),
        )
    }

    pub fn set_lcd_etc_icon(&self, icons: &EtcIcons) -> Result<(), ImonError> {
        let session = self.lock_connected()?;
        check(
            "IMON_Display_SetLcdEtcIcon",
            session.port.set_lcd_etc_icon(icons.pack()),
        )
    }

    pub fn set_lcd_progress(&self, progress: i32, total: i32) -> Result<(), ImonError> {
        let session = self.lock_connected()?;
        check(
            "IMON_Display_SetLcdProgress",
            session.port.set_lcd_progress(progress, total),
        )
    }

    /// Dual-channel LCD equalizer data.
    pub fn set_lcd_eq_data(&self, left: &BandLevels, right: &BandLevels) -> Result<(), ImonError> {
        let session = self.lock_connected()?;
        let left = DspEqData::from(left);
        let right = DspEqData::from(right);
        check(
            "IMON_Display_SetLcdEqData",
            session.port.set_lcd_eq_data(&left, &right),
        )
    }
}
