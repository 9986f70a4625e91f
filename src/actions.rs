/*
 *  actions.rs
 *
 *  imonctl - iMON display control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Host-invocable display actions
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

//! The operations the host can invoke against an open session.
//!
//! Each action double-checks the library's own view of the session
//! (initialized and in plug-in mode) before issuing the command, and
//! emits a completion event the host can observe. Failures come back to
//! the caller; whether to log and continue or escalate is host policy.

use std::sync::Arc;

use chrono::Local;
use log::warn;

use crate::imon::notify::{EventSender, HostEvent};
use crate::imon::{
    AspectRatioIcons, AudioCodecIcons, BandLevels, EtcIcons, ImonDisplay, ImonError,
    MediaTypeIcons, OrangeIcons, SpeakerIcons, VideoCodecIcons,
};

pub struct Actions {
    display: Arc<ImonDisplay>,
    events: EventSender,
}

impl Actions {
    pub fn new(display: Arc<ImonDisplay>, events: EventSender) -> Self {
        Self { display, events }
    }

    /// The library must agree the session is live before a command goes
    /// out; a nominally open session with plug-in mode revoked fails
    /// here, not at the hardware.
    fn ensure_connected(&self) -> Result<(), ImonError> {
        if self.display.is_initialized() && self.display.is_plugin_mode_enabled() {
            Ok(())
        } else {
            Err(ImonError::NotConnected)
        }
    }

    fn emit(&self, name: &'static str) {
        if self.events.send(HostEvent::new(name)).is_err() {
            warn!("Host event channel closed, dropping event");
        }
    }

    /// Two lines of text on the VFD.
    pub fn set_display_text(&self, line1: &str, line2: &str) -> Result<(), ImonError> {
        self.ensure_connected()?;
        self.display.set_vfd_text(line1, line2)?;
        self.emit("vfd.setVfdText");
        Ok(())
    }

    /// Sixteen dense band levels on the VFD equalizer.
    pub fn set_equalizer_bands(&self, levels: &[i32]) -> Result<(), ImonError> {
        self.ensure_connected()?;
        self.display.set_vfd_eq_data(&BandLevels::from_slice(levels))?;
        self.emit("vfd.setVfdEqData");
        Ok(())
    }

    /// Current date and time on the VFD.
    pub fn show_time(&self) -> Result<(), ImonError> {
        let now = Local::now();
        let line1 = now.format("%x").to_string();
        let line2 = now.format("%I:%M %p").to_string();
        self.ensure_connected()?;
        self.display.set_vfd_text(&line1, &line2)?;
        self.emit("vfd.setVfdText");
        Ok(())
    }

    /// One line of LCD text; long text scrolls and completion arrives
    /// later as a `scroll.complete` event.
    pub fn set_lcd_line(&self, text: &str) -> Result<(), ImonError> {
        self.ensure_connected()?;
        self.display.set_lcd_text(text)?;
        self.emit("lcd.setLcdText");
        Ok(())
    }

    pub fn set_lcd_all_icons(&self, on: bool) -> Result<(), ImonError> {
        self.ensure_connected()?;
        self.display.set_lcd_all_icons(on)?;
        self.emit("lcd.setLcdAllIcons");
        Ok(())
    }

    pub fn set_orange_icon(&self, icons: &OrangeIcons) -> Result<(), ImonError> {
        self.ensure_connected()?;
        self.display.set_lcd_orange_icon(icons)?;
        self.emit("lcd.setLcdOrangeIcon");
        Ok(())
    }

    pub fn set_media_type_icon(&self, icons: &MediaTypeIcons) -> Result<(), ImonError> {
        self.ensure_connected()?;
        self.display.set_lcd_media_type_icon(icons)?;
        self.emit("lcd.setLcdMediaTypeIcon");
        Ok(())
    }

    pub fn set_speaker_icon(&self, icons: &SpeakerIcons) -> Result<(), ImonError> {
        self.ensure_connected()?;
        self.display.set_lcd_speaker_icon(icons)?;
        self.emit("lcd.setLcdSpeakerIcon");
        Ok(())
    }

    pub fn set_video_codec_icon(&self, icons: &VideoCodecIcons) -> Result<(), ImonError> {
        self.ensure_connected()?;
        self.display.set_lcd_video_codec_icon(icons)?;
        self.emit("lcd.setLcdVideoCodecIcon");
        Ok(())
    }

    pub fn set_audio_codec_icon(&self, icons: &AudioCodecIcons) -> Result<(), ImonError> {
        self.ensure_connected()?;
        self.display.set_lcd_audio_codec_icon(icons)?;
        self.emit("lcd.setLcdAudioCodecIcon");
        Ok(())
    }

    pub fn set_aspect_ratio_icon(&self, icons: &AspectRatioIcons) -> Result<(), ImonError> {
        self.ensure_connected()?;
        self.display.set_lcd_aspect_ratio_icon(icons)?;
        self.emit("lcd.setLcdAspectRatioIcon");
        Ok(())
    }

    pub fn set_etc_icon(&self, icons: &EtcIcons) -> Result<(), ImonError> {
        self.ensure_connected()?;
        self.display.set_lcd_etc_icon(icons)?;
        self.emit("lcd.setLcdEtcIcon");
        Ok(())
    }

    pub fn set_lcd_progress(&self, progress: i32, total: i32) -> Result<(), ImonError> {
        self.ensure_connected()?;
        self.display.set_lcd_progress(progress, total)?;
        self.emit("lcd.setLcdProgress");
        Ok(())
    }

    /// Dual-channel LCD equalizer, sixteen dense levels per side.
    pub fn set_lcd_stereo_eq(&self, left: &[i32], right: &[i32]) -> Result<(), ImonError> {
        self.ensure_connected()?;
        self.display
            .set_lcd_eq_data(&BandLevels::from_slice(left), &BandLevels::from_slice(right))?;
        self.emit("lcd.setLcdEqData");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imon::codes;
    use crate::imon::mock::MockPort;
    use crate::imon::notify::event_channel;

    fn connected_actions() -> (
        Actions,
        std::sync::Arc<std::sync::Mutex<crate::imon::mock::MockPortState>>,
        crate::imon::notify::EventReceiver,
    ) {
        let port = MockPort::new();
        let state = port.state();
        let display = Arc::new(ImonDisplay::new(Box::new(port)));
        display.initialize(0x10, 0xC050).unwrap();
        let (tx, rx) = event_channel();
        (Actions::new(display, tx), state, rx)
    }

    #[test]
    fn test_set_display_text_emits_completion() {
        let (actions, state, mut events) = connected_actions();
        actions.set_display_text("line one", "line two").unwrap();
        assert_eq!(
            state.lock().unwrap().last_vfd_text,
            Some(("line one".to_string(), "line two".to_string()))
        );
        assert_eq!(events.try_recv().unwrap(), HostEvent::new("vfd.setVfdText"));
    }

    #[test]
    fn test_equalizer_action_takes_dense_levels() {
        let (actions, state, mut events) = connected_actions();
        let levels: Vec<i32> = (1..=16).collect();
        actions.set_equalizer_bands(&levels).unwrap();
        let wire = state.lock().unwrap().last_vfd_eq.unwrap();
        assert_eq!(wire[0], 1);
        assert_eq!(wire[15], 16);
        assert_eq!(
            events.try_recv().unwrap(),
            HostEvent::new("vfd.setVfdEqData")
        );
    }

    #[test]
    fn test_show_time_writes_two_lines() {
        let (actions, state, _events) = connected_actions();
        actions.show_time().unwrap();
        let (line1, line2) = state.lock().unwrap().last_vfd_text.clone().unwrap();
        assert!(!line1.is_empty());
        // "%I:%M %p" always renders an AM/PM marker.
        assert!(line2.ends_with("AM") || line2.ends_with("PM"));
    }

    #[test]
    fn test_actions_gate_on_plugin_mode() {
        // Session flag is set, but the library reports plug-in mode lost.
        let port =
            MockPort::new().with_query_statuses(codes::DSP_S_INITED, codes::DSP_S_IN_PLUGIN_MODE + 1);
        let state = port.state();
        let display = Arc::new(ImonDisplay::new(Box::new(port)));
        display.initialize(0x10, 0xC050).unwrap();
        let (tx, mut events) = event_channel();
        let actions = Actions::new(display, tx);

        assert!(matches!(
            actions.set_display_text("a", "b").unwrap_err(),
            ImonError::NotConnected
        ));
        assert!(!state.lock().unwrap().calls.contains(&"set_vfd_text"));
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_lcd_actions_round_out_the_surface() {
        let (actions, state, mut events) = connected_actions();

        actions.set_lcd_line("A very long scrolling line").unwrap();
        actions.set_lcd_all_icons(true).unwrap();
        actions
            .set_media_type_icon(&MediaTypeIcons {
                music: true,
                ..Default::default()
            })
            .unwrap();
        actions.set_lcd_progress(30, 120).unwrap();
        actions.set_lcd_stereo_eq(&[10, 20], &[30, 40]).unwrap();

        let state = state.lock().unwrap();
        assert_eq!(
            state.last_lcd_text.as_deref(),
            Some("A very long scrolling line")
        );
        assert_eq!(state.last_all_icons, Some(true));
        assert_eq!(state.last_media_type, Some(0x80));
        assert_eq!(state.last_progress, Some((30, 120)));
        let (l, r) = state.last_lcd_eq.unwrap();
        assert_eq!((l[0], l[1]), (10, 20));
        assert_eq!((r[0], r[1]), (30, 40));

        for expected in [
            "lcd.setLcdText",
            "lcd.setLcdAllIcons",
            "lcd.setLcdMediaTypeIcon",
            "lcd.setLcdProgress",
            "lcd.setLcdEqData",
        ] {
            assert_eq!(events.try_recv().unwrap(), HostEvent::new(expected));
        }
    }
}
