/*
 *  imon/icons.rs
 *
 *  imonctl - iMON display control
 *  (c) 2020-26 Stuart Hunter
 *
 *  LCD icon segment bitfield packing
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

//! Named icon-segment flags and their wire bytes.
//!
//! The LCD's segment icons are driven by byte-sized bitfields, one or two
//! bytes per icon family. Each flag maps to one bit, most significant bit
//! first in declaration order; trailing unused bits stay zero.

/// MSB-first packing of up to 8 flags into one byte.
fn pack_bits(bits: &[bool]) -> u8 {
    debug_assert!(bits.len() <= 8);
    bits.iter()
        .enumerate()
        .fold(0u8, |byte, (i, &on)| if on { byte | (0x80 >> i) } else { byte })
}

/// Orange-disk icon on the upper left: eight slices plus the peel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrangeIcons {
    pub slices: [bool; 8],
    pub peel: bool,
}

impl OrangeIcons {
    /// (slices byte, peel byte). Slice 1 is the MSB; the peel is the MSB
    /// of the second byte.
    pub fn pack(&self) -> (u8, u8) {
        (pack_bits(&self.slices), pack_bits(&[self.peel]))
    }
}

/// Media-type icons across the top row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediaTypeIcons {
    pub music: bool,
    pub movie: bool,
    pub photo: bool,
    pub cd: bool,
    pub tv: bool,
    pub web: bool,
    pub news: bool,
}

impl MediaTypeIcons {
    pub fn pack(&self) -> u8 {
        pack_bits(&[
            self.music, self.movie, self.photo, self.cd, self.tv, self.web, self.news,
        ])
    }
}

/// Speaker-layout icons on the upper right.
///
/// The vendor header lists an RL bit between SR and SPDIF that the call
/// surface never exposed; RR lives alone in the second byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpeakerIcons {
    pub left: bool,
    pub center: bool,
    pub right: bool,
    pub surround_left: bool,
    pub lfe: bool,
    pub surround_right: bool,
    pub spdif: bool,
    pub rear_right: bool,
}

impl SpeakerIcons {
    pub fn pack(&self) -> (u8, u8) {
        (
            pack_bits(&[
                self.left,
                self.center,
                self.right,
                self.surround_left,
                self.lfe,
                self.surround_right,
                self.spdif,
            ]),
            pack_bits(&[self.rear_right]),
        )
    }
}

/// Video-codec icons on the lower row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VideoCodecIcons {
    pub mpg: bool,
    pub divx: bool,
    pub xvid: bool,
    pub wmv: bool,
    // The vendor header lists MPG twice in this row; the second entry is
    // carried as MP3. Unverified against real hardware.
    pub mp3: bool,
    pub ac3: bool,
    pub dts: bool,
    pub wma: bool,
}

impl VideoCodecIcons {
    pub fn pack(&self) -> u8 {
        pack_bits(&[
            self.mpg, self.divx, self.xvid, self.wmv, self.mp3, self.ac3, self.dts, self.wma,
        ])
    }
}

/// Audio-codec icons on the lower row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AudioCodecIcons {
    pub mp3: bool,
    pub ogg: bool,
    pub wma: bool,
    pub wav: bool,
}

impl AudioCodecIcons {
    pub fn pack(&self) -> u8 {
        pack_bits(&[self.mp3, self.ogg, self.wma, self.wav])
    }
}

/// Aspect-ratio icons on the lower right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AspectRatioIcons {
    pub src: bool,
    pub fit: bool,
    pub tv: bool,
    pub hdtv: bool,
    pub scr1: bool,
    pub scr2: bool,
}

impl AspectRatioIcons {
    pub fn pack(&self) -> u8 {
        pack_bits(&[
            self.src, self.fit, self.tv, self.hdtv, self.scr1, self.scr2,
        ])
    }
}

/// Remaining icons on the lower left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EtcIcons {
    pub repeat: bool,
    pub shuffle: bool,
    pub alarm: bool,
    pub rec: bool,
    pub vol: bool,
    pub time: bool,
}

impl EtcIcons {
    pub fn pack(&self) -> u8 {
        pack_bits(&[
            self.repeat,
            self.shuffle,
            self.alarm,
            self.rec,
            self.vol,
            self.time,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_bits_msb_first() {
        assert_eq!(pack_bits(&[true]), 0x80);
        assert_eq!(pack_bits(&[false, true]), 0x40);
        assert_eq!(pack_bits(&[true; 8]), 0xFF);
        assert_eq!(pack_bits(&[]), 0x00);
    }

    #[test]
    fn test_media_type_music_and_movie() {
        let icons = MediaTypeIcons {
            music: true,
            movie: true,
            ..Default::default()
        };
        assert_eq!(icons.pack(), 0xC0);
    }

    #[test]
    fn test_media_type_news_is_second_lowest_bit() {
        // Seven declared flags; the trailing bit stays clear.
        let icons = MediaTypeIcons {
            news: true,
            ..Default::default()
        };
        assert_eq!(icons.pack(), 0x02);
    }

    #[test]
    fn test_orange_bytes() {
        let mut icons = OrangeIcons::default();
        icons.slices[0] = true;
        icons.slices[7] = true;
        icons.peel = true;
        assert_eq!(icons.pack(), (0x81, 0x80));

        assert_eq!(OrangeIcons::default().pack(), (0x00, 0x00));
    }

    #[test]
    fn test_speaker_two_bytes() {
        let icons = SpeakerIcons {
            left: true,
            spdif: true,
            rear_right: true,
            ..Default::default()
        };
        let (b1, b2) = icons.pack();
        assert_eq!(b1, 0x82);
        assert_eq!(b2, 0x80);
    }

    #[test]
    fn test_video_codec_full_row() {
        let icons = VideoCodecIcons {
            mpg: true,
            divx: true,
            xvid: true,
            wmv: true,
            mp3: true,
            ac3: true,
            dts: true,
            wma: true,
        };
        assert_eq!(icons.pack(), 0xFF);
    }

    #[test]
    fn test_audio_codec_trailing_bits_zero() {
        let icons = AudioCodecIcons {
            wav: true,
            ..Default::default()
        };
        assert_eq!(icons.pack(), 0x10);
    }

    #[test]
    fn test_aspect_and_etc() {
        let aspect = AspectRatioIcons {
            src: true,
            scr2: true,
            ..Default::default()
        };
        assert_eq!(aspect.pack(), 0x84);

        let etc = EtcIcons {
            repeat: true,
            time: true,
            ..Default::default()
        };
        assert_eq!(etc.pack(), 0x84);
    }
}
