/*
 *  imon/mod.rs
 *
 *  imonctl - iMON display control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Module root for the display API binding
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

//! Binding for the SoundGraph iMON display API.
//!
//! Layering, bottom up: [`codes`] (closed vendor code tables), [`bands`]
//! and [`icons`] (wire marshaling), [`ffi`] (C ABI types), [`traits`]
//! (the raw call surface), [`library`] (dynamic-library loader), [`api`]
//! (the typed session) and [`notify`] (asynchronous notification
//! dispatch). [`mock`] provides a recording port for tests without
//! hardware.

// Closed code tables and marshaling
pub mod bands;
pub mod codes;
pub mod icons;

// Native call surface
pub mod api;
pub mod error;
pub mod ffi;
pub mod library;
pub mod traits;

// Recording port for tests and dry runs
pub mod mock;

// Asynchronous notification dispatch
pub mod notify;

// Re-exports for convenience
pub use api::ImonDisplay;
pub use bands::{BAND_COUNT, BandLevels};
pub use error::ImonError;
pub use ffi::Hwnd;
pub use icons::{
    AspectRatioIcons, AudioCodecIcons, EtcIcons, MediaTypeIcons, OrangeIcons, SpeakerIcons,
    VideoCodecIcons,
};
pub use library::VendorLibrary;
pub use notify::{HostEvent, LinkState, Notification, NotificationDispatcher};
pub use traits::DisplayPort;
