/*
 *  lib.rs
 *
 *  imonctl - iMON display control
 *  (c) 2020-26 Stuart Hunter
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

//! Host-side control for SoundGraph iMON VFD/LCD displays.
//!
//! [`imon`] is the protocol core: the closed vendor code tables, wire
//! marshaling, the dynamic-library binding and the asynchronous
//! notification dispatcher. [`plugin`] pairs session acquisition with
//! guaranteed release, [`actions`] is the operation surface a host
//! invokes against an open session, and [`config`] layers YAML and CLI
//! settings for the daemon binary.

pub mod actions;
pub mod config;
pub mod imon;
pub mod plugin;
