/*
 *  imon/notify.rs
 *
 *  imonctl - iMON display control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Asynchronous notification decode and dispatch
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

//! Turns raw `(code, payload)` pairs from the message channel into host
//! events.
//!
//! The dispatcher owns the only piece of asynchronous session state: the
//! idle/connected flag driven by plugin-mode negotiation. It never lets a
//! malformed or unrecognized message escape as an error; the channel must
//! stay available for whatever the library posts next.

use log::{error, info, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::codes;

/// A fire-and-forget notification to the host: an event name plus at most
/// one string payload (a symbolic code name or hex rendering).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEvent {
    pub name: &'static str,
    pub payload: Option<String>,
}

impl HostEvent {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            payload: None,
        }
    }

    pub fn with_payload(name: &'static str, payload: impl Into<String>) -> Self {
        Self {
            name,
            payload: Some(payload.into()),
        }
    }
}

pub type EventSender = UnboundedSender<HostEvent>;
pub type EventReceiver = UnboundedReceiver<HostEvent>;

/// Unbounded channel carrying [`HostEvent`]s to the host.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// The finite set of notifications the library posts, decoded from the
/// raw message pair. Payload meaning depends on the code: a display type
/// for connect/restart, an init-result cause for failures, unused
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    PluginSucceed { display: i32 },
    PluginFailed { cause: i32 },
    ImonRestarted { display: i32 },
    ImonClosed,
    HwConnected { display: i32 },
    HwDisconnected { cause: i32 },
    LcdTextScrollDone,
}

impl Notification {
    /// Decode a raw message pair. `None` for any code outside the closed
    /// set; the caller owns the diagnostic path. Discriminants are pinned
    /// to the `DSPNotifyCode` table by a test.
    pub fn decode(code: i32, payload: i32) -> Option<Self> {
        match code {
            0 => Some(Self::PluginSucceed { display: payload }),
            1 => Some(Self::PluginFailed { cause: payload }),
            2 => Some(Self::ImonRestarted { display: payload }),
            3 => Some(Self::ImonClosed),
            4 => Some(Self::HwConnected { display: payload }),
            5 => Some(Self::HwDisconnected { cause: payload }),
            0x1000 => Some(Self::LcdTextScrollDone),
            _ => None,
        }
    }
}

/// Plugin-mode session state as seen from the notification side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Idle,
    Connected,
}

/// Routes decoded notifications to host events.
pub struct NotificationDispatcher {
    state: LinkState,
    events: EventSender,
}

impl NotificationDispatcher {
    pub fn new(events: EventSender) -> Self {
        Self {
            state: LinkState::Idle,
            events,
        }
    }

    pub fn link_state(&self) -> LinkState {
        self.state
    }

    /// Dispatch one raw message pair. Infallible by contract: unknown
    /// codes and undecodable payloads downgrade to diagnostics.
    pub fn dispatch(&mut self, code: i32, payload: i32) {
        let Some(notification) = Notification::decode(code, payload) else {
            let label = codes::dsp_notify_code().name_or_hex(code);
            error!("Unhandled display notification: {label} (payload 0x{payload:04X})");
            self.emit(HostEvent::with_payload("notification.unhandled", label));
            return;
        };

        match notification {
            Notification::PluginSucceed { display } => {
                info!(
                    "Display plug-in mode granted: {}",
                    codes::dsp_type().name_or_hex(display)
                );
                self.state = LinkState::Connected;
                self.emit(HostEvent::new("imon.connected"));
            }
            Notification::PluginFailed { cause } => {
                let cause = codes::dsp_init_result().name_or_hex(cause);
                error!("iMON plugin failure: {cause}");
                self.state = LinkState::Idle;
                self.emit(HostEvent::with_payload("failure", cause));
            }
            Notification::ImonRestarted { display } => {
                // Manager restart only; a PLUGIN_SUCCEED/FAILED for the
                // renegotiation follows on its own.
                self.emit(HostEvent::with_payload(
                    "imon.restarted",
                    codes::dsp_type().name_or_hex(display),
                ));
            }
            Notification::ImonClosed => {
                self.state = LinkState::Idle;
                self.emit(HostEvent::new("imon.disconnected"));
            }
            Notification::HwConnected { display } => {
                info!(
                    "Display hardware connected: {}",
                    codes::dsp_type().name_or_hex(display)
                );
                self.emit(HostEvent::new("hardware.connected"));
            }
            Notification::HwDisconnected { cause } => {
                warn!(
                    "Display hardware disconnected: {}",
                    codes::dsp_init_result().name_or_hex(cause)
                );
                self.emit(HostEvent::new("hardware.disconnected"));
            }
            Notification::LcdTextScrollDone => {
                self.emit(HostEvent::new("scroll.complete"));
            }
        }
    }

    fn emit(&self, event: HostEvent) {
        if self.events.send(event).is_err() {
            warn!("Host event channel closed, dropping event");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatcher() -> (NotificationDispatcher, EventReceiver) {
        let (tx, rx) = event_channel();
        (NotificationDispatcher::new(tx), rx)
    }

    #[test]
    fn test_decode_agrees_with_the_code_table() {
        // The match above and the DSPNotifyCode table must not drift.
        for member in codes::dsp_notify_code().members() {
            assert!(
                Notification::decode(member.value(), 0).is_some(),
                "{} not decoded",
                member
            );
        }
        for raw in [-1, 6, 0x0FFF, 0x1001, 0xFFFF] {
            assert!(codes::dsp_notify_code().lookup_by_value(raw).is_err());
            assert!(Notification::decode(raw, 0).is_none());
        }
    }

    #[test]
    fn test_plugin_succeed_connects() {
        let (mut dispatcher, mut rx) = dispatcher();
        assert_eq!(dispatcher.link_state(), LinkState::Idle);

        dispatcher.dispatch(0, 0x01); // PLUGIN_SUCCEED, VFD
        assert_eq!(dispatcher.link_state(), LinkState::Connected);
        assert_eq!(rx.try_recv().unwrap(), HostEvent::new("imon.connected"));
    }

    #[test]
    fn test_plugin_failed_stays_idle_and_names_cause() {
        let (mut dispatcher, mut rx) = dispatcher();
        dispatcher.dispatch(1, 0x0101); // PLUGIN_FAILED, HW_DISCONNECTED
        assert_eq!(dispatcher.link_state(), LinkState::Idle);
        assert_eq!(
            rx.try_recv().unwrap(),
            HostEvent::with_payload("failure", "DSPN_ERR_HW_DISCONNECTED")
        );
    }

    #[test]
    fn test_imon_closed_disconnects() {
        let (mut dispatcher, mut rx) = dispatcher();
        dispatcher.dispatch(0, 0x02);
        let _ = rx.try_recv();

        dispatcher.dispatch(3, 0); // IMON_CLOSED
        assert_eq!(dispatcher.link_state(), LinkState::Idle);
        assert_eq!(rx.try_recv().unwrap(), HostEvent::new("imon.disconnected"));
    }

    #[test]
    fn test_restart_carries_display_type_without_state_change() {
        let (mut dispatcher, mut rx) = dispatcher();
        dispatcher.dispatch(0, 0x01);
        let _ = rx.try_recv();

        dispatcher.dispatch(2, 0x02); // IMON_RESTARTED, LCD
        assert_eq!(dispatcher.link_state(), LinkState::Connected);
        assert_eq!(
            rx.try_recv().unwrap(),
            HostEvent::with_payload("imon.restarted", "DSPN_DSP_LCD")
        );
    }

    #[test]
    fn test_hardware_events_leave_state_alone() {
        let (mut dispatcher, mut rx) = dispatcher();
        dispatcher.dispatch(4, 0x01); // HW_CONNECTED
        assert_eq!(dispatcher.link_state(), LinkState::Idle);
        assert_eq!(rx.try_recv().unwrap(), HostEvent::new("hardware.connected"));

        dispatcher.dispatch(5, 0x0101); // HW_DISCONNECTED
        assert_eq!(dispatcher.link_state(), LinkState::Idle);
        assert_eq!(
            rx.try_recv().unwrap(),
            HostEvent::new("hardware.disconnected")
        );
    }

    #[test]
    fn test_scroll_done() {
        let (mut dispatcher, mut rx) = dispatcher();
        dispatcher.dispatch(0x1000, 0);
        assert_eq!(rx.try_recv().unwrap(), HostEvent::new("scroll.complete"));
    }

    #[test]
    fn test_unknown_code_downgrades_and_recovers() {
        let (mut dispatcher, mut rx) = dispatcher();

        dispatcher.dispatch(0xFFFF, 0);
        assert_eq!(
            rx.try_recv().unwrap(),
            HostEvent::with_payload("notification.unhandled", "0xFFFF")
        );

        // The dispatcher stays usable after the bad message.
        dispatcher.dispatch(0, 0x01);
        assert_eq!(dispatcher.link_state(), LinkState::Connected);
        assert_eq!(rx.try_recv().unwrap(), HostEvent::new("imon.connected"));
    }

    #[test]
    fn test_combined_display_payload_never_aborts_dispatch() {
        // 0x03 (VFD+LCD) is payload-only; it renders as hex, it does not
        // fail the lookup path.
        let (mut dispatcher, mut rx) = dispatcher();
        dispatcher.dispatch(2, 0x03);
        assert_eq!(
            rx.try_recv().unwrap(),
            HostEvent::with_payload("imon.restarted", "0x0003")
        );
    }

    #[test]
    fn test_emit_survives_closed_channel() {
        let (tx, rx) = event_channel();
        drop(rx);
        let mut dispatcher = NotificationDispatcher::new(tx);
        dispatcher.dispatch(0, 0x01); // must not panic
        assert_eq!(dispatcher.link_state(), LinkState::Connected);
    }
}
