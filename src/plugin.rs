/*
 *  plugin.rs
 *
 *  imonctl - iMON display control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Display session lifecycle - start/stop scoped acquisition
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

//! Scoped acquisition of the display session.
//!
//! `start()` registers the notification-channel handler first, then asks
//! the library for plug-in mode, so the asynchronous negotiation outcome
//! cannot slip past an unregistered handler. `stop()` is the matching
//! release: one `uninitialize` attempt and one channel deregistration on
//! every path, in that order, regardless of what fails in between.

use std::sync::Arc;

use log::{error, info, warn};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

use crate::imon::notify::{EventSender, HostEvent, NotificationDispatcher};
use crate::imon::{Hwnd, ImonDisplay, ImonError};

/// Raw notification pair as delivered by the message channel.
pub type RawNotification = (i32, i32);

pub struct DisplayPlugin {
    display: Arc<ImonDisplay>,
    events: EventSender,
    dispatch_task: Option<JoinHandle<()>>,
    started: bool,
}

impl DisplayPlugin {
    pub fn new(display: Arc<ImonDisplay>, events: EventSender) -> Self {
        Self {
            display,
            events,
            dispatch_task: None,
            started: false,
        }
    }

    pub fn display(&self) -> Arc<ImonDisplay> {
        Arc::clone(&self.display)
    }

    /// Open the session: spawn the dispatch task draining `notifications`
    /// into the [`NotificationDispatcher`], then request plug-in mode.
    ///
    /// An initialize failure leaves the handler registered (the matching
    /// `stop()` tears it down), mirroring the acquire/release pairing.
    pub fn start(
        &mut self,
        hwnd: Hwnd,
        msg: u32,
        notifications: UnboundedReceiver<RawNotification>,
    ) -> Result<(), ImonError> {
        if self.started {
            warn!("start() on an already started session");
            return Ok(());
        }

        let mut dispatcher = NotificationDispatcher::new(self.events.clone());
        let mut notifications = notifications;
        self.dispatch_task = Some(tokio::spawn(async move {
            while let Some((code, payload)) = notifications.recv().await {
                dispatcher.dispatch(code, payload);
            }
        }));
        self.started = true;

        match self.display.initialize(hwnd, msg) {
            Ok(()) => {
                info!("Display API initialized");
                self.emit(HostEvent::with_payload("init", "DSP_SUCCEEDED"));
                Ok(())
            }
            Err(e) => {
                error!("Unable to initialize display API: {e}");
                Err(e)
            }
        }
    }

    /// Close the session. Attempts `uninitialize` exactly once and
    /// removes the channel registration exactly once, even when the
    /// release call fails. Safe to call when never started.
    pub fn stop(&mut self) {
        if !self.started {
            warn!("stop() without a started session");
            return;
        }
        self.started = false;

        match self.display.uninitialize() {
            Ok(()) => {
                info!("Display API released");
                self.emit(HostEvent::with_payload("uninit", "DSP_SUCCEEDED"));
            }
            Err(e) => error!("Display release failed: {e}"),
        }

        // Deregistration happens whether or not the release succeeded.
        if let Some(task) = self.dispatch_task.take() {
            task.abort();
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
    use crate::imon::mock::MockPort;
    use crate::imon::notify::event_channel;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn plugin_with(port: MockPort) -> (DisplayPlugin, crate::imon::notify::EventReceiver) {
        let (event_tx, event_rx) = event_channel();
        let display = Arc::new(ImonDisplay::new(Box::new(port)));
        (DisplayPlugin::new(display, event_tx), event_rx)
    }

    #[tokio::test]
    async fn test_start_emits_init_and_relays_notifications() {
        let (mut plugin, mut events) = plugin_with(MockPort::new());
        let (note_tx, note_rx) = mpsc::unbounded_channel();

        plugin.start(0x10, 0xC050, note_rx).unwrap();
        assert_eq!(
            events.recv().await.unwrap(),
            HostEvent::with_payload("init", "DSP_SUCCEEDED")
        );

        note_tx.send((0, 0x01)).unwrap();
        assert_eq!(
            events.recv().await.unwrap(),
            HostEvent::new("imon.connected")
        );

        plugin.stop();
    }

    #[tokio::test]
    async fn test_start_failure_still_registers_handler() {
        // DSP_E_FAIL = 1
        let port = MockPort::new().with_init_status(1);
        let state = port.state();
        let (mut plugin, mut events) = plugin_with(port);
        let (note_tx, note_rx) = mpsc::unbounded_channel();

        let err = plugin.start(0, 0xC000, note_rx).unwrap_err();
        assert!(matches!(err, ImonError::NativeCallFailure { .. }));

        // Notifications still flow; the asynchronous failure path stays
        // observable even after a synchronous init failure.
        note_tx.send((1, 0x0103)).unwrap();
        assert_eq!(
            events.recv().await.unwrap(),
            HostEvent::with_payload("failure", "DSPN_ERR_PLUGIN_DISABLED")
        );

        plugin.stop();
        assert_eq!(state.lock().unwrap().uninit_count, 1);
    }

    #[tokio::test]
    async fn test_stop_releases_exactly_once_even_on_failure() {
        // DSP_E_FAIL = 1
        let port = MockPort::new().with_uninit_status(1);
        let state = port.state();
        let (mut plugin, mut events) = plugin_with(port);
        let (note_tx, note_rx) = mpsc::unbounded_channel();

        plugin.start(0x10, 0xC050, note_rx).unwrap();
        let _ = events.recv().await; // init event

        plugin.stop();
        plugin.stop(); // second stop is a no-op

        assert_eq!(state.lock().unwrap().uninit_count, 1);

        // The dispatch task is gone: its receiver drops, so the sender
        // observes a closed channel.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(note_tx.send((0, 0x01)).is_err());

        // A failed release emits no uninit event.
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_stop_success_emits_uninit() {
        let (mut plugin, mut events) = plugin_with(MockPort::new());
        let (_note_tx, note_rx) = mpsc::unbounded_channel();

        plugin.start(0x10, 0xC050, note_rx).unwrap();
        let _ = events.recv().await;

        plugin.stop();
        assert_eq!(
            events.recv().await.unwrap(),
            HostEvent::with_payload("uninit", "DSP_SUCCEEDED")
        );
    }
}
