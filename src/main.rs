/*
 *  main.rs
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

use std::sync::Arc;
use std::time::Duration;

use env_logger::Env;
use log::{debug, error, info, warn};

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::mpsc;

use imonctl::actions::Actions;
use imonctl::config;
use imonctl::imon::notify::event_channel;
use imonctl::imon::{ImonDisplay, VendorLibrary};
use imonctl::plugin::{DisplayPlugin, RawNotification};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Asynchronously waits for a SIGINT, SIGTERM, or SIGHUP signal.
#[cfg(unix)]
async fn signal_handler() -> Result<(), Box<dyn std::error::Error>> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => info!("Received SIGINT"),
        _ = sigterm.recv() => info!("Received SIGTERM"),
        _ = sighup.recv() => info!("Received SIGHUP"),
    }
    Ok(())
}

#[cfg(not(unix))]
async fn signal_handler() -> Result<(), Box<dyn std::error::Error>> {
    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl-C");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = config::load()?;

    env_logger::Builder::from_env(
        Env::default().default_filter_or(cfg.log_level.as_deref().unwrap_or("info")),
    )
    .init();

    info!(
        "{} v{} (built {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        BUILD_DATE
    );

    let session_cfg = cfg.session.unwrap_or_default();

    // Bind the vendor library: explicit path from config, else search.
    let library = match session_cfg.library_path.as_ref() {
        Some(path) => VendorLibrary::load(path)?,
        None => VendorLibrary::load_default()?,
    };
    let display = Arc::new(ImonDisplay::new(Box::new(library)));

    let (event_tx, mut event_rx) = event_channel();
    // The Win32 message pump owning the sender half lives outside this
    // daemon; it posts (wparam, lparam) pairs from the registered window
    // message into this channel.
    let (_note_tx, note_rx) = mpsc::unbounded_channel::<RawNotification>();

    let hwnd = session_cfg.window_handle.unwrap_or_default();
    let msg = session_cfg.message_id.unwrap_or(0xC000);

    let mut plugin = DisplayPlugin::new(Arc::clone(&display), event_tx.clone());
    plugin.start(hwnd, msg, note_rx)?;

    // Relay host events to the log.
    let event_task = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event.payload {
                Some(payload) => info!("event: {} [{}]", event.name, payload),
                None => info!("event: {}", event.name),
            }
        }
    });

    // Optional clock: date and time on the VFD, refreshed once a second.
    let clock_task = if session_cfg.clock.unwrap_or(true) {
        let actions = Actions::new(Arc::clone(&display), event_tx.clone());
        Some(tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_secs(1));
            loop {
                tick.tick().await;
                if let Err(e) = actions.show_time() {
                    debug!("Clock update skipped: {e}");
                }
            }
        }))
    } else {
        None
    };

    if let Err(e) = signal_handler().await {
        warn!("Signal handler failed: {e}");
    }
    info!("Shutting down");

    if let Some(task) = clock_task {
        task.abort();
        let _ = task.await;
    }
    plugin.stop();

    // Drop every sender so the relay drains and ends.
    drop(plugin);
    drop(event_tx);
    if let Err(e) = event_task.await {
        if !e.is_cancelled() {
            error!("Event relay ended abnormally: {e}");
        }
    }

    Ok(())
}
