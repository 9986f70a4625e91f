/*
 *  config.rs
 *
 *  imonctl - iMON display control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Configuration loading: YAML file + CLI overrides
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

use clap::{ArgAction, Parser, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level app configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// General options
    pub log_level: Option<String>, // e.g., "info" | "debug"
    /// Display session wiring
    pub session: Option<SessionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionConfig {
    /// Full path to iMONDisplay.dll (overrides the search paths)
    pub library_path: Option<PathBuf>,
    /// Window handle the library posts notifications to
    pub window_handle: Option<usize>,
    /// Registered window message id for notifications (0xC000..=0xFFFF)
    pub message_id: Option<u32>,
    /// Drive a date/time clock onto the VFD once a second
    pub clock: Option<bool>,
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone)]
#[command(
    name = "imonctl",
    version,
    about = "iMON VFD/LCD display control daemon"
)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// Full path to iMONDisplay.dll
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub library: Option<PathBuf>,
    #[arg(long)]
    pub window_handle: Option<usize>,
    #[arg(long)]
    pub message_id: Option<u32>,
    #[arg(long, action = ArgAction::Set)]
    pub clock: Option<bool>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

/// Public entry point: parse CLI, read YAML, merge, validate.
pub fn load() -> Result<Config, ConfigError> {
    let cli = Cli::parse();
    load_from(&cli)
}

/// Same pipeline with an explicit CLI, for tests.
pub fn load_from(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;

    if cli.dump_config {
        // Pretty YAML of effective config (nice for debugging)
        let s = serde_yaml::to_string(&cfg)?;
        println!("{s}");
        std::process::exit(0);
    }

    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/imonctl/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/imonctl/config.yaml");
        if p.exists() {
            return Some(p);
        }
        let p = home.join(".config/imonctl.yaml");
        if p.exists() {
            return Some(p);
        }
    }
    // project local
    for candidate in &["imonctl.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() {
            return Some(p);
        }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some() {
        dst.log_level = src.log_level;
    }
    match (&mut dst.session, src.session) {
        (None, Some(s)) => dst.session = Some(s),
        (Some(d), Some(s)) => merge_session(d, s),
        _ => {}
    }
}

fn merge_session(dst: &mut SessionConfig, src: SessionConfig) {
    if src.library_path.is_some() {
        dst.library_path = src.library_path;
    }
    if src.window_handle.is_some() {
        dst.window_handle = src.window_handle;
    }
    if src.message_id.is_some() {
        dst.message_id = src.message_id;
    }
    if src.clock.is_some() {
        dst.clock = src.clock;
    }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some() {
        cfg.log_level = cli.log_level.clone();
    }
    let any_session = cli.library.is_some()
        || cli.window_handle.is_some()
        || cli.message_id.is_some()
        || cli.clock.is_some();

    if any_session && cfg.session.is_none() {
        cfg.session = Some(SessionConfig::default());
    }
    if let Some(session) = cfg.session.as_mut() {
        if cli.library.is_some() {
            session.library_path = cli.library.clone();
        }
        if cli.window_handle.is_some() {
            session.window_handle = cli.window_handle;
        }
        if cli.message_id.is_some() {
            session.message_id = cli.message_id;
        }
        if cli.clock.is_some() {
            session.clock = cli.clock;
        }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(session) = cfg.session.as_ref() {
        if let Some(msg) = session.message_id {
            // RegisterWindowMessage hands out ids in this range; anything
            // else collides with system messages.
            if !(0xC000..=0xFFFF).contains(&msg) {
                return Err(ConfigError::Validation(
                    "session message_id must be within 0xC000..=0xFFFF".into(),
                ));
            }
        }
        if let Some(path) = session.library_path.as_ref() {
            if !path.exists() {
                return Err(ConfigError::Validation(format!(
                    "session library_path does not exist: {}",
                    path.display()
                )));
            }
        }
    }
    Ok(())
}
