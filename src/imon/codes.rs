/*
 *  imon/codes.rs
 *
 *  imonctl - iMON display control
 *  (c) 2020-26 Stuart Hunter
 *
 *  Closed code tables for the SoundGraph display API
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

//! Closed, reverse-lookupable code tables.
//!
//! The vendor header (`iMONDisplayDefines.h`) defines four enumerations:
//! call results, plugin-mode init results, display types and notification
//! codes. Every raw `i32` crossing the native boundary is interpreted
//! through one of these tables, so diagnostics can always name the code
//! symbolically instead of printing a bare integer.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Error type for table definition and lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeSetError {
    #[error("duplicate member name {name} in {set}")]
    DuplicateName { set: &'static str, name: &'static str },
    #[error("{set}: value 0x{value:04X} assigned to both {first} and {second}")]
    ValueCollision {
        set: &'static str,
        first: &'static str,
        second: &'static str,
        value: i32,
    },
    #[error("no member named {name} in {set}")]
    UnknownMember { set: &'static str, name: String },
    #[error("no member of {set} has value 0x{value:04X}")]
    UnknownValue { set: &'static str, value: i32 },
    #[error("{set}: value 0x{value:04X} matches more than one member")]
    AmbiguousValue { set: &'static str, value: i32 },
}

/// A single named code. Immutable once defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeMember {
    name: &'static str,
    value: i32,
}

impl CodeMember {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn value(&self) -> i32 {
        self.value
    }
}

impl Ord for CodeMember {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.name, self.value).cmp(&(other.name, other.value))
    }
}

impl PartialOrd for CodeMember {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for CodeMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:04X})", self.name, self.value)
    }
}

/// An ordered, closed set of [`CodeMember`]s.
///
/// Built once from a declaration list where each entry is either
/// `(name, Some(value))` or `(name, None)` meaning "previous resolved
/// value + 1". The auto-increment counter is local to one `define` call;
/// it starts at 0 and follows whatever value the previous entry resolved
/// to, explicit or not.
#[derive(Debug)]
pub struct CodeSet {
    name: &'static str,
    members: Vec<CodeMember>,
    by_name: HashMap<&'static str, usize>,
}

impl CodeSet {
    /// Build a code set from a declaration list.
    ///
    /// Fails if two entries share a name or resolve to the same value;
    /// both indicate a broken table and are fatal at startup.
    pub fn define(
        name: &'static str,
        decls: &[(&'static str, Option<i32>)],
    ) -> Result<Self, CodeSetError> {
        let mut members: Vec<CodeMember> = Vec::with_capacity(decls.len());
        let mut by_name: HashMap<&'static str, usize> = HashMap::with_capacity(decls.len());
        let mut next_auto: i32 = 0;

        for &(member_name, explicit) in decls {
            let value = explicit.unwrap_or(next_auto);
            next_auto = value.wrapping_add(1);

            if by_name.contains_key(member_name) {
                return Err(CodeSetError::DuplicateName {
                    set: name,
                    name: member_name,
                });
            }

            if let Some(prior) = members.iter().find(|m| m.value == value) {
                return Err(CodeSetError::ValueCollision {
                    set: name,
                    first: prior.name,
                    second: member_name,
                    value,
                });
            }

            by_name.insert(member_name, members.len());
            members.push(CodeMember {
                name: member_name,
                value,
            });
        }

        Ok(Self {
            name,
            members,
            by_name,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Members in declaration order.
    pub fn members(&self) -> &[CodeMember] {
        &self.members
    }

    /// Forward lookup. Total over the declared names, O(1).
    pub fn lookup_by_name(&self, member_name: &str) -> Result<CodeMember, CodeSetError> {
        self.by_name
            .get(member_name)
            .map(|&idx| self.members[idx])
            .ok_or_else(|| CodeSetError::UnknownMember {
                set: self.name,
                name: member_name.to_string(),
            })
    }

    /// Reverse lookup. Scans all members; exactly one must match.
    ///
    /// The ambiguity arm is defensive: `define` already rejects value
    /// collisions, but the check stays because the scan is the contract.
    pub fn lookup_by_value(&self, value: i32) -> Result<CodeMember, CodeSetError> {
        let mut found: Option<CodeMember> = None;
        for member in &self.members {
            if member.value == value {
                if found.is_some() {
                    return Err(CodeSetError::AmbiguousValue {
                        set: self.name,
                        value,
                    });
                }
                found = Some(*member);
            }
        }
        found.ok_or(CodeSetError::UnknownValue {
            set: self.name,
            value,
        })
    }

    /// Symbolic name for a value, or its hex rendering when unknown.
    /// Never fails; used on diagnostic paths that must not abort.
    pub fn name_or_hex(&self, value: i32) -> String {
        match self.lookup_by_value(value) {
            Ok(member) => member.name().to_string(),
            Err(_) => format!("0x{:04X}", value),
        }
    }
}

// Raw values the binding compares against directly. Pinned to the tables
// below by test_well_known_values.
pub const DSP_SUCCEEDED: i32 = 0;
pub const DSP_S_INITED: i32 = 0x1000;
pub const DSP_S_IN_PLUGIN_MODE: i32 = 0x1002;

static DSP_RESULT: LazyLock<CodeSet> = LazyLock::new(|| {
    CodeSet::define(
        "DSPResult",
        &[
            ("DSP_SUCCEEDED", Some(0)),
            ("DSP_E_FAIL", None),
            ("DSP_E_OUTOFMEMORY", None),
            ("DSP_E_INVALIDARG", None),
            ("DSP_E_NOT_INITED", None),
            ("DSP_E_POINTER", None),
            ("DSP_S_INITED", Some(0x1000)),
            ("DSP_S_NOT_INITED", None),
            ("DSP_S_IN_PLUGIN_MODE", None),
            ("DSP_S_NOT_IN_PLUGIN_MODE", None),
        ],
    )
    .expect("DSPResult table is fixed by the vendor header")
});

static DSP_INIT_RESULT: LazyLock<CodeSet> = LazyLock::new(|| {
    CodeSet::define(
        "DSPNInitResult",
        &[
            ("DSPN_SUCCEEDED", Some(0)),
            ("DSPN_ERR_IN_USED", Some(0x0100)),
            ("DSPN_ERR_HW_DISCONNECTED", None),
            ("DSPN_ERR_NOT_SUPPORTED_HW", None),
            ("DSPN_ERR_PLUGIN_DISABLED", None),
            ("DSPN_ERR_IMON_NO_REPLY", None),
            ("DSPN_ERR_UNKNOWN", Some(0x0200)),
        ],
    )
    .expect("DSPNInitResult table is fixed by the vendor header")
});

static DSP_TYPE: LazyLock<CodeSet> = LazyLock::new(|| {
    // 0x03 (VFD+LCD) is a payload-only combination, deliberately absent:
    // reverse lookup of 0x03 must fail.
    CodeSet::define(
        "DSPType",
        &[
            ("DSPN_DSP_NONE", Some(0)),
            ("DSPN_DSP_VFD", Some(0x01)),
            ("DSPN_DSP_LCD", Some(0x02)),
        ],
    )
    .expect("DSPType table is fixed by the vendor header")
});

static DSP_NOTIFY_CODE: LazyLock<CodeSet> = LazyLock::new(|| {
    CodeSet::define(
        "DSPNotifyCode",
        &[
            ("DSPNM_PLUGIN_SUCCEED", Some(0)),
            ("DSPNM_PLUGIN_FAILED", None),
            ("DSPNM_IMON_RESTARTED", None),
            ("DSPNM_IMON_CLOSED", None),
            ("DSPNM_HW_CONNECTED", None),
            ("DSPNM_HW_DISCONNECTED", None),
            ("DSPNM_LCD_TEXT_SCROLL_DONE", Some(0x1000)),
        ],
    )
    .expect("DSPNotifyCode table is fixed by the vendor header")
});

/// Result codes returned by every vendor call.
pub fn dsp_result() -> &'static CodeSet {
    &DSP_RESULT
}

/// Plugin-mode negotiation results, delivered as notification payloads.
pub fn dsp_init_result() -> &'static CodeSet {
    &DSP_INIT_RESULT
}

/// Display hardware types, delivered as notification payloads.
pub fn dsp_type() -> &'static CodeSet {
    &DSP_TYPE
}

/// Notification codes posted on the message channel.
pub fn dsp_notify_code() -> &'static CodeSet {
    &DSP_NOTIFY_CODE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_tables() -> [&'static CodeSet; 4] {
        [dsp_result(), dsp_init_result(), dsp_type(), dsp_notify_code()]
    }

    #[test]
    fn test_round_trip_all_tables() {
        for table in all_tables() {
            for member in table.members() {
                let by_value = table.lookup_by_value(member.value()).unwrap();
                assert_eq!(by_value.name(), member.name());
                let by_name = table.lookup_by_name(member.name()).unwrap();
                assert_eq!(by_name.value(), member.value());
            }
        }
    }

    #[test]
    fn test_no_value_collisions() {
        for table in all_tables() {
            for (i, a) in table.members().iter().enumerate() {
                for b in &table.members()[i + 1..] {
                    assert_ne!(a.value(), b.value(), "{}: {} vs {}", table.name(), a, b);
                }
            }
        }
    }

    #[test]
    fn test_auto_increment_follows_previous_value() {
        let set = CodeSet::define(
            "Test",
            &[
                ("A", Some(0)),
                ("B", None),
                ("C", Some(10)),
                ("D", None),
            ],
        )
        .unwrap();
        assert_eq!(set.lookup_by_name("B").unwrap().value(), 1);
        assert_eq!(set.lookup_by_name("D").unwrap().value(), 11);
    }

    #[test]
    fn test_counter_is_local_to_definition() {
        // A second table starts from 0 again, regardless of what any
        // earlier definition resolved to.
        let _first = CodeSet::define("First", &[("X", Some(0x500)), ("Y", None)]).unwrap();
        let second = CodeSet::define("Second", &[("Z", None)]).unwrap();
        assert_eq!(second.lookup_by_name("Z").unwrap().value(), 0);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = CodeSet::define("Test", &[("A", Some(0)), ("A", Some(1))]).unwrap_err();
        assert!(matches!(err, CodeSetError::DuplicateName { name: "A", .. }));
    }

    #[test]
    fn test_value_collision_rejected() {
        let err = CodeSet::define("Test", &[("A", Some(3)), ("B", None), ("C", Some(4))])
            .unwrap_err();
        assert!(matches!(
            err,
            CodeSetError::ValueCollision {
                first: "B",
                second: "C",
                value: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_lookups() {
        let set = dsp_type();
        assert!(matches!(
            set.lookup_by_name("DSPN_DSP_OLED").unwrap_err(),
            CodeSetError::UnknownMember { .. }
        ));
        // VFD+LCD combination is payload-only, never a named member.
        assert!(matches!(
            set.lookup_by_value(0x03).unwrap_err(),
            CodeSetError::UnknownValue { value: 0x03, .. }
        ));
    }

    #[test]
    fn test_ambiguous_value_detected() {
        // define() rejects collisions, so build the broken set by hand to
        // exercise the defensive arm of the scan.
        let set = CodeSet {
            name: "Broken",
            members: vec![
                CodeMember { name: "A", value: 7 },
                CodeMember { name: "B", value: 7 },
            ],
            by_name: HashMap::new(),
        };
        assert!(matches!(
            set.lookup_by_value(7).unwrap_err(),
            CodeSetError::AmbiguousValue { value: 7, .. }
        ));
    }

    #[test]
    fn test_well_known_values() {
        assert_eq!(
            dsp_result().lookup_by_name("DSP_SUCCEEDED").unwrap().value(),
            DSP_SUCCEEDED
        );
        assert_eq!(
            dsp_result().lookup_by_name("DSP_S_INITED").unwrap().value(),
            DSP_S_INITED
        );
        assert_eq!(
            dsp_result()
                .lookup_by_name("DSP_S_IN_PLUGIN_MODE")
                .unwrap()
                .value(),
            DSP_S_IN_PLUGIN_MODE
        );
        assert_eq!(
            dsp_result().lookup_by_name("DSP_E_POINTER").unwrap().value(),
            5
        );
        assert_eq!(
            dsp_init_result()
                .lookup_by_name("DSPN_ERR_IMON_NO_REPLY")
                .unwrap()
                .value(),
            0x0104
        );
        assert_eq!(
            dsp_notify_code()
                .lookup_by_name("DSPNM_HW_DISCONNECTED")
                .unwrap()
                .value(),
            5
        );
        assert_eq!(
            dsp_notify_code()
                .lookup_by_name("DSPNM_LCD_TEXT_SCROLL_DONE")
                .unwrap()
                .value(),
            0x1000
        );
    }

    #[test]
    fn test_name_or_hex() {
        assert_eq!(dsp_type().name_or_hex(0x01), "DSPN_DSP_VFD");
        assert_eq!(dsp_type().name_or_hex(0x03), "0x0003");
    }

    #[test]
    fn test_member_ordering_is_by_name_then_value() {
        let a = CodeMember { name: "A", value: 9 };
        let b = CodeMember { name: "B", value: 1 };
        assert!(a < b);
    }
}
