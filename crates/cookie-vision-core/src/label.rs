//! Game-state labels assigned by the operator

use serde::{Deserialize, Serialize};
use std::fmt;

/// Game state recorded alongside each captured frame.
///
/// The numeric codes are part of the on-disk format: they are what the
/// labels file stores and what downstream training code consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Label {
    /// Nothing of interest on screen
    Empty = 0,
    /// A golden cookie is visible
    GoldenCookie = 1,
    /// A click effect/buff overlay is active
    Effect = 2,
}

impl Label {
    /// All labels, in code order
    pub const ALL: [Label; 3] = [Label::Empty, Label::GoldenCookie, Label::Effect];

    /// The stored numeric code for this label
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Look up a label by its stored code
    pub fn from_code(code: u8) -> Option<Label> {
        match code {
            0 => Some(Label::Empty),
            1 => Some(Label::GoldenCookie),
            2 => Some(Label::Effect),
            _ => None,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Label::Empty => "Empty",
            Label::GoldenCookie => "Golden Cookie",
            Label::Effect => "Effect",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
