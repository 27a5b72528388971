//! Hotkey bindings for replaying recent text entries.
//!
//! A binding is one modifier set plus one digit key. The digit doubles as the
//! slot: `Ctrl+Alt+1` replays the most recent text, `Ctrl+Alt+2` the one
//! before it, and so on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShortcutConfigError {
    #[error("unknown modifier `{0}` (expected Ctrl, Alt or Shift)")]
    UnknownModifier(String),

    #[error("modifier set must contain at least one of Ctrl, Alt, Shift")]
    EmptyModifiers,

    #[error("digit must be between 1 and 9, got {0}")]
    DigitOutOfRange(u8),

    #[error("shortcut count must be between 1 and 9, got {0}")]
    CountOutOfRange(u8),
}

/// Any non-empty combination of Ctrl, Alt and Shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierSet {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

impl ModifierSet {
    pub const CTRL_ALT: Self = Self {
        ctrl: true,
        alt: true,
        shift: false,
    };

    pub fn is_empty(&self) -> bool {
        !(self.ctrl || self.alt || self.shift)
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<&str> = [
            (self.ctrl, "Ctrl"),
            (self.alt, "Alt"),
            (self.shift, "Shift"),
        ]
        .into_iter()
        .filter_map(|(on, name)| on.then_some(name))
        .collect();
        f.write_str(&parts.join("+"))
    }
}

impl FromStr for ModifierSet {
    type Err = ShortcutConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = ModifierSet::default();
        for part in s.split('+').map(str::trim).filter(|p| !p.is_empty()) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => set.ctrl = true,
                "alt" => set.alt = true,
                "shift" => set.shift = true,
                _ => return Err(ShortcutConfigError::UnknownModifier(part.to_string())),
            }
        }
        if set.is_empty() {
            return Err(ShortcutConfigError::EmptyModifiers);
        }
        Ok(set)
    }
}

impl Serialize for ModifierSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ModifierSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Digit key 1..=9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digit(u8);

impl Digit {
    pub fn new(value: u8) -> Result<Self, ShortcutConfigError> {
        if (1..=9).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ShortcutConfigError::DigitOutOfRange(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HotkeyBinding {
    pub modifiers: ModifierSet,
    pub digit: Digit,
}

impl HotkeyBinding {
    pub fn new(modifiers: ModifierSet, digit: Digit) -> Self {
        Self { modifiers, digit }
    }

    /// Reverse-order position in the text history (1 = most recent).
    pub fn slot(&self) -> usize {
        self.digit.get() as usize
    }
}

impl fmt::Display for HotkeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.modifiers, self.digit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortcutConfig {
    pub enabled: bool,
    pub modifiers: ModifierSet,
    pub digit_count: u8,
}

impl Default for ShortcutConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            modifiers: ModifierSet::CTRL_ALT,
            digit_count: 9,
        }
    }
}

impl ShortcutConfig {
    pub fn validate(&self) -> Result<(), ShortcutConfigError> {
        if self.modifiers.is_empty() {
            return Err(ShortcutConfigError::EmptyModifiers);
        }
        if !(1..=9).contains(&self.digit_count) {
            return Err(ShortcutConfigError::CountOutOfRange(self.digit_count));
        }
        Ok(())
    }

    /// Bindings for digits `1..=digit_count`, empty when disabled.
    pub fn bindings(&self) -> Result<Vec<HotkeyBinding>, ShortcutConfigError> {
        if !self.enabled {
            return Ok(Vec::new());
        }
        self.validate()?;
        (1..=self.digit_count)
            .map(|d| Digit::new(d).map(|digit| HotkeyBinding::new(self.modifiers, digit)))
            .collect()
    }
}
