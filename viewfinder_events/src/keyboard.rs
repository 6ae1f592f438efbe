// Copyright 2026 the Viewfinder Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

use crate::Modifiers;

/// A normalized keyboard event.
///
/// One value per native `keydown`/`keyup`; whether it is a press or release
/// is carried by which operation it is fed to, not by the event itself.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyEvent {
    /// The logical key value (DOM `key`), e.g. `"a"`, `"ArrowLeft"`, `"Escape"`.
    pub key: String,
    /// Modifier keys held when the event fired.
    pub modifiers: Modifiers,
    /// Whether this is an auto-repeat of a held key.
    pub repeat: bool,
    /// Event timestamp in milliseconds.
    pub time: f64,
}
