// Copyright 2026 the Stratum Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mouse buttons and pressed-button masks.

use bitflags::bitflags;

bitflags! {
    /// The set of mouse buttons held down at one instant.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MouseButtons: u8 {
        /// Usually the left button.
        const PRIMARY = 1 << 0;
        /// Usually the right button.
        const SECONDARY = 1 << 1;
        /// The wheel button.
        const MIDDLE = 1 << 2;
        /// First side button (typically "back").
        const SIDE_1 = 1 << 3;
        /// Second side button (typically "forward").
        const SIDE_2 = 1 << 4;
    }
}

/// A single mouse button, as reported in press and release events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MouseButton {
    /// Usually the left button.
    Primary,
    /// Usually the right button.
    Secondary,
    /// The wheel button.
    Middle,
    /// First side button.
    Side1,
    /// Second side button.
    Side2,
}

impl MouseButton {
    /// Every button, in the order events are emitted.
    pub const ALL: [Self; 5] = [
        Self::Primary,
        Self::Secondary,
        Self::Middle,
        Self::Side1,
        Self::Side2,
    ];

    /// Returns the single-bit mask for this button.
    #[must_use]
    pub const fn mask(self) -> MouseButtons {
        match self {
            Self::Primary => MouseButtons::PRIMARY,
            Self::Secondary => MouseButtons::SECONDARY,
            Self::Middle => MouseButtons::MIDDLE,
            Self::Side1 => MouseButtons::SIDE_1,
            Self::Side2 => MouseButtons::SIDE_2,
        }
    }

    /// Position of this button in [`MouseButton::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Primary => 0,
            Self::Secondary => 1,
            Self::Middle => 2,
            Self::Side1 => 3,
            Self::Side2 => 4,
        }
    }
}

impl From<MouseButton> for MouseButtons {
    fn from(button: MouseButton) -> Self {
        button.mask()
    }
}

impl MouseButtons {
    /// Iterates the buttons in this mask, in [`MouseButton::ALL`] order.
    pub fn buttons(self) -> impl Iterator<Item = MouseButton> {
        MouseButton::ALL
            .into_iter()
            .filter(move |button| self.contains(button.mask()))
    }

    /// Buttons held now that were not held in `previous`.
    pub fn pressed_since(self, previous: Self) -> impl Iterator<Item = MouseButton> {
        self.difference(previous).buttons()
    }

    /// Buttons held in `previous` that are no longer held.
    pub fn released_since(self, previous: Self) -> impl Iterator<Item = MouseButton> {
        previous.difference(self).buttons()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_between_masks() {
        let before = MouseButtons::PRIMARY | MouseButtons::MIDDLE;
        let after = MouseButtons::MIDDLE | MouseButtons::SIDE_2 | MouseButtons::SECONDARY;

        let pressed: Vec<_> = after.pressed_since(before).collect();
        assert_eq!(pressed, vec![MouseButton::Secondary, MouseButton::Side2]);

        let released: Vec<_> = after.released_since(before).collect();
        assert_eq!(released, vec![MouseButton::Primary]);
    }

    #[test]
    fn unchanged_mask_has_no_edges() {
        let mask = MouseButtons::all();
        assert_eq!(mask.pressed_since(mask).count(), 0);
        assert_eq!(mask.released_since(mask).count(), 0);
        assert_eq!(mask.buttons().count(), 5);
    }
}
