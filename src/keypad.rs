use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// The buttons the agent may press. Select is left out on purpose: it only
/// opens the item-swap menu in the overworld.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Down,
    Left,
    Right,
    Up,
    A,
    B,
    Start,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    Press(Button),
    Release(Button),
}

impl Button {
    pub const ALL: [Button; 7] = [
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Up,
        Button::A,
        Button::B,
        Button::Start,
    ];

    pub fn from_index(index: u8) -> Result<Button> {
        Button::ALL
            .get(index as usize)
            .copied()
            .ok_or(Error::InvalidAction(index))
    }

    pub fn press(self) -> KeyEvent {
        KeyEvent::Press(self)
    }

    pub fn release(self) -> KeyEvent {
        KeyEvent::Release(self)
    }

    /// Joypad mask bit for this button.
    ///  bit0 = Right
    ///  bit1 = Left
    ///  bit2 = Up
    ///  bit3 = Down
    ///  bit4 = A
    ///  bit5 = B
    ///  bit6 = Select
    ///  bit7 = Start
    pub fn mask(self) -> u8 {
        match self {
            Button::Right => 1 << 0,
            Button::Left => 1 << 1,
            Button::Up => 1 << 2,
            Button::Down => 1 << 3,
            Button::A => 1 << 4,
            Button::B => 1 << 5,
            Button::Start => 1 << 7,
        }
    }
}

/// Tracks which buttons are held and yields the joypad mask (1 = pressed).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Keypad {
    held: u8,
}

impl Keypad {
    pub fn new() -> Keypad {
        Keypad::default()
    }

    pub fn apply(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Press(b) => self.held |= b.mask(),
            KeyEvent::Release(b) => self.held &= !b.mask(),
        }
    }

    pub fn mask(&self) -> u8 {
        self.held
    }

    pub fn is_held(&self, button: Button) -> bool {
        self.held & button.mask() != 0
    }
}

#[cfg(test)]
mod test {
    use super::{Button, KeyEvent, Keypad};

    #[test]
    fn index_order_matches_action_space() {
        for (i, b) in Button::ALL.iter().enumerate() {
            assert_eq!(Button::from_index(i as u8).unwrap(), *b);
        }
        assert!(Button::from_index(7).is_err());
    }

    #[test]
    fn keys_buttons() {
        let mut keypad = Keypad::new();
        let keys0: [Button; 3] = [Button::A, Button::B, Button::Start];
        let bits = [4, 5, 7];

        for i in 0..keys0.len() {
            keypad.apply(keys0[i].press());
            assert_eq!(keypad.mask(), 1 << bits[i]);
            assert!(keypad.is_held(keys0[i]));

            keypad.apply(keys0[i].release());
            assert_eq!(keypad.mask(), 0);
        }
    }

    #[test]
    fn keys_direction() {
        let mut keypad = Keypad::new();
        let keys1: [Button; 4] = [Button::Right, Button::Left, Button::Up, Button::Down];

        for i in 0..keys1.len() {
            keypad.apply(KeyEvent::Press(keys1[i]));
            assert_eq!(keypad.mask(), 1 << i);

            keypad.apply(KeyEvent::Release(keys1[i]));
            assert_eq!(keypad.mask(), 0);
        }
    }

    #[test]
    fn held_buttons_combine() {
        let mut keypad = Keypad::new();
        keypad.apply(Button::Up.press());
        keypad.apply(Button::A.press());
        assert_eq!(keypad.mask(), 0x14);
        keypad.apply(Button::Up.release());
        assert_eq!(keypad.mask(), 0x10);
    }
}
