#[cfg(feature = "opencv")]
pub mod highgui;

use crate::frame::{BoundingBox, Frame};
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[cfg(feature = "opencv")]
pub use self::highgui::HighguiInteraction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Quit,
    AddObject,
    None,
}

/// Key codes as reported by the window toolkit (lowest byte).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    pub quit: u8,
    pub add_object: u8,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: 27, // ESC
            add_object: b'p',
        }
    }
}

impl KeyBindings {
    pub fn signal(&self, key: i32) -> Signal {
        if key < 0 {
            return Signal::None;
        }
        let key = (key & 0xFF) as u8;
        if key == self.quit {
            Signal::Quit
        } else if key == self.add_object {
            Signal::AddObject
        } else {
            Signal::None
        }
    }
}

/// The human side of a session. Every call blocks until the user has answered.
pub trait Interaction {
    /// Initial selection; an empty result means the user selected nothing.
    fn select_many(&mut self, frame: &Frame) -> Result<Vec<BoundingBox>>;
    /// `None` if the selection was cancelled.
    fn select_one(&mut self, frame: &Frame) -> Result<Option<BoundingBox>>;
    fn show(&mut self, frame: &Frame) -> Result<()>;
    fn poll_signal(&mut self) -> Result<Signal>;
}
