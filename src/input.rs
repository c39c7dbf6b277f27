//! Pointer and keyboard state for the viewer.
//!
//! Mouse and touch both drive the same pointer: the gravity well follows
//! whichever moved last. Pointer updates are coalesced per frame, so a burst
//! of `CursorMoved` events between two redraws becomes one
//! [`Driver::on_pointer_move`](crate::simulation::Driver::on_pointer_move).
//!
//! Keyboard handling is limited to the viewer's commands:
//!
//! | Key | Command |
//! |---|---|
//! | Space | [`Command::TogglePause`] |
//! | R | [`Command::Reset`] |
//! | Escape | [`Command::Quit`] |

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, TouchPhase, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// A viewer command bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    TogglePause,
    /// Rebuild the lattice at the current window size.
    Reset,
    Quit,
}

impl Command {
    fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::Space => Some(Command::TogglePause),
            KeyCode::KeyR => Some(Command::Reset),
            KeyCode::Escape => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Input state accumulated between frames.
#[derive(Debug, Default)]
pub struct Input {
    pointer: Option<Vec2>,
    pointer_moved: bool,

    keys_held: HashSet<KeyCode>,
    commands: Vec<Command>,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// The pointer position if it moved since the previous call.
    pub fn take_pointer_move(&mut self) -> Option<Vec2> {
        if std::mem::take(&mut self.pointer_moved) {
            self.pointer
        } else {
            None
        }
    }

    /// Commands triggered since the previous call, in key-press order.
    pub fn drain_commands(&mut self) -> std::vec::Drain<'_, Command> {
        self.commands.drain(..)
    }

    /// Process a winit window event.
    pub(crate) fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.move_pointer(Vec2::new(position.x as f32, position.y as f32));
            }

            WindowEvent::Touch(touch) => {
                if matches!(touch.phase, TouchPhase::Started | TouchPhase::Moved) {
                    self.move_pointer(Vec2::new(touch.location.x as f32, touch.location.y as f32));
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.press(key),
                        ElementState::Released => {
                            self.keys_held.remove(&key);
                        }
                    }
                }
            }

            _ => {}
        }
    }

    fn move_pointer(&mut self, position: Vec2) {
        self.pointer = Some(position);
        self.pointer_moved = true;
    }

    fn press(&mut self, key: KeyCode) {
        // Auto-repeat arrives as repeated presses; only the first one counts.
        if self.keys_held.insert(key) {
            if let Some(command) = Command::from_key(key) {
                self.commands.push(command);
            }
        }
    }
}
