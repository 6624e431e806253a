use std::collections::HashSet;

use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, Touch, TouchPhase, WindowEvent};
use winit::keyboard::ModifiersState;

use crate::coords::Vec2;
use crate::input::{Flag, Flags, InputType, SInput, PRESSURE_UNKNOWN};
use crate::time::InputTimeS;

/// Contact id used for mouse samples. Touch ids are offset past it.
pub const MOUSE_INPUT_ID: u32 = 0;

/// Pixels per wheel "line" when the platform reports line deltas.
const WHEEL_LINE_PX: f32 = 40.0;

/// Translates winit window events into engine `SInput` samples.
///
/// winit reports mouse buttons without a position and touches without a
/// primary marker, so the translator keeps the little state needed to fill
/// those in.
#[derive(Debug, Default)]
pub struct WinitInputTranslator {
    cursor: Option<Vec2>,
    left_down: bool,
    right_down: bool,
    modifiers: Flags,
    active_touches: HashSet<u64>,
    primary_touch: Option<u64>,
}

impl WinitInputTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Translates a winit `WindowEvent` at `time_s` for a window with the given
    /// scale factor.
    ///
    /// Returns `None` for events not represented by the input subsystem.
    pub fn translate(
        &mut self,
        scale_factor: f64,
        event: &WindowEvent,
        time_s: InputTimeS,
    ) -> Option<SInput> {
        match event {
            WindowEvent::ModifiersChanged(m) => {
                self.modifiers = map_modifiers(m.state());
                None
            }

            WindowEvent::CursorMoved { position, .. } => {
                let pos = to_logical(scale_factor, *position);
                self.cursor = Some(pos);
                let mut flags = self.mouse_flags();
                flags.set(Flag::InContact, self.left_down || self.right_down);
                Some(self.mouse_input(flags, pos, time_s))
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let (flag, held) = match button {
                    MouseButton::Left => (Flag::Left, &mut self.left_down),
                    MouseButton::Right => (Flag::Right, &mut self.right_down),
                    _ => return None,
                };
                let pressed = *state == ElementState::Pressed;
                if *held == pressed {
                    return None;
                }
                *held = pressed;

                let pos = self.cursor.unwrap_or_default();
                let mut flags = self.mouse_flags().with(flag);
                if pressed {
                    flags = flags.with(Flag::TDown).with(Flag::InContact);
                } else {
                    flags = flags.with(Flag::TUp);
                }
                Some(self.mouse_input(flags, pos, time_s))
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let d = match delta {
                    MouseScrollDelta::LineDelta(x, y) => Vec2::new(*x, *y) * WHEEL_LINE_PX,
                    MouseScrollDelta::PixelDelta(p) => to_logical(scale_factor, *p),
                };
                Some(SInput {
                    input_type: InputType::Wheel,
                    id: MOUSE_INPUT_ID,
                    flags: self.modifiers.with(Flag::Wheel),
                    time_s,
                    screen_pos: self.cursor.unwrap_or_default(),
                    wheel_delta: d,
                    ..Default::default()
                })
            }

            WindowEvent::Touch(touch) => Some(self.translate_touch(scale_factor, touch, time_s)),

            _ => None,
        }
    }

    fn translate_touch(&mut self, scale_factor: f64, touch: &Touch, time_s: InputTimeS) -> SInput {
        let mut flags = self.modifiers.with(Flag::Left);
        match touch.phase {
            TouchPhase::Started => {
                if self.active_touches.is_empty() {
                    self.primary_touch = Some(touch.id);
                }
                self.active_touches.insert(touch.id);
                flags = flags.with(Flag::TDown).with(Flag::InContact);
            }
            TouchPhase::Moved => {
                flags = flags.with(Flag::InContact);
            }
            TouchPhase::Ended => {
                self.active_touches.remove(&touch.id);
                flags = flags.with(Flag::TUp);
            }
            TouchPhase::Cancelled => {
                self.active_touches.clear();
                flags = flags.with(Flag::Cancel);
            }
        }
        if self.primary_touch == Some(touch.id) {
            flags = flags.with(Flag::Primary);
        }
        if self.active_touches.is_empty() {
            self.primary_touch = None;
        }

        SInput {
            input_type: InputType::Touch,
            // Truncation is fine: ids only need to be distinct among live contacts.
            id: (touch.id as u32).wrapping_add(MOUSE_INPUT_ID + 1),
            flags,
            time_s,
            screen_pos: to_logical(scale_factor, touch.location),
            pressure: touch
                .force
                .map(|f| f.normalized() as f32)
                .unwrap_or(PRESSURE_UNKNOWN),
            ..Default::default()
        }
    }

    fn mouse_flags(&self) -> Flags {
        let mut flags = self.modifiers.with(Flag::Primary);
        flags.set(Flag::Left, self.left_down);
        flags.set(Flag::Right, self.right_down);
        flags
    }

    fn mouse_input(&self, flags: Flags, pos: Vec2, time_s: InputTimeS) -> SInput {
        SInput {
            input_type: InputType::Mouse,
            id: MOUSE_INPUT_ID,
            flags,
            time_s,
            screen_pos: pos,
            ..Default::default()
        }
    }
}

fn to_logical(scale_factor: f64, pos: PhysicalPosition<f64>) -> Vec2 {
    let logical = pos.to_logical::<f64>(scale_factor);
    Vec2::new(logical.x as f32, logical.y as f32)
}

fn map_modifiers(m: ModifiersState) -> Flags {
    let mut flags = Flags::NONE;
    flags.set(Flag::Shift, m.shift_key());
    flags.set(Flag::Control, m.control_key());
    flags.set(Flag::Alt, m.alt_key());
    flags.set(Flag::Meta, m.super_key());
    flags
}
