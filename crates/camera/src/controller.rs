use crate::camera::Movement;

/// Which movement keys are currently held down.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct MovementKeys {
    is_forward_pressed: bool,
    is_backward_pressed: bool,
    is_left_pressed: bool,
    is_right_pressed: bool,
}

impl MovementKeys {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, movement: Movement, pressed: bool) {
        *self.slot(movement) = pressed;
    }

    pub fn is_held(&self, movement: Movement) -> bool {
        match movement {
            Movement::Forward => self.is_forward_pressed,
            Movement::Backward => self.is_backward_pressed,
            Movement::StrafeLeft => self.is_left_pressed,
            Movement::StrafeRight => self.is_right_pressed,
        }
    }

    /// The held movements, in [`Movement::ALL`] order.
    pub fn held(&self) -> impl Iterator<Item = Movement> + '_ {
        Movement::ALL.into_iter().filter(move |m| self.is_held(*m))
    }

    /// Releases everything, e.g. when the window loses focus and key-up
    /// events will never arrive.
    pub fn release_all(&mut self) {
        *self = Self::default();
    }

    fn slot(&mut self, movement: Movement) -> &mut bool {
        match movement {
            Movement::Forward => &mut self.is_forward_pressed,
            Movement::Backward => &mut self.is_backward_pressed,
            Movement::StrafeLeft => &mut self.is_left_pressed,
            Movement::StrafeRight => &mut self.is_right_pressed,
        }
    }
}
