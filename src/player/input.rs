/// Discrete input events forwarded by the host's event handlers.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum InputEvent {
    PointerDown,
    PointerUp,
    PlacePressed,
}

#[derive(Default, Clone, Copy, Debug)]
pub struct InputState {
    /// Held between pointer down and pointer up.
    pub breaking: bool,
    /// Set by a place key press, consumed by the next frame.
    pub place_requested: bool,
}

impl InputState {
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerDown => self.breaking = true,
            InputEvent::PointerUp => self.breaking = false,
            InputEvent::PlacePressed => self.place_requested = true,
        }
    }

    /// Take the pending place request, leaving it cleared.
    pub fn take_place_request(&mut self) -> bool {
        std::mem::take(&mut self.place_requested)
    }
}
