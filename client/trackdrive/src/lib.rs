//! Joystick-driven car on a glTF race track using Bevy.
//!
//! This library exposes the engine-independent cores: drive commands, the
//! chase camera step, collision baking and the shared input snapshot.

pub mod input {
    pub mod shared;
}

pub mod vehicle {
    pub mod core;
}

pub mod camera {
    pub mod chase;
}

pub mod track {
    pub mod collision;
}
