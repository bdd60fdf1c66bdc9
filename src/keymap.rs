/// Keyboard actions available while the canvas has focus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyAction {
    /// Rotate the view by the given yaw/pitch in degrees.
    Look { yaw_deg: f32, pitch_deg: f32 },
    /// Close the info panel or the open hotspot form.
    Dismiss,
}

#[inline]
pub fn action_for_key(key: &str, step_deg: f32) -> Option<KeyAction> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(KeyAction::Look {
            yaw_deg: -step_deg,
            pitch_deg: 0.0,
        }),
        "ArrowRight" | "d" | "D" => Some(KeyAction::Look {
            yaw_deg: step_deg,
            pitch_deg: 0.0,
        }),
        "ArrowUp" | "w" | "W" => Some(KeyAction::Look {
            yaw_deg: 0.0,
            pitch_deg: step_deg,
        }),
        "ArrowDown" | "s" | "S" => Some(KeyAction::Look {
            yaw_deg: 0.0,
            pitch_deg: -step_deg,
        }),
        "Escape" => Some(KeyAction::Dismiss),
        _ => None,
    }
}
