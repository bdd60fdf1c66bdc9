// Host-side tests for keyboard mapping.

#![allow(dead_code)]
mod keymap {
    include!("../src/keymap.rs");
}

use keymap::*;

#[test]
fn arrows_and_wasd_agree() {
    for (arrow, letter) in [
        ("ArrowLeft", "a"),
        ("ArrowRight", "d"),
        ("ArrowUp", "w"),
        ("ArrowDown", "s"),
    ] {
        assert_eq!(action_for_key(arrow, 5.0), action_for_key(letter, 5.0));
        assert_eq!(
            action_for_key(letter, 5.0),
            action_for_key(&letter.to_uppercase(), 5.0)
        );
    }
}

#[test]
fn left_turns_negative_yaw() {
    assert_eq!(
        action_for_key("ArrowLeft", 5.0),
        Some(KeyAction::Look {
            yaw_deg: -5.0,
            pitch_deg: 0.0
        })
    );
}

#[test]
fn up_raises_pitch_by_step() {
    assert_eq!(
        action_for_key("w", 2.5),
        Some(KeyAction::Look {
            yaw_deg: 0.0,
            pitch_deg: 2.5
        })
    );
}

#[test]
fn escape_dismisses() {
    assert_eq!(action_for_key("Escape", 5.0), Some(KeyAction::Dismiss));
}

#[test]
fn other_keys_are_ignored() {
    for key in ["q", "Enter", " ", "Tab", "1"] {
        assert_eq!(action_for_key(key, 5.0), None, "{key}");
    }
}
