// Host-side tests for the JSON events handed to the host page.

#![allow(dead_code)]
mod host_event {
    include!("../src/host_event.rs");
}

use glam::Vec3;
use host_event::HostEvent;
use pano_core::{
    FormTarget, HotspotForm, InfoPayload, Mode, OpenForm, SaveLedger, Scene, SessionEvent,
};
use serde_json::{json, Value};

fn to_value(ev: &SessionEvent) -> Value {
    let host = HostEvent::from_session(ev).expect("mapped");
    serde_json::from_str(&host.to_json().unwrap()).unwrap()
}

#[test]
fn scene_change_uses_camel_case_tag_and_fields() {
    let v = to_value(&SessionEvent::SceneChanged {
        scene_id: "lobby".into(),
        image_url: "https://cdn/lobby.jpg".into(),
    });
    assert_eq!(
        v,
        json!({"type": "sceneChanged", "sceneId": "lobby", "imageUrl": "https://cdn/lobby.jpg"})
    );
}

#[test]
fn show_info_carries_title_and_description() {
    let v = to_value(&SessionEvent::ShowInfo(InfoPayload {
        hotspot_id: "h1".into(),
        title: "Fireplace".into(),
        description: "Original 1920s tiles".into(),
    }));
    assert_eq!(v["type"], "showInfo");
    assert_eq!(v["hotspotId"], "h1");
    assert_eq!(v["description"], "Original 1920s tiles");
}

#[test]
fn placing_form_reports_position_not_id() {
    let v = to_value(&SessionEvent::FormOpened(OpenForm {
        scene_id: "lobby".into(),
        target: FormTarget::New {
            position: Vec3::new(500.0, 0.0, 0.0),
        },
        form: HotspotForm::default(),
    }));
    assert_eq!(v["type"], "formOpened");
    assert_eq!(v["hotspotId"], Value::Null);
    assert_eq!(v["position"], json!([500.0, 0.0, 0.0]));
    assert_eq!(v["form"]["type"], "info");
}

#[test]
fn editing_form_reports_hotspot_id() {
    let v = to_value(&SessionEvent::FormOpened(OpenForm {
        scene_id: "lobby".into(),
        target: FormTarget::Existing {
            hotspot_id: "h9".into(),
        },
        form: HotspotForm::default(),
    }));
    assert_eq!(v["hotspotId"], "h9");
    assert_eq!(v["position"], Value::Null);
}

#[test]
fn unit_and_mode_events() {
    assert_eq!(to_value(&SessionEvent::FormClosed), json!({"type": "formClosed"}));
    assert_eq!(
        to_value(&SessionEvent::ModeChanged(Mode::Edit)),
        json!({"type": "modeChanged", "mode": "edit"})
    );
}

#[test]
fn transition_events() {
    assert_eq!(
        to_value(&SessionEvent::TransitionStarted { target: "b".into() }),
        json!({"type": "transitionStarted", "target": "b"})
    );
    assert_eq!(
        to_value(&SessionEvent::TransitionFinished {
            scene_id: "b".into()
        }),
        json!({"type": "transitionFinished", "sceneId": "b"})
    );
}

#[test]
fn save_requests_are_not_mapped_directly() {
    let scene = Scene {
        id: "s".into(),
        title: "S".into(),
        image_url: "s.jpg".into(),
        hotspots: vec![],
    };
    let req = SaveLedger::new().issue("t", &scene);
    assert_eq!(HostEvent::from_session(&SessionEvent::SaveRequested(req)), None);
}

#[test]
fn save_failure_event_shape() {
    let ev = HostEvent::SaveFailed {
        scene_id: "s".into(),
        revision: 3,
        message: "offline".into(),
    };
    let v: Value = serde_json::from_str(&ev.to_json().unwrap()).unwrap();
    assert_eq!(
        v,
        json!({"type": "saveFailed", "sceneId": "s", "revision": 3, "message": "offline"})
    );
}
