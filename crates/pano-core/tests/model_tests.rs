// Tour document, validation, config and the animation primitives.

use glam::Vec3;
use pano_core::*;

const TOUR_JSON: &str = r#"{
  "id": "t1",
  "title": "Museum",
  "startingSceneId": "lobby",
  "scenes": [
    {
      "id": "lobby",
      "title": "Lobby",
      "imageUrl": "https://cdn.test/lobby.jpg",
      "hotspots": [
        {
          "id": "h1",
          "type": "navigation",
          "title": "To gallery",
          "targetSceneId": "gallery",
          "position": { "x": 0.0, "y": 0.0, "z": -500.0 }
        },
        {
          "id": "h2",
          "type": "info",
          "title": "Welcome",
          "description": "Opening hours 9-5",
          "position": { "x": 500.0, "y": 0.0, "z": 0.0 },
          "iconUrl": "https://cdn.test/i.png",
          "iconSize": { "width": 32.0, "height": 32.0 }
        }
      ]
    },
    {
      "id": "gallery",
      "title": "Gallery",
      "imageUrl": "https://cdn.test/gallery.jpg"
    }
  ]
}"#;

#[test]
fn tour_document_round_trips() {
    let tour = Tour::from_json(TOUR_JSON).unwrap();
    assert_eq!(tour.scenes.len(), 2);
    assert!(tour.scenes[1].hotspots.is_empty());
    let h = tour.scene("lobby").unwrap().hotspot("h1").unwrap();
    assert_eq!(h.kind, HotspotKind::Navigation);
    assert_eq!(h.position, Vec3::new(0.0, 0.0, -500.0));

    let again = Tour::from_json(&tour.to_json().unwrap()).unwrap();
    assert_eq!(again, tour);
}

#[test]
fn serialized_hotspot_uses_wire_names() {
    let tour = Tour::from_json(TOUR_JSON).unwrap();
    let v: serde_json::Value = serde_json::from_str(&tour.to_json().unwrap()).unwrap();
    let h = &v["scenes"][0]["hotspots"][0];
    assert_eq!(h["type"], "navigation");
    assert_eq!(h["targetSceneId"], "gallery");
    assert_eq!(h["position"]["z"], -500.0);
    assert!(h.get("iconUrl").is_none());
}

#[test]
fn malformed_document_is_an_error() {
    assert!(matches!(Tour::from_json("{\"id\":1}"), Err(TourError::Json(_))));
}

#[test]
fn scene_lifecycle_keeps_starting_scene_valid() {
    let mut tour = Tour::from_json(TOUR_JSON).unwrap();
    let added = Scene::new_from_upload("Garden", "https://cdn.test/garden.jpg");
    let added_id = added.id.clone();
    tour.push_scene(added.clone()).unwrap();
    assert!(matches!(
        tour.push_scene(added),
        Err(TourError::DuplicateScene(_))
    ));

    tour.rename_scene(&added_id, "Back garden").unwrap();
    assert_eq!(tour.scene(&added_id).unwrap().title, "Back garden");

    tour.remove_scene("lobby").unwrap();
    assert_eq!(tour.starting_scene_id.as_deref(), Some("gallery"));
    assert_eq!(tour.starting_scene().unwrap().id, "gallery");
}

#[test]
fn removing_a_target_scene_surfaces_broken_links() {
    let mut tour = Tour::from_json(TOUR_JSON).unwrap();
    assert!(tour.broken_links().is_empty());
    tour.remove_scene("gallery").unwrap();
    let broken = tour.broken_links();
    assert_eq!(broken.len(), 1);
    assert_eq!(broken[0].hotspot_id, "h1");
    assert_eq!(
        broken[0].problem,
        LinkProblem::UnknownTarget("gallery".to_string())
    );
}

fn tour() -> Tour {
    Tour::from_json(TOUR_JSON).unwrap()
}

#[test]
fn validation_rules() {
    let icons = UploadConstraints::icons();
    let t = tour();
    let base = HotspotForm {
        title: "Sign".to_string(),
        description: Some("text".to_string()),
        ..HotspotForm::default()
    };
    assert_eq!(validate(&base, "lobby", &t, &icons), Ok(()));

    let no_title = HotspotForm {
        title: "  ".to_string(),
        ..base.clone()
    };
    assert_eq!(
        validate(&no_title, "lobby", &t, &icons),
        Err(ValidationError::MissingTitle)
    );

    let nav = |target: Option<&str>| HotspotForm {
        kind: HotspotKind::Navigation,
        title: "Door".to_string(),
        target_scene_id: target.map(str::to_string),
        ..HotspotForm::default()
    };
    assert_eq!(
        validate(&nav(None), "lobby", &t, &icons),
        Err(ValidationError::MissingTarget)
    );
    assert_eq!(
        validate(&nav(Some("lobby")), "lobby", &t, &icons),
        Err(ValidationError::SelfTarget)
    );
    assert_eq!(
        validate(&nav(Some("attic")), "lobby", &t, &icons),
        Err(ValidationError::UnknownTarget("attic".to_string()))
    );
    assert_eq!(validate(&nav(Some("gallery")), "lobby", &t, &icons), Ok(()));
}

#[test]
fn icon_upload_rules() {
    let icons = UploadConstraints::icons();
    assert!(icons.check("image/png", 1024).is_ok());
    assert!(icons.check("IMAGE/SVG+XML", 1024).is_ok());
    assert_eq!(
        icons.check("application/pdf", 10),
        Err(ValidationError::UnsupportedType("application/pdf".to_string()))
    );
    assert!(matches!(
        icons.check("image/png", 3 * 1024 * 1024),
        Err(ValidationError::TooLarge { .. })
    ));

    let form = HotspotForm {
        title: "Sign".to_string(),
        description: Some("text".to_string()),
        icon_content_type: Some("text/html".to_string()),
        icon_byte_size: Some(10),
        ..HotspotForm::default()
    };
    assert!(validate(&form, "lobby", &tour(), &icons).is_err());
}

#[test]
fn icon_size_clamps_each_side() {
    assert_eq!(IconSize::clamped(4.0, 400.0), IconSize { width: 10.0, height: 100.0 });
    assert_eq!(IconSize::clamped(f32::NAN, 64.0).width, 40.0);
    assert_eq!(IconSize::default(), IconSize { width: 40.0, height: 40.0 });
}

#[test]
fn config_overrides_and_sanitizes() {
    let c = ViewerConfig::from_json("").unwrap();
    assert_eq!(c, ViewerConfig::default());

    let c = ViewerConfig::from_json(r#"{"fovDeg": 90.0, "fadeOutSec": -1.0, "markerInset": 3.0}"#)
        .unwrap();
    assert_eq!(c.fov_deg, 90.0);
    assert_eq!(c.fade_out_sec, 0.0);
    assert_eq!(c.marker_inset, ViewerConfig::default().marker_inset);
    assert_eq!(c.sphere_radius, 500.0);

    let c = ViewerConfig::from_json(r#"{"sphereRadius": 2000}"#).unwrap();
    assert_eq!(c.sphere_radius, ViewerConfig::default().sphere_radius);
    let c = ViewerConfig::from_json(r#"{"sphereRadius": 900}"#).unwrap();
    assert_eq!(c.sphere_radius, 900.0);
    for r in [c.sphere_radius, ViewerConfig::default().sphere_radius] {
        let cam = Camera::panorama(Vec3::ZERO, 1.5, c.fov_deg);
        let p = cam.view_proj() * Vec3::new(0.0, 0.0, -r).extend(1.0);
        assert!(p.z / p.w <= 1.0, "radius {} clipped by the far plane", r);
    }

    assert!(ViewerConfig::from_json("{not json").is_err());
}

#[test]
fn tween_runs_to_target_and_honours_cancel() {
    let token = CancelToken::new();
    let mut tw = Tween::new(1.0, 0.0, 1.0, token.clone());
    assert_eq!(tw.advance(0.5), TweenStep::Running(0.5));
    assert_eq!(tw.advance(0.6), TweenStep::Finished(0.0));

    let mut tw = Tween::new(0.0, 1.0, 1.0, token.clone());
    token.cancel();
    assert_eq!(tw.advance(0.1), TweenStep::Cancelled);
}

#[test]
fn navigator_swaps_once_then_fades_in() {
    let t = tour();
    let mut nav = Navigator::default();
    assert_eq!(nav.navigate("gallery", &t).unwrap(), NavigateOutcome::Started);

    let mut events = Vec::new();
    for _ in 0..30 {
        if let Some(e) = nav.tick(0.05) {
            events.push(e);
        }
    }
    assert_eq!(
        events,
        vec![
            NavEvent::SwapScene("gallery".to_string()),
            NavEvent::Finished("gallery".to_string()),
        ]
    );
    assert_eq!(nav.state(), NavState::Idle);
    assert_eq!(nav.opacity(), 1.0);
}

#[test]
fn cancelling_before_swap_suppresses_it() {
    let t = tour();
    let mut nav = Navigator::default();
    nav.navigate("gallery", &t).unwrap();
    nav.tick(0.1);
    let token = nav.token().unwrap();
    token.cancel();
    assert_eq!(nav.tick(0.1), Some(NavEvent::Cancelled("gallery".to_string())));
    for _ in 0..30 {
        assert_eq!(nav.tick(0.1), None);
    }
    assert_eq!(nav.opacity(), 1.0);
}

#[test]
fn zero_length_fades_still_swap() {
    let t = tour();
    let mut nav = Navigator::new(FadeTimings {
        fade_out_sec: 0.0,
        settle_sec: 0.0,
        fade_in_sec: 0.0,
    });
    nav.navigate("gallery", &t).unwrap();
    assert_eq!(nav.tick(0.0), Some(NavEvent::SwapScene("gallery".to_string())));
    assert_eq!(nav.tick(0.0), None);
    assert_eq!(nav.tick(0.0), Some(NavEvent::Finished("gallery".to_string())));
}

#[test]
fn load_tracker_keeps_only_newest_ticket() {
    let mut loads = LoadTracker::new();
    let a = loads.begin("a", "a.jpg");
    let b = loads.begin("b", "b.jpg");
    assert!(!loads.complete(&a));
    assert!(loads.complete(&b));
    loads.shut_down();
    assert!(!loads.complete(&b));
    let c = loads.begin("c", "c.jpg");
    assert!(!loads.complete(&c));
}

#[test]
fn ledger_ignores_outdated_responses() {
    let scene = Scene::new_from_upload("x", "x.jpg");
    let mut ledger = SaveLedger::new();
    let r1 = ledger.issue("t", &scene);
    let r2 = ledger.issue("t", &scene);
    ledger.resolve(&scene.id, r2.revision, true);
    ledger.resolve(&scene.id, r1.revision, false);
    assert_eq!(ledger.status(&scene.id), Some(SaveStatus::Saved(r2.revision)));
    assert!(ledger.failed().is_empty());
    assert!(!ledger.has_pending());
}
