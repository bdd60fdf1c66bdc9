// End-to-end session behaviour: picking, navigation, authoring and saves.

use glam::Vec3;
use pano_core::*;

fn hotspot(id: &str, kind: HotspotKind, pos: Vec3, target: Option<&str>) -> Hotspot {
    Hotspot {
        id: id.to_string(),
        kind,
        title: format!("{id} title"),
        description: match kind {
            HotspotKind::Info => Some("about this spot".to_string()),
            HotspotKind::Navigation => None,
        },
        target_scene_id: target.map(str::to_string),
        position: pos,
        icon_url: None,
        icon_size: None,
    }
}

// Scene A: door to B straight ahead (-Z), info panel to the right (+X).
// Scene B: door back to A behind the viewer (+Z).
fn two_room_tour() -> Tour {
    Tour {
        id: "tour-1".to_string(),
        title: "Two rooms".to_string(),
        scenes: vec![
            Scene {
                id: "A".to_string(),
                title: "Hall".to_string(),
                image_url: "https://cdn.test/a.jpg".to_string(),
                hotspots: vec![
                    hotspot("to-b", HotspotKind::Navigation, Vec3::new(0.0, 0.0, -500.0), Some("B")),
                    hotspot("plaque", HotspotKind::Info, Vec3::new(500.0, 0.0, 0.0), None),
                ],
            },
            Scene {
                id: "B".to_string(),
                title: "Kitchen".to_string(),
                image_url: "https://cdn.test/b.jpg".to_string(),
                hotspots: vec![hotspot(
                    "to-a",
                    HotspotKind::Navigation,
                    Vec3::new(0.0, 0.0, 500.0),
                    Some("A"),
                )],
            },
        ],
        starting_scene_id: Some("A".to_string()),
    }
}

fn session() -> TourSession {
    let mut s = TourSession::new(two_room_tour(), ViewerConfig::default());
    s.drain_events();
    s
}

fn ray_toward(dir: Vec3) -> Ray {
    Ray::new(Vec3::ZERO, dir)
}

// Runs the default fade (0.5 out, 0.1 settle, 0.5 in) to completion.
fn run_transition(s: &mut TourSession) {
    for _ in 0..20 {
        s.tick(0.1);
    }
}

#[test]
fn starts_on_starting_scene_and_reports_it() {
    let mut s = TourSession::new(two_room_tour(), ViewerConfig::default());
    assert_eq!(s.current_scene_id(), Some("A"));
    assert_eq!(s.markers().len(), 2);
    let events = s.drain_events();
    assert_eq!(
        events,
        vec![SessionEvent::SceneChanged {
            scene_id: "A".to_string(),
            image_url: "https://cdn.test/a.jpg".to_string(),
        }]
    );
}

#[test]
fn empty_tour_has_no_current_scene_and_ignores_clicks() {
    let tour = Tour {
        id: "t".to_string(),
        title: "empty".to_string(),
        scenes: vec![],
        starting_scene_id: None,
    };
    let mut s = TourSession::new(tour, ViewerConfig::default());
    assert!(s.current_scene_id().is_none());
    assert!(s.markers().is_empty());
    let got = s.activate(&ray_toward(Vec3::NEG_Z)).unwrap();
    assert_eq!(got, Interaction::None);
}

#[test]
fn unresolvable_starting_scene_falls_back_to_first() {
    let mut tour = two_room_tour();
    tour.starting_scene_id = Some("gone".to_string());
    let s = TourSession::new(tour, ViewerConfig::default());
    assert_eq!(s.current_scene_id(), Some("A"));
}

#[test]
fn info_hotspot_click_shows_payload() {
    let mut s = session();
    let got = s.activate(&ray_toward(Vec3::X)).unwrap();
    let expected = InfoPayload {
        hotspot_id: "plaque".to_string(),
        title: "plaque title".to_string(),
        description: "about this spot".to_string(),
    };
    assert_eq!(got, Interaction::ShowInfo(expected.clone()));
    assert_eq!(s.drain_events(), vec![SessionEvent::ShowInfo(expected)]);
    assert_eq!(s.current_scene_id(), Some("A"));
}

#[test]
fn clicking_empty_panorama_in_view_mode_is_silent() {
    let mut s = session();
    let got = s.activate(&ray_toward(Vec3::Y)).unwrap();
    assert_eq!(got, Interaction::None);
    assert!(s.drain_events().is_empty());
}

#[test]
fn navigation_hotspot_fades_and_swaps_scene() {
    let mut s = session();
    let got = s.activate(&ray_toward(Vec3::NEG_Z)).unwrap();
    assert_eq!(got, Interaction::Navigating("B".to_string()));
    assert_eq!(s.nav_state(), NavState::Transitioning);
    // swap has not happened yet
    assert_eq!(s.current_scene_id(), Some("A"));

    s.tick(0.25);
    assert!(s.opacity() < 1.0 && s.opacity() > 0.0);
    assert_eq!(s.current_scene_id(), Some("A"));

    run_transition(&mut s);
    assert_eq!(s.current_scene_id(), Some("B"));
    assert_eq!(s.nav_state(), NavState::Idle);
    assert!((s.opacity() - 1.0).abs() < 1e-6);
    assert_eq!(s.markers().len(), 1);
    assert!(s.markers().get("to-a").is_some());

    let events = s.drain_events();
    assert_eq!(
        events.first(),
        Some(&SessionEvent::TransitionStarted {
            target: "B".to_string()
        })
    );
    assert!(events.contains(&SessionEvent::SceneChanged {
        scene_id: "B".to_string(),
        image_url: "https://cdn.test/b.jpg".to_string(),
    }));
    assert_eq!(
        events.last(),
        Some(&SessionEvent::TransitionFinished {
            scene_id: "B".to_string()
        })
    );
}

#[test]
fn second_navigation_during_transition_is_ignored() {
    let mut s = session();
    s.navigate("B").unwrap();
    s.tick(0.1);
    let again = s.navigate("A").unwrap();
    assert_eq!(again, NavigateOutcome::Ignored);
    run_transition(&mut s);
    assert_eq!(s.current_scene_id(), Some("B"));
}

#[test]
fn navigation_to_unknown_scene_changes_nothing() {
    let mut s = session();
    let err = s.navigate("C").unwrap_err();
    assert!(matches!(err, TourError::UnknownScene(ref id) if id == "C"));
    assert_eq!(s.nav_state(), NavState::Idle);
    assert_eq!(s.current_scene_id(), Some("A"));
    assert!(s.drain_events().is_empty());
}

#[test]
fn broken_link_hotspot_is_reported_not_followed() {
    let mut tour = two_room_tour();
    tour.scenes[0].hotspots[0].target_scene_id = Some("C".to_string());
    let mut s = TourSession::new(tour, ViewerConfig::default());
    let got = s.activate(&ray_toward(Vec3::NEG_Z)).unwrap();
    assert_eq!(got, Interaction::BrokenLink(Some("C".to_string())));
    assert_eq!(s.nav_state(), NavState::Idle);
    assert_eq!(s.current_scene_id(), Some("A"));
}

#[test]
fn switch_scene_to_unknown_id_is_rejected() {
    let mut s = session();
    assert!(s.switch_scene("C").is_err());
    assert_eq!(s.current_scene_id(), Some("A"));
    assert_eq!(s.markers().len(), 2);
}

#[test]
fn switch_scene_during_fade_cancels_the_transition() {
    let mut s = session();
    s.navigate("B").unwrap();
    s.tick(0.2);
    s.switch_scene("A").unwrap();
    assert_eq!(s.nav_state(), NavState::Idle);
    assert!((s.opacity() - 1.0).abs() < 1e-6);
    run_transition(&mut s);
    // the cancelled fade must not swap afterwards
    assert_eq!(s.current_scene_id(), Some("A"));
    let events = s.drain_events();
    assert!(events.contains(&SessionEvent::TransitionCancelled {
        target: "B".to_string()
    }));
}

#[test]
fn view_mode_never_opens_forms() {
    let mut s = session();
    let got = s.activate(&ray_toward(Vec3::Y)).unwrap();
    assert_eq!(got, Interaction::None);
    assert!(s.open_form().is_none());
}

#[test]
fn edit_mode_click_opens_form_at_surface_point() {
    let mut s = session();
    s.set_mode(Mode::Edit);
    let got = s.activate(&ray_toward(Vec3::new(0.0, 1.0, 0.0))).unwrap();
    assert_eq!(got, Interaction::FormOpened);
    let open = s.open_form().expect("form should be open");
    assert_eq!(open.scene_id, "A");
    match &open.target {
        FormTarget::New { position } => {
            assert!((position.length() - 500.0).abs() < 0.5);
            assert!(position.y > 499.0);
        }
        other => panic!("unexpected target {other:?}"),
    }
}

#[test]
fn edit_mode_ignores_markers_when_picking() {
    let mut s = session();
    s.set_mode(Mode::Edit);
    // straight at the door marker: edit mode still places on the sphere
    let got = s.activate(&ray_toward(Vec3::NEG_Z)).unwrap();
    assert_eq!(got, Interaction::FormOpened);
    assert_eq!(s.nav_state(), NavState::Idle);
}

#[test]
fn submit_creates_hotspot_on_sphere_and_requests_save() {
    let mut s = session();
    s.set_mode(Mode::Edit);
    s.activate(&ray_toward(Vec3::new(1.0, 0.0, -1.0))).unwrap();
    s.drain_events();

    let form = HotspotForm {
        kind: HotspotKind::Navigation,
        title: "Back to kitchen".to_string(),
        target_scene_id: Some("B".to_string()),
        ..HotspotForm::default()
    };
    let edit = s.submit_form(form).unwrap();
    assert_eq!(edit.kind, EditKind::Created);
    assert!(s.open_form().is_none());

    let scene = s.current_scene().unwrap();
    assert_eq!(scene.hotspots.len(), 3);
    let created = scene.hotspot(&edit.hotspot_id).unwrap();
    assert!(created.is_on_sphere(Vec3::ZERO, 500.0));
    assert_eq!(s.markers().len(), 3);

    let events = s.drain_events();
    assert_eq!(events[0], SessionEvent::FormClosed);
    assert!(events.contains(&SessionEvent::HotspotsChanged {
        scene_id: "A".to_string()
    }));
    let save = events.iter().find_map(|e| match e {
        SessionEvent::SaveRequested(r) => Some(r.clone()),
        _ => None,
    });
    let save = save.expect("save requested");
    assert_eq!(save.tour_id, "tour-1");
    assert_eq!(save.scene.hotspots.len(), 3);
    assert_eq!(s.ledger().status("A"), Some(SaveStatus::Pending(save.revision)));
}

#[test]
fn info_with_empty_description_is_rejected_without_mutation() {
    let mut s = session();
    s.set_mode(Mode::Edit);
    s.activate(&ray_toward(Vec3::NEG_Y)).unwrap();
    let form = HotspotForm {
        kind: HotspotKind::Info,
        title: "Floor".to_string(),
        description: Some("   ".to_string()),
        ..HotspotForm::default()
    };
    let err = s.submit_form(form).unwrap_err();
    assert!(matches!(
        err,
        TourError::Invalid(ValidationError::MissingDescription)
    ));
    assert_eq!(s.current_scene().unwrap().hotspots.len(), 2);
    // the form stays open so the author can fix it
    assert!(s.open_form().is_some());
}

#[test]
fn editing_keeps_id_and_position() {
    let mut s = session();
    s.set_mode(Mode::Edit);
    s.activate(&ray_toward(Vec3::new(-1.0, 0.2, 0.0))).unwrap();
    let created = s
        .submit_form(HotspotForm {
            title: "Window".to_string(),
            description: Some("north light".to_string()),
            ..HotspotForm::default()
        })
        .unwrap();
    let before = s
        .current_scene()
        .unwrap()
        .hotspot(&created.hotspot_id)
        .unwrap()
        .clone();

    s.edit_hotspot(&created.hotspot_id).unwrap();
    let mut form = s.open_form().unwrap().form.clone();
    assert_eq!(form.title, "Window");
    form.title = "Big window".to_string();
    let updated = s.submit_form(form).unwrap();
    assert_eq!(updated.kind, EditKind::Updated);
    assert_eq!(updated.hotspot_id, created.hotspot_id);

    let after = s
        .current_scene()
        .unwrap()
        .hotspot(&created.hotspot_id)
        .unwrap();
    assert_eq!(after.id, before.id);
    assert_eq!(after.position, before.position);
    assert_eq!(after.title, "Big window");
}

#[test]
fn remove_drops_hotspot_and_marker() {
    let mut s = session();
    s.set_mode(Mode::Edit);
    let edit = s.remove_hotspot("plaque").unwrap();
    assert_eq!(edit.kind, EditKind::Removed);
    assert!(s.current_scene().unwrap().hotspot("plaque").is_none());
    assert!(s.markers().get("plaque").is_none());
    assert!(matches!(
        s.remove_hotspot("plaque"),
        Err(TourError::UnknownHotspot(_))
    ));
}

#[test]
fn authoring_requires_edit_mode() {
    let mut s = session();
    assert!(matches!(s.edit_hotspot("plaque"), Err(TourError::EditDisabled)));
    assert!(matches!(s.remove_hotspot("plaque"), Err(TourError::EditDisabled)));
    assert!(matches!(
        s.submit_form(HotspotForm::default()),
        Err(TourError::EditDisabled)
    ));
}

#[test]
fn leaving_edit_mode_closes_open_form() {
    let mut s = session();
    s.set_mode(Mode::Edit);
    s.activate(&ray_toward(Vec3::Y)).unwrap();
    s.drain_events();
    s.set_mode(Mode::View);
    assert!(s.open_form().is_none());
    assert_eq!(
        s.drain_events(),
        vec![SessionEvent::FormClosed, SessionEvent::ModeChanged(Mode::View)]
    );
}

#[test]
fn failed_save_keeps_edit_and_can_be_retried() {
    let mut s = session();
    s.set_mode(Mode::Edit);
    let edit = s.remove_hotspot("plaque").unwrap();
    let rev = s
        .drain_events()
        .into_iter()
        .find_map(|e| match e {
            SessionEvent::SaveRequested(r) => Some(r.revision),
            _ => None,
        })
        .unwrap();
    s.resolve_save(&edit.scene_id, rev, false);
    assert_eq!(s.ledger().failed(), vec!["A".to_string()]);
    // no rollback
    assert!(s.current_scene().unwrap().hotspot("plaque").is_none());

    assert_eq!(s.retry_failed_saves(), 1);
    let retry = s
        .drain_events()
        .into_iter()
        .find_map(|e| match e {
            SessionEvent::SaveRequested(r) => Some(r),
            _ => None,
        })
        .unwrap();
    assert!(retry.revision > rev);
    s.resolve_save("A", retry.revision, true);
    assert!(s.ledger().failed().is_empty());
}

#[test]
fn stale_panorama_load_is_dropped() {
    let mut s = session();
    let first = s.begin_panorama_load().unwrap();
    s.switch_scene("B").unwrap();
    let second = s.begin_panorama_load().unwrap();
    assert_eq!(second.scene_id, "B");
    // the late A image must not replace B
    assert!(!s.accept_panorama(&first));
    assert!(s.accept_panorama(&second));
}

#[test]
fn shutdown_rejects_in_flight_loads() {
    let mut s = session();
    let ticket = s.begin_panorama_load().unwrap();
    s.shutdown();
    assert!(!s.is_load_current(&ticket));
    assert!(!s.accept_panorama(&ticket));
}

#[test]
fn hover_reports_hotspot_only_in_view_mode() {
    let mut s = session();
    assert_eq!(
        s.hover(&ray_toward(Vec3::X)).map(|h| h.id.as_str()),
        Some("plaque")
    );
    assert!(s.hover(&ray_toward(Vec3::Y)).is_none());
    s.set_mode(Mode::Edit);
    assert!(s.hover(&ray_toward(Vec3::X)).is_none());
}
