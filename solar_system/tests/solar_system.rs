//! End-to-end runs of the solar system on the headless backend

use std::rc::Rc;

use approx::assert_relative_eq;
use orrery_engine::prelude::*;
use solar_system::bodies::orbit_position;
use solar_system::{SolarSystemApp, SolarSystemConfig};

const START_MS: f64 = 1_700_000_000_000.0;

fn start(width: u32, height: u32) -> (Engine, Rc<ManualClock>, SolarSystemApp) {
    start_at(START_MS, width, height)
}

fn start_at(start_ms: f64, width: u32, height: u32) -> (Engine, Rc<ManualClock>, SolarSystemApp) {
    let clock = Rc::new(ManualClock::new(start_ms));
    let mut engine = Engine::with_backend(Box::new(HeadlessBackend::new(width, height)), Box::new(clock.clone()));
    let mut app = SolarSystemApp::new(SolarSystemConfig {
        seed: Some(2024),
        ..SolarSystemConfig::default()
    });
    app.initialize(&mut engine).unwrap();
    (engine, clock, app)
}

fn headless(engine: &Engine) -> &HeadlessBackend {
    engine.graphics_engine().backend::<HeadlessBackend>().unwrap()
}

#[test]
fn test_every_frame_draws_the_whole_system() {
    let (mut engine, clock, mut app) = start(1280, 720);
    for _ in 0..4 {
        engine.frame(&mut app).unwrap();
        clock.advance(16.0);
    }

    let backend = headless(&engine);
    assert_eq!(backend.frames_drawn(), 4);
    // sun + 8 planets + 8 orbit rings + accessory ring
    assert_eq!(backend.last_frame().unwrap().draws.len(), 18);
    assert_eq!(app.frames(), 4);
}

#[test]
fn test_planets_move_with_the_clock() {
    let (mut engine, clock, mut app) = start(1280, 720);
    engine.frame(&mut app).unwrap();
    let first = app.world().unwrap().body_node(0).unwrap().transform.position;

    clock.advance(1_000.0);
    engine.frame(&mut app).unwrap();

    let world = app.world().unwrap();
    let body = &world.bodies[0];
    let second = world.body_node(0).unwrap().transform.position;
    let expected = orbit_position(START_MS + 1_000.0, 0.0001, body.speed, body.base_radius);

    assert_ne!(first, second);
    assert_relative_eq!(second.x, expected.x);
    assert_relative_eq!(second.z, expected.z);
    assert_relative_eq!(world.body_node(0).unwrap().transform.rotation.y, 0.03, epsilon = 1e-6);
    assert_relative_eq!(world.sun_node().unwrap().transform.rotation.y, 0.004, epsilon = 1e-6);
}

#[test]
fn test_resize_event_reaches_camera_and_surface() {
    let (mut engine, _clock, mut app) = start(1280, 720);
    engine
        .dispatch(&mut app, AppEvent::WindowResized { width: 900, height: 300 })
        .unwrap();
    engine.frame(&mut app).unwrap();

    assert_relative_eq!(app.world().unwrap().camera.aspect, 3.0);
    assert_eq!(engine.graphics_engine().surface_size(), (900, 300));

    engine
        .dispatch(&mut app, AppEvent::WindowResized { width: 0, height: 0 })
        .unwrap();
    assert_relative_eq!(app.world().unwrap().camera.aspect, 3.0);
    assert_eq!(engine.graphics_engine().surface_size(), (0, 0));
    assert!(engine.is_running());

    engine
        .dispatch(&mut app, AppEvent::WindowResized { width: 900, height: 300 })
        .unwrap();
    engine.frame(&mut app).unwrap();
    assert_eq!(engine.graphics_engine().surface_size(), (900, 300));
    assert_eq!(headless(&engine).frames_drawn(), 2);
}

#[test]
fn test_first_planet_follows_closed_form_orbit() {
    let (mut engine, clock, mut app) = start_at(0.0, 1280, 720);
    let delta_ms = 2_500.0;
    clock.advance(delta_ms);
    engine.frame(&mut app).unwrap();

    let world = app.world().unwrap();
    let speed = world.bodies[0].speed;
    let angle = delta_ms * 0.0001 * speed;
    let position = world.body_node(0).unwrap().transform.position;

    assert_relative_eq!(position.x, (angle.cos() * 30.0) as f32, epsilon = 1e-4);
    assert_relative_eq!(position.y, 0.0);
    assert_relative_eq!(position.z, (angle.sin() * 30.0) as f32, epsilon = 1e-4);
}

#[test]
fn test_scroll_zooms_and_space_resets() {
    let (mut engine, _clock, mut app) = start(1280, 720);
    let start_distance = app.world().unwrap().camera.distance_to_target();

    engine
        .dispatch(&mut app, AppEvent::MouseWheel { delta_x: 0.0, delta_y: 3.0 })
        .unwrap();
    engine.frame(&mut app).unwrap();
    let zoomed = app.world().unwrap().camera.distance_to_target();
    assert!(zoomed < start_distance);

    engine.dispatch(&mut app, AppEvent::KeyPressed(KeyCode::Space)).unwrap();
    assert_relative_eq!(app.world().unwrap().camera.distance_to_target(), start_distance, epsilon = 1e-4);
    assert!(engine.is_running());
}

#[test]
fn test_escape_stops_the_engine() {
    let (mut engine, _clock, mut app) = start(640, 480);
    engine.frame(&mut app).unwrap();
    engine.dispatch(&mut app, AppEvent::KeyPressed(KeyCode::Escape)).unwrap();
    assert!(!engine.is_running());
}

#[test]
fn test_accessory_ring_rides_with_sixth_planet() {
    let (mut engine, clock, mut app) = start(1280, 720);
    for _ in 0..10 {
        clock.advance(250.0);
        engine.frame(&mut app).unwrap();
        let world = app.world().unwrap();
        let planet = world.body_node(5).unwrap().transform.position;
        let ring = world.accessory_ring_node().unwrap().transform.position;
        assert_eq!(planet, ring);
        assert_relative_eq!((planet.x * planet.x + planet.z * planet.z).sqrt(), 55.0, epsilon = 1e-3);
    }
}

#[test]
fn test_shipped_config_matches_defaults() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../resources/config/solar_system.toml");
    let config = SolarSystemConfig::load_from_file(&path).unwrap();
    assert_eq!(config, SolarSystemConfig::default());
}
