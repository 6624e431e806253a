//! End-to-end checks across input synthesis, stroke building, animation,
//! the manipulation overlay and the engine session.

use std::rc::Rc;

use approx::assert_abs_diff_eq;

use quill_engine::animation::{AnimatedValue, Animation, Easing, SequentialAnimation};
use quill_engine::camera::Camera;
use quill_engine::config::{EngineConfig, ManipulationStyle};
use quill_engine::coords::{Rect, RotRect, Transform, Vec2, Viewport};
use quill_engine::engine::{replay, Engine};
use quill_engine::host::RecordingListener;
use quill_engine::input::stream::{PlaybackStream, SInputStream, ScreenParams};
use quill_engine::input::synth;
use quill_engine::paint::Color;
use quill_engine::realtime::manipulation::{ElementManipulationToolRenderer, ManipulationToolRenderer};
use quill_engine::realtime::modifiers::{LineModifier, LineModifierKind};
use quill_engine::realtime::StrokeBuilder;
use quill_engine::render::MemoryMeshBackend;
use quill_engine::scene::{DrawList, DrawTarget, SceneGraph};
use quill_engine::time::FakeClock;

fn fixture_camera() -> Camera {
    Camera::new(Viewport::from_pixels(synth::SCREEN_WIDTH, synth::SCREEN_HEIGHT), synth::SCREEN_PPI)
}

#[test]
fn tap_through_ballpoint_fades_on_lift() {
    let cam = fixture_camera();
    let tap = synth::create_tap(Vec2::new(512.0, 512.0), 0.0);
    assert_eq!(tap.len(), 2);

    let mut builder = StrokeBuilder::new(LineModifier::new(LineModifierKind::Ballpoint, Color::black()), 2.0);
    for input in &tap {
        assert!(builder.add_input(input, &cam));
    }
    let mesh = builder.finish().expect("tap builds a mesh");

    let down = mesh.vertices[0].opacity();
    let up = mesh.vertices[2].opacity();
    assert_abs_diff_eq!(down, 1.0, epsilon = 1e-5);
    assert_abs_diff_eq!(up, 0.3, epsilon = 1e-5);
    assert!(up < down);
}

#[test]
fn three_sequential_animations_run_in_order() {
    let values = [AnimatedValue::new(0.0), AnimatedValue::new(0.0), AnimatedValue::new(0.0)];
    let mut seq = SequentialAnimation::new();
    for v in &values {
        seq.push(Box::new(v.animate_to(0.0, 1.0, 1.0, Easing::Linear)));
    }

    let mut history = Vec::new();
    let mut t = 0.0;
    while !seq.has_finished() {
        seq.update(t);
        let snapshot = [values[0].get(), values[1].get(), values[2].get()];
        // A later animation only moves once every earlier one completed.
        for i in 1..3 {
            if snapshot[i] > 0.0 {
                assert_eq!(snapshot[i - 1], 1.0, "animation {i} moved early at t={t}");
            }
        }
        history.push(snapshot);
        t += 0.25;
        assert!(t < 100.0, "sequence never finished");
    }

    assert!(values.iter().all(|v| v.get() == 1.0));
    // The last child finished on the previous update; the sequence only
    // reports finished after popping it.
    assert_eq!(history[history.len() - 2], [1.0, 1.0, 1.0]);
}

#[test]
fn empty_selection_draws_nothing() {
    let clock = Rc::new(FakeClock::new(0.0));
    let cam = fixture_camera();
    let scene = SceneGraph::new();
    let mut renderer = ElementManipulationToolRenderer::new(ManipulationStyle::default(), clock, 0.004);

    renderer.set_elements(&cam, &[], Rect::default(), RotRect::default());
    renderer.update(&cam, 0.0, Rect::default(), RotRect::default(), Transform::IDENTITY);

    let mut list = DrawList::new();
    renderer.draw(&cam, 0.0, Transform::IDENTITY, &mut DrawTarget::new(&scene, &mut list));
    assert!(list.is_empty());
}

#[test]
fn playback_stream_replays_through_the_engine() {
    let mut inputs = synth::create_sampled_line(Vec2::new(100.0, 100.0), Vec2::new(900.0, 300.0), 0.0, 0.25);
    inputs.extend(synth::create_arc(Vec2::new(512.0, 700.0), 120.0, 20, 0.0, 3.0, 1.0, 1.4));
    inputs.extend(synth::create_tap(Vec2::new(300.0, 900.0), 2.0));

    let stream = PlaybackStream {
        initial_camera: ScreenParams::default(),
        input_stream: SInputStream::from_inputs(&inputs),
    };
    let json = stream.to_json().unwrap();
    let decoded = PlaybackStream::from_json(&json).unwrap();

    let clock = Rc::new(FakeClock::new(0.0));
    let screen = decoded.initial_camera;
    let mut engine = Engine::new(
        EngineConfig::default(),
        MemoryMeshBackend::new(),
        Viewport::from_pixels(screen.width, screen.height),
        screen.ppi,
        clock.clone(),
    );
    let listener = Rc::new(RecordingListener::new());
    engine.add_listener(listener.clone());

    let stats = replay(&mut engine, &clock, &decoded.input_stream.to_inputs(), 1.0 / 60.0).unwrap();
    assert_eq!(stats.inputs, inputs.len());
    assert_eq!(stats.accepted, inputs.len());
    assert_eq!(stats.elements, 3);
    assert_eq!(stats.draw_items, 3);
    assert_eq!(listener.tool_events().len(), 3);
    assert_eq!(engine.resources().backend().len(), 3);
}

#[test]
fn blocking_protocol_defers_undo_until_unblocked() {
    let clock = Rc::new(FakeClock::new(0.0));
    let mut engine = Engine::new(
        EngineConfig::default(),
        MemoryMeshBackend::new(),
        Viewport::new(400.0, 400.0),
        96.0,
        clock.clone(),
    );
    let listener = Rc::new(RecordingListener::new());
    engine.add_listener(listener.clone());

    for input in synth::create_exact_line(Vec2::new(20.0, 20.0), Vec2::new(200.0, 200.0), 4, 0.0, 0.1) {
        engine.dispatch_input(input);
    }
    engine.frame().unwrap();
    assert_eq!(engine.scene().visible_count(), 1);

    let worker = engine.blocking_state();
    let handle = std::thread::spawn(move || {
        worker.set_blocked(true);
        worker
    });
    let worker = handle.join().unwrap();

    engine.frame().unwrap();
    assert!(!engine.undo());
    assert!(!engine.redo());
    assert!(!engine.undo());
    engine.frame().unwrap();
    assert_eq!(engine.scene().visible_count(), 1);

    worker.set_blocked(false);
    engine.frame().unwrap();
    // undo, redo, undo applied in order.
    assert_eq!(engine.scene().visible_count(), 0);
    assert!(engine.can_redo());
    assert_eq!(listener.blocking_changes(), vec![true, false]);
}
