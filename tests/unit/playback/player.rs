use std::rc::Rc;

use super::*;
use crate::animation::base::AnimationExt;
use crate::animation::probe::{self, Event};
use crate::animation::target::Target;
use crate::animation::transforms::{fade_in, move_by, move_to};
use crate::encode::sink::InMemorySink;
use crate::foundation::core::{Canvas, Vec2};
use crate::render::backend::FrameRGBA;
use crate::render::cpu::CpuBackend;
use crate::scene::node::NodeRef;
use crate::scene::shapes;

/// Records the first node's x position at every render.
#[derive(Default)]
struct Recorder {
    xs: Vec<f64>,
}

impl RenderBackend for Recorder {
    fn render_scene(&mut self, scene: &Scene) -> KinemaResult<FrameRGBA> {
        let x = scene
            .nodes()
            .first()
            .map_or(0.0, |n| n.borrow().transform.translate.x);
        self.xs.push(x);
        Ok(FrameRGBA {
            width: 1,
            height: 1,
            data: vec![0; 4],
            premultiplied: true,
        })
    }
}

fn scene_with_box() -> (Scene, NodeRef) {
    let mut scene = Scene::new(Canvas::new(64, 48).unwrap());
    let node = scene.add(shapes::square("box", 10.0));
    (scene, node)
}

fn target(node: &NodeRef) -> Target {
    node.clone()
}

fn opts(fps: u32, final_frame: bool) -> PlayerOpts {
    PlayerOpts {
        fps: Fps::new(fps, 1).unwrap(),
        final_frame,
        only_frame: None,
    }
}

#[test]
fn defaults_keep_terminal_frame() {
    let o = PlayerOpts::default();
    assert!(o.final_frame);
    assert_eq!(o.fps, Fps::new(30, 1).unwrap());
}

#[test]
fn play_renders_ceil_of_duration_times_fps() {
    let (scene, node) = scene_with_box();
    let mut sink = InMemorySink::new();
    let mut player = Player::new(&scene, Recorder::default(), &mut sink, opts(10, false));

    let mut anims = vec![move_by(target(&node), Vec2::new(100.0, 0.0)).boxed()];
    player.play(&mut anims).unwrap();
    let stats = player.finish().unwrap();

    assert_eq!(stats, PlaybackStats { steps: 1, frames: 10 });
    assert_eq!(sink.frames.len(), 10);
    assert!(sink.is_ended());
    assert_eq!(
        sink.config(),
        Some(SinkConfig {
            width: 64,
            height: 48,
            fps: Fps::new(10, 1).unwrap(),
        })
    );
}

#[test]
fn only_frame_rasterizes_one_frame_and_keeps_the_timeline() {
    let (scene, node) = scene_with_box();
    let mut sink = InMemorySink::new();
    let only = PlayerOpts {
        only_frame: Some(FrameIndex(3)),
        ..opts(10, true)
    };
    let mut player = Player::new(&scene, Recorder::default(), &mut sink, only);

    let mut anims = vec![move_to(target(&node), Vec2::new(100.0, 0.0)).boxed()];
    player.play(&mut anims).unwrap();
    player.wait(0.5).unwrap();
    assert_eq!(player.next_frame(), FrameIndex(15));
    let (recorder, _, stats) = player.into_parts().unwrap();

    assert_eq!(recorder.xs.len(), 1);
    assert!((recorder.xs[0] - 30.0).abs() < 1e-9);
    assert_eq!(stats, PlaybackStats { steps: 2, frames: 1 });
    assert_eq!(sink.frames.len(), 1);
    assert_eq!(sink.frames[0].0, FrameIndex(3));
    assert!(sink.is_ended());
}

#[test]
fn fractional_duration_rounds_frames_up() {
    let (scene, node) = scene_with_box();
    let mut player = Player::new(&scene, Recorder::default(), InMemorySink::new(), opts(10, false));
    let mut anims = vec![move_by(target(&node), Vec2::new(10.0, 0.0)).with_duration(0.25).boxed()];
    player.play(&mut anims).unwrap();
    assert_eq!(player.stats().frames, 3);
}

#[test]
fn frames_sample_normalized_time_and_scene_settles_exactly() {
    let (scene, node) = scene_with_box();
    let mut player = Player::new(&scene, Recorder::default(), InMemorySink::new(), opts(10, true));

    let mut anims = vec![move_to(target(&node), Vec2::new(100.0, 0.0)).boxed()];
    player.play(&mut anims).unwrap();
    let (recorder, sink, stats) = player.into_parts().unwrap();

    assert_eq!(stats.frames, 11);
    assert_eq!(sink.frames.len(), 11);
    assert!(recorder.xs[0].abs() < 1e-9);
    assert!((recorder.xs[3] - 30.0).abs() < 1e-9);
    assert!((recorder.xs[9] - 90.0).abs() < 1e-9);
    // terminal frame shows the settled value
    assert_eq!(recorder.xs[10], 100.0);
    assert_eq!(node.borrow().transform.translate, Vec2::new(100.0, 0.0));
}

#[test]
fn shorter_animations_hold_their_end_state() {
    let mut scene = Scene::new(Canvas::new(8, 8).unwrap());
    let a = scene.add(shapes::square("a", 2.0));
    let b = scene.add(shapes::square("b", 2.0));
    let mut player = Player::new(&scene, Recorder::default(), InMemorySink::new(), opts(10, false));

    let mut anims = vec![
        move_to(target(&a), Vec2::new(10.0, 0.0)).boxed(),
        move_to(target(&b), Vec2::new(10.0, 0.0))
            .with_duration(0.5)
            .boxed(),
    ];
    player.play(&mut anims).unwrap();

    assert_eq!(player.stats().frames, 10);
    assert_eq!(b.borrow().transform.translate.x, 10.0);
    assert_eq!(a.borrow().transform.translate.x, 10.0);
}

#[test]
fn lifecycle_is_setup_ticks_then_cleanup_once() {
    let (scene, _) = scene_with_box();
    let log = probe::log();
    let mut player = Player::new(&scene, Recorder::default(), InMemorySink::new(), opts(4, false));

    let mut anims = vec![probe::Probe::boxed("p", 1.0, &log)];
    player.play(&mut anims).unwrap();

    let events = log.borrow().clone();
    assert_eq!(events.first(), Some(&Event::Setup("p")));
    assert_eq!(events.last(), Some(&Event::Cleanup("p")));
    assert_eq!(probe::setups(&log, "p"), 1);
    assert_eq!(probe::cleanups(&log, "p"), 1);
    let ticks: Vec<f64> = events
        .iter()
        .filter_map(|e| match e {
            Event::Tick(_, t) => Some(*t),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
}

#[test]
fn frame_indices_are_continuous_across_steps() {
    let (scene, node) = scene_with_box();
    let mut sink = InMemorySink::new();
    let mut player = Player::new(&scene, Recorder::default(), &mut sink, opts(10, true));

    let mut first = vec![move_by(target(&node), Vec2::new(5.0, 0.0)).with_duration(0.3).boxed()];
    player.play(&mut first).unwrap();
    player.wait(0.5).unwrap();
    let mut second = vec![move_by(target(&node), Vec2::new(5.0, 0.0)).with_duration(0.2).boxed()];
    player.play(&mut second).unwrap();
    let stats = player.finish().unwrap();

    assert_eq!(stats, PlaybackStats { steps: 3, frames: 3 + 5 + 2 + 1 });
    let indices: Vec<u64> = sink.frames.iter().map(|(i, _)| i.0).collect();
    assert_eq!(indices, (0..11).collect::<Vec<_>>());
    assert_eq!(node.borrow().transform.translate.x, 10.0);
}

#[test]
fn wait_holds_the_scene_still() {
    let (scene, node) = scene_with_box();
    node.borrow_mut().transform.translate = Vec2::new(7.0, 0.0);
    let mut player = Player::new(&scene, Recorder::default(), InMemorySink::new(), opts(10, false));
    player.wait(0.3).unwrap();
    player.wait(f64::NAN).unwrap();
    let (recorder, _, stats) = player.into_parts().unwrap();
    assert_eq!(recorder.xs, vec![7.0; 3]);
    assert_eq!(stats.steps, 1);
}

#[test]
fn empty_play_is_rejected() {
    let (scene, _) = scene_with_box();
    let mut player = Player::new(&scene, Recorder::default(), InMemorySink::new(), opts(10, false));
    let err = player.play(&mut []).unwrap_err();
    assert!(matches!(err, KinemaError::Animation(_)));
}

#[test]
fn finish_is_idempotent_and_closes_the_player() {
    let (scene, node) = scene_with_box();
    let mut sink = InMemorySink::new();
    let mut player = Player::new(&scene, Recorder::default(), &mut sink, opts(10, true));
    let first = player.finish().unwrap();
    let second = player.finish().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.frames, 1);

    let mut anims = vec![move_by(target(&node), Vec2::new(1.0, 0.0)).boxed()];
    assert!(player.play(&mut anims).is_err());
    assert!(player.wait(1.0).is_err());
    drop(player);
    assert_eq!(sink.frames.len(), 1);
}

#[test]
fn sink_is_not_opened_without_frames() {
    let (scene, _) = scene_with_box();
    let mut sink = InMemorySink::new();
    let mut player = Player::new(&scene, Recorder::default(), &mut sink, opts(10, false));
    player.finish().unwrap();
    drop(player);
    assert_eq!(sink.config(), None);
    assert!(!sink.is_ended());
}

#[test]
fn fade_in_renders_through_cpu_backend() {
    let mut scene = Scene::new(Canvas::new(16, 16).unwrap()).with_background("#000000");
    let node = scene.add(
        shapes::square("sq", 16.0)
            .with_position(Vec2::new(8.0, 8.0))
            .with_fill("#ffffff"),
    );
    node.borrow_mut().style.opacity = 0.0;
    let target: Target = Rc::clone(&node) as Target;

    let mut sink = InMemorySink::new();
    let mut player = Player::new(&scene, CpuBackend::default(), &mut sink, opts(4, true));
    let mut anims = vec![fade_in(target).boxed()];
    player.play(&mut anims).unwrap();
    player.finish().unwrap();
    drop(player);

    let first = &sink.frames.first().unwrap().1;
    let last = &sink.frames.last().unwrap().1;
    assert_eq!(first.pixel(8, 8), Some([0, 0, 0, 255]));
    assert_eq!(last.pixel(8, 8), Some([255, 255, 255, 255]));
}
