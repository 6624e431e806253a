use anyhow::{ensure, Result};

use crate::input::{sort_stream, SInput};
use crate::render::MeshBackend;
use crate::time::{DurationS, FakeClock};

use super::Engine;

/// Totals from a [`replay`] run.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ReplayStats {
    pub inputs: usize,
    /// Inputs the engine accepted.
    pub accepted: usize,
    pub frames: u64,
    /// Elements in the scene afterwards.
    pub elements: usize,
    /// Draw commands recorded by the final frame.
    pub draw_items: usize,
}

/// Plays `inputs` through `engine`, driving `clock` (which must be the
/// engine's wall clock) from the sample timestamps.
///
/// A frame runs every `frame_interval` of input time; long gaps run a single
/// frame instead of catching up. A final frame flushes the tail.
pub fn replay<B: MeshBackend>(
    engine: &mut Engine<B>,
    clock: &FakeClock,
    inputs: &[SInput],
    frame_interval: DurationS,
) -> Result<ReplayStats> {
    ensure!(
        frame_interval > 0.0 && frame_interval.is_finite(),
        "frame interval must be positive, got {frame_interval}"
    );

    let mut sorted = inputs.to_vec();
    sort_stream(&mut sorted);

    let mut stats = ReplayStats { inputs: sorted.len(), ..Default::default() };
    let Some(first) = sorted.first() else {
        let frame = engine.frame()?;
        stats.frames = 1;
        stats.draw_items = frame.draw_items;
        return Ok(stats);
    };

    let mut frame_end = first.time_s + frame_interval;
    for input in &sorted {
        if input.time_s >= frame_end {
            clock.set(frame_end);
            engine.frame()?;
            stats.frames += 1;
            let skipped = ((input.time_s - frame_end) / frame_interval).floor() + 1.0;
            frame_end += skipped * frame_interval;
        }
        clock.set(input.time_s);
        if engine.dispatch_input(*input) {
            stats.accepted += 1;
        }
    }

    clock.set(frame_end);
    let last = engine.frame()?;
    stats.frames += 1;
    stats.draw_items = last.draw_items;
    stats.elements = engine.scene().len();

    log::debug!(
        "replayed {} inputs ({} accepted) over {} frames",
        stats.inputs,
        stats.accepted,
        stats.frames
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crate::config::EngineConfig;
    use crate::coords::{Vec2, Viewport};
    use crate::input::synth;
    use crate::render::MemoryMeshBackend;

    fn engine(clock: &Rc<FakeClock>) -> Engine<MemoryMeshBackend> {
        Engine::new(
            EngineConfig::default(),
            MemoryMeshBackend::new(),
            Viewport::new(400.0, 400.0),
            96.0,
            clock.clone(),
        )
    }

    #[test]
    fn frames_follow_input_time() {
        let clock = Rc::new(FakeClock::new(0.0));
        let mut e = engine(&clock);
        let line = synth::create_exact_line(Vec2::new(10.0, 10.0), Vec2::new(200.0, 200.0), 8, 0.0, 0.1);

        let stats = replay(&mut e, &clock, &line, 0.03).unwrap();
        assert_eq!(stats.inputs, 10);
        assert_eq!(stats.accepted, 10);
        assert_eq!(stats.elements, 1);
        // Boundaries at 0.03, 0.06 and 0.09 are crossed, plus the final flush.
        assert_eq!(stats.frames, 4);
    }

    #[test]
    fn long_gap_runs_one_frame() {
        let clock = Rc::new(FakeClock::new(0.0));
        let mut e = engine(&clock);
        let mut inputs = synth::create_tap(Vec2::new(10.0, 10.0), 0.0);
        inputs.extend(synth::create_tap(Vec2::new(50.0, 50.0), 100.0));

        let stats = replay(&mut e, &clock, &inputs, 0.5).unwrap();
        assert_eq!(stats.elements, 2);
        assert_eq!(stats.frames, 2);
    }

    #[test]
    fn empty_stream_runs_one_frame() {
        let clock = Rc::new(FakeClock::new(0.0));
        let mut e = engine(&clock);
        assert_eq!(replay(&mut e, &clock, &[], 0.1).unwrap().frames, 1);
    }

    #[test]
    fn rejects_non_positive_interval() {
        let clock = Rc::new(FakeClock::new(0.0));
        let mut e = engine(&clock);
        assert!(replay(&mut e, &clock, &[], 0.0).is_err());
    }
}
