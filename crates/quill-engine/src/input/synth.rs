//! Synthesized touch input for tests and playback fixtures.
//!
//! Every line generator returns:
//! - samples sorted in stream order (see [`SInput::stream_cmp`])
//! - a down first and an up last, per contact
//! - positions lerped from the start to the end position
//! - times lerped from the start to the end time
//! - id 1 with the primary flag for single-touch; ids 1 and 2 with the primary
//!   flag on the first contact only for multi-touch
//! - `InputType::Touch`, pressure 1.0 while in contact and 0.0 on the up sample
//!
//! The generators differ in how the number of samples is chosen: the
//! `sampled` variants mimic a real device's rate, the `exact` variants produce
//! precisely the requested count.

use crate::coords::Vec2;
use crate::funcs::lerp;
use crate::time::{DurationS, InputTimeS};

use super::types::{sort_stream, Flag, Flags, InputType, SInput};

/// Screen attributes used by fixture streams.
pub const SCREEN_WIDTH: u32 = 1024;
pub const SCREEN_HEIGHT: u32 = 1024;
pub const SCREEN_PPI: f32 = 900.0;

/// Sampling rate the `sampled` generators emulate. Devices often report
/// faster than the 60 Hz render rate.
pub const SAMPLE_RATE_HZ: f64 = 120.0;

/// Delay of the second finger in the sampled multi-touch generator.
pub const MULTI_TOUCH_STAGGER_S: DurationS = 0.01;

/// Duration of [`create_tap`].
pub const TAP_DURATION_S: DurationS = 0.1;

const FIRST_ID: u32 = 1;
const SECOND_ID: u32 = 2;

/// Number of interpolated samples a device would report between the down and
/// the up over `duration_s`.
pub fn get_number_of_interpolation_points(duration_s: DurationS) -> usize {
    if !(duration_s > 0.0) {
        return 0;
    }
    // Small epsilon so exact multiples of the sample period don't round up.
    let samples = (duration_s * SAMPLE_RATE_HZ - 1e-9).ceil();
    (samples as usize).saturating_sub(1)
}

/// Creates at least 2 samples, roughly what a real device would report for a
/// drag lasting `duration_s`.
pub fn create_sampled_line(
    from_screen_pos: Vec2,
    to_screen_pos: Vec2,
    start_time_s: InputTimeS,
    duration_s: DurationS,
) -> Vec<SInput> {
    create_exact_line(
        from_screen_pos,
        to_screen_pos,
        get_number_of_interpolation_points(duration_s),
        start_time_s,
        start_time_s + duration_s,
    )
}

/// Creates at least 4 samples simulating two fingers moving independently.
///
/// The second finger starts and ends [`MULTI_TOUCH_STAGGER_S`] after the first.
pub fn create_sampled_multi_touch_lines(
    first_start_pos: Vec2,
    first_end_pos: Vec2,
    second_start_pos: Vec2,
    second_end_pos: Vec2,
    start_time_s: InputTimeS,
    duration_s: DurationS,
) -> Vec<SInput> {
    let n = get_number_of_interpolation_points(duration_s);
    create_exact_multi_touch_lines(
        first_start_pos,
        first_end_pos,
        second_start_pos,
        second_end_pos,
        start_time_s,
        start_time_s + duration_s,
        start_time_s + MULTI_TOUCH_STAGGER_S,
        start_time_s + duration_s + MULTI_TOUCH_STAGGER_S,
        n,
        n,
    )
}

/// Creates exactly `num_interp_points + 2` samples for contact 1 (primary).
pub fn create_exact_line(
    from_screen_pos: Vec2,
    to_screen_pos: Vec2,
    num_interp_points: usize,
    start_time_s: InputTimeS,
    end_time_s: InputTimeS,
) -> Vec<SInput> {
    create_exact_line_with_id(
        from_screen_pos,
        to_screen_pos,
        num_interp_points,
        start_time_s,
        end_time_s,
        FIRST_ID,
        true,
    )
}

/// Creates exactly `num_interp_points + 2` samples for the given contact.
pub fn create_exact_line_with_id(
    from_screen_pos: Vec2,
    to_screen_pos: Vec2,
    num_interp_points: usize,
    start_time_s: InputTimeS,
    end_time_s: InputTimeS,
    id: u32,
    set_primary_flag: bool,
) -> Vec<SInput> {
    debug_assert!(end_time_s >= start_time_s, "line must not run backwards in time");
    let count = num_interp_points + 2;
    let last = count - 1;

    (0..count)
        .map(|i| {
            let t = i as f32 / last as f32;
            let mut flags = Flags::of(&[Flag::Left]);
            flags.set(Flag::Primary, set_primary_flag);
            let pressure = if i == last {
                flags = flags.with(Flag::TUp);
                0.0
            } else {
                flags = flags.with(Flag::InContact);
                if i == 0 {
                    flags = flags.with(Flag::TDown);
                }
                1.0
            };

            SInput {
                input_type: InputType::Touch,
                id,
                flags,
                time_s: lerp(start_time_s, end_time_s, t),
                screen_pos: lerp(from_screen_pos, to_screen_pos, t),
                pressure,
                ..Default::default()
            }
        })
        .collect()
}

/// Creates `first_num_points + second_num_points + 4` samples for two
/// contacts, merged into one stream.
#[allow(clippy::too_many_arguments)]
pub fn create_exact_multi_touch_lines(
    first_start_pos: Vec2,
    first_end_pos: Vec2,
    second_start_pos: Vec2,
    second_end_pos: Vec2,
    first_start_time_s: InputTimeS,
    first_end_time_s: InputTimeS,
    second_start_time_s: InputTimeS,
    second_end_time_s: InputTimeS,
    first_num_points: usize,
    second_num_points: usize,
) -> Vec<SInput> {
    let mut out = create_exact_line_with_id(
        first_start_pos,
        first_end_pos,
        first_num_points,
        first_start_time_s,
        first_end_time_s,
        FIRST_ID,
        true,
    );
    out.extend(create_exact_line_with_id(
        second_start_pos,
        second_end_pos,
        second_num_points,
        second_start_time_s,
        second_end_time_s,
        SECOND_ID,
        false,
    ));
    sort_stream(&mut out);
    out
}

/// Creates a [`TAP_DURATION_S`] tap (2 samples) at the given time and position.
pub fn create_tap(screen_pos: Vec2, start_time_s: InputTimeS) -> Vec<SInput> {
    create_exact_line(screen_pos, screen_pos, 0, start_time_s, start_time_s + TAP_DURATION_S)
}

/// Creates `num_interp_points + 2` samples along a circular arc.
///
/// Angles are measured in screen space from +X towards +Y.
pub fn create_arc(
    center: Vec2,
    radius: f32,
    num_interp_points: usize,
    start_radians: f32,
    end_radians: f32,
    start_time_s: InputTimeS,
    end_time_s: InputTimeS,
) -> Vec<SInput> {
    let mut out = create_exact_line(
        Vec2::zero(),
        Vec2::zero(),
        num_interp_points,
        start_time_s,
        end_time_s,
    );
    let last = out.len() - 1;
    for (i, input) in out.iter_mut().enumerate() {
        let angle = lerp(start_radians, end_radians, i as f32 / last as f32);
        input.screen_pos = center + Vec2::new(angle.cos(), angle.sin()) * radius;
    }
    out
}

/// Creates a single scroll-wheel sample. `modifiers` are raw flag bits
/// (Shift/Control/Alt/Meta).
pub fn create_scroll_wheel_event(
    screen_pos: Vec2,
    delta_x: f32,
    delta_y: f32,
    time_s: InputTimeS,
    modifiers: u32,
) -> Vec<SInput> {
    vec![SInput {
        input_type: InputType::Wheel,
        id: FIRST_ID,
        flags: Flags(modifiers).with(Flag::Wheel),
        time_s,
        screen_pos,
        wheel_delta: Vec2::new(delta_x, delta_y),
        ..Default::default()
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{FLAGS_BEGIN_STROKE, FLAGS_END_STROKE, FLAGS_MOVE_WHILE_DOWN};
    use approx::assert_abs_diff_eq;

    fn assert_well_formed(points: &[SInput]) {
        assert!(points.len() >= 2);
        assert!(points.first().unwrap().is_down());
        assert!(points.last().unwrap().is_up());
        assert!(points.windows(2).all(|w| w[0].time_s <= w[1].time_s));
    }

    // ── sampled lines ─────────────────────────────────────────────────────

    #[test]
    fn sampled_line_is_well_formed_for_many_durations() {
        for d in [1e-6, 0.001, 0.0083, 0.05, 0.1, 0.5, 1.0, 3.7] {
            let line = create_sampled_line(Vec2::new(0.0, 0.0), Vec2::new(50.0, 5.0), 2.0, d);
            assert_well_formed(&line);
            assert_eq!(line.len(), get_number_of_interpolation_points(d) + 2);
        }
    }

    #[test]
    fn sampled_line_exceeds_sixty_hz() {
        let line = create_sampled_line(Vec2::zero(), Vec2::new(1.0, 1.0), 0.0, 1.0);
        assert!(line.len() > 60);
    }

    #[test]
    fn interpolation_points_for_exact_periods() {
        assert_eq!(get_number_of_interpolation_points(0.0), 0);
        assert_eq!(get_number_of_interpolation_points(0.1), 11);
        assert_eq!(get_number_of_interpolation_points(1.0), 119);
    }

    // ── exact lines ───────────────────────────────────────────────────────

    #[test]
    fn exact_line_counts_and_lerps() {
        for n in [0usize, 1, 2, 7, 30] {
            let from = Vec2::new(10.0, 20.0);
            let to = Vec2::new(110.0, -80.0);
            let line = create_exact_line(from, to, n, 1.0, 3.0);
            assert_eq!(line.len(), n + 2);
            assert_well_formed(&line);
            for (i, p) in line.iter().enumerate() {
                let t = i as f32 / (n + 1) as f32;
                assert_abs_diff_eq!(p.screen_pos.x, from.x + (to.x - from.x) * t, epsilon = 1e-3);
                assert_abs_diff_eq!(p.screen_pos.y, from.y + (to.y - from.y) * t, epsilon = 1e-3);
                assert_abs_diff_eq!(p.time_s, 1.0 + 2.0 * t as f64, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn exact_line_flags_match_stroke_constants() {
        let line = create_exact_line(Vec2::zero(), Vec2::new(5.0, 0.0), 2, 0.0, 1.0);
        assert_eq!(line[0].flags, FLAGS_BEGIN_STROKE);
        assert_eq!(line[1].flags, FLAGS_MOVE_WHILE_DOWN);
        assert_eq!(line[2].flags, FLAGS_MOVE_WHILE_DOWN);
        assert_eq!(line[3].flags, FLAGS_END_STROKE);
        assert!(line.iter().all(|p| p.id == 1 && p.input_type == InputType::Touch));
    }

    #[test]
    fn exact_line_without_primary() {
        let line = create_exact_line_with_id(Vec2::zero(), Vec2::zero(), 1, 0.0, 1.0, 9, false);
        assert!(line.iter().all(|p| p.id == 9 && !p.flags.has(Flag::Primary)));
    }

    // ── multi-touch ───────────────────────────────────────────────────────

    #[test]
    fn exact_multi_touch_counts_and_order() {
        let pts = create_exact_multi_touch_lines(
            Vec2::zero(),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 10.0),
            0.0,
            1.0,
            0.5,
            1.5,
            3,
            5,
        );
        assert_eq!(pts.len(), 3 + 5 + 4);
        assert!(pts.windows(2).all(|w| !w[1].less_than(&w[0])));
        let first: Vec<_> = pts.iter().filter(|p| p.id == 1).collect();
        let second: Vec<_> = pts.iter().filter(|p| p.id == 2).collect();
        assert_eq!(first.len(), 5);
        assert_eq!(second.len(), 7);
        assert!(first.iter().all(|p| p.flags.has(Flag::Primary)));
        assert!(second.iter().all(|p| !p.flags.has(Flag::Primary)));
        assert!(first[0].is_down() && first[4].is_up());
        assert!(second[0].is_down() && second[6].is_up());
    }

    #[test]
    fn sampled_multi_touch_staggers_second_finger() {
        let pts = create_sampled_multi_touch_lines(
            Vec2::zero(),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 10.0),
            1.0,
            0.2,
        );
        assert!(pts.len() >= 4);
        let down2 = pts.iter().find(|p| p.id == 2 && p.is_down()).unwrap();
        let up1 = pts.iter().find(|p| p.id == 1 && p.is_up()).unwrap();
        let up2 = pts.iter().find(|p| p.id == 2 && p.is_up()).unwrap();
        assert_abs_diff_eq!(down2.time_s, 1.01, epsilon = 1e-9);
        assert_abs_diff_eq!(up2.time_s - up1.time_s, MULTI_TOUCH_STAGGER_S, epsilon = 1e-9);
        assert!(pts[0].id == 1 && pts[0].is_down());
        assert!(pts.last().unwrap().id == 2 && pts.last().unwrap().is_up());
    }

    // ── tap / arc / wheel ─────────────────────────────────────────────────

    #[test]
    fn tap_is_two_points_a_tenth_apart() {
        let tap = create_tap(Vec2::new(5.0, 5.0), 3.0);
        assert_eq!(tap.len(), 2);
        assert_well_formed(&tap);
        assert_abs_diff_eq!(tap[1].time_s - tap[0].time_s, 0.1, epsilon = 1e-9);
        assert_eq!(tap[0].screen_pos, tap[1].screen_pos);
    }

    #[test]
    fn arc_points_lie_on_circle() {
        let c = Vec2::new(100.0, 100.0);
        let arc = create_arc(c, 25.0, 6, 0.0, core::f32::consts::PI, 0.0, 1.0);
        assert_eq!(arc.len(), 8);
        for p in &arc {
            assert_abs_diff_eq!(p.screen_pos.distance(c), 25.0, epsilon = 1e-3);
        }
        assert_abs_diff_eq!(arc[7].screen_pos.x, 75.0, epsilon = 1e-3);
    }

    #[test]
    fn scroll_wheel_carries_modifiers() {
        let ev = create_scroll_wheel_event(Vec2::zero(), 0.0, -3.0, 2.0, Flag::Control.bit());
        assert_eq!(ev.len(), 1);
        assert_eq!(ev[0].input_type, InputType::Wheel);
        assert!(ev[0].flags.has(Flag::Wheel) && ev[0].flags.has(Flag::Control));
        assert_eq!(ev[0].wheel_delta, Vec2::new(0.0, -3.0));
    }
}
