//! Crossing search: coarse scan + bisection.
//!
//! Walks from the start epoch in fixed steps toward `start + limit_days`
//! (negative limits walk backward) and stops at the first bracket whose
//! sign change matches the requested direction. The bracket is then refined
//! by bisection. Scanning outward from the start means the returned crossing
//! is always the one nearest to it.

use crate::riseset_types::{CrossingDirection, RiseSetConfig};

/// Whether `f` crosses zero in `direction` between time-ordered samples.
fn brackets(direction: CrossingDirection, f_early: f64, f_late: f64) -> bool {
    match direction {
        CrossingDirection::Rising => f_early < 0.0 && f_late >= 0.0,
        CrossingDirection::Setting => f_early >= 0.0 && f_late < 0.0,
    }
}

/// Refine a bracket `[t_a, t_b]` with `f(t_a)` on the early side.
fn bisect<F>(f: &mut F, mut t_a: f64, mut f_a: f64, mut t_b: f64, config: &RiseSetConfig) -> f64
where
    F: FnMut(f64) -> f64,
{
    for _ in 0..config.max_iterations {
        let t_mid = 0.5 * (t_a + t_b);
        let f_mid = f(t_mid);
        if (f_mid < 0.0) == (f_a < 0.0) {
            t_a = t_mid;
            f_a = f_mid;
        } else {
            t_b = t_mid;
        }
        if (t_b - t_a).abs() < config.convergence_days {
            break;
        }
    }
    0.5 * (t_a + t_b)
}

/// Find the crossing of `f` nearest to `jd_start` within `limit_days`.
///
/// Returns `None` when no crossing of the requested kind exists in the
/// window, e.g. polar day or night for a horizon search.
pub(crate) fn find_crossing<F>(
    mut f: F,
    jd_start: f64,
    direction: CrossingDirection,
    limit_days: f64,
    config: &RiseSetConfig,
) -> Option<f64>
where
    F: FnMut(f64) -> f64,
{
    if limit_days == 0.0 || !limit_days.is_finite() {
        return None;
    }
    let step = config.scan_step_days().copysign(limit_days);
    let jd_end = jd_start + limit_days;
    let max_steps = (limit_days.abs() / config.scan_step_days()).ceil() as usize;

    let mut t_prev = jd_start;
    let mut f_prev = f(t_prev);

    for i in 1..=max_steps {
        let t_curr = if i == max_steps {
            jd_end
        } else {
            jd_start + step * i as f64
        };
        let f_curr = f(t_curr);

        let (t_a, f_a, t_b, f_b) = if t_prev < t_curr {
            (t_prev, f_prev, t_curr, f_curr)
        } else {
            (t_curr, f_curr, t_prev, f_prev)
        };
        if brackets(direction, f_a, f_b) {
            return Some(bisect(&mut f, t_a, f_a, t_b, config));
        }

        t_prev = t_curr;
        f_prev = f_curr;
    }
    None
}

/// Normalize an angle to (-180, +180].
pub fn normalize_to_pm180(deg: f64) -> f64 {
    let d = deg.rem_euclid(360.0);
    if d > 180.0 { d - 360.0 } else { d }
}
