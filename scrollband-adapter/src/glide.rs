/// Integer-only smooth scrolling toward a target offset.
///
/// Each [`step`](Self::step) moves the current offset toward the target by
/// `remaining * dt / time_constant_ms` (at least one pixel per step while
/// short of the target), which is a discrete exponential approach: fast over
/// long distances, settling softly near the target. When `dt` reaches the
/// time constant the glide snaps to the target.
///
/// Unlike duration-based tweens, a glide can be retargeted mid-flight without
/// a velocity discontinuity, which suits scroll-to-item UX where the user may
/// issue a new target while the previous one is still in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Glide {
    target: u64,
    time_constant_ms: u64,
    last_ms: u64,
    done: bool,
}

impl Glide {
    pub fn new(target: u64, time_constant_ms: u64, now_ms: u64) -> Self {
        Self {
            target,
            time_constant_ms: time_constant_ms.max(1),
            last_ms: now_ms,
            done: false,
        }
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    /// Redirects the glide toward a new target, keeping its pace.
    pub fn retarget(&mut self, target: u64) {
        self.target = target;
        self.done = false;
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Advances from `current` to the next offset for `now_ms`.
    ///
    /// Time going backwards is treated as a zero-length step.
    pub fn step(&mut self, current: u64, now_ms: u64) -> u64 {
        let dt = now_ms.saturating_sub(self.last_ms);
        self.last_ms = now_ms;

        if current == self.target {
            self.done = true;
            return current;
        }
        if dt == 0 {
            return current;
        }
        if dt >= self.time_constant_ms {
            self.done = true;
            return self.target;
        }

        let next = if current < self.target {
            let remaining = self.target - current;
            let step = (remaining.saturating_mul(dt) / self.time_constant_ms).max(1);
            current.saturating_add(step).min(self.target)
        } else {
            let remaining = current - self.target;
            let step = (remaining.saturating_mul(dt) / self.time_constant_ms).max(1);
            current.saturating_sub(step).max(self.target)
        };

        if next == self.target {
            self.done = true;
        }
        next
    }
}
