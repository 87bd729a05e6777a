use foundation::time::Time;

/// Per-frame timing handed to the session by the render callback.
///
/// `dt_s` is the wall-clock delta reported by the host for this frame, and
/// `time` is the accumulated total. Frames are plain values so a run can be
/// recorded and replayed.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta since the previous frame (seconds).
    pub dt_s: f64,
    /// Total session time at the end of this frame (seconds).
    pub time: Time,
}

impl Frame {
    pub fn first() -> Self {
        Self {
            index: 0,
            dt_s: 0.0,
            time: Time::ZERO,
        }
    }

    /// Next frame after `dt_s` seconds. Negative or non-finite deltas count as zero.
    pub fn advance(self, dt_s: f64) -> Self {
        let dt_s = if dt_s.is_finite() { dt_s.max(0.0) } else { 0.0 };
        Self {
            index: self.index + 1,
            dt_s,
            time: self.time.after(dt_s),
        }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::first()
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;
    use foundation::time::Time;

    #[test]
    fn advance_accumulates_time() {
        let f = Frame::first().advance(0.5).advance(0.25);
        assert_eq!(f.index, 2);
        assert_eq!(f.dt_s, 0.25);
        assert_eq!(f.time, Time(0.75));
    }

    #[test]
    fn bad_deltas_do_not_move_time() {
        let f = Frame::first().advance(-1.0).advance(f64::NAN);
        assert_eq!(f.index, 2);
        assert_eq!(f.time, Time::ZERO);
    }
}
