/// Session time in seconds since the first frame.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
pub struct Time(pub f64);

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn seconds(self) -> f64 {
        self.0
    }

    pub fn after(self, dt_s: f64) -> Self {
        Time(self.0 + dt_s)
    }
}
