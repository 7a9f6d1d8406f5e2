//! Track descriptors and timebases

use super::packet::MediaType;

/// Rational timebase (seconds per tick = num / den)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timebase {
    pub num: u32,
    pub den: u32,
}

impl Timebase {
    /// Create a timebase
    pub const fn new(num: u32, den: u32) -> Self {
        Self { num, den }
    }

    /// Seconds per tick
    ///
    /// A zero denominator yields 0.0 rather than infinity.
    pub fn expr(&self) -> f64 {
        if self.den == 0 {
            0.0
        } else {
            self.num as f64 / self.den as f64
        }
    }

    /// Convert a timestamp in this timebase to milliseconds
    pub fn to_millis(&self, ts: i64) -> i64 {
        (ts as f64 * self.expr() * 1000.0) as i64
    }
}

/// A single elementary track of a stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaTrack {
    pub id: u32,
    pub media_type: MediaType,
    pub timebase: Timebase,
}

impl MediaTrack {
    /// Video track with the usual 90 kHz clock
    pub fn video(id: u32) -> Self {
        Self {
            id,
            media_type: MediaType::Video,
            timebase: Timebase::new(1, 90_000),
        }
    }

    /// Audio track clocked at its sample rate
    pub fn audio(id: u32, sample_rate: u32) -> Self {
        Self {
            id,
            media_type: MediaType::Audio,
            timebase: Timebase::new(1, sample_rate),
        }
    }

    /// Override the timebase
    pub fn with_timebase(mut self, timebase: Timebase) -> Self {
        self.timebase = timebase;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_millis() {
        let tb = Timebase::new(1, 90_000);
        assert_eq!(tb.to_millis(90_000), 1000);
        assert_eq!(tb.to_millis(4_500), 50);

        let tb = Timebase::new(1, 1000);
        assert_eq!(tb.to_millis(1234), 1234);
    }

    #[test]
    fn test_zero_denominator() {
        let tb = Timebase::new(1, 0);
        assert_eq!(tb.expr(), 0.0);
        assert_eq!(tb.to_millis(1_000_000), 0);
    }

    #[test]
    fn test_track_constructors() {
        let audio = MediaTrack::audio(1, 48_000);
        assert_eq!(audio.media_type, MediaType::Audio);
        assert_eq!(audio.timebase.to_millis(48_000), 1000);

        let video = MediaTrack::video(0).with_timebase(Timebase::new(1, 1000));
        assert_eq!(video.timebase.den, 1000);
    }
}
