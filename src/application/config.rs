//! Application configuration

use std::time::Duration;

/// Application configuration options
#[derive(Debug, Clone)]
pub struct ApplicationConfig {
    /// Worker threads requested per stream (values <= 0 mean 1)
    pub thread_count: i32,

    /// Number of segments kept by segmenting publishers
    pub segment_count: u32,

    /// Segment duration in seconds
    pub segment_duration: u32,

    /// Allowed cross-domain origins for HTTP based publishers
    pub cross_domains: Vec<String>,

    /// Interval between queue depth snapshots in the log
    pub stats_interval: Duration,

    /// Route the whole backlog before the dispatch task exits on stop
    pub drain_on_stop: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            thread_count: 4,
            segment_count: 3,
            segment_duration: 5,
            cross_domains: Vec::new(),
            stats_interval: Duration::from_secs(5),
            drain_on_stop: false,
        }
    }
}

impl ApplicationConfig {
    /// Worker count hint handed to the stream factory, at least 1
    pub fn thread_count(&self) -> usize {
        if self.thread_count > 0 {
            self.thread_count as usize
        } else {
            1
        }
    }

    /// Set the per-stream worker thread count
    pub fn with_thread_count(mut self, count: i32) -> Self {
        self.thread_count = count;
        self
    }

    /// Set segment count and duration
    pub fn segments(mut self, count: u32, duration: u32) -> Self {
        self.segment_count = count;
        self.segment_duration = duration;
        self
    }

    /// Allow a cross-domain origin
    pub fn cross_domain(mut self, origin: impl Into<String>) -> Self {
        self.cross_domains.push(origin.into());
        self
    }

    /// Set the queue depth snapshot interval
    pub fn stats_interval(mut self, interval: Duration) -> Self {
        self.stats_interval = interval;
        self
    }

    /// Drain all queues before the dispatch task exits
    pub fn drain_on_stop(mut self, drain: bool) -> Self {
        self.drain_on_stop = drain;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApplicationConfig::default();

        assert_eq!(config.thread_count(), 4);
        assert_eq!(config.segment_count, 3);
        assert_eq!(config.segment_duration, 5);
        assert!(config.cross_domains.is_empty());
        assert_eq!(config.stats_interval, Duration::from_secs(5));
        assert!(!config.drain_on_stop);
    }

    #[test]
    fn test_thread_count_floor() {
        assert_eq!(ApplicationConfig::default().with_thread_count(0).thread_count(), 1);
        assert_eq!(ApplicationConfig::default().with_thread_count(-3).thread_count(), 1);
        assert_eq!(ApplicationConfig::default().with_thread_count(8).thread_count(), 8);
    }

    #[test]
    fn test_builder_chaining() {
        let config = ApplicationConfig::default()
            .with_thread_count(2)
            .segments(6, 2)
            .cross_domain("https://player.example.com")
            .stats_interval(Duration::from_millis(500))
            .drain_on_stop(true);

        assert_eq!(config.thread_count(), 2);
        assert_eq!(config.segment_count, 6);
        assert_eq!(config.segment_duration, 2);
        assert_eq!(config.cross_domains, vec!["https://player.example.com".to_string()]);
        assert_eq!(config.stats_interval, Duration::from_millis(500));
        assert!(config.drain_on_stop);
    }
}
