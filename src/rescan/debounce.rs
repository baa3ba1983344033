use std::time::{Duration, Instant};

/// Single-shot timer that restarts on every poke and fires once when quiet.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// (Re)arm the timer at `now + delay`.
    pub fn poke(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once per arming, as soon as the deadline has passed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_after_the_quiet_period() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(100));
        assert!(!d.fire(start + Duration::from_secs(10)));

        d.poke(start);
        assert!(d.is_armed());
        assert!(!d.fire(start + Duration::from_millis(99)));
        assert!(d.fire(start + Duration::from_millis(100)));
        assert!(!d.is_armed());
        assert!(!d.fire(start + Duration::from_millis(500)));
    }

    #[test]
    fn pokes_push_the_deadline_back() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(100));
        d.poke(start);
        d.poke(start + Duration::from_millis(80));
        assert!(!d.fire(start + Duration::from_millis(150)));
        assert!(d.fire(start + Duration::from_millis(180)));
    }
}
