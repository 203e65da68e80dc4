/// Result of querying a [`Timer`]. The discriminants are part of the
/// contract: 0 never armed, 1 expired, 2 still counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TimerState {
    NotStarted = 0,
    Finished = 1,
    Running = 2,
}

/// Countdown against simulation time. Querying never mutates; an expired
/// timer keeps reporting `Finished` until it is re-armed or cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Timer {
    end_time: Option<f64>,
}

impl Timer {
    pub fn started(now: f64, duration: f64) -> Self {
        Self {
            end_time: Some(now + duration),
        }
    }

    pub fn start(&mut self, now: f64, duration: f64) {
        self.end_time = Some(now + duration);
    }

    pub fn clear(&mut self) {
        self.end_time = None;
    }

    pub fn state(&self, now: f64) -> TimerState {
        match self.end_time {
            None => TimerState::NotStarted,
            Some(end_time) if now >= end_time => TimerState::Finished,
            Some(_) => TimerState::Running,
        }
    }

    pub fn is_running(&self, now: f64) -> bool {
        self.state(now) == TimerState::Running
    }

    pub fn is_finished(&self, now: f64) -> bool {
        self.state(now) == TimerState::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unarmed_timer_reports_not_started() {
        let timer = Timer::default();
        assert_eq!(timer.state(0.0), TimerState::NotStarted);
        assert_eq!(timer.state(1_000.0), TimerState::NotStarted);
    }

    #[test]
    fn five_second_timer_started_at_ten() {
        let mut timer = Timer::default();
        timer.start(10.0, 5.0);

        for now in [10.0, 12.5, 14.999] {
            assert_eq!(timer.state(now), TimerState::Running, "now={now}");
        }
        for now in [15.0, 15.001, 90.0] {
            assert_eq!(timer.state(now), TimerState::Finished, "now={now}");
        }
    }

    #[test]
    fn finished_is_sticky_until_rearmed_or_cleared() {
        let mut timer = Timer::started(0.0, 1.0);
        assert!(timer.is_finished(2.0));
        assert!(timer.is_finished(2.0));

        timer.start(2.0, 1.0);
        assert!(timer.is_running(2.5));

        timer.clear();
        assert_eq!(timer.state(2.5), TimerState::NotStarted);
    }

    #[test]
    fn state_discriminants_are_stable() {
        assert_eq!(TimerState::NotStarted as u8, 0);
        assert_eq!(TimerState::Finished as u8, 1);
        assert_eq!(TimerState::Running as u8, 2);
    }
}
