pub struct ScopedTimer {
    name: String,
    start: std::time::Instant,
}

impl ScopedTimer {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for ScopedTimer {
    fn drop(&mut self) {
        log::debug!("{}: {:.2?}", self.name, self.start.elapsed());
    }
}

pub fn framenumber_to_hhmmss(framenumber: u64, fps: f64) -> String {
    if !(fps.is_finite() && fps > 0.0) {
        return "00:00:00".to_owned();
    }
    let duration = std::time::Duration::from_secs_f64(framenumber as f64 / fps);
    let seconds = duration.as_secs() % 60;
    let minutes = (duration.as_secs() / 60) % 60;
    let hours = (duration.as_secs() / 60) / 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[macro_export]
macro_rules! log_error {
    ( $x:expr ) => {
        match $x {
            Ok(_) => {}
            Err(e) => {
                log::error!("{}", e);
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_footage_length() {
        assert_eq!(framenumber_to_hhmmss(0, 10.0), "00:00:00");
        assert_eq!(framenumber_to_hhmmss(10, 10.0), "00:00:01");
        assert_eq!(framenumber_to_hhmmss(36_610, 10.0), "01:01:01");
        assert_eq!(framenumber_to_hhmmss(100, 0.0), "00:00:00");
        assert_eq!(framenumber_to_hhmmss(10, f64::NAN), "00:00:00");
        assert_eq!(framenumber_to_hhmmss(10, f64::INFINITY), "00:00:00");
    }
}
