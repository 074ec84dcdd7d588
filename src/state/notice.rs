/// Blocking notification dialog and the cosmetic success marker

/// A message the user has to acknowledge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notice {
    message: String,
    is_open: bool,
}

impl Notice {
    pub fn open(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.is_open = true;
        log::debug!("Notice opened: {}", self.message);
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    #[cfg(test)]
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// The message, only while open
    pub fn message(&self) -> Option<&str> {
        self.is_open.then_some(self.message.as_str())
    }
}

/// Completion checkmark that hides itself after a short delay.
///
/// Each `show` starts a new generation; a timer only clears the marker if
/// no newer `show` happened in between.
#[derive(Debug, Default)]
pub struct SuccessMarker {
    generation: u64,
    visible: bool,
}

impl SuccessMarker {
    pub fn show(&mut self) -> u64 {
        self.generation += 1;
        self.visible = true;
        self.generation
    }

    pub fn clear(&mut self, generation: u64) -> bool {
        if generation == self.generation && self.visible {
            self.visible = false;
            return true;
        }
        false
    }

    /// Hide immediately, invalidating any pending timer
    pub fn hide(&mut self) {
        self.generation += 1;
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_open_close() {
        let mut notice = Notice::default();
        assert_eq!(notice.message(), None);

        notice.open("배경 제거가 완료되었습니다!");
        assert!(notice.is_open());
        assert_eq!(notice.message(), Some("배경 제거가 완료되었습니다!"));

        notice.close();
        assert_eq!(notice.message(), None);
    }

    #[test]
    fn test_marker_clears_only_its_generation() {
        let mut marker = SuccessMarker::default();
        let first = marker.show();
        let second = marker.show();

        assert!(!marker.clear(first));
        assert!(marker.is_visible());
        assert!(marker.clear(second));
        assert!(!marker.is_visible());
    }

    #[test]
    fn test_hide_invalidates_timer() {
        let mut marker = SuccessMarker::default();
        let generation = marker.show();
        marker.hide();
        assert!(!marker.clear(generation));
        assert!(!marker.is_visible());
    }
}
