//! Fixed-size paging over a frame list.
//!
//! Windows are half-open `[start, end)`. The tail page is kept exactly
//! `page_size` wide whenever the list is at least that long, so stepping
//! forward from the second-to-last page may overlap frames already shown.

/// `(start, end)` of the first page.
pub fn initial(len: usize, page_size: usize) -> (usize, usize) {
    (0, len.min(page_size))
}

/// Window after advancing from `[_, end)`.
pub fn next(len: usize, page_size: usize, end: usize) -> (usize, usize) {
    let mut new_start = end;
    let new_end = (new_start + page_size).min(len);
    if new_end == len {
        new_start = len.saturating_sub(page_size);
    }
    (new_start, new_end)
}

/// Window after retreating from `[start, _)`.
pub fn prev(len: usize, page_size: usize, start: usize) -> (usize, usize) {
    let mut new_end = start;
    let new_start = start.saturating_sub(page_size);
    if new_start == 0 {
        new_end = page_size.min(len);
    }
    (new_start, new_end)
}

/// Visible window of the active sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    start: usize,
    end: usize,
    len: usize,
    page_size: usize,
}

impl PageWindow {
    /// First page of a list of `len` frames.
    pub fn new(len: usize, page_size: usize) -> Self {
        let (start, end) = initial(len, page_size);
        Self {
            start,
            end,
            len,
            page_size,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Frames in the underlying list.
    pub fn total(&self) -> usize {
        self.len
    }

    pub fn can_advance(&self) -> bool {
        self.end < self.len
    }

    pub fn can_retreat(&self) -> bool {
        self.start > 0
    }

    /// Move to the next page. Returns false when already at the tail.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        (self.start, self.end) = next(self.len, self.page_size, self.end);
        log::debug!("Page advanced to {}..{}", self.start, self.end);
        true
    }

    /// Move to the previous page. Returns false when already at the head.
    pub fn retreat(&mut self) -> bool {
        if !self.can_retreat() {
            return false;
        }
        (self.start, self.end) = prev(self.len, self.page_size, self.start);
        log::debug!("Page retreated to {}..{}", self.start, self.end);
        true
    }

    /// Progress string like "10-18 / 20".
    pub fn progress(&self) -> String {
        if self.start == self.end {
            return format!("0 / {}", self.len);
        }
        format!("{}-{} / {}", self.start + 1, self.end, self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_sequence_single_page() {
        let window = PageWindow::new(5, 9);
        assert_eq!(window.range(), 0..5);
        assert!(!window.can_advance());
        assert!(!window.can_retreat());
    }

    #[test]
    fn test_tail_window_keeps_page_width() {
        let mut window = PageWindow::new(20, 9);
        assert_eq!(window.range(), 0..9);

        assert!(window.advance());
        assert_eq!(window.range(), 9..18);

        assert!(window.advance());
        assert_eq!(window.range(), 11..20);
        assert!(!window.can_advance());

        assert!(window.retreat());
        assert_eq!(window.range(), 2..11);

        assert!(window.retreat());
        assert_eq!(window.range(), 0..9);
        assert!(!window.can_retreat());
    }

    #[test]
    fn test_blocked_moves_are_noops() {
        let mut window = PageWindow::new(20, 9);
        assert!(!window.retreat());
        assert_eq!(window.range(), 0..9);

        window.advance();
        window.advance();
        assert!(!window.advance());
        assert_eq!(window.range(), 11..20);
    }

    #[test]
    fn test_exact_multiple_of_page_size() {
        let mut window = PageWindow::new(18, 9);
        assert!(window.advance());
        assert_eq!(window.range(), 9..18);
        assert!(!window.can_advance());
        assert!(window.retreat());
        assert_eq!(window.range(), 0..9);
    }

    #[test]
    fn test_pure_functions() {
        assert_eq!(initial(3, 9), (0, 3));
        assert_eq!(next(5, 9, 0), (0, 5));
        assert_eq!(prev(5, 9, 0), (0, 5));
    }

    #[test]
    fn test_windows_stay_in_bounds() {
        for len in 0..40 {
            for page_size in 1..12 {
                let mut window = PageWindow::new(len, page_size);
                let mut steps = 0;
                while window.advance() {
                    assert!(window.start() < window.end());
                    assert!(window.end() <= len);
                    assert!(window.end() - window.start() <= page_size);
                    steps += 1;
                    assert!(steps <= len);
                }
                while window.retreat() {
                    assert!(window.end() <= len);
                    assert!(window.end() - window.start() <= page_size);
                }
                assert_eq!(window.range(), 0..len.min(page_size));
            }
        }
    }

    #[test]
    fn test_progress() {
        let window = PageWindow::new(20, 9);
        assert_eq!(window.progress(), "1-9 / 20");
        assert_eq!(PageWindow::new(0, 9).progress(), "0 / 0");
    }
}
