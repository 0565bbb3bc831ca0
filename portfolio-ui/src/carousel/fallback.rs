use portfolio_types::CarouselState;

use super::CarouselHost;

/// Manual slide-show used when the slider library never loads: one slide
/// visible at a time, stepping with wrap-around at both ends.
#[derive(Debug, Clone)]
pub struct FallbackSlideshow {
    state: CarouselState,
}

impl FallbackSlideshow {
    pub fn new(total_slides: usize) -> Self {
        Self {
            state: CarouselState::new(total_slides, true),
        }
    }

    pub fn state(&self) -> CarouselState {
        self.state
    }

    pub fn index(&self) -> usize {
        self.state.current_index
    }

    /// Show slide `index` (mod N) and hide every other one.
    pub fn show_slide(&mut self, index: usize, host: &dyn CarouselHost) -> usize {
        if self.state.is_empty() {
            return 0;
        }
        let current = self.state.go_to(index);
        self.render(host);
        current
    }

    pub fn next(&mut self, host: &dyn CarouselHost) -> usize {
        let current = self.state.step_forward();
        self.render(host);
        current
    }

    pub fn prev(&mut self, host: &dyn CarouselHost) -> usize {
        let current = self.state.step_back();
        self.render(host);
        current
    }

    fn render(&self, host: &dyn CarouselHost) {
        for slide in 0..self.state.total_slides {
            host.set_slide_visible(slide, slide == self.state.current_index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeCarouselHost;

    #[test]
    fn test_exactly_one_slide_visible() {
        let host = FakeCarouselHost::with_slides(5);
        let mut show = FallbackSlideshow::new(5);

        show.show_slide(3, &host);
        assert_eq!(host.visible_slides(), vec![3]);

        show.show_slide(12, &host);
        assert_eq!(show.index(), 2);
        assert_eq!(host.visible_slides(), vec![2]);
    }

    #[test]
    fn test_next_n_times_is_identity() {
        for n in 1..=9 {
            let host = FakeCarouselHost::with_slides(n);
            let mut show = FallbackSlideshow::new(n);
            for start in 0..n {
                show.show_slide(start, &host);
                for _ in 0..n {
                    let index = show.next(&host);
                    assert!(index < n);
                }
                assert_eq!(show.index(), start);
            }
        }
    }

    #[test]
    fn test_prev_wraps_to_last() {
        let host = FakeCarouselHost::with_slides(4);
        let mut show = FallbackSlideshow::new(4);
        show.show_slide(0, &host);
        assert_eq!(show.prev(&host), 3);
        assert_eq!(host.visible_slides(), vec![3]);
        assert_eq!(show.next(&host), 0);
    }

    #[test]
    fn test_empty_deck_is_a_no_op() {
        let host = FakeCarouselHost::with_slides(0);
        let mut show = FallbackSlideshow::new(0);
        assert_eq!(show.show_slide(1, &host), 0);
        assert_eq!(show.next(&host), 0);
        assert_eq!(show.prev(&host), 0);
        assert!(host.visible_slides().is_empty());
    }
}
