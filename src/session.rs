use crate::geometry::{normalize, Point, Rectangle};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_hollow_rect_mut;
use imageproc::rect::Rect;

/// Colour of the committed selection outline
const OUTLINE_COLOR: Rgb<u8> = Rgb([0, 255, 0]);

/// Outline thickness in pixels, drawn inwards from the corners
const OUTLINE_THICKNESS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    AwaitingFirstCorner,
    AwaitingSecondCorner,
}

/// What a click did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    FirstCorner(Point),
    Committed(Rectangle),
}

/// Selection state plus the image pair it annotates
///
/// `original` never changes after construction; `working` receives the
/// outline and is re-cloned from `original` each time selection starts.
#[derive(Debug, Clone)]
pub struct SelectionSession {
    mode: Mode,
    first_corner: Option<Point>,
    rectangle: Option<Rectangle>,
    original: RgbImage,
    working: RgbImage,
}

impl SelectionSession {
    pub fn new(original: RgbImage) -> Self {
        let working = original.clone();
        Self {
            mode: Mode::Idle,
            first_corner: None,
            rectangle: None,
            original,
            working,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn first_corner(&self) -> Option<Point> {
        self.first_corner
    }

    /// Last committed rectangle, kept until the next one replaces it
    pub fn rectangle(&self) -> Option<Rectangle> {
        self.rectangle
    }

    pub fn original(&self) -> &RgbImage {
        &self.original
    }

    pub fn working(&self) -> &RgbImage {
        &self.working
    }

    /// Start a new selection; returns false (and changes nothing) if one is
    /// already in progress
    pub fn enter_selection(&mut self) -> bool {
        if self.mode != Mode::Idle {
            return false;
        }

        self.working = self.original.clone();
        self.first_corner = None;
        self.mode = Mode::AwaitingFirstCorner;
        true
    }

    pub fn click(&mut self, point: Point) -> ClickOutcome {
        match (self.mode, self.first_corner) {
            (Mode::AwaitingFirstCorner, _) => {
                self.first_corner = Some(point);
                self.mode = Mode::AwaitingSecondCorner;
                ClickOutcome::FirstCorner(point)
            }
            (Mode::AwaitingSecondCorner, Some(first)) => {
                let rect = normalize(first, point);
                draw_outline(&mut self.working, &rect);
                self.rectangle = Some(rect);
                self.first_corner = None;
                self.mode = Mode::Idle;
                ClickOutcome::Committed(rect)
            }
            _ => ClickOutcome::Ignored,
        }
    }
}

/// Draw `rect` corner to corner (inclusive) onto `image`
fn draw_outline(image: &mut RgbImage, rect: &Rectangle) {
    let origin = rect.top_left();
    for inset in 0..OUTLINE_THICKNESS {
        let width = rect.width().saturating_add(1).saturating_sub(2 * inset);
        let height = rect.height().saturating_add(1).saturating_sub(2 * inset);
        if width == 0 || height == 0 {
            break;
        }
        let outline = Rect::at(origin.x + inset as i32, origin.y + inset as i32)
            .of_size(width, height);
        draw_hollow_rect_mut(image, outline, OUTLINE_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient() -> RgbImage {
        RgbImage::from_fn(100, 100, |x, y| Rgb([x as u8, y as u8, 128]))
    }

    fn committed(session: &mut SelectionSession, a: Point, b: Point) -> ClickOutcome {
        assert!(session.enter_selection());
        session.click(a);
        session.click(b)
    }

    #[test]
    fn starts_idle_with_clean_working_copy() {
        let session = SelectionSession::new(gradient());
        assert_eq!(session.mode(), Mode::Idle);
        assert_eq!(session.rectangle(), None);
        assert_eq!(session.working(), session.original());
    }

    #[test]
    fn two_clicks_commit_normalized_rectangle() {
        let mut session = SelectionSession::new(gradient());
        assert!(session.enter_selection());
        assert_eq!(session.mode(), Mode::AwaitingFirstCorner);

        let first = session.click(Point::new(90, 90));
        assert_eq!(first, ClickOutcome::FirstCorner(Point::new(90, 90)));
        assert_eq!(session.mode(), Mode::AwaitingSecondCorner);
        assert_eq!(session.first_corner(), Some(Point::new(90, 90)));

        let outcome = session.click(Point::new(10, 10));
        let expected = normalize(Point::new(10, 10), Point::new(90, 90));
        assert_eq!(outcome, ClickOutcome::Committed(expected));
        assert_eq!(session.rectangle(), Some(expected));
        assert_eq!(session.mode(), Mode::Idle);
        assert_eq!(session.first_corner(), None);
    }

    #[test]
    fn commit_draws_outline_on_working_only() {
        let mut session = SelectionSession::new(gradient());
        committed(&mut session, Point::new(10, 10), Point::new(90, 90));

        assert_eq!(*session.working().get_pixel(10, 10), OUTLINE_COLOR);
        assert_eq!(*session.working().get_pixel(11, 50), OUTLINE_COLOR);
        assert_eq!(*session.working().get_pixel(90, 90), OUTLINE_COLOR);
        assert_ne!(*session.working().get_pixel(50, 50), OUTLINE_COLOR);
        assert_eq!(*session.original(), gradient());
    }

    #[test]
    fn click_while_idle_is_ignored() {
        let mut session = SelectionSession::new(gradient());
        let before = session.clone();

        assert_eq!(session.click(Point::new(5, 5)), ClickOutcome::Ignored);
        assert_eq!(session.mode(), before.mode());
        assert_eq!(session.working(), before.working());
        assert_eq!(session.rectangle(), None);
    }

    #[test]
    fn reentering_while_selecting_is_rejected() {
        let mut session = SelectionSession::new(gradient());
        committed(&mut session, Point::new(10, 10), Point::new(40, 40));
        assert!(session.enter_selection());
        session.click(Point::new(3, 3));
        let working = session.working().clone();

        assert!(!session.enter_selection());
        assert_eq!(session.mode(), Mode::AwaitingSecondCorner);
        assert_eq!(session.first_corner(), Some(Point::new(3, 3)));
        assert_eq!(*session.working(), working);
    }

    #[test]
    fn reentering_before_first_click_is_rejected() {
        let mut session = SelectionSession::new(gradient());
        committed(&mut session, Point::new(10, 10), Point::new(40, 40));
        assert!(session.enter_selection());
        let working = session.working().clone();

        assert!(!session.enter_selection());
        assert_eq!(session.mode(), Mode::AwaitingFirstCorner);
        assert_eq!(session.first_corner(), None);
        assert_eq!(*session.working(), working);
    }

    #[test]
    fn reentering_discards_previous_outline() {
        let mut session = SelectionSession::new(gradient());
        committed(&mut session, Point::new(10, 10), Point::new(40, 40));
        assert_ne!(session.working(), session.original());

        assert!(session.enter_selection());
        assert_eq!(session.working(), session.original());
        assert_eq!(
            session.rectangle(),
            Some(normalize(Point::new(10, 10), Point::new(40, 40)))
        );
    }

    #[test]
    fn outlines_do_not_accumulate() {
        let mut session = SelectionSession::new(gradient());
        committed(&mut session, Point::new(10, 10), Point::new(40, 40));
        committed(&mut session, Point::new(60, 60), Point::new(80, 80));

        assert_eq!(*session.working().get_pixel(10, 10), Rgb([10, 10, 128]));
        assert_eq!(*session.working().get_pixel(60, 60), OUTLINE_COLOR);
    }

    #[test]
    fn degenerate_and_offscreen_rectangles_draw_safely() {
        let mut session = SelectionSession::new(gradient());
        committed(&mut session, Point::new(20, 20), Point::new(20, 20));
        assert!(session.rectangle().is_some_and(|r| r.is_empty()));
        assert_eq!(session.mode(), Mode::Idle);

        committed(&mut session, Point::new(150, 150), Point::new(200, 200));
        assert_eq!(session.working(), session.original());
    }
}
