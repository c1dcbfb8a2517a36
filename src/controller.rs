use crate::composite::composite;
use crate::error::CutoutError;
use crate::geometry::Point;
use crate::refine::{refine, AlphaMask};
use crate::segmentation::{SegmentationAdapter, Segmenter};
use crate::session::{ClickOutcome, Mode, SelectionSession};
use image::RgbImage;

/// Commands recognised from the input surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    EnterSelection,
    RunSegmentation,
    Quit,
}

impl Command {
    /// Key bindings: `r` select, `g` run, `q` quit
    pub fn from_key(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'r' => Some(Command::EnterSelection),
            'g' => Some(Command::RunSegmentation),
            'q' => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Everything the input surface can deliver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Left button press in image pixel coordinates
    Click(Point),
    Command(Command),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Success(String),
    Info(String),
    Error(CutoutError),
    Quit,
}

impl Status {
    pub fn message(&self) -> String {
        match self {
            Status::Success(msg) | Status::Info(msg) => msg.clone(),
            Status::Error(err) => err.to_string(),
            Status::Quit => "Goodbye!".to_string(),
        }
    }
}

/// Display-ready output of a successful run
#[derive(Debug, Clone, PartialEq)]
pub struct Cutout {
    pub mask: AlphaMask,
    pub result: RgbImage,
}

/// Reply to one dispatched event
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub status: Status,
    pub cutout: Option<Cutout>,
}

impl Outcome {
    fn status(status: Status) -> Self {
        Self {
            status,
            cutout: None,
        }
    }

    pub fn is_quit(&self) -> bool {
        self.status == Status::Quit
    }
}

/// Drives the selection session and the cutout pipeline from input events
///
/// Every event is handled to completion before the next one; a failed
/// command leaves the session exactly as it was.
pub struct SessionController {
    session: SelectionSession,
    segmentation: SegmentationAdapter,
}

impl SessionController {
    pub fn new(original: RgbImage, segmenter: Box<dyn Segmenter>) -> Self {
        Self {
            session: SelectionSession::new(original),
            segmentation: SegmentationAdapter::new(segmenter),
        }
    }

    pub fn session(&self) -> &SelectionSession {
        &self.session
    }

    pub fn dispatch(&mut self, event: Event) -> Outcome {
        let outcome = match event {
            Event::Click(point) => self.on_click(point),
            Event::Command(Command::EnterSelection) => self.on_enter_selection_command(),
            Event::Command(Command::RunSegmentation) => self.on_run_segmentation_command(),
            Event::Command(Command::Quit) => self.on_quit_command(),
        };

        match &outcome.status {
            Status::Success(msg) => tracing::info!("{}", msg),
            Status::Info(msg) => tracing::debug!("{}", msg),
            Status::Error(err) => tracing::warn!("{}", err),
            Status::Quit => tracing::info!("Goodbye!"),
        }
        outcome
    }

    pub fn on_enter_selection_command(&mut self) -> Outcome {
        if self.session.enter_selection() {
            Outcome::status(Status::Success(
                "Rectangle selection mode activated. Click for the top-left corner.".to_string(),
            ))
        } else {
            let progress = match self.session.first_corner() {
                Some(p) => format!(" (first corner at {})", p),
                None => String::new(),
            };
            Outcome::status(Status::Info(format!(
                "Already in rectangle selection mode{}. Complete the current selection first.",
                progress
            )))
        }
    }

    pub fn on_click(&mut self, point: Point) -> Outcome {
        match self.session.click(point) {
            ClickOutcome::FirstCorner(p) => Outcome::status(Status::Success(format!(
                "First click at {}. Click again for the opposite corner.",
                p
            ))),
            ClickOutcome::Committed(rect) => Outcome::status(Status::Success(format!(
                "Rectangle selected: {}",
                rect
            ))),
            ClickOutcome::Ignored => Outcome::status(Status::Info(format!(
                "Ignoring click at {}; press 'r' to select a rectangle",
                point
            ))),
        }
    }

    pub fn on_run_segmentation_command(&mut self) -> Outcome {
        let rect = match self.session.rectangle() {
            Some(rect) if !rect.is_empty() => rect,
            _ => return Outcome::status(Status::Error(CutoutError::SegmentationUnavailable)),
        };

        let working = self.session.working();
        let labels = match self.segmentation.run(working, &rect) {
            Ok(labels) => labels,
            Err(err) => return Outcome::status(Status::Error(err)),
        };
        assert_eq!(
            labels.dim(),
            (working.height() as usize, working.width() as usize),
            "label grid does not match image dimensions"
        );

        let mask = refine(&labels);
        let result = composite(working, &mask);

        Outcome {
            status: Status::Success(format!("Cutout ready for {}", rect)),
            cutout: Some(Cutout { mask, result }),
        }
    }

    pub fn on_quit_command(&mut self) -> Outcome {
        Outcome::status(Status::Quit)
    }

    /// True while a two-click selection is in progress
    pub fn is_selecting(&self) -> bool {
        self.session.mode() != Mode::Idle
    }
}
