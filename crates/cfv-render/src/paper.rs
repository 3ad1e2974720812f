//! Paper-size classification
//!
//! Page sizes are matched against a fixed catalog in order; the first entry
//! within [`SIZE_TOLERANCE_CM`] on both axes wins. Entries are far enough
//! apart that no size can match two of them.

use std::fmt;

use crate::constants::{SIZE_TOLERANCE_CM, SIZE_TOLERANCE_SLACK_CM};

/// One catalog entry, portrait dimensions in centimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperSizeEntry {
    pub width_cm: f32,
    pub height_cm: f32,
    pub label: &'static str,
    /// Imperial description shown next to the label, when it adds anything
    pub imperial: Option<&'static str>,
}

impl PaperSizeEntry {
    const fn new(width_cm: f32, height_cm: f32, label: &'static str) -> Self {
        Self {
            width_cm,
            height_cm,
            label,
            imperial: None,
        }
    }

    const fn imperial(mut self, description: &'static str) -> Self {
        self.imperial = Some(description);
        self
    }

    /// Both axes within the tolerance, boundary included
    pub fn matches(&self, width_cm: f32, height_cm: f32) -> bool {
        let limit = SIZE_TOLERANCE_CM + SIZE_TOLERANCE_SLACK_CM;
        (width_cm - self.width_cm).abs() <= limit && (height_cm - self.height_cm).abs() <= limit
    }
}

/// Catalog in match order
pub const PAPER_SIZES: &[PaperSizeEntry] = &[
    PaperSizeEntry::new(21.59, 27.94, "Letter").imperial("8.5\" x 11\""),
    PaperSizeEntry::new(21.59, 35.56, "Legal").imperial("8.5\" x 14\""),
    PaperSizeEntry::new(14.8, 21.0, "A5"),
    PaperSizeEntry::new(21.0, 29.7, "A4"),
    PaperSizeEntry::new(29.7, 42.0, "A3"),
    PaperSizeEntry::new(42.0, 59.4, "A2"),
    PaperSizeEntry::new(59.4, 84.1, "A1"),
    PaperSizeEntry::new(84.1, 118.9, "A0"),
    PaperSizeEntry::new(10.5, 14.8, "A6"),
    // Photo print sizes
    PaperSizeEntry::new(12.7, 17.8, "5\" x 7\""),
    PaperSizeEntry::new(15.2, 20.3, "6\" x 8\""),
    PaperSizeEntry::new(20.3, 25.4, "8\" x 10\""),
    PaperSizeEntry::new(25.4, 30.5, "10\" x 12\""),
    PaperSizeEntry::new(30.5, 40.6, "12\" x 16\""),
    PaperSizeEntry::new(40.6, 50.8, "16\" x 20\""),
    PaperSizeEntry::new(50.8, 61.0, "20\" x 24\""),
    PaperSizeEntry::new(61.0, 76.2, "24\" x 30\""),
    PaperSizeEntry::new(76.2, 101.6, "30\" x 40\""),
    PaperSizeEntry::new(101.6, 127.0, "40\" x 50\""),
    PaperSizeEntry::new(127.0, 152.4, "50\" x 60\""),
];

/// Result of matching a physical size against the catalog
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaperClass {
    Standard(&'static PaperSizeEntry),
    Custom { width_cm: f32, height_cm: f32 },
}

impl PaperClass {
    pub fn is_custom(&self) -> bool {
        matches!(self, PaperClass::Custom { .. })
    }

    pub fn entry(&self) -> Option<&'static PaperSizeEntry> {
        match self {
            PaperClass::Standard(entry) => Some(entry),
            PaperClass::Custom { .. } => None,
        }
    }
}

impl fmt::Display for PaperClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaperClass::Standard(entry) => f.write_str(entry.label),
            PaperClass::Custom {
                width_cm,
                height_cm,
            } => write!(f, "Custom Size: {:.2} cm x {:.2} cm", width_cm, height_cm),
        }
    }
}

/// Find the first catalog entry matching `width_cm` x `height_cm`
pub fn lookup(width_cm: f32, height_cm: f32) -> PaperClass {
    PAPER_SIZES
        .iter()
        .find(|entry| entry.matches(width_cm, height_cm))
        .map_or(
            PaperClass::Custom {
                width_cm,
                height_cm,
            },
            PaperClass::Standard,
        )
}

/// Label for a physical page size: the catalog label, or
/// `"Custom Size: W cm x H cm"` when nothing matches
pub fn classify(width_cm: f32, height_cm: f32) -> String {
    lookup(width_cm, height_cm).to_string()
}

/// Size line shown under a page, e.g. `Size: 21.00 cm x 29.70 cm (A4)`
pub fn describe_size(width_cm: f32, height_cm: f32) -> String {
    match lookup(width_cm, height_cm) {
        PaperClass::Standard(entry) => match entry.imperial {
            Some(imperial) => format!(
                "Size: {:.2} cm x {:.2} cm ({}: {})",
                width_cm, height_cm, entry.label, imperial
            ),
            None => format!(
                "Size: {:.2} cm x {:.2} cm ({})",
                width_cm, height_cm, entry.label
            ),
        },
        custom => custom.to_string(),
    }
}

/// Catalog entry with the given label, case-insensitive
pub fn find_by_label(label: &str) -> Option<&'static PaperSizeEntry> {
    PAPER_SIZES
        .iter()
        .find(|entry| entry.label.eq_ignore_ascii_case(label))
}
