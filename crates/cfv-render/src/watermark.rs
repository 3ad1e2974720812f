//! Watermark overlay
//!
//! The watermark is drawn as rotated, translucent Helvetica text centered on
//! a sheet. Viewers paint the same [`Watermark`] over on-screen pages; the
//! print writer emits it as PDF content operators.

use lopdf::{Dictionary, Object};

use crate::constants::{
    HELVETICA_CHAR_WIDTH_RATIO, WATERMARK_ANGLE_DEGREES, WATERMARK_OPACITY, WATERMARK_SPAN,
    WATERMARK_TEXT,
};
use crate::types::{RenderError, Result};

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Watermark {
    pub enabled: bool,
    pub text: String,
    /// 0.0 (invisible) to 1.0 (opaque)
    pub opacity: f32,
    /// Counter-clockwise rotation of the text baseline
    pub angle_degrees: f32,
    pub color: [u8; 3],
}

impl Default for Watermark {
    fn default() -> Self {
        Self {
            enabled: true,
            text: WATERMARK_TEXT.to_string(),
            opacity: WATERMARK_OPACITY,
            angle_degrees: WATERMARK_ANGLE_DEGREES,
            color: [255, 0, 0],
        }
    }
}

impl Watermark {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    pub fn is_visible(&self) -> bool {
        self.enabled && self.opacity > 0.0 && !self.text.trim().is_empty()
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.opacity) {
            return Err(RenderError::Config(format!(
                "watermark opacity must be between 0 and 1, got {}",
                self.opacity
            )));
        }
        if !self.angle_degrees.is_finite() {
            return Err(RenderError::Config(
                "watermark angle must be a finite number".to_string(),
            ));
        }
        Ok(())
    }

    /// Font size that makes the text span a fixed share of the sheet diagonal
    pub fn font_size(&self, sheet_width_pt: f32, sheet_height_pt: f32) -> f32 {
        let chars = self.text.chars().count().max(1) as f32;
        let diagonal = sheet_width_pt.hypot(sheet_height_pt);
        diagonal * WATERMARK_SPAN / (chars * HELVETICA_CHAR_WIDTH_RATIO)
    }

    /// Graphics state carrying the fill and stroke opacity
    pub fn ext_gstate(&self) -> Dictionary {
        let mut gs = Dictionary::new();
        gs.set("Type", Object::Name(b"ExtGState".to_vec()));
        gs.set("ca", Object::Real(self.opacity));
        gs.set("CA", Object::Real(self.opacity));
        gs
    }

    /// Content operators drawing the watermark centered on a sheet.
    ///
    /// `font` and `gstate` name the Helvetica font and the [`ext_gstate`]
    /// entries in the page resources. Returns an empty string when the
    /// watermark is not visible.
    ///
    /// [`ext_gstate`]: Watermark::ext_gstate
    pub fn content_ops(
        &self,
        sheet_width_pt: f32,
        sheet_height_pt: f32,
        font: &str,
        gstate: &str,
    ) -> String {
        if !self.is_visible() {
            return String::new();
        }

        let size = self.font_size(sheet_width_pt, sheet_height_pt);
        let text_width = self.text.chars().count() as f32 * size * HELVETICA_CHAR_WIDTH_RATIO;
        let (sin, cos) = self.angle_degrees.to_radians().sin_cos();

        // Start the baseline so the text box is centered on the sheet
        let cx = sheet_width_pt / 2.0;
        let cy = sheet_height_pt / 2.0;
        let half_cap = size / 3.0;
        let tx = cx - text_width / 2.0 * cos + half_cap * sin;
        let ty = cy - text_width / 2.0 * sin - half_cap * cos;

        let [r, g, b] = self.color.map(|c| c as f32 / 255.0);

        format!(
            "q /{} gs {:.3} {:.3} {:.3} rg BT /{} {:.2} Tf {:.4} {:.4} {:.4} {:.4} {:.2} {:.2} Tm ({}) Tj ET Q\n",
            gstate,
            r,
            g,
            b,
            font,
            size,
            cos,
            sin,
            -sin,
            cos,
            tx,
            ty,
            escape_pdf_text(&self.text)
        )
    }
}

/// Escape text for a PDF literal string.
///
/// Characters outside Latin-1 become `?`; bytes above 0x7E are written as
/// octal escapes so the content stream stays ASCII.
pub fn escape_pdf_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => {
                let code = c as u32;
                if code <= 0xFF {
                    out.push_str(&format!("\\{:03o}", code));
                } else {
                    out.push('?');
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_watermark() {
        let watermark = Watermark::default();
        assert!(watermark.is_visible());
        assert_eq!(watermark.text, "Confidential");
        assert_eq!(watermark.opacity, 0.2);
        assert_eq!(watermark.angle_degrees, 45.0);
    }

    #[test]
    fn test_disabled_watermark_emits_nothing() {
        let ops = Watermark::disabled().content_ops(595.0, 842.0, "F1", "GS1");
        assert!(ops.is_empty());
    }

    #[test]
    fn test_content_ops() {
        let ops = Watermark::default().content_ops(595.0, 842.0, "F1", "GS1");
        assert!(ops.starts_with("q /GS1 gs 1.000 0.000 0.000 rg BT /F1 "));
        assert!(ops.contains("0.7071 0.7071 -0.7071 0.7071"));
        assert!(ops.contains("(Confidential) Tj ET Q"));
    }

    #[test]
    fn test_font_size_spans_diagonal() {
        let watermark = Watermark::default();
        let size = watermark.font_size(300.0, 400.0);
        let width = 12.0 * size * HELVETICA_CHAR_WIDTH_RATIO;
        assert!((width - 500.0 * WATERMARK_SPAN).abs() < 0.01);
    }

    #[test]
    fn test_escape_pdf_text() {
        assert_eq!(escape_pdf_text("a(b)c\\"), "a\\(b\\)c\\\\");
        assert_eq!(escape_pdf_text("café"), "caf\\351");
        assert_eq!(escape_pdf_text("機密"), "??");
    }

    #[test]
    fn test_validate_rejects_bad_opacity() {
        let watermark = Watermark {
            opacity: 1.5,
            ..Watermark::default()
        };
        assert!(matches!(watermark.validate(), Err(RenderError::Config(_))));
        assert!(Watermark::default().validate().is_ok());
    }
}
