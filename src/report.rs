//! Health report rendering via `printpdf`.
//!
//! `build_layout` turns one prediction into an ordered list of layout items
//! (pure, deterministic for a given date). `ReportGenerator` draws those items
//! onto A4 pages, writes the document to a scratch file and reads it back.
//! The scratch file is removed when the `ReportArtifact` drops, whichever way
//! rendering exits.

use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use printpdf::image_crate;
use printpdf::{
    BuiltinFont, Color, Image, ImageTransform, IndirectFontRef, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Rgb,
};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::models::{PatientInfo, PredictionResult};

pub const REPORT_TITLE: &str = "MediVision AI - Health Report";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_LEFT_MM: f32 = 20.0;
const MARGIN_BOTTOM_MM: f32 = 20.0;
const TOP_WITH_LOGO_MM: f32 = 60.0;
const TOP_WITHOUT_LOGO_MM: f32 = 20.0;
const LOGO_X_MM: f32 = 80.0;
const LOGO_TOP_MM: f32 = 10.0;
const LOGO_WIDTH_MM: f32 = 50.0;
const WRAP_CHARS: usize = 85;
/// Points to millimetres.
const PT_TO_MM: f32 = 0.3528;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Report file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything a report shows.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub patient: &'a PatientInfo,
    pub prediction: &'a PredictionResult,
    pub symptoms: &'a [String],
    pub precautions: &'a [String],
    pub doctor: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutItem {
    /// Centered, bold, brand colour.
    Title(String),
    /// Centered, grey.
    Subtitle(String),
    /// Bold label line.
    Heading { text: String, size: f32 },
    /// Regular body line.
    Text(String),
    /// `- item` line inside a list section.
    Bullet(String),
    /// Free text, word-wrapped.
    Paragraph(String),
    /// Vertical space in millimetres.
    Gap(f32),
}

/// Lay out one report. Sections whose list is empty are left out.
pub fn build_layout(input: &ReportInput<'_>, date: NaiveDate) -> Vec<LayoutItem> {
    let patient = input.patient;
    let mut items = vec![
        LayoutItem::Title(REPORT_TITLE.to_string()),
        LayoutItem::Subtitle(format!("Date: {}", date.format("%d %B, %Y"))),
        LayoutItem::Gap(10.0),
        heading(format!("Patient Name: {}", sanitize_text(&patient.name)), 12.0),
        heading(format!("Age: {}", patient.age), 12.0),
        heading(format!("Gender: {}", patient.gender), 12.0),
        heading(format!("City: {}", sanitize_text(&patient.city)), 12.0),
        LayoutItem::Gap(5.0),
        heading(
            format!(
                "Predicted Disease: {}",
                sanitize_text(&input.prediction.disease)
            ),
            13.0,
        ),
        LayoutItem::Text(format!(
            "Confidence: {}",
            input.prediction.confidence_label()
        )),
    ];

    push_list(&mut items, "Symptoms:", input.symptoms);
    push_list(&mut items, "Precautions:", input.precautions);

    let doctor = sanitize_text(input.doctor);
    if !doctor.is_empty() {
        items.push(LayoutItem::Gap(5.0));
        items.push(heading("Recommended Doctor:".to_string(), 12.0));
        items.push(LayoutItem::Paragraph(doctor));
    }

    items
}

fn heading(text: String, size: f32) -> LayoutItem {
    LayoutItem::Heading { text, size }
}

fn push_list(items: &mut Vec<LayoutItem>, label: &str, entries: &[String]) {
    let entries: Vec<String> = entries
        .iter()
        .map(|e| sanitize_text(e))
        .filter(|e| !e.is_empty())
        .collect();
    if entries.is_empty() {
        return;
    }
    items.push(LayoutItem::Gap(5.0));
    items.push(heading(label.to_string(), 12.0));
    items.extend(entries.into_iter().map(LayoutItem::Bullet));
}

/// Replace control characters with spaces and trim. Form input must not be
/// able to inject line breaks or escape codes into the drawn text.
pub fn sanitize_text(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Temporary file holding a rendered report until it is read back.
pub struct ReportArtifact {
    file: NamedTempFile,
}

impl ReportArtifact {
    fn create(scratch_dir: Option<&Path>) -> Result<Self, ReportError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(ARTIFACT_PREFIX).suffix(ARTIFACT_SUFFIX);
        let file = match scratch_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir)?;
                builder.tempfile_in(dir)?
            }
            None => builder.tempfile()?,
        };
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    fn write_document(&mut self, doc: PdfDocumentReference) -> Result<(), ReportError> {
        let mut writer = BufWriter::new(self.file.as_file_mut());
        doc.save(&mut writer)
            .map_err(|e| ReportError::Pdf(format!("PDF save error: {e}")))?;
        writer.flush()?;
        drop(writer);
        self.file.as_file().sync_all()?;
        Ok(())
    }

    pub fn read_bytes(&self) -> Result<Vec<u8>, ReportError> {
        Ok(std::fs::read(self.file.path())?)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReportGenerator {
    logo_path: Option<PathBuf>,
    scratch_dir: Option<PathBuf>,
}

impl ReportGenerator {
    pub fn new(logo_path: Option<PathBuf>, scratch_dir: Option<PathBuf>) -> Self {
        Self {
            logo_path,
            scratch_dir,
        }
    }

    /// Render with today's local date.
    pub fn render(&self, input: &ReportInput<'_>) -> Result<Vec<u8>, ReportError> {
        self.render_dated(input, Local::now().date_naive())
    }

    pub fn render_dated(
        &self,
        input: &ReportInput<'_>,
        date: NaiveDate,
    ) -> Result<Vec<u8>, ReportError> {
        let layout = build_layout(input, date);
        let doc = self.draw(&layout)?;

        let mut artifact = ReportArtifact::create(self.scratch_dir.as_deref())?;
        artifact.write_document(doc)?;
        let bytes = artifact.read_bytes()?;
        tracing::debug!(bytes = bytes.len(), "Report rendered");
        Ok(bytes)
    }

    fn draw(&self, layout: &[LayoutItem]) -> Result<PdfDocumentReference, ReportError> {
        let (doc, page1, layer1) = PdfDocument::new(
            REPORT_TITLE,
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let layer = doc.get_page(page1).get_layer(layer1);
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Pdf(format!("PDF font error: {e}")))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Pdf(format!("PDF font error: {e}")))?;

        let top = if self.draw_logo(&layer) {
            TOP_WITH_LOGO_MM
        } else {
            TOP_WITHOUT_LOGO_MM
        };

        let mut cursor = PageCursor {
            doc: &doc,
            layer,
            y: PAGE_HEIGHT_MM - top,
        };

        for item in layout {
            match item {
                LayoutItem::Title(text) => {
                    cursor.line(text, 16.0, 10.0, centered_x(text, 16.0), &bold, brand_blue());
                }
                LayoutItem::Subtitle(text) => {
                    cursor.line(text, 11.0, 10.0, centered_x(text, 11.0), &font, grey());
                }
                LayoutItem::Heading { text, size } => {
                    cursor.line(text, *size, 10.0, MARGIN_LEFT_MM, &bold, black());
                }
                LayoutItem::Text(text) => {
                    cursor.line(text, 11.0, 10.0, MARGIN_LEFT_MM, &font, black());
                }
                LayoutItem::Bullet(text) => {
                    for (i, line) in wrap_text(text, WRAP_CHARS - 2).into_iter().enumerate() {
                        let line = if i == 0 { format!("- {line}") } else { format!("  {line}") };
                        cursor.line(&line, 11.0, 8.0, MARGIN_LEFT_MM, &font, black());
                    }
                }
                LayoutItem::Paragraph(text) => {
                    for line in wrap_text(text, WRAP_CHARS) {
                        cursor.line(&line, 11.0, 8.0, MARGIN_LEFT_MM, &font, black());
                    }
                }
                LayoutItem::Gap(mm) => cursor.y -= *mm,
            }
        }

        Ok(doc)
    }

    /// Draw the logo if configured and decodable. Never fails the report.
    fn draw_logo(&self, layer: &PdfLayerReference) -> bool {
        let Some(path) = &self.logo_path else {
            return false;
        };

        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No report logo, rendering without it");
                return false;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cannot read report logo");
                return false;
            }
        };

        let decoded = match image_crate::load_from_memory(&bytes) {
            Ok(img) => img,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Cannot decode report logo");
                return false;
            }
        };

        let image = Image::from_dynamic_image(&decoded);
        let width_px = image.image.width.0 as f32;
        if width_px <= 0.0 {
            return false;
        }
        let height_px = image.image.height.0 as f32;
        // dpi chosen so the logo is LOGO_WIDTH_MM wide
        let dpi = width_px * 25.4 / LOGO_WIDTH_MM;
        let height_mm = height_px * 25.4 / dpi;

        image.add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(LOGO_X_MM)),
                translate_y: Some(Mm(PAGE_HEIGHT_MM - LOGO_TOP_MM - height_mm)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
        true
    }
}

/// Tracks the current page and vertical position, adding pages as needed.
struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    /// Top of the next line, millimetres from the bottom edge.
    y: f32,
}

impl PageCursor<'_> {
    fn line(
        &mut self,
        text: &str,
        size: f32,
        height: f32,
        x: f32,
        font: &IndirectFontRef,
        color: Color,
    ) {
        if self.y - height < MARGIN_BOTTOM_MM {
            let (page, layer) =
                self.doc
                    .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - TOP_WITHOUT_LOGO_MM;
        }

        let baseline = self.y - height * 0.7;
        self.layer.set_fill_color(color);
        self.layer.use_text(text, size, Mm(x), Mm(baseline), font);
        self.y -= height;
    }
}

/// Approximate horizontal centre for Helvetica (average glyph ≈ 0.5 em).
fn centered_x(text: &str, size: f32) -> f32 {
    let width = text.chars().count() as f32 * size * 0.5 * PT_TO_MM;
    ((PAGE_WIDTH_MM - width) / 2.0).max(MARGIN_LEFT_MM)
}

fn brand_blue() -> Color {
    Color::Rgb(Rgb::new(0.0, 51.0 / 255.0, 102.0 / 255.0, None))
}

fn grey() -> Color {
    Color::Rgb(Rgb::new(100.0 / 255.0, 100.0 / 255.0, 100.0 / 255.0, None))
}

fn black() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

const ARTIFACT_PREFIX: &str = "medivision-report-";
const ARTIFACT_SUFFIX: &str = ".pdf";

/// Remove report scratch files left behind by a previous crash.
/// Returns the number of files removed.
pub fn cleanup_orphaned_reports(scratch_dir: &Path) -> usize {
    let entries = match std::fs::read_dir(scratch_dir) {
        Ok(e) => e,
        Err(_) => return 0, // Scratch dir may not exist yet
    };

    let mut count = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        let is_artifact = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(ARTIFACT_PREFIX) && n.ends_with(ARTIFACT_SUFFIX));
        if is_artifact && path.is_file() && std::fs::remove_file(&path).is_ok() {
            count += 1;
        }
    }

    if count > 0 {
        tracing::info!(files_cleaned = count, "Cleaned orphaned report files");
    }
    count
}

/// Simple word-wrap helper for PDF text rendering.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.len() + word.len() + 1 > max_chars && !current.is_empty() {
            lines.push(current.clone());
            current.clear();
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Gender;

    fn patient() -> PatientInfo {
        PatientInfo {
            name: "Ayesha Khan".into(),
            age: 31,
            gender: Gender::Female,
            city: "Lahore".into(),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 15).unwrap()
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn texts(layout: &[LayoutItem]) -> Vec<String> {
        layout
            .iter()
            .filter_map(|item| match item {
                LayoutItem::Title(t)
                | LayoutItem::Subtitle(t)
                | LayoutItem::Text(t)
                | LayoutItem::Bullet(t)
                | LayoutItem::Paragraph(t) => Some(t.clone()),
                LayoutItem::Heading { text, .. } => Some(text.clone()),
                LayoutItem::Gap(_) => None,
            })
            .collect()
    }

    #[test]
    fn layout_contains_all_sections_in_order() {
        let patient = patient();
        let prediction = PredictionResult::new("Acne", 87.5);
        let symptoms = strings(&["blackheads", "pus_filled_pimples"]);
        let precautions = strings(&["bath twice", "drink plenty of water"]);
        let input = ReportInput {
            patient: &patient,
            prediction: &prediction,
            symptoms: &symptoms,
            precautions: &precautions,
            doctor: "Dr. Sarah Malik - Cosmo Clinic",
        };

        let lines = texts(&build_layout(&input, date()));
        assert_eq!(
            lines,
            vec![
                REPORT_TITLE,
                "Date: 15 October, 2026",
                "Patient Name: Ayesha Khan",
                "Age: 31",
                "Gender: Female",
                "City: Lahore",
                "Predicted Disease: Acne",
                "Confidence: 87.50%",
                "Symptoms:",
                "blackheads",
                "pus_filled_pimples",
                "Precautions:",
                "bath twice",
                "drink plenty of water",
                "Recommended Doctor:",
                "Dr. Sarah Malik - Cosmo Clinic",
            ]
        );
    }

    #[test]
    fn empty_precautions_omit_section() {
        let patient = patient();
        let prediction = PredictionResult::new("Dengue", 40.0);
        let symptoms = strings(&["high_fever"]);
        let input = ReportInput {
            patient: &patient,
            prediction: &prediction,
            symptoms: &symptoms,
            precautions: &[],
            doctor: "Dr. Huma Khan - Lahore General Hospital",
        };

        let lines = texts(&build_layout(&input, date()));
        assert!(!lines.iter().any(|l| l == "Precautions:"));
        assert!(lines.iter().any(|l| l == "Symptoms:"));
    }

    #[test]
    fn layout_is_deterministic_for_a_date() {
        let patient = patient();
        let prediction = PredictionResult::new("Acne", 50.0);
        let input = ReportInput {
            patient: &patient,
            prediction: &prediction,
            symptoms: &[],
            precautions: &[],
            doctor: "Dr. X",
        };
        assert_eq!(build_layout(&input, date()), build_layout(&input, date()));
    }

    #[test]
    fn control_characters_stripped_from_user_text() {
        let mut patient = patient();
        patient.name = "Ali\n\x1b[31mRed".into();
        let prediction = PredictionResult::new("Acne", 50.0);
        let input = ReportInput {
            patient: &patient,
            prediction: &prediction,
            symptoms: &[],
            precautions: &[],
            doctor: "Dr. X",
        };

        let lines = texts(&build_layout(&input, date()));
        assert!(lines.contains(&"Patient Name: Ali  [31mRed".to_string()));
        assert!(lines.iter().all(|l| !l.chars().any(char::is_control)));
    }

    #[test]
    fn renders_pdf_bytes_and_cleans_scratch_file() {
        let scratch = tempfile::tempdir().unwrap();
        let generator = ReportGenerator::new(None, Some(scratch.path().to_path_buf()));

        let patient = patient();
        let prediction = PredictionResult::new("Malaria", 91.234);
        let symptoms = strings(&["chills", "high_fever", "sweating"]);
        let precautions = strings(&["Consult nearest hospital", "keep mosquitos out"]);
        let input = ReportInput {
            patient: &patient,
            prediction: &prediction,
            symptoms: &symptoms,
            precautions: &precautions,
            doctor: "Dr. Saima Zubair - Polyclinic Islamabad",
        };

        let bytes = generator.render_dated(&input, date()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_logo_does_not_fail_report() {
        let tmp = tempfile::tempdir().unwrap();
        let generator = ReportGenerator::new(Some(tmp.path().join("logo.png")), None);
        let patient = patient();
        let prediction = PredictionResult::new("Acne", 50.0);
        let input = ReportInput {
            patient: &patient,
            prediction: &prediction,
            symptoms: &[],
            precautions: &[],
            doctor: "Dr. X",
        };
        assert!(generator.render(&input).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn corrupt_logo_does_not_fail_report() {
        let tmp = tempfile::tempdir().unwrap();
        let logo = tmp.path().join("logo.png");
        std::fs::write(&logo, b"definitely not a png").unwrap();

        let generator = ReportGenerator::new(Some(logo), None);
        let patient = patient();
        let prediction = PredictionResult::new("Acne", 50.0);
        let input = ReportInput {
            patient: &patient,
            prediction: &prediction,
            symptoms: &[],
            precautions: &[],
            doctor: "Dr. X",
        };
        assert!(generator.render(&input).is_ok());
    }

    #[test]
    fn long_lists_spill_onto_new_pages() {
        let generator = ReportGenerator::default();
        let patient = patient();
        let prediction = PredictionResult::new("Acne", 50.0);
        let symptoms: Vec<String> = (0..60).map(|i| format!("symptom number {i}")).collect();
        let input = ReportInput {
            patient: &patient,
            prediction: &prediction,
            symptoms: &symptoms,
            precautions: &[],
            doctor: "Dr. X",
        };
        assert!(generator.render_dated(&input, date()).is_ok());
    }

    #[test]
    fn wrap_text_splits_on_words() {
        let lines = wrap_text("one two three four", 9);
        assert_eq!(lines, vec!["one two", "three", "four"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn orphaned_reports_removed_other_files_kept() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("medivision-report-abc123.pdf"), b"%PDF").unwrap();
        std::fs::write(dir.path().join("medivision-report-def456.pdf"), b"%PDF").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"keep").unwrap();

        assert_eq!(cleanup_orphaned_reports(dir.path()), 2);
        assert!(dir.path().join("notes.txt").exists());
        assert_eq!(cleanup_orphaned_reports(dir.path()), 0);
    }

    #[test]
    fn orphan_cleanup_tolerates_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(cleanup_orphaned_reports(&dir.path().join("absent")), 0);
    }
}
