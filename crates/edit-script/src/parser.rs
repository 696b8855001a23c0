//! Section splitting and strict row decoding.
//!
//! An edit script is a list of rows grouped into sections. A section starts
//! at a keyword row (`clip`, `text`, `image`, `color`, `sound`) and runs
//! until a row with a blank first cell or the next keyword row. Blank rows
//! between sections are skipped. Any other row outside a section is an
//! unknown keyword.
//!
//! Decoding is fail-fast within a section: the first malformed row ends
//! that section.

use std::path::{Path, PathBuf};

use crate::color::HexColor;
use crate::error::ScriptError;
use crate::geometry::{NormalizedPoint, Scale};
use crate::row::{is_sentinel, Cell, Row};
use crate::segment::{
    AudioSegment, ClipSegment, ColorSegment, EditScript, FrameRange, ImageSegment, SectionKind,
    Segment, TextSegment,
};

/// Separator that splits a caption cell into lines of a grouped caption.
pub const GROUP_DELIMITER: char = ';';

/// A keyword row and the data rows under it.
#[derive(Debug, Clone, Copy)]
pub struct Section<'a> {
    pub kind: SectionKind,
    /// Index of the keyword row.
    pub header_row: usize,
    /// Data rows, starting right after the keyword row.
    pub rows: &'a [Row],
}

impl Section<'_> {
    /// Index of the first data row.
    pub fn first_row(&self) -> usize {
        self.header_row + 1
    }
}

/// Split rows into sections.
///
/// Unknown keywords are reported in place; the rows under them are skipped
/// up to the next sentinel or keyword row.
pub fn split_sections(rows: &[Row]) -> Vec<Result<Section<'_>, ScriptError>> {
    let mut sections = Vec::new();
    let mut index = 0;

    while index < rows.len() {
        let row = &rows[index];
        if is_sentinel(row) {
            index += 1;
            continue;
        }

        let body_start = index + 1;
        let body_end = section_end(rows, body_start);
        let first = &row[0];

        match first.as_text().and_then(SectionKind::from_keyword) {
            Some(kind) => sections.push(Ok(Section {
                kind,
                header_row: index,
                rows: &rows[body_start..body_end],
            })),
            None => sections.push(Err(ScriptError::UnknownSectionKeyword {
                row: index,
                keyword: first
                    .as_text()
                    .map(str::to_string)
                    .unwrap_or_else(|| first.to_string()),
            })),
        }

        index = body_end;
    }

    sections
}

fn section_end(rows: &[Row], from: usize) -> usize {
    rows[from..]
        .iter()
        .position(|row| is_sentinel(row) || starts_section(row))
        .map_or(rows.len(), |offset| from + offset)
}

fn starts_section(row: &[Cell]) -> bool {
    row.first()
        .and_then(Cell::as_text)
        .and_then(SectionKind::from_keyword)
        .is_some()
}

/// Parse rows into an edit script, stopping at the first error.
pub fn parse_rows(rows: &[Row], media_dir: &Path) -> Result<EditScript, ScriptError> {
    let mut script = EditScript::new();
    for section in split_sections(rows) {
        decode_section(&section?, media_dir, &mut script)?;
    }
    log_summary(&script);
    Ok(script)
}

/// Parse rows, collecting every error instead of stopping.
///
/// A malformed row drops the rest of its section; parsing resumes at the
/// next section. Segments decoded before the error are kept.
pub fn parse_rows_lenient(rows: &[Row], media_dir: &Path) -> (EditScript, Vec<ScriptError>) {
    let mut script = EditScript::new();
    let mut errors = Vec::new();

    for section in split_sections(rows) {
        let result = section.and_then(|section| decode_section(&section, media_dir, &mut script));
        if let Err(e) = result {
            tracing::warn!(error = %e, "Skipping rest of section");
            errors.push(e);
        }
    }

    log_summary(&script);
    (script, errors)
}

fn log_summary(script: &EditScript) {
    tracing::debug!(
        clips = script.clips.len(),
        texts = script.texts.len(),
        images = script.images.len(),
        colors = script.colors.len(),
        sounds = script.audios.len(),
        "Parsed edit script"
    );
}

/// Decode every data row of a section into `script`.
///
/// Returns the number of segments added.
pub fn decode_section(
    section: &Section<'_>,
    media_dir: &Path,
    script: &mut EditScript,
) -> Result<usize, ScriptError> {
    for (offset, row) in section.rows.iter().enumerate() {
        let segment = decode_row(section.kind, section.first_row() + offset, row, media_dir)?;
        script.push(segment);
    }
    tracing::debug!(
        kind = %section.kind,
        row = section.header_row,
        count = section.rows.len(),
        "Decoded section"
    );
    Ok(section.rows.len())
}

/// Decode one data row of the given kind.
///
/// `index` is the row's position in the full row list, used in errors.
pub fn decode_row(
    kind: SectionKind,
    index: usize,
    cells: &[Cell],
    media_dir: &Path,
) -> Result<Segment, ScriptError> {
    let reader = RowReader::new(kind, index, cells)?;
    let segment = match kind {
        SectionKind::Clip => Segment::Clip(decode_clip(&reader, media_dir)?),
        SectionKind::Text => Segment::Text(decode_text(&reader)?),
        SectionKind::Image => Segment::Image(decode_image(&reader, media_dir)?),
        SectionKind::Color => Segment::Color(decode_color(&reader)?),
        SectionKind::Sound => Segment::Sound(decode_sound(&reader, media_dir)?),
    };
    Ok(segment)
}

/// Replace group delimiters with line breaks.
///
/// Returns the caption text and whether it was grouped.
pub fn split_group(text: &str) -> (String, bool) {
    if text.contains(GROUP_DELIMITER) {
        (text.replace(GROUP_DELIMITER, "\n"), true)
    } else {
        (text.to_string(), false)
    }
}

fn decode_clip(r: &RowReader<'_>, media_dir: &Path) -> Result<ClipSegment, ScriptError> {
    let file = r.path(0, media_dir)?;
    let range = r.range(1, 2)?;
    if range.start < 1 {
        return Err(r.error(format!(
            "start frame must be at least 1, got {}",
            range.start
        )));
    }
    let volume = r.float(3)?;
    if !(0.0..=1.0).contains(&volume) {
        return Err(r.error(format!("sound volume must be within 0..=1, got {volume}")));
    }
    Ok(ClipSegment {
        file,
        range,
        volume,
        transition: r.yes_no(4)?,
        channel: r.channel(5)?,
        show: r.flag(6)?,
    })
}

fn decode_text(r: &RowReader<'_>) -> Result<TextSegment, ScriptError> {
    let (text, group) = split_group(&r.string(0)?);
    let range = r.range(1, 2)?;
    let font = r.font(3)?;
    let size = r.float(4)?;
    if size <= 0.0 {
        return Err(r.error(format!("font size must be positive, got {size}")));
    }
    Ok(TextSegment {
        text,
        range,
        font,
        size,
        position: NormalizedPoint::new(r.float(5)?, r.float(6)?),
        color: r.color(7)?,
        shadow: r.flag(8)?,
        boxed: r.flag(9)?,
        box_color: r.color(10)?,
        bold: r.flag(11)?,
        italic: r.flag(12)?,
        channel: r.channel(13)?,
        group,
        show: r.flag(14)?,
    })
}

fn decode_image(r: &RowReader<'_>, media_dir: &Path) -> Result<ImageSegment, ScriptError> {
    Ok(ImageSegment {
        file: r.path(0, media_dir)?,
        range: r.range(1, 2)?,
        position: NormalizedPoint::new(r.float(3)?, r.float(4)?),
        scale: Scale::new(r.float(5)?, r.float(6)?),
        channel: r.channel(7)?,
        show: r.flag(8)?,
    })
}

fn decode_color(r: &RowReader<'_>) -> Result<ColorSegment, ScriptError> {
    Ok(ColorSegment {
        color: r.color(0)?,
        range: r.range(1, 2)?,
        position: NormalizedPoint::new(r.float(3)?, r.float(4)?),
        scale: Scale::new(r.float(5)?, r.float(6)?),
        channel: r.channel(7)?,
        show: r.flag(8)?,
    })
}

fn decode_sound(r: &RowReader<'_>, media_dir: &Path) -> Result<AudioSegment, ScriptError> {
    let file = r.path(0, media_dir)?;
    let range = r.range(1, 2)?;
    let volume = r.float(3)?;
    if volume < 0.0 {
        return Err(r.error(format!("volume must not be negative, got {volume}")));
    }
    Ok(AudioSegment {
        file,
        range,
        volume,
        channel: r.channel(4)?,
        show: r.flag(5)?,
    })
}

/// Typed access to the cells of one data row.
struct RowReader<'a> {
    kind: SectionKind,
    row: usize,
    cells: &'a [Cell],
}

impl<'a> RowReader<'a> {
    fn new(kind: SectionKind, row: usize, cells: &'a [Cell]) -> Result<Self, ScriptError> {
        let reader = Self { kind, row, cells };
        let arity = kind.columns().len();
        if let Some(extra) = cells.iter().skip(arity).position(|c| !c.is_blank()) {
            return Err(reader.error(format!(
                "expected {arity} columns, found a value in column {}",
                arity + extra + 1
            )));
        }
        Ok(reader)
    }

    fn error(&self, message: impl Into<String>) -> ScriptError {
        ScriptError::RowFormat {
            kind: self.kind,
            row: self.row,
            message: message.into(),
        }
    }

    fn label(&self, col: usize) -> String {
        format!("column {} ({})", col + 1, self.kind.columns()[col])
    }

    fn invalid(&self, col: usize, expected: &str, cell: &Cell) -> ScriptError {
        self.error(format!("{} must be {expected}, got {cell}", self.label(col)))
    }

    fn cell(&self, col: usize) -> Result<&'a Cell, ScriptError> {
        match self.cells.get(col) {
            Some(cell) if !cell.is_blank() => Ok(cell),
            _ => Err(self.error(format!("{} is missing", self.label(col)))),
        }
    }

    /// Text as written; numbers are accepted and printed back.
    fn string(&self, col: usize) -> Result<String, ScriptError> {
        match self.cell(col)? {
            Cell::Text(s) => Ok(s.clone()),
            Cell::Number(n) => Ok(format_number(*n)),
            other => Err(self.invalid(col, "text", other)),
        }
    }

    fn int(&self, col: usize) -> Result<i64, ScriptError> {
        let cell = self.cell(col)?;
        let value = match cell {
            Cell::Number(n) => integral(*n),
            Cell::Text(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(integral))
            }
            _ => None,
        };
        value.ok_or_else(|| self.invalid(col, "a whole number", cell))
    }

    fn float(&self, col: usize) -> Result<f64, ScriptError> {
        let cell = self.cell(col)?;
        let value = match cell {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        value
            .filter(|v| v.is_finite())
            .ok_or_else(|| self.invalid(col, "a number", cell))
    }

    /// Strict 0/1 flag.
    fn flag(&self, col: usize) -> Result<bool, ScriptError> {
        let cell = self.cell(col)?;
        let value = match cell {
            Cell::Bool(b) => Some(*b),
            Cell::Number(n) if *n == 0.0 => Some(false),
            Cell::Number(n) if *n == 1.0 => Some(true),
            Cell::Text(s) => match s.trim() {
                "0" => Some(false),
                "1" => Some(true),
                _ => None,
            },
            _ => None,
        };
        value.ok_or_else(|| self.invalid(col, "0 or 1", cell))
    }

    /// YES/NO style flag, case-insensitive.
    fn yes_no(&self, col: usize) -> Result<bool, ScriptError> {
        let cell = self.cell(col)?;
        let value = match cell {
            Cell::Bool(b) => Some(*b),
            Cell::Number(n) if *n == 0.0 => Some(false),
            Cell::Number(n) if *n == 1.0 => Some(true),
            Cell::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "yes" | "y" | "true" | "1" => Some(true),
                "no" | "n" | "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        };
        value.ok_or_else(|| self.invalid(col, "YES or NO", cell))
    }

    fn channel(&self, col: usize) -> Result<u32, ScriptError> {
        let value = self.int(col)?;
        u32::try_from(value)
            .ok()
            .filter(|c| *c >= 1)
            .ok_or_else(|| {
                self.error(format!(
                    "{} must be a positive track index, got {value}",
                    self.label(col)
                ))
            })
    }

    fn range(&self, start_col: usize, end_col: usize) -> Result<FrameRange, ScriptError> {
        let start = self.int(start_col)?;
        let end = self.int(end_col)?;
        FrameRange::new(start, end).ok_or(ScriptError::InvalidFrameRange {
            kind: self.kind,
            row: self.row,
            start,
            end,
        })
    }

    fn path(&self, col: usize, media_dir: &Path) -> Result<PathBuf, ScriptError> {
        let cell = self.cell(col)?;
        let name = cell
            .as_text()
            .ok_or_else(|| self.invalid(col, "a file name", cell))?;
        Ok(media_dir.join(name))
    }

    fn color(&self, col: usize) -> Result<HexColor, ScriptError> {
        let cell = self.cell(col)?;
        let hex = cell
            .as_text()
            .ok_or_else(|| self.invalid(col, "a hex color string", cell))?;
        HexColor::parse(hex).map_err(|e| e.with_row(self.row))
    }

    fn font(&self, col: usize) -> Result<String, ScriptError> {
        Ok(self.string(col)?.trim().to_string())
    }
}

fn integral(value: f64) -> Option<i64> {
    // Beyond 2^53 f64 no longer holds every integer.
    const LIMIT: f64 = 9_007_199_254_740_992.0;
    (value.is_finite() && value.fract() == 0.0 && value.abs() <= LIMIT).then(|| value as i64)
}

fn format_number(value: f64) -> String {
    match integral(value) {
        Some(i) => i.to_string(),
        None => value.to_string(),
    }
}
