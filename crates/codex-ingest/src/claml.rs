//! WHO ClaML documents.
//!
//! Two shapes are recognized:
//!
//! - ClaML proper: `<Class code="A00">` with the preferred rubric label
//!   (`<Rubric kind="preferred"><Label>Cholera</Label></Rubric>`)
//! - simplified exports: elements whose name ends in `category` or `item`
//!   holding `<code>` and `<description>` (or `<title>`) children
//!
//! Elements missing either a code or a description are skipped.

use std::path::Path;

use codex_model::{RawRecord, RawTable};
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{IngestError, Result};

/// Header of tables produced from ClaML.
pub const CLAML_COLUMNS: [&str; 2] = ["code", "description"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKind {
    Class,
    Generic,
}

#[derive(Debug)]
struct Frame {
    kind: FrameKind,
    depth: usize,
    line: u64,
    code: Option<String>,
    description: Option<String>,
    /// A `<title>` seen before any `<description>`.
    title: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Code,
    Description,
    Title,
}

#[derive(Debug)]
struct Capture {
    target: Target,
    depth: usize,
    text: String,
}

/// Parse a ClaML document into `(code, description)` records.
pub fn read_claml(text: &str, path: &Path) -> Result<RawTable> {
    let mut reader = Reader::from_str(text);
    let mut table = RawTable::new(Some(CLAML_COLUMNS.iter().map(|c| c.to_string()).collect()));

    let mut depth = 0usize;
    let mut frames: Vec<Frame> = Vec::new();
    let mut capture: Option<Capture> = None;
    let mut preferred_rubric: Option<usize> = None;
    let mut lines = LineTracker::new(text);

    loop {
        let event = reader.read_event().map_err(|err| IngestError::Xml {
            path: path.to_path_buf(),
            message: format!("{err} (at byte {})", reader.error_position()),
        })?;
        match event {
            Event::Start(element) => {
                depth += 1;
                let name = local_name(&element);
                let line = lines.line_at(reader.buffer_position() as usize);
                match (name.as_str(), frames.last().map(|f| f.kind)) {
                    ("class", _) => frames.push(Frame {
                        kind: FrameKind::Class,
                        depth,
                        line,
                        code: attribute(&element, "code", path)?,
                        description: None,
                        title: None,
                    }),
                    (other, _) if other.ends_with("category") || other.ends_with("item") => {
                        frames.push(Frame {
                            kind: FrameKind::Generic,
                            depth,
                            line,
                            code: None,
                            description: None,
                            title: None,
                        })
                    }
                    ("rubric", Some(FrameKind::Class)) => {
                        let kind = attribute(&element, "kind", path)?;
                        if kind.as_deref() == Some("preferred") {
                            preferred_rubric = Some(depth);
                        }
                    }
                    ("label", Some(FrameKind::Class)) if preferred_rubric.is_some() => {
                        capture = start_capture(capture, Target::Description, depth);
                    }
                    ("code", Some(FrameKind::Generic)) => {
                        capture = start_capture(capture, Target::Code, depth);
                    }
                    ("description", Some(FrameKind::Generic)) => {
                        capture = start_capture(capture, Target::Description, depth);
                    }
                    ("title", Some(FrameKind::Generic)) => {
                        capture = start_capture(capture, Target::Title, depth);
                    }
                    _ => {}
                }
            }
            Event::Text(content) => {
                if let Some(active) = capture.as_mut() {
                    active.text.push_str(&String::from_utf8_lossy(&content));
                }
            }
            Event::CData(content) => {
                if let Some(active) = capture.as_mut() {
                    active.text.push_str(&String::from_utf8_lossy(&content));
                }
            }
            Event::GeneralRef(reference) => {
                if let Some(active) = capture.as_mut() {
                    let resolved = reference.resolve_char_ref().map_err(|err| IngestError::Xml {
                        path: path.to_path_buf(),
                        message: err.to_string(),
                    })?;
                    match resolved {
                        Some(ch) => active.text.push(ch),
                        None => {
                            let name = String::from_utf8_lossy(&reference).into_owned();
                            match resolve_predefined_entity(&name) {
                                Some(value) => active.text.push_str(value),
                                None => {
                                    active.text.push('&');
                                    active.text.push_str(&name);
                                    active.text.push(';');
                                }
                            }
                        }
                    }
                }
            }
            Event::End(_) => {
                if capture.as_ref().is_some_and(|active| active.depth == depth)
                    && let Some(done) = capture.take()
                    && let Some(frame) = frames.last_mut()
                {
                    finish_capture(frame, done);
                }
                if preferred_rubric == Some(depth) {
                    preferred_rubric = None;
                }
                if frames.last().is_some_and(|frame| frame.depth == depth)
                    && let Some(frame) = frames.pop()
                {
                    emit(&mut table, frame);
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    tracing::debug!(path = %path.display(), records = table.len(), "parsed ClaML document");
    Ok(table)
}

fn local_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.local_name().as_ref()).to_ascii_lowercase()
}

fn attribute(element: &BytesStart<'_>, name: &str, path: &Path) -> Result<Option<String>> {
    let attr = element
        .try_get_attribute(name)
        .map_err(|err| IngestError::Xml {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    let Some(attr) = attr else {
        return Ok(None);
    };
    let raw = String::from_utf8_lossy(&attr.value);
    let value = unescape(&raw).map_err(|err| IngestError::Xml {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    Ok(Some(value.trim().to_string()))
}

/// Begin capturing unless a capture is already running (nested markup inside
/// a label keeps feeding the outer capture).
fn start_capture(current: Option<Capture>, target: Target, depth: usize) -> Option<Capture> {
    current.or(Some(Capture {
        target,
        depth,
        text: String::new(),
    }))
}

fn finish_capture(frame: &mut Frame, capture: Capture) {
    let text = capture.text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.is_empty() {
        return;
    }
    let slot = match capture.target {
        Target::Code => &mut frame.code,
        Target::Description => &mut frame.description,
        Target::Title => &mut frame.title,
    };
    if slot.is_none() {
        *slot = Some(text);
    }
}

fn emit(table: &mut RawTable, frame: Frame) {
    let description = frame.description.or(frame.title);
    if let (Some(code), Some(description)) = (frame.code, description)
        && !code.is_empty()
    {
        table.push(RawRecord::new(frame.line, vec![code, description]));
    }
}

/// Maps byte offsets to 1-based line numbers, moving forward only.
struct LineTracker<'a> {
    bytes: &'a [u8],
    offset: usize,
    line: u64,
}

impl<'a> LineTracker<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            bytes: text.as_bytes(),
            offset: 0,
            line: 1,
        }
    }

    fn line_at(&mut self, offset: usize) -> u64 {
        let target = offset.min(self.bytes.len());
        if target > self.offset {
            self.line += self.bytes[self.offset..target]
                .iter()
                .filter(|b| **b == b'\n')
                .count() as u64;
            self.offset = target;
        }
        self.line
    }
}
