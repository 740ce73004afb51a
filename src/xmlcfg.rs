//! Reading and rewriting of the camera's detection configuration documents.
//!
//! The documents are treated as opaque beyond one contract: the root element
//! has a child whose local name is `enabled` holding `true` or `false`. The
//! root may sit in a default XML namespace, and the camera's own parser is
//! namespace-sensitive, so the toggled output re-declares whatever namespace
//! the input used. Everything else (thresholds, sensitivity, regions) passes
//! through unmodified so the saved copy can be restored faithfully.
use err_derive::Error;
use xml::reader::{EventReader, XmlEvent};
use xml::writer::EmitterConfig;

/// Errors raised while reading or rewriting a detection document
#[derive(Debug, Error)]
pub enum XmlError {
    /// Raised when the document cannot be parsed
    #[error(display = "Failed to parse detection document")]
    Parse(#[error(source)] xml::reader::Error),

    /// Raised when the rewritten document cannot be emitted
    #[error(display = "Failed to re-emit detection document")]
    Emit(#[error(source)] xml::writer::Error),
}

/// The state of a document's `enabled` flag
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct EnabledFlag {
    /// The default namespace the root element was declared in, if any
    pub(crate) namespace: Option<String>,
    /// Whether the flag's text content is the literal `true`
    pub(crate) enabled: bool,
}

/// Locates the `enabled` flag of a detection document by local name,
/// regardless of the document's namespace.
pub(crate) fn read_enabled_flag(doc: &[u8]) -> Result<Option<EnabledFlag>, XmlError> {
    let events = parse(doc)?;
    Ok(locate_enabled(&events).map(|span| EnabledFlag {
        namespace: span.namespace,
        enabled: span.value == "true",
    }))
}

/// Produces a copy of the document with `enabled` flipped from `true` to
/// `false`, or `None` when there is nothing to change.
///
/// This only ever flips `true` to `false`. Re-enabling happens by restoring
/// a saved enabled document, never by toggling a disabled one back.
pub(crate) fn toggle_to_disabled(doc: &[u8]) -> Result<Option<Vec<u8>>, XmlError> {
    let mut events = parse(doc)?;
    let span = match locate_enabled(&events) {
        Some(span) if span.value == "true" => span,
        _ => return Ok(None),
    };

    let (from, to) = span.text_range;
    events.splice(from..to, std::iter::once(XmlEvent::Characters("false".to_string())));

    emit(&events).map(Some)
}

fn parse(doc: &[u8]) -> Result<Vec<XmlEvent>, XmlError> {
    EventReader::new(doc)
        .into_iter()
        .collect::<Result<Vec<_>, _>>()
        .map_err(XmlError::Parse)
}

struct EnabledSpan {
    namespace: Option<String>,
    /// Event indices strictly inside the `enabled` element
    text_range: (usize, usize),
    value: String,
}

fn locate_enabled(events: &[XmlEvent]) -> Option<EnabledSpan> {
    let mut depth = 0usize;
    let mut namespace = None;
    let mut enabled_start = None;
    let mut span = None;

    for (i, event) in events.iter().enumerate() {
        match event {
            XmlEvent::StartElement { name, .. } => {
                if depth == 0 {
                    namespace = name.namespace.clone();
                } else if depth == 1
                    && span.is_none()
                    && enabled_start.is_none()
                    && name.local_name == "enabled"
                {
                    enabled_start = Some(i);
                }
                depth += 1;
            }
            XmlEvent::EndElement { .. } => {
                depth -= 1;
                if depth == 1 {
                    if let Some(start) = enabled_start.take() {
                        span = Some((start, i));
                    }
                }
            }
            _ => {}
        }
    }

    let (start, end) = span?;
    let mut value = String::new();
    for event in &events[start + 1..end] {
        match event {
            XmlEvent::Characters(text) | XmlEvent::CData(text) => value.push_str(text),
            _ => {}
        }
    }
    Some(EnabledSpan {
        namespace,
        text_range: (start + 1, end),
        value,
    })
}

fn emit(events: &[XmlEvent]) -> Result<Vec<u8>, XmlError> {
    let mut out = Vec::new();
    let mut writer = EmitterConfig::new()
        .perform_indent(false)
        .create_writer(&mut out);
    for event in events {
        if let Some(writer_event) = event.as_writer_event() {
            writer.write(writer_event).map_err(XmlError::Emit)?;
        }
    }
    Ok(out)
}
