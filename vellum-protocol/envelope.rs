use serde::{
  Deserialize,
  Serialize,
};
use thiserror::Error;

use crate::StyleToken;

/// An event posted by the embedded editor, JSON-encoded as
/// `{"type": <name>, "data": <payload>}`.
///
/// Parsing is all-or-nothing: an unknown `type` or a payload of the wrong
/// shape fails the whole message, and callers drop it without partial
/// application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Event {
  /// The embedded side finished wiring its entry points.
  IsMounted(bool),
  /// Full document HTML after a change, line endings normalized.
  EditorChange(String),
  /// Fires once, on the first user edit after the seeded content settled.
  ContentChange(bool),
  ActiveStyleChange(Vec<StyleToken>),
  /// Document scroll height in pixels.
  SizeChange(u32),
  /// Bottom edge of the caret rectangle in pixels.
  EditPosition(u32),
  OnFocus(bool),
  OnBlur(bool),
  /// URL, local path, or data URI of an image pasted into the editor.
  OnPastedImage(String),
}

impl Event {
  /// The wire name, for log lines.
  pub fn kind(&self) -> &'static str {
    match self {
      Event::IsMounted(_) => "isMounted",
      Event::EditorChange(_) => "editorChange",
      Event::ContentChange(_) => "contentChange",
      Event::ActiveStyleChange(_) => "activeStyleChange",
      Event::SizeChange(_) => "sizeChange",
      Event::EditPosition(_) => "editPosition",
      Event::OnFocus(_) => "onFocus",
      Event::OnBlur(_) => "onBlur",
      Event::OnPastedImage(_) => "onPastedImage",
    }
  }

  pub fn to_json(&self) -> Result<String, EnvelopeError> {
    serde_json::to_string(self).map_err(EnvelopeError::Serialize)
  }

  pub fn from_json(raw: &str) -> Result<Self, EnvelopeError> {
    serde_json::from_str(raw).map_err(EnvelopeError::Parse)
  }
}

#[derive(Debug, Error)]
pub enum EnvelopeError {
  #[error("failed to serialize editor event: {0}")]
  Serialize(serde_json::Error),
  #[error("failed to parse editor event: {0}")]
  Parse(serde_json::Error),
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    BaseInline,
    SpecialKeepInline,
  };

  #[test]
  fn events_use_the_tagged_envelope() {
    let raw = Event::IsMounted(true).to_json().unwrap();
    assert_eq!(raw, r#"{"type":"isMounted","data":true}"#);

    let raw = Event::SizeChange(420).to_json().unwrap();
    assert_eq!(raw, r#"{"type":"sizeChange","data":420}"#);
  }

  #[test]
  fn active_styles_serialize_as_token_strings() {
    let event = Event::ActiveStyleChange(vec![
      StyleToken::Base(BaseInline::Bold),
      StyleToken::Keep(SpecialKeepInline::Size, "18".into()),
    ]);
    assert_eq!(
      event.to_json().unwrap(),
      r#"{"type":"activeStyleChange","data":["Bold","Size-18"]}"#
    );
  }

  #[test]
  fn round_trips_through_the_wire_form() {
    let events = [
      Event::EditorChange("<p>hi</p>".into()),
      Event::ContentChange(true),
      Event::EditPosition(77),
      Event::OnFocus(true),
      Event::OnBlur(true),
      Event::OnPastedImage("data:image/png;base64,AAAA".into()),
    ];
    for event in events {
      let back = Event::from_json(&event.to_json().unwrap()).unwrap();
      assert_eq!(back, event);
    }
  }

  #[test]
  fn unknown_types_and_bad_payloads_fail_whole() {
    assert!(Event::from_json(r#"{"type":"telemetry","data":1}"#).is_err());
    assert!(Event::from_json(r#"{"type":"sizeChange","data":"tall"}"#).is_err());
    assert!(Event::from_json("not json").is_err());
  }
}
