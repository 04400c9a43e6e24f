use serde_json::Value;
use vellum_protocol::{
  ALL_INLINE_FORMATS,
  BaseInline,
  BlockOperation,
  ListKind,
  MAX_INDENT,
  SpecialInline,
  SpecialKeepInline,
  StyleToken,
};

use crate::engine::{
  EditorEngine,
  FormatSnapshot,
};

/// Translate one style token into primitive formatting calls.
///
/// The token family already decided which operation runs (first match wins
/// at parse time); this resolves the toggle direction against the current
/// formats and performs exactly one operation.
pub fn apply_token<E: EditorEngine + ?Sized>(engine: &mut E, token: &StyleToken) {
  match token {
    StyleToken::Clear => clear_formats(engine),
    StyleToken::Base(kind) => {
      let snapshot = selection_formats(engine);
      let active = is_truthy(snapshot.get(kind.format_name()));
      engine.apply_format(kind.format_name(), Value::Bool(!active));
    },
    StyleToken::Block(kind) => match kind.operation() {
      BlockOperation::Indent(delta) => indent(engine, delta),
      BlockOperation::List(kind) => toggle_list(engine, kind),
    },
    StyleToken::Keep(kind, value) => {
      engine.apply_format(kind.format_name(), Value::String(value.clone()));
    },
    StyleToken::Toggle(kind, value) => {
      let snapshot = selection_formats(engine);
      let current = snapshot.get(kind.format_name()).and_then(Value::as_str);
      if current == Some(value.as_str()) {
        engine.apply_format(kind.format_name(), Value::Bool(false));
      } else {
        engine.apply_format(kind.format_name(), Value::String(value.clone()));
      }
    },
  }
}

fn selection_formats<E: EditorEngine + ?Sized>(engine: &E) -> FormatSnapshot {
  engine.formats(engine.selection())
}

/// A collapsed selection only clears the fixed inline set at the caret; a
/// range selection removes all formatting in the range.
fn clear_formats<E: EditorEngine + ?Sized>(engine: &mut E) {
  let Some(range) = engine.selection() else {
    return;
  };
  if range.is_collapsed() {
    let snapshot = engine.formats(Some(range));
    for name in snapshot.keys() {
      if ALL_INLINE_FORMATS.contains(&name.as_str()) {
        engine.apply_format(name, Value::Bool(false));
      }
    }
  } else {
    engine.remove_formats(range);
  }
}

fn indent<E: EditorEngine + ?Sized>(engine: &mut E, delta: i64) {
  let snapshot = selection_formats(engine);
  let current = indent_level(snapshot.get("indent"));
  let mut step = delta;
  // Right-to-left content indents in the opposite visual direction.
  if snapshot.get("direction").and_then(Value::as_str) == Some("rtl") {
    step = -step;
  }
  let next = (current + step).clamp(0, MAX_INDENT);
  engine.apply_format("indent", Value::from(next));
}

fn indent_level(value: Option<&Value>) -> i64 {
  match value {
    Some(Value::Number(number)) => number.as_i64().unwrap_or(0),
    Some(Value::String(text)) => text.trim().parse().unwrap_or(0),
    _ => 0,
  }
}

/// Requesting the list type already in effect clears it; anything else
/// replaces it.
fn toggle_list<E: EditorEngine + ?Sized>(engine: &mut E, kind: ListKind) {
  let snapshot = selection_formats(engine);
  let current = snapshot.get("list").and_then(Value::as_str);
  if current == Some(kind.format_value()) {
    engine.apply_format("list", Value::Bool(false));
  } else {
    engine.apply_format("list", Value::String(kind.format_value().to_string()));
  }
}

/// Reverse mapping from a formats snapshot to the tokens reported as
/// active. Falsy values are skipped; block formats are not reported.
pub fn active_styles(snapshot: &FormatSnapshot) -> Vec<StyleToken> {
  let mut styles = Vec::new();
  for (name, value) in snapshot {
    if !is_truthy(Some(value)) {
      continue;
    }
    if let Some(kind) = BaseInline::from_format_name(name) {
      styles.push(StyleToken::Base(kind));
      continue;
    }
    if let Some(kind) = SpecialInline::from_format_name(name) {
      styles.push(StyleToken::Toggle(kind, value_text(value)));
      continue;
    }
    if let Some(kind) = SpecialKeepInline::from_format_name(name) {
      styles.push(StyleToken::Keep(kind, value_text(value)));
    }
  }
  styles
}

fn value_text(value: &Value) -> String {
  match value {
    Value::String(text) => text.clone(),
    other => other.to_string(),
  }
}

fn is_truthy(value: Option<&Value>) -> bool {
  match value {
    None | Some(Value::Null) | Some(Value::Bool(false)) => false,
    Some(Value::String(text)) => !text.is_empty(),
    Some(Value::Number(number)) => number.as_f64().is_none_or(|n| n != 0.0),
    Some(_) => true,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn active_styles_reconstruct_tokens_per_family() {
    let snapshot: FormatSnapshot = [
      ("bold".to_string(), Value::Bool(true)),
      ("strike".to_string(), Value::Bool(false)),
      ("link".to_string(), Value::String("https://a.io".into())),
      ("size".to_string(), Value::String("18".into())),
      ("indent".to_string(), Value::from(3)),
    ]
    .into_iter()
    .collect();

    let styles = active_styles(&snapshot);
    assert_eq!(styles, vec![
      StyleToken::Base(BaseInline::Bold),
      StyleToken::Toggle(SpecialInline::Link, "https://a.io".into()),
      StyleToken::Keep(SpecialKeepInline::Size, "18".into()),
    ]);
  }

  #[test]
  fn falsy_and_unknown_formats_are_not_reported() {
    let snapshot: FormatSnapshot = [
      ("background".to_string(), Value::String(String::new())),
      ("color".to_string(), Value::Null),
      ("direction".to_string(), Value::String("rtl".into())),
    ]
    .into_iter()
    .collect();
    assert!(active_styles(&snapshot).is_empty());
  }

  #[test]
  fn numeric_format_values_report_as_text() {
    let snapshot: FormatSnapshot = [("size".to_string(), Value::from(14))].into_iter().collect();
    assert_eq!(active_styles(&snapshot), vec![StyleToken::Keep(
      SpecialKeepInline::Size,
      "14".into()
    )]);
  }

  #[test]
  fn indent_levels_parse_from_numbers_and_strings() {
    assert_eq!(indent_level(Some(&Value::from(4))), 4);
    assert_eq!(indent_level(Some(&Value::String("6".into()))), 6);
    assert_eq!(indent_level(Some(&Value::String("wide".into()))), 0);
    assert_eq!(indent_level(None), 0);
  }
}
