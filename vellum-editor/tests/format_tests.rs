mod common;

use std::time::{
  Duration,
  Instant,
};

use common::{
  CollectingSink,
  FakeEngine,
};
use serde_json::{
  Value,
  json,
};
use vellum_editor::{
  EditorSession,
  Selection,
};
use vellum_protocol::{
  CommandCall,
  CommandName,
  Event,
  StyleToken,
};

fn ms(value: u64) -> Duration {
  Duration::from_millis(value)
}

fn session_with_engine() -> (EditorSession<FakeEngine, CollectingSink>, CollectingSink) {
  let sink = CollectingSink::default();
  let mut session = EditorSession::new(sink.clone());
  session.attach_engine(FakeEngine::new());
  (session, sink)
}

fn format(session: &mut EditorSession<FakeEngine, CollectingSink>, token: &str, now: Instant) {
  session.invoke(&CommandCall::with_arg(CommandName::Format, token), now);
}

fn last_active_styles(sink: &CollectingSink) -> Vec<StyleToken> {
  sink
    .events()
    .into_iter()
    .rev()
    .find_map(|event| match event {
      Event::ActiveStyleChange(styles) => Some(styles),
      _ => None,
    })
    .expect("no active style report was posted")
}

#[test]
fn base_inline_tokens_toggle_their_boolean() {
  let (mut session, _sink) = session_with_engine();
  let now = Instant::now();

  format(&mut session, "Bold", now);
  assert_eq!(
    session.engine().unwrap().formats.get("bold"),
    Some(&Value::Bool(true))
  );

  format(&mut session, "Bold", now);
  assert!(!session.engine().unwrap().formats.contains_key("bold"));
}

#[test]
fn keep_inline_tokens_always_set() {
  let (mut session, sink) = session_with_engine();
  let now = Instant::now();

  format(&mut session, "Color-#ff0000", now);
  format(&mut session, "Color-#ff0000", now + ms(10));
  assert_eq!(
    session.engine().unwrap().formats.get("color"),
    Some(&json!("#ff0000"))
  );

  // The report is debounced, never synchronous with the mutation.
  assert_eq!(sink.count_of("activeStyleChange"), 0);
  session.tick(now + ms(150));
  assert!(
    last_active_styles(&sink)
      .contains(&"Color-#ff0000".parse::<StyleToken>().unwrap())
  );
}

#[test]
fn toggle_inline_tokens_clear_on_equal_value() {
  let (mut session, sink) = session_with_engine();
  let mut now = Instant::now();

  format(&mut session, "Link-https://a.io", now);
  session.tick(now + ms(150));
  assert!(
    last_active_styles(&sink)
      .contains(&"Link-https://a.io".parse::<StyleToken>().unwrap())
  );

  now += ms(200);
  format(&mut session, "Link-https://a.io", now);
  session.tick(now + ms(150));
  assert!(last_active_styles(&sink).is_empty());
}

#[test]
fn toggle_inline_tokens_replace_on_different_value() {
  let (mut session, _sink) = session_with_engine();
  let now = Instant::now();

  format(&mut session, "BackgroundColor-yellow", now);
  format(&mut session, "BackgroundColor-green", now + ms(10));
  assert_eq!(
    session.engine().unwrap().formats.get("background"),
    Some(&json!("green"))
  );
}

#[test]
fn applying_a_list_token_twice_restores_the_original_state() {
  let (mut session, _sink) = session_with_engine();
  let now = Instant::now();

  format(&mut session, "UnorderedList", now);
  assert_eq!(
    session.engine().unwrap().formats.get("list"),
    Some(&json!("bullet"))
  );

  format(&mut session, "UnorderedList", now + ms(10));
  assert!(!session.engine().unwrap().formats.contains_key("list"));
}

#[test]
fn requesting_a_different_list_type_replaces_it() {
  let (mut session, _sink) = session_with_engine();
  let now = Instant::now();

  format(&mut session, "UnorderedList", now);
  format(&mut session, "OrderedList", now + ms(10));
  assert_eq!(
    session.engine().unwrap().formats.get("list"),
    Some(&json!("ordered"))
  );
}

#[test]
fn indent_clamps_at_the_top() {
  let (mut session, _sink) = session_with_engine();
  session
    .engine_mut()
    .unwrap()
    .set_format("indent", json!(8));

  format(&mut session, "IndentIncrease", Instant::now());
  assert_eq!(
    session.engine().unwrap().formats.get("indent"),
    Some(&json!(8))
  );
}

#[test]
fn indent_clamps_at_zero() {
  let (mut session, _sink) = session_with_engine();

  format(&mut session, "IndentDecrease", Instant::now());
  assert_eq!(
    session.engine().unwrap().formats.get("indent"),
    Some(&json!(0))
  );
}

#[test]
fn right_to_left_content_inverts_the_indent_direction() {
  let (mut session, _sink) = session_with_engine();
  {
    let engine = session.engine_mut().unwrap();
    engine.set_format("direction", json!("rtl"));
    engine.set_format("indent", json!(2));
  }

  format(&mut session, "IndentIncrease", Instant::now());
  assert_eq!(
    session.engine().unwrap().formats.get("indent"),
    Some(&json!(1))
  );
}

#[test]
fn indent_levels_reported_as_strings_still_count() {
  let (mut session, _sink) = session_with_engine();
  session
    .engine_mut()
    .unwrap()
    .set_format("indent", json!("3"));

  format(&mut session, "IndentIncrease", Instant::now());
  assert_eq!(
    session.engine().unwrap().formats.get("indent"),
    Some(&json!(4))
  );
}

#[test]
fn clear_at_a_cursor_only_touches_inline_formats() {
  let (mut session, _sink) = session_with_engine();
  {
    let engine = session.engine_mut().unwrap();
    engine.set_format("bold", json!(true));
    engine.set_format("color", json!("#333333"));
    engine.set_format("indent", json!(2));
    engine.set_format("list", json!("bullet"));
  }

  format(&mut session, "CLEAR", Instant::now());
  let engine = session.engine().unwrap();
  assert!(!engine.formats.contains_key("bold"));
  assert!(!engine.formats.contains_key("color"));
  assert_eq!(engine.formats.get("indent"), Some(&json!(2)));
  assert_eq!(engine.formats.get("list"), Some(&json!("bullet")));
  assert!(!engine.ops.iter().any(|op| op.starts_with("remove_formats")));
}

#[test]
fn clear_over_a_range_removes_all_formatting() {
  let (mut session, _sink) = session_with_engine();
  {
    let engine = session.engine_mut().unwrap();
    engine.selection = Some(Selection::range(4, 7));
    engine.set_format("bold", json!(true));
    engine.set_format("indent", json!(2));
  }

  format(&mut session, "CLEAR", Instant::now());
  let engine = session.engine().unwrap();
  assert!(engine.ops.contains(&"remove_formats 4+7".to_string()));
  assert!(engine.formats.is_empty());
}

#[test]
fn clear_without_a_selection_is_a_no_op() {
  let (mut session, _sink) = session_with_engine();
  {
    let engine = session.engine_mut().unwrap();
    engine.selection = None;
    engine.set_format("bold", json!(true));
  }

  format(&mut session, "CLEAR", Instant::now());
  let engine = session.engine().unwrap();
  assert!(engine.ops.is_empty());
  assert_eq!(engine.formats.get("bold"), Some(&json!(true)));
}

#[test]
fn unrecognized_tokens_perform_no_operation() {
  let (mut session, sink) = session_with_engine();
  let now = Instant::now();

  format(&mut session, "Sparkle", now);
  format(&mut session, "", now);
  assert!(session.engine().unwrap().ops.is_empty());

  // No active-style recomputation was scheduled either.
  session.tick(now + ms(300));
  assert_eq!(sink.count_of("activeStyleChange"), 0);
}
