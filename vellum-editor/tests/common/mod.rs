use std::{
  cell::RefCell,
  rc::Rc,
};

use indexmap::IndexMap;
use serde_json::Value;
use vellum_editor::{
  EditorEngine,
  EmbedNode,
  EventSink,
  FormatSnapshot,
  KindRegistry,
  Selection,
};
use vellum_protocol::Event;

/// In-memory stand-in for the embedded editing engine. State is poked
/// directly by tests; mutations are recorded as op strings.
pub struct FakeEngine {
  pub selection:   Option<Selection>,
  pub formats:     FormatSnapshot,
  pub html:        String,
  pub height:      u32,
  pub caret:       Option<u32>,
  pub node_bottom: Option<u32>,
  pub placeholder: Option<String>,
  pub focused:     bool,
  pub ops:         Vec<String>,
  registry:        KindRegistry,
}

impl FakeEngine {
  pub fn new() -> Self {
    Self {
      selection: Some(Selection::cursor(0)),
      formats: IndexMap::new(),
      html: String::new(),
      height: 600,
      caret: None,
      node_bottom: None,
      placeholder: None,
      focused: false,
      ops: Vec::new(),
      registry: KindRegistry::new(),
    }
  }

  pub fn set_format(&mut self, name: &str, value: Value) {
    self.formats.insert(name.to_string(), value);
  }
}

impl EditorEngine for FakeEngine {
  fn selection(&self) -> Option<Selection> {
    self.selection
  }

  fn formats(&self, _range: Option<Selection>) -> FormatSnapshot {
    self.formats.clone()
  }

  fn apply_format(&mut self, name: &str, value: Value) {
    self.ops.push(format!("format {name}={value}"));
    match &value {
      Value::Bool(false) | Value::Null => {
        self.formats.shift_remove(name);
      },
      _ => {
        self.formats.insert(name.to_string(), value);
      },
    }
  }

  fn remove_formats(&mut self, range: Selection) {
    self
      .ops
      .push(format!("remove_formats {}+{}", range.index, range.length));
    self.formats.clear();
  }

  fn delete_text(&mut self, range: Selection) {
    self
      .ops
      .push(format!("delete {}+{}", range.index, range.length));
  }

  fn insert_embed(&mut self, index: usize, node: EmbedNode) {
    let markup = self.registry.serialize(&node);
    self.ops.push(format!("embed {index} {markup}"));
    self.html.push_str(&markup);
  }

  fn insert_text(&mut self, index: usize, text: &str, formats: &FormatSnapshot) {
    let formats = serde_json::to_string(formats).unwrap();
    self.ops.push(format!("text {index} {text} {formats}"));
    self.html.push_str(text);
  }

  fn replace_html(&mut self, html: &str) {
    self.html = html.to_string();
  }

  fn html(&self) -> String {
    self.html.clone()
  }

  fn set_placeholder(&mut self, placeholder: &str) {
    self.placeholder = Some(placeholder.to_string());
  }

  fn focus(&mut self) {
    self.focused = true;
  }

  fn blur(&mut self) {
    self.focused = false;
  }

  fn document_height(&self) -> u32 {
    self.height
  }

  fn caret_bottom(&self) -> Option<u32> {
    self.caret
  }

  fn focused_node_bottom(&self) -> Option<u32> {
    self.node_bottom
  }
}

/// Records every envelope the session posts toward the host.
#[derive(Clone, Default)]
pub struct CollectingSink {
  posted: Rc<RefCell<Vec<String>>>,
}

impl EventSink for CollectingSink {
  fn post(&mut self, raw: &str) {
    self.posted.borrow_mut().push(raw.to_string());
  }
}

impl CollectingSink {
  pub fn raw(&self) -> Vec<String> {
    self.posted.borrow().clone()
  }

  pub fn events(&self) -> Vec<Event> {
    self
      .raw()
      .iter()
      .map(|raw| Event::from_json(raw).expect("sink only receives valid envelopes"))
      .collect()
  }

  pub fn kinds(&self) -> Vec<&'static str> {
    self.events().iter().map(Event::kind).collect()
  }

  pub fn count_of(&self, kind: &str) -> usize {
    self.kinds().into_iter().filter(|k| *k == kind).count()
  }

  pub fn clear(&self) {
    self.posted.borrow_mut().clear();
  }
}
