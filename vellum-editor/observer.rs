use std::time::{
  Duration,
  Instant,
};

use vellum_event::Debounce;
use vellum_protocol::Event;

use crate::{
  engine::EditorEngine,
  resolver::active_styles,
};

/// Quiet window for the coalesced observer signals. Mount and focus
/// transitions bypass it and post immediately.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(100);

/// Outbound boundary: hand one serialized event envelope to the host.
pub trait EventSink {
  fn post(&mut self, raw: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
  ActiveStyles,
  Size,
  CaretPosition,
}

/// Watches the engine for the four observable signal classes and forwards
/// them to the host: content changes, active-style changes, size changes,
/// and caret position changes. Each class debounces independently; size
/// and position suppress duplicate values.
pub struct ChangeObserver {
  debounce:            Debounce<Signal>,
  content:             String,
  tracking_armed:      bool,
  content_change_sent: bool,
  last_height:         u32,
  last_caret_bottom:   u32,
}

impl ChangeObserver {
  pub fn new() -> Self {
    Self {
      debounce: Debounce::new(DEBOUNCE_WINDOW),
      content: String::new(),
      tracking_armed: false,
      content_change_sent: false,
      last_height: 0,
      last_caret_bottom: 0,
    }
  }

  /// The current document HTML, line endings normalized.
  pub fn content(&self) -> &str {
    &self.content
  }

  pub fn is_tracking(&self) -> bool {
    self.tracking_armed
  }

  /// Arm the content-tracking latch. One-way: once armed, the first
  /// subsequent change fires the single content-change notification.
  /// Armed only after seeded content has settled, so host-initiated
  /// seeding never counts as a user edit.
  pub fn arm_tracking(&mut self) {
    self.tracking_armed = true;
  }

  pub fn note_text_changed(
    &mut self,
    engine: &dyn EditorEngine,
    sink: &mut dyn EventSink,
    now: Instant,
  ) {
    self.check_content_change(sink);
    self.content = engine.html().replace('\r', "");
    post_event(sink, &Event::EditorChange(self.content.clone()));
    self.debounce.trigger(Signal::ActiveStyles, now);
    self.debounce.trigger(Signal::Size, now);
    self.debounce.trigger(Signal::CaretPosition, now);
  }

  fn check_content_change(&mut self, sink: &mut dyn EventSink) {
    if self.content_change_sent || !self.tracking_armed {
      return;
    }
    self.content_change_sent = true;
    post_event(sink, &Event::ContentChange(true));
  }

  pub fn note_selection_changed(&mut self, now: Instant) {
    self.debounce.trigger(Signal::ActiveStyles, now);
    self.debounce.trigger(Signal::CaretPosition, now);
  }

  /// Image loads change the document height asynchronously after the
  /// insertion already settled.
  pub fn note_image_loaded(&mut self, now: Instant) {
    self.debounce.trigger(Signal::Size, now);
  }

  pub fn note_focus(&mut self, sink: &mut dyn EventSink) {
    post_event(sink, &Event::OnFocus(true));
  }

  /// Blur resets the tracked caret position so the next focus re-emits.
  pub fn note_blur(&mut self, sink: &mut dyn EventSink) {
    post_event(sink, &Event::OnBlur(true));
    self.last_caret_bottom = 0;
  }

  pub fn schedule_size_probe(&mut self, now: Instant) {
    self.debounce.trigger(Signal::Size, now);
  }

  pub fn schedule_active_styles(&mut self, now: Instant) {
    self.debounce.trigger(Signal::ActiveStyles, now);
  }

  pub fn next_deadline(&self) -> Option<Instant> {
    self.debounce.next_deadline()
  }

  /// Fire every signal whose quiet window elapsed. Signals that land
  /// while no engine is attached are dropped.
  pub fn tick(
    &mut self,
    engine: Option<&dyn EditorEngine>,
    sink: &mut dyn EventSink,
    now: Instant,
  ) {
    for signal in self.debounce.fire(now) {
      let Some(engine) = engine else {
        continue;
      };
      match signal {
        Signal::ActiveStyles => self.emit_active_styles(engine, sink),
        Signal::Size => self.emit_size(engine, sink),
        Signal::CaretPosition => self.emit_caret_position(engine, sink),
      }
    }
  }

  fn emit_active_styles(&mut self, engine: &dyn EditorEngine, sink: &mut dyn EventSink) {
    let styles = match engine.selection() {
      Some(range) => active_styles(&engine.formats(Some(range))),
      None => Vec::new(),
    };
    post_event(sink, &Event::ActiveStyleChange(styles));
  }

  fn emit_size(&mut self, engine: &dyn EditorEngine, sink: &mut dyn EventSink) {
    let height = engine.document_height();
    if height == self.last_height {
      return;
    }
    self.last_height = height;
    post_event(sink, &Event::SizeChange(height));
  }

  fn emit_caret_position(&mut self, engine: &dyn EditorEngine, sink: &mut dyn EventSink) {
    if engine.selection().is_none() {
      return;
    }
    // The primary lookup reports nothing on empty lines; fall back to the
    // focused node's rectangle.
    let bottom = engine
      .caret_bottom()
      .filter(|bottom| *bottom != 0)
      .or_else(|| engine.focused_node_bottom());
    let Some(bottom) = bottom else {
      return;
    };
    if bottom == self.last_caret_bottom {
      return;
    }
    self.last_caret_bottom = bottom;
    post_event(sink, &Event::EditPosition(bottom));
  }
}

impl Default for ChangeObserver {
  fn default() -> Self {
    Self::new()
  }
}

pub(crate) fn post_event(sink: &mut dyn EventSink, event: &Event) {
  match event.to_json() {
    Ok(raw) => sink.post(&raw),
    Err(err) => log::warn!("failed to serialize {} event: {err}", event.kind()),
  }
}
