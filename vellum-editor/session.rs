use std::time::{
  Duration,
  Instant,
};

use base64::{
  Engine as _,
  engine::general_purpose::STANDARD as BASE64,
};
use indexmap::IndexMap;
use serde_json::Value;
use vellum_event::TimerQueue;
use vellum_protocol::{
  CommandCall,
  CommandName,
  Event,
  LinkPayload,
  StyleToken,
};

use crate::{
  engine::{
    EditorEngine,
    EngineSignal,
  },
  kinds::{
    ContentKind,
    KindRegistry,
  },
  observer::{
    ChangeObserver,
    EventSink,
    post_event,
  },
  paste::{
    PasteAction,
    PastedImageSource,
    classify_image_source,
  },
  resolver,
  sanitize,
};

/// Fallback when the host sends a font size that does not parse.
pub const DEFAULT_FONT_SIZE: u32 = 16;

/// Seeded content must settle before user edits count as real changes.
pub const CONTENT_SETTLE_DELAY: Duration = Duration::from_millis(300);

/// Placeholder assignment retries on this interval until the engine is
/// attached.
pub const PLACEHOLDER_RETRY_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delay {
  ArmContentTracking,
  PlaceholderRetry,
}

/// One editor session on the embedded side.
///
/// Owns the dispatcher state and the change observer; the engine arrives
/// separately because the embedding constructs it after the session's
/// entry points are already callable. Commands that need the engine
/// no-op until it is attached.
pub struct EditorSession<E, S> {
  engine:               Option<E>,
  sink:                 S,
  registry:             KindRegistry,
  observer:             ChangeObserver,
  delays:               TimerQueue<Delay, ()>,
  container_style:      IndexMap<String, Value>,
  dark_mode:            bool,
  font_size:            u32,
  padding_disabled:     bool,
  image_input_disabled: bool,
  pending_placeholder:  Option<String>,
}

impl<E: EditorEngine, S: EventSink> EditorSession<E, S> {
  pub fn new(sink: S) -> Self {
    Self {
      engine: None,
      sink,
      registry: KindRegistry::new(),
      observer: ChangeObserver::new(),
      delays: TimerQueue::new(),
      container_style: IndexMap::new(),
      dark_mode: false,
      font_size: DEFAULT_FONT_SIZE,
      padding_disabled: false,
      image_input_disabled: false,
      pending_placeholder: None,
    }
  }

  /// Announce readiness to the host and probe the initial document size.
  pub fn mount(&mut self, now: Instant) {
    post_event(&mut self.sink, &Event::IsMounted(true));
    self.observer.schedule_size_probe(now);
  }

  pub fn attach_engine(&mut self, engine: E) {
    self.engine = Some(engine);
    if let Some(placeholder) = self.pending_placeholder.take() {
      if let Some(engine) = self.engine.as_mut() {
        engine.set_placeholder(&placeholder);
      }
    }
  }

  pub fn engine(&self) -> Option<&E> {
    self.engine.as_ref()
  }

  pub fn engine_mut(&mut self) -> Option<&mut E> {
    self.engine.as_mut()
  }

  /// The current document HTML as last observed, line endings normalized.
  pub fn content(&self) -> &str {
    self.observer.content()
  }

  pub fn is_dark_mode(&self) -> bool {
    self.dark_mode
  }

  pub fn font_size(&self) -> u32 {
    self.font_size
  }

  pub fn container_style(&self) -> &IndexMap<String, Value> {
    &self.container_style
  }

  pub fn is_padding_disabled(&self) -> bool {
    self.padding_disabled
  }

  pub fn is_image_input_disabled(&self) -> bool {
    self.image_input_disabled
  }

  /// Reconstruct exportable HTML from the current content.
  pub fn export_html(&self) -> String {
    sanitize::export_html(self.observer.content())
  }

  /// Command entry point. Every command applies one mutation; decode
  /// failures are logged and leave state untouched.
  pub fn invoke(&mut self, call: &CommandCall, now: Instant) {
    let arg = call.arg.as_deref().unwrap_or_default();
    match call.name {
      CommandName::Format => self.format(arg, now),
      CommandName::AddImage => self.add_image(arg),
      CommandName::AddLink => self.add_link(arg),
      CommandName::SetDefaultValue => self.set_default_value(arg, now),
      CommandName::SetStyle => self.set_style(arg),
      CommandName::SetIsDarkMode => self.dark_mode = arg == "true",
      CommandName::SetFontSize => self.set_font_size(arg),
      CommandName::SetEditorPlaceholder => self.set_placeholder(arg.to_string(), now),
      CommandName::FocusTextEditor => {
        if let Some(engine) = self.engine.as_mut() {
          engine.focus();
        }
      },
      CommandName::BlurTextEditor => {
        if let Some(engine) = self.engine.as_mut() {
          engine.blur();
        }
      },
      CommandName::DisableInputImage => self.image_input_disabled = arg == "true",
      CommandName::SetDisablePadding => self.padding_disabled = arg == "true",
    }
  }

  fn format(&mut self, raw: &str, now: Instant) {
    let Ok(token) = raw.parse::<StyleToken>() else {
      log::debug!("ignoring unrecognized style token: {raw}");
      return;
    };
    let Some(engine) = self.engine.as_mut() else {
      return;
    };
    resolver::apply_token(engine, &token);
    // The active-style report lags the mutation by the debounce window.
    self.observer.schedule_active_styles(now);
  }

  fn add_image(&mut self, src: &str) {
    let Some(engine) = self.engine.as_mut() else {
      return;
    };
    let Some(range) = engine.selection() else {
      return;
    };
    if !range.is_collapsed() {
      engine.delete_text(range);
    }
    let node = self.registry.create(ContentKind::Image, src);
    engine.insert_embed(range.index, node);
  }

  fn add_link(&mut self, raw: &str) {
    let link: LinkPayload = match serde_json::from_str(raw) {
      Ok(link) => link,
      Err(err) => {
        log::warn!("ignoring malformed link payload: {err}");
        return;
      },
    };
    let Some(engine) = self.engine.as_mut() else {
      return;
    };
    let index = engine.selection().map(|range| range.index).unwrap_or(0);
    let formats = [("link".to_string(), Value::String(link.url))]
      .into_iter()
      .collect();
    engine.insert_text(index, &link.text, &formats);
  }

  fn set_default_value(&mut self, encoded: &str, now: Instant) {
    if encoded.is_empty() {
      return;
    }
    let decoded = match BASE64.decode(encoded.as_bytes()) {
      Ok(bytes) => bytes,
      Err(err) => {
        log::warn!("ignoring undecodable default value: {err}");
        return;
      },
    };
    let html = match String::from_utf8(decoded) {
      Ok(html) => html,
      Err(err) => {
        log::warn!("ignoring non-utf8 default value: {err}");
        return;
      },
    };
    let Some(engine) = self.engine.as_mut() else {
      log::debug!("dropping default value, engine not attached");
      return;
    };
    let cleaned = sanitize::clean_html(&html);
    engine.replace_html(&cleaned);
    self
      .observer
      .note_text_changed(&*engine, &mut self.sink, now);
    self
      .delays
      .schedule(Delay::ArmContentTracking, now + CONTENT_SETTLE_DELAY, ());
  }

  fn set_style(&mut self, raw: &str) {
    match serde_json::from_str::<IndexMap<String, Value>>(raw) {
      Ok(style) => self.container_style = style,
      Err(err) => log::warn!("ignoring malformed container style: {err}"),
    }
  }

  fn set_font_size(&mut self, raw: &str) {
    self.font_size = raw.trim().parse().unwrap_or(DEFAULT_FONT_SIZE);
  }

  fn set_placeholder(&mut self, placeholder: String, now: Instant) {
    if let Some(engine) = self.engine.as_mut() {
      engine.set_placeholder(&placeholder);
      return;
    }
    self.pending_placeholder = Some(placeholder);
    self.delays.schedule(
      Delay::PlaceholderRetry,
      now + PLACEHOLDER_RETRY_INTERVAL,
      (),
    );
  }

  /// Signals raised by the engine as the user works.
  pub fn handle_signal(&mut self, signal: EngineSignal, now: Instant) {
    match signal {
      EngineSignal::TextChanged => {
        let Some(engine) = self.engine.as_ref() else {
          return;
        };
        self.observer.note_text_changed(engine, &mut self.sink, now);
      },
      EngineSignal::SelectionChanged => self.observer.note_selection_changed(now),
      EngineSignal::FocusGained => self.observer.note_focus(&mut self.sink),
      EngineSignal::FocusLost => self.observer.note_blur(&mut self.sink),
      EngineSignal::ImageLoaded => self.observer.note_image_loaded(now),
    }
  }

  /// Decide what the clipboard pipeline does with a pasted image node.
  ///
  /// Blob URLs resolve through an asynchronous fetch the embedding owns;
  /// completion re-enters through [`EditorSession::blob_resolved`].
  pub fn paste_image(&mut self, src: &str) -> PasteAction {
    if self.image_input_disabled {
      return PasteAction::Discard;
    }
    match classify_image_source(src) {
      PastedImageSource::Blob => PasteAction::Fetch(src.to_string()),
      PastedImageSource::Remote | PastedImageSource::DataUri | PastedImageSource::LocalPath => {
        post_event(&mut self.sink, &Event::OnPastedImage(src.to_string()));
        PasteAction::Keep
      },
    }
  }

  /// Completion of a blob fetch. Failures are swallowed; a late arrival
  /// after image input was disabled is dropped.
  pub fn blob_resolved(&mut self, data_uri: Option<String>) {
    let Some(data_uri) = data_uri else {
      return;
    };
    if self.image_input_disabled {
      return;
    }
    post_event(&mut self.sink, &Event::OnPastedImage(data_uri));
  }

  /// Pasted table or blockquote content collapses into one non-editable
  /// embed carrying the original inner markup.
  pub fn paste_embed(&mut self, kind: ContentKind, inner_html: &str) {
    let Some(engine) = self.engine.as_mut() else {
      return;
    };
    let Some(range) = engine.selection() else {
      return;
    };
    let node = self.registry.create(kind, inner_html);
    engine.insert_embed(range.index, node);
  }

  /// Pump delayed work and the observer's debounce slots.
  pub fn tick(&mut self, now: Instant) {
    for (delay, ()) in self.delays.poll(now) {
      match delay {
        Delay::ArmContentTracking => self.observer.arm_tracking(),
        Delay::PlaceholderRetry => {
          if self.pending_placeholder.is_none() {
            continue;
          }
          match self.engine.as_mut() {
            Some(engine) => {
              if let Some(placeholder) = self.pending_placeholder.take() {
                engine.set_placeholder(&placeholder);
              }
            },
            None => self.delays.schedule(
              Delay::PlaceholderRetry,
              now + PLACEHOLDER_RETRY_INTERVAL,
              (),
            ),
          }
        },
      }
    }
    self.observer.tick(
      self.engine.as_ref().map(|engine| engine as &dyn EditorEngine),
      &mut self.sink,
      now,
    );
  }

  /// Earliest pending deadline across delays and debounce slots.
  pub fn next_deadline(&self) -> Option<Instant> {
    match (self.delays.next_deadline(), self.observer.next_deadline()) {
      (Some(a), Some(b)) => Some(a.min(b)),
      (a, b) => a.or(b),
    }
  }
}
