//! Embedded side of the editing bridge.
//!
//! Everything here runs inside the editor's own single-threaded context:
//! the command dispatcher applies host commands to the editing engine, the
//! format resolver translates style tokens into primitive formatting
//! calls, the change observer debounces engine signals back toward the
//! host, and the sanitizer normalizes HTML crossing the boundary. The
//! engine itself is an external collaborator behind [`EditorEngine`].

mod engine;
mod kinds;
mod observer;
mod paste;
mod resolver;
mod sanitize;
mod session;

pub use engine::{
  EditorEngine,
  EngineSignal,
  FormatSnapshot,
  Selection,
};
pub use kinds::{
  ContentKind,
  EmbedNode,
  KindRegistry,
  KindSpec,
  SIGNATURE_CLASS,
};
pub use observer::{
  ChangeObserver,
  DEBOUNCE_WINDOW,
  EventSink,
};
pub use paste::{
  PasteAction,
  PastedImageSource,
  classify_image_source,
};
pub use resolver::{
  active_styles,
  apply_token,
};
pub use sanitize::{
  BASE_STYLE,
  clean_html,
  export_html,
};
pub use session::{
  CONTENT_SETTLE_DELAY,
  DEFAULT_FONT_SIZE,
  EditorSession,
  PLACEHOLDER_RETRY_INTERVAL,
};
