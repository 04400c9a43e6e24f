use std::collections::HashMap;

use indexmap::IndexMap;

/// Class marking a document signature block. Exported content merges
/// duplicate blocks carrying this class into one.
pub const SIGNATURE_CLASS: &str = "webmail_signature";

/// Content kinds the editor can host beyond plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
  Image,
  Table,
  Blockquote,
  Signature,
  Block,
}

impl ContentKind {
  pub const ALL: [ContentKind; 5] = [
    ContentKind::Image,
    ContentKind::Table,
    ContentKind::Blockquote,
    ContentKind::Signature,
    ContentKind::Block,
  ];
}

/// A content node as this core sees it: a kind, its attributes, and its
/// inner markup. The engine owns the real DOM representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedNode {
  pub kind:    ContentKind,
  pub attrs:   IndexMap<String, String>,
  pub content: String,
}

/// Capability interface implemented once per content kind: build a node
/// from its wire value, report the attributes it carries through
/// formatting, and serialize it back to markup.
pub trait KindSpec {
  fn kind(&self) -> ContentKind;

  fn tag(&self) -> &'static str;

  /// Attributes that survive formatting round trips for this kind.
  fn attribute_whitelist(&self) -> &'static [&'static str];

  fn create(&self, value: &str) -> EmbedNode;

  /// The whitelisted attributes present on `node`.
  fn formats(&self, node: &EmbedNode) -> IndexMap<String, String> {
    let mut formats = IndexMap::new();
    for attribute in self.attribute_whitelist() {
      if let Some(value) = node.attrs.get(*attribute) {
        formats.insert((*attribute).to_string(), value.clone());
      }
    }
    formats
  }

  fn serialize(&self, node: &EmbedNode) -> String {
    let mut markup = String::from("<");
    markup.push_str(self.tag());
    for (name, value) in &node.attrs {
      markup.push_str(&format!(" {name}=\"{value}\""));
    }
    markup.push('>');
    markup.push_str(&node.content);
    markup.push_str(&format!("</{}>", self.tag()));
    markup
  }
}

/// Images hold their source as an attribute and have no inner markup.
struct ImageKind;

impl KindSpec for ImageKind {
  fn kind(&self) -> ContentKind {
    ContentKind::Image
  }

  fn tag(&self) -> &'static str {
    "img"
  }

  fn attribute_whitelist(&self) -> &'static [&'static str] {
    &["id", "class", "height", "width"]
  }

  fn create(&self, value: &str) -> EmbedNode {
    let mut attrs = IndexMap::new();
    attrs.insert("src".to_string(), value.to_string());
    EmbedNode {
      kind: ContentKind::Image,
      attrs,
      content: String::new(),
    }
  }

  fn serialize(&self, node: &EmbedNode) -> String {
    let mut markup = String::from("<img");
    for (name, value) in &node.attrs {
      markup.push_str(&format!(" {name}=\"{value}\""));
    }
    markup.push('>');
    markup
  }
}

/// Pasted tables collapse into a single non-editable embed carrying the
/// original inner markup.
struct TableKind;

impl KindSpec for TableKind {
  fn kind(&self) -> ContentKind {
    ContentKind::Table
  }

  fn tag(&self) -> &'static str {
    "table"
  }

  fn attribute_whitelist(&self) -> &'static [&'static str] {
    &[]
  }

  fn create(&self, value: &str) -> EmbedNode {
    let mut attrs = IndexMap::new();
    attrs.insert("contenteditable".to_string(), "false".to_string());
    EmbedNode {
      kind: ContentKind::Table,
      attrs,
      content: value.to_string(),
    }
  }
}

struct BlockquoteKind;

impl KindSpec for BlockquoteKind {
  fn kind(&self) -> ContentKind {
    ContentKind::Blockquote
  }

  fn tag(&self) -> &'static str {
    "blockquote"
  }

  fn attribute_whitelist(&self) -> &'static [&'static str] {
    &[]
  }

  fn create(&self, value: &str) -> EmbedNode {
    let mut attrs = IndexMap::new();
    attrs.insert("contenteditable".to_string(), "false".to_string());
    EmbedNode {
      kind: ContentKind::Blockquote,
      attrs,
      content: value.to_string(),
    }
  }
}

struct SignatureKind;

impl KindSpec for SignatureKind {
  fn kind(&self) -> ContentKind {
    ContentKind::Signature
  }

  fn tag(&self) -> &'static str {
    "div"
  }

  fn attribute_whitelist(&self) -> &'static [&'static str] {
    &["id", "class"]
  }

  fn create(&self, value: &str) -> EmbedNode {
    let mut attrs = IndexMap::new();
    attrs.insert("class".to_string(), SIGNATURE_CLASS.to_string());
    EmbedNode {
      kind: ContentKind::Signature,
      attrs,
      content: value.to_string(),
    }
  }
}

/// Plain block containers render as divs rather than paragraphs.
struct BlockKind;

impl KindSpec for BlockKind {
  fn kind(&self) -> ContentKind {
    ContentKind::Block
  }

  fn tag(&self) -> &'static str {
    "div"
  }

  fn attribute_whitelist(&self) -> &'static [&'static str] {
    &[]
  }

  fn create(&self, value: &str) -> EmbedNode {
    EmbedNode {
      kind: ContentKind::Block,
      attrs: IndexMap::new(),
      content: value.to_string(),
    }
  }
}

/// Tagged-variant registry selecting the capability implementation for a
/// content kind. Registration happens once, at construction, so a missing
/// kind is a programming error rather than a runtime lookup failure.
pub struct KindRegistry {
  specs: HashMap<ContentKind, Box<dyn KindSpec>>,
}

impl KindRegistry {
  pub fn new() -> Self {
    let mut specs: HashMap<ContentKind, Box<dyn KindSpec>> = HashMap::new();
    specs.insert(ContentKind::Image, Box::new(ImageKind));
    specs.insert(ContentKind::Table, Box::new(TableKind));
    specs.insert(ContentKind::Blockquote, Box::new(BlockquoteKind));
    specs.insert(ContentKind::Signature, Box::new(SignatureKind));
    specs.insert(ContentKind::Block, Box::new(BlockKind));
    Self { specs }
  }

  pub fn spec(&self, kind: ContentKind) -> &dyn KindSpec {
    match self.specs.get(&kind) {
      Some(spec) => spec.as_ref(),
      None => unreachable!("every content kind is registered at construction"),
    }
  }

  pub fn create(&self, kind: ContentKind, value: &str) -> EmbedNode {
    self.spec(kind).create(value)
  }

  pub fn serialize(&self, node: &EmbedNode) -> String {
    self.spec(node.kind).serialize(node)
  }
}

impl Default for KindRegistry {
  fn default() -> Self {
    Self::new()
  }
}
