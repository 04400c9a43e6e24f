//! One-way HTML transforms at the embedding boundary.
//!
//! Inbound content arrives as full documents from arbitrary mail clients;
//! outbound content is reconstructed for the host. Neither direction is
//! the inverse of the other. The scanner works on tag syntax only and
//! never builds a tree; input it cannot make sense of passes through
//! unchanged rather than failing.

use crate::kinds::SIGNATURE_CLASS;

/// Stylesheet prepended to exported content: the size variants and the
/// eight indent levels the editor can produce.
pub const BASE_STYLE: &str = concat!(
  "<style>",
  ".ql-size-small{font-size:0.75em;}",
  ".ql-size-large{font-size:1.5em;}",
  ".ql-size-huge{font-size:2.5em;}",
  ".ql-indent-1{padding-left:3em;}",
  ".ql-indent-2{padding-left:6em;}",
  ".ql-indent-3{padding-left:9em;}",
  ".ql-indent-4{padding-left:12em;}",
  ".ql-indent-5{padding-left:15em;}",
  ".ql-indent-6{padding-left:18em;}",
  ".ql-indent-7{padding-left:21em;}",
  ".ql-indent-8{padding-left:24em;}",
  "</style>"
);

/// Inbound normalization: drop the head/meta/style/title scaffolding and
/// keep the body's inner markup, trimmed. Input that defeats the scanner
/// comes back unchanged.
pub fn clean_html(input: &str) -> String {
  match try_clean(input) {
    Some(cleaned) => cleaned,
    None => input.to_string(),
  }
}

fn try_clean(input: &str) -> Option<String> {
  let mut content = extract_body(input)?;
  for tag in ["head", "style", "title"] {
    content = strip_paired(&content, tag)?;
  }
  content = strip_void(&content, "meta")?;
  Some(content.trim().to_string())
}

/// Outbound reconstruction: prefix the base stylesheet and collapse
/// duplicate signature blocks into one.
pub fn export_html(content: &str) -> String {
  format!("{BASE_STYLE}{}", merge_signature_blocks(content))
}

fn extract_body(html: &str) -> Option<String> {
  let Some(open) = find_tag_open(html, "body", 0) else {
    // Fragments without a body still get the scaffolding stripped.
    return Some(html.to_string());
  };
  let open_end = find_char(html, '>', open)?;
  let (close, _) = find_tag_close(html, "body", open_end + 1)?;
  Some(html[open_end + 1..close].to_string())
}

fn strip_paired(html: &str, tag: &str) -> Option<String> {
  let mut out = String::with_capacity(html.len());
  let mut pos = 0;
  loop {
    let Some(open) = find_tag_open(html, tag, pos) else {
      out.push_str(&html[pos..]);
      return Some(out);
    };
    out.push_str(&html[pos..open]);
    let open_end = find_char(html, '>', open)?;
    if html[..open_end].ends_with('/') {
      pos = open_end + 1;
      continue;
    }
    let (_, close_end) = find_tag_close(html, tag, open_end + 1)?;
    pos = close_end;
  }
}

fn strip_void(html: &str, tag: &str) -> Option<String> {
  let mut out = String::with_capacity(html.len());
  let mut pos = 0;
  loop {
    let Some(open) = find_tag_open(html, tag, pos) else {
      out.push_str(&html[pos..]);
      return Some(out);
    };
    out.push_str(&html[pos..open]);
    let open_end = find_char(html, '>', open)?;
    pos = open_end + 1;
  }
}

struct SignatureBlock {
  outer_start:   usize,
  outer_end:     usize,
  start_tag_end: usize,
  inner_start:   usize,
  inner_end:     usize,
  tag:           String,
}

/// Collapse every signature-classed element into the position of the
/// first one. Later blocks contribute their descendant content; their own
/// wrappers, class attributes included, are dropped. Non-contiguous
/// blocks collapse all the same: content between them stays where it was.
fn merge_signature_blocks(content: &str) -> String {
  let blocks = find_signature_blocks(content);
  if blocks.len() < 2 {
    return content.to_string();
  }

  let first = &blocks[0];
  let mut out = String::with_capacity(content.len());
  out.push_str(&content[..first.start_tag_end]);
  for block in &blocks {
    out.push_str(&content[block.inner_start..block.inner_end]);
  }
  out.push_str(&format!("</{}>", first.tag));

  let mut pos = first.outer_end;
  for block in &blocks[1..] {
    out.push_str(&content[pos..block.outer_start]);
    pos = block.outer_end;
  }
  out.push_str(&content[pos..]);
  out
}

fn find_signature_blocks(content: &str) -> Vec<SignatureBlock> {
  let mut blocks = Vec::new();
  let mut pos = 0;
  while let Some(at) = find_char(content, '<', pos) {
    if content[at..].starts_with("</") {
      pos = at + 2;
      continue;
    }
    if content[at..].starts_with("<!--") {
      match content[at..].find("-->") {
        Some(comment_end) => {
          pos = at + comment_end + 3;
          continue;
        },
        None => break,
      }
    }

    let name_start = at + 1;
    let name_end = content[name_start..]
      .find(|c: char| !c.is_ascii_alphanumeric())
      .map(|offset| name_start + offset)
      .unwrap_or(content.len());
    if name_end == name_start {
      pos = at + 1;
      continue;
    }
    let Some(gt) = find_char(content, '>', name_end) else {
      break;
    };

    let tag = content[name_start..name_end].to_ascii_lowercase();
    let tag_body = &content[name_end..gt];
    if !has_signature_class(tag_body) {
      pos = at + 1;
      continue;
    }

    if tag_body.trim_end().ends_with('/') {
      blocks.push(SignatureBlock {
        outer_start:   at,
        outer_end:     gt + 1,
        start_tag_end: gt + 1,
        inner_start:   gt + 1,
        inner_end:     gt + 1,
        tag,
      });
      pos = gt + 1;
      continue;
    }

    let Some((close_start, close_end)) = find_matching_close(content, &tag, gt + 1) else {
      pos = gt + 1;
      continue;
    };
    blocks.push(SignatureBlock {
      outer_start: at,
      outer_end: close_end,
      start_tag_end: gt + 1,
      inner_start: gt + 1,
      inner_end: close_start,
      tag,
    });
    // Matches nested inside this block belong to it, not to the merge.
    pos = close_end;
  }
  blocks
}

/// Find the close tag matching an already-consumed open tag, honoring
/// nested elements with the same tag name.
fn find_matching_close(content: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
  let mut depth = 1usize;
  let mut pos = from;
  loop {
    let (close_start, close_end) = find_tag_close(content, tag, pos)?;
    match find_tag_open(content, tag, pos) {
      Some(open_at) if open_at < close_start => {
        let gt = find_char(content, '>', open_at)?;
        if !content[..gt].ends_with('/') {
          depth += 1;
        }
        pos = gt + 1;
      },
      _ => {
        depth -= 1;
        if depth == 0 {
          return Some((close_start, close_end));
        }
        pos = close_end;
      },
    }
  }
}

fn has_signature_class(tag_body: &str) -> bool {
  class_attribute(tag_body)
    .map(|classes| {
      classes
        .split_ascii_whitespace()
        .any(|class| class == SIGNATURE_CLASS)
    })
    .unwrap_or(false)
}

fn class_attribute(tag_body: &str) -> Option<&str> {
  let mut search = 0;
  while let Some(at) = find_ci(tag_body, "class", search) {
    let preceded_ok = at == 0 || tag_body.as_bytes()[at - 1].is_ascii_whitespace();
    let rest = tag_body[at + "class".len()..].trim_start();
    if preceded_ok && rest.starts_with('=') {
      let rest = rest[1..].trim_start();
      let mut chars = rest.chars();
      return match chars.next() {
        Some(quote @ ('"' | '\'')) => {
          let value = &rest[1..];
          let end = value.find(quote)?;
          Some(&value[..end])
        },
        Some(_) => {
          let end = rest
            .find(|c: char| c.is_ascii_whitespace() || c == '/')
            .unwrap_or(rest.len());
          Some(&rest[..end])
        },
        None => None,
      };
    }
    search = at + 1;
  }
  None
}

fn find_tag_open(html: &str, tag: &str, from: usize) -> Option<usize> {
  let needle = format!("<{tag}");
  let mut search = from;
  while let Some(at) = find_ci(html, &needle, search) {
    let following = html.as_bytes().get(at + needle.len()).copied();
    if matches!(
      following,
      None | Some(b' ' | b'\t' | b'\r' | b'\n' | b'>' | b'/')
    ) {
      return Some(at);
    }
    search = at + 1;
  }
  None
}

fn find_tag_close(html: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
  let needle = format!("</{tag}");
  let mut search = from;
  while let Some(at) = find_ci(html, &needle, search) {
    let rest = &html[at + needle.len()..];
    let trimmed = rest.trim_start();
    if let Some(after) = trimmed.strip_prefix('>') {
      return Some((at, html.len() - after.len()));
    }
    search = at + 1;
  }
  None
}

fn find_char(haystack: &str, needle: char, from: usize) -> Option<usize> {
  haystack[from..].find(needle).map(|offset| from + offset)
}

/// ASCII case-insensitive substring search. Tag syntax is ASCII, so byte
/// positions found here always sit on character boundaries.
fn find_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
  let hay = haystack.as_bytes();
  let ned = needle.as_bytes();
  if ned.is_empty() || hay.len() < from + ned.len() {
    return None;
  }
  (from..=hay.len() - ned.len())
    .find(|&at| hay[at..at + ned.len()].eq_ignore_ascii_case(ned))
}
