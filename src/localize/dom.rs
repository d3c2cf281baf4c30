//! Thin helpers over the html5ever reference DOM.

use std::io;

use html5ever::serialize::{SerializeOpts, TraversalScope, serialize};
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

/// Parse a full HTML document. Malformed markup is repaired, never rejected.
pub(crate) fn parse(html: &str) -> RcDom {
  parse_document(RcDom::default(), ParseOpts::default()).one(html)
}

/// Serialize the document back to markup.
pub(crate) fn serialize_document(dom: &RcDom) -> io::Result<String> {
  let document: SerializableHandle = dom.document.clone().into();
  let opts = SerializeOpts {
    traversal_scope: TraversalScope::ChildrenOnly(None),
    ..Default::default()
  };

  let mut out = Vec::new();
  serialize(&mut out, &document, opts)?;
  Ok(String::from_utf8_lossy(&out).into_owned())
}

/// Every element of the document in document order.
pub(crate) fn elements(dom: &RcDom) -> Vec<Handle> {
  let mut found = Vec::new();
  let mut stack = vec![dom.document.clone()];

  while let Some(node) = stack.pop() {
    if matches!(node.data, NodeData::Element { .. }) {
      found.push(node.clone());
    }
    for child in node.children.borrow().iter().rev() {
      stack.push(child.clone());
    }
  }

  found
}

/// Local tag name of an element.
pub(crate) fn tag_name(handle: &Handle) -> Option<&str> {
  match &handle.data {
    NodeData::Element { name, .. } => Some(&*name.local),
    _ => None,
  }
}

/// Value of an attribute on an element.
pub(crate) fn attribute(handle: &Handle, attr_name: &str) -> Option<String> {
  match &handle.data {
    NodeData::Element { attrs, .. } => attrs
      .borrow()
      .iter()
      .find(|attr| &*attr.name.local == attr_name)
      .map(|attr| attr.value.to_string()),
    _ => None,
  }
}

/// Overwrite an existing attribute. Elements without the attribute are left untouched.
pub(crate) fn set_attribute(handle: &Handle, attr_name: &str, value: &str) -> bool {
  let NodeData::Element { attrs, .. } = &handle.data else {
    return false;
  };

  let mut attrs = attrs.borrow_mut();
  match attrs.iter_mut().find(|attr| &*attr.name.local == attr_name) {
    Some(attr) => {
      attr.value = StrTendril::from(value);
      true
    }
    None => false,
  }
}
