//! Streaming XML writer for the narrow element/attribute/text shapes this
//! tool emits.
//!
//! This is deliberately not a general XML library. Operations stream to the
//! sink as they happen; nothing is buffered and re-rendered, so a query that
//! aborts mid-document leaves a well-formed prefix behind rather than
//! garbage (the document as a whole is then incomplete).
//!
//! Attribute placement is part of the contract: attributes may only be
//! attached to the innermost open tag while it has no text or child content
//! yet. Violating that, or closing with nothing open, is a caller bug and
//! panics.

use std::io::{self, Write};

/// One open element on the writer's stack.
struct Frame {
    name: String,
    /// True while the start tag is still unclosed, i.e. no text or child
    /// content has been written yet and attributes are still legal.
    open: bool,
}

/// Streaming writer for nested tagged output with attributes and text.
pub struct XmlWriter<W: Write> {
    sink: W,
    stack: Vec<Frame>,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink, stack: Vec::new() }
    }

    /// Open a new element as a child of the innermost open tag (or as a root
    /// element when nothing is open).
    pub fn open_tag(&mut self, name: &str) -> io::Result<()> {
        self.seal_innermost()?;
        write!(self.sink, "<{name}")?;
        self.stack.push(Frame { name: name.to_string(), open: true });
        Ok(())
    }

    /// Attach an attribute to the innermost open tag.
    ///
    /// # Panics
    /// Panics if no tag is open, or if the innermost tag already has text or
    /// child content. Callers are expected to order attributes before content.
    pub fn attribute(&mut self, key: &str, value: &str) -> io::Result<()> {
        let frame = self.stack.last().expect("attribute() with no open tag");
        if !frame.open {
            panic!("attribute \"{key}\" after content in <{}>", frame.name);
        }
        write!(self.sink, " {key}=\"{}\"", escape(value))
    }

    /// Append escaped text content to the innermost open tag. This marks the
    /// tag as having content, blocking further attributes.
    ///
    /// # Panics
    /// Panics if no tag is open.
    pub fn text(&mut self, value: &str) -> io::Result<()> {
        assert!(!self.stack.is_empty(), "text() with no open tag");
        self.seal_innermost()?;
        write!(self.sink, "{}", escape(value))
    }

    /// Close the innermost open tag. Tags closed without any content collapse
    /// to the self-closing form.
    ///
    /// # Panics
    /// Panics on stack underflow (closing with nothing open).
    pub fn close_tag(&mut self) -> io::Result<()> {
        let frame = self.stack.pop().expect("close_tag() with no open tag");
        if frame.open {
            write!(self.sink, "/>")
        } else {
            write!(self.sink, "</{}>", frame.name)
        }
    }

    /// Close any still-open tags, terminate the document and flush the sink.
    /// Consumes the writer; the sink is handed back for callers that own it.
    pub fn finish(mut self) -> io::Result<W> {
        while !self.stack.is_empty() {
            self.close_tag()?;
        }
        writeln!(self.sink)?;
        self.sink.flush()?;
        Ok(self.sink)
    }

    /// Terminate the start tag of the innermost open element, if any, so that
    /// content can follow. After this the element no longer accepts
    /// attributes.
    fn seal_innermost(&mut self) -> io::Result<()> {
        if let Some(frame) = self.stack.last_mut() {
            if frame.open {
                write!(self.sink, ">")?;
                frame.open = false;
            }
        }
        Ok(())
    }
}

/// Escape the characters XML reserves in text and attribute values.
fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
