//! Pretty-printing writer
//!
//! Emits one member per line, indented by depth, with separators placed at
//! the end of the previous line. Closing brackets are always preceded by a
//! newline and the enclosing level's indent, including for empty
//! containers.

use std::any::Any;
use std::io::Write;
use std::sync::Arc;

use crate::writer::{
    FieldNameEncoder, FrameStack, FrameState, IndentCache, JsonWriter, WriterConfig,
};
use crate::{Error, JsonContext, Result};

/// Protocol-enforcing writer producing indented JSON.
///
/// Owns its sink; [`finish`](Self::finish) verifies that exactly one
/// complete top-level value was written and hands the sink back. One
/// session per thread; see the crate docs for the sharing model.
pub struct PrettyJsonWriter<W: Write> {
    ctx: Arc<JsonContext>,
    out: W,
    field_names: Arc<dyn FieldNameEncoder>,
    indents: IndentCache,
    frames: FrameStack,
}

impl<W: Write> PrettyJsonWriter<W> {
    /// Create a session with default formatting.
    pub fn new(ctx: Arc<JsonContext>, out: W) -> Self {
        Self::with_config(ctx, WriterConfig::default(), out)
    }

    /// Create a session with explicit formatting options.
    pub fn with_config(ctx: Arc<JsonContext>, config: WriterConfig, out: W) -> Self {
        let field_names = Arc::clone(ctx.field_names());
        Self {
            ctx,
            out,
            field_names,
            indents: IndentCache::new(config.indent_factor),
            frames: FrameStack::new(),
        }
    }

    /// Whether exactly one top-level value has been written and every
    /// container closed.
    pub fn is_complete(&self) -> bool {
        self.frames.is_complete()
    }

    /// Verify completeness, flush, and return the sink.
    ///
    /// # Errors
    ///
    /// [`Error::Protocol`] if the session is incomplete; [`Error::Io`] if
    /// the flush fails.
    pub fn finish(mut self) -> Result<W> {
        if !self.frames.is_complete() {
            return Err(Error::protocol("finish", self.frames.current().state));
        }
        self.out.flush()?;
        Ok(self.out)
    }

    /// Return the sink without checking completeness.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn newline_indent(&mut self, depth: usize) -> Result<()> {
        let Self { out, indents, .. } = self;
        out.write_all(b"\n")?;
        out.write_all(indents.indent(depth).as_bytes())?;
        Ok(())
    }

    fn encode_name(&mut self, name: &str) -> Result<()> {
        let Self {
            out, field_names, ..
        } = self;
        field_names.encode(name, out)
    }

    /// Resolve a strategy for the value's runtime type and run it with the
    /// current frame marked delegated, so structural calls the strategy
    /// makes on behalf of this frame skip separator accounting.
    fn dispatch(&mut self, value: &dyn Any) -> Result<()> {
        let strategy = self.ctx.registry().resolve(value.type_id())?;
        let depth = self.frames.depth();
        self.frames.current_mut().delegated = true;
        let result = strategy.serialize(value, self);
        if let Some(frame) = self.frames.frame_mut(depth) {
            frame.delegated = false;
        }
        result
    }

    fn emit_value(&mut self, value: Option<&dyn Any>) -> Result<()> {
        match value {
            None => {
                self.out.write_all(b"null")?;
                Ok(())
            }
            Some(v) => self.dispatch(v),
        }
    }
}

impl<W: Write> JsonWriter for PrettyJsonWriter<W> {
    fn begin_array(&mut self) -> Result<()> {
        match self.frames.current().state {
            FrameState::Unknown => {
                let frame = self.frames.current_mut();
                if !frame.delegated && frame.items > 0 {
                    return Err(Error::protocol("begin_array", FrameState::Unknown));
                }
                frame.items = 1;
                self.out.write_all(b"[")?;
                self.frames.push(FrameState::Array);
            }
            FrameState::Array => {
                if !self.frames.current().delegated && !self.frames.count_item() {
                    self.out.write_all(b",")?;
                }
                self.out.write_all(b" [")?;
                self.frames.push(FrameState::Array);
            }
            state @ FrameState::Object => {
                return Err(Error::protocol("begin_array", state));
            }
            FrameState::ObjAttr => {
                self.frames.current_mut().state = FrameState::Object;
                self.out.write_all(b"[")?;
                self.frames.push(FrameState::Array);
            }
        }
        Ok(())
    }

    fn end_array(&mut self) -> Result<()> {
        match self.frames.current().state {
            FrameState::Array => {
                let parent = self.frames.depth() - 1;
                self.newline_indent(parent)?;
                self.frames.pop();
                self.out.write_all(b"]")?;
                Ok(())
            }
            state => Err(Error::protocol("end_array", state)),
        }
    }

    fn begin_object(&mut self) -> Result<()> {
        match self.frames.current().state {
            FrameState::Unknown => {
                let frame = self.frames.current_mut();
                if !frame.delegated && frame.items > 0 {
                    return Err(Error::protocol("begin_object", FrameState::Unknown));
                }
                frame.items = 1;
                self.out.write_all(b"{")?;
                self.frames.push(FrameState::Object);
            }
            FrameState::Array => {
                if !self.frames.current().delegated && !self.frames.count_item() {
                    self.out.write_all(b",")?;
                }
                self.out.write_all(b" {")?;
                self.frames.push(FrameState::Object);
            }
            state @ FrameState::Object => {
                return Err(Error::protocol("begin_object", state));
            }
            FrameState::ObjAttr => {
                self.frames.current_mut().state = FrameState::Object;
                self.out.write_all(b"{")?;
                self.frames.push(FrameState::Object);
            }
        }
        Ok(())
    }

    fn end_object(&mut self) -> Result<()> {
        match self.frames.current().state {
            FrameState::Object => {
                let parent = self.frames.depth() - 1;
                self.newline_indent(parent)?;
                self.frames.pop();
                self.out.write_all(b"}")?;
                Ok(())
            }
            state => Err(Error::protocol("end_object", state)),
        }
    }

    fn write_value(&mut self, value: Option<&dyn Any>) -> Result<()> {
        match self.frames.current().state {
            FrameState::Unknown => {
                if self.frames.current().items > 0 {
                    return Err(Error::protocol("write_value", FrameState::Unknown));
                }
                self.frames.current_mut().items = 1;
                self.emit_value(value)
            }
            FrameState::Array => {
                if !self.frames.count_item() {
                    self.out.write_all(b",")?;
                }
                self.newline_indent(self.frames.depth())?;
                self.emit_value(value)
            }
            state @ FrameState::Object => Err(Error::protocol("write_value", state)),
            FrameState::ObjAttr => {
                self.frames.current_mut().state = FrameState::Object;
                self.emit_value(value)
            }
        }
    }

    fn write_property(&mut self, name: &str, value: Option<&dyn Any>) -> Result<()> {
        match self.frames.current().state {
            FrameState::Object => {
                if !self.frames.count_item() {
                    self.out.write_all(b",")?;
                }
                self.newline_indent(self.frames.depth())?;
                self.encode_name(name)?;
                self.out.write_all(b": ")?;
                match value {
                    None => self.out.write_all(b"null")?,
                    Some(v) => {
                        self.frames.current_mut().state = FrameState::ObjAttr;
                        self.dispatch(v)?;
                        self.frames.current_mut().state = FrameState::Object;
                    }
                }
                Ok(())
            }
            state => Err(Error::protocol("write_property", state)),
        }
    }

    fn write_complex_property(&mut self, name: &str) -> Result<()> {
        match self.frames.current().state {
            FrameState::Object => {
                if !self.frames.count_item() {
                    self.out.write_all(b",")?;
                }
                self.newline_indent(self.frames.depth())?;
                self.encode_name(name)?;
                self.out.write_all(b": ")?;
                self.frames.current_mut().state = FrameState::ObjAttr;
                Ok(())
            }
            state => Err(Error::protocol("write_complex_property", state)),
        }
    }

    fn write_raw(&mut self, token: &str) -> Result<()> {
        self.out.write_all(token.as_bytes())?;
        Ok(())
    }

    fn context(&self) -> &Arc<JsonContext> {
        &self.ctx
    }
}
