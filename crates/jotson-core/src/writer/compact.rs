//! Compact writer
//!
//! The same protocol machine as the pretty writer with all whitespace
//! removed. Illegal call sequences fail identically; only the emitted
//! bytes differ.

use std::any::Any;
use std::io::Write;
use std::sync::Arc;

use crate::writer::{FieldNameEncoder, FrameStack, FrameState, JsonWriter};
use crate::{Error, JsonContext, Result};

/// Protocol-enforcing writer producing single-line JSON.
pub struct CompactJsonWriter<W: Write> {
    ctx: Arc<JsonContext>,
    out: W,
    field_names: Arc<dyn FieldNameEncoder>,
    frames: FrameStack,
}

impl<W: Write> CompactJsonWriter<W> {
    /// Create a session.
    pub fn new(ctx: Arc<JsonContext>, out: W) -> Self {
        let field_names = Arc::clone(ctx.field_names());
        Self {
            ctx,
            out,
            field_names,
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

    fn encode_name(&mut self, name: &str) -> Result<()> {
        let Self {
            out, field_names, ..
        } = self;
        field_names.encode(name, out)
    }

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

    fn open(&mut self, operation: &'static str, token: &[u8], state: FrameState) -> Result<()> {
        match self.frames.current().state {
            FrameState::Unknown => {
                let frame = self.frames.current_mut();
                if !frame.delegated && frame.items > 0 {
                    return Err(Error::protocol(operation, FrameState::Unknown));
                }
                frame.items = 1;
                self.out.write_all(token)?;
                self.frames.push(state);
            }
            FrameState::Array => {
                if !self.frames.current().delegated && !self.frames.count_item() {
                    self.out.write_all(b",")?;
                }
                self.out.write_all(token)?;
                self.frames.push(state);
            }
            current @ FrameState::Object => {
                return Err(Error::protocol(operation, current));
            }
            FrameState::ObjAttr => {
                self.frames.current_mut().state = FrameState::Object;
                self.out.write_all(token)?;
                self.frames.push(state);
            }
        }
        Ok(())
    }

    fn close(&mut self, operation: &'static str, token: &[u8], state: FrameState) -> Result<()> {
        if self.frames.current().state != state {
            return Err(Error::protocol(operation, self.frames.current().state));
        }
        self.frames.pop();
        self.out.write_all(token)?;
        Ok(())
    }
}

impl<W: Write> JsonWriter for CompactJsonWriter<W> {
    fn begin_array(&mut self) -> Result<()> {
        self.open("begin_array", b"[", FrameState::Array)
    }

    fn end_array(&mut self) -> Result<()> {
        self.close("end_array", b"]", FrameState::Array)
    }

    fn begin_object(&mut self) -> Result<()> {
        self.open("begin_object", b"{", FrameState::Object)
    }

    fn end_object(&mut self) -> Result<()> {
        self.close("end_object", b"}", FrameState::Object)
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
                self.encode_name(name)?;
                self.out.write_all(b":")?;
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
                self.encode_name(name)?;
                self.out.write_all(b":")?;
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
