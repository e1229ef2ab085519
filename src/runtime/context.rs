use std::io::Write;

/// Injected output capability. The evaluator writes through the sink the
/// context exposes and never closes it.
pub trait Context {
    fn output(&mut self) -> &mut dyn Write;
}

/// Context over an embedder-supplied sink (stdout, a file, a test buffer).
pub struct StreamContext<W: Write> {
    output: W,
}

impl<W: Write> StreamContext<W> {
    pub fn new(output: W) -> Self {
        Self { output }
    }

    pub fn into_inner(self) -> W {
        self.output
    }
}

impl<W: Write> Context for StreamContext<W> {
    fn output(&mut self) -> &mut dyn Write {
        &mut self.output
    }
}

/// In-memory context used to capture printed text, e.g. for stringification.
#[derive(Default)]
pub struct BufferContext {
    output: Vec<u8>,
}

impl BufferContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn captured(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

impl Context for BufferContext {
    fn output(&mut self) -> &mut dyn Write {
        &mut self.output
    }
}

pub(crate) fn write_text(
    ctx: &mut dyn Context,
    text: &str,
) -> Result<(), super::error::RuntimeError> {
    ctx.output()
        .write_all(text.as_bytes())
        .map_err(super::error::RuntimeError::output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_context_captures_written_bytes() {
        let mut ctx = BufferContext::new();
        write_text(&mut ctx, "hello ").expect("write failed");
        write_text(&mut ctx, "world").expect("write failed");
        assert_eq!(ctx.captured(), "hello world");
    }

    #[test]
    fn stream_context_hands_back_its_sink() {
        let mut ctx = StreamContext::new(Vec::new());
        write_text(&mut ctx, "out").expect("write failed");
        assert_eq!(ctx.into_inner(), b"out");
    }
}
