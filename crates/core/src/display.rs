use little_chat_model::Role;

/// Where a chat session shows its messages.
///
/// A sink has two regions: completed message blocks, appended with
/// [`render_fixed`](DisplaySink::render_fixed), and a single live region
/// holding the reply that is still streaming. The live region is replaced
/// wholesale on every [`render_live`](DisplaySink::render_live) call, so
/// rendering the same content twice must look the same as rendering it
/// once.
pub trait DisplaySink {
    /// Renders a completed message block.
    fn render_fixed(&mut self, role: Role, content: &str);

    /// Replaces the content of the live region.
    fn render_live(&mut self, content: &str);
}

impl<S: DisplaySink + ?Sized> DisplaySink for &mut S {
    #[inline]
    fn render_fixed(&mut self, role: Role, content: &str) {
        (**self).render_fixed(role, content);
    }

    #[inline]
    fn render_live(&mut self, content: &str) {
        (**self).render_live(content);
    }
}
