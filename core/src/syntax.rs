use core::ops::Range;

/// Byte range into the source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Span(pub Range<usize>);

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span(start..end)
    }

    pub fn start(&self) -> usize {
        self.0.start
    }

    pub fn end(&self) -> usize {
        self.0.end
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Smallest span covering both `a` and `b`.
    pub fn combine(a: &Span, b: &Span) -> Span {
        Span(a.start().min(b.start())..a.end().max(b.end()))
    }

    /// Slice of `source` covered by this span, if it is in bounds.
    pub fn text<'s>(&self, source: &'s str) -> Option<&'s str> {
        source.get(self.0.clone())
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span(range)
    }
}
