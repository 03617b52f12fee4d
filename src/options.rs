/// What the reader does when the first line of a stream starts with the UTF-8 byte order mark
/// lead byte `0xEF`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BomHandling {
    /// Stop reading and return whatever has been parsed, which is nothing. This is how
    /// desktop files have historically been read by this engine.
    #[default]
    StopParsing,
    /// Drop the three byte order mark bytes and keep parsing the stream.
    Strip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderOptions {
    pub bom: BomHandling,
}

impl ReaderOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn bom(mut self, bom: BomHandling) -> Self {
        self.bom = bom;
        self
    }
}
