use crate::consumer::Consumer;
use crate::error::Result;
use crate::read::Tokenizer;
use crate::stream::Stream;
use std::io::BufRead;

/// Decodes `bytes` into `consumer` with the default [`Decoder`] settings.
///
/// A `null` document leaves `consumer` untouched. Anything after the value is ignored,
/// use [`Decoder::reject_trailing_data`] to refuse it.
pub fn unmarshal<C: Consumer>(consumer: &mut C, bytes: &[u8]) -> Result<()> {
    Decoder::new().unmarshal(consumer, bytes)
}

/// Decode settings.
///
/// ```
/// use json_consumer::{Decoder, Skip};
///
/// let mut decoder = Decoder::new();
/// decoder.max_nesting(16).reject_trailing_data(true);
/// assert!(decoder.unmarshal(&mut Skip, b"[1] [2]").is_err());
/// assert!(decoder.unmarshal(&mut Skip, b"[1] ").is_ok());
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Decoder {
    max_nesting: Option<usize>,
    reject_trailing_data: bool,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximal allowed number of nested object and array openings. Infinite by default.
    pub fn max_nesting(&mut self, depth: usize) -> &mut Self {
        self.max_nesting = Some(depth);
        self
    }

    /// Fails the decode if anything but whitespace follows the value. Disabled by default.
    pub fn reject_trailing_data(&mut self, reject: bool) -> &mut Self {
        self.reject_trailing_data = reject;
        self
    }

    pub fn unmarshal<C: Consumer>(&self, consumer: &mut C, bytes: &[u8]) -> Result<()> {
        self.unmarshal_from_reader(consumer, bytes)
    }

    pub fn unmarshal_from_reader<C: Consumer>(
        &self,
        consumer: &mut C,
        reader: impl BufRead,
    ) -> Result<()> {
        let result = self.decode(consumer, reader);
        match &result {
            Ok(()) => log::trace!("Decoded {}", std::any::type_name::<C>()),
            Err(e) => log::debug!("Failed to decode {}: {e}", std::any::type_name::<C>()),
        }
        result
    }

    fn decode<C: Consumer, R: BufRead>(&self, consumer: &mut C, reader: R) -> Result<()> {
        let mut tokenizer = Tokenizer::from_reader(reader);
        if let Some(depth) = self.max_nesting {
            tokenizer.max_stack_size(depth);
        }
        let mut stream = Stream::from_tokenizer(tokenizer);
        stream.read_consumer(consumer)?;
        if self.reject_trailing_data {
            stream.finish()?;
        }
        Ok(())
    }
}
