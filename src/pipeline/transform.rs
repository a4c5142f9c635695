//! Counting transform stage: per-chunk counters, progress thresholds, and the text transform.
//!
//! Chunks are decoded as UTF-8. A multi-byte character cut by a chunk boundary is held back
//! and prepended to the next chunk, so output never depends on where the source split the
//! input. Byte sequences that can never become valid UTF-8 are passed through unchanged.
//!
//! Lines are counted as LF bytes. LF is a single byte and cannot straddle a boundary, so the
//! per-chunk count is exact; CRLF counts once and a lone CR is not a terminator.

use crate::pipeline::context::RunState;
use crate::pipeline::error_handler::{BoxError, PipelineError};
use crate::{Chunk, ProgressReport};

/// Stateless text mapping applied to each decoded run of complete characters.
pub trait TextTransform {
    /// Append the transformed form of `text` to `out`.
    fn apply(&self, text: &str, out: &mut Vec<u8>) -> Result<(), BoxError>;
}

/// Unicode uppercase mapping, independent of locale.
#[derive(Clone, Copy, Debug, Default)]
pub struct Uppercase;

impl TextTransform for Uppercase {
    fn apply(&self, text: &str, out: &mut Vec<u8>) -> Result<(), BoxError> {
        if text.is_ascii() {
            out.extend(text.bytes().map(|b| b.to_ascii_uppercase()));
        } else {
            out.extend_from_slice(text.to_uppercase().as_bytes());
        }
        Ok(())
    }
}

/// Number of LF terminators in `bytes`.
pub fn count_lines(bytes: &[u8]) -> u64 {
    bytes.iter().filter(|&&b| b == b'\n').count() as u64
}

/// Output of one stage step: the transformed chunk plus any thresholds it crossed.
#[derive(Debug, Default)]
pub struct StageOutput {
    pub chunk: Chunk,
    pub reports: Vec<ProgressReport>,
}

/// Applies a [`TextTransform`] chunk by chunk and keeps the [`RunState`] counters.
pub struct CountingStage<T> {
    transform: T,
    /// Incomplete UTF-8 tail of the previous chunk (at most 3 bytes).
    carry: Vec<u8>,
}

impl<T: TextTransform> CountingStage<T> {
    pub fn new(transform: T) -> Self {
        Self {
            transform,
            carry: Vec::new(),
        }
    }

    /// Bytes currently held back waiting for the rest of a character.
    pub fn pending(&self) -> &[u8] {
        &self.carry
    }

    /// Process one input chunk: bytes, lines, transform, then progress.
    pub fn process(
        &mut self,
        state: &mut RunState,
        input: &[u8],
    ) -> Result<StageOutput, PipelineError> {
        state.record_chunk(input.len(), count_lines(input));

        let chunk = if self.carry.is_empty() {
            self.transform_bytes(input)?
        } else {
            let mut joined = std::mem::take(&mut self.carry);
            joined.extend_from_slice(input);
            self.transform_bytes(&joined)?
        };

        let mut reports = Vec::new();
        state.advance_progress(&mut reports);
        Ok(StageOutput { chunk, reports })
    }

    /// End of input: release any held-back bytes unchanged. They were never a full character.
    pub fn finish(&mut self) -> Chunk {
        std::mem::take(&mut self.carry)
    }

    fn transform_bytes(&mut self, data: &[u8]) -> Result<Chunk, PipelineError> {
        let mut out = Vec::with_capacity(data.len());
        let mut rest = data;
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    self.apply(text, &mut out)?;
                    break;
                }
                Err(e) => {
                    let (valid, after) = rest.split_at(e.valid_up_to());
                    // `valid_up_to` ends the longest valid prefix, so this never falls back.
                    let text = std::str::from_utf8(valid).unwrap_or_default();
                    self.apply(text, &mut out)?;
                    match e.error_len() {
                        Some(n) => {
                            out.extend_from_slice(&after[..n]);
                            rest = &after[n..];
                        }
                        None => {
                            self.carry.extend_from_slice(after);
                            break;
                        }
                    }
                }
            }
        }
        Ok(out)
    }

    fn apply(&self, text: &str, out: &mut Vec<u8>) -> Result<(), PipelineError> {
        if text.is_empty() {
            return Ok(());
        }
        self.transform
            .apply(text, out)
            .map_err(|source| PipelineError::TransformFailure { source })
    }
}
