//! Frame-aligned sample bridge between an input and an output callback.
//!
//! Both halves move whole frames only, so the interleaved read position never
//! drifts across channels. The input half drops whole frames when the ring is
//! full. The output half reads a full piece or nothing; a short ring yields a
//! silent piece and one counted underrun.

use crate::backend::DuplexCallback;
use rtrb::{Consumer, Producer, RingBuffer};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Producer half, owned by the input callback.
pub(crate) struct InputBridge {
    producer: Producer<f32>,
    channels: usize,
}

/// Consumer half, owned by the output callback.
pub(crate) struct OutputBridge {
    consumer: Consumer<f32>,
    scratch: Vec<f32>,
    underruns: Arc<AtomicU64>,
}

/// Build a bridge holding `periods` blocks of `frames_per_buffer` frames.
///
/// `channels` and `frames_per_buffer` must be nonzero.
pub(crate) fn duplex_bridge(
    channels: usize,
    frames_per_buffer: usize,
    periods: usize,
    underruns: Arc<AtomicU64>,
) -> (InputBridge, OutputBridge) {
    let block_len = frames_per_buffer * channels;
    let (producer, consumer) = RingBuffer::<f32>::new(block_len * periods.max(1));
    (
        InputBridge { producer, channels },
        OutputBridge {
            consumer,
            scratch: vec![0.0; block_len],
            underruns,
        },
    )
}

impl InputBridge {
    /// Queue as many whole frames of `data` as fit. Returns the samples queued.
    pub(crate) fn push(&mut self, data: &[f32]) -> usize {
        let fit = data.len().min(self.producer.slots());
        let len = fit / self.channels * self.channels;
        match self.producer.push_entire_slice(&data[..len]) {
            Ok(()) => len,
            Err(_) => 0,
        }
    }
}

impl OutputBridge {
    /// Fill `data` by running `callback` over queued input, one scratch-sized
    /// piece at a time.
    pub(crate) fn pull(&mut self, data: &mut [f32], callback: &mut DuplexCallback) {
        // Hosts may ignore the fixed buffer request, so work in scratch-sized pieces.
        for out in data.chunks_mut(self.scratch.len()) {
            let input = &mut self.scratch[..out.len()];
            if self.consumer.pop_entire_slice(input).is_err() {
                input.fill(0.0);
                self.underruns.fetch_add(1, Ordering::Relaxed);
            }
            callback(input, out);
        }
    }

    /// Samples waiting in the ring.
    #[cfg(test)]
    fn queued(&self) -> usize {
        self.consumer.slots()
    }
}
