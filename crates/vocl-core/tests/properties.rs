//! Property-based tests for vocl-core.
//!
//! Tests delay-line bounds over arbitrary parameters, transcoder round-trips,
//! and engine channel isolation using proptest for randomized inputs.

use proptest::prelude::*;
use vocl_core::{
    ConfigError, EchoEffect, EchoParams, Effect, StreamEngine, deinterleave, delay_samples,
    interleave,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Any sample rate / delay pair yielding at least one slot builds an echo
    /// that never panics or indexes out of bounds, whatever the input.
    #[test]
    fn echo_never_out_of_bounds(
        sample_rate in 8000.0f32..192000.0f32,
        delay_ms in 0.01f32..50.0f32,
        feedback in 0.0f32..0.99f32,
        mix in 0.0f32..1.0f32,
        input in prop::collection::vec(-1.0f32..=1.0f32, 1..2048),
    ) {
        let params = EchoParams { delay_ms, feedback, mix };
        match EchoEffect::new(sample_rate, params) {
            Ok(mut echo) => {
                prop_assert!(echo.delay_samples() >= 1);
                prop_assert_eq!(echo.delay_samples(), delay_samples(sample_rate, delay_ms));
                for &s in &input {
                    let out = echo.process(s);
                    prop_assert!(out.is_finite());
                    prop_assert!(echo.position() < echo.delay_samples());
                }
            }
            Err(err) => {
                prop_assert_eq!(delay_samples(sample_rate, delay_ms), 0);
                let is_empty_line = matches!(err, ConfigError::EmptyDelayLine { .. });
                prop_assert!(is_empty_line);
            }
        }
    }

    /// Interleave(Deinterleave(x, n), n) == x for every block of whole frames.
    #[test]
    fn transcoder_round_trip(
        channels in 1usize..9,
        frames in 0usize..256,
        seed in prop::collection::vec(-1.0f32..=1.0f32, 1..64),
    ) {
        let block: Vec<f32> = (0..channels * frames).map(|i| seed[i % seed.len()] + i as f32).collect();
        let planar = deinterleave(&block, channels).unwrap();
        prop_assert_eq!(planar.len(), channels);
        prop_assert!(planar.iter().all(|p| p.len() == frames));
        prop_assert_eq!(interleave(&planar, channels).unwrap(), block);
    }

    /// Blocks with a partial trailing frame are rejected, never truncated.
    #[test]
    fn transcoder_rejects_partial_frames(
        channels in 2usize..9,
        frames in 0usize..64,
        extra in 1usize..8,
    ) {
        let extra = extra % channels;
        prop_assume!(extra != 0);
        let block = vec![0.0f32; channels * frames + extra];
        let is_mismatch = matches!(
            deinterleave(&block, channels),
            Err(ConfigError::BlockMismatch { .. })
        );
        prop_assert!(is_mismatch);
    }

    /// Engine output for each channel equals that channel's effect run alone,
    /// and does not depend on how the stream is cut into buffers.
    #[test]
    fn engine_matches_solo_channels(
        channels in 1usize..5,
        frames in 1usize..400,
        block_frames in 1usize..96,
        max_block_frames in 1usize..64,
        delays in prop::collection::vec(1u32..40, 4),
        feedbacks in prop::collection::vec(0.0f32..0.95, 4),
    ) {
        let sample_rate = 1000.0;
        let params: Vec<EchoParams> = (0..channels)
            .map(|c| EchoParams { delay_ms: delays[c] as f32, feedback: feedbacks[c], mix: 0.5 })
            .collect();

        let input: Vec<f32> = (0..frames * channels)
            .map(|i| ((i * 31 + 7) % 17) as f32 / 17.0 - 0.5)
            .collect();

        let effects: Vec<Box<dyn Effect + Send>> = params
            .iter()
            .map(|&p| Box::new(EchoEffect::new(sample_rate, p).unwrap()) as Box<dyn Effect + Send>)
            .collect();
        let mut engine = StreamEngine::new(channels, max_block_frames, effects).unwrap();

        let mut output = vec![0.0f32; input.len()];
        let step = block_frames * channels;
        for (inp, out) in input.chunks(step).zip(output.chunks_mut(step)) {
            engine.process(inp, out);
        }

        let planar_in = deinterleave(&input, channels).unwrap();
        let planar_out = deinterleave(&output, channels).unwrap();
        for c in 0..channels {
            let mut solo = EchoEffect::new(sample_rate, params[c]).unwrap();
            let expected: Vec<f32> = planar_in[c].iter().map(|&s| solo.process(s)).collect();
            prop_assert_eq!(&planar_out[c], &expected);
        }
    }
}
