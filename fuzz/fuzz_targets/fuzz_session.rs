#![no_main]

//! Engine session fuzzer.
//!
//! Drives a seeded engine with arbitrary configuration and action indices,
//! including out-of-range ones, through several episodes.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tilemerge::game::check_invariants;
use tilemerge::{Engine, EngineConfig, HeuristicWeights, InvalidMovePolicy};

#[derive(Arbitrary, Debug)]
struct SessionInput {
    seed: u64,
    size: u8,
    warmup: u8,
    threshold: u8,
    heuristic: Option<[i8; 4]>,
    actions: Vec<u8>,
}

fuzz_target!(|input: SessionInput| {
    let config = EngineConfig {
        size: usize::from(input.size % 7),
        seed: Some(input.seed),
        invalid_move: InvalidMovePolicy {
            warmup: u32::from(input.warmup),
            threshold: f64::from(input.threshold) / 100.0,
            ..InvalidMovePolicy::default()
        },
        heuristic: input.heuristic.map(|[merge, empty, mono, sum]| HeuristicWeights {
            merge: f64::from(merge),
            empty: f64::from(empty),
            monotonicity: f64::from(mono),
            sum: f64::from(sum),
            ..HeuristicWeights::default()
        }),
        ..EngineConfig::default()
    };

    // Sizes 0 and 1 must be rejected.
    let Ok(mut engine) = Engine::new(config) else {
        assert!(config.size < 2);
        return;
    };

    for &action in input.actions.iter().take(2048) {
        let Ok(result) = engine.step_index(action) else {
            assert!(action >= 4);
            continue;
        };
        assert!(result.reward.is_finite());
        assert!(check_invariants(engine.board()).is_empty());
        assert_eq!(result.observation.shape, engine.observation_shape());
        if result.done {
            engine.reset();
        }
    }
});
