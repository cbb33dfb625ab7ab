#![cfg(feature = "parallel")]

use rand::{rngs::StdRng, Rng, SeedableRng};
use viterbi_dp::{
    EmissionMatrix, Hmm, ObservationSequence, Prior, StateSet, SymbolAlphabet, SymbolId,
    TransitionMatrix, ViterbiDecoder,
};

fn random_rows(rng: &mut StdRng, rows: usize, cols: usize, zero_rate: f64) -> Vec<Vec<f64>> {
    (0..rows)
        .map(|_| {
            let raw: Vec<f64> = (0..cols)
                .map(|_| {
                    if rng.gen_bool(zero_rate) {
                        0.0
                    } else {
                        rng.gen_range(0.01..1.0)
                    }
                })
                .collect();
            let sum: f64 = raw.iter().sum();
            if sum == 0.0 {
                vec![1.0 / cols as f64; cols]
            } else {
                raw.into_iter().map(|x| x / sum).collect()
            }
        })
        .collect()
}

fn random_case(seed: u64, n: usize, m: usize, len: usize) -> (Hmm, ObservationSequence) {
    let mut rng = StdRng::seed_from_u64(seed);
    let states = StateSet::new((0..n).map(|i| format!("s{i}"))).unwrap();
    let alphabet = SymbolAlphabet::new((0..m).map(|i| format!("o{i}"))).unwrap();
    let a = random_rows(&mut rng, n, n, 0.3);
    let b = random_rows(&mut rng, n, m, 0.2);
    let transitions = TransitionMatrix::from_rows(&states, a).unwrap();
    let emissions = EmissionMatrix::from_rows(&states, &alphabet, b).unwrap();
    let obs: Vec<SymbolId> = (0..len).map(|_| SymbolId(rng.gen_range(0..m))).collect();
    (
        Hmm::new(states, alphabet, transitions, emissions).unwrap(),
        obs.into(),
    )
}

#[test]
fn parallel_linear_matches_sequential() {
    for seed in 0..4 {
        let (hmm, obs) = random_case(seed, 80, 6, 60);
        let sequential = ViterbiDecoder::builder()
            .prior(Prior::Uniform)
            .with_parallel_min_states(usize::MAX)
            .build()
            .decode_observations(&hmm, &obs);
        let parallel = ViterbiDecoder::builder()
            .prior(Prior::Uniform)
            .with_parallel_min_states(1)
            .build()
            .decode_observations(&hmm, &obs);
        assert_eq!(sequential, parallel, "seed {seed}");
    }
}

#[test]
fn parallel_log_space_matches_sequential() {
    for seed in 10..14 {
        let (hmm, obs) = random_case(seed, 96, 4, 400);
        let sequential = ViterbiDecoder::builder()
            .log_space()
            .with_parallel_min_states(usize::MAX)
            .build()
            .decode_observations(&hmm, &obs)
            .unwrap();
        let parallel = ViterbiDecoder::builder()
            .log_space()
            .with_parallel_min_states(1)
            .build()
            .decode_observations(&hmm, &obs)
            .unwrap();
        assert_eq!(sequential, parallel, "seed {seed}");
    }
}
