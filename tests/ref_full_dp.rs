use proptest::prelude::*;
use viterbi_dp::{
    probability::joint_probability, DecodeError, EmissionMatrix, Hmm, Prior, StateId, StateSet,
    SymbolAlphabet, SymbolId, TransitionMatrix, ViterbiDecoder,
};

fn build_hmm(n: usize, m: usize, weights: &[u8]) -> Hmm {
    let states = StateSet::new((0..n).map(|i| format!("s{i}"))).unwrap();
    let alphabet = SymbolAlphabet::new((0..m).map(|i| format!("o{i}"))).unwrap();
    let mut w = weights.iter().map(|&q| f64::from(q) / 4.0);
    let a = (0..n)
        .map(|_| (0..n).map(|_| w.next().unwrap()).collect())
        .collect();
    let b = (0..n)
        .map(|_| (0..m).map(|_| w.next().unwrap()).collect())
        .collect();
    let transitions = TransitionMatrix::from_rows(&states, a).unwrap();
    let emissions = EmissionMatrix::from_rows(&states, &alphabet, b).unwrap();
    Hmm::new(states, alphabet, transitions, emissions).unwrap()
}

/// Highest joint probability over every one of the `n^len` paths.
fn brute_force(hmm: &Hmm, prior: &Prior, obs: &[SymbolId]) -> f64 {
    let n = hmm.states().len();
    let total = n.pow(obs.len() as u32);
    let mut best = 0.0f64;
    for code in 0..total {
        let mut rest = code;
        let path: Vec<StateId> = (0..obs.len())
            .map(|_| {
                let s = rest % n;
                rest /= n;
                StateId(s)
            })
            .collect();
        let p = joint_probability(hmm, prior, &path, obs).unwrap();
        if p > best {
            best = p;
        }
    }
    best
}

fn case() -> impl Strategy<Value = (usize, usize, Vec<u8>, Vec<usize>)> {
    (
        1usize..=3,
        1usize..=3,
        prop::collection::vec(0u8..=4, 18),
        prop::collection::vec(0usize..3, 1..7),
    )
}

proptest! {
    #[test]
    fn linear_decoder_matches_exhaustive_search((n, m, weights, raw) in case()) {
        let hmm = build_hmm(n, m, &weights);
        let obs: Vec<SymbolId> = raw.iter().map(|&o| SymbolId(o % m)).collect();
        let prior = Prior::default();
        let best = brute_force(&hmm, &prior, &obs);

        let result = ViterbiDecoder::new().decode_observations(&hmm, &obs.clone().into());
        if best == 0.0 {
            prop_assert!(
                matches!(result, Err(DecodeError::NoPath { .. })),
                "expected no path, got {:?}",
                result
            );
        } else {
            let path = result.unwrap();
            prop_assert_eq!(path.len(), obs.len());
            prop_assert_eq!(path.probability(), best);
            let rescored = joint_probability(&hmm, &prior, path.states(), &obs).unwrap();
            prop_assert_eq!(rescored, best);
        }
    }

    #[test]
    fn log_decoder_matches_exhaustive_search((n, m, weights, raw) in case()) {
        let hmm = build_hmm(n, m, &weights);
        let obs: Vec<SymbolId> = raw.iter().map(|&o| SymbolId(o % m)).collect();
        let prior = Prior::Uniform;
        let best = brute_force(&hmm, &prior, &obs);

        let decoder = ViterbiDecoder::builder().prior(prior.clone()).log_space().build();
        let result = decoder.decode_observations(&hmm, &obs.clone().into());
        if best == 0.0 {
            prop_assert!(
                matches!(result, Err(DecodeError::NoPath { .. })),
                "expected no path, got {:?}",
                result
            );
        } else {
            let path = result.unwrap();
            prop_assert!((path.log_probability() - best.ln()).abs() < 1e-9);
            let rescored = joint_probability(&hmm, &prior, path.states(), &obs).unwrap();
            prop_assert!((rescored - best).abs() <= 1e-9 * best);
        }
    }
}
