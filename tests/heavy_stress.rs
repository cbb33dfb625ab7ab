#![cfg(feature = "heavy")]
use rand::{rngs::StdRng, Rng, SeedableRng};
use viterbi_dp::{
    EmissionMatrix, Hmm, ObservationSequence, StateSet, SymbolAlphabet, SymbolId,
    TransitionMatrix, ViterbiDecoder,
};

fn dishonest_casino() -> Hmm {
    let states = StateSet::new(["F", "L"]).unwrap();
    let alphabet = SymbolAlphabet::from_chars("123456").unwrap();
    let transitions =
        TransitionMatrix::from_rows(&states, vec![vec![0.95, 0.05], vec![0.1, 0.9]]).unwrap();
    let fair = vec![1.0 / 6.0; 6];
    let loaded = vec![0.1, 0.1, 0.1, 0.1, 0.1, 0.5];
    let emissions = EmissionMatrix::from_rows(&states, &alphabet, vec![fair, loaded]).unwrap();
    Hmm::new(states, alphabet, transitions, emissions).unwrap()
}

#[test]
fn heavy_stress_long_sequence_log_space() {
    let mut rng = StdRng::seed_from_u64(123);
    let obs: ObservationSequence = (0..100_000)
        .map(|_| SymbolId(rng.gen_range(0..6)))
        .collect::<Vec<_>>()
        .into();
    let hmm = dishonest_casino();
    let path = ViterbiDecoder::builder()
        .log_space()
        .build()
        .decode_observations(&hmm, &obs)
        .unwrap();
    assert_eq!(path.len(), 100_000);
    assert!(path.log_probability().is_finite());
    assert!(path.log_probability() < 0.0);
}
