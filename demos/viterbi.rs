//! Example: decoding the dishonest casino.
//!
//! Run with:
//! `cargo run --example viterbi`

use viterbi_dp::{
    probability::joint_probability, EmissionMatrix, Hmm, ObservationSequence, Prior, StateSet,
    SymbolAlphabet, TransitionMatrix, ViterbiDecoder,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // F is a fair die, L is loaded towards six.
    let states = StateSet::new(["F", "L"])?;
    let alphabet = SymbolAlphabet::from_chars("123456")?;
    let transitions =
        TransitionMatrix::from_rows(&states, vec![vec![0.95, 0.05], vec![0.1, 0.9]])?;
    let emissions = EmissionMatrix::from_rows(
        &states,
        &alphabet,
        vec![vec![1.0 / 6.0; 6], vec![0.1, 0.1, 0.1, 0.1, 0.1, 0.5]],
    )?;
    let hmm = Hmm::new(states, alphabet, transitions, emissions)?;

    let rolls = "315116246446644245311321631164152133625144543631656626566666";
    let obs = ObservationSequence::from_chars(hmm.alphabet(), rolls)?;

    let decoder = ViterbiDecoder::builder().prior(Prior::Uniform).build();
    let path = decoder.decode_observations(&hmm, &obs)?;

    println!("rolls: {rolls}");
    println!("dice:  {}", path.render(hmm.states()));
    println!("log-probability: {:.4}", path.log_probability());

    let rescored = joint_probability(&hmm, &Prior::Uniform, path.states(), obs.as_slice())?;
    println!("rescored probability: {rescored:e}");
    Ok(())
}
