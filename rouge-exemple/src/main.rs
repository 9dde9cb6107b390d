use rouge_core::metric::Metric;
use rouge_core::{Rouge, RougeConfig, ScoresOutput, rouge_l_summary_level};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG=debug to see the per-metric counts
    env_logger::init();

    // Default evaluator: rouge-1, rouge-2 and rouge-l, reporting r, p and f
    let rouge = Rouge::default();

    let hyps = ["the transcript is a written version of each day 's cnn student news program"];
    let refs = ["this page includes the show transcript. use the transcript to help students with reading comprehension and vocabulary"];

    // Scores for each hypothesis/reference pair
    if let ScoresOutput::PerPair(pairs) = rouge.get_scores(&hyps, &refs, false, false)? {
        for (i, pair) in pairs.iter().enumerate() {
            for (metric, stats) in &pair.metrics {
                let line: Vec<String> = stats.iter().map(|(stat, value)| format!("{stat}={value:.4}")).collect();
                println!("Pair {} {}: {}", i + 1, metric, line.join(" "));
            }
        }
    }

    // Raw counts with word lengths, for a custom selection of metrics
    let config = RougeConfig {
        metrics: vec!["rouge-1".to_owned(), "rouge-l".to_owned()],
        raw_results: true,
        return_lengths: true,
        ..RougeConfig::default()
    };
    let raw = Rouge::new(config)?;
    if let ScoresOutput::PerPair(pairs) = raw.get_scores(&hyps, &refs, false, false)? {
        if let Some(lengths) = pairs.first().and_then(|pair| pair.lengths) {
            println!("Lengths: hyp={} ref={}", lengths.hyp, lengths.reference);
        }
    }

    // Averaged over a small corpus
    let corpus_hyps = ["the cat sat on the mat", "a dog ran. it was fast", ""];
    let corpus_refs = ["the cat was on the mat", "the dog ran fast", "no hypothesis here"];
    if let ScoresOutput::Average(average) = rouge.get_scores(&corpus_hyps, &corpus_refs, true, true)? {
        for (metric, stats) in &average {
            let line: Vec<String> = stats.iter().map(|(stat, value)| format!("{stat}={value:.4}")).collect();
            println!("Average {}: {}", metric, line.join(" "));
        }
    }

    // Unknown metric names are rejected when building the evaluator
    let invalid = RougeConfig { metrics: vec!["rouge-w".to_owned()], ..RougeConfig::default() };
    match Rouge::new(invalid) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Invalid configuration: {e}"),
    }

    // Empty inputs fail the call instead of producing scores
    let empty: [&str; 0] = [];
    match rouge_l_summary_level(&empty, &refs, false, true) {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("{}: {e}", Metric::RougeL),
    }

    Ok(())
}
