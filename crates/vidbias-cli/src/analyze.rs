//! `analyze` and `show` command handlers.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use sqlx::PgPool;
use vidbias_analysis::{
    bias_balance, interpret, word_budget, AnalysisError, BalanceZone, Chunker, CommentaryClient,
    HfBiasScorer, HfSentimentScorer, HttpTranscriptFetcher, InferenceClient, ModelTokenizer,
    Orchestrator, PgAnalysisStore, PipelineOptions, Provenance, VideoAnalysisRecord,
    WhitespaceTokenizer,
};
use vidbias_core::AppConfig;

use crate::channels::format_date;

/// Chunk with the sentiment model's own tokenizer when its `tokenizer.json`
/// is configured, otherwise by words under [`word_budget`].
///
/// # Errors
///
/// Returns an error if the configured tokenizer file cannot be loaded.
pub(crate) fn build_chunker(config: &AppConfig) -> anyhow::Result<Chunker> {
    match &config.tokenizer_path {
        Some(path) => {
            let tokenizer = ModelTokenizer::from_file(path)?;
            tracing::debug!(path = %path, max_tokens = config.chunk_max_tokens, "chunking with model tokenizer");
            Ok(Chunker::new(Arc::new(tokenizer), config.chunk_max_tokens))
        }
        None => {
            let words = word_budget(config.chunk_max_tokens);
            tracing::debug!(max_words = words, "no tokenizer configured, chunking by words");
            Ok(Chunker::new(Arc::new(WhitespaceTokenizer), words))
        }
    }
}

/// Wire the production collaborators from configuration.
///
/// # Errors
///
/// Returns an error if an HTTP client or the tokenizer cannot be built.
pub(crate) fn build_orchestrator(config: &AppConfig, pool: PgPool) -> anyhow::Result<Orchestrator> {
    let inference = InferenceClient::from_app_config(config)?;
    let fetcher = HttpTranscriptFetcher::new(
        &config.transcript_service_url,
        config.inference_timeout_secs,
    )?;

    Ok(Orchestrator::new(
        build_chunker(config)?,
        Arc::new(HfSentimentScorer::new(
            inference.clone(),
            config.sentiment_model.clone(),
        )),
        Arc::new(HfBiasScorer::new(
            inference,
            config.ideology_model.clone(),
            config.bias_model.clone(),
        )),
        Arc::new(fetcher),
        Arc::new(PgAnalysisStore::new(pool)),
        PipelineOptions::from_app_config(config),
    ))
}

fn commentary_client(config: &AppConfig) -> anyhow::Result<CommentaryClient> {
    Ok(CommentaryClient::new(
        InferenceClient::from_app_config(config)?,
        config.commentary_model.clone(),
    ))
}

/// Analyze every input with at most `concurrency` runs in flight.
///
/// Per-video failures are logged and counted; the command fails only if every
/// input failed.
///
/// # Errors
///
/// Returns an error if the collaborators cannot be built or all inputs failed.
pub(crate) async fn run_analyze(
    config: &AppConfig,
    pool: PgPool,
    inputs: &[String],
    concurrency: usize,
    with_commentary: bool,
) -> anyhow::Result<()> {
    let orchestrator = build_orchestrator(config, pool)?;
    let commentary = if with_commentary {
        Some(commentary_client(config)?)
    } else {
        None
    };

    let results = stream::iter(inputs.iter().map(|input| {
        let orchestrator = &orchestrator;
        async move { (input, orchestrator.analyze_or_reload(input).await) }
    }))
    .buffer_unordered(concurrency.max(1))
    .collect::<Vec<_>>()
    .await;

    let mut failed = 0usize;
    for (input, result) in results {
        match result {
            Ok(outcome) => {
                let source = match outcome.provenance {
                    Provenance::Stored => "stored",
                    Provenance::Created => "new",
                };
                println!("== {} ({source})", outcome.record.video_id);
                print_record(&outcome.record);
                if let Some(client) = &commentary {
                    print_commentary(client, &outcome.record).await;
                }
                println!();
            }
            Err(e @ AnalysisError::NoTranscript { .. }) => {
                failed += 1;
                tracing::warn!(input = %input, error = %e, "skipping video");
            }
            Err(e) => {
                failed += 1;
                tracing::error!(input = %input, error = %e, "analysis failed");
            }
        }
    }

    if failed > 0 && failed == inputs.len() {
        anyhow::bail!("all {failed} videos failed analysis");
    }
    if failed > 0 {
        println!("{} analyzed, {failed} failed", inputs.len() - failed);
    }
    Ok(())
}

/// Print a stored analysis.
///
/// # Errors
///
/// Returns an error if the input is not a video id or the store fails.
pub(crate) async fn run_show(
    config: &AppConfig,
    pool: PgPool,
    input: &str,
    with_commentary: bool,
) -> anyhow::Result<()> {
    let orchestrator = build_orchestrator(config, pool)?;
    let Some(record) = orchestrator.stored(input).await? else {
        println!("no stored analysis for '{input}'; run `vidbias analyze` first");
        return Ok(());
    };

    print_record(&record);
    if with_commentary {
        print_commentary(&commentary_client(config)?, &record).await;
    }
    Ok(())
}

fn print_record(record: &VideoAnalysisRecord) {
    let balance = bias_balance(&record.bias);
    println!("title:      {}", record.title);
    println!("channel:    {}", record.channel_name);
    println!("published:  {}", format_date(record.published_at));
    println!("views:      {}", record.view_count);
    println!("url:        {}", record.video_url);
    println!(
        "sentiment:  {} ({:.1}%)",
        record.sentiment.label,
        record.sentiment.confidence * 100.0
    );
    println!(
        "ideology:   left {:.1}%  center {:.1}%  right {:.1}%",
        record.bias.left * 100.0,
        record.bias.center * 100.0,
        record.bias.right * 100.0
    );
    println!(
        "language:   biased {:.1}%  neutral {:.1}%",
        record.bias.biased * 100.0,
        record.bias.neutral * 100.0
    );
    println!(
        "balance:    {balance:+.1} ({})",
        BalanceZone::classify(balance).as_str()
    );
}

async fn print_commentary(client: &CommentaryClient, record: &VideoAnalysisRecord) {
    println!();
    println!("{}", interpret(&record.sentiment, &record.bias));
    match client.summarize(&record.caption_text).await {
        Ok(text) => println!("**Model commentary**\n\n{text}"),
        Err(e) => {
            tracing::warn!(video_id = %record.video_id, error = %e, "commentary unavailable");
        }
    }
}
