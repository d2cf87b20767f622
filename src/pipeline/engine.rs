use std::sync::Arc;

use futures_util::future::join_all;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use super::error::EngineResult;
use crate::blocking::{BlockingIndex, BlockingStats};
use crate::cascade::{CascadeContext, DecisionCascade};
use crate::config::{Config, ConfigError};
use crate::dataset::Dataset;
use crate::judge::{JudgeGate, SemanticJudge, build_judges};
use crate::normalize::{NormalizationCache, Normalizer};
use crate::ranking::{FlatRow, MatchResult, Ranker};
use crate::record::NameRecord;
use crate::scoring::LexicalScorer;
use crate::stats::{RunStatistics, StatsSnapshot};

/// Outcome of one [`MatchEngine::run`].
#[derive(Debug)]
pub struct RunReport {
    /// One result per processed query, in input order.
    pub results: Vec<MatchResult>,
    pub statistics: StatsSnapshot,
    pub blocking: BlockingStats,
    /// Whether the run's token was cancelled before it finished.
    pub cancelled: bool,
    /// Queries never submitted because of cancellation.
    pub skipped_queries: usize,
}

impl RunReport {
    pub fn flat_rows(&self) -> Vec<FlatRow> {
        self.results.iter().map(MatchResult::to_flat_row).collect()
    }

    pub fn unresolved_queries(&self) -> usize {
        self.results.iter().filter(|r| !r.is_resolved()).count()
    }
}

/// Entity-name matching engine.
///
/// Construction validates configuration; [`run`](Self::run) never fails. Every
/// run gets its own normalization cache and statistics.
pub struct MatchEngine {
    config: Config,
    normalizer: Normalizer,
    scorer: Arc<LexicalScorer>,
    cascade: Arc<DecisionCascade>,
    ranker: Ranker,
}

impl MatchEngine {
    /// Builds an engine around explicit judges (either may be `None`).
    pub fn new(
        config: Config,
        judge: Option<Arc<dyn SemanticJudge>>,
        verifier: Option<Arc<dyn SemanticJudge>>,
    ) -> EngineResult<Self> {
        config.validate()?;

        let normalizer = Normalizer::from_config(&config.normalizer).map_err(ConfigError::from)?;
        let scorer =
            LexicalScorer::new(config.scoring_weights.clone()).map_err(ConfigError::from)?;

        let judge = judge.map(|j| JudgeGate::new(j, &config.judge));
        let verifier = verifier.map(|v| JudgeGate::new(v, &config.judge));
        let cascade = DecisionCascade::new(config.cascade.clone(), judge, verifier);

        info!(
            judge = cascade.has_judge(),
            verifier = cascade.has_verifier(),
            blocking = config.blocking_enabled,
            max_workers = config.max_workers,
            "Match engine ready"
        );

        Ok(Self {
            ranker: Ranker::new(config.min_score_threshold),
            config,
            normalizer,
            scorer: Arc::new(scorer),
            cascade: Arc::new(cascade),
        })
    }

    /// Builds an engine with judges chosen by `config.judge`.
    pub fn from_config(config: Config) -> EngineResult<Self> {
        config.validate()?;
        let judges = build_judges(&config.judge).map_err(|e| ConfigError::InvalidJudge {
            reason: e.to_string(),
        })?;
        Self::new(config, judges.judge, judges.verifier)
    }

    /// Matches every query against the reference set.
    ///
    /// Queries fan out onto at most `max_workers` concurrent tasks. Cancelling
    /// `cancel` stops new submissions; queries already running finish (their
    /// unsubmitted judge calls end `UNRESOLVED`) and are returned.
    #[instrument(skip_all, fields(queries = queries.len(), references = references.len()))]
    pub async fn run(
        &self,
        queries: &Dataset,
        references: &Dataset,
        cancel: CancellationToken,
    ) -> RunReport {
        let stats = Arc::new(RunStatistics::new(self.config.judge.cost_per_call));
        let cache = NormalizationCache::new();

        let query_records = queries.to_records(&self.normalizer, &cache);
        let reference_records = references.to_records(&self.normalizer, &cache);

        let index = BlockingIndex::build(&reference_records, self.config.blocking_enabled);
        let blocking = index.plan(&query_records);
        stats.record_blocking(&blocking);

        info!(
            run_id = stats.run_id(),
            naive = blocking.naive_comparisons,
            realized = blocking.realized_comparisons,
            reduction = blocking.reduction_ratio(),
            "Starting match run"
        );

        let ctx = CascadeContext::new(Arc::clone(&stats), cancel.clone());
        let workers = Arc::new(Semaphore::new(self.config.max_workers));
        let mut tasks = JoinSet::new();
        let total = query_records.len();
        let mut submitted = 0usize;

        for (idx, query) in query_records.into_iter().enumerate() {
            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                permit = Arc::clone(&workers).acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let candidates = index.candidates_for(&query).to_vec();
            let scorer = Arc::clone(&self.scorer);
            let cascade = Arc::clone(&self.cascade);
            let ranker = self.ranker;
            let top_n = self.config.top_n_matches;
            let ctx = ctx.clone();

            tasks.spawn(async move {
                let _permit = permit;
                let result = QueryJob {
                    query,
                    candidates,
                    scorer: &scorer,
                    cascade: &cascade,
                    ctx: &ctx,
                }
                .run(ranker, top_n)
                .await;
                (idx, result)
            });
            submitted += 1;
        }

        let mut indexed = Vec::with_capacity(submitted);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(entry) => indexed.push(entry),
                Err(e) => error!(error = %e, "Query task failed"),
            }
        }
        indexed.sort_by_key(|(idx, _)| *idx);
        let results: Vec<MatchResult> = indexed.into_iter().map(|(_, r)| r).collect();

        let skipped_queries = total - submitted;
        if skipped_queries > 0 {
            warn!(skipped_queries, "Run cancelled before all queries were submitted");
        }

        let statistics = stats.snapshot();
        info!(
            run_id = %statistics.run_id,
            queries = statistics.queries,
            pairs = statistics.total_pairs,
            api_calls = statistics.api_calls,
            api_errors = statistics.api_errors,
            degraded = statistics.degraded_pairs,
            "Match run finished"
        );

        RunReport {
            results,
            statistics,
            blocking,
            cancelled: cancel.is_cancelled(),
            skipped_queries,
        }
    }
}

impl std::fmt::Debug for MatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchEngine")
            .field("config", &self.config)
            .field("cascade", &self.cascade)
            .field("ranker", &self.ranker)
            .finish_non_exhaustive()
    }
}

/// All comparisons for one query. Completes only when every pair has a terminal state.
struct QueryJob<'a> {
    query: Arc<NameRecord>,
    candidates: Vec<Arc<NameRecord>>,
    scorer: &'a LexicalScorer,
    cascade: &'a DecisionCascade,
    ctx: &'a CascadeContext,
}

impl QueryJob<'_> {
    async fn run(self, ranker: Ranker, top_n: usize) -> MatchResult {
        let QueryJob {
            query,
            candidates,
            scorer,
            cascade,
            ctx,
        } = self;

        let evaluations = candidates.into_iter().map(|candidate| {
            let scores = scorer.score_records(&query, &candidate);
            cascade.evaluate(Arc::clone(&query), candidate, scores, ctx)
        });
        let evaluated = join_all(evaluations).await;

        ctx.stats.record_query();
        ranker.rank(query, evaluated, top_n)
    }
}
