use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::config::CascadeConfig;
use super::types::{CascadeState, Decision, MatchCandidate, Tier};
use crate::judge::{JudgeError, JudgeGate, JudgeRequest, JudgeVerdict};
use crate::record::NameRecord;
use crate::scoring::ScoreVector;
use crate::stats::RunStatistics;

/// Per-run state shared by every evaluation.
#[derive(Debug, Clone)]
pub struct CascadeContext {
    pub stats: Arc<RunStatistics>,
    pub cancel: CancellationToken,
}

impl CascadeContext {
    pub fn new(stats: Arc<RunStatistics>, cancel: CancellationToken) -> Self {
        Self { stats, cancel }
    }
}

/// Tiered decision state machine.
///
/// Cheap lexical scores settle clear-cut pairs; only the ambiguous middle band
/// pays for a judge call, and only pairs the judge leaves short of acceptance
/// reach the verifier.
#[derive(Debug, Clone)]
pub struct DecisionCascade {
    config: CascadeConfig,
    judge: Option<JudgeGate>,
    verifier: Option<JudgeGate>,
}

struct Pair {
    query: Arc<NameRecord>,
    candidate: Arc<NameRecord>,
    scores: ScoreVector,
}

/// Mutable trace of one evaluation before it is frozen into a [`MatchCandidate`].
struct Trace {
    path: Vec<CascadeState>,
    semantic_score: Option<f64>,
    verify_score: Option<f64>,
    rationale: Option<String>,
    degraded: bool,
}

impl Trace {
    fn new() -> Self {
        Self {
            path: vec![CascadeState::Init, CascadeState::LexicalScored],
            semantic_score: None,
            verify_score: None,
            rationale: None,
            degraded: false,
        }
    }

    fn push(&mut self, state: CascadeState) {
        self.path.push(state);
    }
}

impl DecisionCascade {
    pub fn new(
        config: CascadeConfig,
        judge: Option<JudgeGate>,
        verifier: Option<JudgeGate>,
    ) -> Self {
        // A verifier without a judge is unreachable.
        let verifier = if judge.is_some() { verifier } else { None };
        Self {
            config,
            judge,
            verifier,
        }
    }

    pub fn has_judge(&self) -> bool {
        self.judge.is_some()
    }

    pub fn has_verifier(&self) -> bool {
        self.verifier.is_some()
    }

    /// Drives one pair to a terminal state. Never fails: judge errors degrade
    /// the pair and are counted in `ctx.stats`.
    pub async fn evaluate(
        &self,
        query: Arc<NameRecord>,
        candidate: Arc<NameRecord>,
        scores: ScoreVector,
        ctx: &CascadeContext,
    ) -> MatchCandidate {
        let cfg = &self.config;
        let lexical = scores.composite();
        let tier1_cleared = lexical >= cfg.tier1_accept_threshold;
        let mut trace = Trace::new();

        ctx.stats.record_scoring_anomalies(scores.anomalies().len());
        let pair = Pair {
            query,
            candidate,
            scores,
        };

        if lexical >= cfg.fast_accept_threshold {
            trace.push(CascadeState::FastAccept);
            return self.finish(pair, trace, Tier::Lexical, lexical, Decision::Accept, ctx);
        }
        if lexical < cfg.fast_reject_threshold {
            trace.push(CascadeState::FastReject);
            return self.finish(pair, trace, Tier::Lexical, lexical, Decision::Reject, ctx);
        }

        let Some(judge) = &self.judge else {
            let (final_score, decision) = self.lexical_decision(lexical);
            trace.push(terminal_state(decision));
            return self.finish(pair, trace, Tier::Lexical, final_score, decision, ctx);
        };

        trace.push(CascadeState::EscalateSemantic);
        let request = JudgeRequest::new(
            pair.query.raw_text.as_str(),
            pair.candidate.raw_text.as_str(),
            lexical,
        )
        .with_normalized(
            pair.query.normalized_text.as_str(),
            pair.candidate.normalized_text.as_str(),
        );

        let semantic = match judge.call(&request, &ctx.cancel, &ctx.stats).await {
            Ok(verdict) => verdict,
            Err(JudgeError::Cancelled) => {
                debug!(
                    query_id = %pair.query.id,
                    candidate_id = %pair.candidate.id,
                    stage = "semantic",
                    "Run cancelled before judge submission"
                );
                trace.push(CascadeState::Cancelled);
                let final_score = self.apply_floor(lexical, tier1_cleared);
                return self.finish(
                    pair,
                    trace,
                    Tier::Unresolved,
                    final_score,
                    Decision::Review,
                    ctx,
                );
            }
            Err(e) => {
                warn!(
                    query_id = %pair.query.id,
                    candidate_id = %pair.candidate.id,
                    stage = "semantic",
                    kind = e.kind(),
                    error = %e,
                    "Judge failed, falling back to lexical decision"
                );
                ctx.stats.record_api_error();
                trace.degraded = true;
                trace.push(CascadeState::Degraded);
                let (final_score, decision) = self.lexical_decision(lexical);
                trace.push(terminal_state(decision));
                return self.finish(pair, trace, Tier::Lexical, final_score, decision, ctx);
            }
        };

        trace.push(CascadeState::SemanticScored);
        let semantic_score = semantic.score();
        record_verdict(&mut trace, &semantic, false);

        let blended = self.apply_floor(
            cfg.blend.blend(lexical, semantic_score, None),
            tier1_cleared,
        );

        // Explicit negative verdict, unless the lexical signal alone cleared the tier-1 bar.
        if semantic_score < cfg.semantic_reject_threshold && !tier1_cleared {
            trace.push(CascadeState::Reject);
            return self.finish(pair, trace, Tier::Semantic, blended, Decision::Reject, ctx);
        }
        if blended >= cfg.final_accept_threshold {
            trace.push(CascadeState::Accept);
            return self.finish(pair, trace, Tier::Semantic, blended, Decision::Accept, ctx);
        }

        let Some(verifier) = &self.verifier else {
            trace.push(CascadeState::Review);
            return self.finish(pair, trace, Tier::Semantic, blended, Decision::Review, ctx);
        };

        trace.push(CascadeState::EscalateVerify);
        match verifier.call(&request, &ctx.cancel, &ctx.stats).await {
            Ok(verdict) => {
                trace.push(CascadeState::VerifiedScored);
                let verify_score = verdict.score();
                record_verdict(&mut trace, &verdict, true);
                let final_score = self.apply_floor(
                    cfg.blend.blend(lexical, semantic_score, Some(verify_score)),
                    tier1_cleared,
                );
                let decision = if final_score >= cfg.final_accept_threshold {
                    Decision::Accept
                } else {
                    Decision::Review
                };
                trace.push(terminal_state(decision));
                self.finish(pair, trace, Tier::Verified, final_score, decision, ctx)
            }
            Err(JudgeError::Cancelled) => {
                trace.push(CascadeState::Cancelled);
                trace.push(CascadeState::Review);
                self.finish(pair, trace, Tier::Semantic, blended, Decision::Review, ctx)
            }
            Err(e) => {
                warn!(
                    query_id = %pair.query.id,
                    candidate_id = %pair.candidate.id,
                    stage = "verify",
                    kind = e.kind(),
                    error = %e,
                    "Verifier failed, keeping semantic decision"
                );
                ctx.stats.record_api_error();
                trace.degraded = true;
                trace.push(CascadeState::Degraded);
                trace.push(CascadeState::Review);
                self.finish(pair, trace, Tier::Semantic, blended, Decision::Review, ctx)
            }
        }
    }

    /// Decision when no judge score is available: the tier-1 bar accepts,
    /// anything else in the middle band goes to review.
    fn lexical_decision(&self, lexical: f64) -> (f64, Decision) {
        if lexical >= self.config.tier1_accept_threshold {
            (self.apply_floor(lexical, true), Decision::Accept)
        } else {
            (lexical, Decision::Review)
        }
    }

    fn apply_floor(&self, score: f64, tier1_cleared: bool) -> f64 {
        if tier1_cleared {
            score.max(self.config.tier1_accept_floor)
        } else {
            score
        }
    }

    fn finish(
        &self,
        pair: Pair,
        trace: Trace,
        tier: Tier,
        final_score: f64,
        decision: Decision,
        ctx: &CascadeContext,
    ) -> MatchCandidate {
        ctx.stats.record_outcome(tier, decision, trace.degraded);

        debug!(
            query_id = %pair.query.id,
            candidate_id = %pair.candidate.id,
            tier = %tier,
            final_score,
            ?decision,
            degraded = trace.degraded,
            "Pair resolved"
        );

        MatchCandidate {
            query: pair.query,
            candidate: Some(pair.candidate),
            scores: pair.scores,
            semantic_score: trace.semantic_score,
            verify_score: trace.verify_score,
            final_score,
            tier_reached: tier,
            confidence_label: self.config.confidence.label(final_score),
            decision,
            degraded: trace.degraded,
            rationale: trace.rationale,
            path: trace.path,
            rank: 0,
        }
    }
}

fn terminal_state(decision: Decision) -> CascadeState {
    match decision {
        Decision::Accept => CascadeState::Accept,
        Decision::Reject => CascadeState::Reject,
        Decision::Review => CascadeState::Review,
    }
}

fn record_verdict(trace: &mut Trace, verdict: &JudgeVerdict, verify: bool) {
    if verify {
        trace.verify_score = Some(verdict.score());
    } else {
        trace.semantic_score = Some(verdict.score());
    }
    if !verdict.rationale.is_empty() {
        trace.rationale = Some(verdict.rationale.clone());
    }
}
