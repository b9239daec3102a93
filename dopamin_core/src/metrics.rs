//! The rolling-window metrics calculator.
//!
//! Every ingested event triggers a wholesale recomputation of the metrics
//! tuple from the trailing window of the log. The calculator is a total
//! function over numeric input: intermediate results are clamped into their
//! documented ranges rather than rejected.

use serde::{Deserialize, Serialize};

use crate::trigger::{EventType, TriggerLog};

/// Number of most-recent log entries the calculator reads.
pub const CALC_WINDOW: usize = 20;

/// Blend between extrinsic prediction error and intrinsic novelty.
/// Held at the balanced midpoint; see [`LAMBDA_IDEATION`].
pub const LAMBDA_BALANCED: f32 = 0.5;

/// Reserved weight for a future phase-adaptive blend (ideation phase).
/// Not consulted by the current calculator.
pub const LAMBDA_IDEATION: f32 = 0.2;

/// Reserved weight for a future phase-adaptive blend (execution phase).
/// Not consulted by the current calculator.
pub const LAMBDA_EXECUTION: f32 = 0.8;

/// Lower bound of the flow band on reward density.
pub const FLOW_THRESHOLD_MIN: f32 = 0.4;

/// Upper bound of the flow band on reward density.
pub const FLOW_THRESHOLD_MAX: f32 = 0.8;

/// Coherence penalty per error report in the window.
const ERROR_PENALTY: f32 = 0.1;

/// Resilience bonus per social-tagged event in the window.
const SOCIAL_BONUS: f32 = 0.05;

/// System instability divisor. Fixed at stable; reserved extension point.
const DRIFT_STABLE: f32 = 1.0;

/// The derived engagement signals.
///
/// Recomputed wholesale on every ingested event - never patched
/// incrementally.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DopamineMetrics {
    /// Reward density over the trailing window, clamped to [0, 1].
    pub dopamin_dichte: f32,

    /// Composite engagement index. Unclamped; may exceed 1.
    pub engagement_index: f32,

    /// Error-driven coherence in [0.1, 1.0].
    pub coherence: f32,

    /// Social-bond resilience, capped at 1.0.
    pub resilience: f32,

    /// Count of recompute cycles classified as flow. Despite the name this
    /// is a cycle counter, not elapsed time; kept for compatibility with
    /// the original signal.
    pub flow_zeit: u64,
}

impl DopamineMetrics {
    /// The fixed startup baseline.
    pub fn baseline() -> Self {
        Self {
            dopamin_dichte: 0.5,
            engagement_index: 0.5,
            coherence: 1.0,
            resilience: 1.0,
            flow_zeit: 0,
        }
    }
}

impl Default for DopamineMetrics {
    fn default() -> Self {
        Self::baseline()
    }
}

/// Result of one recompute cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsUpdate {
    pub metrics: DopamineMetrics,
    /// Whether reward density landed inside the flow band this cycle.
    pub is_flow: bool,
}

/// Recompute the full metrics tuple from the trailing window of the log.
///
/// Returns `None` when the log is empty: recomputation is skipped entirely
/// and prior metrics stay in effect.
///
/// # Algorithm
///
/// 1. Per-event reward blends extrinsic prediction error with intrinsic
///    novelty at the balanced lambda
/// 2. Reward density is the baseline-centered, window-normalized sum,
///    clamped to [0, 1]
/// 3. Coherence degrades per error report, floored at 0.1
/// 4. Resilience grows per social-tagged event, capped at 1.0
/// 5. Engagement is the coherence-resilience-density product over drift
/// 6. The flow counter advances when density sits inside the flow band
pub fn recompute(logs: &[TriggerLog], previous: &DopamineMetrics) -> Option<MetricsUpdate> {
    if logs.is_empty() {
        return None;
    }

    let window = &logs[logs.len().saturating_sub(CALC_WINDOW)..];

    let weighted_sum: f32 = window
        .iter()
        .map(|log| {
            LAMBDA_BALANCED * log.dopamine_delta + (1.0 - LAMBDA_BALANCED) * log.intrinsic_score
        })
        .sum();

    let dopamin_dichte = (0.5 + weighted_sum / CALC_WINDOW as f32).clamp(0.0, 1.0);

    let error_count = window
        .iter()
        .filter(|log| log.event_type == EventType::ErrorReport)
        .count();
    let social_count = window.iter().filter(|log| log.social_tag).count();

    let coherence = (1.0 - error_count as f32 * ERROR_PENALTY).max(0.1);
    let resilience = (0.5 + social_count as f32 * SOCIAL_BONUS).min(1.0);

    let engagement_index = (coherence * resilience * dopamin_dichte) / DRIFT_STABLE;

    let is_flow = (FLOW_THRESHOLD_MIN..=FLOW_THRESHOLD_MAX).contains(&dopamin_dichte);
    let flow_zeit = previous.flow_zeit + u64::from(is_flow);

    Some(MetricsUpdate {
        metrics: DopamineMetrics {
            dopamin_dichte,
            engagement_index,
            coherence,
            resilience,
            flow_zeit,
        },
        is_flow,
    })
}
