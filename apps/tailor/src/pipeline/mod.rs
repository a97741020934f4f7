// Pipeline orchestration: a six-node dependency graph with two fan-out points.
//
//   resume text ─┐                    ┌─ score ─────────────────────────┐
//                ├─ extract (join) ───┤                                 ├─ report
//   job text ────┘                    └─ plan ── apply ── re-score ─────┘
//
// Stages are free functions over a `StageContext`; `driver` sequences them.

pub mod application;
pub mod assessment;
pub mod driver;
pub mod extraction;

use std::sync::Arc;
use std::time::Duration;

use crate::agents::AgentInvoker;

/// What every stage needs: the agent to call and the bound on each call.
#[derive(Clone)]
pub struct StageContext {
    pub agent: Arc<dyn AgentInvoker>,
    pub timeout: Duration,
}

impl StageContext {
    pub fn new(agent: Arc<dyn AgentInvoker>, timeout: Duration) -> Self {
        Self { agent, timeout }
    }
}
