use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Aggregate;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Plan, LoadRecords, Structure, SaveBuckets }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Plan => "plan",
        Phase::LoadRecords => "load_records",
        Phase::Structure => "structure",
        Phase::SaveBuckets => "save_buckets",
    }}
    fn span(&self) -> Span { match self {
        Phase::Plan => info_span!("plan"),
        Phase::LoadRecords => info_span!("load_records"),
        Phase::Structure => info_span!("structure"),
        Phase::SaveBuckets => info_span!("save_buckets"),
    }}
}

impl OpMarker for Aggregate {
    const NAME: &'static str = "aggregate";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("aggregate") }
}
