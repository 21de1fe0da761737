use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Upload;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Plan, ScanDir, ReadMeta, Submit }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Plan => "plan",
        Phase::ScanDir => "scan_dir",
        Phase::ReadMeta => "read_meta",
        Phase::Submit => "submit",
    }}
    fn span(&self) -> Span { match self {
        Phase::Plan => info_span!("plan"),
        Phase::ScanDir => info_span!("scan_dir"),
        Phase::ReadMeta => info_span!("read_meta"),
        Phase::Submit => info_span!("submit"),
    }}
}

impl OpMarker for Upload {
    const NAME: &'static str = "upload";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("upload") }
}
