use tracing::Span;
use tracing::info_span;

use crate::telemetry::ctx::{OpMarker, PhaseSpan};

#[derive(Copy, Clone, Debug)]
pub struct Crawl;

#[derive(Copy, Clone, Debug)]
pub enum Phase { Plan, LoadCheckpoint, Page, FetchPage, Extract, FetchItem, ReadMore, Persist, DiscoverNext }

impl PhaseSpan for Phase {
    fn name(&self) -> &'static str { match self {
        Phase::Plan => "plan",
        Phase::LoadCheckpoint => "load_checkpoint",
        Phase::Page => "page",
        Phase::FetchPage => "fetch_page",
        Phase::Extract => "extract",
        Phase::FetchItem => "fetch_item",
        Phase::ReadMore => "read_more",
        Phase::Persist => "persist",
        Phase::DiscoverNext => "discover_next",
    }}
    fn span(&self) -> Span { match self {
        Phase::Plan => info_span!("plan"),
        Phase::LoadCheckpoint => info_span!("load_checkpoint"),
        Phase::Page => info_span!("page"),
        Phase::FetchPage => info_span!("fetch_page"),
        Phase::Extract => info_span!("extract"),
        Phase::FetchItem => info_span!("fetch_item"),
        Phase::ReadMore => info_span!("read_more"),
        Phase::Persist => info_span!("persist"),
        Phase::DiscoverNext => info_span!("discover_next"),
    }}
}

impl OpMarker for Crawl {
    const NAME: &'static str = "crawl";
    type Phase = Phase;
    fn root_span() -> Span { info_span!("crawl") }
}
