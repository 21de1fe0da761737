pub mod config;
pub mod ctx;
pub mod emit;
pub mod ops;

use ctx::LogCtx;

pub fn crawl() -> LogCtx<ops::crawl::Crawl> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn aggregate() -> LogCtx<ops::aggregate::Aggregate> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn export() -> LogCtx<ops::export::Export> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn upload() -> LogCtx<ops::upload::Upload> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
pub fn stats() -> LogCtx<ops::stats::Stats> { LogCtx { json: config::logs_are_json(), _marker: std::marker::PhantomData } }
