use prometheus::register_counter_vec;
use prometheus::CounterVec;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use lazy_static::lazy_static;

lazy_static! {
    pub static ref ANSWERS_CNTR: CounterVec = register_counter_vec!(
        "quiz_answers_total",
        "Number of submitted answers",
        &["category", "correct"]
    )
    .unwrap();
    pub static ref FINISHED_CNTR: CounterVec = register_counter_vec!(
        "quiz_finished_total",
        "Number of quiz runs that reached the end",
        &["reason"]
    )
    .unwrap();
    pub static ref RESULTS_CNTR: CounterVec = register_counter_vec!(
        "quiz_results_total",
        "Result submissions by outcome",
        &["outcome"]
    )
    .unwrap();
}

pub fn init_tracing() {
    let mut fmt_layer = fmt::layer();
    if std::env::var("INCLUDE_SPAN_EVENTS").is_ok_and(|value| value.eq_ignore_ascii_case("true")) {
        fmt_layer = fmt_layer.with_span_events(FmtSpan::ENTER | FmtSpan::EXIT);
    }
    let filter_layer = EnvFilter::try_from_env("LOG_LEVEL")
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
