//! Relay Benchmarks - Per-message Hot Path
//!
//! Benchmarks the pure work done for every channel post: the candidate
//! filter, signal parsing and quantity arithmetic.
//!
//! Run with: cargo bench --bench relay_bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rust_decimal_macros::dec;

use bybit_signal_relay::domain::order::format_quantity;
use bybit_signal_relay::domain::parser::SignalParser;
use bybit_signal_relay::domain::sizing::{fraction_of, quote_to_base};

const SIGNAL: &str = "🚨 SIGNAL #1042\n\
    Category: linear\n\
    Symbol: ETHUSDT\n\
    Side: Buy\n\
    OrderType: Market\n\
    Quantity: 0.04\n\
    Entry zone 1950-2000, targets 2100 / 2200";

const CHATTER: &str = "Good morning! Markets are quiet today, no setups yet. \
    Stay tuned for the next signal and manage your risk.";

/// Benchmark the candidate filter on a non-signal post.
fn bench_filter(c: &mut Criterion) {
    c.bench_function("filter_chatter", |b| {
        b.iter(|| SignalParser::is_candidate(black_box(CHATTER)));
    });
}

/// Benchmark parsing a full signal.
fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_signal", |b| {
        b.iter(|| SignalParser::parse(black_box(SIGNAL)));
    });
}

/// Benchmark FIXED/ALL_IN arithmetic plus wire formatting.
fn bench_sizing(c: &mut Criterion) {
    c.bench_function("size_all_in_buy", |b| {
        b.iter(|| {
            let spend = fraction_of(black_box(dec!(1000)), black_box(dec!(0.95)), 6);
            format_quantity(quote_to_base(spend, black_box(dec!(2000.37)), 6))
        });
    });
}

criterion_group!(benches, bench_filter, bench_parse, bench_sizing);
criterion_main!(benches);
