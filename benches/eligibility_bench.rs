//! Benchmarks for the per-render hot path.
//!
//! Every redraw evaluates the gate and formats up to four balances.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use faucet_pages::amount::{format_token_amount, fraction_of_token, whole_tokens};
use faucet_pages::{BalanceField, BalanceSnapshot, EligibilityRules};

fn bench_evaluate(c: &mut Criterion) {
    let rules = EligibilityRules::address_page();
    let subject = BalanceSnapshot {
        token: BalanceField::Amount(whole_tokens(500)),
        native: BalanceField::Amount(fraction_of_token(1, 10)),
    };
    let faucet = BalanceSnapshot {
        token: BalanceField::Amount(whole_tokens(1_000_000)),
        native: BalanceField::Error,
    };

    c.bench_function("EligibilityRules::evaluate", |b| {
        b.iter(|| rules.evaluate(black_box(&subject), black_box(&faucet)))
    });
}

fn bench_format(c: &mut Criterion) {
    let amount = whole_tokens(1234) + fraction_of_token(5, 8);

    c.bench_function("format_token_amount", |b| {
        b.iter(|| format_token_amount(black_box(amount)))
    });

    let snapshot = BalanceSnapshot {
        token: BalanceField::Amount(amount),
        native: BalanceField::NotFetched,
    };
    c.bench_function("BalanceSnapshot::view", |b| b.iter(|| black_box(&snapshot).view()));
}

criterion_group!(benches, bench_evaluate, bench_format);
criterion_main!(benches);
