use chrono::NaiveDate;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use einvoice::core::*;
use einvoice::xml;

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

fn build_invoice(lines: usize) -> Invoice {
    let mut builder = InvoiceBuilder::new(format!("BENCH-{lines}"), test_date())
        .tax_point_date(test_date())
        .buyer_reference("04011000-12345-03")
        .payment_terms("Zahlbar innerhalb von 30 Tagen")
        .payment_means(PaymentMeans::sepa_credit_transfer("DE89370400440532013000"))
        .seller(
            PartyBuilder::new(
                "Benchmark GmbH",
                AddressBuilder::new("Berlin", "10115", "DE")
                    .street("Hauptstr. 1")
                    .build(),
            )
            .vat_id("DE123456789")
            .build(),
        )
        .buyer(
            PartyBuilder::new(
                "Kunde AG",
                AddressBuilder::new("München", "80331", "DE")
                    .street("Leopoldstr. 42")
                    .build(),
            )
            .build(),
        );

    for i in 1..=lines {
        let rate = if i % 3 == 0 { dec!(7) } else { dec!(19) };
        builder = builder.add_line(
            LineBuilder::new(
                i.to_string(),
                format!("Item {i}"),
                dec!(2),
                "C62",
                dec!(9.99),
            )
            .tax(TaxCategory::StandardRate, rate)
            .build(),
        );
    }

    builder.build().unwrap()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for lines in [10, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(lines), &lines, |b, &lines| {
            b.iter(|| black_box(build_invoice(lines)));
        });
    }
    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("validate");
    for lines in [10, 1000] {
        let invoice = build_invoice(lines);
        group.bench_with_input(BenchmarkId::from_parameter(lines), &invoice, |b, invoice| {
            b.iter(|| {
                let mut invoice = invoice.clone();
                black_box(validate(black_box(&mut invoice)))
            });
        });
    }
    group.finish();
}

fn bench_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("write");
    for lines in [10, 1000] {
        let invoice = build_invoice(lines);
        group.bench_with_input(BenchmarkId::new("cii", lines), &invoice, |b, invoice| {
            b.iter(|| black_box(xml::to_cii_xml(black_box(invoice))));
        });
        group.bench_with_input(BenchmarkId::new("ubl", lines), &invoice, |b, invoice| {
            b.iter(|| black_box(xml::to_ubl_xml(black_box(invoice))));
        });
    }
    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for lines in [10, 1000] {
        let invoice = build_invoice(lines);
        let cii = xml::to_cii_xml(&invoice).unwrap();
        let ubl = xml::to_ubl_xml(&invoice).unwrap();
        group.bench_with_input(BenchmarkId::new("cii", lines), &cii, |b, cii| {
            b.iter(|| black_box(xml::parse(black_box(cii.as_bytes()))));
        });
        group.bench_with_input(BenchmarkId::new("ubl", lines), &ubl, |b, ubl| {
            b.iter(|| black_box(xml::parse(black_box(ubl.as_bytes()))));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_validate, bench_write, bench_parse);
criterion_main!(benches);
