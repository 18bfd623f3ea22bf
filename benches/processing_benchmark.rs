use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use grid_forecast::models::GridRecord;
use grid_forecast::processors::{ForecastAggregator, ParallelAggregator};
use grid_forecast::readers::{CsvRecordDecoder, RecordDecoder};
use grid_forecast::writers::JsonWriter;

const QUANTITIES: [&str; 4] = ["TMP", "WIND", "var192_140_242", "var192_201_113"];

// One record per quantity, grid point and hour, in decoder order
fn create_grid_records(points: usize, hours: usize) -> Vec<GridRecord> {
    let base = Utc.with_ymd_and_hms(2022, 8, 17, 0, 0, 0).unwrap();
    let side = (points as f64).sqrt().ceil() as usize;
    let mut records = Vec::with_capacity(points * hours * QUANTITIES.len());

    for hour in 0..hours {
        let ts = base + Duration::hours(hour as i64);
        for quantity in QUANTITIES {
            for point in 0..points {
                let lat = 59.5 + (point / side) as f64 * 0.025;
                let lon = 19.0 + (point % side) as f64 * 0.05;
                records.push(GridRecord::new(quantity, ts, lat, lon, 280.0 + (point % 30) as f32));
            }
        }
    }

    records
}

fn benchmark_aggregator(c: &mut Criterion) {
    let records = create_grid_records(1_000, 12);

    c.bench_function("forecast_aggregator", |b| {
        b.iter(|| {
            let forecast = ForecastAggregator::new().aggregate(&records);
            black_box(forecast.item_count())
        })
    });
}

fn benchmark_json_writer(c: &mut Criterion) {
    let records = create_grid_records(1_000, 12);
    let forecast = ForecastAggregator::new().aggregate(&records);

    c.bench_function("json_writer_sorted", |b| {
        let writer = JsonWriter::new().with_sorted(true);
        b.iter(|| black_box(writer.encode(&forecast).map(|bytes| bytes.len()).unwrap_or(0)))
    });
}

fn benchmark_csv_decoder(c: &mut Criterion) {
    let mut csv = String::from("quantity,valid_time,latitude,longitude,value\n");
    for record in create_grid_records(500, 6) {
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            record.quantity_id,
            record.valid_time.format("%Y-%m-%dT%H:%M:%SZ"),
            record.latitude,
            record.longitude,
            record.value
        ));
    }

    c.bench_function("csv_decoder", |b| {
        let decoder = CsvRecordDecoder::new();
        b.iter(|| black_box(decoder.decode(csv.as_bytes()).map(|r| r.len()).unwrap_or(0)))
    });
}

fn benchmark_parallel_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation_by_size");

    for &points in &[100, 1_000, 5_000] {
        let records = create_grid_records(points, 12);

        group.bench_with_input(BenchmarkId::new("sequential", points), &records, |b, records| {
            b.iter(|| black_box(ForecastAggregator::new().aggregate(records).item_count()))
        });

        group.bench_with_input(BenchmarkId::new("parallel", points), &records, |b, records| {
            let aggregator = ParallelAggregator::default().with_parallel_threshold(0);
            b.iter(|| {
                black_box(
                    aggregator
                        .aggregate(records, None)
                        .map(|(forecast, _)| forecast.item_count())
                        .unwrap_or(0),
                )
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_aggregator,
    benchmark_json_writer,
    benchmark_csv_decoder,
    benchmark_parallel_by_size
);
criterion_main!(benches);
