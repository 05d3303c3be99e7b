use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hwpulse::{
    metrics::data::{Sample, Status},
    publish::{decode, encode},
    resolve, GpuCommand, HwmonBackend,
};
use std::fs;
use std::time::Duration;

fn sample() -> Sample {
    Sample {
        timestamp: "14:07".to_string(),
        cpu_percent: 42.3,
        ram_percent: 61.0,
        ram_used_gb: 8.2,
        ram_total_gb: 16.0,
        disk_percent: 77.5,
        cpu_temp: Some(55),
        gpu_temp: None,
        fan_speed: Some(1200),
        status: Status::Online,
    }
}

/// Benchmark wire payload encoding and decoding
fn bench_payload(c: &mut Criterion) {
    let sample = sample();
    let payload = encode(&sample).expect("Should encode");

    c.bench_function("payload_encode", |b| {
        b.iter(|| encode(&sample).expect("Should encode"))
    });

    c.bench_function("payload_decode", |b| {
        b.iter(|| decode(&payload).expect("Should decode"))
    });
}

/// Benchmark the console summary line
fn bench_summary_line(c: &mut Criterion) {
    let sample = sample();

    c.bench_function("summary_line", |b| b.iter(|| sample.summary_line()));
}

/// Benchmark sensor resolution on hwmon trees of growing size
fn bench_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    group.measurement_time(Duration::from_secs(5));

    let gpu = GpuCommand::new("hwpulse-bench-no-gpu-tool", Vec::<String>::new());

    for devices in [2usize, 8, 32] {
        let root = tempfile::tempdir().expect("Should create temp dir");
        for i in 0..devices {
            let dir = root.path().join(format!("hwmon{i}"));
            fs::create_dir_all(&dir).expect("Should create device");
            let chip = if i == 0 { "k10temp" } else { "nct6775" };
            fs::write(dir.join("name"), chip).expect("Should write name");
            for channel in 1..=4 {
                fs::write(dir.join(format!("temp{channel}_input")), "45000")
                    .expect("Should write temp");
                fs::write(dir.join(format!("fan{channel}_input")), "900")
                    .expect("Should write fan");
            }
        }

        let backend = HwmonBackend::new(root.path());
        group.bench_with_input(BenchmarkId::new("devices", devices), &devices, |b, _| {
            b.iter(|| resolve(&backend, &gpu).expect("Should resolve"))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_payload,
    bench_summary_line,
    bench_resolution
);
criterion_main!(benches);
