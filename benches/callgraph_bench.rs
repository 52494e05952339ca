/// Benchmarks for the semgraph analysis pipeline.
///
/// Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use semgraph::application::{analyze, AnalysisOptions};
use semgraph::domain::project::{Project, ProjectSource};
use semgraph::infrastructure::SynFrontEnd;

/// Synthetic project: each unit declares a type whose methods call into the
/// next unit, so every call crosses a unit boundary.
fn synthetic_sources(num_units: usize, fns_per_unit: usize) -> Vec<ProjectSource> {
    (0..num_units)
        .map(|unit| {
            let next = (unit + 1) % num_units;
            let mut text = format!("pub struct T{};\n\nimpl T{} {{\n", unit, unit);
            for f in 0..fns_per_unit {
                text.push_str(&format!(
                    "    pub fn f{}(x: u32) -> u32 {{\n        let y = T{}::f{}(x);\n        println!(\"{{}}\", helper(y));\n        y\n    }}\n",
                    f,
                    next,
                    (f + 1) % fns_per_unit
                ));
            }
            text.push_str("}\n\nfn helper(v: u32) -> u32 { v }\n");
            ProjectSource::new(format!("src/unit_{}.rs", unit), text)
        })
        .collect()
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("project_load");
    for &num_units in &[10usize, 50, 200] {
        let sources = synthetic_sources(num_units, 20);
        group.throughput(Throughput::Elements(num_units as u64));
        group.bench_with_input(BenchmarkId::new("units", num_units), &sources, |b, sources| {
            b.iter(|| {
                let project = Project::load(&SynFrontEnd, "bench", black_box(sources), &[]).unwrap();
                black_box(project.units().len())
            })
        });
    }
    group.finish();
}

fn bench_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("walk");
    group.sample_size(30);
    let sources = synthetic_sources(200, 20);
    let project = Project::load(&SynFrontEnd, "bench", &sources, &[]).unwrap();
    project.bindings();
    group.throughput(Throughput::Elements((200 * 20 * 2) as u64));

    for parallel in [false, true] {
        let label = if parallel { "parallel" } else { "sequential" };
        group.bench_function(label, |b| {
            b.iter(|| black_box(analyze(&project, AnalysisOptions { parallel }).graph.len()))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_load, bench_walk);
criterion_main!(benches);
