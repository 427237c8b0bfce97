use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use psp_lib_parser::parse_psp_lib;
use rcpsp::{Instance, Solution};

/// Layered instance: `width` independent activities per layer, every
/// activity preceding the whole next layer.
fn layered_instance(layers: usize, width: usize) -> Instance {
    let nb_activities = layers * width;
    let durations = (0..nb_activities).map(|j| 1 + j % 5).collect();
    let consumptions = vec![
        (0..nb_activities).map(|j| 1 + j % 3).collect(),
        (0..nb_activities).map(|j| j % 2).collect(),
    ];
    let successors = (0..nb_activities)
        .map(|j| {
            let next_layer = j / width + 1;
            if next_layer < layers {
                (next_layer * width..(next_layer + 1) * width).collect()
            } else {
                vec![]
            }
        })
        .collect();

    Instance::new(durations, vec![6, 3], consumptions, successors).unwrap()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("solution");

    let contents = std::fs::read_to_string("../instances/small.sm").unwrap();
    let psp = parse_psp_lib(contents.as_str()).unwrap();
    let instances = vec![
        ("small.sm", Instance::try_from(&psp).unwrap()),
        ("layered_10x12", layered_instance(10, 12)),
        ("layered_30x10", layered_instance(30, 10)),
    ];

    for (name, instance) in &instances {
        group.bench_with_input(
            BenchmarkId::new("add_remove", name),
            instance,
            |b, instance| {
                let mut solution = Solution::new(instance);
                b.iter(|| {
                    for activity in 0..instance.nb_activities() {
                        solution.add_activity(activity, black_box(0)).unwrap();
                        solution.remove_activity(activity).unwrap();
                    }
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("probe_and_place", name),
            instance,
            |b, instance| {
                b.iter(|| {
                    let mut solution = Solution::new(instance);
                    for activity in 0..instance.nb_activities() {
                        let start = (0..=solution.horizon())
                            .find(|&t| solution.is_possible_to_add(activity, t).unwrap())
                            .unwrap_or(0);
                        solution.add_activity(activity, start).unwrap();
                    }
                    solution.objective_value()
                })
            },
        );

        group.bench_with_input(BenchmarkId::new("validate", name), instance, |b, instance| {
            let mut solution = Solution::new(instance);
            let mut start = 0;
            for activity in 0..instance.nb_activities() {
                solution.add_activity(activity, start).unwrap();
                start += instance.duration(activity).unwrap();
            }
            b.iter(|| solution.validate())
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
