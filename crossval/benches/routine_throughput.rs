//! Throughput of the host backend driven through the descriptors,
//! reported in descriptor-counted flops per second.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use num_complex::Complex32;
use rand::rngs::StdRng;
use rand::SeedableRng;
use veriblas_backend::{Buffers, HostBackend, Queue};
use veriblas_common::{Arguments, Scalar};
use veriblas_routines::{Gemv, Her, Routine};

fn fill_inputs<R: Routine>(
    args: &Arguments<R::Coef>,
    buffers: &mut Buffers<R::Elem>,
    queue: &Queue,
    seed: u64,
) {
    let mut rng = StdRng::seed_from_u64(seed);
    for kind in R::buffers_in() {
        let buf = buffers.get_mut(kind);
        let data: Vec<R::Elem> = (0..buf.len()).map(|_| Scalar::sample(&mut rng)).collect();
        buf.write(queue, data.len(), &data).unwrap();
    }
}

fn bench_her(c: &mut Criterion) {
    let mut group = c.benchmark_group("her");
    for n in [64usize, 256] {
        let mut args = Arguments::<f32>::default();
        args.n = n;
        args.a_ld = n;
        args.alpha = 0.75;
        Her::<Complex32>::set_sizes(&mut args);

        let queue = Queue::new();
        let mut buffers = Buffers::allocate(&queue, &args);
        fill_inputs::<Her<Complex32>>(&args, &mut buffers, &queue, 9);

        group.throughput(Throughput::Elements(Her::<Complex32>::flops(&args)));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                Her::<Complex32>::run_routine(
                    &HostBackend,
                    black_box(&args),
                    &mut buffers,
                    &queue,
                )
                .unwrap()
            });
        });
    }
    group.finish();
}

fn bench_gemv(c: &mut Criterion) {
    let mut group = c.benchmark_group("gemv");
    for n in [64usize, 256] {
        let mut args = Arguments::<f32>::default();
        args.m = n;
        args.n = n;
        args.a_ld = n;
        args.alpha = 1.5;
        args.beta = 0.5;
        Gemv::<f32>::set_sizes(&mut args);

        let queue = Queue::new();
        let mut buffers = Buffers::allocate(&queue, &args);
        fill_inputs::<Gemv<f32>>(&args, &mut buffers, &queue, 10);

        group.throughput(Throughput::Elements(Gemv::<f32>::flops(&args)));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| {
                Gemv::<f32>::run_routine(&HostBackend, black_box(&args), &mut buffers, &queue)
                    .unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_her, bench_gemv);
criterion_main!(benches);
