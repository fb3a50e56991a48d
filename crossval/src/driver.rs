//! The minimal harness sequence for one verification case.
//!
//! One call runs a descriptor through size, allocate, fill, prepare,
//! dispatch, and download on the device under test, then repeats the
//! execution on every registered reference with identical input data
//! and compares the downloaded results.

use anyhow::ensure;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{debug, warn};

use veriblas_backend::{BlasBackend, Buffers, Queue, ReferenceRegistry};
use veriblas_common::{Arguments, BufferKind, DispatchError, Scalar};
use veriblas_routines::{BatchedRoutine, Routine};

use crate::compare::{compare_batched_results, compare_results, Comparison};

/// Host-side source data generated once per case, so the device and
/// every reference see bit-identical inputs.
struct SourceData<T: Scalar> {
    x: Vec<T>,
    y: Vec<T>,
    a: Vec<T>,
    b: Vec<T>,
    c: Vec<T>,
}

impl<T: Scalar> SourceData<T> {
    fn generate<U: Scalar>(args: &Arguments<U>, rng: &mut StdRng) -> Self {
        let fill = |len: usize, rng: &mut StdRng| (0..len).map(|_| T::sample(rng)).collect();
        SourceData {
            x: fill(args.x_size, rng),
            y: fill(args.y_size, rng),
            a: fill(args.a_size, rng),
            b: fill(args.b_size, rng),
            c: fill(args.c_size, rng),
        }
    }

    fn get(&self, kind: BufferKind) -> &[T] {
        match kind {
            BufferKind::VecX => &self.x,
            BufferKind::VecY => &self.y,
            BufferKind::MatA => &self.a,
            BufferKind::MatB => &self.b,
            BufferKind::MatC => &self.c,
        }
    }
}

/// Result of executing one reference implementation.
#[derive(Debug, Clone, Serialize)]
pub struct ReferenceOutcome {
    pub reference: String,
    /// Dispatch failure, if any; `None` means the reference ran.
    pub status: Option<String>,
    /// Element-wise agreement with the device result.
    pub comparison: Option<Comparison>,
}

impl ReferenceOutcome {
    fn ran(reference: &str, comparison: Comparison) -> Self {
        ReferenceOutcome {
            reference: reference.to_string(),
            status: None,
            comparison: Some(comparison),
        }
    }

    fn failed(reference: &str, err: &DispatchError) -> Self {
        ReferenceOutcome {
            reference: reference.to_string(),
            status: Some(err.to_string()),
            comparison: None,
        }
    }

    pub fn passed(&self) -> bool {
        self.status.is_none() && self.comparison.map(|c| c.agreeing()).unwrap_or(false)
    }
}

/// Record of one verification case.
#[derive(Debug, Clone, Serialize)]
pub struct CaseReport {
    pub routine: &'static str,
    /// Device dispatch failure, if any.
    pub device_status: Option<String>,
    pub references: Vec<ReferenceOutcome>,
    /// Descriptor-reported operation count, for throughput reporting.
    pub flops: u64,
    /// Descriptor-reported bytes moved.
    pub bytes: u64,
}

impl CaseReport {
    pub fn passed(&self) -> bool {
        self.device_status.is_none() && self.references.iter().all(|r| r.passed())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn execute<R: Routine>(
    backend: &dyn BlasBackend<R::Elem>,
    args: &Arguments<R::Coef>,
    sources: &SourceData<R::Elem>,
    seed: u64,
) -> Result<Vec<R::Elem>, DispatchError> {
    let queue = Queue::new();
    let mut buffers = Buffers::allocate(&queue, args);
    for kind in R::buffers_in() {
        let data = sources.get(kind);
        buffers.get_mut(kind).write(&queue, data.len(), data)?;
    }
    R::prepare_data(args, &queue, seed, &mut buffers)?;
    R::run_routine(backend, args, &mut buffers, &queue)?;
    R::download_result(args, &buffers, &queue)
}

/// Resolves leading dimensions the caller left unspecified (zero)
/// through the descriptor's defaults; `None` maps to a one-element
/// fallback, meaning the routine has no use for the buffer.
fn resolve_leading_dims<R: Routine>(args: &mut Arguments<R::Coef>) {
    if args.a_ld == 0 {
        args.a_ld = R::default_ld_a(args).unwrap_or(1);
    }
    if args.b_ld == 0 {
        args.b_ld = R::default_ld_b(args).unwrap_or(1);
    }
    if args.c_ld == 0 {
        args.c_ld = R::default_ld_c(args).unwrap_or(1);
    }
}

/// Runs one argument set through the device under test and every
/// registered reference.
pub fn run_case<R: Routine>(
    device: &dyn BlasBackend<R::Elem>,
    references: &ReferenceRegistry<R::Elem>,
    args: &mut Arguments<R::Coef>,
    seed: u64,
) -> anyhow::Result<CaseReport> {
    ensure!(!references.is_empty(), "no reference implementations registered");

    resolve_leading_dims::<R>(args);
    R::set_sizes(args);
    let mut rng = StdRng::seed_from_u64(seed);
    let sources = SourceData::generate(args, &mut rng);
    debug!(routine = R::NAME, device = device.name(), n = args.n, seed, "running case");

    let mut report = CaseReport {
        routine: R::NAME,
        device_status: None,
        references: Vec::new(),
        flops: R::flops(args),
        bytes: R::bytes(args),
    };

    let device_output = match execute::<R>(device, args, &sources, seed) {
        Ok(output) => output,
        Err(err) => {
            warn!(routine = R::NAME, error = %err, "device dispatch failed");
            report.device_status = Some(err.to_string());
            return Ok(report);
        }
    };

    for (id, backend) in references.iter() {
        match execute::<R>(backend, args, &sources, seed) {
            Ok(reference_output) => {
                let comparison = compare_results::<R>(
                    args,
                    &device_output,
                    &reference_output,
                    R::error_margin(),
                );
                if !comparison.agreeing() {
                    warn!(
                        routine = R::NAME,
                        reference = id,
                        mismatches = comparison.mismatches,
                        max_deviation = comparison.max_deviation,
                        "cross-implementation disagreement"
                    );
                }
                report.references.push(ReferenceOutcome::ran(id, comparison));
            }
            Err(err) => report.references.push(ReferenceOutcome::failed(id, &err)),
        }
    }
    Ok(report)
}

fn execute_batched<R: BatchedRoutine>(
    backend: &dyn BlasBackend<R::Elem>,
    args: &Arguments<R::Coef>,
    sources: &[SourceData<R::Elem>],
    seed: u64,
) -> Result<Vec<Vec<R::Elem>>, DispatchError> {
    let queue = Queue::new();
    let mut batches: Vec<Buffers<R::Elem>> =
        sources.iter().map(|_| Buffers::allocate(&queue, args)).collect();
    for (buffers, source) in batches.iter_mut().zip(sources) {
        for kind in R::buffers_in() {
            let data = source.get(kind);
            buffers.get_mut(kind).write(&queue, data.len(), data)?;
        }
        R::prepare_data(args, &queue, seed, buffers)?;
    }
    R::run_routine(backend, args, &mut batches, &queue)?;
    batches.iter().map(|buffers| R::download_result(args, buffers, &queue)).collect()
}

/// Batched-variant counterpart of [`run_case`]; results are compared
/// per batch item and aggregated.
pub fn run_batched_case<R: BatchedRoutine>(
    device: &dyn BlasBackend<R::Elem>,
    references: &ReferenceRegistry<R::Elem>,
    args: &mut Arguments<R::Coef>,
    seed: u64,
) -> anyhow::Result<CaseReport> {
    ensure!(!references.is_empty(), "no reference implementations registered");
    ensure!(args.batch_count > 0, "batched case needs at least one batch");

    R::set_sizes(args);
    let mut rng = StdRng::seed_from_u64(seed);
    let sources: Vec<SourceData<R::Elem>> =
        (0..args.batch_count).map(|_| SourceData::generate(args, &mut rng)).collect();
    debug!(routine = R::NAME, batches = args.batch_count, seed, "running batched case");

    let mut report = CaseReport {
        routine: R::NAME,
        device_status: None,
        references: Vec::new(),
        flops: R::flops(args) * args.batch_count as u64,
        bytes: R::bytes(args) * args.batch_count as u64,
    };

    let device_output = match execute_batched::<R>(device, args, &sources, seed) {
        Ok(output) => output,
        Err(err) => {
            warn!(routine = R::NAME, error = %err, "device dispatch failed");
            report.device_status = Some(err.to_string());
            return Ok(report);
        }
    };

    for (id, backend) in references.iter() {
        match execute_batched::<R>(backend, args, &sources, seed) {
            Ok(reference_output) => {
                let mut total = Comparison::default();
                for (device_item, reference_item) in device_output.iter().zip(&reference_output) {
                    total.merge(compare_batched_results::<R>(
                        args,
                        device_item,
                        reference_item,
                        R::error_margin(),
                    ));
                }
                if !total.agreeing() {
                    warn!(
                        routine = R::NAME,
                        reference = id,
                        mismatches = total.mismatches,
                        "cross-implementation disagreement"
                    );
                }
                report.references.push(ReferenceOutcome::ran(id, total));
            }
            Err(err) => report.references.push(ReferenceOutcome::failed(id, &err)),
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use veriblas_backend::HostBackend;
    use veriblas_routines::{Axpy, AxpyBatched};

    #[test]
    fn a_simple_case_passes_and_serializes() {
        let mut args = Arguments::<f32>::default();
        args.n = 7;
        args.alpha = 3.14;
        let registry = ReferenceRegistry::with_available();
        let report = run_case::<Axpy<f32>>(&HostBackend, &registry, &mut args, 42).unwrap();
        assert!(report.passed(), "report: {report:?}");
        assert_eq!(report.flops, 14);
        let json = report.to_json().unwrap();
        assert!(json.contains("\"routine\":\"axpy\""), "json: {json}");
    }

    #[test]
    fn empty_registry_is_a_caller_error() {
        let mut args = Arguments::<f32>::default();
        args.n = 4;
        let registry = ReferenceRegistry::new();
        assert!(run_case::<Axpy<f32>>(&HostBackend, &registry, &mut args, 1).is_err());
    }

    #[test]
    fn batched_case_scales_metrics_by_batch_count() {
        let mut args = Arguments::<f32>::default();
        args.n = 5;
        args.batch_count = 3;
        let registry = ReferenceRegistry::with_available();
        let report =
            run_batched_case::<AxpyBatched<f32>>(&HostBackend, &registry, &mut args, 7).unwrap();
        assert!(report.passed(), "report: {report:?}");
        assert_eq!(report.flops, 30);
        let checked: usize =
            report.references.iter().filter_map(|r| r.comparison.map(|c| c.checked)).sum();
        assert_eq!(checked % 15, 0, "each reference checks 3 batches of 5");
    }
}
