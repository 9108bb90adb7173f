use trapbench::bench::{self, Calibrator, WorkerArgs, METRIC_NAME};
use trapbench::gate;
use trapbench::registry::{OperationEntry, Registry};
use trapbench::select::{self, FUNC_SETTING};
use trapbench::testutil::MockHost;
use trapbench_common::{ArchFamily, CpuInfo, SelectError, Unsupported};
use trapbench_hal::Counter;

fn fail() -> bool {
    false
}

fn synthetic() -> Registry {
    Registry::from_entries([
        OperationEntry::new("getcpu", fail),
        OperationEntry::new("gettimeofday", fail),
        OperationEntry::new("time", fail),
    ])
}

fn args(instance: u32) -> WorkerArgs<'static> {
    WorkerArgs {
        name: trapbench::NAME,
        instance,
    }
}

#[test]
fn all_enabled_by_default() {
    let registry = synthetic();
    assert_eq!(registry.enabled().count(), registry.len());
}

#[test]
fn bogus_selection_lists_every_name() {
    let mut registry = synthetic();
    let err = select::select(&mut registry, "bogus").unwrap_err();
    let text = err.to_string();
    for name in ["getcpu", "gettimeofday", "time"] {
        assert!(text.contains(name), "{} missing from {:?}", name, text);
    }
    assert!(registry.iter().all(OperationEntry::is_enabled));
}

#[test]
fn failing_probes_still_time() {
    let mut registry = synthetic();
    let mut host = MockHost::new().with_sweeps(10);
    let calibrator = Calibrator {
        burst: 100,
        window: 0.25,
    };

    let report = bench::execute(&args(0), &mut host, &mut registry, &calibrator)
        .unwrap()
        .unwrap();
    assert_eq!(report.window.real_call_count, 30);
    assert_eq!(host.counter(), 30);
    assert_eq!(host.metrics.len(), 1);
    assert_eq!(host.metrics[0].1, METRIC_NAME);
}

#[test]
fn invalid_selection_is_a_failure() {
    let mut registry = synthetic();
    let mut host = MockHost::new().with_setting(FUNC_SETTING, "fork");
    let result = bench::execute(&args(0), &mut host, &mut registry, &Calibrator::default());
    assert!(matches!(result, Err(SelectError::InvalidName { .. })));
}

#[test]
fn foreign_cpu_is_skipped() {
    let cpu = CpuInfo::foreign(ArchFamily::Aarch64);
    assert_eq!(
        gate::check_supported_on(trapbench::NAME, &cpu, trapbench::abi::ENTRY_POINTS),
        Err(Unsupported::NotX86)
    );
}

#[test]
fn descriptor_help() {
    let info = trapbench::bench_info();
    assert_eq!(info.name, "x86syscall");
    assert_eq!(info.help.len(), 3);
    assert_eq!(info.option_setters.len(), 1);
    assert_eq!(info.option_setters[0].option, FUNC_SETTING);
}

#[cfg(all(target_os = "linux", target_arch = "x86_64"))]
mod live {
    use super::*;
    use trapbench_common::Outcome;

    #[test]
    fn descriptor_is_runnable() {
        let info = trapbench::bench_info();
        assert!(info.unimplemented_reason.is_none());
        let supported = info.supported.unwrap();
        assert_eq!(supported(info.name), Ok(()));
    }

    #[test]
    fn native_worker_times_time() {
        let mut registry = Registry::native();
        let mut host = MockHost::new()
            .with_sweeps(1000)
            .with_setting(FUNC_SETTING, "time");
        let calibrator = Calibrator {
            burst: 1000,
            window: 0.25,
        };

        let report = bench::execute(&args(0), &mut host, &mut registry, &calibrator)
            .unwrap()
            .unwrap();
        assert_eq!(report.window.real_call_count, 1000);
        assert_eq!(host.counter(), 1000);
    }

    #[test]
    fn worker_entry_point_runs_to_completion() {
        let info = trapbench::bench_info();
        let worker = info.worker.unwrap();
        // the mock clock makes Phase B finish after one burst of the real calibrator
        let mut host = MockHost::new().with_sweeps(3).with_step(1.0);
        assert_eq!(worker(&args(1), &mut host), Outcome::Success);
        assert_eq!(host.counter(), 9);
    }

    #[test]
    fn worker_entry_point_rejects_bad_name() {
        let worker = trapbench::bench_info().worker.unwrap();
        let mut host = MockHost::new().with_setting(FUNC_SETTING, "Time");
        assert_eq!(worker(&args(0), &mut host), Outcome::Failure);
    }
}
