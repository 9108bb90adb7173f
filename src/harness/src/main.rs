//! trapbench host runner.
//!
//! A minimal stand-in for the test framework the benchmark normally lives in:
//! parses options, runs the capability gate, spawns workers on threads, stops
//! them after a timeout and prints the aggregate figure.

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossbeam_queue::ArrayQueue;
use trapbench::bench::METRIC_SLOT;
use trapbench::select::FUNC_SETTING;
use trapbench::settings::{self, SettingSnapshot, SettingStore};
use trapbench::{help, BenchInfo, Registry, WorkerArgs};
use trapbench_common::Outcome;
use trapbench_hal::{Clock, Counter, MetricSink, RunControl, Settings, WorkerState};

#[derive(clap::Parser, Clone, Debug)]
#[command(name = "trapbench", about = "Measure raw syscall instruction latency")]
struct Cli {
    /// Start N workers exercising functions using syscall.
    #[arg(long = "x86syscall", value_name = "N", default_value_t = 1)]
    workers: u32,
    /// Use just syscall function F.
    #[arg(long = "x86syscall-func", value_name = "F")]
    func: Option<String>,
    /// Stop each worker after N syscall function calls (0 = no limit).
    #[arg(long = "x86syscall-ops", value_name = "N", default_value_t = 0)]
    ops: u64,
    /// Stop all workers after this many seconds.
    #[arg(long, value_name = "SECS", default_value_t = 5)]
    timeout: u64,
    /// Print the option table and the available functions, then exit.
    #[arg(long)]
    list: bool,
}

/// Host state owned by one worker thread.
struct ThreadHost {
    epoch: Instant,
    stop: Arc<AtomicBool>,
    max_ops: u64,
    counter: u64,
    settings: SettingSnapshot,
    ns_per_call: Option<f64>,
}

impl ThreadHost {
    fn new(stop: Arc<AtomicBool>, max_ops: u64, settings: SettingSnapshot) -> Self {
        Self {
            epoch: Instant::now(),
            stop,
            max_ops,
            counter: 0,
            settings,
            ns_per_call: None,
        }
    }
}

impl Clock for ThreadHost {
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

impl RunControl for ThreadHost {
    fn keep_running(&self) -> bool {
        !self.stop.load(Ordering::Relaxed) && (self.max_ops == 0 || self.counter < self.max_ops)
    }

    fn set_state(&mut self, state: WorkerState) {
        log::trace!("worker state -> {:?}", state);
    }
}

impl Counter for ThreadHost {
    fn counter(&self) -> u64 {
        self.counter
    }

    fn inc_counter(&mut self) {
        self.counter += 1;
    }

    fn set_counter(&mut self, value: u64) {
        self.counter = value;
    }
}

impl Settings for ThreadHost {
    fn setting(&self, key: &str) -> Option<&str> {
        self.settings.setting(key)
    }
}

impl MetricSink for ThreadHost {
    fn set_metric(&mut self, index: usize, name: &'static str, value: f64) {
        if index == METRIC_SLOT {
            self.ns_per_call = Some(value);
        }
        log::trace!("metric[{}] {} = {}", index, name, value);
    }
}

/// What a finished worker hands back to the main thread.
#[derive(Debug)]
struct WorkerResult {
    instance: u32,
    outcome: Outcome,
    calls: u64,
    ns_per_call: Option<f64>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let info = trapbench::bench_info();

    if cli.list {
        print_list(&info);
        return ExitCode::SUCCESS;
    }

    let store = SettingStore::new();
    if let Some(func) = &cli.func {
        settings::apply(info.option_setters, &store, FUNC_SETTING, func);
    }

    let outcome = run(&cli, &info, &store);
    log::info!("{}: {}", info.name, outcome);
    ExitCode::from(outcome.exit_code())
}

fn print_list(info: &BenchInfo) {
    let mut table = String::new();
    if help::write_help(&mut table, info.help).is_ok() {
        print!("{}", table);
    }
    println!("functions: {}", Registry::native().names().join(" "));
}

fn run(cli: &Cli, info: &BenchInfo, store: &SettingStore) -> Outcome {
    let Some(worker) = info.worker else {
        log::info!(
            "{}: stressor not implemented, {}",
            info.name,
            info.unimplemented_reason.unwrap_or("unknown reason")
        );
        return Outcome::NotImplemented;
    };

    if let Some(supported) = info.supported {
        if supported(info.name).is_err() {
            return Outcome::NotImplemented;
        }
    }

    let workers = cli.workers.max(1);
    let stop = Arc::new(AtomicBool::new(false));
    let results = Arc::new(ArrayQueue::new(workers as usize));
    let deadline = Instant::now() + Duration::from_secs(cli.timeout);

    let mut handles = Vec::with_capacity(workers as usize);
    for instance in 0..workers {
        let worker_stop = Arc::clone(&stop);
        let worker_results = Arc::clone(&results);
        let snapshot = store.snapshot();
        let name = info.name;
        let max_ops = cli.ops;

        let spawned = thread::Builder::new()
            .name(format!("{}-{}", name, instance))
            .spawn(move || {
                let mut host = ThreadHost::new(worker_stop, max_ops, snapshot);
                let outcome = worker(&WorkerArgs { name, instance }, &mut host);
                let result = WorkerResult {
                    instance,
                    outcome,
                    calls: host.counter,
                    ns_per_call: host.ns_per_call,
                };
                if worker_results.push(result).is_err() {
                    log::warn!("{}: result queue full, instance {} dropped", name, instance);
                }
            });

        match spawned {
            Ok(handle) => handles.push(handle),
            Err(err) => {
                log::error!("{}: failed to spawn worker {}: {}", info.name, instance, err);
                stop.store(true, Ordering::Relaxed);
                break;
            }
        }
    }

    while Instant::now() < deadline && !handles.iter().all(|h| h.is_finished()) {
        thread::sleep(Duration::from_millis(10));
    }
    stop.store(true, Ordering::Relaxed);

    let mut outcome = if handles.len() == workers as usize {
        Outcome::Success
    } else {
        Outcome::Failure
    };
    for handle in handles {
        if handle.join().is_err() {
            log::error!("{}: worker thread panicked", info.name);
            outcome = Outcome::Failure;
        }
    }

    let mut calls = 0;
    let mut samples = Vec::new();
    while let Some(result) = results.pop() {
        log::debug!(
            "{}: instance {} {} after {} calls",
            info.name,
            result.instance,
            result.outcome,
            result.calls
        );
        if result.outcome == Outcome::Failure {
            outcome = Outcome::Failure;
        }
        calls += result.calls;
        samples.extend(result.ns_per_call);
    }

    if !samples.is_empty() {
        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        log::info!(
            "{}: {} calls across {} workers, mean {:.2} nanosecs per call",
            info.name,
            calls,
            samples.len(),
            mean
        );
    }

    outcome
}
