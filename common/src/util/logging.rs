use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::{info, warn, LevelFilter};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

static MULTI: OnceLock<MultiProgress> = OnceLock::new();

pub fn initialize_logging(log_level: LevelFilter) {
    let logger = env_logger::builder()
        .filter_level(log_level)
        .parse_default_env() // Allow overriding log level through RUST_LOG env var
        .build();

    let multi = MultiProgress::new();

    let wrapper = LogWrapper::new(multi.clone(), logger);
    if let Err(err) = wrapper.try_init() {
        warn!(target: "main", "Logging was already initialized: {err}");
        return;
    }

    // try_init only succeeds once, so MULTI is still empty here
    let _ = MULTI.set(multi);
}

/// Registers the bar with the global MultiProgress so that log lines and bars don't interleave.
/// Without initialized logging (library use, tests) the bar is hidden.
fn attach(pb: ProgressBar) -> ProgressBar {
    match MULTI.get() {
        Some(multi) => multi.add(pb),
        None => {
            pb.set_draw_target(ProgressDrawTarget::hidden());
            pb
        }
    }
}

fn detach(pb: &ProgressBar) {
    pb.finish_and_clear();
    if let Some(multi) = MULTI.get() {
        multi.remove(pb);
    }
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.white} [{elapsed:.green}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("[{elapsed:.green}] {msg} [{wide_bar:.cyan/blue}] {human_pos}/{human_len} [{eta}]")
        .map(|style| style.progress_chars("=> "))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

pub fn run_with_spinner<'a, F, Out>(
    target: &'a str, task_desc: &'a str, function: F,
) -> Out where
    F: FnOnce() -> Out,
{
    let start_time = Instant::now();

    let pb = attach(
        ProgressBar::new_spinner()
            .with_message(format!("{}...", task_desc))
            .with_style(spinner_style())
    );
    pb.enable_steady_tick(Duration::from_millis(100));

    let out = function();

    detach(&pb);
    let elapsed = indicatif::HumanDuration(start_time.elapsed());
    info!(target: target, "{} finished (took {})", task_desc, elapsed);

    out
}

pub fn run_with_pb<'a, F, Out>(
    target: &'a str, task_desc: &'a str, total: u64, function: F,
) -> Out where
    F: FnOnce(ProgressBar) -> Out,
{
    let start_time = Instant::now();

    let pb = attach(
        ProgressBar::new(total)
            .with_message(format!("{}...", task_desc))
            .with_style(bar_style())
    );
    pb.enable_steady_tick(Duration::from_secs(1));

    let out = function(pb.clone());

    detach(&pb);
    let elapsed = indicatif::HumanDuration(start_time.elapsed());
    info!(target: target, "{} finished (took {})", task_desc, elapsed);

    out
}
