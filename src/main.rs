// SPDX-License-Identifier: MPL-2.0
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Local;
use ciclomappa::config::{self, Config};
use ciclomappa::diagnostics::{self, DiagnosticsCollector};
use ciclomappa::domain::ToastDuration;
use ciclomappa::error::{Error, Result};
use ciclomappa::notifications::{Category, Notification, ToastQueue};
use ciclomappa::platform::{self, FixedBridge};
use tokio::sync::watch;

const HELP: &str = "\
Show toast notifications and print the queue every time it changes.

USAGE:
  ciclomappa [OPTIONS] MESSAGE...

OPTIONS:
  --category TAG       Category of every message (info, success, warning, error, ...)
  --duration MS        Lifetime of every message in milliseconds
  --config PATH        Read settings from PATH instead of the user config directory
  --platform NAME      Report NAME instead of querying the native bridge
  --diagnostics PATH   Write a JSON diagnostics report to PATH on exit
                       (a directory gets a timestamped file inside it)
  --save-diagnostics   Write the report to the Documents folder on exit
  -h, --help           Print this help
";

struct Flags {
    category: Option<String>,
    duration_ms: Option<u64>,
    config_path: Option<PathBuf>,
    platform: Option<String>,
    diagnostics_path: Option<PathBuf>,
    save_diagnostics: bool,
    messages: Vec<String>,
}

fn parse_flags() -> std::result::Result<Option<Flags>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }

    let save_diagnostics = args.contains("--save-diagnostics");
    let flags = Flags {
        category: args.opt_value_from_str("--category")?,
        duration_ms: args.opt_value_from_str("--duration")?,
        config_path: args.opt_value_from_os_str("--config", |s| {
            Ok::<_, std::convert::Infallible>(PathBuf::from(s))
        })?,
        platform: args.opt_value_from_str("--platform")?,
        diagnostics_path: args.opt_value_from_os_str("--diagnostics", |s| {
            Ok::<_, std::convert::Infallible>(PathBuf::from(s))
        })?,
        save_diagnostics,
        messages: args
            .finish()
            .into_iter()
            .map(OsString::into_string)
            .collect::<std::result::Result<_, _>>()
            .map_err(|_| pico_args::Error::NonUtf8Argument)?,
    };

    Ok(Some(flags))
}

fn load_config(flags: &Flags) -> Result<Config> {
    match &flags.config_path {
        Some(path) => config::load_from_path(path),
        None => config::load(),
    }
}

fn render(toasts: &[Notification]) -> String {
    if toasts.is_empty() {
        return "(empty)".to_string();
    }
    toasts
        .iter()
        .map(|toast| format!("{} [{}] {}", toast.id(), toast.category(), toast.message()))
        .collect::<Vec<_>>()
        .join(" | ")
}

async fn run(flags: Flags) -> Result<()> {
    let config = load_config(&flags)?;
    let mut collector = DiagnosticsCollector::new(config.diagnostics_capacity());

    let platform_override = flags
        .platform
        .as_deref()
        .or_else(|| config.platform_override());
    let detected = match platform_override {
        Some(name) => platform::query(&FixedBridge::new(name)),
        None => platform::detect(),
    };
    detected.log(&collector.handle());
    match &detected {
        platform::PlatformQuery::Reported(name) => println!("platform: {name}"),
        platform::PlatformQuery::Fallback(err) => {
            println!("platform: {} ({err})", detected.name());
        }
    }

    let queue = ToastQueue::from_config(&config)?;
    queue.set_diagnostics(collector.handle());
    if let Some(ms) = flags.duration_ms {
        queue.set_default_duration(ToastDuration::from_millis(ms));
    }

    let (remaining_tx, mut remaining_rx) = watch::channel(0usize);
    let subscription = queue.subscribe(move |toasts| {
        println!("{} {}", Local::now().format("%H:%M:%S%.3f"), render(toasts));
        remaining_tx.send_replace(toasts.len());
    });

    let category = flags
        .category
        .as_deref()
        .map_or_else(Category::default, Category::from);
    for message in flags.messages {
        queue.enqueue_as(message, category.clone());
    }

    // Drain on every change so the channel never fills up behind a long run.
    loop {
        collector.process_pending();
        if *remaining_rx.borrow_and_update() == 0 {
            break;
        }
        remaining_rx
            .changed()
            .await
            .map_err(|err| Error::Runtime(err.to_string()))?;
    }
    subscription.unsubscribe();

    collector.process_pending();
    if flags.save_diagnostics || flags.diagnostics_path.is_some() {
        let path = diagnostics::resolve_export_path(flags.diagnostics_path.as_deref());
        let written = collector.export_to_file(path)?;
        println!("diagnostics written to {}", written.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    let flags = match parse_flags() {
        Ok(Some(flags)) => flags,
        Ok(None) => {
            print!("{HELP}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("Error: {err}");
            eprint!("{HELP}");
            return ExitCode::FAILURE;
        }
    };

    if flags.messages.is_empty() {
        eprint!("{HELP}");
        return ExitCode::FAILURE;
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("Failed to start runtime: {err}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(flags)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
