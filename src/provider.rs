use std::sync::mpsc::{Receiver, Sender};
use std::thread;

use crate::loader::{Apis, LoadOptions, load_command_center, load_overview};
use crate::state::{Delta, ProviderCommand};

/// Background worker: receives load commands, runs the loaders on a rayon
/// pool and reports back with deltas tagged by the command's generation.
/// Exits when the command channel closes.
pub fn spawn_provider(
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
    apis: Apis,
    opts: LoadOptions,
    parallelism: usize,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let pool = build_fetch_pool(parallelism);
        while let Ok(cmd) = cmd_rx.recv() {
            let tx = tx.clone();
            let apis = apis.clone();
            let job = move || run_command(&apis, &opts, cmd, &tx);
            match pool.as_ref() {
                Some(pool) => pool.spawn(job),
                None => {
                    thread::spawn(job);
                }
            }
        }
    })
}

/// Runs one command to completion on the calling thread.
pub fn run_command(apis: &Apis, opts: &LoadOptions, cmd: ProviderCommand, tx: &Sender<Delta>) {
    match cmd {
        ProviderCommand::LoadOverview {
            team_id,
            target,
            generation,
        } => {
            let delta = match load_overview(apis, team_id, target, opts) {
                Ok(data) => Delta::OverviewLoaded {
                    generation,
                    data: Box::new(data),
                },
                Err(err) => Delta::OverviewFailed {
                    generation,
                    message: format!("{err:#}"),
                },
            };
            let _ = tx.send(delta);
        }
        ProviderCommand::LoadCommandCenter {
            team_id,
            generation,
        } => {
            let delta = match load_command_center(apis, team_id, opts) {
                Ok(data) => Delta::CommandCenterLoaded {
                    generation,
                    data: Box::new(data),
                },
                Err(err) => Delta::CommandCenterFailed {
                    generation,
                    message: format!("{err:#}"),
                },
            };
            let _ = tx.send(delta);
        }
    }
}

fn build_fetch_pool(threads: usize) -> Option<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads.max(1))
        .build()
        .ok()
}
