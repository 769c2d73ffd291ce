//! 独立的工作单元：无参数、无返回值的动作，可以就地执行或交给单独的工作线程。

use crate::err::LpErr;
use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

static WORKER_ID: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RunMode {
    /// 在调用方线程上直接执行。
    Inline,
    /// 在新的工作线程上执行，并等待其结束。
    Worker,
}

pub fn submit(mode: RunMode, action: impl FnOnce() + Send + 'static) -> Result<(), LpErr> {
    match mode {
        RunMode::Inline => {
            run_inline(action);
            Ok(())
        }
        RunMode::Worker => run_on_worker(action),
    }
}

#[inline]
pub fn run_inline(action: impl FnOnce()) {
    action()
}

/// 工作线程中的panic不会传播，转为[`LpErr::WorkerPanicked`]。
pub fn run_on_worker(action: impl FnOnce() + Send + 'static) -> Result<(), LpErr> {
    let id = WORKER_ID.fetch_add(1, Ordering::Relaxed);
    let handle = thread::Builder::new()
        .name(format!("lp-worker-{id}"))
        .spawn(action)
        .map_err(|err| LpErr::SpawnWorkerErr(err.to_string()))?;
    handle.join().map_err(|payload| LpErr::WorkerPanicked(panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_run_inline_on_caller_thread() {
        let caller = thread::current().id();
        let mut ran_on = None;
        run_inline(|| ran_on = Some(thread::current().id()));
        assert_eq!(ran_on, Some(caller));
    }

    #[test]
    fn test_run_on_worker() {
        let (tx, rx) = mpsc::channel();
        submit(RunMode::Worker, move || {
            tx.send(thread::current().name().map(str::to_string)).unwrap();
        })
        .unwrap();
        let name = rx.recv().unwrap().unwrap();
        assert!(name.starts_with("lp-worker-"));
    }

    #[test]
    fn test_tasks_in_submit_order() {
        let (tx, rx) = mpsc::channel();
        let tasks: Vec<Task> = (1..=3)
            .map(|i| {
                let tx = tx.clone();
                Box::new(move || tx.send(format!("RUN: {i}")).unwrap()) as Task
            })
            .collect();
        for (i, task) in tasks.into_iter().enumerate() {
            let mode = if i % 2 == 0 { RunMode::Inline } else { RunMode::Worker };
            submit(mode, task).unwrap();
        }
        drop(tx);
        assert_eq!(rx.iter().collect::<Vec<_>>(), vec!["RUN: 1", "RUN: 2", "RUN: 3"]);
    }

    #[test]
    fn test_worker_panic() {
        assert_eq!(run_on_worker(|| panic!("boom")), Err(LpErr::WorkerPanicked("boom".to_string())));
        let code = 7;
        assert_eq!(
            run_on_worker(move || panic!("code {code}")),
            Err(LpErr::WorkerPanicked("code 7".to_string()))
        );
    }

    #[test]
    fn test_release_profile_unwinds() {
        // abort策略下join无法拿到panic
        let manifest = include_str!("../Cargo.toml");
        assert!(!manifest.lines().any(|line| line.trim_start().starts_with("panic") && line.contains("abort")));
    }
}
