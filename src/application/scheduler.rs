//! Concurrent Task Scheduler - 有界并发任务调度
//!
//! 以固定上限的 worker 数执行相互独立的任务，结果按输入顺序返回

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use tokio::task::{JoinError, JoinSet};

/// 默认最大并发数
pub const DEFAULT_MAX_WORKERS: usize = 16;

/// 有界任务调度器
///
/// - `max_workers == 1` 时严格按输入顺序逐个执行（同一代码路径，池大小为 1）
/// - 任一任务失败立即返回该错误，其余任务随 `JoinSet` 一起被中止
/// - 调度器自身不重试，重试属于任务本身
#[derive(Debug, Clone, Copy)]
pub struct TaskScheduler {
    max_workers: usize,
}

impl Default for TaskScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WORKERS)
    }
}

impl TaskScheduler {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// 执行全部任务
    ///
    /// 返回值与输入一一对应、顺序一致，与完成顺序无关。
    /// 返回的 future 被丢弃时，所有进行中的任务被中止。
    pub async fn run_all<K, I, O, E, F, Fut>(
        &self,
        tasks: Vec<(K, I)>,
        worker: F,
    ) -> Result<Vec<(K, O)>, E>
    where
        I: Send + 'static,
        O: Send + 'static,
        E: From<JoinError> + Send + 'static,
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, E>> + Send + 'static,
    {
        let total = tasks.len();
        let worker = Arc::new(worker);
        let mut keys = Vec::with_capacity(total);
        let mut outputs: BTreeMap<usize, O> = BTreeMap::new();
        let mut join_set: JoinSet<(usize, Result<O, E>)> = JoinSet::new();

        tracing::debug!(
            tasks = total,
            max_workers = self.max_workers,
            "Scheduling tasks"
        );

        for (index, (key, input)) in tasks.into_iter().enumerate() {
            keys.push(key);

            // 池满时先等待一个任务完成
            while join_set.len() >= self.max_workers {
                if let Some(joined) = join_set.join_next().await {
                    Self::record(joined, &mut outputs)?;
                }
            }

            let worker = worker.clone();
            join_set.spawn(async move { (index, worker(input).await) });
        }

        while let Some(joined) = join_set.join_next().await {
            Self::record(joined, &mut outputs)?;
        }

        tracing::debug!(tasks = total, "All tasks completed");

        Ok(keys.into_iter().zip(outputs.into_values()).collect())
    }

    fn record<O, E>(
        joined: Result<(usize, Result<O, E>), JoinError>,
        outputs: &mut BTreeMap<usize, O>,
    ) -> Result<(), E>
    where
        E: From<JoinError>,
    {
        let (index, result) = joined?;
        let output = result?;
        outputs.insert(index, output);
        Ok(())
    }
}
