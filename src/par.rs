//! 并行求值模式。
//!
//! 数据被划分到rayon的工作线程上，每个元素仍然按声明顺序经过全部步骤，
//! 但`for_each`不再保证遇到顺序。分组、计数、求平均等满足结合律的聚合结果与顺序无关。

use crate::Float;
use crate::err::LpErr;
use crate::pipe::Pipe;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::iter::Sum;
use std::sync::Arc;

enum ParStage<T> {
    Filter(Arc<dyn Fn(&T) -> bool + Send + Sync>),
    Map(Arc<dyn Fn(T) -> T + Send + Sync>),
}

type Prefix<'a, T> = Box<dyn FnOnce() -> Result<Vec<T>, LpErr> + 'a>;

/// 并行流水线，与[`Pipe`]一样只能被一个终结操作消费。
///
/// 数据在终结操作开始时才产生，顺序部分的步骤也在那时才执行。
pub struct ParPipe<'a, T> {
    prefix: Option<Prefix<'a, T>>,
    stages: Vec<ParStage<T>>,
}

impl<'a, T: Send + Sync + 'a> Pipe<'a, T> {
    /// 已有的步骤在终结操作开始时顺序求值，之后的步骤并行执行。
    pub fn parallel(mut self) -> Result<ParPipe<'a, T>, LpErr> {
        if self.is_consumed() {
            return Err(LpErr::Consumed);
        }
        if !self.is_bounded() {
            return Err(LpErr::Unbounded { op: "parallel" });
        }
        Ok(ParPipe { prefix: Some(Box::new(move || self.collect())), stages: Vec::new() })
    }
}

impl<'a, T: Send + Sync + 'a> ParPipe<'a, T> {
    pub fn of(items: Vec<T>) -> ParPipe<'a, T> {
        ParPipe { prefix: Some(Box::new(move || Ok(items))), stages: Vec::new() }
    }

    pub fn is_consumed(&self) -> bool {
        self.prefix.is_none()
    }

    fn push(mut self, stage: ParStage<T>) -> Result<ParPipe<'a, T>, LpErr> {
        if self.is_consumed() {
            return Err(LpErr::Consumed);
        }
        self.stages.push(stage);
        Ok(self)
    }

    pub fn filter(self, predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Result<ParPipe<'a, T>, LpErr> {
        self.push(ParStage::Filter(Arc::new(predicate)))
    }

    pub fn map(self, f: impl Fn(T) -> T + Send + Sync + 'static) -> Result<ParPipe<'a, T>, LpErr> {
        self.push(ParStage::Map(Arc::new(f)))
    }

    fn survivors(&mut self) -> Result<impl ParallelIterator<Item = T>, LpErr> {
        let prefix = self.prefix.take().ok_or(LpErr::Consumed)?;
        let items = prefix()?;
        let stages = std::mem::take(&mut self.stages);
        Ok(items.into_par_iter().filter_map(move |item| apply(&stages, item)))
    }

    /// 不保证执行顺序。
    pub fn for_each(&mut self, action: impl Fn(T) + Send + Sync) -> Result<(), LpErr> {
        self.survivors()?.for_each(action);
        Ok(())
    }

    /// 结果保持数据源顺序。
    pub fn collect_vec(&mut self) -> Result<Vec<T>, LpErr> {
        Ok(self.survivors()?.collect())
    }

    pub fn count(&mut self) -> Result<usize, LpErr> {
        Ok(self.survivors()?.count())
    }

    pub fn sum<S: Sum<T> + Sum<S> + Send>(&mut self) -> Result<S, LpErr> {
        Ok(self.survivors()?.sum())
    }

    pub fn average_by(&mut self, f: impl Fn(&T) -> Float + Send + Sync) -> Result<Option<Float>, LpErr> {
        let (sum, count) = self
            .survivors()?
            .map(|item| (f(&item), 1usize))
            .reduce(|| (0.0, 0), |(l_sum, l_count), (r_sum, r_count)| (l_sum + r_sum, l_count + r_count));
        Ok(if count == 0 { None } else { Some(sum / count as Float) })
    }

    /// 每个工作线程先局部分组，再合并各自的结果。
    pub fn group_by<K>(&mut self, key: impl Fn(&T) -> K + Send + Sync) -> Result<FxHashMap<K, Vec<T>>, LpErr>
    where
        K: Hash + Eq + Send,
    {
        Ok(self
            .survivors()?
            .fold(FxHashMap::default, |mut groups: FxHashMap<K, Vec<T>>, item| {
                groups.entry(key(&item)).or_default().push(item);
                groups
            })
            .reduce(FxHashMap::default, |mut left, right| {
                for (k, mut group) in right {
                    left.entry(k).or_default().append(&mut group);
                }
                left
            }))
    }
}

fn apply<T>(stages: &[ParStage<T>], mut item: T) -> Option<T> {
    for stage in stages {
        match stage {
            ParStage::Filter(predicate) => {
                if !predicate(&item) {
                    return None;
                }
            }
            ParStage::Map(f) => item = f(item),
        }
    }
    Some(item)
}
