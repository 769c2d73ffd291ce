mod stage;
mod terminal;

use crate::err::LpErr;
use crate::pipe::stage::{Chain, Stage};
use crate::source::Source;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::hash::Hash;

pub type PipeRes<'a, T> = Result<Pipe<'a, T>, LpErr>;

/// 惰性流水线。
///
/// 中间操作只记录步骤，不会触碰数据源；终结操作驱动数据源，逐个元素地经过全部步骤，
/// 并将流水线标记为已消费。对已消费的流水线执行任何操作都会返回[`LpErr::Consumed`]。
///
/// ```
/// use lazypipe::source::Source;
///
/// let upper = Source::of(vec!["A1", "C3", "B1", "C1"])
///     .pipe()
///     .filter(|s| s.starts_with('C'))?
///     .map_to(str::to_lowercase)?
///     .collect::<Vec<_>>()?;
/// assert_eq!(upper, vec!["c3", "c1"]);
/// # Ok::<(), lazypipe::err::LpErr>(())
/// ```
pub struct Pipe<'a, T> {
    /// 已封存部分的描述，包括数据源。
    head: String,
    state: PipeState<'a, T>,
    bounded: bool,
}

enum PipeState<'a, T> {
    Ready(Chain<'a, T>),
    Consumed,
}

impl<'a, T: 'a> Pipe<'a, T> {
    pub fn new(source: Source<'a, T>) -> Pipe<'a, T> {
        Pipe {
            head: source.kind.to_string(),
            state: PipeState::Ready(Chain { source: source.iter, stages: Vec::new() }),
            bounded: source.bounded,
        }
    }

    fn from_iter(head: String, iter: Box<dyn Iterator<Item = T> + 'a>, bounded: bool) -> Pipe<'a, T> {
        Pipe { head, state: PipeState::Ready(Chain { source: iter, stages: Vec::new() }), bounded }
    }

    /// 终结操作是否能在有限步内耗尽数据源。
    pub fn is_bounded(&self) -> bool {
        self.bounded
    }

    pub fn is_consumed(&self) -> bool {
        matches!(self.state, PipeState::Consumed)
    }

    /// 形如`of[5] -> filter -> map_to -> limit(3)`的结构描述。
    pub fn describe(&self) -> String {
        match &self.state {
            PipeState::Ready(chain) => {
                std::iter::once(self.head.clone()).chain(chain.stages.iter().map(ToString::to_string)).join(" -> ")
            }
            PipeState::Consumed => format!("{} (consumed)", self.head),
        }
    }

    fn push(mut self, stage: Stage<'a, T>) -> PipeRes<'a, T> {
        match &mut self.state {
            PipeState::Ready(chain) => {
                chain.stages.push(stage);
                Ok(self)
            }
            PipeState::Consumed => Err(LpErr::Consumed),
        }
    }

    /// 取出当前的驱动链，后续步骤以它作为新的数据源。
    fn seal(self, label: &str) -> Result<(Chain<'a, T>, String, bool), LpErr> {
        let head = format!("{} -> {label}", self.describe());
        match self.state {
            PipeState::Ready(chain) => Ok((chain, head, self.bounded)),
            PipeState::Consumed => Err(LpErr::Consumed),
        }
    }

    /// 只保留满足`predicate`的元素。
    pub fn filter(self, predicate: impl FnMut(&T) -> bool + 'a) -> PipeRes<'a, T> {
        self.push(Stage::Filter(Box::new(predicate)))
    }

    /// 同类型转换。
    pub fn map(self, f: impl FnMut(T) -> T + 'a) -> PipeRes<'a, T> {
        self.push(Stage::Map(Box::new(f)))
    }

    /// 观察经过的元素，不改变元素。
    pub fn inspect(self, f: impl FnMut(&T) + 'a) -> PipeRes<'a, T> {
        self.push(Stage::Inspect(Box::new(f)))
    }

    pub fn skip(self, n: usize) -> PipeRes<'a, T> {
        self.push(Stage::Skip(n))
    }

    /// 最多放行`n`个元素，之后不再从数据源拉取，可以截断无限数据源。
    pub fn limit(self, n: usize) -> PipeRes<'a, T> {
        let mut pipe = self.push(Stage::Limit(n))?;
        pipe.bounded = true;
        Ok(pipe)
    }

    /// 去重，保留首次出现的元素。
    pub fn distinct(self) -> PipeRes<'a, T>
    where
        T: Hash + Eq + Clone,
    {
        let mut seen = FxHashSet::default();
        self.filter(move |item| seen.insert(item.clone()))
    }

    /// 改变元素类型的转换，此前的步骤被封存为新流水线的数据源，求值仍然逐个元素进行。
    pub fn map_to<U: 'a>(self, f: impl FnMut(T) -> U + 'a) -> PipeRes<'a, U> {
        let (chain, head, bounded) = self.seal("map_to")?;
        Ok(Pipe::from_iter(head, Box::new(chain.map(f)), bounded))
    }

    /// 可能失败的转换，失败时以`fallback`代替，不中断流水线。
    pub fn map_or<U, E>(self, fallback: U, mut f: impl FnMut(T) -> Result<U, E> + 'a) -> PipeRes<'a, U>
    where
        U: Clone + 'a,
    {
        self.map_to(move |item| f(item).unwrap_or_else(|_| fallback.clone()))
    }

    pub fn sorted(self) -> PipeRes<'a, T>
    where
        T: Ord,
    {
        self.barrier("sorted", |chain| Box::new(chain.sorted()))
    }

    pub fn sorted_by(self, cmp: impl FnMut(&T, &T) -> Ordering + 'a) -> PipeRes<'a, T> {
        self.barrier("sorted_by", move |chain| Box::new(chain.sorted_by(cmp)))
    }

    pub fn sorted_by_key<K: Ord>(self, f: impl FnMut(&T) -> K + 'a) -> PipeRes<'a, T> {
        self.barrier("sorted_by_key", move |chain| Box::new(chain.sorted_by_key(f)))
    }

    /// 按浮点数键排序，`NaN`排在最后。
    pub fn sorted_by_float_key(self, mut f: impl FnMut(&T) -> f64 + 'a) -> PipeRes<'a, T> {
        self.barrier("sorted_by_float_key", move |chain| Box::new(chain.sorted_by_key(move |item| OrderedFloat(f(item)))))
    }

    /// 有状态步骤：首次拉取时才耗尽上游，数据源必须有限。
    fn barrier<F>(self, label: &'static str, f: F) -> PipeRes<'a, T>
    where
        F: FnOnce(Chain<'a, T>) -> Box<dyn Iterator<Item = T> + 'a> + 'a,
    {
        if !self.is_consumed() && !self.bounded {
            return Err(LpErr::Unbounded { op: label });
        }
        let (chain, head, bounded) = self.seal(label)?;
        Ok(Pipe::from_iter(head, Box::new(std::iter::once_with(move || f(chain)).flatten()), bounded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Integer;
    use std::cell::Cell;

    #[test]
    fn test_intermediate_ops_are_lazy() {
        let calls = Cell::new(0);
        let pipe = Source::of(vec![1, 2, 3])
            .pipe()
            .inspect(|_| calls.set(calls.get() + 1))
            .unwrap()
            .filter(|_| {
                calls.set(calls.get() + 1);
                true
            })
            .unwrap()
            .map_to(|x| {
                calls.set(calls.get() + 1);
                x * 2
            })
            .unwrap()
            .sorted()
            .unwrap();
        assert_eq!(calls.get(), 0);
        drop(pipe);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_describe() {
        let pipe = Source::of(vec!["a", "b"])
            .pipe()
            .filter(|s| !s.is_empty())
            .unwrap()
            .map_to(str::len)
            .unwrap()
            .limit(1)
            .unwrap();
        assert_eq!(pipe.describe(), "of[2] -> filter -> map_to -> limit(1)");
        let pipe = Source::range_closed(1, 5).pipe().skip(1).unwrap().sorted().unwrap().inspect(|_| ()).unwrap();
        assert_eq!(pipe.describe(), "range(1,5,1) -> skip(1) -> sorted -> inspect");
    }

    #[test]
    fn test_limit_bounds_unbounded_source() {
        let pipe = Source::iterate(0, |i| i + 2).pipe();
        assert!(!pipe.is_bounded());
        let pipe = pipe.filter(|i| i % 3 != 0).unwrap();
        assert!(!pipe.is_bounded());
        let pipe = pipe.limit(3).unwrap().map_to(|i| i.to_string()).unwrap();
        assert!(pipe.is_bounded());
    }

    #[test]
    fn test_sorted_requires_bounded() {
        let res = Source::iterate(0, |i| i + 1).pipe().sorted();
        assert!(matches!(res, Err(LpErr::Unbounded { op: "sorted" })));
        let sorted = Source::iterate(10, |i| i - 1).pipe().limit(4).unwrap().sorted().unwrap().collect::<Vec<_>>();
        assert_eq!(sorted.unwrap(), vec![7, 8, 9, 10]);
    }

    #[test]
    fn test_sorted_variants() {
        let words = || Source::of(vec!["pear", "fig", "banana", "kiwi"]).pipe();
        assert_eq!(words().sorted().unwrap().collect::<Vec<_>>().unwrap(), vec!["banana", "fig", "kiwi", "pear"]);
        assert_eq!(words().sorted_by_key(|s| s.len()).unwrap().collect::<Vec<_>>().unwrap(), vec![
            "fig", "pear", "kiwi", "banana"
        ]);
        assert_eq!(words().sorted_by(|l, r| r.cmp(l)).unwrap().collect::<Vec<_>>().unwrap(), vec![
            "pear", "kiwi", "fig", "banana"
        ]);
        let nums = Source::of(vec!["2.5", "x", "-1", "10"])
            .pipe()
            .sorted_by_float_key(|s| s.parse().unwrap_or(f64::MAX))
            .unwrap()
            .collect::<Vec<_>>()
            .unwrap();
        assert_eq!(nums, vec!["-1", "2.5", "10", "x"]);
    }

    #[test]
    fn test_distinct_keeps_first_occurrence() {
        let out = Source::of(vec!["b", "a", "b", "c", "a"]).pipe().distinct().unwrap().collect::<Vec<_>>().unwrap();
        assert_eq!(out, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_map_or_fallback() {
        const FALLBACK: Integer = -1;
        let out = Source::of(vec!["1", "2", "3", "hey"])
            .pipe()
            .map_or(FALLBACK, |s| s.parse::<Integer>())
            .unwrap()
            .collect::<Vec<_>>()
            .unwrap();
        assert_eq!(out, vec![1, 2, 3, -1]);
    }

    #[test]
    fn test_operations_after_consumed() {
        let mut pipe = Source::of(vec![1, 2, 3]).pipe();
        assert_eq!(pipe.count(), Ok(3));
        assert!(pipe.is_consumed());
        assert_eq!(pipe.describe(), "of[3] (consumed)");
        assert_eq!(pipe.count(), Err(LpErr::Consumed));
        assert_eq!(pipe.find_first(), Err(LpErr::Consumed));
        assert!(matches!(Pipe::map(pipe, |x| x), Err(LpErr::Consumed)));

        let mut pipe = Source::of(vec![1, 2, 3]).pipe();
        pipe.for_each(drop).unwrap();
        assert!(matches!(pipe.filter(|_| true), Err(LpErr::Consumed)));

        let mut pipe = Source::of(vec![1, 2, 3]).pipe();
        pipe.find_first().unwrap();
        assert!(matches!(pipe.map_to(|x| x.to_string()), Err(LpErr::Consumed)));

        let mut pipe = Source::of(vec![3, 1]).pipe();
        pipe.collect::<Vec<_>>().unwrap();
        assert!(matches!(pipe.sorted(), Err(LpErr::Consumed)));

        let mut pipe = Source::iterate(0, |i| i + 1).pipe();
        pipe.find_first().unwrap();
        assert!(matches!(pipe.sorted(), Err(LpErr::Consumed)));
        let mut pipe = Source::of(vec![1]).pipe();
        pipe.find_first().unwrap();
        assert!(matches!(pipe.limit(1), Err(LpErr::Consumed)));
    }
}
