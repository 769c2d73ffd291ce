use crate::Integer;
use crate::pipe::Pipe;
use std::fmt::{Display, Formatter};

/// 数据源的种类，仅用于描述流水线。
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SourceKind {
    /// 字面值序列。
    Of { len: usize },
    /// 任意有限迭代器。
    Iter,
    /// 整数范围，两端包含。
    Range { start: Integer, end: Integer, step: Integer },
    /// `seed, f(seed), f(f(seed)), ...`，无限。
    Iterate,
    /// 每次调用生成函数得到一个值，无限。
    Generate,
    /// 重复同一个值，未指定次数时无限。
    Repeat { count: Option<usize> },
}

impl Display for SourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Of { len } => write!(f, "of[{len}]"),
            SourceKind::Iter => write!(f, "iter"),
            SourceKind::Range { start, end, step } => write!(f, "range({start},{end},{step})"),
            SourceKind::Iterate => write!(f, "iterate"),
            SourceKind::Generate => write!(f, "generate"),
            SourceKind::Repeat { count: Some(count) } => write!(f, "repeat({count})"),
            SourceKind::Repeat { count: None } => write!(f, "repeat"),
        }
    }
}

/// 流水线的数据源，有序，按需逐个产生元素。
pub struct Source<'a, T> {
    pub(crate) kind: SourceKind,
    pub(crate) iter: Box<dyn Iterator<Item = T> + 'a>,
    pub(crate) bounded: bool,
}

impl<'a, T: 'a> Source<'a, T> {
    pub fn of(values: Vec<T>) -> Source<'a, T> {
        Source { kind: SourceKind::Of { len: values.len() }, iter: Box::new(values.into_iter()), bounded: true }
    }

    /// 调用方需保证迭代器有限，无限迭代器使用[`Source::from_unbounded_iter`]。
    pub fn from_iter(iter: impl IntoIterator<Item = T> + 'a) -> Source<'a, T> {
        Source { kind: SourceKind::Iter, iter: Box::new(iter.into_iter()), bounded: true }
    }

    /// 可能无限的迭代器，终结操作前需要`limit`截断。
    pub fn from_unbounded_iter(iter: impl IntoIterator<Item = T> + 'a) -> Source<'a, T> {
        Source { kind: SourceKind::Iter, iter: Box::new(iter.into_iter()), bounded: false }
    }

    /// 无限序列：`seed, next(&seed), next(&next(&seed)), ...`
    pub fn iterate(seed: T, mut next: impl FnMut(&T) -> T + 'a) -> Source<'a, T> {
        Source {
            kind: SourceKind::Iterate,
            iter: Box::new(std::iter::successors(Some(seed), move |prev| Some(next(prev)))),
            bounded: false,
        }
    }

    /// 无限序列，每个元素由`f`按需生成。
    pub fn generate(f: impl FnMut() -> T + 'a) -> Source<'a, T> {
        Source { kind: SourceKind::Generate, iter: Box::new(std::iter::repeat_with(f)), bounded: false }
    }

    pub fn repeat(value: T, count: Option<usize>) -> Source<'a, T>
    where
        T: Clone,
    {
        match count {
            Some(count) => Source {
                kind: SourceKind::Repeat { count: Some(count) },
                iter: Box::new(std::iter::repeat_n(value, count)),
                bounded: true,
            },
            None => {
                Source { kind: SourceKind::Repeat { count: None }, iter: Box::new(std::iter::repeat(value)), bounded: false }
            }
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.bounded
    }

    pub fn pipe(self) -> Pipe<'a, T> {
        Pipe::new(self)
    }
}

impl Source<'static, Integer> {
    /// 生成`[start, end]`内的整数。
    ///
    /// * 步长为正时正序生成，为负时从`end`开始逆序生成，步长绝对值为间隔。
    /// * `start > end`时无数据。
    /// * 步长为0时无限重复`start`。
    pub fn range(start: Integer, end: Integer, step: Integer) -> Source<'static, Integer> {
        Source {
            kind: SourceKind::Range { start, end, step },
            iter: range_to_iter(start, end, step),
            bounded: step != 0 || start > end,
        }
    }

    pub fn range_closed(start: Integer, end: Integer) -> Source<'static, Integer> {
        Source::range(start, end, 1)
    }
}

fn range_to_iter(start: Integer, end: Integer, step: Integer) -> Box<dyn Iterator<Item = Integer>> {
    let iter = RangeIter { start, end, step: step.saturating_abs(), next: Some(start), next_back: Some(end) };
    if step < 0 { Box::new(iter.rev()) } else { Box::new(iter) }
}

/// 两端包含的整数范围，溢出时结束。
#[derive(Debug, Eq, PartialEq)]
struct RangeIter {
    start: Integer,
    end: Integer,
    step: Integer,
    next: Option<Integer>,
    next_back: Option<Integer>,
}

impl Iterator for RangeIter {
    type Item = Integer;

    fn next(&mut self) -> Option<Self::Item> {
        match (self.next, self.next_back) {
            (Some(next), Some(back)) if next >= self.start && next <= self.end && next <= back => {
                self.next = next.checked_add(self.step);
                Some(next)
            }
            _ => None,
        }
    }
}

impl DoubleEndedIterator for RangeIter {
    fn next_back(&mut self) -> Option<Self::Item> {
        match (self.next, self.next_back) {
            (Some(next), Some(back)) if back >= self.start && back <= self.end && back >= next => {
                self.next_back = back.checked_sub(self.step);
                Some(back)
            }
            _ => None,
        }
    }
}
