use std::fmt::{Display, Formatter};

/// 流水线中的一个延迟步骤。
///
/// 除了`Skip`和`Limit`的计数器外，步骤本身不持有数据。
pub(crate) enum Stage<'a, T> {
    Filter(Box<dyn FnMut(&T) -> bool + 'a>),
    Map(Box<dyn FnMut(T) -> T + 'a>),
    Inspect(Box<dyn FnMut(&T) + 'a>),
    /// 剩余需要丢弃的数量。
    Skip(usize),
    /// 剩余允许通过的数量。
    Limit(usize),
}

impl<T> Stage<'_, T> {
    /// 不会再有元素通过此步骤。
    fn is_closed(&self) -> bool {
        matches!(self, Stage::Limit(0))
    }
}

impl<T> Display for Stage<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Filter(_) => write!(f, "filter"),
            Stage::Map(_) => write!(f, "map"),
            Stage::Inspect(_) => write!(f, "inspect"),
            Stage::Skip(n) => write!(f, "skip({n})"),
            Stage::Limit(n) => write!(f, "limit({n})"),
        }
    }
}

/// 驱动数据源逐个元素地经过全部步骤。
///
/// 每次只从数据源拉取一个元素，该元素走完所有步骤（或在某个步骤被丢弃）后才拉取下一个。
pub(crate) struct Chain<'a, T> {
    pub(crate) source: Box<dyn Iterator<Item = T> + 'a>,
    pub(crate) stages: Vec<Stage<'a, T>>,
}

impl<T> Iterator for Chain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        'pull: loop {
            // 任一limit已耗尽时不再拉取数据源，无限数据源依赖于此终止
            if self.stages.iter().any(|stage| stage.is_closed()) {
                return None;
            }
            let mut item = self.source.next()?;
            for stage in self.stages.iter_mut() {
                match stage {
                    Stage::Filter(predicate) => {
                        if !predicate(&item) {
                            continue 'pull;
                        }
                    }
                    Stage::Map(f) => item = f(item),
                    Stage::Inspect(f) => f(&item),
                    Stage::Skip(remaining) => {
                        if *remaining > 0 {
                            *remaining -= 1;
                            continue 'pull;
                        }
                    }
                    Stage::Limit(remaining) => *remaining -= 1,
                }
            }
            return Some(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn chain<'a>(values: Vec<i32>, stages: Vec<Stage<'a, i32>>) -> Chain<'a, i32> {
        Chain { source: Box::new(values.into_iter()), stages }
    }

    #[test]
    fn test_element_at_a_time() {
        let log = RefCell::new(Vec::new());
        let out = chain(vec![1, 2, 3], vec![
            Stage::Inspect(Box::new(|x: &i32| log.borrow_mut().push(format!("a{x}")))),
            Stage::Map(Box::new(|x: i32| x * 10)),
            Stage::Inspect(Box::new(|x: &i32| log.borrow_mut().push(format!("b{x}")))),
        ])
        .collect::<Vec<_>>();
        assert_eq!(out, vec![10, 20, 30]);
        assert_eq!(log.into_inner(), vec!["a1", "b10", "a2", "b20", "a3", "b30"]);
    }

    #[test]
    fn test_filter_short_circuits_later_stages() {
        let mapped = RefCell::new(0);
        let out = chain(vec![1, 2, 3, 4], vec![
            Stage::Filter(Box::new(|x: &i32| x % 2 == 0)),
            Stage::Map(Box::new(|x: i32| {
                *mapped.borrow_mut() += 1;
                x + 1
            })),
        ])
        .collect::<Vec<_>>();
        assert_eq!(out, vec![3, 5]);
        assert_eq!(*mapped.borrow(), 2);
    }

    #[test]
    fn test_skip_then_limit() {
        let out = chain((1..=10).collect(), vec![Stage::Skip(2), Stage::Limit(3)]).collect::<Vec<_>>();
        assert_eq!(out, vec![3, 4, 5]);
    }

    #[test]
    fn test_limit_counts_survivors() {
        let out = chain((1..=10).collect(), vec![Stage::Filter(Box::new(|x: &i32| x % 3 == 0)), Stage::Limit(2)])
            .collect::<Vec<_>>();
        assert_eq!(out, vec![3, 6]);
    }

    #[test]
    fn test_exhausted_limit_stops_pulling() {
        let pulled = RefCell::new(0);
        let source = std::iter::repeat_with(|| {
            *pulled.borrow_mut() += 1;
            1
        });
        let mut chain = Chain { source: Box::new(source), stages: vec![Stage::Limit(2)] };
        assert_eq!(chain.next(), Some(1));
        assert_eq!(chain.next(), Some(1));
        assert_eq!(chain.next(), None);
        assert_eq!(*pulled.borrow(), 2);
    }

    #[test]
    fn test_limit_zero_never_pulls() {
        let pulled = RefCell::new(false);
        let source = std::iter::from_fn(|| {
            *pulled.borrow_mut() = true;
            Some(1)
        });
        let mut chain = Chain { source: Box::new(source), stages: vec![Stage::Limit(0)] };
        assert_eq!(chain.next(), None);
        assert!(!*pulled.borrow());
    }

    #[test]
    fn test_stage_display() {
        let stages: Vec<Stage<'_, i32>> =
            vec![Stage::Filter(Box::new(|_: &i32| true)), Stage::Map(Box::new(|x: i32| x)), Stage::Skip(1), Stage::Limit(3)];
        assert_eq!(stages.iter().map(ToString::to_string).collect::<Vec<_>>(), vec![
            "filter", "map", "skip(1)", "limit(3)"
        ]);
    }
}
