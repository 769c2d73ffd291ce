use crate::err::LpErr;
use crate::pipe::stage::Chain;
use crate::pipe::{Pipe, PipeState};
use crate::{Float, Integer};
use itertools::Itertools;
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::iter::Sum;

/// 终结操作，驱动求值并消费流水线。
impl<'a, T: 'a> Pipe<'a, T> {
    /// 取出驱动链并标记为已消费。
    ///
    /// `exhaust`表示操作需要耗尽数据源，此时无限数据源直接报错，且不消费流水线。
    fn drive(&mut self, op: &'static str, exhaust: bool) -> Result<Chain<'a, T>, LpErr> {
        if exhaust && !self.is_consumed() && !self.bounded {
            return Err(LpErr::Unbounded { op });
        }
        match std::mem::replace(&mut self.state, PipeState::Consumed) {
            PipeState::Ready(chain) => Ok(chain),
            PipeState::Consumed => Err(LpErr::Consumed),
        }
    }

    /// 按数据源顺序对每个通过全部步骤的元素执行`action`。
    pub fn for_each(&mut self, action: impl FnMut(T)) -> Result<(), LpErr> {
        self.drive("for_each", true)?.for_each(action);
        Ok(())
    }

    /// 找到第一个元素即停止拉取。
    pub fn find_first(&mut self) -> Result<Option<T>, LpErr> {
        Ok(self.drive("find_first", false)?.next())
    }

    /// 找到满足条件的元素即停止拉取。
    pub fn any_match(&mut self, predicate: impl FnMut(T) -> bool) -> Result<bool, LpErr> {
        Ok(self.drive("any_match", false)?.any(predicate))
    }

    pub fn collect<C: FromIterator<T>>(&mut self) -> Result<C, LpErr> {
        Ok(self.drive("collect", true)?.collect())
    }

    pub fn to_set(&mut self) -> Result<FxHashSet<T>, LpErr>
    where
        T: Hash + Eq,
    {
        self.collect()
    }

    /// 收集为映射，键冲突时报错。
    pub fn to_map<K, V>(&mut self, key: impl FnMut(&T) -> K, mut value: impl FnMut(T) -> V) -> Result<BTreeMap<K, V>, LpErr>
    where
        K: Ord + Debug,
    {
        self.to_map_inner("to_map", key, |item| Ok(value(item)), |key, _, _| {
            Err(LpErr::DuplicateKey { key: format!("{key:?}") })
        })
    }

    /// 收集为映射，键冲突时按遇到的顺序从左到右合并：`merge(旧值, 新值)`。
    pub fn to_map_with<K, V>(
        &mut self, key: impl FnMut(&T) -> K, mut value: impl FnMut(T) -> V, mut merge: impl FnMut(V, V) -> V,
    ) -> Result<BTreeMap<K, V>, LpErr>
    where
        K: Ord,
    {
        self.to_map_inner("to_map_with", key, |item| Ok(value(item)), |_, old, new| Ok(merge(old, new)))
    }

    fn to_map_inner<K: Ord, V>(
        &mut self, op: &'static str, mut key: impl FnMut(&T) -> K, mut value: impl FnMut(T) -> Result<V, LpErr>,
        mut on_collision: impl FnMut(&K, V, V) -> Result<V, LpErr>,
    ) -> Result<BTreeMap<K, V>, LpErr> {
        let mut map = BTreeMap::new();
        for item in self.drive(op, true)? {
            let k = key(&item);
            let v = value(item)?;
            match map.entry(k) {
                Entry::Vacant(entry) => {
                    entry.insert(v);
                }
                Entry::Occupied(entry) => {
                    let (k, old) = entry.remove_entry();
                    let merged = on_collision(&k, old, v)?;
                    map.insert(k, merged);
                }
            }
        }
        Ok(map)
    }

    /// 按键分组，组内保持遇到的顺序。
    pub fn group_by<K: Ord>(&mut self, mut key: impl FnMut(&T) -> K) -> Result<BTreeMap<K, Vec<T>>, LpErr> {
        let mut groups: BTreeMap<K, Vec<T>> = BTreeMap::new();
        for item in self.drive("group_by", true)? {
            groups.entry(key(&item)).or_default().push(item);
        }
        Ok(groups)
    }

    pub fn count(&mut self) -> Result<usize, LpErr> {
        Ok(self.drive("count", true)?.count())
    }

    pub fn sum<S: Sum<T>>(&mut self) -> Result<S, LpErr> {
        Ok(self.drive("sum", true)?.sum())
    }

    pub fn reduce(&mut self, f: impl FnMut(T, T) -> T) -> Result<Option<T>, LpErr> {
        Ok(self.drive("reduce", true)?.reduce(f))
    }

    pub fn fold<B>(&mut self, init: B, f: impl FnMut(B, T) -> B) -> Result<B, LpErr> {
        Ok(self.drive("fold", true)?.fold(init, f))
    }

    /// 平均值，没有元素时为`None`。
    pub fn average_by(&mut self, mut f: impl FnMut(&T) -> Float) -> Result<Option<Float>, LpErr> {
        let (sum, count) = self.drive("average", true)?.fold((0.0, 0usize), |(sum, count), item| (sum + f(&item), count + 1));
        Ok(if count == 0 { None } else { Some(sum / count as Float) })
    }

    /// `prefix`和`suffix`总会出现，`delimiter`只出现在元素之间。
    pub fn joining(&mut self, delimiter: &str, prefix: &str, suffix: &str) -> Result<String, LpErr>
    where
        T: Display,
    {
        Ok(format!("{prefix}{}{suffix}", self.drive("joining", true)?.join(delimiter)))
    }
}

impl Pipe<'_, Integer> {
    pub fn average(&mut self) -> Result<Option<Float>, LpErr> {
        self.average_by(|x| *x as Float)
    }
}
