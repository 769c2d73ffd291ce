mod basics;
mod people;
pub mod sink;

use crate::config::Config;
use crate::demo::sink::Sink;
use crate::err::LpErr;
use cmd_help::CmdHelp;
use std::io::Write;

pub use basics::PARSE_FALLBACK;
pub use people::{Person, people};

#[derive(Debug, Clone, Copy, Eq, PartialEq, CmdHelp)]
pub enum Demo {
    /// find-first      取第一个元素。
    ///                 of(a1, b2, c3) -> find_first
    FindFirst,
    /// filter-sort     保留以C开头的元素，转为大写，排序后逐个输出。
    FilterSort,
    /// range           逐个输出闭区间[1, 5]内的整数。
    Range,
    /// iterate         无限序列0, 2, 4, ...经limit(3)截断后输出。
    Iterate,
    /// tasks           先就地执行一个工作单元，再将[1, 3]映射为独立的工作单元，依次交给工作线程执行。
    Tasks,
    /// speakers        将[1, 5]映射为对象后逐个调用其方法。
    Speakers,
    /// average         求2 * (n + 1)的平均值，n取[1, 5]。
    Average,
    /// parse           将文本解析为整数，无法解析时以-1代替。
    Parse,
    /// interleave      观察过滤和消费交替执行：每个元素先过滤，通过后立即消费。
    Interleave,
    /// filter-first    先过滤再替换，替换只对留下的一个元素执行。
    FilterFirst,
    /// people          筛选名为Ross的人。
    People,
    /// group-by        按年龄分组，组内保持原有顺序。
    GroupBy,
    /// joining         拼接30岁及以上的人名，带前缀和后缀。
    Joining,
    /// name-set        收集不重复的名字。
    NameSet,
    /// average-age     求平均年龄。
    AverageAge,
    /// age-map         以年龄为键、名字为值收集，同一年龄的名字用逗号合并。
    AgeMap,
    /// par-group-by    并行模式下按年龄分组计数。
    ParGroupBy,
}

impl Demo {
    pub fn run<W: Write>(&self, sink: &Sink<W>, configs: &[Config]) -> Result<(), LpErr> {
        let res = match self {
            Demo::FindFirst => basics::find_first(sink, configs),
            Demo::FilterSort => basics::filter_sort(sink, configs),
            Demo::Range => basics::range(sink, configs),
            Demo::Iterate => basics::iterate(sink, configs),
            Demo::Tasks => basics::tasks(sink, configs),
            Demo::Speakers => basics::speakers(sink, configs),
            Demo::Average => basics::average(sink, configs),
            Demo::Parse => basics::parse(sink, configs),
            Demo::Interleave => basics::interleave(sink, configs),
            Demo::FilterFirst => basics::filter_first(sink, configs),
            Demo::People => people::named_ross(sink, configs),
            Demo::GroupBy => people::group_by_age(sink, configs),
            Demo::Joining => people::joining(sink, configs),
            Demo::NameSet => people::name_set(sink, configs),
            Demo::AverageAge => people::average_age(sink, configs),
            Demo::AgeMap => people::age_map(sink, configs),
            Demo::ParGroupBy => people::par_group_by(sink, configs),
        };
        res.and_then(|_| sink.check())
    }
}
