use crate::config::{Config, trace_pipe};
use crate::demo::sink::Sink;
use crate::err::LpErr;
use crate::par::ParPipe;
use crate::source::Source;
use crate::{Float, Integer};
use itertools::Itertools;
use std::fmt::{Display, Formatter};
use std::io::Write;

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: Integer,
}

impl Person {
    pub fn new(name: &str, age: Integer) -> Person {
        Person { name: name.to_string(), age }
    }
}

impl Display for Person {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub fn people() -> Vec<Person> {
    vec![
        Person::new("Ross", 29),
        Person::new("Dave", 30),
        Person::new("Alan", 50),
        Person::new("Chris", 29),
        Person::new("Ross", 30),
    ]
}

pub(crate) fn named_ross<W: Write>(sink: &Sink<W>, configs: &[Config]) -> Result<(), LpErr> {
    let mut pipe = Source::of(people()).pipe().filter(|p| p.name == "Ross")?;
    trace_pipe(&pipe, configs);
    let rosses = pipe.collect::<Vec<_>>()?;
    rosses.iter().for_each(|p| sink.line(format!("{} is {}", p.name, p.age)));
    Ok(())
}

pub(crate) fn group_by_age<W: Write>(sink: &Sink<W>, configs: &[Config]) -> Result<(), LpErr> {
    let mut pipe = Source::of(people()).pipe();
    trace_pipe(&pipe, configs);
    for (age, group) in pipe.group_by(|p| p.age)? {
        sink.line(format!("age {age}: [{}]", group.iter().join(", ")));
    }
    Ok(())
}

pub(crate) fn joining<W: Write>(sink: &Sink<W>, configs: &[Config]) -> Result<(), LpErr> {
    let mut pipe = Source::of(people()).pipe().filter(|p| p.age > 29)?.map_to(|p| p.name)?;
    trace_pipe(&pipe, configs);
    sink.line(pipe.joining(" and ", "", " are over 29")?);
    Ok(())
}

pub(crate) fn name_set<W: Write>(sink: &Sink<W>, configs: &[Config]) -> Result<(), LpErr> {
    let mut pipe = Source::of(people()).pipe().map_to(|p| p.name)?;
    trace_pipe(&pipe, configs);
    // 集合本身无序，排序后输出
    sink.line(format!("[{}]", pipe.to_set()?.into_iter().sorted().join(", ")));
    Ok(())
}

pub(crate) fn average_age<W: Write>(sink: &Sink<W>, configs: &[Config]) -> Result<(), LpErr> {
    let mut pipe = Source::of(people()).pipe();
    trace_pipe(&pipe, configs);
    if let Some(average) = pipe.average_by(|p| p.age as Float)? {
        sink.line(format!("avg age: {average:?}"));
    }
    Ok(())
}

pub(crate) fn age_map<W: Write>(sink: &Sink<W>, configs: &[Config]) -> Result<(), LpErr> {
    let mut pipe = Source::of(people()).pipe();
    trace_pipe(&pipe, configs);
    let map = pipe.to_map_with(|p| p.age, |p| p.name, |l, r| format!("{l},{r}"))?;
    sink.line(format!("{{{}}}", map.iter().map(|(age, names)| format!("{age}={names}")).join(", ")));
    Ok(())
}

/// 并行分组计数，按年龄排序后输出。
pub(crate) fn par_group_by<W: Write>(sink: &Sink<W>, configs: &[Config]) -> Result<(), LpErr> {
    let pipe = Source::of(people()).pipe();
    trace_pipe(&pipe, configs);
    let groups = pipe.parallel()?.group_by(|p| p.age)?;
    for (age, group) in groups.into_iter().sorted_by_key(|(age, _)| *age) {
        sink.line(format!("age {age}: {}", group.len()));
    }
    Ok(())
}
