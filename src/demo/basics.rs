use crate::config::{Config, trace_pipe};
use crate::demo::sink::Sink;
use crate::err::LpErr;
use crate::pipe::PipeRes;
use crate::source::Source;
use crate::task::{RunMode, Task, run_inline, submit};
use crate::Integer;
use regex::{NoExpand, Regex};
use std::io::Write;
use std::sync::mpsc;

/// 文本无法解析为整数时的替代值。
pub const PARSE_FALLBACK: Integer = -1;

pub(crate) fn find_first<W: Write>(sink: &Sink<W>, configs: &[Config]) -> Result<(), LpErr> {
    let mut pipe = Source::of(vec!["a1", "b2", "c3"]).pipe();
    trace_pipe(&pipe, configs);
    if let Some(first) = pipe.find_first()? {
        sink.line(first);
    }
    Ok(())
}

pub(crate) fn filter_sort<W: Write>(sink: &Sink<W>, configs: &[Config]) -> Result<(), LpErr> {
    let mut pipe = Source::of(vec!["A1", "C3", "B1", "C1", "C2", "C0"])
        .pipe()
        .filter(|s| s.starts_with('C'))?
        .map_to(str::to_uppercase)?
        .sorted()?;
    trace_pipe(&pipe, configs);
    pipe.for_each(|s| sink.line(s))
}

pub(crate) fn range<W: Write>(sink: &Sink<W>, configs: &[Config]) -> Result<(), LpErr> {
    let mut pipe = Source::range_closed(1, 5).pipe();
    trace_pipe(&pipe, configs);
    pipe.for_each(|i| sink.line(i))
}

pub(crate) fn iterate<W: Write>(sink: &Sink<W>, configs: &[Config]) -> Result<(), LpErr> {
    let mut pipe = Source::iterate(0, |i| i + 2).pipe().limit(3)?;
    trace_pipe(&pipe, configs);
    pipe.for_each(|i| sink.line(i))
}

/// 先就地执行一个工作单元；其余工作单元在工作线程上执行，输出经由通道回到调用方，保持提交顺序。
pub(crate) fn tasks<W: Write>(sink: &Sink<W>, configs: &[Config]) -> Result<(), LpErr> {
    run_inline(|| sink.line("runnable!"));
    let (tx, rx) = mpsc::channel();
    let mut pipe = Source::range_closed(1, 3).pipe().map_to(move |i| {
        let tx = tx.clone();
        Box::new(move || {
            // 接收方存活到所有工作单元结束
            let _ = tx.send(format!("RUN: {i}"));
        }) as Task
    })?;
    trace_pipe(&pipe, configs);
    for task in pipe.collect::<Vec<_>>()? {
        submit(RunMode::Worker, task)?;
        rx.try_iter().for_each(|line| sink.line(line));
    }
    Ok(())
}

struct Speaker {
    x: Integer,
}

impl Speaker {
    fn new(x: Integer) -> Speaker {
        Speaker { x }
    }

    fn speak(&self) -> String {
        format!("X={}", self.x)
    }
}

pub(crate) fn speakers<W: Write>(sink: &Sink<W>, configs: &[Config]) -> Result<(), LpErr> {
    let mut pipe = Source::range_closed(1, 5).pipe().map_to(Speaker::new)?;
    trace_pipe(&pipe, configs);
    pipe.for_each(|speaker| sink.line(speaker.speak()))
}

pub(crate) fn average<W: Write>(sink: &Sink<W>, configs: &[Config]) -> Result<(), LpErr> {
    let mut pipe = Source::of(vec![1, 2, 3, 4, 5]).pipe().map(|n: Integer| 2 * (n + 1))?;
    trace_pipe(&pipe, configs);
    if let Some(average) = pipe.average()? {
        sink.line(format!("{average:?}"));
    }
    Ok(())
}

pub(crate) fn parse<W: Write>(sink: &Sink<W>, configs: &[Config]) -> Result<(), LpErr> {
    let mut pipe = parse_integers(vec!["1", "2", "3", "hey"])?;
    trace_pipe(&pipe, configs);
    pipe.for_each(|i| sink.line(i))
}

/// 文本原样解析，前后的空白同样导致解析失败。
fn parse_integers(texts: Vec<&str>) -> PipeRes<'_, Integer> {
    Source::of(texts).pipe().map_or(PARSE_FALLBACK, str::parse::<Integer>)
}

/// 每个元素先经过过滤再到达消费者，之后才拉取下一个元素。
pub(crate) fn interleave<W: Write>(sink: &Sink<W>, configs: &[Config]) -> Result<(), LpErr> {
    let mut pipe = Source::of(vec!["d2", "a2", "b1", "b3", "c"]).pipe().filter(|s| {
        sink.line(format!("filter: {s}"));
        *s == "a2"
    })?;
    trace_pipe(&pipe, configs);
    pipe.for_each(|s| sink.line(format!("forEach: {s}")))
}

/// 先过滤，替换只对留下的元素执行一次。
pub(crate) fn filter_first<W: Write>(sink: &Sink<W>, configs: &[Config]) -> Result<(), LpErr> {
    let reg = "m";
    let regex = Regex::new(reg).map_err(|err| LpErr::InvalidRegex { reg: reg.to_string(), err: err.to_string() })?;
    let mut pipe = Source::of("hello my name is ross".split(' ').collect())
        .pipe()
        .filter(|s| *s == "my")?
        .map_to(move |s| regex.replace_all(s, NoExpand(&format!("{s}X"))).into_owned())?;
    trace_pipe(&pipe, configs);
    pipe.for_each(|s| sink.line(s))
}
