use crate::config::Config;
use crate::demo::Demo;
use crate::err::LpErr;
use itertools::{Either, Itertools};
use std::iter::Peekable;

pub fn parse_configs(args: &mut Peekable<impl Iterator<Item = String>>) -> Vec<Config> {
    let mut configs = Vec::new();
    while let Some(config) = parse_config(args.peek()) {
        args.next();
        configs.push(config);
    }
    configs
}

fn parse_config(arg: Option<&String>) -> Option<Config> {
    match arg?.as_str() {
        "-h" | "--help" => Some(Config::Help),
        "-V" | "--version" => Some(Config::Version),
        "-v" | "--verbose" => Some(Config::Verbose),
        _ => None, // 遇到非配置参数，停止解析（由调用者处理）
    }
}

/// 解析剩余参数为演示列表，未指定时按声明顺序选择全部演示。
pub fn parse_demos(args: impl Iterator<Item = String>) -> Result<Vec<Demo>, LpErr> {
    let (demos, mut unknown): (Vec<_>, Vec<_>) = args.partition_map(|arg| match Demo::from_name(&arg) {
        Some(demo) => Either::Left(demo),
        None => Either::Right(arg),
    });
    match unknown.len() {
        0 => Ok(if demos.is_empty() { Demo::all().to_vec() } else { demos }),
        1 => Err(LpErr::UnknownDemo(unknown.remove(0))),
        _ => Err(LpErr::UnknownArgs { args: unknown }),
    }
}
