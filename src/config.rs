use crate::pipe::Pipe;
use crate::println_info;

#[derive(Debug, Eq, PartialEq)]
pub enum Config {
    /// 帮助 `-h`
    Help,
    /// 版本 `-V`
    Version,
    /// 打印演示名称和流水线结构 `-v`
    Verbose,
}

#[inline]
pub fn is_verbose(configs: &[Config]) -> bool {
    configs.contains(&Config::Verbose)
}

/// 详细模式下打印流水线结构，不会触发求值。
pub fn trace_pipe<T>(pipe: &Pipe<'_, T>, configs: &[Config]) {
    if is_verbose(configs) {
        println_info!("    {}", pipe.describe());
    }
}
