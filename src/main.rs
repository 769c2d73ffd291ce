use itertools::Itertools;
use lazypipe::args::{parse_configs, parse_demos};
use lazypipe::config::{Config, is_verbose};
use lazypipe::demo::Demo;
use lazypipe::demo::sink::Sink;
use lazypipe::err::LpErr;
use lazypipe::println_notice;
use std::io;

fn main() {
    if let Err(e) = run() {
        e.termination();
    }
}

fn run() -> Result<(), LpErr> {
    let mut args = std::env::args().skip(1).peekable();
    let configs = parse_configs(&mut args);
    if configs.contains(&Config::Help) {
        print_help();
        return Ok(());
    }
    if configs.contains(&Config::Version) {
        println!("lp {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }
    let demos = parse_demos(args)?;
    let sink = Sink::new(io::stdout().lock());
    for demo in demos {
        if is_verbose(&configs) {
            println_notice!("{}:", demo.name());
        }
        demo.run(&sink, &configs)?;
    }
    sink.finish()?;
    Ok(())
}

fn print_help() {
    println!("Usage: lp [-h] [-V] [-v] [<demo>...]");
    println!();
    println!("    -h, --help      打印帮助信息。");
    println!("    -V, --version   打印版本。");
    println!("    -v, --verbose   在标准错误中打印演示名称和流水线结构。");
    println!();
    println!("Demos（未指定时按顺序执行全部演示）:");
    println!("{}", Demo::all_help().iter().map(|(_, help)| help.lines().map(|line| format!("    {line}")).join("\n")).join("\n"));
}
