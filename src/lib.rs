//! 惰性流水线：中间操作只记录步骤，终结操作逐个元素地驱动求值。

pub mod args;
pub mod config;
pub mod demo;
pub mod err;
pub mod par;
pub mod pipe;
mod print;
pub mod source;
pub mod task;

/// 整数类型
pub type Integer = i64;
/// 浮点数类型
pub type Float = f64;
