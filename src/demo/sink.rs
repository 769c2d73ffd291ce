use crate::err::LpErr;
use std::cell::RefCell;
use std::fmt::Display;
use std::io;
use std::io::Write;

/// 控制台输出，每个值一行。
///
/// 可以被流水线中的多个闭包共享。写入失败后后续写入全部忽略，
/// 第一个错误由[`Sink::check`]或[`Sink::finish`]返回。
pub struct Sink<W: Write> {
    out: RefCell<W>,
    err: RefCell<Option<io::Error>>,
}

impl<W: Write> Sink<W> {
    pub fn new(out: W) -> Sink<W> {
        Sink { out: RefCell::new(out), err: RefCell::new(None) }
    }

    pub fn line(&self, value: impl Display) {
        if self.err.borrow().is_some() {
            return;
        }
        if let Err(err) = writeln!(self.out.borrow_mut(), "{value}") {
            *self.err.borrow_mut() = Some(err);
        }
    }

    pub fn check(&self) -> Result<(), LpErr> {
        match self.err.borrow_mut().take() {
            Some(err) => Err(LpErr::WriteErr(err.to_string())),
            None => Ok(()),
        }
    }

    pub fn finish(self) -> Result<W, LpErr> {
        self.check()?;
        let mut out = self.out.into_inner();
        out.flush().map_err(|err| LpErr::WriteErr(err.to_string()))?;
        Ok(out)
    }
}
