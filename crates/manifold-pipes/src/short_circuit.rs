//! # short_circuit 模块说明
//!
//! 短路管道：可选变换之后无条件抛出终止信号，从不消费 `next`。
//! 这是管道族中唯一刻意偏离"恰好消费一次延续"常规的成员，提前退出
//! 正是它存在的意义；信号由最近一层引擎的 `process` 边界吸收。

#[cfg(feature = "std")]
use std::{borrow::Cow, boxed::Box};

#[cfg(not(feature = "std"))]
use alloc::{borrow::Cow, boxed::Box};

use manifold_core::{Flow, Next, Pipe, PipeResult};

/// 短路管道。
pub struct ShortCircuitPipe<T> {
    transform: Option<Box<dyn Fn(T) -> T + Send + Sync>>,
}

impl<T> ShortCircuitPipe<T> {
    /// 构造不带变换的短路：原样携带当前载荷终止。
    pub fn new() -> Self {
        Self { transform: None }
    }

    /// 构造带终值变换的短路。
    pub fn with_transform(transform: impl Fn(T) -> T + Send + Sync + 'static) -> Self {
        Self {
            transform: Some(Box::new(transform)),
        }
    }
}

impl<T> Default for ShortCircuitPipe<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Pipe<T> for ShortCircuitPipe<T> {
    fn handle(&self, payload: T, _next: Next<'_, T>) -> PipeResult<T> {
        let payload = match &self.transform {
            Some(transform) => transform(payload),
            None => payload,
        };

        #[cfg(feature = "std")]
        tracing::trace!("short-circuit raised the termination signal");

        Ok(Flow::Stop(payload))
    }

    fn describe(&self) -> Cow<'static, str> {
        Cow::Borrowed("short-circuit")
    }
}
